//! Comrak-backed GFM transform shared by every renderer that emits prose.

use std::collections::BTreeSet;

use comrak::{
    Arena, format_html,
    nodes::{AstNode, NodeValue},
    options::{ListStyleType, Options},
    parse_document,
};
use lol_html::{RewriteStrSettings, element, rewrite_str};
use tracing::warn;
use url::Url;

/// HTML produced from one markdown fragment plus the words it contained.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderedMarkdown {
    pub html: String,
    pub word_count: u32,
}

/// Markdown to HTML with GFM tables, task lists, strikethrough and autolinks.
///
/// Content is authored by the editorial pipeline and treated as trusted, so raw
/// HTML passes through and no sanitiser runs.
pub struct MarkdownRenderer {
    options: Options<'static>,
}

impl MarkdownRenderer {
    pub fn new() -> Self {
        Self {
            options: default_options(),
        }
    }

    /// Render `markdown`. Never fails: a formatting error yields empty HTML and
    /// a decoration error yields the undecorated HTML.
    pub fn render(&self, markdown: &str) -> RenderedMarkdown {
        if markdown.trim().is_empty() {
            return RenderedMarkdown::default();
        }

        let arena = Arena::new();
        let root = parse_document(&arena, markdown, &self.options);
        let word_count = count_words(root);

        let mut html = String::new();
        if let Err(err) = format_html(root, &self.options, &mut html) {
            warn!(
                target = "gearguide::render::markdown",
                error = %err,
                "markdown formatting failed"
            );
            return RenderedMarkdown {
                html: String::new(),
                word_count,
            };
        }

        let html = match decorate_html(&html) {
            Ok(decorated) => decorated,
            Err(err) => {
                warn!(
                    target = "gearguide::render::markdown",
                    error = %err,
                    "html decoration failed; using undecorated output"
                );
                html
            }
        };

        RenderedMarkdown { html, word_count }
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

fn default_options() -> Options<'static> {
    let mut options = Options::default();

    let ext = &mut options.extension;
    ext.strikethrough = true;
    ext.tagfilter = false;
    ext.table = true;
    ext.autolink = true;
    ext.tasklist = true;
    ext.superscript = true;

    let render = &mut options.render;
    render.github_pre_lang = true;
    render.tasklist_classes = true;
    render.list_style = ListStyleType::Dash;
    render.r#unsafe = true;

    options
}

fn count_words(root: &AstNode<'_>) -> u32 {
    fn walk(node: &AstNode<'_>, total: &mut u32) {
        {
            let data = node.data.borrow();
            let words = match &data.value {
                NodeValue::Text(text) => text.split_whitespace().count(),
                NodeValue::Code(code) => code.literal.split_whitespace().count(),
                _ => 0,
            };
            *total = total.saturating_add(u32::try_from(words).unwrap_or(u32::MAX));
        }
        let mut child = node.first_child();
        while let Some(next) = child {
            walk(next, total);
            child = next.next_sibling();
        }
    }

    let mut total = 0;
    walk(root, &mut total);
    total
}

fn decorate_html(html: &str) -> Result<String, lol_html::errors::RewritingError> {
    rewrite_str(
        html,
        RewriteStrSettings {
            element_content_handlers: vec![
                element!("a[href]", |el| {
                    let Some(href) = el.get_attribute("href") else {
                        return Ok(());
                    };
                    match classify_link(&href) {
                        LinkKind::External => {
                            let rel = merge_rel(el.get_attribute("rel"), &["noopener", "noreferrer"]);
                            el.set_attribute("rel", &rel)?;
                            el.set_attribute("data-link-kind", "external")?;
                        }
                        LinkKind::Internal => el.set_attribute("data-link-kind", "internal")?,
                        LinkKind::Anchor => el.set_attribute("data-link-kind", "anchor")?,
                        LinkKind::Other => el.set_attribute("data-link-kind", "other")?,
                    }
                    Ok(())
                }),
                element!("table", |el| {
                    el.set_attribute("data-role", "content-table")?;
                    Ok(())
                }),
            ],
            ..RewriteStrSettings::default()
        },
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LinkKind {
    Internal,
    External,
    Anchor,
    Other,
}

fn classify_link(href: &str) -> LinkKind {
    if href.is_empty() || href.starts_with('#') {
        return LinkKind::Anchor;
    }

    if href.starts_with("http://") || href.starts_with("https://") {
        return match Url::parse(href) {
            Ok(url) if url.host_str().is_some() => LinkKind::External,
            _ => LinkKind::Other,
        };
    }

    if href.starts_with('/') && !href.starts_with("//") {
        return LinkKind::Internal;
    }

    if href.starts_with("./") || href.starts_with("../") {
        return LinkKind::Internal;
    }

    LinkKind::Other
}

fn merge_rel(existing: Option<String>, required: &[&str]) -> String {
    let mut tokens: BTreeSet<String> = existing
        .unwrap_or_default()
        .split_whitespace()
        .map(str::to_string)
        .collect();
    for &token in required {
        tokens.insert(token.to_string());
    }
    tokens.into_iter().collect::<Vec<_>>().join(" ")
}
