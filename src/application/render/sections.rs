//! Renderer set: one pure function per section kind.
//!
//! Every renderer takes the section plus an explicit [`RenderContext`] and
//! returns a view-ready body. Missing optional fields shrink the output; they
//! never fail it.

use crate::domain::content::{AffiliatePlacement, ProductPlacement, Section};
use crate::domain::products::ProductId;

use super::hydration::HydrationMap;
use super::markdown::MarkdownRenderer;
use super::types::{ProductCard, RenderedFaq, RendererKind, SectionBody, TableView};

/// Inputs shared by every renderer during one post render.
pub struct RenderContext<'a> {
    pub hydration: &'a HydrationMap,
    pub markdown: &'a MarkdownRenderer,
    pub default_cta_label: &'a str,
}

/// Output of one renderer invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct SectionRender {
    pub intro_html: Option<String>,
    pub body: SectionBody,
    pub word_count: u32,
}

pub fn render_section(kind: RendererKind, section: &Section, ctx: &RenderContext<'_>) -> SectionRender {
    let (body, body_words) = match kind {
        RendererKind::Markdown => {
            let rendered = ctx.markdown.render(section.body_text().unwrap_or_default());
            return SectionRender {
                intro_html: None,
                body: SectionBody::Markdown {
                    html: rendered.html,
                },
                word_count: rendered.word_count,
            };
        }
        RendererKind::ProductShowcase => render_product_showcase(section, ctx),
        RendererKind::ProsCons => render_pros_cons(section),
        RendererKind::ComparisonTable => render_comparison_table(section, ctx),
        RendererKind::Specs => render_specs(section),
        RendererKind::Faqs => render_faqs(section, ctx),
    };

    let (intro_html, intro_words) = match section.body_text() {
        Some(text) => {
            let rendered = ctx.markdown.render(text);
            (Some(rendered.html), rendered.word_count)
        }
        None => (None, 0),
    };

    SectionRender {
        intro_html,
        body,
        word_count: intro_words.saturating_add(body_words),
    }
}

fn render_product_showcase(section: &Section, ctx: &RenderContext<'_>) -> (SectionBody, u32) {
    let cards: Vec<ProductCard> = section
        .products
        .as_deref()
        .unwrap_or_default()
        .iter()
        .map(|placement| placement_card(placement, ctx))
        .collect();

    let words: u32 = cards
        .iter()
        .filter_map(|card| card.context.as_deref())
        .map(count_words)
        .sum();

    (SectionBody::ProductShowcase { cards }, words)
}

fn placement_card(placement: &ProductPlacement, ctx: &RenderContext<'_>) -> ProductCard {
    ProductCard {
        product_id: placement.product_id.clone(),
        position: placement.position,
        context: placement.context.clone(),
        cta_label: cta_label(placement.cta_text.as_deref(), ctx),
        product: ctx.hydration.resolve(&placement.product_id).cloned(),
    }
}

fn mention_card(product_id: &ProductId, ctx: &RenderContext<'_>) -> ProductCard {
    ProductCard {
        product_id: product_id.clone(),
        position: None,
        context: None,
        cta_label: cta_label(None, ctx),
        product: ctx.hydration.resolve(product_id).cloned(),
    }
}

fn cta_label(explicit: Option<&str>, ctx: &RenderContext<'_>) -> String {
    explicit
        .map(str::trim)
        .filter(|label| !label.is_empty())
        .unwrap_or(ctx.default_cta_label)
        .to_string()
}

fn render_pros_cons(section: &Section) -> (SectionBody, u32) {
    let pros = section.pros.clone().unwrap_or_default();
    let cons = section.cons.clone().unwrap_or_default();
    let words: u32 = pros.iter().chain(cons.iter()).map(|item| count_words(item)).sum();
    (SectionBody::ProsCons { pros, cons }, words)
}

fn render_comparison_table(section: &Section, ctx: &RenderContext<'_>) -> (SectionBody, u32) {
    let table = TableView {
        headers: section.headers.clone().unwrap_or_default(),
        rows: section.rows.clone().unwrap_or_default(),
    };

    let affiliate_products = match (&section.affiliate_placement, &section.products_mentioned) {
        (Some(AffiliatePlacement::BelowTable), Some(mentioned)) if !mentioned.is_empty() => Some(
            mentioned
                .iter()
                .map(|product_id| mention_card(product_id, ctx))
                .collect(),
        ),
        _ => None,
    };

    let words: u32 = table
        .headers
        .iter()
        .chain(table.rows.iter().flatten())
        .map(|cell| count_words(cell))
        .sum();

    (
        SectionBody::ComparisonTable {
            table,
            affiliate_products,
        },
        words,
    )
}

fn render_specs(section: &Section) -> (SectionBody, u32) {
    let specs = section.specs.clone().unwrap_or_default();
    let words: u32 = specs
        .iter()
        .map(|entry| count_words(&entry.label) + count_words(&entry.value))
        .sum();
    (SectionBody::Specs { specs }, words)
}

fn render_faqs(section: &Section, ctx: &RenderContext<'_>) -> (SectionBody, u32) {
    let mut words = 0u32;
    let faqs = section
        .faqs
        .as_deref()
        .unwrap_or_default()
        .iter()
        .map(|entry| {
            let answer = ctx.markdown.render(&entry.answer);
            words = words
                .saturating_add(count_words(&entry.question))
                .saturating_add(answer.word_count);
            RenderedFaq {
                question: entry.question.clone(),
                answer_html: answer.html,
            }
        })
        .collect();
    (SectionBody::Faqs { faqs }, words)
}

fn count_words(text: &str) -> u32 {
    u32::try_from(text.split_whitespace().count()).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::domain::products::ProductRecord;

    fn section(value: serde_json::Value) -> Section {
        serde_json::from_value(value).expect("lenient section")
    }

    fn render(kind: RendererKind, section: &Section, products: &[ProductRecord]) -> SectionRender {
        let hydration = HydrationMap::build(products, "/products");
        let markdown = MarkdownRenderer::new();
        let ctx = RenderContext {
            hydration: &hydration,
            markdown: &markdown,
            default_cta_label: "Check Latest Price",
        };
        render_section(kind, section, &ctx)
    }

    #[test]
    fn showcase_cards_resolve_and_default_cta() {
        let showcase = section(json!({
            "type": "product_showcase_inline",
            "products": [
                { "product_id": 42, "context": "Great pick", "position": 1 },
                { "product_id": 99, "context": "Also good", "cta_text": "See deal" }
            ]
        }));
        let output = render(
            RendererKind::ProductShowcase,
            &showcase,
            &[ProductRecord::new(42, "Widget", "widget")],
        );

        let SectionBody::ProductShowcase { cards } = output.body else {
            panic!("expected showcase body");
        };
        assert_eq!(cards.len(), 2);
        let resolved = cards[0].product.as_ref().expect("resolved");
        assert_eq!(resolved.url, "/products/widget");
        assert_eq!(cards[0].cta_label, "Check Latest Price");
        assert!(cards[1].product.is_none());
        assert_eq!(cards[1].context.as_deref(), Some("Also good"));
        assert_eq!(cards[1].cta_label, "See deal");
        assert_eq!(output.word_count, 4);
    }

    #[test]
    fn pros_cons_keep_order_and_empty_lists() {
        let verdict = section(json!({ "type": "pros_cons", "pros": ["Light", "Loud"] }));
        let output = render(RendererKind::ProsCons, &verdict, &[]);
        assert_eq!(
            output.body,
            SectionBody::ProsCons {
                pros: vec!["Light".into(), "Loud".into()],
                cons: Vec::new(),
            }
        );
    }

    #[test]
    fn comparison_table_adds_affiliate_block_below_table() {
        let table = section(json!({
            "type": "comparison_table",
            "headers": ["Model", "Price"],
            "rows": [["Strat", 799]],
            "products_mentioned": [1, 2],
            "affiliate_placement": "below_table"
        }));
        let output = render(
            RendererKind::ComparisonTable,
            &table,
            &[ProductRecord::new(1, "Strat", "strat")],
        );

        let SectionBody::ComparisonTable {
            table,
            affiliate_products,
        } = output.body
        else {
            panic!("expected table body");
        };
        assert_eq!(table.rows, vec![vec!["Strat".to_string(), "799".to_string()]]);
        let cards = affiliate_products.expect("affiliate block");
        assert_eq!(cards.len(), 2);
        assert!(cards[0].is_resolved());
        assert!(!cards[1].is_resolved());
    }

    #[test]
    fn comparison_table_without_placement_has_no_affiliate_block() {
        let table = section(json!({
            "type": "comparison_table",
            "headers": ["Model"],
            "rows": [],
            "products_mentioned": [1]
        }));
        let output = render(RendererKind::ComparisonTable, &table, &[]);
        assert!(output.body.product_cards().is_empty());
    }

    #[test]
    fn faq_answers_are_markdown() {
        let faqs = section(json!({
            "type": "faqs",
            "faqs": [{ "question": "Which strings?", "answer": "Use **nickel** wound." }]
        }));
        let output = render(RendererKind::Faqs, &faqs, &[]);
        let SectionBody::Faqs { faqs } = output.body else {
            panic!("expected faq body");
        };
        assert!(faqs[0].answer_html.contains("<strong>nickel</strong>"));
        assert_eq!(output.word_count, 5);
    }

    #[test]
    fn specialised_sections_render_content_as_intro() {
        let specs = section(json!({
            "type": "specs",
            "content": "Key numbers:",
            "specs": [{ "label": "Weight", "value": "3.6kg" }]
        }));
        let output = render(RendererKind::Specs, &specs, &[]);
        assert_eq!(output.intro_html.as_deref(), Some("<p>Key numbers:</p>\n"));
        assert!(matches!(output.body, SectionBody::Specs { ref specs } if specs.len() == 1));
    }

    #[test]
    fn markdown_sections_have_no_intro() {
        let prose = section(json!({ "type": "content", "content": "# Hello" }));
        let output = render(RendererKind::Markdown, &prose, &[]);
        assert_eq!(output.intro_html, None);
        assert_eq!(
            output.body,
            SectionBody::Markdown {
                html: "<h1>Hello</h1>\n".into()
            }
        );
    }
}
