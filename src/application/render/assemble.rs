//! Post assembler: runs normalise → dispatch → render over every structural
//! unit and derives the table of contents and content metrics.

use metrics::counter;
use tracing::debug;

use crate::domain::posts::BlogPost;

use super::dispatch::dispatch;
use super::normalize::normalize;
use super::sections::{RenderContext, render_section};
use super::types::{
    AssembledPost, ContentMetrics, RenderedSection, RendererKind, TocEntry, anchor_id,
};

pub(crate) const POSTS_RENDERED: &str = "gearguide_render_posts_total";
pub(crate) const SECTIONS_RENDERED: &str = "gearguide_render_sections_total";
pub(crate) const SECTIONS_SKIPPED: &str = "gearguide_render_sections_skipped_total";
pub(crate) const PRODUCTS_UNRESOLVED: &str = "gearguide_product_unresolved_total";

/// Section order always equals input unit order; nothing is sorted or
/// prioritised here. Units that render nothing are dropped but keep their
/// index, so anchors stay tied to the input position.
pub(crate) fn assemble_post(
    post: &BlogPost,
    ctx: &RenderContext<'_>,
    words_per_minute: u32,
) -> AssembledPost {
    let normalized = normalize(post);
    let mode = normalized.mode();

    let mut sections = Vec::new();
    let mut word_count = 0u32;

    for (index, unit) in normalized.into_units().into_iter().enumerate() {
        let Some(kind) = dispatch(&unit) else {
            debug!(
                target = "gearguide::render::assemble",
                index,
                kind_tag = %unit.kind_tag,
                "section has nothing to render; skipping"
            );
            counter!(SECTIONS_SKIPPED).increment(1);
            continue;
        };

        let output = render_section(kind, &unit, ctx);
        counter!(SECTIONS_RENDERED, "kind" => kind.as_str()).increment(1);
        word_count = word_count.saturating_add(output.word_count);

        sections.push(RenderedSection {
            index,
            anchor_id: anchor_id(index),
            title: unit.title_text().map(str::to_string),
            source_type: unit.kind_tag,
            intro_html: output.intro_html,
            body: output.body,
        });
    }

    let toc = table_of_contents(&sections);
    let has_faqs = sections
        .iter()
        .any(|section| section.body.kind() == RendererKind::Faqs);
    let metrics = content_metrics(&sections, word_count, words_per_minute);

    counter!(POSTS_RENDERED).increment(1);
    debug!(
        target = "gearguide::render::assemble",
        title = %post.title,
        mode = ?mode,
        sections = sections.len(),
        words = metrics.word_count,
        unresolved_products = metrics.unresolved_product_count,
        "post assembled"
    );

    AssembledPost {
        title: post.title.clone(),
        slug: post.slug.clone(),
        author: post.author.clone(),
        mode,
        sections,
        toc,
        has_faqs,
        metrics,
    }
}

fn table_of_contents(sections: &[RenderedSection]) -> Vec<TocEntry> {
    sections
        .iter()
        .filter_map(|section| {
            section.title.as_ref().map(|title| TocEntry {
                title: title.clone(),
                anchor_id: section.anchor_id.clone(),
            })
        })
        .collect()
}

fn content_metrics(
    sections: &[RenderedSection],
    word_count: u32,
    words_per_minute: u32,
) -> ContentMetrics {
    let mut product_reference_count = 0u32;
    let mut unresolved_product_count = 0u32;

    for section in sections {
        for card in section.body.product_cards() {
            product_reference_count += 1;
            if !card.is_resolved() {
                unresolved_product_count += 1;
                debug!(
                    target = "gearguide::render::hydration",
                    product_id = %card.product_id,
                    anchor = %section.anchor_id,
                    "product reference unresolved; showing inline context only"
                );
                counter!(PRODUCTS_UNRESOLVED).increment(1);
            }
        }
    }

    ContentMetrics {
        word_count,
        reading_time_minutes: reading_time(word_count, words_per_minute),
        product_reference_count,
        unresolved_product_count,
    }
}

/// Whole minutes, rounded up; zero only for an empty post.
pub(crate) fn reading_time(words: u32, words_per_minute: u32) -> u32 {
    words.div_ceil(words_per_minute.max(1))
}
