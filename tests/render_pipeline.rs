use std::sync::Arc;

use gearguide::application::render::{
    ContentMode, PostRenderService, RenderedSection, RendererKind, SectionBody, assemble,
    render_service,
};
use gearguide::domain::posts::BlogPost;
use gearguide::domain::products::ProductRecord;
use metrics_util::debugging::{DebugValue, DebuggingRecorder};
use serde_json::{Value, json};

fn post(payload: Value) -> BlogPost {
    serde_json::from_value(payload).expect("lenient post payload")
}

fn products(payload: Value) -> Vec<ProductRecord> {
    serde_json::from_value(payload).expect("lenient product list")
}

fn kinds(sections: &[RenderedSection]) -> Vec<RendererKind> {
    sections.iter().map(|section| section.body.kind()).collect()
}

#[test]
fn plain_markdown_section_renders_heading_without_toc() {
    let service = PostRenderService::default();
    let assembled = service.assemble(
        &post(json!({
            "title": "Hello",
            "content_json": { "sections": [{ "type": "content", "content": "# Hello" }] }
        })),
        &[],
    );

    assert_eq!(assembled.mode, ContentMode::Sections);
    assert_eq!(assembled.sections.len(), 1);
    let SectionBody::Markdown { html } = &assembled.sections[0].body else {
        panic!("expected markdown body");
    };
    assert!(html.contains("<h1>Hello</h1>"), "{html}");
    assert!(assembled.toc.is_empty());
    assert!(!assembled.has_faqs);
}

#[test]
fn drifted_faq_tag_still_routes_to_faq_renderer() {
    let service = PostRenderService::default();
    let assembled = service.assemble(
        &post(json!({
            "title": "FAQ",
            "content_json": {
                "sections": [{
                    "type": "faqs_v1",
                    "faqs": [{ "question": "Q1", "answer": "A1" }]
                }]
            }
        })),
        &[],
    );

    assert_eq!(assembled.sections.len(), 1);
    let SectionBody::Faqs { faqs } = &assembled.sections[0].body else {
        panic!("expected faq body");
    };
    assert_eq!(faqs.len(), 1);
    assert_eq!(faqs[0].question, "Q1");
    assert!(faqs[0].answer_html.contains("A1"));
    assert!(assembled.has_faqs);
}

fn showcase_post() -> BlogPost {
    post(json!({
        "title": "Best Widgets",
        "content_json": {
            "sections": [{
                "type": "product_showcase_inline",
                "products": [{ "product_id": 42, "context": "Great pick", "position": 1 }]
            }]
        }
    }))
}

#[test]
fn showcase_card_resolves_against_product_list() {
    let service = PostRenderService::default();
    let assembled = service.assemble(
        &showcase_post(),
        &products(json!([{ "id": 42, "name": "Widget", "slug": "widget" }])),
    );

    let cards = assembled.sections[0].body.product_cards();
    assert_eq!(cards.len(), 1);
    let product = cards[0].product.as_ref().expect("resolved product");
    assert_eq!(product.name, "Widget");
    assert_eq!(product.url, "/products/widget");
    assert_eq!(cards[0].context.as_deref(), Some("Great pick"));
    assert_eq!(cards[0].position, Some(1));
    assert_eq!(cards[0].cta_label, "Check Latest Price");
    assert_eq!(assembled.metrics.unresolved_product_count, 0);
}

#[test]
fn showcase_card_degrades_to_context_when_product_is_unknown() {
    let service = PostRenderService::default();
    let assembled = service.assemble(&showcase_post(), &[]);

    let cards = assembled.sections[0].body.product_cards();
    assert_eq!(cards.len(), 1);
    assert!(!cards[0].is_resolved());
    assert_eq!(cards[0].context.as_deref(), Some("Great pick"));
    assert_eq!(assembled.metrics.product_reference_count, 1);
    assert_eq!(assembled.metrics.unresolved_product_count, 1);

    let encoded = serde_json::to_value(&assembled.sections[0]).expect("serialise section");
    let card = &encoded["cards"][0];
    assert_eq!(card["product"], Value::Null);
    assert!(card.get("url").is_none());
}

#[test]
fn flat_document_renders_in_declaration_order() {
    let service = PostRenderService::default();
    let assembled = service.assemble(
        &post(json!({
            "title": "Guide",
            "content_json": { "conclusion": "End text", "introduction": "Intro text" }
        })),
        &[],
    );

    assert_eq!(assembled.mode, ContentMode::Flat);
    let types: Vec<&str> = assembled
        .sections
        .iter()
        .map(|section| section.source_type.as_str())
        .collect();
    assert_eq!(types, ["introduction", "conclusion"]);
    assert_eq!(assembled.sections[0].title, None);
    assert_eq!(assembled.sections[1].title.as_deref(), Some("Conclusion"));
    assert_eq!(assembled.toc.len(), 1);
    assert_eq!(assembled.toc[0].anchor_id, "sec-1");
}

#[test]
fn empty_post_yields_empty_output() {
    let service = PostRenderService::default();
    let assembled = service.assemble(&post(json!({ "title": "Nothing", "content": "" })), &[]);

    assert_eq!(assembled.mode, ContentMode::Plain);
    assert!(assembled.sections.is_empty());
    assert!(assembled.toc.is_empty());
    assert!(!assembled.has_faqs);
    assert_eq!(assembled.metrics.word_count, 0);
    assert_eq!(assembled.metrics.reading_time_minutes, 0);
}

#[test]
fn sections_array_wins_over_flat_keys() {
    let service = PostRenderService::default();
    let assembled = service.assemble(
        &post(json!({
            "title": "Both",
            "content_json": {
                "introduction": "Flat intro",
                "sections": [{ "type": "content", "content": "From sections" }]
            }
        })),
        &[],
    );

    assert_eq!(assembled.mode, ContentMode::Sections);
    assert_eq!(assembled.sections.len(), 1);
    let SectionBody::Markdown { html } = &assembled.sections[0].body else {
        panic!("expected markdown body");
    };
    assert!(html.contains("From sections"));
}

fn mixed_post() -> BlogPost {
    post(json!({
        "title": "Mixed",
        "author": { "name": "Robin" },
        "content_json": {
            "sections": [
                { "type": "content", "title": "Overview", "content": "Some *words* here." },
                {
                    "type": "comparison_table",
                    "title": "Compare",
                    "headers": ["Model", "Price"],
                    "rows": [["A", 100], ["B", 200]],
                    "affiliate_placement": "below_table",
                    "products_mentioned": [1, "2"]
                },
                { "type": "unknown_widget" },
                { "type": "pros_cons", "pros": ["Loud"], "cons": [] },
                { "type": "specs", "specs": { "Weight": "3kg", "Watts": 50 } },
                { "type": "faqs", "faqs": [{ "question": "Why?", "answer": "Because." }] },
                { "type": "product_showcase_inline", "title": "Picks", "content": "Our picks.",
                  "products": [{ "product_id": 2, "cta_text": "Buy" }, { "product_id": 1 }] }
            ]
        }
    }))
}

fn mixed_products() -> Vec<ProductRecord> {
    products(json!([
        { "id": 1, "name": "Alpha", "slug": "alpha" },
        { "id": "2", "name": "Beta Amp" }
    ]))
}

#[test]
fn repeated_assembly_is_byte_identical() {
    let service = PostRenderService::default();
    let post = mixed_post();
    let products = mixed_products();

    let first = serde_json::to_string(&service.assemble(&post, &products)).expect("encode");
    let second = serde_json::to_string(&service.assemble(&post, &products)).expect("encode");
    assert_eq!(first, second);
}

#[test]
fn output_order_follows_input_order_and_skips_unrecognised_sections() {
    let service = PostRenderService::default();
    let assembled = service.assemble(&mixed_post(), &mixed_products());

    assert_eq!(
        kinds(&assembled.sections),
        [
            RendererKind::Markdown,
            RendererKind::ComparisonTable,
            RendererKind::ProsCons,
            RendererKind::Specs,
            RendererKind::Faqs,
            RendererKind::ProductShowcase,
        ]
    );
    let indices: Vec<usize> = assembled.sections.iter().map(|s| s.index).collect();
    assert_eq!(indices, [0, 1, 3, 4, 5, 6]);

    let toc: Vec<(&str, &str)> = assembled
        .toc
        .iter()
        .map(|entry| (entry.title.as_str(), entry.anchor_id.as_str()))
        .collect();
    assert_eq!(
        toc,
        [("Overview", "sec-0"), ("Compare", "sec-1"), ("Picks", "sec-6")]
    );
}

#[test]
fn specialised_sections_keep_their_data_verbatim() {
    let service = PostRenderService::default();
    let assembled = service.assemble(&mixed_post(), &mixed_products());

    let SectionBody::ComparisonTable {
        table,
        affiliate_products,
    } = &assembled.sections[1].body
    else {
        panic!("expected comparison table");
    };
    assert_eq!(table.headers, ["Model", "Price"]);
    assert_eq!(table.rows, [["A", "100"], ["B", "200"]]);
    let below = affiliate_products.as_ref().expect("below-table products");
    assert_eq!(below.len(), 2);
    assert!(below.iter().all(|card| card.is_resolved()));

    let SectionBody::ProsCons { pros, cons } = &assembled.sections[2].body else {
        panic!("expected pros/cons");
    };
    assert_eq!(pros, &["Loud"]);
    assert!(cons.is_empty());

    let SectionBody::Specs { specs } = &assembled.sections[3].body else {
        panic!("expected specs");
    };
    let labels: Vec<&str> = specs.iter().map(|spec| spec.label.as_str()).collect();
    assert_eq!(labels, ["Weight", "Watts"]);
    assert_eq!(specs[1].value, "50");

    let showcase = &assembled.sections[5];
    assert!(
        showcase
            .intro_html
            .as_deref()
            .is_some_and(|html| html.contains("Our picks."))
    );
    let cards = showcase.body.product_cards();
    assert_eq!(cards[0].cta_label, "Buy");
    let beta = cards[0].product.as_ref().expect("beta resolves");
    assert_eq!(beta.url, "/products/beta-amp");
    assert_eq!(cards[1].cta_label, "Check Latest Price");
}

#[test]
fn repeated_titles_get_distinct_anchors() {
    let service = PostRenderService::default();
    let assembled = service.assemble(
        &post(json!({
            "title": "Twins",
            "content_json": {
                "sections": [
                    { "type": "content", "title": "Same", "content": "one" },
                    { "type": "content", "title": "Same", "content": "two" }
                ]
            }
        })),
        &[],
    );

    let anchors: Vec<&str> = assembled
        .toc
        .iter()
        .map(|entry| entry.anchor_id.as_str())
        .collect();
    assert_eq!(anchors, ["sec-0", "sec-1"]);
    assert_ne!(
        assembled.sections[0].anchor_id,
        assembled.sections[1].anchor_id
    );
}

#[test]
fn table_without_rows_falls_back_to_content() {
    let service = PostRenderService::default();
    let assembled = service.assemble(
        &post(json!({
            "title": "Fallback",
            "content_json": {
                "sections": [
                    { "type": "comparison_table_v2", "headers": ["A"], "content": "No rows yet." },
                    { "type": "comparison_table_v2", "headers": ["A"] }
                ]
            }
        })),
        &[],
    );

    assert_eq!(kinds(&assembled.sections), [RendererKind::Markdown]);
    assert_eq!(assembled.sections[0].index, 0);
}

#[test]
fn string_encoded_document_is_decoded() {
    let service = PostRenderService::default();
    let assembled = service.assemble(
        &post(json!({
            "title": "Encoded",
            "structured_content": "{\"sections\":[{\"type\":\"content\",\"content\":\"Body\"}]}"
        })),
        &[],
    );
    assert_eq!(assembled.mode, ContentMode::Sections);
    assert_eq!(assembled.sections.len(), 1);
}

#[test]
fn shared_service_assembles_with_default_settings() {
    let post = showcase_post();
    let products = products(json!([{ "id": "42", "name": "Widget", "slug": "widget" }]));

    let shared = assemble(&post, &products);
    let local = PostRenderService::default().assemble(&post, &products);
    assert_eq!(shared, local);

    let card = &shared.sections[0].body.product_cards()[0];
    assert_eq!(
        card.product.as_ref().map(|product| product.url.as_str()),
        Some("/products/widget")
    );
    assert!(Arc::ptr_eq(&render_service(), &render_service()));
}

#[test]
fn reading_time_rounds_up() {
    let service = PostRenderService::default();
    let words = vec!["word"; 300].join(" ");
    let assembled = service.assemble(&post(json!({ "title": "Long", "content": words })), &[]);

    assert_eq!(assembled.metrics.word_count, 300);
    assert_eq!(assembled.metrics.reading_time_minutes, 2);
}

#[test]
fn render_emits_pipeline_counters() {
    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();

    metrics::with_local_recorder(&recorder, || {
        let service = PostRenderService::default();
        let _ = service.assemble(&mixed_post(), &[]);
    });

    let snapshot = snapshotter.snapshot().into_vec();
    let counter = |name: &str| -> u64 {
        snapshot
            .iter()
            .filter(|(key, _, _, _)| key.key().name() == name)
            .map(|(_, _, _, value)| match value {
                DebugValue::Counter(count) => *count,
                _ => 0,
            })
            .sum()
    };

    assert_eq!(counter("gearguide_render_posts_total"), 1);
    assert_eq!(counter("gearguide_render_sections_total"), 6);
    assert_eq!(counter("gearguide_render_sections_skipped_total"), 1);
    assert_eq!(counter("gearguide_product_unresolved_total"), 4);
}
