use std::fs;

use gearguide::application::render::PostRenderService;
use gearguide::infra::{error::InfraError, input::load_render_input};
use serde_json::json;
use tempfile::tempdir;

#[tokio::test]
async fn loads_envelope_with_separate_product_file() {
    let dir = tempdir().expect("tempdir");
    let post_path = dir.path().join("post.json");
    let products_path = dir.path().join("products.json");

    fs::write(
        &post_path,
        json!({
            "post": {
                "title": "Budget Pedals",
                "content_json": {
                    "quick_picks": [
                        { "product_id": 5, "reason": "Cheap and cheerful" },
                        { "product_id": 6, "reason": "Studio quiet" }
                    ]
                }
            },
            "products": [{ "id": 5, "name": "Ignored" }]
        })
        .to_string(),
    )
    .expect("write post");
    fs::write(
        &products_path,
        json!({ "products": [{ "id": 5, "name": "Fuzz One" }, { "id": 6, "name": "Hush" }] })
            .to_string(),
    )
    .expect("write products");

    let input = load_render_input(&post_path, Some(&products_path))
        .await
        .expect("input loads");
    assert_eq!(input.products.len(), 2);

    let assembled = PostRenderService::default().assemble(&input.post, &input.products);
    let cards = assembled.sections[0].body.product_cards();
    let names: Vec<&str> = cards
        .iter()
        .filter_map(|card| card.product.as_ref().map(|product| product.name.as_str()))
        .collect();
    assert_eq!(names, ["Fuzz One", "Hush"]);
    assert_eq!(cards[1].position, Some(2));
    assert_eq!(assembled.sections[0].title.as_deref(), Some("Quick Picks"));
}

#[tokio::test]
async fn bare_post_file_uses_attached_products() {
    let dir = tempdir().expect("tempdir");
    let post_path = dir.path().join("post.json");
    fs::write(
        &post_path,
        json!({
            "title": "Attached",
            "products": [{ "id": 1, "name": "One" }],
            "content": "Plain body"
        })
        .to_string(),
    )
    .expect("write post");

    let input = load_render_input(&post_path, None).await.expect("input loads");
    assert_eq!(input.post.title, "Attached");
    assert_eq!(input.products.len(), 1);
}

#[tokio::test]
async fn missing_file_reports_its_path() {
    let dir = tempdir().expect("tempdir");
    let missing = dir.path().join("nope.json");

    let err = load_render_input(&missing, None)
        .await
        .expect_err("missing file");
    match err {
        InfraError::Input { path, .. } => assert_eq!(path, missing),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn invalid_json_is_an_input_error() {
    let dir = tempdir().expect("tempdir");
    let post_path = dir.path().join("post.json");
    fs::write(&post_path, "{ broken").expect("write post");

    let err = load_render_input(&post_path, None)
        .await
        .expect_err("invalid json");
    assert!(matches!(err, InfraError::Input { .. }));
}

#[tokio::test]
async fn product_file_with_wrong_shape_is_rejected() {
    let dir = tempdir().expect("tempdir");
    let post_path = dir.path().join("post.json");
    let products_path = dir.path().join("products.json");
    fs::write(&post_path, json!({ "title": "T" }).to_string()).expect("write post");
    fs::write(&products_path, "42").expect("write products");

    let err = load_render_input(&post_path, Some(&products_path))
        .await
        .expect_err("bad products");
    match err {
        InfraError::Input { path, .. } => assert_eq!(path, products_path),
        other => panic!("unexpected error: {other:?}"),
    }
}
