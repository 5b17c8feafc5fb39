pub mod error;
pub mod handlers;

use axum::{Router, routing::post};

use super::HttpState;

pub fn build_api_router() -> Router<HttpState> {
    Router::new().route("/api/v1/render", post(handlers::render_post))
}
