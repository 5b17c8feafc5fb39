//! HTTP preview service over the render pipeline.

pub mod api;
mod middleware;
mod public;

use std::sync::Arc;

use axum::{Router, extract::DefaultBodyLimit, middleware as axum_middleware};

use crate::application::render::PostRenderService;

pub use middleware::{REQUEST_ID_HEADER, RequestContext};

#[derive(Clone)]
pub struct HttpState {
    pub render: Arc<PostRenderService>,
}

impl HttpState {
    pub fn new(render: Arc<PostRenderService>) -> Self {
        Self { render }
    }
}

/// Build the full router: JSON render API, HTML preview and health probe.
pub fn build_router(state: HttpState, max_request_bytes: usize) -> Router {
    Router::new()
        .merge(api::build_api_router())
        .merge(public::build_public_router())
        .with_state(state)
        .layer(DefaultBodyLimit::max(max_request_bytes))
        .layer(axum_middleware::from_fn(middleware::log_responses))
        .layer(axum_middleware::from_fn(middleware::set_request_context))
}
