use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::Response,
    routing::{get, post},
};

use crate::presentation::views::{PostArticleTemplate, render_template_response};

use super::HttpState;
use super::api::{error::ApiError, handlers::RenderRequest};

pub(super) fn build_public_router() -> Router<HttpState> {
    Router::new()
        .route("/preview", post(preview_post))
        .route("/_health", get(health))
}

async fn health() -> StatusCode {
    StatusCode::NO_CONTENT
}

async fn preview_post(
    State(state): State<HttpState>,
    payload: Result<Json<RenderRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(request) = payload?;
    let input = request.into_input()?;
    let assembled = state.render.assemble(&input.post, &input.products);
    Ok(render_template_response(
        PostArticleTemplate::from(&assembled),
        StatusCode::OK,
    ))
}
