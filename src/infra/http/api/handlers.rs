use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use serde::Deserialize;
use serde_json::Value;

use crate::application::render::AssembledPost;
use crate::domain::{error::DomainError, posts::BlogPost};
use crate::infra::{
    http::HttpState,
    input::{RenderInput, product_list},
};

use super::error::ApiError;

/// Body of a render request. `products` replaces the post's attached products
/// when present.
#[derive(Debug, Deserialize)]
pub struct RenderRequest {
    pub post: Value,
    #[serde(default)]
    pub products: Option<Value>,
}

impl RenderRequest {
    pub fn into_input(self) -> Result<RenderInput, DomainError> {
        let post = match self.post {
            post @ Value::Object(_) => BlogPost::from(post),
            _ => return Err(DomainError::validation("`post` must be a JSON object")),
        };
        let products = self.products.map(product_list).transpose()?;
        Ok(RenderInput::new(post, products))
    }
}

pub async fn render_post(
    State(state): State<HttpState>,
    payload: Result<Json<RenderRequest>, JsonRejection>,
) -> Result<Json<AssembledPost>, ApiError> {
    let Json(request) = payload?;
    let input = request.into_input()?;
    Ok(Json(state.render.assemble(&input.post, &input.products)))
}
