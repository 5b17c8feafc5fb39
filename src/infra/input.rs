//! Post and product payloads read from disk or request bodies.

use std::path::Path;

use serde_json::Value;
use tracing::debug;

use crate::domain::{error::DomainError, posts::BlogPost, products::ProductRecord};

use super::error::InfraError;

/// A post plus the products that seed its hydration map.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderInput {
    pub post: BlogPost,
    pub products: Vec<ProductRecord>,
}

impl RenderInput {
    /// Accepts a bare post object or an API envelope `{ "post", "products" }`.
    /// Without an explicit product list the post's attached products are used.
    pub fn from_document(value: Value) -> Result<Self, DomainError> {
        let Value::Object(mut map) = value else {
            return Err(DomainError::validation("post payload must be a JSON object"));
        };

        match map.remove("post") {
            Some(post @ Value::Object(_)) => {
                let products = map.remove("products").map(product_list).transpose()?;
                Ok(Self::new(BlogPost::from(post), products))
            }
            Some(Value::Null) | None => Ok(Self::new(BlogPost::from_map(&map), None)),
            Some(_) => Err(DomainError::validation("`post` must be a JSON object")),
        }
    }

    pub fn new(post: BlogPost, products: Option<Vec<ProductRecord>>) -> Self {
        let products = products.unwrap_or_else(|| post.products.clone());
        Self { post, products }
    }

    pub fn with_products(mut self, products: Vec<ProductRecord>) -> Self {
        self.products = products;
        self
    }
}

/// Accepts an array of products or an object wrapping one under `products`.
pub fn product_list(value: Value) -> Result<Vec<ProductRecord>, DomainError> {
    match value {
        Value::Array(items) => Ok(items.into_iter().map(ProductRecord::from).collect()),
        Value::Object(mut map) => match map.remove("products") {
            Some(Value::Array(items)) => Ok(items.into_iter().map(ProductRecord::from).collect()),
            _ => Err(DomainError::validation(
                "product object must carry a `products` array",
            )),
        },
        Value::Null => Ok(Vec::new()),
        _ => Err(DomainError::validation(
            "products must be an array or an object with a `products` array",
        )),
    }
}

/// Read a post file and, optionally, a separate product file that replaces
/// any products found in the post file.
pub async fn load_render_input(
    post_path: &Path,
    products_path: Option<&Path>,
) -> Result<RenderInput, InfraError> {
    let document = read_json(post_path).await?;
    let mut input = RenderInput::from_document(document)
        .map_err(|err| InfraError::input(post_path, err.to_string()))?;

    if let Some(path) = products_path {
        let products = product_list(read_json(path).await?)
            .map_err(|err| InfraError::input(path, err.to_string()))?;
        input = input.with_products(products);
    }

    debug!(
        target = "gearguide::infra::input",
        post = %post_path.display(),
        products = input.products.len(),
        "render input loaded"
    );
    Ok(input)
}

async fn read_json(path: &Path) -> Result<Value, InfraError> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|err| InfraError::input(path, err.to_string()))?;
    serde_json::from_slice(&bytes).map_err(|err| InfraError::input(path, err.to_string()))
}
