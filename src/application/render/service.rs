use std::sync::Arc;

use once_cell::sync::{Lazy, OnceCell};
use thiserror::Error;
use tracing::debug;

use crate::config::{DEFAULT_CTA_LABEL, DEFAULT_PRODUCT_BASE_PATH, DEFAULT_WORDS_PER_MINUTE};
use crate::domain::posts::BlogPost;
use crate::domain::products::ProductRecord;

use super::assemble::assemble_post;
use super::hydration::HydrationMap;
use super::markdown::MarkdownRenderer;
use super::sections::RenderContext;
use super::types::AssembledPost;

/// Settings that shape rendered output but not the section model itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderPipelineConfig {
    pub product_base_path: String,
    pub default_cta_label: String,
    pub words_per_minute: u32,
}

impl Default for RenderPipelineConfig {
    fn default() -> Self {
        Self {
            product_base_path: DEFAULT_PRODUCT_BASE_PATH.to_string(),
            default_cta_label: DEFAULT_CTA_LABEL.to_string(),
            words_per_minute: DEFAULT_WORDS_PER_MINUTE,
        }
    }
}

impl From<&crate::config::RenderSettings> for RenderPipelineConfig {
    fn from(settings: &crate::config::RenderSettings) -> Self {
        Self {
            product_base_path: settings.product_base_path.clone(),
            default_cta_label: settings.default_cta_label.clone(),
            words_per_minute: settings.words_per_minute.get(),
        }
    }
}

/// Turns blog posts into ordered, view-ready sections.
///
/// Holds only immutable state, so one instance is shared across requests and
/// every call is independent of the others.
pub struct PostRenderService {
    markdown: MarkdownRenderer,
    config: RenderPipelineConfig,
}

impl PostRenderService {
    pub fn new(config: RenderPipelineConfig) -> Self {
        Self {
            markdown: MarkdownRenderer::new(),
            config,
        }
    }

    /// Render `post`, hydrating product references from `products`.
    pub fn assemble(&self, post: &BlogPost, products: &[ProductRecord]) -> AssembledPost {
        let hydration = HydrationMap::build(products, &self.config.product_base_path);
        debug!(
            target = "gearguide::render::hydration",
            supplied = products.len(),
            hydrated = hydration.len(),
            "hydration map built"
        );
        let ctx = RenderContext {
            hydration: &hydration,
            markdown: &self.markdown,
            default_cta_label: &self.config.default_cta_label,
        };
        assemble_post(post, &ctx, self.config.words_per_minute)
    }
}

impl Default for PostRenderService {
    fn default() -> Self {
        Self::new(RenderPipelineConfig::default())
    }
}

#[derive(Debug, Error)]
pub enum RenderConfigError {
    #[error("render service already configured")]
    AlreadyConfigured,
}

static RENDER_PIPELINE_CONFIG: OnceCell<RenderPipelineConfig> = OnceCell::new();

static RENDER_SERVICE: Lazy<Arc<PostRenderService>> =
    Lazy::new(|| Arc::new(PostRenderService::new(active_render_config())));

/// Fix the configuration used by [`render_service`]. Must run before the
/// first call to it; later calls are rejected.
pub fn configure_render_service(config: RenderPipelineConfig) -> Result<(), RenderConfigError> {
    RENDER_PIPELINE_CONFIG
        .set(config)
        .map_err(|_| RenderConfigError::AlreadyConfigured)
}

fn active_render_config() -> RenderPipelineConfig {
    RENDER_PIPELINE_CONFIG.get().cloned().unwrap_or_default()
}

/// Access the shared render service instance, initialised on first use.
pub fn render_service() -> Arc<PostRenderService> {
    Arc::clone(&RENDER_SERVICE)
}

/// Render `post` with the shared service.
pub fn assemble(post: &BlogPost, products: &[ProductRecord]) -> AssembledPost {
    render_service().assemble(post, products)
}
