//! Structured content rendering.
//!
//! The pipeline is pure: it takes a post plus whatever products came with it
//! and returns view-ready sections. Nothing here performs I/O, and malformed
//! input degrades to less output rather than an error.

mod assemble;
mod dispatch;
mod hydration;
mod markdown;
mod normalize;
mod sections;
mod service;
mod types;

pub use dispatch::dispatch;
pub use hydration::HydrationMap;
pub use markdown::{MarkdownRenderer, RenderedMarkdown};
pub use normalize::{NormalizedContent, normalize};
pub use sections::{RenderContext, SectionRender, render_section};
pub use service::{
    PostRenderService, RenderConfigError, RenderPipelineConfig, assemble,
    configure_render_service, render_service,
};
pub use types::{
    AssembledPost, ContentMetrics, ContentMode, ProductCard, RenderedFaq, RenderedSection,
    RendererKind, SectionBody, TableView, TocEntry, anchor_id,
};

