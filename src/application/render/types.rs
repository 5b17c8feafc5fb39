use serde::Serialize;

use crate::domain::content::SpecEntry;
use crate::domain::products::{ProductId, ProductSummary};

/// Which content shape was authoritative for a post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentMode {
    Sections,
    Flat,
    Plain,
}

/// Renderer selected for a section by the dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RendererKind {
    ProductShowcase,
    ProsCons,
    ComparisonTable,
    Specs,
    Faqs,
    Markdown,
}

impl RendererKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            RendererKind::ProductShowcase => "product_showcase",
            RendererKind::ProsCons => "pros_cons",
            RendererKind::ComparisonTable => "comparison_table",
            RendererKind::Specs => "specs",
            RendererKind::Faqs => "faqs",
            RendererKind::Markdown => "markdown",
        }
    }
}

/// A product reference ready for display. `product` is `None` when the id
/// could not be hydrated; such cards carry no link or image.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductCard {
    pub product_id: ProductId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    pub cta_label: String,
    pub product: Option<ProductSummary>,
}

impl ProductCard {
    pub fn is_resolved(&self) -> bool {
        self.product.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedFaq {
    pub question: String,
    pub answer_html: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableView {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Kind-specific payload of a rendered section.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SectionBody {
    Markdown {
        html: String,
    },
    ProductShowcase {
        cards: Vec<ProductCard>,
    },
    ProsCons {
        pros: Vec<String>,
        cons: Vec<String>,
    },
    ComparisonTable {
        table: TableView,
        #[serde(skip_serializing_if = "Option::is_none")]
        affiliate_products: Option<Vec<ProductCard>>,
    },
    Specs {
        specs: Vec<SpecEntry>,
    },
    Faqs {
        faqs: Vec<RenderedFaq>,
    },
}

impl SectionBody {
    pub fn kind(&self) -> RendererKind {
        match self {
            SectionBody::Markdown { .. } => RendererKind::Markdown,
            SectionBody::ProductShowcase { .. } => RendererKind::ProductShowcase,
            SectionBody::ProsCons { .. } => RendererKind::ProsCons,
            SectionBody::ComparisonTable { .. } => RendererKind::ComparisonTable,
            SectionBody::Specs { .. } => RendererKind::Specs,
            SectionBody::Faqs { .. } => RendererKind::Faqs,
        }
    }

    /// Product cards carried by this body, in display order.
    pub fn product_cards(&self) -> &[ProductCard] {
        match self {
            SectionBody::ProductShowcase { cards } => cards.as_slice(),
            SectionBody::ComparisonTable {
                affiliate_products: Some(cards),
                ..
            } => cards.as_slice(),
            _ => &[],
        }
    }
}

/// View-ready description of one section. Needs no further conversion by the
/// presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedSection {
    /// Position of the structural unit this section was rendered from.
    pub index: usize,
    /// `sec-<index>`; stable across repeated or empty titles.
    pub anchor_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub source_type: String,
    /// Markdown that accompanied a specialised section, rendered ahead of it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub intro_html: Option<String>,
    #[serde(flatten)]
    pub body: SectionBody,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TocEntry {
    pub title: String,
    pub anchor_id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
pub struct ContentMetrics {
    pub word_count: u32,
    pub reading_time_minutes: u32,
    pub product_reference_count: u32,
    pub unresolved_product_count: u32,
}

/// Everything the page layer needs to lay out one post.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssembledPost {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    pub mode: ContentMode,
    pub sections: Vec<RenderedSection>,
    pub toc: Vec<TocEntry>,
    pub has_faqs: bool,
    pub metrics: ContentMetrics,
}

pub fn anchor_id(index: usize) -> String {
    format!("sec-{index}")
}
