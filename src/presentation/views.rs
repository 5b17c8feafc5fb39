use askama::{Error as AskamaError, Template};
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use thiserror::Error;

use crate::application::error::HttpError;
use crate::application::render::{
    AssembledPost, ContentMode, ProductCard, RenderedFaq, RenderedSection, SectionBody, TableView,
    TocEntry,
};
use crate::domain::content::SpecEntry;

#[derive(Debug, Error)]
#[error("{public_message}")]
pub struct TemplateRenderError {
    pub(crate) source: &'static str,
    pub(crate) public_message: &'static str,
    #[source]
    pub(crate) error: AskamaError,
}

impl TemplateRenderError {
    pub fn new(source: &'static str, public_message: &'static str, error: AskamaError) -> Self {
        Self {
            source,
            public_message,
            error,
        }
    }
}

impl From<TemplateRenderError> for HttpError {
    fn from(err: TemplateRenderError) -> Self {
        let TemplateRenderError {
            source,
            public_message,
            error,
        } = err;

        HttpError::from_error(
            source,
            StatusCode::INTERNAL_SERVER_ERROR,
            public_message,
            &error,
        )
    }
}

pub fn render_template<T: Template>(template: T) -> Result<Html<String>, HttpError> {
    render_html(template).map(Html).map_err(HttpError::from)
}

pub fn render_template_response<T: Template>(template: T, status: StatusCode) -> Response {
    match render_template(template) {
        Ok(html) => (status, html).into_response(),
        Err(err) => err.into_response(),
    }
}

fn render_html<T: Template>(template: T) -> Result<String, TemplateRenderError> {
    template.render().map_err(|err| {
        TemplateRenderError::new(
            "presentation::views::render_template",
            "Template rendering failed",
            err,
        )
    })
}

/// Render an assembled post to a standalone `<article>` fragment.
pub fn render_post_article(post: &AssembledPost) -> Result<String, TemplateRenderError> {
    render_html(PostArticleTemplate {
        view: ArticleView::from(post),
    })
}

#[derive(Template)]
#[template(path = "post_article.html")]
pub struct PostArticleTemplate {
    pub view: ArticleView,
}

impl From<&AssembledPost> for PostArticleTemplate {
    fn from(post: &AssembledPost) -> Self {
        Self {
            view: ArticleView::from(post),
        }
    }
}

#[derive(Clone)]
pub struct ArticleView {
    pub title: String,
    pub author: Option<String>,
    pub mode: &'static str,
    pub reading_time: Option<String>,
    pub toc: Vec<TocEntry>,
    pub sections: Vec<SectionView>,
}

impl From<&AssembledPost> for ArticleView {
    fn from(post: &AssembledPost) -> Self {
        let minutes = post.metrics.reading_time_minutes;
        Self {
            title: post.title.clone(),
            author: post.author.clone(),
            mode: match post.mode {
                ContentMode::Sections => "sections",
                ContentMode::Flat => "flat",
                ContentMode::Plain => "plain",
            },
            reading_time: (minutes > 0).then(|| format!("{minutes} min read")),
            toc: post.toc.clone(),
            sections: post.sections.iter().map(SectionView::from).collect(),
        }
    }
}

/// One section flattened for the template: exactly one body block is
/// populated, selected by `kind`.
#[derive(Clone)]
pub struct SectionView {
    pub anchor_id: String,
    pub kind: &'static str,
    pub title: Option<String>,
    pub intro_html: Option<String>,
    pub markdown_html: Option<String>,
    pub cards: Vec<CardView>,
    pub pros_cons: Option<ProsConsView>,
    pub table: Option<TableView>,
    pub affiliate_cards: Vec<CardView>,
    pub specs: Vec<SpecEntry>,
    pub faqs: Vec<RenderedFaq>,
}

impl From<&RenderedSection> for SectionView {
    fn from(section: &RenderedSection) -> Self {
        let mut view = Self {
            anchor_id: section.anchor_id.clone(),
            kind: section.body.kind().as_str(),
            title: section.title.clone(),
            intro_html: section.intro_html.clone(),
            markdown_html: None,
            cards: Vec::new(),
            pros_cons: None,
            table: None,
            affiliate_cards: Vec::new(),
            specs: Vec::new(),
            faqs: Vec::new(),
        };

        match &section.body {
            SectionBody::Markdown { html } => view.markdown_html = Some(html.clone()),
            SectionBody::ProductShowcase { cards } => {
                view.cards = cards.iter().map(CardView::from).collect();
            }
            SectionBody::ProsCons { pros, cons } => {
                view.pros_cons = Some(ProsConsView {
                    pros: pros.clone(),
                    cons: cons.clone(),
                });
            }
            SectionBody::ComparisonTable {
                table,
                affiliate_products,
            } => {
                view.table = Some(table.clone());
                view.affiliate_cards = affiliate_products
                    .iter()
                    .flatten()
                    .map(CardView::from)
                    .collect();
            }
            SectionBody::Specs { specs } => view.specs = specs.clone(),
            SectionBody::Faqs { faqs } => view.faqs = faqs.clone(),
        }

        view
    }
}

#[derive(Clone)]
pub struct ProsConsView {
    pub pros: Vec<String>,
    pub cons: Vec<String>,
}

/// Product card ready for markup. Unresolved references carry neither `href`
/// nor `image_url`.
#[derive(Clone)]
pub struct CardView {
    pub name: Option<String>,
    pub href: Option<String>,
    pub image_url: Option<String>,
    pub brand: Option<String>,
    pub price: Option<String>,
    pub position: Option<u32>,
    pub context: Option<String>,
    pub cta_label: String,
}

impl From<&ProductCard> for CardView {
    fn from(card: &ProductCard) -> Self {
        let product = card.product.as_ref();
        Self {
            name: product.map(|p| p.name.clone()),
            href: product.map(|p| p.url.clone()),
            image_url: product.and_then(|p| p.image_url.clone()),
            brand: product.and_then(|p| p.brand.clone()),
            price: product.and_then(|p| {
                p.lowest_price
                    .map(|price| price_label(price, p.currency.as_deref()))
            }),
            position: card.position,
            context: card.context.clone(),
            cta_label: card.cta_label.clone(),
        }
    }
}

fn price_label(price: f64, currency: Option<&str>) -> String {
    match currency {
        Some(currency) => format!("From {currency} {price:.2}"),
        None => format!("From {price:.2}"),
    }
}
