//! Chooses the renderer for a single section.
//!
//! A specialised renderer applies when the section's `type` tag contains the
//! renderer's token (case-insensitively) *and* the section carries the data
//! that renderer needs. Capabilities are checked in a fixed priority order;
//! anything left over renders as markdown when it has content and is skipped
//! otherwise.

use crate::domain::content::Section;

use super::types::RendererKind;

struct Capability {
    token: &'static str,
    kind: RendererKind,
    satisfied_by: fn(&Section) -> bool,
}

const CAPABILITIES: [Capability; 5] = [
    Capability {
        token: "product_showcase_inline",
        kind: RendererKind::ProductShowcase,
        satisfied_by: has_products,
    },
    Capability {
        token: "pros_cons",
        kind: RendererKind::ProsCons,
        satisfied_by: has_pros_or_cons,
    },
    Capability {
        token: "comparison_table",
        kind: RendererKind::ComparisonTable,
        satisfied_by: has_table,
    },
    Capability {
        token: "specs",
        kind: RendererKind::Specs,
        satisfied_by: has_specs,
    },
    Capability {
        token: "faqs",
        kind: RendererKind::Faqs,
        satisfied_by: has_faqs,
    },
];

fn has_products(section: &Section) -> bool {
    section.products.as_ref().is_some_and(|products| !products.is_empty())
}

/// Empty lists still count; the renderer shows them as empty.
fn has_pros_or_cons(section: &Section) -> bool {
    section.pros.is_some() || section.cons.is_some()
}

fn has_table(section: &Section) -> bool {
    section.headers.is_some() && section.rows.is_some()
}

fn has_specs(section: &Section) -> bool {
    section.specs.as_ref().is_some_and(|specs| !specs.is_empty())
}

fn has_faqs(section: &Section) -> bool {
    section.faqs.as_ref().is_some_and(|faqs| !faqs.is_empty())
}

/// `None` means the section has nothing renderable and is omitted.
pub fn dispatch(section: &Section) -> Option<RendererKind> {
    let tag = section.kind_tag.to_ascii_lowercase();

    CAPABILITIES
        .iter()
        .find(|capability| tag.contains(capability.token) && (capability.satisfied_by)(section))
        .map(|capability| capability.kind)
        .or_else(|| section.body_text().map(|_| RendererKind::Markdown))
}
