use std::collections::HashMap;

use tracing::debug;

use crate::domain::products::{ProductId, ProductRecord, ProductSummary};

/// Product summaries available to one render, keyed by normalised id.
///
/// Built fresh per post from data already in hand; lookups never fetch.
#[derive(Debug, Clone, Default)]
pub struct HydrationMap {
    entries: HashMap<ProductId, ProductSummary>,
}

impl HydrationMap {
    /// Records without an id are skipped. When an id repeats, the first
    /// record wins.
    pub fn build(records: &[ProductRecord], base_path: &str) -> Self {
        let mut entries = HashMap::with_capacity(records.len());

        for record in records {
            let Some(summary) = ProductSummary::from_record(record, base_path) else {
                debug!(
                    target = "gearguide::render::hydration",
                    name = record.name.as_deref().unwrap_or_default(),
                    "skipping product without id"
                );
                continue;
            };
            if entries.contains_key(&summary.id) {
                debug!(
                    target = "gearguide::render::hydration",
                    product_id = %summary.id,
                    "ignoring duplicate product record"
                );
                continue;
            }
            entries.insert(summary.id.clone(), summary);
        }

        Self { entries }
    }

    /// `None` marks an unknown product; callers degrade to inline context.
    pub fn resolve(&self, id: &ProductId) -> Option<&ProductSummary> {
        self.entries.get(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
