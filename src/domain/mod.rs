//! Domain layer types and invariants.

pub mod content;
pub mod error;
pub(crate) mod lenient;
pub mod posts;
pub mod products;
