//! Presentation layer: askama views over assembled posts.

pub mod views;
