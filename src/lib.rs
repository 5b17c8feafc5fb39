//! Structured buying-guide rendering for the instrument price-comparison blog.

pub mod application;
pub mod config;
pub mod domain;
pub mod infra;
pub mod presentation;
