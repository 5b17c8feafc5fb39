//! Application services: the rendering pipeline and the errors it surfaces
//! to callers.

pub mod error;
pub mod render;
