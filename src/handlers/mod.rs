//! HTTP handlers for the relay's axum surface.

pub mod generate;
pub mod health;

pub use generate::{generate_caption, method_not_allowed};
pub use health::health_check;
