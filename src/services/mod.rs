//! Core services of the relay: image resolution, duplicate detection, and
//! the generation pipeline itself.

pub mod dedup;
pub mod image;
pub mod providers;
pub mod relay;

pub use dedup::ImageRegistry;
pub use image::{ImageResolver, ImageSource, ResolvedImage};
pub use relay::CaptionService;
