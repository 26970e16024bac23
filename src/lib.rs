//! Caption relay: accepts a text prompt plus an optional image (URL, local
//! path, or inline base64), forwards both to Gemini, and returns the
//! generated caption with usage metadata.

pub mod config;
pub mod dtos;
pub mod error;
pub mod handler;
pub mod handlers;
pub mod middleware;
pub mod services;
pub mod startup;
