//! HTTP middleware for the relay.

pub mod cors;

pub use cors::cors_middleware;
