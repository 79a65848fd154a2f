//! Application handlers.
//!
//! Command handlers that orchestrate domain operations across ports.

pub mod ideas;

pub use ideas::EnhanceIdeaHandler;
