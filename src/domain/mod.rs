//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `idea` - Idea submissions, enhanced ideas, and the AI output contract

pub mod idea;
