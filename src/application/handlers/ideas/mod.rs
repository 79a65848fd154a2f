//! Idea handlers.

mod enhance_idea;

pub use enhance_idea::EnhanceIdeaHandler;
