//! HTTP adapter for idea endpoints.
//!
//! - `POST /api/ideas/enhance` - Enhance a rough idea into a structured plan

mod dto;
mod handlers;
mod routes;

pub use dto::{EnhanceIdeaRequest, ErrorResponse};
pub use handlers::{enhance_idea, IdeasApiError, IdeasAppState};
pub use routes::{ideas_router, ideas_routes};
