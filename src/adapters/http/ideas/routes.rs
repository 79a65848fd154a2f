//! Axum router configuration for idea endpoints.

use axum::{routing::post, Router};

use super::handlers::{enhance_idea, IdeasAppState};

/// Create the ideas API router.
///
/// # Routes
/// - `POST /enhance` - Enhance an idea, optionally emailing the result
pub fn ideas_routes() -> Router<IdeasAppState> {
    Router::new().route("/enhance", post(enhance_idea))
}

/// Create the ideas module router, mounted under `/ideas`.
pub fn ideas_router(state: IdeasAppState) -> Router {
    Router::new()
        .nest("/ideas", ideas_routes())
        .with_state(state)
}
