//! HTTP handlers for idea endpoints.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::application::handlers::EnhanceIdeaHandler;
use crate::domain::idea::{EnhancementError, IdeaSubmission, SubmissionError};

use super::dto::{EnhanceIdeaRequest, ErrorResponse};

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct IdeasAppState {
    pub handler: Arc<EnhanceIdeaHandler>,
}

impl IdeasAppState {
    pub fn new(handler: Arc<EnhanceIdeaHandler>) -> Self {
        Self { handler }
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// HTTP handlers
// ════════════════════════════════════════════════════════════════════════════════

/// POST /api/ideas/enhance - Enhance an idea and optionally email the result
pub async fn enhance_idea(
    State(state): State<IdeasAppState>,
    payload: Result<Json<EnhanceIdeaRequest>, JsonRejection>,
) -> Result<impl IntoResponse, IdeasApiError> {
    let Json(req) = payload?;

    let submission = IdeaSubmission::new(
        req.idea.as_deref(),
        req.send_email.unwrap_or(false),
        req.email.as_deref(),
    )?;

    tracing::info!(
        idea_chars = submission.idea().chars().count(),
        send_email = submission.send_email(),
        "Enhancing idea"
    );

    let result = state.handler.handle(submission).await?;

    Ok(Json(result))
}

// ════════════════════════════════════════════════════════════════════════════════
// Error Handling
// ════════════════════════════════════════════════════════════════════════════════

/// API error type that converts domain errors to HTTP responses.
#[derive(Debug)]
pub enum IdeasApiError {
    /// Body was not valid JSON for the request shape.
    MalformedBody(String),
    /// Request fields failed boundary validation.
    Submission(SubmissionError),
    /// The enhancement stage failed.
    Enhancement(EnhancementError),
}

impl From<JsonRejection> for IdeasApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::MalformedBody(rejection.body_text())
    }
}

impl From<SubmissionError> for IdeasApiError {
    fn from(err: SubmissionError) -> Self {
        Self::Submission(err)
    }
}

impl From<EnhancementError> for IdeasApiError {
    fn from(err: EnhancementError) -> Self {
        Self::Enhancement(err)
    }
}

impl IntoResponse for IdeasApiError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            IdeasApiError::MalformedBody(reason) => {
                tracing::debug!("Rejected request body: {}", reason);
                (
                    StatusCode::BAD_REQUEST,
                    ErrorResponse::new("INVALID_REQUEST_BODY", "Request body must be valid JSON"),
                )
            }
            IdeasApiError::Submission(err) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse::with_details(
                    "INVALID_SUBMISSION",
                    err.to_string(),
                    serde_json::json!({ "field": submission_field(err) }),
                ),
            ),
            IdeasApiError::Enhancement(err) => {
                let (status, code) = match err {
                    EnhancementError::Validation(_) => {
                        (StatusCode::UNPROCESSABLE_ENTITY, "IDEA_REJECTED")
                    }
                    EnhancementError::RateLimited(_) => {
                        (StatusCode::INTERNAL_SERVER_ERROR, "AI_RATE_LIMITED")
                    }
                    EnhancementError::Processing(_) => {
                        (StatusCode::INTERNAL_SERVER_ERROR, "PROCESSING_FAILED")
                    }
                };
                (status, ErrorResponse::new(code, err.message()))
            }
        };

        (status, Json(body)).into_response()
    }
}

fn submission_field(err: &SubmissionError) -> &'static str {
    match err {
        SubmissionError::IdeaMissing | SubmissionError::IdeaTooShort { .. } => "idea",
        SubmissionError::RecipientRequired | SubmissionError::InvalidRecipient => "email",
    }
}
