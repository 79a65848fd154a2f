//! Idea module - submissions, enhancement results, and the AI output contract.
//!
//! - `submission` - Validated inbound idea (`IdeaSubmission`)
//! - `enhanced_idea` - `EnhancedIdea` and the `EnhancementResult` payload
//! - `prompt` - Deterministic prompt construction
//! - `extractor` - Defensive parsing of model output
//! - `errors` - Error taxonomy for the enhancement flow

mod enhanced_idea;
mod errors;
mod extractor;
mod prompt;
mod submission;

pub use enhanced_idea::{EnhancedIdea, EnhancementResult};
pub use errors::{
    EnhancementError, NotificationError, SubmissionError, DEFAULT_REJECTION_MESSAGE,
    PROCESSING_FAILED_MESSAGE, RATE_LIMITED_MESSAGE,
};
pub use extractor::{strip_code_fences, ExtractionError, IdeaExtractor};
pub use prompt::{build_enhancement_prompt, SYSTEM_PROMPT};
pub use submission::{is_valid_email, IdeaSubmission, MIN_IDEA_LENGTH};
