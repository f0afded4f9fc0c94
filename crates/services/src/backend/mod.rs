mod http;
pub mod wire;

use async_trait::async_trait;

use quiz_core::Score;
use quiz_core::model::{Quiz, QuizId};

use crate::error::BackendError;

pub use http::{BackendConfig, HttpQuizBackend};

/// Result posted to the quiz service once a session completes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultSubmission {
    pub quiz_id: QuizId,
    pub participant_name: String,
    pub score: Score,
}

/// Contract for the external quiz service.
#[async_trait]
pub trait QuizBackend: Send + Sync {
    /// Fetch a quiz and its questions for play.
    ///
    /// # Errors
    ///
    /// Returns `BackendError::HttpStatus` for any non-success status (for example a
    /// quiz its owner has not activated), or transport/decoding errors.
    async fn fetch_quiz(&self, id: QuizId) -> Result<Quiz, BackendError>;

    /// Persist a finished session's score. Only the response status is consulted.
    ///
    /// # Errors
    ///
    /// Returns `BackendError` when the request fails or the status is not a success.
    async fn submit_result(&self, submission: &ResultSubmission) -> Result<(), BackendError>;
}
