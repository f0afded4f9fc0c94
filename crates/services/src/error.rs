//! Shared error types for the services crate.

use thiserror::Error;

use quiz_core::model::{ParticipantError, QuestionError, QuizError, QuizId};

/// Errors emitted by a `QuizBackend`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum BackendError {
    #[error("quiz service responded with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error("quiz service sent malformed json: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("quiz service sent an unusable quiz: {0}")]
    InvalidQuiz(#[from] QuizError),
    #[error("quiz service sent an unusable question #{number}: {source}", number = .ordinal + 1)]
    InvalidQuestion {
        ordinal: usize,
        source: QuestionError,
    },
}

/// Errors emitted while joining a quiz. The session stays unjoined.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum JoinError {
    #[error(transparent)]
    Participant(#[from] ParticipantError),
    #[error("quiz has not started yet (status {status})")]
    NotStarted { status: reqwest::StatusCode },
    #[error("could not reach the quiz service: {0}")]
    Network(#[source] BackendError),
    #[error("quiz cannot be played: {0}")]
    InvalidQuiz(#[source] BackendError),
    #[error("already playing quiz {0}")]
    AlreadyJoined(QuizId),
}

impl From<BackendError> for JoinError {
    fn from(err: BackendError) -> Self {
        match err {
            BackendError::HttpStatus(status) => Self::NotStarted { status },
            BackendError::Http(_) => Self::Network(err),
            BackendError::Decode(_)
            | BackendError::InvalidQuiz(_)
            | BackendError::InvalidQuestion { .. } => {
                Self::InvalidQuiz(err)
            }
        }
    }
}

/// Non-fatal: the result was computed locally but the backend did not confirm it.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("result may not be saved: {reason}")]
pub struct SubmissionTransportError {
    reason: String,
}

impl SubmissionTransportError {
    pub(crate) fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    #[must_use]
    pub fn reason(&self) -> &str {
        &self.reason
    }
}

impl From<&BackendError> for SubmissionTransportError {
    fn from(err: &BackendError) -> Self {
        Self::new(err.to_string())
    }
}

/// Programming defects in how a session is driven.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionError {
    #[error("session has not joined a quiz")]
    NotJoined,
    #[error("session has already joined a quiz")]
    AlreadyJoined,
    #[error("submission ticket does not match the pending submission")]
    ForeignTicket,
}

/// Errors emitted while building a backend from configuration.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum BackendConfigError {
    #[error("invalid quiz service url `{raw}`: {source}")]
    InvalidUrl {
        raw: String,
        source: url::ParseError,
    },
    #[error("quiz service url must be http or https: {0}")]
    UnsupportedScheme(String),
    #[error("invalid value for {name}: {raw}")]
    Invalid { name: &'static str, raw: String },
    #[error(transparent)]
    Client(#[from] reqwest::Error),
}
