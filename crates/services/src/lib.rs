#![forbid(unsafe_code)]

pub mod backend;
pub mod error;
pub mod play;

pub use quiz_core::Clock;

pub use backend::{BackendConfig, HttpQuizBackend, QuizBackend, ResultSubmission};
pub use error::{
    BackendConfigError, BackendError, JoinError, SessionError, SubmissionTransportError,
};
pub use play::{
    Persistence, PlayEvent, PlayLoop, PlayPhase, PlayProgress, PlayService, PlaySession,
    PlayStep, PlayerInput, SubmitResult,
};
