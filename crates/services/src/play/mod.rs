mod driver;
mod progress;
mod service;
mod session;

pub use driver::{PlayEvent, PlayLoop, PlayerInput};
pub use progress::PlayProgress;
pub use service::{PlayService, PlayStep};
pub use session::{
    Advance, Persistence, PlayPhase, PlaySession, SubmitResult, SubmitTicket, Tick,
};

/// Monotonic now, read through tokio so paused-time tests can drive it.
pub(crate) fn now() -> std::time::Instant {
    tokio::time::Instant::now().into_std()
}
