use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use quiz_core::model::{Participant, Quiz};
use quiz_core::{Clock, PlayConfig};

use super::now;
use super::session::{Advance, Persistence, PlaySession, SubmitResult, SubmitTicket, Tick};
use crate::backend::{QuizBackend, ResultSubmission};
use crate::error::{JoinError, SessionError, SubmissionTransportError};

/// What a driving call did to the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayStep {
    /// Nothing to do: not in progress, or submission already begun.
    Idle,
    Counting { remaining: Duration },
    MovedToNext { ordinal: usize },
    Completed(SubmitResult),
}

/// Drives `PlaySession`s against a `QuizBackend`.
#[derive(Clone)]
pub struct PlayService {
    clock: Clock,
    config: PlayConfig,
    backend: Arc<dyn QuizBackend>,
}

impl PlayService {
    #[must_use]
    pub fn new(backend: Arc<dyn QuizBackend>, config: PlayConfig) -> Self {
        Self {
            clock: Clock::default(),
            config,
            backend,
        }
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    #[must_use]
    pub fn config(&self) -> &PlayConfig {
        &self.config
    }

    #[must_use]
    pub fn clock(&self) -> Clock {
        self.clock
    }

    pub(crate) fn backend(&self) -> Arc<dyn QuizBackend> {
        Arc::clone(&self.backend)
    }

    #[must_use]
    pub fn new_session(&self) -> PlaySession {
        PlaySession::new(self.config)
    }

    /// Validate the form, load the quiz and start on its first question.
    ///
    /// # Errors
    ///
    /// Returns `JoinError` for bad input, a quiz that is not active, an
    /// unreachable backend or an unplayable payload. The session is untouched
    /// on error.
    pub async fn join<'s>(
        &self,
        session: &'s mut PlaySession,
        name: &str,
        quiz_id: &str,
    ) -> Result<&'s Quiz, JoinError> {
        if let Some(quiz) = session.quiz() {
            return Err(JoinError::AlreadyJoined(quiz.id()));
        }

        let participant = Participant::parse(name, quiz_id)?;
        let id = participant.quiz_id();
        let quiz = self.backend.fetch_quiz(id).await.map_err(|err| {
            warn!(quiz_id = %id, error = %err, "join failed");
            JoinError::from(err)
        })?;

        info!(
            quiz_id = %quiz.id(),
            questions = quiz.len(),
            participant = participant.name(),
            "joined quiz"
        );
        session
            .begin(participant, quiz, now())
            .map_err(|_| JoinError::AlreadyJoined(id))
    }

    /// Next question, or submit when on the last one.
    ///
    /// # Errors
    ///
    /// Returns `SessionError` only if the session was driven inconsistently.
    pub async fn advance(&self, session: &mut PlaySession) -> Result<PlayStep, SessionError> {
        match session.advance(now()) {
            Advance::MovedToNext { ordinal } => Ok(PlayStep::MovedToNext { ordinal }),
            Advance::Completed(ticket) => self.deliver(session, ticket).await.map(PlayStep::Completed),
            Advance::Ignored => Ok(PlayStep::Idle),
        }
    }

    /// Feed the countdown once; an expired question advances exactly once.
    ///
    /// # Errors
    ///
    /// Returns `SessionError` only if the session was driven inconsistently.
    pub async fn tick(&self, session: &mut PlaySession) -> Result<PlayStep, SessionError> {
        match session.tick(now()) {
            Tick::Idle => Ok(PlayStep::Idle),
            Tick::Counting { remaining } => Ok(PlayStep::Counting { remaining }),
            Tick::Expired(Advance::MovedToNext { ordinal }) => {
                info!(ordinal, "question timed out");
                Ok(PlayStep::MovedToNext { ordinal })
            }
            Tick::Expired(Advance::Completed(ticket)) => {
                info!("last question timed out");
                self.deliver(session, ticket).await.map(PlayStep::Completed)
            }
            Tick::Expired(Advance::Ignored) => Ok(PlayStep::Idle),
        }
    }

    /// Grade and post the result now, whatever question is showing.
    ///
    /// # Errors
    ///
    /// Returns `SessionError` only if the session was driven inconsistently.
    pub async fn submit(&self, session: &mut PlaySession) -> Result<PlayStep, SessionError> {
        match session.submit() {
            Some(ticket) => self.deliver(session, ticket).await.map(PlayStep::Completed),
            None => Ok(PlayStep::Idle),
        }
    }

    /// Post a ticket's result and record the outcome on the session.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::ForeignTicket` if the ticket belongs elsewhere.
    pub async fn deliver(
        &self,
        session: &mut PlaySession,
        ticket: SubmitTicket,
    ) -> Result<SubmitResult, SessionError> {
        let persistence = post_result(self.backend.as_ref(), ticket.submission()).await;
        session
            .finish_submission(ticket, persistence, self.clock.now())
            .cloned()
    }
}

/// Post once; failures become a warning on the result, never a retry.
pub(crate) async fn post_result(
    backend: &dyn QuizBackend,
    submission: &ResultSubmission,
) -> Persistence {
    match backend.submit_result(submission).await {
        Ok(()) => {
            info!(
                quiz_id = %submission.quiz_id,
                score = %submission.score,
                "result submitted"
            );
            Persistence::Confirmed
        }
        Err(err) => {
            warn!(
                quiz_id = %submission.quiz_id,
                score = %submission.score,
                error = %err,
                "result submission failed"
            );
            Persistence::Unconfirmed(SubmissionTransportError::from(&err))
        }
    }
}
