use chrono::{DateTime, Utc};
use std::fmt;
use std::time::{Duration, Instant};

use quiz_core::model::{AnswerRecord, OptionSlot, Participant, Question, Quiz, SessionId};
use quiz_core::{PlayConfig, QuestionReview, Score, scoring};

use super::progress::PlayProgress;
use crate::backend::ResultSubmission;
use crate::error::{SessionError, SubmissionTransportError};

//
// ─── STATE ─────────────────────────────────────────────────────────────────────
//

/// Lifecycle of a play session.
///
/// `Submitting` is entered synchronously the moment submission is decided,
/// before any request is sent, and counts as "submission has begun" for every
/// guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayPhase {
    AwaitingJoin,
    InProgress,
    Submitting,
    Submitted,
}

/// Outcome of `PlaySession::advance`.
#[derive(Debug)]
#[must_use]
pub enum Advance {
    MovedToNext { ordinal: usize },
    /// The last question was passed; the ticket must be posted and then
    /// redeemed with `finish_submission`.
    Completed(SubmitTicket),
    /// Not in progress (not joined yet, or submission already begun).
    Ignored,
}

/// Outcome of `PlaySession::tick`.
#[derive(Debug)]
#[must_use]
pub enum Tick {
    Idle,
    Counting { remaining: Duration },
    Expired(Advance),
}

/// The single permission to post a session's result.
///
/// Only ever issued once per session and not clonable, so holding one is
/// proof that this is the one submission.
#[derive(Debug, PartialEq, Eq)]
pub struct SubmitTicket {
    session: SessionId,
    submission: ResultSubmission,
}

impl SubmitTicket {
    #[must_use]
    pub fn submission(&self) -> &ResultSubmission {
        &self.submission
    }
}

/// Whether the backend confirmed it stored the result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Persistence {
    Confirmed,
    Unconfirmed(SubmissionTransportError),
}

/// Final, immutable outcome of a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitResult {
    pub score: Score,
    pub persistence: Persistence,
    pub submitted_at: DateTime<Utc>,
}

impl SubmitResult {
    #[must_use]
    pub fn is_confirmed(&self) -> bool {
        matches!(self.persistence, Persistence::Confirmed)
    }

    #[must_use]
    pub fn warning(&self) -> Option<&SubmissionTransportError> {
        match &self.persistence {
            Persistence::Confirmed => None,
            Persistence::Unconfirmed(err) => Some(err),
        }
    }
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// In-memory state of one participant taking one quiz.
///
/// Purely synchronous: it never performs I/O and never reads a clock on its
/// own. Callers feed it `Instant`s and carry out the network side of a
/// `SubmitTicket`.
pub struct PlaySession {
    id: SessionId,
    config: PlayConfig,
    phase: PlayPhase,
    participant: Option<Participant>,
    quiz: Option<Quiz>,
    current: usize,
    deadline: Option<Instant>,
    answers: AnswerRecord,
    result: Option<SubmitResult>,
}

impl PlaySession {
    #[must_use]
    pub fn new(config: PlayConfig) -> Self {
        Self {
            id: SessionId::generate(),
            config,
            phase: PlayPhase::AwaitingJoin,
            participant: None,
            quiz: None,
            current: 0,
            deadline: None,
            answers: AnswerRecord::new(),
            result: None,
        }
    }

    /// Start playing a loaded quiz: first question, fresh deadline, no answers.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::AlreadyJoined` unless the session is awaiting a join.
    pub fn begin(
        &mut self,
        participant: Participant,
        quiz: Quiz,
        now: Instant,
    ) -> Result<&Quiz, SessionError> {
        if self.phase != PlayPhase::AwaitingJoin {
            return Err(SessionError::AlreadyJoined);
        }

        self.participant = Some(participant);
        self.current = 0;
        self.deadline = Some(now + self.config.question_window());
        self.answers = AnswerRecord::new();
        self.phase = PlayPhase::InProgress;
        let quiz: &Quiz = self.quiz.insert(quiz);
        Ok(quiz)
    }

    #[must_use]
    pub fn id(&self) -> SessionId {
        self.id
    }

    #[must_use]
    pub fn config(&self) -> &PlayConfig {
        &self.config
    }

    #[must_use]
    pub fn phase(&self) -> PlayPhase {
        self.phase
    }

    #[must_use]
    pub fn participant(&self) -> Option<&Participant> {
        self.participant.as_ref()
    }

    #[must_use]
    pub fn quiz(&self) -> Option<&Quiz> {
        self.quiz.as_ref()
    }

    #[must_use]
    pub fn answers(&self) -> &AnswerRecord {
        &self.answers
    }

    #[must_use]
    pub fn result(&self) -> Option<&SubmitResult> {
        self.result.as_ref()
    }

    #[must_use]
    pub fn current_ordinal(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        self.quiz.as_ref()?.question(self.current)
    }

    /// True once submission has begun, whether or not the post has resolved.
    #[must_use]
    pub fn submission_started(&self) -> bool {
        matches!(self.phase, PlayPhase::Submitting | PlayPhase::Submitted)
    }

    #[must_use]
    pub fn is_submitted(&self) -> bool {
        self.phase == PlayPhase::Submitted
    }

    /// Time left on the current question, zero when not in progress.
    #[must_use]
    pub fn remaining(&self, now: Instant) -> Duration {
        match (self.phase, self.deadline) {
            (PlayPhase::InProgress, Some(deadline)) => deadline.saturating_duration_since(now),
            _ => Duration::ZERO,
        }
    }

    /// "Question i of N" plus the countdown, for renderers.
    #[must_use]
    pub fn progress(&self, now: Instant) -> Option<PlayProgress> {
        let quiz = self.quiz.as_ref()?;
        Some(PlayProgress {
            ordinal: self.current,
            total: quiz.len(),
            remaining: self.remaining(now),
            window: self.config.question_window(),
            is_last: quiz.is_last(self.current),
        })
    }

    /// Per-question grading, available once the session is submitted.
    #[must_use]
    pub fn review(&self) -> Option<Vec<QuestionReview>> {
        if !self.is_submitted() {
            return None;
        }
        let quiz = self.quiz.as_ref()?;
        Some(scoring::review(quiz, &self.answers))
    }

    /// Record (or replace) the selected option text for a question.
    ///
    /// Returns `false` without touching anything when the session is not in
    /// progress or the ordinal is outside the quiz.
    pub fn select_answer(&mut self, ordinal: usize, text: impl Into<String>) -> bool {
        if self.phase != PlayPhase::InProgress {
            return false;
        }
        let in_range = self
            .quiz
            .as_ref()
            .is_some_and(|quiz| ordinal < quiz.len());
        if !in_range {
            return false;
        }
        self.answers.record(ordinal, text);
        true
    }

    /// Select one of the current question's options by slot.
    pub fn select_option(&mut self, slot: OptionSlot) -> bool {
        let Some(text) = self.current_question().map(|q| q.option(slot).to_owned()) else {
            return false;
        };
        self.select_answer(self.current, text)
    }

    /// Move to the next question, or begin submission on the last one.
    pub fn advance(&mut self, now: Instant) -> Advance {
        if self.phase != PlayPhase::InProgress {
            return Advance::Ignored;
        }
        let Some(quiz) = self.quiz.as_ref() else {
            return Advance::Ignored;
        };

        if quiz.is_last(self.current) {
            return self.submit().map_or(Advance::Ignored, Advance::Completed);
        }

        self.current += 1;
        self.deadline = Some(now + self.config.question_window());
        Advance::MovedToNext {
            ordinal: self.current,
        }
    }

    /// Feed the countdown.
    ///
    /// An expired deadline triggers exactly one `advance`, however late the
    /// tick is. The new deadline is counted from `now`, so following ticks see
    /// a full window and cannot advance again.
    pub fn tick(&mut self, now: Instant) -> Tick {
        if self.phase != PlayPhase::InProgress {
            return Tick::Idle;
        }
        let remaining = self.remaining(now);
        if !remaining.is_zero() {
            return Tick::Counting { remaining };
        }
        Tick::Expired(self.advance(now))
    }

    /// Decide to submit: grade the answers, freeze the session and hand out
    /// the only ticket.
    ///
    /// Returns `None` when submission has already begun or nothing was joined.
    #[must_use]
    pub fn submit(&mut self) -> Option<SubmitTicket> {
        if self.phase != PlayPhase::InProgress {
            return None;
        }
        let quiz = self.quiz.as_ref()?;
        let participant = self.participant.as_ref()?;

        let score = scoring::score(quiz, &self.answers);
        let submission = ResultSubmission {
            quiz_id: quiz.id(),
            participant_name: participant.name().to_owned(),
            score,
        };

        self.phase = PlayPhase::Submitting;
        self.deadline = None;
        Some(SubmitTicket {
            session: self.id,
            submission,
        })
    }

    /// Redeem the ticket once the post has resolved, successfully or not.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::ForeignTicket` if the ticket was not issued by
    /// this session's pending submission. That is a driver bug, so debug
    /// builds panic.
    pub fn finish_submission(
        &mut self,
        ticket: SubmitTicket,
        persistence: Persistence,
        submitted_at: DateTime<Utc>,
    ) -> Result<&SubmitResult, SessionError> {
        let valid = self.phase == PlayPhase::Submitting && ticket.session == self.id;
        debug_assert!(valid, "submission ticket redeemed out of turn");
        if !valid {
            return Err(SessionError::ForeignTicket);
        }

        self.phase = PlayPhase::Submitted;
        let result: &SubmitResult = self.result.insert(SubmitResult {
            score: ticket.submission.score,
            persistence,
            submitted_at,
        });
        Ok(result)
    }
}

impl fmt::Debug for PlaySession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlaySession")
            .field("id", &self.id)
            .field("phase", &self.phase)
            .field("quiz_id", &self.quiz.as_ref().map(Quiz::id))
            .field("current", &self.current)
            .field("answers_len", &self.answers.len())
            .field("result", &self.result)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
