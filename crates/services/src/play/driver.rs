use tokio::sync::mpsc;
use tokio::task::{JoinError, JoinHandle};
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, info, warn};

use quiz_core::Score;
use quiz_core::model::OptionSlot;

use super::now;
use super::progress::PlayProgress;
use super::service::{PlayService, post_result};
use super::session::{
    Advance, Persistence, PlayPhase, PlaySession, SubmitResult, SubmitTicket, Tick,
};
use crate::error::{SessionError, SubmissionTransportError};

/// Commands from whoever renders the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayerInput {
    /// Pick an option of the question on screen.
    Select(OptionSlot),
    SelectText { ordinal: usize, text: String },
    Next,
    /// Submit now, from any question.
    Finish,
}

/// What the renderer should show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayEvent {
    Question {
        ordinal: usize,
        total: usize,
        text: String,
        options: [String; 4],
    },
    Countdown(PlayProgress),
    Submitting {
        score: Score,
    },
    Finished(SubmitResult),
}

/// Runs a joined session to completion: player input, the countdown and the
/// submission all funnel into one task, so the session is never touched
/// concurrently.
#[derive(Clone)]
pub struct PlayLoop {
    service: PlayService,
}

impl PlayLoop {
    #[must_use]
    pub fn new(service: PlayService) -> Self {
        Self { service }
    }

    /// Drive the session until its result is recorded.
    ///
    /// Closing `inputs` does not stop the loop; the countdown still finishes
    /// the quiz. Events are best effort and dropped once the receiver is gone.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotJoined` if the session is not in progress.
    pub async fn run(
        &self,
        session: &mut PlaySession,
        mut inputs: mpsc::Receiver<PlayerInput>,
        events: mpsc::UnboundedSender<PlayEvent>,
    ) -> Result<SubmitResult, SessionError> {
        if let Some(result) = session.result() {
            return Ok(result.clone());
        }
        if session.phase() != PlayPhase::InProgress {
            return Err(SessionError::NotJoined);
        }

        let mut ticker = time::interval(self.service.config().tick_interval());
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut inputs_open = true;
        let mut pending: Option<SubmitTicket> = None;
        let mut post: Option<JoinHandle<Persistence>> = None;

        show_question(session, &events);

        loop {
            let ticket = tokio::select! {
                biased;

                joined = settle(&mut post), if post.is_some() => {
                    if let Some(ticket) = pending.take() {
                        let persistence = joined.unwrap_or_else(|err| {
                            warn!(error = %err, "result post task failed");
                            Persistence::Unconfirmed(SubmissionTransportError::new(err.to_string()))
                        });
                        let result = session
                            .finish_submission(ticket, persistence, self.service.clock().now())?
                            .clone();
                        let _ = events.send(PlayEvent::Finished(result.clone()));
                        return Ok(result);
                    }
                    None
                }

                input = inputs.recv(), if inputs_open => match input {
                    Some(input) => apply_input(session, input, &events),
                    None => {
                        debug!("input closed; waiting for countdown");
                        inputs_open = false;
                        None
                    }
                },

                _ = ticker.tick() => {
                    let now = now();
                    match session.tick(now) {
                        Tick::Idle => None,
                        Tick::Counting { .. } => {
                            if let Some(progress) = session.progress(now) {
                                let _ = events.send(PlayEvent::Countdown(progress));
                            }
                            None
                        }
                        Tick::Expired(advance) => {
                            info!(ordinal = session.current_ordinal(), "question timed out");
                            after_advance(session, advance, &events)
                        }
                    }
                },
            };

            if let Some(ticket) = ticket {
                let _ = events.send(PlayEvent::Submitting {
                    score: ticket.submission().score,
                });
                let backend = self.service.backend();
                let submission = ticket.submission().clone();
                post = Some(tokio::spawn(async move {
                    post_result(backend.as_ref(), &submission).await
                }));
                pending = Some(ticket);
            }
        }
    }
}

/// Wait for the in-flight post, clearing it once it has resolved.
async fn settle(post: &mut Option<JoinHandle<Persistence>>) -> Result<Persistence, JoinError> {
    match post {
        Some(handle) => {
            let outcome = handle.await;
            *post = None;
            outcome
        }
        None => std::future::pending().await,
    }
}

fn apply_input(
    session: &mut PlaySession,
    input: PlayerInput,
    events: &mpsc::UnboundedSender<PlayEvent>,
) -> Option<SubmitTicket> {
    match input {
        PlayerInput::Select(slot) => {
            session.select_option(slot);
            None
        }
        PlayerInput::SelectText { ordinal, text } => {
            session.select_answer(ordinal, text);
            None
        }
        PlayerInput::Next => {
            let advance = session.advance(now());
            after_advance(session, advance, events)
        }
        PlayerInput::Finish => session.submit(),
    }
}

fn after_advance(
    session: &PlaySession,
    advance: Advance,
    events: &mpsc::UnboundedSender<PlayEvent>,
) -> Option<SubmitTicket> {
    match advance {
        Advance::MovedToNext { .. } => {
            show_question(session, events);
            None
        }
        Advance::Completed(ticket) => Some(ticket),
        Advance::Ignored => None,
    }
}

fn show_question(session: &PlaySession, events: &mpsc::UnboundedSender<PlayEvent>) {
    let (Some(quiz), Some(question)) = (session.quiz(), session.current_question()) else {
        return;
    };
    let _ = events.send(PlayEvent::Question {
        ordinal: session.current_ordinal(),
        total: quiz.len(),
        text: question.text().to_owned(),
        options: question.options().clone(),
    });
}
