mod common;

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;

use common::{FakeBackend, capitals_quiz};
use quiz_core::model::OptionSlot;
use quiz_core::time::fixed_now;
use quiz_core::{PlayConfig, Score};
use services::{
    Clock, PlayEvent, PlayLoop, PlayPhase, PlayService, PlaySession, PlayerInput, SessionError,
};

fn service(backend: &Arc<FakeBackend>) -> PlayService {
    let config = PlayConfig::new(Duration::from_secs(10), Duration::from_secs(1)).unwrap();
    PlayService::new(backend.clone(), config).with_clock(Clock::fixed(fixed_now()))
}

fn drain(events: &mut mpsc::UnboundedReceiver<PlayEvent>) -> Vec<PlayEvent> {
    let mut out = Vec::new();
    while let Ok(event) = events.try_recv() {
        out.push(event);
    }
    out
}

fn question_ordinals(events: &[PlayEvent]) -> Vec<usize> {
    events
        .iter()
        .filter_map(|event| match event {
            PlayEvent::Question { ordinal, .. } => Some(*ordinal),
            _ => None,
        })
        .collect()
}

#[tokio::test(start_paused = true)]
async fn inputs_drive_session_to_a_single_submission() {
    let backend = Arc::new(FakeBackend::serving(capitals_quiz(12)));
    let svc = service(&backend);
    let mut session = svc.new_session();
    svc.join(&mut session, "Ada", "12").await.unwrap();

    let (input_tx, input_rx) = mpsc::channel(8);
    let (event_tx, mut event_rx) = mpsc::unbounded_channel();
    for input in [
        PlayerInput::Select(OptionSlot::Opt2),
        PlayerInput::Next,
        PlayerInput::Select(OptionSlot::Opt2),
        PlayerInput::Finish,
        PlayerInput::Next,
        PlayerInput::Finish,
    ] {
        input_tx.send(input).await.unwrap();
    }

    let result = PlayLoop::new(svc)
        .run(&mut session, input_rx, event_tx)
        .await
        .unwrap();

    assert_eq!(result.score, Score { score: 1, out_of: 2 });
    assert_eq!(result.submitted_at, fixed_now());
    assert_eq!(backend.posts().len(), 1);
    assert_eq!(session.phase(), PlayPhase::Submitted);
    assert_eq!(session.answers().get(1), Some("7"));

    let events = drain(&mut event_rx);
    assert_eq!(question_ordinals(&events), vec![0, 1]);
    let submitting = events
        .iter()
        .filter(|e| matches!(e, PlayEvent::Submitting { .. }))
        .count();
    assert_eq!(submitting, 1);
    assert!(matches!(events.last(), Some(PlayEvent::Finished(r)) if r == &result));
}

#[tokio::test(start_paused = true)]
async fn countdown_alone_finishes_the_quiz() {
    let backend = Arc::new(FakeBackend::serving(capitals_quiz(12)));
    let svc = service(&backend);
    let mut session = svc.new_session();
    svc.join(&mut session, "Ada", "12").await.unwrap();

    let (input_tx, input_rx) = mpsc::channel(1);
    drop(input_tx);
    let (event_tx, mut event_rx) = mpsc::unbounded_channel();

    let started = tokio::time::Instant::now();
    let result = PlayLoop::new(svc)
        .run(&mut session, input_rx, event_tx)
        .await
        .unwrap();

    assert_eq!(result.score, Score { score: 0, out_of: 2 });
    assert_eq!(backend.posts().len(), 1);
    assert!(started.elapsed() >= Duration::from_secs(20));

    let events = drain(&mut event_rx);
    assert_eq!(question_ordinals(&events), vec![0, 1]);
    let countdown = events
        .iter()
        .find_map(|e| match e {
            PlayEvent::Countdown(progress) if progress.remaining < Duration::from_secs(10) => {
                Some(*progress)
            }
            _ => None,
        })
        .unwrap();
    assert_eq!(countdown.window, Duration::from_secs(10));
    assert_eq!(countdown.total, 2);
    assert!(countdown.fraction_remaining() < 1.0);
}

#[tokio::test(start_paused = true)]
async fn inputs_during_slow_post_do_not_resubmit() {
    let backend = Arc::new(
        FakeBackend::serving(capitals_quiz(12)).with_submit_delay(Duration::from_secs(30)),
    );
    let svc = service(&backend);
    let mut session = svc.new_session();
    svc.join(&mut session, "Ada", "12").await.unwrap();

    let (input_tx, input_rx) = mpsc::channel(8);
    let (event_tx, mut event_rx) = mpsc::unbounded_channel();
    input_tx.send(PlayerInput::Finish).await.unwrap();

    let play = PlayLoop::new(svc);
    let driver = tokio::spawn(async move {
        let result = play.run(&mut session, input_rx, event_tx).await;
        (session, result)
    });

    loop {
        match event_rx.recv().await {
            Some(PlayEvent::Submitting { .. }) => break,
            Some(_) => {}
            None => panic!("loop ended before submitting"),
        }
    }
    for input in [PlayerInput::Next, PlayerInput::Finish, PlayerInput::Next] {
        input_tx.send(input).await.unwrap();
    }

    let (session, result) = driver.await.unwrap();
    let result = result.unwrap();
    assert_eq!(result.score, Score { score: 0, out_of: 2 });
    assert_eq!(backend.posts().len(), 1);
    assert!(session.answers().is_empty());
}

#[tokio::test(start_paused = true)]
async fn panicking_post_still_finishes_unconfirmed() {
    let backend = Arc::new(FakeBackend::serving(capitals_quiz(12)).panicking_submit());
    let svc = service(&backend);
    let mut session = svc.new_session();
    svc.join(&mut session, "Ada", "12").await.unwrap();
    session.select_answer(0, "Paris");

    let (input_tx, input_rx) = mpsc::channel(1);
    input_tx.send(PlayerInput::Finish).await.unwrap();
    let (event_tx, mut event_rx) = mpsc::unbounded_channel();

    let result = tokio::time::timeout(
        Duration::from_secs(120),
        PlayLoop::new(svc).run(&mut session, input_rx, event_tx),
    )
    .await
    .expect("loop settles after the post task dies")
    .unwrap();

    assert_eq!(result.score, Score { score: 1, out_of: 2 });
    assert!(!result.is_confirmed());
    assert!(result.warning().is_some());
    assert_eq!(session.phase(), PlayPhase::Submitted);
    assert_eq!(backend.posts().len(), 1);
    assert!(matches!(drain(&mut event_rx).last(), Some(PlayEvent::Finished(_))));
}

#[tokio::test]
async fn unjoined_session_is_rejected() {
    let backend = Arc::new(FakeBackend::serving(capitals_quiz(12)));
    let svc = service(&backend);
    let mut session = PlaySession::new(*svc.config());

    let (_input_tx, input_rx) = mpsc::channel(1);
    let (event_tx, _event_rx) = mpsc::unbounded_channel();
    let err = PlayLoop::new(svc)
        .run(&mut session, input_rx, event_tx)
        .await
        .unwrap_err();
    assert_eq!(err, SessionError::NotJoined);
}
