#![allow(dead_code)]

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;

use quiz_core::model::{OptionSlot, Question, Quiz, QuizId};
use services::{BackendError, QuizBackend, ResultSubmission};

/// Two questions: "Paris" (opt2) then "42" (opt1).
pub fn capitals_quiz(id: u64) -> Quiz {
    Quiz::new(
        QuizId::new(id),
        "Capitals",
        Some(10),
        vec![
            Question::new(
                "Capital of France?",
                ["Berlin", "Paris", "Rome", "Madrid"].map(String::from),
                OptionSlot::Opt2,
            )
            .unwrap(),
            Question::new(
                "Answer?",
                ["42", "7", "0", "1"].map(String::from),
                OptionSlot::Opt1,
            )
            .unwrap(),
        ],
    )
    .unwrap()
}

/// In-memory quiz service that records every post.
pub struct FakeBackend {
    quiz: Option<Quiz>,
    fetch_status: Option<StatusCode>,
    submit_status: Option<StatusCode>,
    submit_delay: Duration,
    submit_panics: bool,
    fetches: AtomicUsize,
    posts: Mutex<Vec<ResultSubmission>>,
}

impl FakeBackend {
    fn empty() -> Self {
        Self {
            quiz: None,
            fetch_status: None,
            submit_status: None,
            submit_delay: Duration::ZERO,
            submit_panics: false,
            fetches: AtomicUsize::new(0),
            posts: Mutex::new(Vec::new()),
        }
    }

    pub fn serving(quiz: Quiz) -> Self {
        Self {
            quiz: Some(quiz),
            ..Self::empty()
        }
    }

    /// Every fetch answers with `status`, like an inactive quiz.
    pub fn refusing(status: StatusCode) -> Self {
        Self {
            fetch_status: Some(status),
            ..Self::empty()
        }
    }

    pub fn failing_submit(mut self, status: StatusCode) -> Self {
        self.submit_status = Some(status);
        self
    }

    pub fn with_submit_delay(mut self, delay: Duration) -> Self {
        self.submit_delay = delay;
        self
    }

    /// Posts are recorded, then the backend blows up mid-request.
    pub fn panicking_submit(mut self) -> Self {
        self.submit_panics = true;
        self
    }

    pub fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    pub fn posts(&self) -> Vec<ResultSubmission> {
        self.posts.lock().unwrap().clone()
    }
}

#[async_trait]
impl QuizBackend for FakeBackend {
    async fn fetch_quiz(&self, id: QuizId) -> Result<Quiz, BackendError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if let Some(status) = self.fetch_status {
            return Err(BackendError::HttpStatus(status));
        }
        match &self.quiz {
            Some(quiz) if quiz.id() == id => Ok(quiz.clone()),
            _ => Err(BackendError::HttpStatus(StatusCode::NOT_FOUND)),
        }
    }

    async fn submit_result(&self, submission: &ResultSubmission) -> Result<(), BackendError> {
        self.posts.lock().unwrap().push(submission.clone());
        if self.submit_panics {
            panic!("quiz service client crashed");
        }
        if !self.submit_delay.is_zero() {
            tokio::time::sleep(self.submit_delay).await;
        }
        match self.submit_status {
            Some(status) => Err(BackendError::HttpStatus(status)),
            None => Ok(()),
        }
    }
}
