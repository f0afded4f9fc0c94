use thiserror::Error;

use crate::model::ids::QuizId;
use crate::model::question::Question;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuizError {
    #[error("quiz has no questions")]
    NoQuestions,
}

/// A quiz as loaded for play. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quiz {
    id: QuizId,
    title: String,
    duration: Option<u32>,
    questions: Vec<Question>,
}

impl Quiz {
    /// Build a playable quiz.
    ///
    /// `duration` is whatever the owner configured on the backend. It is kept
    /// for display only; the countdown comes from `PlayConfig`.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::NoQuestions` when `questions` is empty.
    pub fn new(
        id: QuizId,
        title: impl Into<String>,
        duration: Option<u32>,
        questions: Vec<Question>,
    ) -> Result<Self, QuizError> {
        if questions.is_empty() {
            return Err(QuizError::NoQuestions);
        }
        Ok(Self {
            id,
            title: title.into(),
            duration,
            questions,
        })
    }

    #[must_use]
    pub fn id(&self) -> QuizId {
        self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn duration(&self) -> Option<u32> {
        self.duration
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn question(&self, ordinal: usize) -> Option<&Question> {
        self.questions.get(ordinal)
    }

    /// Number of questions, which is also the `outOf` of any result.
    #[must_use]
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    /// Always false: a `Quiz` cannot be built without questions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    #[must_use]
    pub fn last_ordinal(&self) -> usize {
        self.questions.len().saturating_sub(1)
    }

    #[must_use]
    pub fn is_last(&self, ordinal: usize) -> bool {
        ordinal >= self.last_ordinal()
    }
}
