//! JSON shapes of the quiz service's `/Play` endpoints.
//!
//! Field names and the string-typed `score`/`outOf` are part of the existing
//! backend contract and must not change.

use serde::{Deserialize, Serialize};

use quiz_core::model::{OptionSlot, Question, Quiz, QuizId};

use crate::backend::ResultSubmission;
use crate::error::BackendError;

/// Body of `GET /Play/{quizId}`.
#[derive(Debug, Deserialize)]
pub struct PlayResponse {
    pub quiz: QuizHeader,
    #[serde(default)]
    pub questions: Vec<QuestionDto>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizHeader {
    #[serde(default)]
    pub quiz_id: Option<NumOrStr>,
    #[serde(default)]
    pub quiz_title: String,
    #[serde(default)]
    pub duration: Option<NumOrStr>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionDto {
    pub question: String,
    #[serde(default)]
    pub opt1: String,
    #[serde(default)]
    pub opt2: String,
    #[serde(default)]
    pub opt3: String,
    #[serde(default)]
    pub opt4: String,
    pub correct_opt: OptionSlot,
}

/// Numeric fields the backend has been seen to send either way.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum NumOrStr {
    Num(u64),
    Str(String),
    Other(serde::de::IgnoredAny),
}

impl NumOrStr {
    fn as_u64(&self) -> Option<u64> {
        match self {
            Self::Num(n) => Some(*n),
            Self::Str(s) => s.trim().parse().ok(),
            Self::Other(_) => None,
        }
    }
}

impl PlayResponse {
    /// Convert into a domain quiz.
    ///
    /// `requested` is used when the header carries no usable id.
    ///
    /// # Errors
    ///
    /// Returns `BackendError::InvalidQuestion` or `BackendError::InvalidQuiz` when
    /// the payload does not describe a playable quiz.
    pub fn into_quiz(self, requested: QuizId) -> Result<Quiz, BackendError> {
        let id = self
            .quiz
            .quiz_id
            .as_ref()
            .and_then(NumOrStr::as_u64)
            .map_or(requested, QuizId::new);
        let duration = self
            .quiz
            .duration
            .as_ref()
            .and_then(NumOrStr::as_u64)
            .and_then(|d| u32::try_from(d).ok());

        let questions = self
            .questions
            .into_iter()
            .enumerate()
            .map(|(ordinal, dto)| {
                dto.into_question()
                    .map_err(|source| BackendError::InvalidQuestion { ordinal, source })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Quiz::new(id, self.quiz.quiz_title, duration, questions)?)
    }
}

impl QuestionDto {
    fn into_question(self) -> Result<Question, quiz_core::model::QuestionError> {
        Question::new(
            self.question,
            [self.opt1, self.opt2, self.opt3, self.opt4],
            self.correct_opt,
        )
    }
}

/// Body of `POST /Play/Submit`.
#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SubmitRequest<'a> {
    pub quiz_id: u64,
    pub participant_name: &'a str,
    pub score: String,
    pub out_of: String,
}

impl<'a> From<&'a ResultSubmission> for SubmitRequest<'a> {
    fn from(submission: &'a ResultSubmission) -> Self {
        Self {
            quiz_id: submission.quiz_id.value(),
            participant_name: &submission.participant_name,
            score: submission.score.score.to_string(),
            out_of: submission.score.out_of.to_string(),
        }
    }
}
