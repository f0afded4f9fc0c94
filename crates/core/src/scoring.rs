//! Pure grading of a participant's answers against a quiz.

use std::fmt;

use crate::model::{AnswerRecord, Quiz};

/// Number of correct answers out of the number of questions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Score {
    pub score: usize,
    pub out_of: usize,
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} / {}", self.score, self.out_of)
    }
}

/// Outcome of a single question after grading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewStatus {
    Correct,
    Wrong,
    Unanswered,
}

/// Per-question breakdown shown on the results screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionReview {
    pub ordinal: usize,
    pub question: String,
    pub correct: String,
    pub selected: Option<String>,
    pub status: ReviewStatus,
}

/// Count the questions whose recorded text equals the correct option's text.
///
/// Missing entries never match, and entries for ordinals past the end of the
/// quiz are ignored, so the result is always within `0..=quiz.len()`.
#[must_use]
pub fn score(quiz: &Quiz, answers: &AnswerRecord) -> Score {
    let score = quiz
        .questions()
        .iter()
        .enumerate()
        .filter(|(ordinal, question)| {
            answers
                .get(*ordinal)
                .is_some_and(|selected| question.is_correct(selected))
        })
        .count();

    Score {
        score,
        out_of: quiz.len(),
    }
}

/// Grade every question individually.
#[must_use]
pub fn review(quiz: &Quiz, answers: &AnswerRecord) -> Vec<QuestionReview> {
    quiz.questions()
        .iter()
        .enumerate()
        .map(|(ordinal, question)| {
            let selected = answers.get(ordinal);
            let status = match selected {
                None => ReviewStatus::Unanswered,
                Some(text) if question.is_correct(text) => ReviewStatus::Correct,
                Some(_) => ReviewStatus::Wrong,
            };
            QuestionReview {
                ordinal,
                question: question.text().to_owned(),
                correct: question.correct_text().to_owned(),
                selected: selected.map(str::to_owned),
                status,
            }
        })
        .collect()
}
