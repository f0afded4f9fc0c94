use thiserror::Error;

use crate::model::ids::{ParseIdError, QuizId};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ParticipantError {
    #[error("please enter a name")]
    EmptyName,

    #[error("please enter a quiz id")]
    EmptyQuizId,

    #[error(transparent)]
    InvalidQuizId(#[from] ParseIdError),
}

/// Who is playing and which quiz they asked for.
///
/// Anonymous: the name is free text and is never checked against an account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Participant {
    name: String,
    quiz_id: QuizId,
}

impl Participant {
    #[must_use]
    pub fn new(name: impl Into<String>, quiz_id: QuizId) -> Self {
        Self {
            name: name.into(),
            quiz_id,
        }
    }

    /// Parse the raw join form.
    ///
    /// # Errors
    ///
    /// Returns `ParticipantError` when either field is blank or the quiz id is not an integer.
    pub fn parse(name: &str, quiz_id: &str) -> Result<Self, ParticipantError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ParticipantError::EmptyName);
        }
        if quiz_id.trim().is_empty() {
            return Err(ParticipantError::EmptyQuizId);
        }
        let quiz_id = quiz_id.parse::<QuizId>()?;
        Ok(Self::new(name, quiz_id))
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn quiz_id(&self) -> QuizId {
        self.quiz_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_trims_name_and_id() {
        let p = Participant::parse("  Ada ", " 17").unwrap();
        assert_eq!(p.name(), "Ada");
        assert_eq!(p.quiz_id(), QuizId::new(17));
    }

    #[test]
    fn parse_rejects_blank_fields() {
        assert_eq!(
            Participant::parse("   ", "1").unwrap_err(),
            ParticipantError::EmptyName
        );
        assert_eq!(
            Participant::parse("Ada", "").unwrap_err(),
            ParticipantError::EmptyQuizId
        );
    }

    #[test]
    fn parse_rejects_non_numeric_id() {
        let err = Participant::parse("Ada", "quiz-1").unwrap_err();
        assert!(matches!(err, ParticipantError::InvalidQuizId(_)));
    }
}
