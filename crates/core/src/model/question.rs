use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question text cannot be empty")]
    EmptyText,

    #[error("unknown option `{0}`, expected opt1..opt4 or 1..4")]
    UnknownSlot(String),
}

//
// ─── OPTION SLOT ───────────────────────────────────────────────────────────────
//

/// One of the four answer positions of a question.
///
/// Serialized as the backend's option keys (`"opt1"`..`"opt4"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionSlot {
    Opt1,
    Opt2,
    Opt3,
    Opt4,
}

impl OptionSlot {
    pub const ALL: [OptionSlot; 4] = [Self::Opt1, Self::Opt2, Self::Opt3, Self::Opt4];

    /// Zero-based position of the slot.
    #[must_use]
    pub fn index(self) -> usize {
        match self {
            Self::Opt1 => 0,
            Self::Opt2 => 1,
            Self::Opt3 => 2,
            Self::Opt4 => 3,
        }
    }

    /// One-based label as shown to participants.
    #[must_use]
    pub fn number(self) -> u8 {
        match self {
            Self::Opt1 => 1,
            Self::Opt2 => 2,
            Self::Opt3 => 3,
            Self::Opt4 => 4,
        }
    }

    #[must_use]
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// The backend field name holding this option's text.
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Self::Opt1 => "opt1",
            Self::Opt2 => "opt2",
            Self::Opt3 => "opt3",
            Self::Opt4 => "opt4",
        }
    }
}

impl fmt::Display for OptionSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for OptionSlot {
    type Err = QuestionError;

    /// Accepts both the backend keys (`opt2`) and the participant-facing numbers (`2`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "opt1" | "1" => Ok(Self::Opt1),
            "opt2" | "2" => Ok(Self::Opt2),
            "opt3" | "3" => Ok(Self::Opt3),
            "opt4" | "4" => Ok(Self::Opt4),
            other => Err(QuestionError::UnknownSlot(other.to_string())),
        }
    }
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// A prompt with exactly four options, one of which is designated correct.
///
/// The correct option is a slot, so it always points at one of the four
/// present option texts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    text: String,
    options: [String; 4],
    correct: OptionSlot,
}

impl Question {
    /// Build a question.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError::EmptyText` if the prompt is blank.
    pub fn new(
        text: impl Into<String>,
        options: [String; 4],
        correct: OptionSlot,
    ) -> Result<Self, QuestionError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(QuestionError::EmptyText);
        }
        Ok(Self {
            text,
            options,
            correct,
        })
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn options(&self) -> &[String; 4] {
        &self.options
    }

    #[must_use]
    pub fn option(&self, slot: OptionSlot) -> &str {
        &self.options[slot.index()]
    }

    #[must_use]
    pub fn correct_slot(&self) -> OptionSlot {
        self.correct
    }

    /// Text of the designated correct option. Answers are graded against this value.
    #[must_use]
    pub fn correct_text(&self) -> &str {
        self.option(self.correct)
    }

    /// Whether a selected text counts as correct.
    ///
    /// Comparison is by text, so a distractor with the same text as the
    /// correct option also counts.
    #[must_use]
    pub fn is_correct(&self, selected: &str) -> bool {
        selected == self.correct_text()
    }
}
