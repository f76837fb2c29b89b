use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::QuestionId;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question prompt cannot be empty")]
    EmptyPrompt,

    #[error("a question needs at least 2 options, got {len}")]
    TooFewOptions { len: usize },

    #[error("correct index {index} is out of range for {len} options")]
    CorrectIndexOutOfRange { index: usize, len: usize },
}

/// Minimum number of options a multiple-choice question must offer.
pub const MIN_OPTIONS: usize = 2;

//
// ─── DRAFT ─────────────────────────────────────────────────────────────────────
//

/// Unvalidated question record, as it arrives from a bank file.
///
/// Accepts both the canonical field names and the short ones used by
/// hand-written banks (`question`, `answer`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionDraft {
    pub id: QuestionId,
    #[serde(alias = "question")]
    pub prompt: String,
    pub options: Vec<String>,
    #[serde(alias = "answer", alias = "correctIndex")]
    pub correct_index: usize,
    #[serde(default)]
    pub explanation: String,
}

impl QuestionDraft {
    #[must_use]
    pub fn new(
        id: impl Into<QuestionId>,
        prompt: impl Into<String>,
        options: Vec<String>,
        correct_index: usize,
    ) -> Self {
        Self {
            id: id.into(),
            prompt: prompt.into(),
            options,
            correct_index,
            explanation: String::new(),
        }
    }

    #[must_use]
    pub fn with_explanation(mut self, explanation: impl Into<String>) -> Self {
        self.explanation = explanation.into();
        self
    }

    /// Checks the draft and turns it into an immutable `Question`.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError::EmptyPrompt` if the prompt is blank.
    /// Returns `QuestionError::TooFewOptions` if fewer than two options are given.
    /// Returns `QuestionError::CorrectIndexOutOfRange` if `correct_index` does not
    /// point at an option.
    pub fn validate(self) -> Result<Question, QuestionError> {
        if self.prompt.trim().is_empty() {
            return Err(QuestionError::EmptyPrompt);
        }
        if self.options.len() < MIN_OPTIONS {
            return Err(QuestionError::TooFewOptions {
                len: self.options.len(),
            });
        }
        if self.correct_index >= self.options.len() {
            return Err(QuestionError::CorrectIndexOutOfRange {
                index: self.correct_index,
                len: self.options.len(),
            });
        }

        Ok(Question {
            id: self.id,
            prompt: self.prompt,
            options: self.options,
            correct_index: self.correct_index,
            explanation: self.explanation,
        })
    }
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// A validated multiple-choice question.
///
/// Invariants: at least two options, and `correct_index < options.len()`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Question {
    id: QuestionId,
    prompt: String,
    options: Vec<String>,
    correct_index: usize,
    explanation: String,
}

impl Question {
    #[must_use]
    pub fn id(&self) -> &QuestionId {
        &self.id
    }

    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    #[must_use]
    pub fn option_count(&self) -> usize {
        self.options.len()
    }

    #[must_use]
    pub fn correct_index(&self) -> usize {
        self.correct_index
    }

    #[must_use]
    pub fn explanation(&self) -> &str {
        &self.explanation
    }

    /// Header text shown on the collapsed panel, e.g. `Q1: Who ...?`.
    #[must_use]
    pub fn label(&self) -> String {
        format!("Q{}: {}", self.id, self.prompt)
    }

    /// Option text prefixed with its letter, e.g. `B. Aristotle`.
    ///
    /// Returns `None` when `index` is out of range.
    #[must_use]
    pub fn option_label(&self, index: usize) -> Option<String> {
        self.options
            .get(index)
            .map(|text| format!("{}. {text}", option_letter(index)))
    }

    /// Labelled text of the correct option.
    #[must_use]
    pub fn correct_option_label(&self) -> String {
        format!(
            "{}. {}",
            option_letter(self.correct_index),
            self.options[self.correct_index]
        )
    }
}

const LETTERED_OPTIONS: usize = 26;

/// Letter used to present the option at `index` (`A`, `B`, ...).
///
/// Past `Z` the 1-based position is used instead.
#[must_use]
pub fn option_letter(index: usize) -> String {
    match u8::try_from(index) {
        Ok(i) if usize::from(i) < LETTERED_OPTIONS => char::from(b'A' + i).to_string(),
        _ => (index + 1).to_string(),
    }
}

/// Parses an option label as shown by [`option_letter`]: a letter for the first
/// 26 options, then the 1-based position.
///
/// Numbers that collide with a letter position (`1` to `26`) are rejected.
#[must_use]
pub fn parse_option_ref(raw: &str) -> Option<usize> {
    let raw = raw.trim();
    if let Ok(position) = raw.parse::<usize>() {
        return position.checked_sub(1).filter(|&index| index >= LETTERED_OPTIONS);
    }
    let mut chars = raw.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii_alphabetic() => {
            Some(usize::from(c.to_ascii_uppercase() as u8 - b'A'))
        }
        _ => None,
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
