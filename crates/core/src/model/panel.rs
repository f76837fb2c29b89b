use serde::Serialize;
use thiserror::Error;

use crate::model::ids::QuestionId;
use crate::model::question::Question;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum PanelError {
    #[error("option {index} is out of range for {len} options")]
    OptionOutOfRange { index: usize, len: usize },

    #[error("panel for {panel} was given question {question}")]
    QuestionMismatch {
        panel: QuestionId,
        question: QuestionId,
    },
}

//
// ─── STATES ────────────────────────────────────────────────────────────────────
//

/// Whether the panel body is visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum Expansion {
    #[default]
    Collapsed,
    Expanded,
}

impl Expansion {
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Expansion::Collapsed => Expansion::Expanded,
            Expansion::Expanded => Expansion::Collapsed,
        }
    }
}

/// Answer lock status. Once `Locked`, a panel never returns to `Unanswered`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum AnswerState {
    #[default]
    Unanswered,
    Locked { selected: usize },
}

/// Result of an option selection that passed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SelectOutcome {
    /// The selection was recorded and the panel is now locked.
    Locked { correct: bool },
    /// The panel was already locked; the recorded answer is unchanged.
    AlreadyLocked,
}

//
// ─── PANEL ─────────────────────────────────────────────────────────────────────
//

/// Per-question presentation state: expansion crossed with answer lock.
///
/// Expansion and lock are independent, so an answered panel can be reopened to
/// review the explanation but never answered again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Panel {
    question_id: QuestionId,
    expansion: Expansion,
    answer: AnswerState,
}

impl Panel {
    /// Creates a collapsed, unanswered panel for `question`.
    #[must_use]
    pub fn new(question: &Question) -> Self {
        Self {
            question_id: question.id().clone(),
            expansion: Expansion::Collapsed,
            answer: AnswerState::Unanswered,
        }
    }

    #[must_use]
    pub fn question_id(&self) -> &QuestionId {
        &self.question_id
    }

    #[must_use]
    pub fn expansion(&self) -> Expansion {
        self.expansion
    }

    #[must_use]
    pub fn answer(&self) -> AnswerState {
        self.answer
    }

    #[must_use]
    pub fn is_expanded(&self) -> bool {
        self.expansion == Expansion::Expanded
    }

    #[must_use]
    pub fn is_locked(&self) -> bool {
        matches!(self.answer, AnswerState::Locked { .. })
    }

    #[must_use]
    pub fn selected_index(&self) -> Option<usize> {
        match self.answer {
            AnswerState::Unanswered => None,
            AnswerState::Locked { selected } => Some(selected),
        }
    }

    /// Flips expansion. Allowed in every state and never touches the answer.
    pub fn toggle_expand(&mut self) -> Expansion {
        self.expansion = self.expansion.toggled();
        self.expansion
    }

    /// Records `index` as the answer and locks the panel.
    ///
    /// Selecting on a locked panel is a no-op reported as
    /// `SelectOutcome::AlreadyLocked`.
    ///
    /// # Errors
    ///
    /// Returns `PanelError::OptionOutOfRange` if `index` is not a valid option.
    /// Returns `PanelError::QuestionMismatch` if `question` is not this panel's question.
    pub fn select_option(
        &mut self,
        question: &Question,
        index: usize,
    ) -> Result<SelectOutcome, PanelError> {
        self.ensure_question(question)?;
        if index >= question.option_count() {
            return Err(PanelError::OptionOutOfRange {
                index,
                len: question.option_count(),
            });
        }

        match self.answer {
            AnswerState::Locked { .. } => Ok(SelectOutcome::AlreadyLocked),
            AnswerState::Unanswered => {
                self.answer = AnswerState::Locked { selected: index };
                Ok(SelectOutcome::Locked {
                    correct: index == question.correct_index(),
                })
            }
        }
    }

    /// Whether the recorded answer is correct; `None` while unanswered.
    #[must_use]
    pub fn is_correct(&self, question: &Question) -> Option<bool> {
        self.selected_index()
            .map(|selected| selected == question.correct_index())
    }

    fn ensure_question(&self, question: &Question) -> Result<(), PanelError> {
        if question.id() != &self.question_id {
            return Err(PanelError::QuestionMismatch {
                panel: self.question_id.clone(),
                question: question.id().clone(),
            });
        }
        Ok(())
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
