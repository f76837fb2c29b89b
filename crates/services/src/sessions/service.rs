use std::collections::HashMap;
use std::fmt;

use quiz_core::model::{
    Expansion, Panel, PanelError, Question, QuestionBank, QuestionDraft, QuestionId,
    SelectOutcome,
};
use tracing::{debug, info};

use super::progress::Score;
use super::view::{PanelView, Reveal, SnapshotRow};
use crate::error::{ConfigurationError, QuizError};

//
// ─── ENTRY ─────────────────────────────────────────────────────────────────────
//

struct Entry {
    question: Question,
    topic: Option<String>,
    panel: Panel,
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// In-memory quiz session: one panel per bank question, in bank order.
///
/// All aggregates are derived from panel state on demand.
pub struct QuizSession {
    entries: Vec<Entry>,
    index: HashMap<QuestionId, usize>,
}

impl QuizSession {
    /// Build a session with one collapsed, unanswered panel per question.
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError::EmptyBank` if `questions` is empty.
    /// Returns `ConfigurationError::DuplicateId` if two questions share an id.
    pub fn initialize(questions: Vec<Question>) -> Result<Self, ConfigurationError> {
        Self::build(questions.into_iter().map(|q| (q, None)))
    }

    /// Build a session from a sectioned bank, keeping each section's topic.
    ///
    /// # Errors
    ///
    /// Same as [`QuizSession::initialize`].
    pub fn from_bank(bank: &QuestionBank) -> Result<Self, ConfigurationError> {
        Self::build(
            bank.entries()
                .map(|(section, q)| (q.clone(), section.topic().map(str::to_string))),
        )
    }

    /// Validate raw drafts and build a session from them.
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError::InvalidQuestion` for the first draft that fails
    /// validation, otherwise the errors of [`QuizSession::initialize`].
    pub fn from_drafts(drafts: Vec<QuestionDraft>) -> Result<Self, ConfigurationError> {
        let questions = validate_drafts(drafts)?;
        Self::initialize(questions)
    }

    fn build(
        items: impl Iterator<Item = (Question, Option<String>)>,
    ) -> Result<Self, ConfigurationError> {
        let mut entries = Vec::new();
        let mut index = HashMap::new();

        for (question, topic) in items {
            let id = question.id().clone();
            if index.insert(id.clone(), entries.len()).is_some() {
                return Err(ConfigurationError::DuplicateId(id));
            }
            let panel = Panel::new(&question);
            entries.push(Entry {
                question,
                topic,
                panel,
            });
        }

        if entries.is_empty() {
            return Err(ConfigurationError::EmptyBank);
        }

        info!(questions = entries.len(), "quiz session initialized");
        Ok(Self { entries, index })
    }

    /// Total number of panels in this session.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false; construction rejects empty banks.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Question ids in bank order.
    pub fn question_ids(&self) -> impl Iterator<Item = &QuestionId> {
        self.entries.iter().map(|e| e.question.id())
    }

    /// # Errors
    ///
    /// Returns `QuizError::NotFound` for an unknown id.
    pub fn panel(&self, id: &QuestionId) -> Result<&Panel, QuizError> {
        Ok(&self.entry(id)?.panel)
    }

    /// Flip the expansion of a panel.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::NotFound` for an unknown id.
    pub fn toggle_expand(&mut self, id: &QuestionId) -> Result<Expansion, QuizError> {
        let entry = self.entry_mut(id)?;
        Ok(entry.panel.toggle_expand())
    }

    /// Record an answer for a question. Answering a locked panel again is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::NotFound` for an unknown id.
    /// Returns `QuizError::Range` if `index` is not an option of that question.
    pub fn select_answer(
        &mut self,
        id: &QuestionId,
        index: usize,
    ) -> Result<SelectOutcome, QuizError> {
        let entry = self.entry_mut(id)?;
        let outcome = entry
            .panel
            .select_option(&entry.question, index)
            .map_err(|err| match err {
                PanelError::OptionOutOfRange { index, len } => QuizError::Range {
                    id: id.clone(),
                    index,
                    len,
                },
                other => QuizError::Panel(other),
            })?;

        match outcome {
            SelectOutcome::Locked { correct } => {
                debug!(question = %id, index, correct, "answer recorded");
            }
            SelectOutcome::AlreadyLocked => {
                debug!(question = %id, index, "ignored answer for locked question");
            }
        }
        Ok(outcome)
    }

    /// Current `{answered, correct, total}` counts.
    #[must_use]
    pub fn score(&self) -> Score {
        self.entries.iter().fold(
            Score {
                total: self.entries.len(),
                ..Score::default()
            },
            |mut score, entry| {
                if let Some(correct) = entry.panel.is_correct(&entry.question) {
                    score.answered += 1;
                    if correct {
                        score.correct += 1;
                    }
                }
                score
            },
        )
    }

    /// Export rows for every panel in bank order.
    #[must_use]
    pub fn snapshot(&self) -> Vec<SnapshotRow> {
        self.entries
            .iter()
            .map(|Entry { question, panel, .. }| {
                let selected_index = panel.selected_index();
                SnapshotRow {
                    question_label: question.label(),
                    selected_option: selected_index.and_then(|i| question.option_label(i)),
                    selected_index,
                    correct_option: question.correct_option_label(),
                    correct_index: question.correct_index(),
                    explanation: question.explanation().to_string(),
                }
            })
            .collect()
    }

    /// Presentation view of a single panel.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::NotFound` for an unknown id.
    pub fn panel_view(&self, id: &QuestionId) -> Result<PanelView, QuizError> {
        Ok(build_view(self.entry(id)?))
    }

    /// Presentation views of every panel in bank order.
    #[must_use]
    pub fn panel_views(&self) -> Vec<PanelView> {
        self.entries.iter().map(build_view).collect()
    }

    fn entry(&self, id: &QuestionId) -> Result<&Entry, QuizError> {
        self.index
            .get(id)
            .map(|&i| &self.entries[i])
            .ok_or_else(|| QuizError::NotFound(id.clone()))
    }

    fn entry_mut(&mut self, id: &QuestionId) -> Result<&mut Entry, QuizError> {
        match self.index.get(id) {
            Some(&i) => Ok(&mut self.entries[i]),
            None => Err(QuizError::NotFound(id.clone())),
        }
    }
}

/// Validate drafts in order, reporting the first invalid question by id.
pub(crate) fn validate_drafts(
    drafts: Vec<QuestionDraft>,
) -> Result<Vec<Question>, ConfigurationError> {
    drafts
        .into_iter()
        .map(|draft| {
            let id = draft.id.clone();
            draft
                .validate()
                .map_err(|source| ConfigurationError::InvalidQuestion { id, source })
        })
        .collect()
}

fn build_view(entry: &Entry) -> PanelView {
    let Entry {
        question,
        topic,
        panel,
    } = entry;

    let options = (0..question.option_count())
        .filter_map(|i| question.option_label(i))
        .collect();
    let reveal = panel.is_correct(question).map(|correct| Reveal {
        correct,
        correct_index: question.correct_index(),
        correct_option: question.correct_option_label(),
        explanation: question.explanation().to_string(),
    });

    PanelView {
        question_id: question.id().clone(),
        label: question.label(),
        topic: topic.clone(),
        options,
        expansion: panel.expansion(),
        selected_index: panel.selected_index(),
        reveal,
    }
}

impl fmt::Debug for QuizSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let score = self.score();
        f.debug_struct("QuizSession")
            .field("total", &score.total)
            .field("answered", &score.answered)
            .field("correct", &score.correct)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
