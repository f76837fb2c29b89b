use serde::Serialize;

use quiz_core::model::{Expansion, QuestionId};

/// Read-only projection of one panel for a presentation adapter.
///
/// The correct answer and explanation are only revealed once the panel is locked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PanelView {
    pub question_id: QuestionId,
    pub label: String,
    pub topic: Option<String>,
    pub options: Vec<String>,
    pub expansion: Expansion,
    pub selected_index: Option<usize>,
    pub reveal: Option<Reveal>,
}

impl PanelView {
    #[must_use]
    pub fn is_expanded(&self) -> bool {
        self.expansion == Expansion::Expanded
    }
}

/// What a locked panel shows below its options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reveal {
    pub correct: bool,
    pub correct_index: usize,
    pub correct_option: String,
    pub explanation: String,
}

/// One exported row per panel, in bank order.
///
/// Selected fields are `None` for unanswered panels; correct fields are always set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SnapshotRow {
    pub question_label: String,
    pub selected_option: Option<String>,
    pub selected_index: Option<usize>,
    pub correct_option: String,
    pub correct_index: usize,
    pub explanation: String,
}
