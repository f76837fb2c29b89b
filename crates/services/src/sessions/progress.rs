use serde::Serialize;

/// Aggregated answer counts, recomputed from panel state on every call.
///
/// Always `correct <= answered <= total`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Score {
    pub answered: usize,
    pub correct: usize,
    pub total: usize,
}

impl Score {
    #[must_use]
    pub fn unanswered(&self) -> usize {
        self.total.saturating_sub(self.answered)
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.answered == self.total
    }
}
