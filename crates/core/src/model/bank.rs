use crate::model::question::Question;

/// A titled group of questions sharing a topic badge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    title: String,
    topic: Option<String>,
    questions: Vec<Question>,
}

impl Section {
    #[must_use]
    pub fn new(title: impl Into<String>, topic: Option<String>, questions: Vec<Question>) -> Self {
        Self {
            title: title.into(),
            topic,
            questions,
        }
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn topic(&self) -> Option<&str> {
        self.topic.as_deref()
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }
}

/// Ordered, immutable collection of questions grouped into sections.
///
/// Bank order is section order, then question order within each section.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct QuestionBank {
    sections: Vec<Section>,
}

impl QuestionBank {
    #[must_use]
    pub fn new(sections: Vec<Section>) -> Self {
        Self { sections }
    }

    /// Wraps a flat list in a single untitled section.
    #[must_use]
    pub fn from_questions(questions: Vec<Question>) -> Self {
        Self::new(vec![Section::new("", None, questions)])
    }

    #[must_use]
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// Iterates every question in bank order along with its section.
    pub fn entries(&self) -> impl Iterator<Item = (&Section, &Question)> {
        self.sections
            .iter()
            .flat_map(|section| section.questions.iter().map(move |q| (section, q)))
    }

    /// Iterates every question in bank order.
    pub fn questions(&self) -> impl Iterator<Item = &Question> {
        self.entries().map(|(_, q)| q)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.sections.iter().map(|s| s.questions.len()).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::QuestionDraft;

    fn question(id: &str) -> Question {
        QuestionDraft::new(id, "Q", vec!["a".into(), "b".into()], 0)
            .validate()
            .unwrap()
    }

    #[test]
    fn entries_follow_section_order() {
        let bank = QuestionBank::new(vec![
            Section::new("Paper 2", Some("Political Science".into()), vec![question("1"), question("2")]),
            Section::new("Paper 1", None, vec![question("P1-1")]),
        ]);

        let ids: Vec<_> = bank.questions().map(|q| q.id().to_string()).collect();
        assert_eq!(ids, ["1", "2", "P1-1"]);
        assert_eq!(bank.len(), 3);

        let topics: Vec<_> = bank.entries().map(|(s, _)| s.topic()).collect();
        assert_eq!(topics, [Some("Political Science"), Some("Political Science"), None]);
    }

    #[test]
    fn empty_bank_reports_empty() {
        assert!(QuestionBank::default().is_empty());
        assert!(QuestionBank::from_questions(Vec::new()).is_empty());
    }
}
