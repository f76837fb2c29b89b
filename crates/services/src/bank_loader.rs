//! Loading question banks from JSON.
//!
//! Two layouts are accepted: a document with titled sections, or a bare array
//! of questions.
//!
//! ```json
//! { "sections": [ { "title": "Paper 1", "topic": "Research", "questions": [ ... ] } ] }
//! ```

use std::path::Path;

use quiz_core::model::{QuestionBank, QuestionDraft, Section};
use serde::Deserialize;
use tracing::debug;

use crate::error::{BankLoadError, ConfigurationError};
use crate::sessions::validate_drafts;

#[derive(Debug, Deserialize)]
struct SectionDraft {
    #[serde(default)]
    title: String,
    #[serde(default)]
    topic: Option<String>,
    questions: Vec<QuestionDraft>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum BankDocument {
    Sectioned { sections: Vec<SectionDraft> },
    Flat(Vec<QuestionDraft>),
}

/// Parse and validate a bank from JSON text.
///
/// # Errors
///
/// Returns `BankLoadError::Json` for malformed JSON or an unknown layout.
/// Returns `BankLoadError::Configuration` if a question fails validation.
pub fn load_bank_from_str(json: &str) -> Result<QuestionBank, BankLoadError> {
    let document: BankDocument = serde_json::from_str(json)?;
    let sections = match document {
        BankDocument::Sectioned { sections } => sections,
        BankDocument::Flat(questions) => vec![SectionDraft {
            title: String::new(),
            topic: None,
            questions,
        }],
    };

    let sections = sections
        .into_iter()
        .map(|draft| {
            let questions = validate_drafts(draft.questions)?;
            Ok(Section::new(draft.title, draft.topic, questions))
        })
        .collect::<Result<Vec<_>, ConfigurationError>>()?;

    let bank = QuestionBank::new(sections);
    debug!(questions = bank.len(), sections = bank.sections().len(), "question bank parsed");
    Ok(bank)
}

/// Read a bank file from disk.
///
/// # Errors
///
/// Returns `BankLoadError::Io` if the file cannot be read, otherwise the errors of
/// [`load_bank_from_str`].
pub fn load_bank_from_path(path: impl AsRef<Path>) -> Result<QuestionBank, BankLoadError> {
    let text = std::fs::read_to_string(path.as_ref())?;
    load_bank_from_str(&text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::QuestionId;

    #[test]
    fn loads_sectioned_document() {
        let json = r#"{
            "sections": [
                {
                    "title": "Political Science",
                    "topic": "Advanced Political Science",
                    "questions": [
                        {"id": 1, "question": "Father of Political Science?",
                         "options": ["Plato", "Aristotle", "Machiavelli", "Socrates"],
                         "answer": 1, "explanation": "Politics."}
                    ]
                },
                {
                    "title": "Paper 1",
                    "questions": [
                        {"id": "P1-1", "prompt": "Methodology?", "options": ["a", "b"], "correct_index": 0}
                    ]
                }
            ]
        }"#;

        let bank = load_bank_from_str(json).unwrap();
        assert_eq!(bank.sections().len(), 2);
        assert_eq!(bank.sections()[0].topic(), Some("Advanced Political Science"));
        let ids: Vec<_> = bank.questions().map(|q| q.id().clone()).collect();
        assert_eq!(ids, vec![QuestionId::from(1), QuestionId::new("P1-1")]);
    }

    #[test]
    fn loads_flat_array() {
        let json = r#"[{"id": 1, "prompt": "Q", "options": ["a", "b"], "correctIndex": 1}]"#;
        let bank = load_bank_from_str(json).unwrap();
        assert_eq!(bank.len(), 1);
        assert_eq!(bank.questions().next().unwrap().correct_index(), 1);
    }

    #[test]
    fn invalid_question_is_configuration_error() {
        let json = r#"[{"id": 4, "prompt": "Q", "options": ["a"], "answer": 0}]"#;
        let err = load_bank_from_str(json).unwrap_err();
        assert!(matches!(
            err,
            BankLoadError::Configuration(ConfigurationError::InvalidQuestion { .. })
        ));
    }

    #[test]
    fn malformed_json_is_rejected() {
        let err = load_bank_from_str("{not json").unwrap_err();
        assert!(matches!(err, BankLoadError::Json(_)));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load_bank_from_path("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, BankLoadError::Io(_)));
    }

    #[test]
    fn numeric_and_text_ids_collide_in_session() {
        let json = r#"[
            {"id": 1, "prompt": "First", "options": ["a", "b"], "answer": 0},
            {"id": "1", "prompt": "Second", "options": ["c", "d"], "answer": 1}
        ]"#;

        let bank = load_bank_from_str(json).unwrap();
        assert_eq!(bank.len(), 2);

        let err = crate::QuizSession::from_bank(&bank).unwrap_err();
        assert_eq!(err, ConfigurationError::DuplicateId(QuestionId::from(1)));
    }
}
