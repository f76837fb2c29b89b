//! Shared error types for the services crate.

use thiserror::Error;

use quiz_core::model::{PanelError, QuestionError, QuestionId};

/// Question-bank problems detected while building a session.
///
/// These are fatal: no session is produced.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConfigurationError {
    #[error("question bank is empty")]
    EmptyBank,
    #[error("duplicate question id {0}")]
    DuplicateId(QuestionId),
    #[error("question {id} is invalid: {source}")]
    InvalidQuestion {
        id: QuestionId,
        #[source]
        source: QuestionError,
    },
}

/// Errors emitted by `QuizSession`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuizError {
    #[error("no question with id {0}")]
    NotFound(QuestionId),
    #[error("option {index} is out of range for question {id} ({len} options)")]
    Range {
        id: QuestionId,
        index: usize,
        len: usize,
    },
    #[error(transparent)]
    Panel(PanelError),
}

/// Errors emitted while loading a question bank.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum BankLoadError {
    #[error("failed to read question bank: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed question bank: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
}

/// Errors emitted by the CSV exporter.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ExportError {
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error("csv buffer could not be flushed: {0}")]
    Flush(String),
    #[error("csv output is not valid utf-8")]
    Utf8(#[from] std::string::FromUtf8Error),
}
