#![forbid(unsafe_code)]

pub mod bank_loader;
pub mod error;
pub mod export;
pub mod sessions;
pub mod timer;

pub use error::{BankLoadError, ConfigurationError, ExportError, QuizError};
pub use export::{CSV_HEADER, CsvExport, DEFAULT_EXPORT_FILE_NAME, to_csv};
pub use sessions::{PanelView, QuizSession, Reveal, Score, SnapshotRow};
pub use timer::{Countdown, CountdownTimer, TimerEvent, TimerStatus, format_clock};
