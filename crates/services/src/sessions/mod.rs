mod progress;
mod service;
mod view;

// Public API of the session subsystem.
pub use crate::error::{ConfigurationError, QuizError};
pub use progress::Score;
pub use service::QuizSession;
pub(crate) use service::validate_drafts;
pub use view::{PanelView, Reveal, SnapshotRow};
