mod bank;
mod ids;
mod panel;
mod question;

pub use ids::{ParseIdError, QuestionId};

pub use bank::{QuestionBank, Section};
pub use panel::{AnswerState, Expansion, Panel, PanelError, SelectOutcome};
pub use question::{
    MIN_OPTIONS, Question, QuestionDraft, QuestionError, option_letter, parse_option_ref,
};
