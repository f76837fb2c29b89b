use std::fmt;
use std::path::PathBuf;

use quiz_core::model::{QuestionId, parse_option_ref};

/// Timer controls available from the prompt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimerIntent {
    Start(u64),
    Pause,
    Resume,
    Stop,
}

/// A single user command, already parsed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum QuizIntent {
    List,
    Toggle(QuestionId),
    Answer(QuestionId, usize),
    Score,
    Results,
    Time,
    Export(Option<PathBuf>),
    Timer(TimerIntent),
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntentError {
    Empty,
    Unknown(String),
    MissingArgument { command: &'static str, what: &'static str },
    InvalidOption(String),
    InvalidSeconds(String),
}

impl fmt::Display for IntentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IntentError::Empty => write!(f, "type a command, or `help`"),
            IntentError::Unknown(cmd) => write!(f, "unknown command: {cmd}"),
            IntentError::MissingArgument { command, what } => {
                write!(f, "`{command}` requires {what}")
            }
            IntentError::InvalidOption(raw) => {
                write!(f, "invalid option `{raw}`; use the option label shown (a, b, ...)")
            }
            IntentError::InvalidSeconds(raw) => write!(f, "invalid seconds value: {raw}"),
        }
    }
}

impl std::error::Error for IntentError {}

impl QuizIntent {
    /// Parse one input line such as `answer 3 b` or `timer pause`.
    ///
    /// # Errors
    ///
    /// Returns `IntentError` when the line is not a known command or an argument is bad.
    pub fn parse(line: &str) -> Result<Self, IntentError> {
        let mut words = line.split_whitespace();
        let Some(command) = words.next() else {
            return Err(IntentError::Empty);
        };

        match command.to_ascii_lowercase().as_str() {
            "list" | "ls" => Ok(Self::List),
            "open" | "toggle" => {
                let id = question_id(words.next(), "open")?;
                Ok(Self::Toggle(id))
            }
            "answer" | "a" => {
                let id = question_id(words.next(), "answer")?;
                let raw = words.next().ok_or(IntentError::MissingArgument {
                    command: "answer",
                    what: "an option",
                })?;
                let index =
                    parse_option_ref(raw).ok_or_else(|| IntentError::InvalidOption(raw.into()))?;
                Ok(Self::Answer(id, index))
            }
            "score" => Ok(Self::Score),
            "results" => Ok(Self::Results),
            "time" => Ok(Self::Time),
            "export" => Ok(Self::Export(words.next().map(PathBuf::from))),
            "timer" => parse_timer(words.next(), words.next()).map(Self::Timer),
            "help" | "?" => Ok(Self::Help),
            "quit" | "exit" | "q" => Ok(Self::Quit),
            other => Err(IntentError::Unknown(other.to_string())),
        }
    }
}

fn question_id(raw: Option<&str>, command: &'static str) -> Result<QuestionId, IntentError> {
    raw.and_then(|value| value.parse::<QuestionId>().ok())
        .ok_or(IntentError::MissingArgument {
            command,
            what: "a question id",
        })
}

fn parse_timer(action: Option<&str>, value: Option<&str>) -> Result<TimerIntent, IntentError> {
    match action {
        Some("start") => {
            let raw = value.ok_or(IntentError::MissingArgument {
                command: "timer start",
                what: "a number of seconds",
            })?;
            raw.parse::<u64>()
                .map(TimerIntent::Start)
                .map_err(|_| IntentError::InvalidSeconds(raw.to_string()))
        }
        Some("pause") => Ok(TimerIntent::Pause),
        Some("resume") => Ok(TimerIntent::Resume),
        Some("stop") => Ok(TimerIntent::Stop),
        Some(other) => Err(IntentError::Unknown(format!("timer {other}"))),
        None => Err(IntentError::MissingArgument {
            command: "timer",
            what: "start|pause|resume|stop",
        }),
    }
}
