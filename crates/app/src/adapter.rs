//! Terminal presentation of a quiz session.
//!
//! Turns parsed intents into session/timer calls and renders the results as text.
//! Rendering returns strings so the binary decides where they go.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use quiz_core::model::{QuestionId, SelectOutcome, option_letter};
use services::{
    CountdownTimer, CsvExport, PanelView, QuizError, QuizSession, Score, TimerEvent, TimerStatus,
    format_clock,
};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::intent::{QuizIntent, TimerIntent};

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Export(#[from] services::ExportError),
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// What the loop should do after an intent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Show(String),
    Quit(String),
}

/// Owns the session and the timer; applies the expiry policy.
///
/// When the countdown runs out the quiz is frozen: panels can still be opened
/// for review, but no more answers are accepted.
pub struct QuizApp {
    session: QuizSession,
    timer: CountdownTimer,
    export_path: PathBuf,
    frozen: bool,
}

impl QuizApp {
    #[must_use]
    pub fn new(session: QuizSession, timer: CountdownTimer, export_path: PathBuf) -> Self {
        Self {
            session,
            timer,
            export_path,
            frozen: false,
        }
    }

    #[must_use]
    pub fn session(&self) -> &QuizSession {
        &self.session
    }

    #[must_use]
    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    /// Apply one intent.
    ///
    /// Unknown ids, out-of-range options and failed exports are reported back to
    /// the user; none of them ends the session.
    pub fn dispatch(&mut self, intent: QuizIntent) -> Reply {
        let text = match intent {
            QuizIntent::List => render_list(&self.session.panel_views()),
            QuizIntent::Toggle(id) => match self.session.toggle_expand(&id) {
                Ok(_) => self.render_panel(&id),
                Err(err) => rejected(&err),
            },
            QuizIntent::Answer(id, index) => self.answer(&id, index),
            QuizIntent::Score => render_score(self.session.score()),
            QuizIntent::Results => render_results(self.session.score()),
            QuizIntent::Time => format!("Time: {}", format_clock(self.timer.remaining())),
            QuizIntent::Export(path) => {
                let path = path.unwrap_or_else(|| self.export_path.clone());
                match self.export(&path) {
                    Ok(text) => text,
                    Err(err) => {
                        warn!(%err, "export failed");
                        format!("Export failed: {err}")
                    }
                }
            }
            QuizIntent::Timer(action) => self.timer_action(action),
            QuizIntent::Help => HELP.to_string(),
            QuizIntent::Quit => return Reply::Quit(render_results(self.session.score())),
        };
        Reply::Show(text)
    }

    /// React to a timer notification. Returns text to show, if any.
    ///
    /// An expiry that arrives after the countdown was restarted belongs to the old
    /// countdown and is ignored.
    pub fn on_timer_event(&mut self, event: TimerEvent) -> Option<String> {
        match event {
            TimerEvent::Tick { .. } => None,
            TimerEvent::Expired if self.timer.is_running() => {
                debug!("stale expiry ignored");
                None
            }
            TimerEvent::Expired => {
                self.frozen = true;
                info!("time is up, answers closed");
                Some(format!(
                    "Time: {}\nTime is up. Answers are closed.\n{}",
                    format_clock(0),
                    render_results(self.session.score())
                ))
            }
        }
    }

    fn answer(&mut self, id: &QuestionId, index: usize) -> String {
        if self.is_frozen() {
            return "Time is up; answers are closed.".to_string();
        }
        match self.session.select_answer(id, index) {
            Ok(SelectOutcome::Locked { .. }) => self.render_panel(id),
            Ok(SelectOutcome::AlreadyLocked) => {
                format!("Q{id} is already answered.")
            }
            Err(err) => rejected(&err),
        }
    }

    fn timer_action(&mut self, action: TimerIntent) -> String {
        match action {
            TimerIntent::Start(seconds) => match self.timer.start(seconds) {
                TimerStatus::Running => {
                    self.frozen = false;
                    format!("Time: {}", format_clock(seconds))
                }
                TimerStatus::Expired => format!("Time: {}", format_clock(0)),
            },
            TimerIntent::Pause => {
                self.timer.pause();
                format!("Paused at {}", format_clock(self.timer.remaining()))
            }
            TimerIntent::Resume => {
                self.timer.resume();
                format!("Time: {}", format_clock(self.timer.remaining()))
            }
            TimerIntent::Stop => {
                self.timer.stop();
                format!("Timer stopped. Time: {}", format_clock(0))
            }
        }
    }

    fn export(&self, path: &Path) -> Result<String, AppError> {
        let file_name = path
            .file_name()
            .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());
        let export = CsvExport::render(file_name, &self.session.snapshot())?;
        std::fs::write(path, export.as_bytes()).map_err(|source| AppError::Write {
            path: path.to_path_buf(),
            source,
        })?;
        info!(path = %path.display(), "answers exported");
        Ok(format!("Exported {} to {}", export.file_name, path.display()))
    }

    fn render_panel(&self, id: &QuestionId) -> String {
        match self.session.panel_view(id) {
            Ok(view) => render_panel(&view),
            Err(err) => rejected(&err),
        }
    }
}

fn rejected(err: &QuizError) -> String {
    warn!(%err, "intent rejected");
    format!("Rejected: {err}")
}

/// One header line per panel, with the body of expanded panels.
#[must_use]
pub fn render_list(views: &[PanelView]) -> String {
    let mut out = String::new();
    let mut topic: Option<&str> = None;
    for view in views {
        if view.topic.as_deref() != topic {
            topic = view.topic.as_deref();
            if let Some(t) = topic {
                let _ = writeln!(out, "== {t} ==");
            }
        }
        out.push_str(&render_panel(view));
        out.push('\n');
    }
    out.trim_end().to_string()
}

/// Panel header, plus options and reveal when expanded.
#[must_use]
pub fn render_panel(view: &PanelView) -> String {
    let marker = if view.is_expanded() { "[-]" } else { "[+]" };
    let status = match &view.reveal {
        None => "",
        Some(reveal) if reveal.correct => "  (correct)",
        Some(_) => "  (incorrect)",
    };
    let mut out = format!("{marker} {}{status}", view.label);
    if !view.is_expanded() {
        return out;
    }

    for (i, option) in view.options.iter().enumerate() {
        let selected = if view.selected_index == Some(i) { ">" } else { " " };
        let _ = write!(out, "\n   {selected} {option}");
    }
    if let Some(reveal) = &view.reveal {
        let _ = write!(out, "\n   Correct Answer: {}", reveal.correct_option);
        if !reveal.explanation.is_empty() {
            let _ = write!(out, "\n   {}", reveal.explanation);
        }
    } else {
        let last = view.options.len().saturating_sub(1);
        let _ = write!(
            out,
            "\n   answer {} <{}-{}>",
            view.question_id,
            option_letter(0).to_lowercase(),
            option_letter(last).to_lowercase()
        );
    }
    out
}

#[must_use]
pub fn render_score(score: Score) -> String {
    format!(
        "Answered {}/{} | Correct {}",
        score.answered, score.total, score.correct
    )
}

/// The results summary shown at the end of a quiz.
#[must_use]
pub fn render_results(score: Score) -> String {
    format!(
        "Results\n  Score:      {}\n  Answered:   {}\n  Unanswered: {}\n  Total:      {}",
        score.correct,
        score.answered,
        score.unanswered(),
        score.total
    )
}

const HELP: &str = "\
Commands:
  list                      show all questions
  open <id>                 expand or collapse a question
  answer <id> <label>       answer a question (once)
  score                     answered / correct so far
  results                   results summary
  time                      remaining time
  timer start <secs>        start the countdown
  timer pause|resume|stop   control the countdown
  export [path]             write answers as CSV
  quit                      leave with a summary";

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::QuestionDraft;

    fn app() -> QuizApp {
        let session = QuizSession::from_drafts(vec![
            QuestionDraft::new(1, "First", vec!["Plato".into(), "Aristotle".into()], 1)
                .with_explanation("Politics."),
            QuestionDraft::new(2, "Second", vec!["x".into(), "y".into(), "z".into()], 0),
        ])
        .unwrap();
        let (timer, _rx) = CountdownTimer::new();
        QuizApp::new(session, timer, PathBuf::from("quiz_answers.csv"))
    }

    fn show(reply: Reply) -> String {
        match reply {
            Reply::Show(text) => text,
            Reply::Quit(text) => panic!("unexpected quit: {text}"),
        }
    }

    #[test]
    fn open_then_answer_reveals_explanation() {
        let mut app = app();
        let id = QuestionId::from(1);

        let opened = show(app.dispatch(QuizIntent::Toggle(id.clone())));
        assert!(opened.starts_with("[-] Q1: First"));
        assert!(opened.contains("B. Aristotle"));

        let answered = show(app.dispatch(QuizIntent::Answer(id.clone(), 1)));
        assert!(answered.contains("(correct)"));
        assert!(answered.contains("Correct Answer: B. Aristotle"));
        assert!(answered.contains("Politics."));

        let again = show(app.dispatch(QuizIntent::Answer(id, 0)));
        assert_eq!(again, "Q1 is already answered.");
    }

    #[test]
    fn unknown_question_is_reported() {
        let mut app = app();
        let text = show(app.dispatch(QuizIntent::Answer(QuestionId::from(9), 0)));
        assert!(text.starts_with("Rejected: no question with id 9"));
    }

    #[test]
    fn expiry_freezes_answers_but_not_review() {
        let mut app = app();
        let summary = app.on_timer_event(TimerEvent::Expired).unwrap();
        assert!(summary.contains("Time is up"));
        assert!(app.is_frozen());

        let text = show(app.dispatch(QuizIntent::Answer(QuestionId::from(2), 0)));
        assert_eq!(text, "Time is up; answers are closed.");
        assert_eq!(app.session().score().answered, 0);

        let opened = show(app.dispatch(QuizIntent::Toggle(QuestionId::from(2))));
        assert!(opened.starts_with("[-]"));
    }

    #[test]
    fn quit_returns_results() {
        let mut app = app();
        app.dispatch(QuizIntent::Answer(QuestionId::from(2), 0));
        match app.dispatch(QuizIntent::Quit) {
            Reply::Quit(text) => {
                assert!(text.contains("Score:      1"));
                assert!(text.contains("Unanswered: 1"));
            }
            Reply::Show(text) => panic!("expected quit, got {text}"),
        }
    }

    #[test]
    fn export_writes_csv_file() {
        let mut app = app();
        app.dispatch(QuizIntent::Answer(QuestionId::from(1), 0));

        let path = std::env::temp_dir().join(format!("quiz_export_{}.csv", std::process::id()));
        let text = show(app.dispatch(QuizIntent::Export(Some(path.clone()))));
        assert!(text.starts_with("Exported"));

        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written.lines().count(), 3);
        assert!(written.contains(r#""Q1: First","A. Plato","0","B. Aristotle","1","Politics.""#));
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn list_shows_collapsed_headers() {
        let app_views = app().session().panel_views();
        let text = render_list(&app_views);
        assert_eq!(text, "[+] Q1: First\n[+] Q2: Second");
    }

    #[test]
    fn failed_export_keeps_session_running() {
        let mut app = app();
        let path = PathBuf::from("/no/such/dir/out.csv");

        let text = show(app.dispatch(QuizIntent::Export(Some(path))));
        assert!(text.starts_with("Export failed: failed to write /no/such/dir/out.csv"));

        let answered = show(app.dispatch(QuizIntent::Answer(QuestionId::from(1), 1)));
        assert!(answered.contains("(correct)"));
        assert_eq!(app.session().score().answered, 1);
    }

    #[tokio::test]
    async fn expiry_from_previous_countdown_does_not_freeze() {
        let mut app = app();
        show(app.dispatch(QuizIntent::Timer(TimerIntent::Start(30))));

        assert_eq!(app.on_timer_event(TimerEvent::Expired), None);
        assert!(!app.is_frozen());

        let answered = show(app.dispatch(QuizIntent::Answer(QuestionId::from(2), 0)));
        assert!(answered.contains("(correct)"));
    }
}
