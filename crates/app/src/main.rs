use std::fmt;
use std::path::PathBuf;

use services::bank_loader::load_bank_from_path;
use services::{CountdownTimer, DEFAULT_EXPORT_FILE_NAME, QuizSession};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod adapter;
mod intent;

use adapter::{QuizApp, Reply, render_list};
use intent::QuizIntent;

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    MissingBank,
    UnknownArg(String),
    InvalidDuration { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::MissingBank => write!(f, "no question bank given (--bank or QUIZ_BANK_PATH)"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidDuration { raw } => write!(f, "invalid --duration value: {raw}"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- --bank <questions.json> [--duration <secs>] [--export <path>]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --duration 0   (no countdown)");
    eprintln!("  --export {DEFAULT_EXPORT_FILE_NAME}");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  QUIZ_BANK_PATH, QUIZ_DURATION_SECS, QUIZ_EXPORT_PATH, RUST_LOG");
}

#[derive(Debug)]
struct Args {
    bank_path: PathBuf,
    duration_secs: u64,
    export_path: PathBuf,
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut bank_path = std::env::var("QUIZ_BANK_PATH").ok().map(PathBuf::from);
        let mut duration_secs = match std::env::var("QUIZ_DURATION_SECS") {
            Ok(raw) => parse_duration(raw)?,
            Err(_) => 0,
        };
        let mut export_path = std::env::var("QUIZ_EXPORT_PATH")
            .map_or_else(|_| PathBuf::from(DEFAULT_EXPORT_FILE_NAME), PathBuf::from);

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--bank" => bank_path = Some(PathBuf::from(require_value(args, "--bank")?)),
                "--duration" => duration_secs = parse_duration(require_value(args, "--duration")?)?,
                "--export" => export_path = PathBuf::from(require_value(args, "--export")?),
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self {
            bank_path: bank_path.ok_or(ArgsError::MissingBank)?,
            duration_secs,
            export_path,
        })
    }
}

fn parse_duration(raw: String) -> Result<u64, ArgsError> {
    raw.trim()
        .parse::<u64>()
        .map_err(|_| ArgsError::InvalidDuration { raw })
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv = std::env::args().skip(1);
    let args = Args::parse(&mut argv).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    let bank = load_bank_from_path(&args.bank_path)?;
    let session = QuizSession::from_bank(&bank)?;
    info!(bank = %args.bank_path.display(), questions = session.len(), "quiz loaded");

    let (timer, mut timer_events) = CountdownTimer::new();
    let mut app = QuizApp::new(session, timer, args.export_path);

    println!("{}", render_list(&app.session().panel_views()));
    if args.duration_secs > 0 {
        let intent = QuizIntent::Timer(intent::TimerIntent::Start(args.duration_secs));
        if let Reply::Show(text) = app.dispatch(intent) {
            println!("{text}");
        }
    }
    println!("Type `help` for commands.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                let intent = match QuizIntent::parse(&line) {
                    Ok(intent) => intent,
                    Err(err) => {
                        println!("{err}");
                        continue;
                    }
                };
                match app.dispatch(intent) {
                    Reply::Show(text) => println!("{text}"),
                    Reply::Quit(text) => {
                        println!("{text}");
                        break;
                    }
                }
            }
            Some(event) = timer_events.recv() => {
                if let Some(text) = app.on_timer_event(event) {
                    println!("{text}");
                }
            }
        }
    }

    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    init_logging();
    if let Err(err) = run().await {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}
