mod console;

use std::fmt;
use std::io::BufRead;
use std::sync::Arc;
use std::time::Duration;

use quiz_core::PlayConfig;
use services::{BackendConfig, HttpQuizBackend, PlayLoop, PlayService};
use tokio::sync::mpsc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidWindow { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidWindow { raw } => write!(f, "invalid --window-secs value: {raw}"),
        }
    }
}

impl std::error::Error for ArgsError {}

/// Input ended before a quiz was joined.
#[derive(Debug)]
struct NotJoined;

impl fmt::Display for NotJoined {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("no quiz joined")
    }
}

impl std::error::Error for NotJoined {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  quiz-play [--name <name>] [--quiz <id>] [--backend <url>] [--window-secs <n>]");
    eprintln!();
    eprintln!("Missing name or quiz id are asked for on stdin.");
    eprintln!("While playing: 1-4 selects an option, `n` moves on, `f` finishes.");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  QUIZ_BACKEND_URL, QUIZ_HTTP_TIMEOUT_SECS, QUIZ_SKIP_TUNNEL_WARNING,");
    eprintln!("  QUIZ_QUESTION_SECS, QUIZ_TICK_MILLIS, RUST_LOG");
}

#[derive(Debug, Default)]
struct Args {
    name: Option<String>,
    quiz: Option<String>,
    backend: Option<String>,
    window: Option<Duration>,
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut parsed = Self::default();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--name" => parsed.name = Some(require_value(args, "--name")?),
                "--quiz" => parsed.quiz = Some(require_value(args, "--quiz")?),
                "--backend" => parsed.backend = Some(require_value(args, "--backend")?),
                "--window-secs" => {
                    let value = require_value(args, "--window-secs")?;
                    let secs: u64 = value
                        .trim()
                        .parse()
                        .ok()
                        .filter(|secs| *secs > 0)
                        .ok_or_else(|| ArgsError::InvalidWindow { raw: value.clone() })?;
                    parsed.window = Some(Duration::from_secs(secs));
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(parsed)
    }
}

/// Read stdin on its own thread; tokio's stdin would hold up shutdown.
fn stdin_lines() -> mpsc::UnboundedReceiver<String> {
    let (tx, rx) = mpsc::unbounded_channel();
    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if tx.send(line).is_err() {
                break;
            }
        }
    });
    rx
}

async fn prompt(lines: &mut mpsc::UnboundedReceiver<String>, label: &str) -> Option<String> {
    eprint!("{label}: ");
    lines.recv().await
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenvy::dotenv();
    init_tracing();

    let mut argv = std::env::args().skip(1);
    let mut args = Args::parse(&mut argv).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    let backend_config = match args.backend.take() {
        Some(url) => {
            let from_env = BackendConfig::from_env()?;
            BackendConfig::new(&url)?
                .with_timeout(from_env.timeout)
                .with_skip_tunnel_warning(from_env.skip_tunnel_warning)
        }
        None => BackendConfig::from_env()?,
    };
    let mut play_config = PlayConfig::from_env()?;
    if let Some(window) = args.window {
        play_config = play_config.with_question_window(window);
    }

    let backend = Arc::new(HttpQuizBackend::new(backend_config)?);
    let service = PlayService::new(backend, play_config);
    let mut session = service.new_session();
    let mut lines = stdin_lines();

    loop {
        let name = match args.name.take() {
            Some(name) => name,
            None => prompt(&mut lines, "Your name").await.ok_or(NotJoined)?,
        };
        let quiz_id = match args.quiz.take() {
            Some(id) => id,
            None => prompt(&mut lines, "Quiz id").await.ok_or(NotJoined)?,
        };

        match service.join(&mut session, &name, &quiz_id).await {
            Ok(quiz) => {
                println!("{} ({} questions)", quiz.title(), quiz.len());
                break;
            }
            Err(err) => warn!(error = %err, "join failed, asking again"),
        }
    }

    let (input_tx, input_rx) = mpsc::channel(16);
    tokio::spawn(async move {
        while let Some(line) = lines.recv().await {
            match console::parse_command(&line) {
                Some(input) => {
                    if input_tx.send(input).await.is_err() {
                        break;
                    }
                }
                None => eprintln!("{}", console::COMMAND_HINT),
            }
        }
    });

    let (event_tx, mut event_rx) = mpsc::unbounded_channel();
    let renderer = tokio::spawn(async move {
        while let Some(event) = event_rx.recv().await {
            if let Some(text) = console::format_event(&event) {
                println!("{text}");
            }
        }
    });

    let result = PlayLoop::new(service)
        .run(&mut session, input_rx, event_tx)
        .await?;
    info!(score = %result.score, confirmed = result.is_confirmed(), "session finished");
    renderer.await?;

    if let Some(reviews) = session.review() {
        println!("{}", console::format_review(&reviews));
    }
    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Args, ArgsError> {
        Args::parse(&mut args.iter().map(|s| (*s).to_string()))
    }

    #[test]
    fn parses_all_flags() {
        let args = parse(&[
            "--name",
            "Ada",
            "--quiz",
            "12",
            "--backend",
            "http://localhost:9000",
            "--window-secs",
            "30",
        ])
        .unwrap();
        assert_eq!(args.name.as_deref(), Some("Ada"));
        assert_eq!(args.quiz.as_deref(), Some("12"));
        assert_eq!(args.backend.as_deref(), Some("http://localhost:9000"));
        assert_eq!(args.window, Some(Duration::from_secs(30)));
    }

    #[test]
    fn rejects_bad_flags() {
        assert!(matches!(
            parse(&["--name"]),
            Err(ArgsError::MissingValue { flag: "--name" })
        ));
        assert!(matches!(
            parse(&["--window-secs", "0"]),
            Err(ArgsError::InvalidWindow { .. })
        ));
        assert!(matches!(parse(&["--verbose"]), Err(ArgsError::UnknownArg(_))));
    }
}
