use std::fmt;
use std::io;
use std::sync::Arc;
use std::time::Duration;

use quiz_core::model::Catalog;
use services::{Clock, LeaderboardService, QuizDriver, QuizService, Shuffler};
use storage::repository::Storage;
use tracing::info;

mod terminal;

use terminal::TerminalFrontend;

const DEFAULT_DB_URL: &str = "sqlite://leaderboard.sqlite3";
const DEFAULT_TIMEOUT_MS: u64 = 5_000;

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidDbUrl { raw: String },
    InvalidTimeout { raw: String },
    InvalidTop { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
            ArgsError::InvalidTimeout { raw } => write!(f, "invalid --timeout-ms value: {raw}"),
            ArgsError::InvalidTop { raw } => write!(f, "invalid --top value: {raw}"),
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
    eprintln!("  quiz [--db <sqlite_url>] [--timeout-ms <ms>] [--top <n>]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --db {DEFAULT_DB_URL}");
    eprintln!("  --timeout-ms {DEFAULT_TIMEOUT_MS}");
    eprintln!("  --top (all rows)");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  QUIZ_DB_URL, QUIZ_STORE_TIMEOUT_MS, QUIZ_LEADERBOARD_TOP, RUST_LOG");
}

#[derive(Debug, PartialEq, Eq)]
struct Args {
    db_url: String,
    store_timeout: Duration,
    top: Option<u32>,
}

impl Args {
    /// Flags override environment, environment overrides defaults.
    fn parse(
        args: &mut impl Iterator<Item = String>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Option<Self>, ArgsError> {
        let mut db_url =
            env("QUIZ_DB_URL").map_or_else(|| DEFAULT_DB_URL.into(), normalize_sqlite_url);
        let mut store_timeout = match env("QUIZ_STORE_TIMEOUT_MS") {
            Some(raw) => parse_timeout(raw)?,
            None => Duration::from_millis(DEFAULT_TIMEOUT_MS),
        };
        let mut top = match env("QUIZ_LEADERBOARD_TOP") {
            Some(raw) => Some(parse_top(raw)?),
            None => None,
        };

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = normalize_sqlite_url(value);
                }
                "--timeout-ms" => {
                    store_timeout = parse_timeout(require_value(args, "--timeout-ms")?)?;
                }
                "--top" => {
                    top = Some(parse_top(require_value(args, "--top")?)?);
                }
                "--help" | "-h" => return Ok(None),
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Some(Self {
            db_url,
            store_timeout,
            top,
        }))
    }
}

fn parse_timeout(raw: String) -> Result<Duration, ArgsError> {
    match raw.trim().parse::<u64>() {
        Ok(ms) if ms > 0 => Ok(Duration::from_millis(ms)),
        _ => Err(ArgsError::InvalidTimeout { raw }),
    }
}

fn parse_top(raw: String) -> Result<u32, ArgsError> {
    match raw.trim().parse::<u32>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(ArgsError::InvalidTop { raw }),
    }
}

fn normalize_sqlite_url(raw: String) -> String {
    if raw == "sqlite::memory:" || raw.starts_with("sqlite://") {
        return raw;
    }

    let trimmed = raw.trim().to_string();
    let path_str = trimmed
        .strip_prefix("sqlite:")
        .unwrap_or(trimmed.as_str())
        .to_string();
    let path = std::path::Path::new(&path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| std::path::PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

/// Make sure the database file (and its directory) exists before connecting.
fn prepare_sqlite_file(db_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    if db_url == "sqlite::memory:" {
        return Ok(());
    }

    let path = db_url
        .strip_prefix("sqlite://")
        .ok_or_else(|| ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        })?;
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        return Err(ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        }
        .into());
    }

    let path = std::path::Path::new(path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    if !path.exists() {
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)?;
    }

    Ok(())
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv = std::env::args().skip(1);
    let parsed = match Args::parse(&mut argv, |key| std::env::var(key).ok()) {
        Ok(Some(parsed)) => parsed,
        Ok(None) => {
            print_usage();
            return Ok(());
        }
        Err(e) => {
            eprintln!("{e}");
            print_usage();
            return Err(e.into());
        }
    };

    // Open + migrate SQLite at startup. Keep this in the binary glue so core/services stay pure.
    prepare_sqlite_file(&parsed.db_url)?;
    let storage = Storage::sqlite_with_timeout(&parsed.db_url, parsed.store_timeout).await?;
    info!(
        db = %parsed.db_url,
        timeout_ms = %parsed.store_timeout.as_millis(),
        "leaderboard store ready"
    );

    let quiz = QuizService::new(
        Clock::system(),
        Arc::new(Catalog::default()),
        Arc::clone(&storage.leaderboard),
    );
    let leaderboard =
        LeaderboardService::new(Arc::clone(&storage.leaderboard)).with_limit(parsed.top);
    let frontend = TerminalFrontend::new(io::stdin().lock(), io::stdout());

    println!("Match the open source tool to what it does!");
    let mut driver = QuizDriver::new(quiz, leaderboard, Shuffler::from_entropy(), frontend);
    driver.run().await?;
    Ok(())
}

#[tokio::main]
async fn main() {
    init_tracing();
    if let Err(err) = run().await {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}
