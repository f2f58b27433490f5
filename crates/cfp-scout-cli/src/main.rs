use std::path::PathBuf;
use std::process;
use std::time::Duration;

use cfp_scout::config::{Config, DEFAULT_STORE_PATH, DEFAULT_TIMEOUT};
use cfp_scout::{Pipeline, conferenceradar, wikicfp};
use clap::{Parser, ValueEnum};
use log::LevelFilter;

#[derive(Parser)]
#[command(name = "cfp-scout")]
#[command(
    about = "Scrapes call-for-papers listings and records the new ones about international economics, logistics and trade",
    long_about = None
)]
struct Cli {
    #[arg(
        short = 'l',
        long = "log-level",
        value_enum,
        default_value = "info",
        help = "Set the logging level"
    )]
    log_level: LogLevel,

    #[arg(
        long,
        value_name = "PATH",
        default_value = DEFAULT_STORE_PATH,
        help = "CSV file holding every CFP found so far"
    )]
    store: PathBuf,

    #[arg(
        long,
        value_name = "SECONDS",
        default_value_t = DEFAULT_TIMEOUT.as_secs(),
        value_parser = clap::value_parser!(u64).range(1..),
        help = "Timeout for each listing request"
    )]
    timeout: u64,

    #[arg(long, value_name = "URL", default_value = wikicfp::DEFAULT_ENDPOINT)]
    wikicfp_url: String,

    #[arg(long, value_name = "URL", default_value = conferenceradar::DEFAULT_ENDPOINT)]
    conferenceradar_url: String,

    #[arg(
        short = 'o',
        long = "output",
        value_enum,
        default_value = "text",
        help = "Output format of the run summary"
    )]
    format: OutputFormat,
}

#[derive(Debug, Clone, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => LevelFilter::Off,
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

#[derive(Debug, Clone, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

impl Cli {
    fn config(&self) -> Config {
        Config {
            store_path: self.store.clone(),
            wikicfp_url: self.wikicfp_url.clone(),
            conferenceradar_url: self.conferenceradar_url.clone(),
            timeout: Duration::from_secs(self.timeout),
            ..Config::default()
        }
    }
}

/// Fatal errors bypass the logger so `--log-level off` cannot hide them.
fn fail(context: &str, err: impl std::fmt::Display) -> ! {
    eprintln!("{}", failure_line(context, err));
    process::exit(1);
}

fn failure_line(context: &str, err: impl std::fmt::Display) -> String {
    format!("Error: {context}: {err}")
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(cli.log_level.clone().into())
        .target(env_logger::Target::Stdout)
        .init();

    let config = cli.config();

    let pipeline =
        Pipeline::from_config(&config).unwrap_or_else(|e| fail("creating scraper", e));

    log::info!("Searching for new calls for papers...");

    let today = chrono::Local::now().date_naive();
    let summary = pipeline
        .run(today)
        .await
        .unwrap_or_else(|e| fail("run aborted", e));

    match cli.format {
        OutputFormat::Json => match serde_json::to_string_pretty(&summary) {
            Ok(json) => println!("{}", json),
            Err(e) => fail("serializing to JSON", e),
        },
        OutputFormat::Text => println!("{}", summary),
    }
}
