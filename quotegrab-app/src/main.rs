use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use quotegrab_common::observability::{LogConfig, LogFormat, init_logging};
use quotegrab_config::{Overrides, Settings, SettingsLoader};
use quotegrab_http::HttpClient;

mod app;
mod report;

/// Exit code for unusable configuration, matching clap's usage errors.
const CONFIG_ERROR: u8 = 2;

#[derive(Parser, Debug)]
#[command(
    name = "quotegrab",
    version,
    about = "Fetch a page and print the quotes and authors found on it"
)]
struct Cli {
    /// Pages to scrape, one request each [default: https://quotes.toscrape.com/]
    urls: Vec<String>,
    /// Extra request header, repeatable
    #[arg(short = 'H', long = "header", value_name = "NAME: VALUE")]
    headers: Vec<String>,
    /// Override the browser-like User-Agent
    #[arg(long)]
    user_agent: Option<String>,
    /// Per-request timeout [default: 10]
    #[arg(long, value_name = "SECS")]
    timeout_secs: Option<u64>,
    /// Pause between consecutive URLs [default: 0]
    #[arg(long, value_name = "MS")]
    delay_ms: Option<u64>,
    /// Exit non-zero when a fetch fails (3 timeout, 4 HTTP status, 5 connection, 6 other)
    #[arg(long)]
    strict_exit: bool,
    /// Also write logs to stderr
    #[arg(short, long)]
    verbose: bool,
    #[arg(long, value_enum)]
    log_format: Option<LogFormatArg>,
    /// Log directory [default: ~/.local/share/quotegrab]
    #[arg(long)]
    log_dir: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum LogFormatArg {
    Text,
    Json,
}

impl From<LogFormatArg> for LogFormat {
    fn from(arg: LogFormatArg) -> Self {
        match arg {
            LogFormatArg::Text => LogFormat::Text,
            LogFormatArg::Json => LogFormat::Json,
        }
    }
}

impl Cli {
    fn into_overrides(self) -> Overrides {
        Overrides {
            urls: self.urls,
            user_agent: self.user_agent,
            headers: self.headers,
            timeout_secs: self.timeout_secs,
            delay_ms: self.delay_ms,
            strict_exit: self.strict_exit,
            log_dir: self.log_dir,
            log_format: self.log_format.map(Into::into),
            verbose: self.verbose,
        }
    }
}

fn load_settings(cli: Cli) -> Result<Settings> {
    let settings = SettingsLoader::new()
        .with_overrides(cli.into_overrides())?
        .load()?;
    Ok(settings)
}

/// Install the log sink. An unusable log directory is reported on stderr and
/// the run continues without logs.
fn start_logging(settings: &Settings) -> Option<PathBuf> {
    let config = LogConfig {
        log_dir: settings.log_dir.clone(),
        emit_stderr: settings.verbose,
        format: settings.log_format,
        ..LogConfig::default()
    };
    match init_logging(config) {
        Ok(path) => Some(path),
        Err(err) => {
            eprintln!("quotegrab: logging disabled: {err:#}");
            None
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode> {
    // 1) Settings: CLI > env > defaults
    let settings = match load_settings(Cli::parse()) {
        Ok(settings) => settings,
        Err(err) => {
            eprintln!("quotegrab: {err:#}");
            return Ok(ExitCode::from(CONFIG_ERROR));
        }
    };
    let headers = match app::build_headers(&settings) {
        Ok(headers) => headers,
        Err(err) => {
            eprintln!("quotegrab: {err:#}");
            return Ok(ExitCode::from(CONFIG_ERROR));
        }
    };

    // 2) Logging (stdout is reserved for the report)
    let log_path = start_logging(&settings);
    tracing::info!(
        log=?log_path,
        urls=settings.urls.len(),
        timeout_secs=settings.timeout_secs,
        strict_exit=settings.strict_exit,
        "quotegrab.start"
    );

    // 3) Fetch → parse → extract → report, one URL at a time
    let client = HttpClient::new()?;
    let mut stdout = std::io::stdout().lock();
    let code = app::run_all(&settings, &headers, &client, &mut stdout).await?;

    tracing::info!(exit_code = code, "quotegrab.done");
    Ok(ExitCode::from(code))
}
