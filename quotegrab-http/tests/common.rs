use std::path::PathBuf;
use std::sync::OnceLock;

use quotegrab_common::observability::{LogConfig, LogFormat, init_logging};

static LOG_FILE: OnceLock<Option<PathBuf>> = OnceLock::new();

/// Route test logs to a scratch directory at debug level.
/// `QUOTEGRAB_LOG_FORMAT=json` switches the encoding.
pub fn init_test_tracing() {
    LOG_FILE.get_or_init(|| {
        let json = std::env::var("QUOTEGRAB_LOG_FORMAT").is_ok_and(|v| v.trim() == "json");
        init_logging(LogConfig {
            app_name: "quotegrab-http-tests",
            log_dir: Some(std::env::temp_dir().join("quotegrab-http-tests")),
            format: if json { LogFormat::Json } else { LogFormat::Text },
            default_filter: "quotegrab_http=debug",
            ..LogConfig::default()
        })
        .ok()
    });
}
