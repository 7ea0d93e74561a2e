//! Layered runtime settings: compiled-in defaults, then `QUOTEGRAB__*`
//! environment variables, then command-line overrides.
//!
//! There is deliberately no file source. Every field has a serde default, so an
//! empty environment yields a usable [`Settings`] pointing at the demo site.
use config::{Config, ConfigError, Environment};
use quotegrab_common::observability::LogFormat;
use quotegrab_common::{DEFAULT_TIMEOUT_SECS, DEFAULT_URL, DEFAULT_USER_AGENT};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

const ENV_PREFIX: &str = "QUOTEGRAB";

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Pages to scrape, in order. One request each.
    #[serde(default = "default_urls")]
    pub urls: Vec<String>,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Extra request headers. Only settable from the command line.
    #[serde(skip)]
    pub headers: Vec<HeaderPair>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Fixed pause between consecutive URLs.
    #[serde(default)]
    pub delay_ms: u64,
    /// Map failure kinds to non-zero exit codes instead of always exiting 0.
    #[serde(default)]
    pub strict_exit: bool,
    #[serde(default)]
    pub log_dir: Option<PathBuf>,
    #[serde(default)]
    pub log_format: LogFormat,
    /// Duplicate log events to stderr.
    #[serde(default)]
    pub verbose: bool,
}

impl Settings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

fn default_urls() -> Vec<String> {
    vec![DEFAULT_URL.to_string()]
}
fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}
fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

/// A `Name: value` header given on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderPair {
    pub name: String,
    pub value: String,
}

impl HeaderPair {
    /// ```
    /// use quotegrab_config::HeaderPair;
    ///
    /// let h = HeaderPair::parse("Accept-Language:  tr-TR, en;q=0.8").unwrap();
    /// assert_eq!(h.name, "Accept-Language");
    /// assert_eq!(h.value, "tr-TR, en;q=0.8");
    /// assert!(HeaderPair::parse("no-colon-here").is_err());
    /// ```
    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        let (name, value) = raw.split_once(':').ok_or_else(|| {
            ConfigError::Message(format!("header '{raw}' must look like 'Name: value'"))
        })?;
        let name = name.trim();
        if name.is_empty() {
            return Err(ConfigError::Message(format!(
                "header '{raw}' has an empty name"
            )));
        }
        Ok(Self {
            name: name.to_string(),
            value: value.trim().to_string(),
        })
    }
}

/// Values supplied on the command line. `None`/empty means "not given".
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub urls: Vec<String>,
    pub user_agent: Option<String>,
    pub headers: Vec<String>,
    pub timeout_secs: Option<u64>,
    pub delay_ms: Option<u64>,
    pub strict_exit: bool,
    pub log_dir: Option<PathBuf>,
    pub log_format: Option<LogFormat>,
    pub verbose: bool,
}

/// Builder hides the `config` crate wiring (env + CLI overrides).
pub struct SettingsLoader {
    builder: config::ConfigBuilder<config::builder::DefaultState>,
    headers: Vec<String>,
}

impl Default for SettingsLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl SettingsLoader {
    /// Start from serde defaults with `QUOTEGRAB__` env overrides.
    ///
    /// `QUOTEGRAB__URLS` takes a comma-separated list.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(
            Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("urls")
                .ignore_empty(true)
                .try_parsing(true),
        );
        Self {
            builder,
            headers: Vec::new(),
        }
    }

    /// Layer command-line values over everything else.
    ///
    /// ```
    /// use quotegrab_config::{Overrides, SettingsLoader};
    ///
    /// let settings = SettingsLoader::new()
    ///     .with_overrides(Overrides {
    ///         urls: vec!["https://example.com/".into()],
    ///         timeout_secs: Some(3),
    ///         headers: vec!["X-Trace: on".into()],
    ///         ..Default::default()
    ///     })
    ///     .unwrap()
    ///     .load()
    ///     .unwrap();
    ///
    /// assert_eq!(settings.urls, ["https://example.com/"]);
    /// assert_eq!(settings.timeout().as_secs(), 3);
    /// assert_eq!(settings.headers[0].name, "X-Trace");
    /// ```
    pub fn with_overrides(mut self, o: Overrides) -> Result<Self, ConfigError> {
        let urls = (!o.urls.is_empty()).then_some(o.urls);
        self.builder = self
            .builder
            .set_override_option("urls", urls)?
            .set_override_option("user_agent", o.user_agent)?
            .set_override_option("timeout_secs", o.timeout_secs)?
            .set_override_option("delay_ms", o.delay_ms)?
            .set_override_option("strict_exit", o.strict_exit.then_some(true))?
            .set_override_option(
                "log_dir",
                o.log_dir.map(|p| p.to_string_lossy().into_owned()),
            )?
            .set_override_option("log_format", o.log_format.map(LogFormat::as_str))?
            .set_override_option("verbose", o.verbose.then_some(true))?;
        self.headers = o.headers;
        Ok(self)
    }

    /// Merge all sources, deserialize, then validate.
    pub fn load(self) -> Result<Settings, ConfigError> {
        let cfg = self.builder.build()?;
        let mut settings: Settings = cfg.try_deserialize()?;

        settings.urls.retain(|u| !u.trim().is_empty());
        if settings.urls.is_empty() {
            return Err(ConfigError::Message("at least one URL is required".into()));
        }
        if settings.timeout_secs == 0 {
            return Err(ConfigError::Message(
                "timeout_secs must be greater than zero".into(),
            ));
        }
        settings.headers = self
            .headers
            .iter()
            .map(|raw| HeaderPair::parse(raw))
            .collect::<Result<_, _>>()?;

        Ok(settings)
    }
}
