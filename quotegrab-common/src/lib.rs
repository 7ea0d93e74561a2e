//! Common constants and utilities shared across quotegrab crates.
//!
//! This crate holds the compiled-in defaults for the scraper target and the
//! observability helpers every binary and integration test uses. It stays
//! dependency-light so that all crates can depend on it.
//!
//! # Overview
//!
//! - [`DEFAULT_URL`], [`DEFAULT_USER_AGENT`], [`DEFAULT_TIMEOUT_SECS`]:
//!   defaults used when neither the environment nor the CLI say otherwise
//! - [`observability`]: centralised tracing/logging initialisation
//!
//! # Examples
//!
//! ```rust
//! use quotegrab_common::{DEFAULT_TIMEOUT_SECS, DEFAULT_URL};
//!
//! assert_eq!(DEFAULT_TIMEOUT_SECS, 10);
//! assert!(DEFAULT_URL.starts_with("https://"));
//! ```

pub mod observability;

/// Application name used for log file names and the default data directory.
pub const APP_NAME: &str = "quotegrab";

/// Page scraped when no URL is configured.
pub const DEFAULT_URL: &str = "https://quotes.toscrape.com/";

/// Browser-like `User-Agent`; some sites reject requests without one.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Per-request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
