//! Single-shot page fetching with typed failures and safe logging.
//!
//! - One GET per [`PageRequest`]: headers and timeout travel with the request
//! - No retries; every failure is classified into a [`FetchError`] kind
//! - Never logs values of sensitive headers (`Authorization`, `Cookie`, ...)
//! - Optional *raw* request/response logging via `QUOTEGRAB_HTTP_RAW=1`
//!
//! Example (no_run):
//! ```no_run
//! # async fn demo() -> Result<(), quotegrab_http::FetchError> {
//! use quotegrab_http::{HttpClient, PageRequest};
//!
//! let client = HttpClient::new()?;
//! let request = PageRequest::new("https://quotes.toscrape.com/")?;
//! let page = client.get_page(&request).await?;
//! println!("{} bytes", page.body.len());
//! # Ok(()) }
//! ```
//!
//! Observability: structured `tracing` events are emitted for request start,
//! response headers, body snippets (truncated), final errors, and (optionally)
//! raw request/response lines (target `http.raw`) when `QUOTEGRAB_HTTP_RAW=1`.

use async_trait::async_trait;
use reqwest::header::HeaderMap;
use reqwest::{Client, StatusCode, Url};
use std::env;
use std::error::Error as StdError;
use std::time::{Duration, Instant};
use thiserror::Error;

/// Timeout applied when a [`PageRequest`] does not set its own.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

// ==============================
// Raw logging toggles
// ==============================

const RAW_ENV: &str = "QUOTEGRAB_HTTP_RAW";
const RAW_MAX_BODY: usize = 64 * 1024; // cap raw body logs (64 KiB)
const SNIPPET_MAX: usize = 500;

const SENSITIVE_HEADERS: &[&str] = &["authorization", "cookie", "proxy-authorization"];

fn raw_enabled() -> bool {
    matches!(
        env::var(RAW_ENV).as_deref(),
        Ok("1") | Ok("true") | Ok("yes")
    )
}

fn is_sensitive(name: &str) -> bool {
    SENSITIVE_HEADERS
        .iter()
        .any(|s| name.eq_ignore_ascii_case(s))
}

/// Render a best-effort curl command for repro/debug, with secrets redacted.
fn make_curl(url: &Url, headers: &HeaderMap) -> String {
    let mut parts = vec!["curl".to_string(), "-XGET".to_string()];
    for (name, val) in redact_headers(headers) {
        parts.push(format!("-H '{}: {}'", name, val.replace('\'', r"'\''")));
    }
    parts.push(format!("'{}'", url.as_str()));
    parts.join(" ")
}

/// Redact sensitive headers for logging
fn redact_headers(h: &HeaderMap) -> Vec<(String, String)> {
    h.iter()
        .map(|(k, v)| {
            let key = k.as_str().to_string();
            let val = if is_sensitive(&key) {
                "<redacted>".to_string()
            } else {
                v.to_str().unwrap_or("").to_string()
            };
            (key, val)
        })
        .collect()
}

// ==============================
// Errors
// ==============================

/// Why a fetch produced no page. Variants are listed in matching priority.
#[derive(Debug, Error)]
pub enum FetchError {
    /// No response (or no complete body) within the request timeout.
    #[error("request timed out after {0:?}")]
    Timeout(Duration),
    /// The server answered with a 4xx or 5xx status.
    #[error("{0}")]
    Status(StatusCode),
    /// The request could not reach the host (DNS, refused, reset, TLS, bad URL).
    #[error("connection failed: {0}")]
    Connection(String),
    /// Anything else that went wrong while fetching.
    #[error("unexpected failure: {0}")]
    Unexpected(String),
}

impl FetchError {
    /// Map a transport error onto the taxonomy, timeout first.
    fn from_reqwest(err: reqwest::Error, timeout: Duration) -> Self {
        if err.is_timeout() {
            Self::Timeout(timeout)
        } else if let Some(status) = err.status() {
            Self::Status(status)
        } else if err.is_connect() || err.is_request() || err.is_builder() || err.is_redirect() {
            Self::Connection(error_chain(&err))
        } else if err.is_body() || (err.is_decode() && has_transport_source(&err)) {
            // Peer reset or closed mid-body; `text()` reports that as a decode error.
            Self::Connection(error_chain(&err))
        } else {
            Self::Unexpected(error_chain(&err))
        }
    }
}

/// True when the chain holds an io error or a hyper body/connection failure.
fn has_transport_source(err: &(dyn StdError + 'static)) -> bool {
    let mut cause = err.source();
    while let Some(inner) = cause {
        if inner.is::<std::io::Error>() {
            return true;
        }
        let text = inner.to_string();
        if text.contains("connection") || text.contains("end of file") {
            return true;
        }
        cause = inner.source();
    }
    false
}

/// `reqwest` keeps the useful part (DNS, TLS, io) in the source chain.
fn error_chain(err: &(dyn StdError + 'static)) -> String {
    let mut out = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let msg = cause.to_string();
        if !out.contains(&msg) {
            out.push_str(": ");
            out.push_str(&msg);
        }
        source = cause.source();
    }
    out
}

// ==============================
// Request & Response
// ==============================

/// An immutable description of one page fetch.
///
/// ```
/// use quotegrab_http::{DEFAULT_TIMEOUT, PageRequest};
/// use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
/// use std::time::Duration;
///
/// let mut headers = HeaderMap::new();
/// headers.insert(USER_AGENT, HeaderValue::from_static("quotegrab-doc"));
///
/// let request = PageRequest::new("https://quotes.toscrape.com/")
///     .unwrap()
///     .with_headers(headers);
/// assert_eq!(request.timeout(), DEFAULT_TIMEOUT);
///
/// let request = request.with_timeout(Duration::from_secs(3));
/// assert_eq!(request.timeout().as_secs(), 3);
/// assert_eq!(request.headers()[USER_AGENT], "quotegrab-doc");
/// ```
#[derive(Clone, Debug)]
pub struct PageRequest {
    url: Url,
    headers: HeaderMap,
    timeout: Duration,
}

impl PageRequest {
    /// Parse `url` into a request with no headers and [`DEFAULT_TIMEOUT`].
    ///
    /// A URL that does not parse, or is not `http`/`https`, cannot reach any
    /// host and is reported as [`FetchError::Connection`].
    pub fn new(url: &str) -> Result<Self, FetchError> {
        let parsed = Url::parse(url)
            .map_err(|e| FetchError::Connection(format!("invalid URL '{url}': {e}")))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(FetchError::Connection(format!(
                "unsupported URL scheme '{}' in '{url}'",
                parsed.scheme()
            )));
        }
        Ok(Self {
            url: parsed,
            headers: HeaderMap::new(),
            timeout: DEFAULT_TIMEOUT,
        })
    }

    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

/// A successfully fetched page. Only produced for non-error statuses.
#[derive(Clone, Debug)]
pub struct Page {
    /// Final URL after redirects.
    pub url: Url,
    pub status: StatusCode,
    /// Raw HTML, decoded to text using the response charset.
    pub body: String,
}

// ==============================
// Fetcher seam
// ==============================

/// Anything that can turn a [`PageRequest`] into a [`Page`].
///
/// [`HttpClient`] is the real implementation; tests substitute canned ones.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, request: &PageRequest) -> Result<Page, FetchError>;
}

// ==============================
// Client
// ==============================

#[derive(Clone)]
pub struct HttpClient {
    inner: Client,
}

impl HttpClient {
    /// Build a client. Timeouts are applied per request, not here.
    pub fn new() -> Result<Self, FetchError> {
        let inner = Client::builder()
            .build()
            .map_err(|e| FetchError::Unexpected(format!("client build failed: {e}")))?;
        Ok(Self { inner })
    }

    /// Issue exactly one GET for `request`.
    pub async fn get_page(&self, request: &PageRequest) -> Result<Page, FetchError> {
        let url = request.url();
        let timeout = request.timeout();

        // Lightweight request id without extra deps
        let req_id = format!(
            "r{:x}",
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap_or_default()
                .as_nanos()
        );

        tracing::debug!(
            req_id=%req_id,
            host_path=%format!("{}{}", url.host_str().unwrap_or("-"), url.path()),
            headers=?redact_headers(request.headers()),
            timeout_ms=timeout.as_millis() as u64,
            "http.request.start"
        );

        if raw_enabled() {
            let curl = make_curl(url, request.headers());
            tracing::debug!(target: "http.raw", %req_id, %curl, "request");
        }

        // ----- Send -----
        let t0 = Instant::now();
        let resp = self
            .inner
            .get(url.clone())
            .headers(request.headers().clone())
            .timeout(timeout)
            .send()
            .await
            .map_err(|err| {
                let err = FetchError::from_reqwest(err, timeout);
                tracing::warn!(req_id=%req_id, error=%err, "http.error.send");
                err
            })?;

        let status = resp.status();
        let final_url = resp.url().clone();
        tracing::debug!(
            req_id=%req_id,
            %status,
            duration_ms=t0.elapsed().as_millis() as u64,
            content_length=?resp.content_length(),
            "http.response.headers"
        );

        if status.is_client_error() || status.is_server_error() {
            tracing::warn!(req_id=%req_id, %status, url=%final_url, "http.error.status");
            return Err(FetchError::Status(status));
        }

        let headers = resp.headers().clone();
        let body = resp.text().await.map_err(|err| {
            let err = FetchError::from_reqwest(err, timeout);
            tracing::warn!(req_id=%req_id, error=%err, "http.error.body");
            err
        })?;
        let dur_ms = t0.elapsed().as_millis() as u64;

        if raw_enabled() {
            let mut text = body.clone();
            let truncated = text.len() > RAW_MAX_BODY;
            if truncated {
                text.truncate(floor_char_boundary(&text, RAW_MAX_BODY));
            }
            tracing::info!(
                target: "http.raw",
                %req_id,
                %status,
                duration_ms=dur_ms,
                headers=?redact_headers(&headers),
                body=%text,
                truncated
            );
        }

        tracing::trace!(
            req_id=%req_id,
            body_snippet=%snip_body(&body),
            "http.response.body_snippet"
        );
        tracing::info!(
            req_id=%req_id,
            %status,
            duration_ms=dur_ms,
            body_len=body.len(),
            "http.response.ok"
        );

        Ok(Page {
            url: final_url,
            status,
            body,
        })
    }
}

#[async_trait]
impl PageFetcher for HttpClient {
    async fn fetch(&self, request: &PageRequest) -> Result<Page, FetchError> {
        self.get_page(request).await
    }
}

// ==============================
// Helpers
// ==============================

fn snip_body(body: &str) -> String {
    if body.len() <= SNIPPET_MAX {
        return body.to_string();
    }
    let mut snip = body[..floor_char_boundary(body, SNIPPET_MAX)].to_string();
    snip.push_str("...");
    snip
}

fn floor_char_boundary(s: &str, mut idx: usize) -> usize {
    if idx >= s.len() {
        return s.len();
    }
    while !s.is_char_boundary(idx) {
        idx -= 1;
    }
    idx
}
