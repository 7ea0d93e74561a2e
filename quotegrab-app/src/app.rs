use std::io::{self, Write};
use std::time::Duration;

use anyhow::{Context, Result};
use quotegrab_config::Settings;
use quotegrab_http::{PageFetcher, PageRequest};
use quotegrab_web::{ScrapeOutcome, scrape};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, USER_AGENT};

use crate::report;

/// Request headers for every URL: the configured `User-Agent`, then `-H` pairs
/// (which may replace it).
pub fn build_headers(settings: &Settings) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    let ua = HeaderValue::from_str(&settings.user_agent)
        .with_context(|| format!("invalid User-Agent '{}'", settings.user_agent))?;
    headers.insert(USER_AGENT, ua);

    for pair in &settings.headers {
        let name = HeaderName::from_bytes(pair.name.as_bytes())
            .with_context(|| format!("invalid header name '{}'", pair.name))?;
        let value = HeaderValue::from_str(&pair.value)
            .with_context(|| format!("invalid value for header '{}'", pair.name))?;
        headers.insert(name, value);
    }
    Ok(headers)
}

/// Fetch, extract and report a single URL.
pub async fn run_one(
    fetcher: &dyn PageFetcher,
    url: &str,
    headers: &HeaderMap,
    timeout: Duration,
    out: &mut impl Write,
) -> io::Result<ScrapeOutcome> {
    report::fetching(out, url)?;

    let outcome = match PageRequest::new(url) {
        Ok(request) => {
            let request = request.with_headers(headers.clone()).with_timeout(timeout);
            scrape(fetcher, &request).await
        }
        Err(err) => {
            tracing::warn!(%url, error=%err, "app.request.invalid");
            ScrapeOutcome::Failed(err)
        }
    };

    report::outcome(out, url, &outcome)?;
    Ok(outcome)
}

/// Process every configured URL in order and return the process exit code.
///
/// Without `strict_exit` this is always 0. Otherwise the first failure decides.
pub async fn run_all(
    settings: &Settings,
    headers: &HeaderMap,
    fetcher: &dyn PageFetcher,
    out: &mut impl Write,
) -> io::Result<u8> {
    let mut first_failure: Option<u8> = None;

    for (index, url) in settings.urls.iter().enumerate() {
        if index > 0 && !settings.delay().is_zero() {
            tracing::debug!(delay_ms = settings.delay_ms, "app.delay");
            tokio::time::sleep(settings.delay()).await;
        }

        let outcome = run_one(fetcher, url, headers, settings.timeout(), out).await?;
        if first_failure.is_none() {
            first_failure = report::exit_code(&outcome);
        }
    }

    out.flush()?;
    Ok(match (settings.strict_exit, first_failure) {
        (true, Some(code)) => code,
        _ => 0,
    })
}
