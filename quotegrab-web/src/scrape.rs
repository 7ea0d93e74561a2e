use quotegrab_http::{FetchError, PageFetcher, PageRequest};

use crate::extract::{Quote, extract_quotes};
use crate::tree::parse;

/// Result of one fetch → parse → extract pass.
#[derive(Debug)]
pub enum ScrapeOutcome {
    /// The page was fetched and held at least one quote container.
    Quotes(Vec<Quote>),
    /// The page was fetched but no container matched. Either the page has no
    /// quotes or its structure no longer fits the layout.
    NoMatch,
    /// The fetch failed; nothing was parsed.
    Failed(FetchError),
}

impl ScrapeOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

/// Parse `body` and extract quotes with the default layout.
pub fn quotes_from_html(body: &str) -> Vec<Quote> {
    let doc = parse(body);
    extract_quotes(&doc)
}

/// Fetch `request` once and extract its quotes.
///
/// Failures are returned as [`ScrapeOutcome::Failed`], never as `Err`: the
/// caller decides how to report them.
pub async fn scrape(fetcher: &dyn PageFetcher, request: &PageRequest) -> ScrapeOutcome {
    let page = match fetcher.fetch(request).await {
        Ok(page) => page,
        Err(err) => {
            tracing::warn!(url=%request.url(), error=%err, "scrape.fetch_failed");
            return ScrapeOutcome::Failed(err);
        }
    };

    let quotes = quotes_from_html(&page.body);
    if quotes.is_empty() {
        tracing::warn!(url=%page.url, body_len=page.body.len(), "scrape.no_match");
        return ScrapeOutcome::NoMatch;
    }

    tracing::info!(url=%page.url, count=quotes.len(), "scrape.extracted");
    ScrapeOutcome::Quotes(quotes)
}
