//! Human-readable report lines. Everything here writes to a caller-supplied
//! sink so the exact output can be asserted in tests.

use std::io::{self, Write};

use quotegrab_http::FetchError;
use quotegrab_web::{Quote, ScrapeOutcome};

const ENTRY_SEPARATOR: &str = "--------------------";
const CLOSING_RULE: &str = "-------------------------";

pub fn fetching(out: &mut impl Write, url: &str) -> io::Result<()> {
    writeln!(out, "Fetching data from '{url}'...")
}

/// Report one outcome. A failed fetch prints only its diagnostic.
pub fn outcome(out: &mut impl Write, url: &str, outcome: &ScrapeOutcome) -> io::Result<()> {
    match outcome {
        ScrapeOutcome::Quotes(quotes) => {
            writeln!(out, "Page fetched successfully.")?;
            quote_list(out, quotes)
        }
        ScrapeOutcome::NoMatch => {
            writeln!(out, "Page fetched successfully.")?;
            writeln!(
                out,
                "No quotes found. The HTML structure may have changed or the selector is wrong."
            )
        }
        ScrapeOutcome::Failed(err) => diagnostic(out, url, err),
    }
}

fn quote_list(out: &mut impl Write, quotes: &[Quote]) -> io::Result<()> {
    writeln!(out, "\n--- Quotes Found ---")?;
    for (index, quote) in quotes.iter().enumerate() {
        writeln!(out, "{}. Quote: {}", index + 1, quote.text)?;
        writeln!(out, "   Author: {}", quote.author)?;
        writeln!(out, "{ENTRY_SEPARATOR}")?;
    }
    writeln!(out, "{CLOSING_RULE}\n")
}

fn diagnostic(out: &mut impl Write, url: &str, err: &FetchError) -> io::Result<()> {
    match err {
        FetchError::Timeout(_) => writeln!(
            out,
            "Error: the request timed out. The server may not be responding. ({url})"
        ),
        FetchError::Status(status) => {
            writeln!(
                out,
                "Error: HTTP error occurred: {status} - Status code: {}",
                status.as_u16()
            )?;
            writeln!(
                out,
                "Check the URL, your internet connection, or the site status."
            )
        }
        FetchError::Connection(detail) => {
            writeln!(out, "Error: could not reach the web page. ({url})")?;
            writeln!(out, "Detail: {detail}")
        }
        FetchError::Unexpected(detail) => {
            writeln!(out, "An unexpected error occurred: {detail}")
        }
    }
}

/// Exit code for `--strict-exit`. `None` means the outcome is not a failure.
pub fn exit_code(outcome: &ScrapeOutcome) -> Option<u8> {
    match outcome {
        ScrapeOutcome::Quotes(_) | ScrapeOutcome::NoMatch => None,
        ScrapeOutcome::Failed(FetchError::Timeout(_)) => Some(3),
        ScrapeOutcome::Failed(FetchError::Status(_)) => Some(4),
        ScrapeOutcome::Failed(FetchError::Connection(_)) => Some(5),
        ScrapeOutcome::Failed(FetchError::Unexpected(_)) => Some(6),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;
    use std::time::Duration;

    fn render(outcome_: &ScrapeOutcome) -> String {
        let mut buf = Vec::new();
        outcome(&mut buf, "https://quotes.example/", outcome_).unwrap();
        String::from_utf8(buf).unwrap()
    }

    fn quote(text: &str, author: &str) -> Quote {
        Quote {
            text: text.into(),
            author: author.into(),
        }
    }

    #[test]
    fn three_quotes_are_numbered_and_separated() {
        let text = render(&ScrapeOutcome::Quotes(vec![
            quote("First", "A"),
            quote("Second", "B"),
            quote("Third", "C"),
        ]));

        let expected = "Page fetched successfully.\n\
\n\
--- Quotes Found ---\n\
1. Quote: First\n   Author: A\n--------------------\n\
2. Quote: Second\n   Author: B\n--------------------\n\
3. Quote: Third\n   Author: C\n--------------------\n\
-------------------------\n\n";
        assert_eq!(text, expected);
    }

    #[test]
    fn every_entry_is_followed_by_a_separator() {
        let text = render(&ScrapeOutcome::Quotes(vec![
            quote("x", "y"),
            quote("x", "y"),
            quote("x", "y"),
        ]));
        let lines: Vec<&str> = text.lines().collect();
        for n in 1..=3 {
            let at = lines
                .iter()
                .position(|l| l.starts_with(&format!("{n}. Quote: ")))
                .unwrap();
            assert!(lines[at + 1].starts_with("   Author: "));
            assert_eq!(lines[at + 2], ENTRY_SEPARATOR);
        }
    }

    #[test]
    fn no_match_prints_notice_without_list() {
        let text = render(&ScrapeOutcome::NoMatch);
        assert!(text.contains("No quotes found."));
        assert!(!text.contains("Quotes Found"));
    }

    #[test]
    fn not_found_diagnostic_includes_code() {
        let text = render(&ScrapeOutcome::Failed(FetchError::Status(StatusCode::NOT_FOUND)));
        assert!(text.starts_with("Error: HTTP error occurred: 404 Not Found - Status code: 404\n"));
        assert!(!text.contains("Page fetched"));
    }

    #[test]
    fn timeout_diagnostic_names_url() {
        let text = render(&ScrapeOutcome::Failed(FetchError::Timeout(Duration::from_secs(10))));
        assert_eq!(
            text,
            "Error: the request timed out. The server may not be responding. (https://quotes.example/)\n"
        );
    }

    #[test]
    fn connection_diagnostic_carries_detail() {
        let text = render(&ScrapeOutcome::Failed(FetchError::Connection(
            "dns error: no such host".into(),
        )));
        assert!(text.contains("could not reach the web page. (https://quotes.example/)"));
        assert!(text.contains("Detail: dns error: no such host"));
    }

    #[test]
    fn unexpected_diagnostic() {
        let text = render(&ScrapeOutcome::Failed(FetchError::Unexpected("boom".into())));
        assert_eq!(text, "An unexpected error occurred: boom\n");
    }

    #[test]
    fn strict_exit_codes_are_distinct() {
        assert_eq!(exit_code(&ScrapeOutcome::NoMatch), None);
        assert_eq!(exit_code(&ScrapeOutcome::Quotes(vec![])), None);
        let codes = [
            FetchError::Timeout(Duration::from_secs(1)),
            FetchError::Status(StatusCode::BAD_GATEWAY),
            FetchError::Connection("refused".into()),
            FetchError::Unexpected("?".into()),
        ]
        .map(|e| exit_code(&ScrapeOutcome::Failed(e)).unwrap());
        assert_eq!(codes, [3, 4, 5, 6]);
    }

    #[test]
    fn fetching_line() {
        let mut buf = Vec::new();
        fetching(&mut buf, "https://quotes.example/").unwrap();
        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "Fetching data from 'https://quotes.example/'...\n"
        );
    }
}
