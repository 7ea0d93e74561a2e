//! Page parsing and quote extraction.
//!
//! - Narrow selector interface over any parsed document (`tree`)
//! - Container/field extraction with sentinel substitution (`extract`)
//! - One fetch → parse → extract pass with a typed outcome (`scrape`)

pub mod extract;
pub mod scrape;
pub mod tree;

pub use extract::{
    AUTHOR_NOT_FOUND, ElementMatch, Quote, QuoteLayout, TEXT_NOT_FOUND, extract_quotes,
};
pub use scrape::{ScrapeOutcome, quotes_from_html, scrape};
pub use tree::{DocumentTree, TreeNode, parse};
