//! Data models for crawled articles.
//!
//! - [`ArticleRecord`]: one row of the output table, built once per article page
//! - [`PageExtraction`]: everything the extractor learned from one page
//!
//! Missing fields are `None`, never an empty string. The one exception is
//! `links_in_article`, where `Some("")` means "content container found, no
//! links in it" and `None` means "no content container".

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// Column names of the output table, in order.
pub const COLUMNS: [&str; 6] = [
    "link",
    "title",
    "author",
    "datetime",
    "article_text",
    "links_in_article",
];

/// A single scraped article.
///
/// Field order matches [`COLUMNS`]; CSV serialization relies on it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ArticleRecord {
    /// The URL the page was fetched from.
    pub link: String,
    /// Headline, entity-decoded.
    pub title: Option<String>,
    /// Author display name, entity-decoded.
    pub author: Option<String>,
    /// Raw published-time attribute value, not validated.
    pub datetime: Option<String>,
    /// Body paragraphs, tag-stripped and newline-joined.
    pub article_text: Option<String>,
    /// Hrefs found inside the body, tab-joined in document order.
    pub links_in_article: Option<String>,
}

impl ArticleRecord {
    /// Parse the raw `datetime` as RFC 3339.
    ///
    /// Only used for reporting; the stored value is kept verbatim.
    pub fn published_at(&self) -> Option<DateTime<FixedOffset>> {
        self.datetime
            .as_deref()
            .and_then(|raw| DateTime::parse_from_rfc3339(raw.trim()).ok())
    }

    /// Number of hrefs in `links_in_article`.
    pub fn outbound_link_count(&self) -> usize {
        match self.links_in_article.as_deref() {
            None | Some("") => 0,
            Some(joined) => joined.split('\t').count(),
        }
    }
}

/// The result of running the extractor over one page.
#[derive(Debug, Default)]
pub struct PageExtraction {
    /// Present only when the page was classified as an article.
    pub record: Option<ArticleRecord>,
    /// Same-site article URLs found anywhere on the page, deduplicated,
    /// in first-seen order.
    pub candidate_links: Vec<String>,
}
