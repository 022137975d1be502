//! CSV persistence of the article table.
//!
//! # Format
//!
//! A header row with the six [`COLUMNS`] followed by one row per article in
//! discovery order. Fields containing commas, quotes or newlines are quoted
//! by the `csv` writer.
//!
//! # Absent values
//!
//! `None` is written as an empty field, and an empty field reads back as
//! `None`. A `links_in_article` of `Some("")` (body found, no links) is
//! therefore indistinguishable from `None` once persisted.

use crate::error::CrawlError;
use crate::models::{ArticleRecord, COLUMNS};
use std::path::Path;
use tracing::{info, instrument};

/// Write `articles` to `path`, replacing any existing file.
///
/// The header is written even when `articles` is empty.
#[instrument(level = "info", skip_all, fields(path = %path.display(), rows = articles.len()))]
pub fn write_articles(articles: &[ArticleRecord], path: &Path) -> Result<(), CrawlError> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)?;

    writer.write_record(COLUMNS)?;
    for article in articles {
        writer.serialize(article)?;
    }
    writer.flush()?;

    info!("Wrote article table");
    Ok(())
}

/// Read a table previously written by [`write_articles`].
pub fn read_articles(path: &Path) -> Result<Vec<ArticleRecord>, CrawlError> {
    let mut reader = csv::ReaderBuilder::new().has_headers(true).from_path(path)?;
    let mut articles = Vec::new();
    for row in reader.deserialize() {
        articles.push(row?);
    }
    Ok(articles)
}
