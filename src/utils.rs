//! String helpers shared by the extractor and the driver, plus the output
//! directory check run before crawling.
//!
//! - Positional substring search starting at an offset
//! - Tag stripping and HTML entity decoding
//! - Name capitalization for author slugs
//! - Log-friendly truncation

use html_escape::decode_html_entities;
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fs as stdfs;
use std::path::Path;
use tokio::fs;
use tracing::{info, instrument};

/// Any single non-nested angle-bracket tag.
static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^<>]*>").unwrap());

/// Find `needle` in `haystack` at or after byte offset `from`.
///
/// Returns the absolute offset of the match. An offset past the end, or one
/// that does not fall on a character boundary, yields `None`.
pub fn find_from(haystack: &str, needle: &str, from: usize) -> Option<usize> {
    haystack
        .get(from..)
        .and_then(|rest| rest.find(needle))
        .map(|idx| idx + from)
}

/// Remove every markup tag from a fragment.
///
/// Removal is repeated until no tag pattern remains, trimming after each
/// pass, so that tags revealed by an earlier removal are caught as well.
/// Only non-nested `<...>` tags are recognized; a `<` inside attribute text
/// defeats the pattern and leaves debris behind.
pub fn strip_tags(fragment: &str) -> String {
    let mut text = fragment.trim().to_string();
    while TAG_RE.is_match(&text) {
        text = TAG_RE.replace_all(&text, "").trim().to_string();
    }
    text
}

/// Decode named and numeric HTML entities (`&amp;`, `&#8217;`, ...).
pub fn decode_entities(s: &str) -> String {
    decode_html_entities(s).into_owned()
}

/// Uppercase the first character and lowercase the rest.
///
/// ```ignore
/// assert_eq!(capitalize("jane doe"), "Jane doe");
/// assert_eq!(capitalize("JANE"), "Jane");
/// ```
pub fn capitalize(s: &str) -> String {
    let mut c = s.chars();
    match c.next() {
        None => String::new(),
        Some(f) => f.to_uppercase().collect::<String>() + &c.as_str().to_lowercase(),
    }
}

/// Truncate a string for logging purposes.
///
/// Strings longer than `max` characters are cut on a character boundary and
/// suffixed with `"…(+N bytes)"`.
pub fn truncate_for_log(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        None => s.to_string(),
        Some((cut, _)) => format!("{}…(+{} bytes)", &s[..cut], s.len() - cut),
    }
}

/// Ensure the directory that will hold `file_path` exists and is writable.
///
/// Run before the crawl starts so that a bad output location is reported
/// before any pages are fetched rather than after.
#[instrument(level = "info", skip_all, fields(path = %file_path.display()))]
pub async fn ensure_writable_parent(file_path: &Path) -> Result<(), Box<dyn Error>> {
    let dir = match file_path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => Path::new(".").to_path_buf(),
    };
    fs::create_dir_all(&dir).await?;
    let check_path = dir.join("..__write_check__");
    match stdfs::File::create(&check_path) {
        Ok(_) => {
            let _ = stdfs::remove_file(&check_path);
            info!("Output directory is writable");
            Ok(())
        }
        Err(e) => Err(Box::new(e)),
    }
}
