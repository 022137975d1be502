//! Field extraction for WordPress/Yoast article pages.
//!
//! Extraction is positional substring search plus a handful of regular
//! expressions; there is no document tree. Each field first looks for the
//! machine-readable tag the SEO plugin emits and then falls back to the
//! visible markup of the theme.
//!
//! # Body boundaries
//!
//! The body lives in `<div class="article-content">`, which may contain
//! nested `<div>`s. The closing tag is found with a depth-balanced scan over
//! `<div` / `/div>` markers. The scan always moves forward and, if the
//! container is never closed, runs to the end of the document.

use crate::models::{ArticleRecord, PageExtraction};
use crate::scrapers::profile::SiteProfile;
use crate::utils::{capitalize, decode_entities, find_from, strip_tags};
use clap::ValueEnum;
use itertools::Itertools;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, instrument};

/// Opening `<a ...>` tag, attributes included.
static ANCHOR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<a[^<>]*>").unwrap());
/// Double-quoted `href` attribute.
static HREF_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r#"href="([^"]+)""#).unwrap());

/// Which title source wins when both the metadata tag and the headline exist.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum TitlePrecedence {
    /// The headline search always runs and overrides the metadata title.
    #[default]
    HeadingWins,
    /// The headline is only consulted when the metadata title is missing.
    MetadataFirst,
}

/// Behavior switches for the extractor.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExtractOptions {
    pub title_precedence: TitlePrecedence,
    /// Treat a content container found at offset 0 as missing.
    pub zero_offset_is_missing: bool,
}

/// Extracts article fields and traversal links from raw page markup.
#[derive(Debug, Clone)]
pub struct Extractor {
    profile: SiteProfile,
    options: ExtractOptions,
}

impl Extractor {
    /// Create an extractor for one site.
    ///
    /// # Arguments
    ///
    /// * `profile` - Markers and URL patterns of the site being crawled
    /// * `options` - Title precedence and container-offset behavior
    pub fn new(profile: SiteProfile, options: ExtractOptions) -> Self {
        Self { profile, options }
    }

    /// Run the full extraction for the page fetched from `url`.
    ///
    /// Candidate links are collected even when the page is not an article,
    /// so that index-like pages still feed the frontier.
    ///
    /// # Arguments
    ///
    /// * `url` - The URL the markup was fetched from; becomes the record's `link`
    /// * `markup` - Raw page HTML
    ///
    /// # Returns
    ///
    /// A [`PageExtraction`] whose `record` is `None` for non-article pages.
    #[instrument(level = "debug", skip_all, fields(%url, bytes = markup.len()))]
    pub fn scrape(&self, url: &str, markup: &str) -> PageExtraction {
        let candidate_links = self.extract_candidate_links(markup);
        let title = self.extract_title(markup);

        if !self.has_article_signal(markup, title.is_some()) {
            debug!(links = candidate_links.len(), "Page is not an article");
            return PageExtraction {
                record: None,
                candidate_links,
            };
        }

        let record = ArticleRecord {
            link: url.to_string(),
            title,
            author: self.extract_author(markup),
            datetime: self.extract_datetime(markup),
            article_text: self.extract_body(markup),
            links_in_article: self.extract_outbound_body_links(markup),
        };

        PageExtraction {
            record: Some(record),
            candidate_links,
        }
    }

    /// An article is declared by Yoast, has a title, or has an `<article>` tag.
    pub fn classify(&self, markup: &str) -> bool {
        self.has_article_signal(markup, self.extract_title(markup).is_some())
    }

    fn has_article_signal(&self, markup: &str, has_title: bool) -> bool {
        markup.contains(self.profile.og_type_article)
            || has_title
            || markup.contains(self.profile.article_tag)
    }

    /// Headline from the `og:title` tag and/or the `article__title` heading.
    ///
    /// Which one wins when both are present follows
    /// [`ExtractOptions::title_precedence`]. Blank values count as missing.
    ///
    /// # Returns
    ///
    /// The entity-decoded title, or `None` if neither source has one.
    pub fn extract_title(&self, markup: &str) -> Option<String> {
        let from_meta = quoted_value_after(markup, self.profile.og_title);
        let title = match self.options.title_precedence {
            TitlePrecedence::HeadingWins => self.heading_title(markup).or(from_meta),
            TitlePrecedence::MetadataFirst => from_meta.or_else(|| self.heading_title(markup)),
        };
        title.map(decode_entities)
    }

    fn heading_title<'a>(&self, markup: &'a str) -> Option<&'a str> {
        let start = markup.find(self.profile.title_heading)? + self.profile.title_heading.len();
        let end = find_from(markup, self.profile.title_heading_close, start)?;
        non_blank(&markup[start..end])
    }

    /// Author from Yoast metadata, else from the byline anchor.
    ///
    /// When the byline anchor has no text, the name is derived from the
    /// last segment of the author-profile URL (`jane-doe` -> `Jane doe`).
    pub fn extract_author(&self, markup: &str) -> Option<String> {
        quoted_value_after(markup, self.profile.meta_author)
            .map(|a| a.trim().to_string())
            .or_else(|| self.byline_author(markup))
            .map(|a| decode_entities(&a))
    }

    fn byline_author(&self, markup: &str) -> Option<String> {
        let byline = &markup[markup.find(self.profile.byline)?..];
        let caps = self.profile.author_anchor().captures(byline)?;
        let anchor = caps.get(0)?;
        let profile_url = caps.get(1)?.as_str();

        let name = find_from(byline, self.profile.anchor_close, anchor.end())
            .map(|close| strip_tags(&byline[anchor.end()..close]))
            .unwrap_or_default();
        if !name.is_empty() {
            return Some(name);
        }

        // Fall back to the profile slug: `.../author/jane-doe/` -> "Jane doe".
        let slug = profile_url.trim_end_matches('/').rsplit('/').next()?;
        non_blank(slug).map(|s| capitalize(&s.replace('-', " ")))
    }

    /// Raw published-time value; returned verbatim.
    pub fn extract_datetime(&self, markup: &str) -> Option<String> {
        quoted_value_after(markup, self.profile.meta_published)
            .or_else(|| quoted_value_after(markup, self.profile.time_published))
            .map(str::to_string)
    }

    /// Body paragraphs, tag-stripped, newline-joined, entity-decoded.
    pub fn extract_body(&self, markup: &str) -> Option<String> {
        let span = self.content_span(markup)?;
        let text = span
            .split(self.profile.paragraph_end)
            .map(strip_tags)
            .filter(|p| !p.is_empty())
            .join("\n");
        non_blank(&text).map(decode_entities)
    }

    /// Hrefs of every anchor inside the body container, tab-joined.
    ///
    /// `None` when there is no container, `Some("")` when it has no links.
    pub fn extract_outbound_body_links(&self, markup: &str) -> Option<String> {
        let span = self.content_span(markup)?;
        Some(anchor_hrefs(span).join("\t"))
    }

    /// Same-site dated article links anywhere on the page.
    ///
    /// Backslash escapes (markup embedded in JSON) are removed before the
    /// href is read.
    ///
    /// # Returns
    ///
    /// Deduplicated hrefs in first-seen document order.
    pub fn extract_candidate_links(&self, markup: &str) -> Vec<String> {
        ANCHOR_RE
            .find_iter(markup)
            .filter_map(|tag| {
                let unescaped = tag.as_str().replace('\\', "");
                HREF_RE
                    .captures(&unescaped)
                    .map(|caps| caps[1].trim().to_string())
            })
            .filter(|href| self.profile.is_article_url(href))
            .unique()
            .collect()
    }

    /// The body container from its opening tag up to (not including) the
    /// `<` of its matching close.
    fn content_span<'a>(&self, markup: &'a str) -> Option<&'a str> {
        let start = markup.find(self.profile.content_open)?;
        if start == 0 && self.options.zero_offset_is_missing {
            return None;
        }
        let end = self.matching_close(markup, start);
        Some(&markup[start..end])
    }

    fn matching_close(&self, markup: &str, start: usize) -> usize {
        let open = self.profile.div_open;
        let close = self.profile.div_close;
        let mut depth = 1usize;
        let mut cursor = start + 1;

        loop {
            let next_open = find_from(markup, open, cursor);
            let Some(next_close) = find_from(markup, close, cursor) else {
                debug!(start, "Content container never closed; using end of document");
                return markup.len();
            };

            match next_open {
                Some(o) if o < next_close => {
                    depth += 1;
                    cursor = o + open.len();
                }
                _ => {
                    depth -= 1;
                    if depth == 0 {
                        return if markup[..next_close].ends_with('<') {
                            next_close - 1
                        } else {
                            next_close
                        };
                    }
                    cursor = next_close + close.len();
                }
            }
        }
    }
}

/// Value of a double-quoted attribute whose opening quote ends `prefix`.
///
/// `None` when the prefix is missing, the closing quote is missing, or the
/// value is blank.
fn quoted_value_after<'a>(markup: &'a str, prefix: &str) -> Option<&'a str> {
    let start = markup.find(prefix)? + prefix.len();
    let end = find_from(markup, "\"", start)?;
    non_blank(&markup[start..end])
}

fn anchor_hrefs(span: &str) -> Vec<&str> {
    ANCHOR_RE
        .find_iter(span)
        .filter_map(|tag| HREF_RE.captures(tag.as_str()).and_then(|c| c.get(1)))
        .map(|m| m.as_str())
        .collect()
}

fn non_blank(s: &str) -> Option<&str> {
    if s.trim().is_empty() { None } else { Some(s) }
}
