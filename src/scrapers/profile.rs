//! Site profile: the literal markers a WordPress/Yoast theme emits.
//!
//! Every marker is matched as a raw substring, so each one must be spelled
//! exactly as the theme prints it (attribute order and quoting included).
//! The host is taken from the seed URL; the two host-dependent regular
//! expressions are compiled once per profile.

use crate::error::CrawlError;
use regex::Regex;
use url::Url;

/// Markers and patterns describing one news site.
#[derive(Debug, Clone)]
pub struct SiteProfile {
    /// Host of the site, e.g. `techcrunch.com`.
    pub host: String,
    /// Yoast tag declaring the page type as an article.
    pub og_type_article: &'static str,
    /// Yoast title tag, up to the opening quote of its value.
    pub og_title: &'static str,
    /// Visible headline element.
    pub title_heading: &'static str,
    pub title_heading_close: &'static str,
    /// Yoast author tag, up to the opening quote of its value.
    pub meta_author: &'static str,
    /// Byline container holding the author-profile anchor.
    pub byline: &'static str,
    /// Yoast published-time tag, up to the opening quote of its value.
    pub meta_published: &'static str,
    /// Visible `<time>` element, up to the opening quote of `datetime`.
    pub time_published: &'static str,
    /// Any `<article` element.
    pub article_tag: &'static str,
    /// Opening tag of the body container.
    pub content_open: &'static str,
    /// Nesting markers for the body container scan.
    pub div_open: &'static str,
    pub div_close: &'static str,
    /// Paragraph separator inside the body.
    pub paragraph_end: &'static str,
    pub anchor_close: &'static str,
    candidate_re: Regex,
    author_re: Regex,
}

impl SiteProfile {
    /// Profile for a WordPress site using the TechCrunch-style theme.
    pub fn wordpress(host: &str) -> Result<Self, CrawlError> {
        let escaped = regex::escape(host);
        let candidate_re = Regex::new(&format!(r"^https://{escaped}/\d{{4}}/\d{{2}}/\d{{2}}/"))?;
        let author_re = Regex::new(&format!(
            r#"<a\s[^<>]*?href="(https://{escaped}/author/[^"]*)"[^<>]*>"#
        ))?;

        Ok(Self {
            host: host.to_string(),
            og_type_article: r#"<meta property="og:type" content="article""#,
            og_title: r#"<meta property="og:title" content=""#,
            title_heading: r#"<h1 class="article__title">"#,
            title_heading_close: "</h1>",
            meta_author: r#"<meta name="author" content=""#,
            byline: r#"<div class="article__byline">"#,
            meta_published: r#"<meta property="article:published_time" content=""#,
            time_published: r#"<time class="article__published" datetime=""#,
            article_tag: "<article",
            content_open: r#"<div class="article-content">"#,
            div_open: "<div",
            div_close: "/div>",
            paragraph_end: "</p>",
            anchor_close: "</a>",
            candidate_re,
            author_re,
        })
    }

    /// Build the profile for the site hosting `seed_url`.
    pub fn from_seed(seed_url: &str) -> Result<Self, CrawlError> {
        let parsed = Url::parse(seed_url).map_err(|source| CrawlError::InvalidSeed {
            url: seed_url.to_string(),
            source,
        })?;
        let host = parsed
            .host_str()
            .ok_or_else(|| CrawlError::MissingHost(seed_url.to_string()))?;
        Self::wordpress(host)
    }

    /// Whether `href` has the dated article shape `https://<host>/yyyy/mm/dd/...`.
    pub fn is_article_url(&self, href: &str) -> bool {
        self.candidate_re.is_match(href)
    }

    /// Regex whose first group captures an author-profile URL on this site.
    pub fn author_anchor(&self) -> &Regex {
        &self.author_re
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_seed_takes_host() {
        let profile =
            SiteProfile::from_seed("https://techcrunch.com/2023/03/13/etsy-payments/").unwrap();
        assert_eq!(profile.host, "techcrunch.com");
    }

    #[test]
    fn test_from_seed_rejects_garbage() {
        assert!(matches!(
            SiteProfile::from_seed("not a url"),
            Err(CrawlError::InvalidSeed { .. })
        ));
    }

    #[test]
    fn test_article_url_shape() {
        let profile = SiteProfile::wordpress("techcrunch.com").unwrap();
        assert!(profile.is_article_url("https://techcrunch.com/2023/03/13/etsy/"));
        assert!(!profile.is_article_url("https://techcrunch.com/author/jane-doe/"));
        assert!(!profile.is_article_url("https://techcrunch.com/23/03/13/etsy/"));
        assert!(!profile.is_article_url("http://techcrunch.com/2023/03/13/etsy/"));
        assert!(!profile.is_article_url("https://techcrunchXcom/2023/03/13/etsy/"));
        assert!(!profile.is_article_url("https://techcrunch.com.evil.io/2023/03/13/etsy/"));
    }

    #[test]
    fn test_author_anchor_captures_profile_url() {
        let profile = SiteProfile::wordpress("techcrunch.com").unwrap();
        let caps = profile
            .author_anchor()
            .captures(r#"by <a class="x" href="https://techcrunch.com/author/jane-doe/" rel="author">Jane</a>"#)
            .unwrap();
        assert_eq!(&caps[1], "https://techcrunch.com/author/jane-doe/");
    }
}
