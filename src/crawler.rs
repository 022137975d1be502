//! The traversal driver.
//!
//! Starting from the seed URL, the driver repeatedly takes the next unvisited
//! URL from the frontier, fetches it, hands the markup to the [`Extractor`],
//! keeps the record if the page is an article and pushes the page's
//! candidate links back onto the frontier. It stops once `target_count`
//! records are collected or the frontier is empty.
//!
//! With [`TraversalOrder::DepthFirst`] (the default) the frontier is a stack,
//! so the last link pushed from a page is the next one visited.

use crate::models::ArticleRecord;
use crate::scrapers::fetch::Fetch;
use crate::scrapers::wordpress::Extractor;
use crate::utils::truncate_for_log;
use clap::ValueEnum;
use std::collections::{HashSet, VecDeque};
use tracing::{debug, error, info, instrument};

/// Order in which pending URLs are taken from the frontier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum TraversalOrder {
    /// Stack: most recently discovered first.
    #[default]
    DepthFirst,
    /// Queue: oldest discovered first.
    BreadthFirst,
}

/// Pending URLs. Duplicates are allowed in here; they are dropped on pop.
#[derive(Debug)]
pub struct Frontier {
    pending: VecDeque<String>,
    order: TraversalOrder,
}

impl Frontier {
    /// Create a frontier holding only `seed`.
    ///
    /// # Arguments
    ///
    /// * `seed` - The first URL to visit
    /// * `order` - Whether later pops take the newest or the oldest entry
    pub fn new(seed: impl Into<String>, order: TraversalOrder) -> Self {
        Self {
            pending: VecDeque::from([seed.into()]),
            order,
        }
    }

    /// Push newly discovered URLs, in the order given.
    ///
    /// Already-visited URLs may be pushed; they are discarded when popped.
    pub fn extend<I: IntoIterator<Item = String>>(&mut self, urls: I) {
        self.pending.extend(urls);
    }

    /// Number of entries still pending, duplicates included.
    pub fn remaining(&self) -> usize {
        self.pending.len()
    }

    fn pop(&mut self) -> Option<String> {
        match self.order {
            TraversalOrder::DepthFirst => self.pending.pop_back(),
            TraversalOrder::BreadthFirst => self.pending.pop_front(),
        }
    }

    /// Pop until a URL not in `visited` comes up.
    ///
    /// Returns the URL (if any) and how many already-visited entries were
    /// discarded on the way.
    pub fn next_unvisited(&mut self, visited: &HashSet<String>) -> (Option<String>, usize) {
        let mut skipped = 0;
        while let Some(url) = self.pop() {
            if !visited.contains(&url) {
                return (Some(url), skipped);
            }
            debug!(%url, "Already visited; discarding");
            skipped += 1;
        }
        (None, skipped)
    }
}

/// Run parameters for one crawl.
#[derive(Debug, Clone)]
pub struct CrawlConfig {
    pub seed_url: String,
    pub target_count: usize,
    pub order: TraversalOrder,
}

/// What a finished crawl produced.
#[derive(Debug, Default)]
pub struct CrawlReport {
    /// Extracted articles in discovery order.
    pub articles: Vec<ArticleRecord>,
    pub target_count: usize,
    /// Pages fetched (or attempted).
    pub pages_visited: usize,
    /// Frontier entries dropped because they were already visited.
    pub duplicates_skipped: usize,
    pub fetch_failures: usize,
    /// Pages fetched successfully but not classified as articles.
    pub non_articles: usize,
    /// URLs still pending when the crawl stopped.
    pub frontier_remaining: usize,
}

impl CrawlReport {
    /// Whether at least `target_count` articles were collected.
    pub fn target_reached(&self) -> bool {
        self.articles.len() >= self.target_count
    }
}

/// Sequential crawler over a single site.
#[derive(Debug)]
pub struct Crawler<F> {
    fetcher: F,
    extractor: Extractor,
    config: CrawlConfig,
}

impl<F: Fetch> Crawler<F> {
    /// Assemble a crawler.
    ///
    /// # Arguments
    ///
    /// * `fetcher` - Where page markup comes from (network, local file, ...)
    /// * `extractor` - Field and link extraction for the target site
    /// * `config` - Seed URL, target record count and frontier order
    pub fn new(fetcher: F, extractor: Extractor, config: CrawlConfig) -> Self {
        Self {
            fetcher,
            extractor,
            config,
        }
    }

    /// Crawl until the target count is reached or the frontier runs dry.
    ///
    /// Never fails: fetch errors and non-article pages are counted and
    /// skipped.
    #[instrument(level = "info", skip(self), fields(seed = %self.config.seed_url, target = self.config.target_count))]
    pub async fn run(&self) -> CrawlReport {
        let mut frontier = Frontier::new(self.config.seed_url.clone(), self.config.order);
        let mut visited: HashSet<String> = HashSet::new();
        let mut report = CrawlReport {
            target_count: self.config.target_count,
            ..CrawlReport::default()
        };

        while report.articles.len() < self.config.target_count {
            let (next, skipped) = frontier.next_unvisited(&visited);
            report.duplicates_skipped += skipped;
            let Some(url) = next else {
                break;
            };
            visited.insert(url.clone());
            report.pages_visited += 1;

            info!(%url, "Scraping page");
            let markup = match self.fetcher.fetch(&url).await {
                Ok(markup) => markup,
                Err(e) => {
                    error!(%url, error = %e, "Fetch failed; skipping page");
                    report.fetch_failures += 1;
                    continue;
                }
            };

            let page = self.extractor.scrape(&url, &markup);
            match page.record {
                Some(record) => {
                    info!(
                        %url,
                        title = %truncate_for_log(record.title.as_deref().unwrap_or("-"), 80),
                        published = ?record.published_at(),
                        body_links = record.outbound_link_count(),
                        new_links = page.candidate_links.len(),
                        collected = report.articles.len() + 1,
                        "Extracted article"
                    );
                    report.articles.push(record);
                }
                None => {
                    debug!(%url, "Not an article; no record");
                    report.non_articles += 1;
                }
            }

            frontier.extend(page.candidate_links);
        }

        report.frontier_remaining = frontier.remaining();
        debug!(
            collected = report.articles.len(),
            remaining = report.frontier_remaining,
            "Crawl finished"
        );
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FetchError;
    use crate::scrapers::profile::SiteProfile;
    use crate::scrapers::wordpress::ExtractOptions;
    use std::cell::RefCell;
    use std::collections::HashMap;

    const SITE: &str = "https://techcrunch.com";

    /// Serves canned pages and records every URL requested.
    #[derive(Debug, Default)]
    struct FakeSite {
        pages: HashMap<String, String>,
        requested: RefCell<Vec<String>>,
    }

    impl FakeSite {
        fn page(mut self, slug: &str, markup: String) -> Self {
            self.pages.insert(url(slug), markup);
            self
        }
    }

    impl Fetch for FakeSite {
        async fn fetch(&self, url: &str) -> Result<String, FetchError> {
            self.requested.borrow_mut().push(url.to_string());
            self.pages.get(url).cloned().ok_or_else(|| FetchError::Status {
                url: url.to_string(),
                status: 404,
            })
        }
    }

    fn url(slug: &str) -> String {
        format!("{SITE}/2023/03/13/{slug}/")
    }

    fn article(title: &str, links_to: &[&str]) -> String {
        let anchors: String = links_to
            .iter()
            .map(|slug| format!(r#"<p><a href="{}">{slug}</a></p>"#, url(slug)))
            .collect();
        format!(
            r#"<meta property="og:type" content="article" />
<meta property="og:title" content="{title}" />
<div class="article-content"><p>Body of {title}</p>{anchors}</div>"#
        )
    }

    fn crawler(site: FakeSite, seed: &str, target: usize, order: TraversalOrder) -> Crawler<FakeSite> {
        let extractor = Extractor::new(
            SiteProfile::wordpress("techcrunch.com").unwrap(),
            ExtractOptions::default(),
        );
        Crawler::new(
            site,
            extractor,
            CrawlConfig {
                seed_url: url(seed),
                target_count: target,
                order,
            },
        )
    }

    fn links(report: &CrawlReport) -> Vec<String> {
        report.articles.iter().map(|a| a.link.clone()).collect()
    }

    #[test]
    fn test_frontier_lifo_and_fifo() {
        let mut stack = Frontier::new("a", TraversalOrder::DepthFirst);
        stack.extend(["b".to_string(), "c".to_string()]);
        let visited = HashSet::new();
        assert_eq!(stack.next_unvisited(&visited).0.as_deref(), Some("c"));

        let mut queue = Frontier::new("a", TraversalOrder::BreadthFirst);
        queue.extend(["b".to_string(), "c".to_string()]);
        assert_eq!(queue.next_unvisited(&visited).0.as_deref(), Some("a"));
    }

    #[test]
    fn test_frontier_skip_until_empty() {
        let mut frontier = Frontier::new("a", TraversalOrder::DepthFirst);
        frontier.extend(["a".to_string(), "a".to_string()]);
        let visited: HashSet<String> = ["a".to_string()].into_iter().collect();
        assert_eq!(frontier.next_unvisited(&visited), (None, 3));
        assert_eq!(frontier.remaining(), 0);
    }

    #[tokio::test]
    async fn test_seed_without_links_gives_one_row() {
        let site = FakeSite::default().page("seed", article("Seed", &[]));
        let report = crawler(site, "seed", 50, TraversalOrder::DepthFirst).run().await;
        assert_eq!(links(&report), vec![url("seed")]);
        assert!(!report.target_reached());
        assert_eq!(report.pages_visited, 1);
    }

    #[tokio::test]
    async fn test_non_article_seed_gives_zero_rows() {
        let site = FakeSite::default().page("seed", "<html><body>hello</body></html>".to_string());
        let report = crawler(site, "seed", 5, TraversalOrder::DepthFirst).run().await;
        assert!(report.articles.is_empty());
        assert_eq!(report.non_articles, 1);
    }

    #[tokio::test]
    async fn test_each_url_fetched_once() {
        // seed -> a, b; a -> b, seed; b -> a, seed
        let site = FakeSite::default()
            .page("seed", article("Seed", &["a", "b"]))
            .page("a", article("A", &["b", "seed"]))
            .page("b", article("B", &["a", "seed"]));
        let crawler = crawler(site, "seed", 50, TraversalOrder::DepthFirst);
        let report = crawler.run().await;

        let requested = crawler.fetcher.requested.borrow().clone();
        assert_eq!(requested, vec![url("seed"), url("b"), url("a")]);
        assert_eq!(report.articles.len(), 3);
        assert!(report.duplicates_skipped > 0);

        let unique: HashSet<_> = links(&report).into_iter().collect();
        assert_eq!(unique.len(), report.articles.len());
    }

    #[tokio::test]
    async fn test_stops_at_target() {
        let site = FakeSite::default()
            .page("p0", article("P0", &["p1"]))
            .page("p1", article("P1", &["p2"]))
            .page("p2", article("P2", &["p3"]))
            .page("p3", article("P3", &["p4"]))
            .page("p4", article("P4", &[]));
        let crawler = crawler(site, "p0", 3, TraversalOrder::DepthFirst);
        let report = crawler.run().await;

        assert_eq!(links(&report), vec![url("p0"), url("p1"), url("p2")]);
        assert!(report.target_reached());
        assert_eq!(crawler.fetcher.requested.borrow().len(), 3);
    }

    #[tokio::test]
    async fn test_fetch_failure_is_skipped() {
        // "gone" is not served and returns 404.
        let site = FakeSite::default()
            .page("seed", article("Seed", &["ok", "gone"]))
            .page("ok", article("Ok", &[]));
        let report = crawler(site, "seed", 10, TraversalOrder::DepthFirst).run().await;

        assert_eq!(report.fetch_failures, 1);
        assert_eq!(links(&report), vec![url("seed"), url("ok")]);
    }

    #[tokio::test]
    async fn test_non_article_links_still_followed() {
        let hub = format!(
            r#"<html><ul><li><a href="{}">x</a></li></ul></html>"#,
            url("leaf")
        );
        let site = FakeSite::default()
            .page("hub", hub)
            .page("leaf", article("Leaf", &[]));
        let report = crawler(site, "hub", 10, TraversalOrder::DepthFirst).run().await;
        assert_eq!(links(&report), vec![url("leaf")]);
    }

    #[tokio::test]
    async fn test_breadth_first_order() {
        // seed -> a, b; a -> c
        let site = FakeSite::default()
            .page("seed", article("Seed", &["a", "b"]))
            .page("a", article("A", &["c"]))
            .page("b", article("B", &[]))
            .page("c", article("C", &[]));

        let dfs = crawler(site, "seed", 10, TraversalOrder::DepthFirst).run().await;
        assert_eq!(links(&dfs), vec![url("seed"), url("b"), url("a"), url("c")]);

        let site = FakeSite::default()
            .page("seed", article("Seed", &["a", "b"]))
            .page("a", article("A", &["c"]))
            .page("b", article("B", &[]))
            .page("c", article("C", &[]));
        let bfs = crawler(site, "seed", 10, TraversalOrder::BreadthFirst).run().await;
        assert_eq!(links(&bfs), vec![url("seed"), url("a"), url("b"), url("c")]);
    }

    #[tokio::test]
    async fn test_zero_target_fetches_nothing() {
        let site = FakeSite::default().page("seed", article("Seed", &[]));
        let crawler = crawler(site, "seed", 0, TraversalOrder::DepthFirst);
        let report = crawler.run().await;
        assert!(report.articles.is_empty());
        assert!(crawler.fetcher.requested.borrow().is_empty());
        assert_eq!(report.frontier_remaining, 1);
    }
}
