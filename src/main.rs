//! # WordPress News Crawler
//!
//! Crawls a WordPress news site (TechCrunch by default) starting from one
//! article, following in-site article links until enough articles have been
//! collected, and writes one CSV row per article.
//!
//! ## Usage
//!
//! ```sh
//! wordpress_news_crawler -n 50 -o articles.csv
//! ```
//!
//! ## Architecture
//!
//! 1. **Fetching**: one page at a time through a [`scrapers::fetch::Fetch`]
//!    implementation (HTTP, local fixture, or HTTP with snapshot capture)
//! 2. **Extraction**: title, author, publish time, body and links pulled from
//!    the raw markup by [`scrapers::wordpress::Extractor`]
//! 3. **Traversal**: [`crawler::Crawler`] keeps the frontier and visited set
//! 4. **Output**: the collected table is written to CSV, even if short

use clap::Parser;
use std::error::Error;
use tracing::{debug, error, info, instrument, warn};
use tracing_subscriber::{fmt as tfmt, EnvFilter};

mod cli;
mod crawler;
mod error;
mod models;
mod outputs;
mod scrapers;
mod utils;

use cli::Cli;
use crawler::{CrawlReport, Crawler};
use outputs::table;
use scrapers::fetch::{Fetch, HttpFetcher, LocalFetcher, SnapshotFetcher};
use scrapers::profile::SiteProfile;
use scrapers::wordpress::Extractor;
use utils::ensure_writable_parent;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("wordpress_news_crawler starting up");

    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    // Fail before crawling if the table could never be written.
    if let Err(e) = ensure_writable_parent(&args.output).await {
        error!(
            path = %args.output.display(),
            error = %e,
            "Output location is not writable (fix perms or choose a different path)"
        );
        return Err(e);
    }

    let config = args.crawl_config();
    let profile = SiteProfile::from_seed(&config.seed_url)?;
    info!(host = %profile.host, seed = %config.seed_url, target = config.target_count, order = ?config.order, "Site profile ready");
    let extractor = Extractor::new(profile, args.extract_options());

    let report = if args.use_local {
        info!(path = %args.local_file.display(), "Reading pages from local file");
        crawl(LocalFetcher::new(&args.local_file), extractor, config).await
    } else {
        let http = HttpFetcher::new(args.timeout(), &args.user_agent)?;
        if args.write_local {
            let snapshot = SnapshotFetcher::new(http, &args.local_file);
            info!(path = %snapshot.path().display(), "Capturing fetched pages to local file");
            crawl(snapshot, extractor, config).await
        } else {
            crawl(http, extractor, config).await
        }
    };

    if !report.target_reached() {
        warn!(
            found = report.articles.len(),
            target = report.target_count,
            path = %args.output.display(),
            "Found fewer articles than requested; saving anyway"
        );
    }

    // Persisting is the only fatal step once the crawl has started.
    table::write_articles(&report.articles, &args.output)?;
    let persisted = table::read_articles(&args.output)?;
    if persisted.len() != report.articles.len() {
        warn!(
            written = report.articles.len(),
            read_back = persisted.len(),
            "Row count of the written table does not match"
        );
    }

    let elapsed = start_time.elapsed();
    info!(
        articles = report.articles.len(),
        pages_visited = report.pages_visited,
        duplicates_skipped = report.duplicates_skipped,
        fetch_failures = report.fetch_failures,
        non_articles = report.non_articles,
        frontier_remaining = report.frontier_remaining,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        "Execution complete"
    );

    Ok(())
}

#[instrument(level = "info", skip_all)]
async fn crawl<F: Fetch>(fetcher: F, extractor: Extractor, config: crawler::CrawlConfig) -> CrawlReport {
    Crawler::new(fetcher, extractor, config).run().await
}
