//! Command-line interface definitions.
//!
//! Every option has a default, so the crawler runs with no arguments at all.
//! The two run parameters can also be supplied through environment
//! variables.

use crate::crawler::{CrawlConfig, TraversalOrder};
use crate::scrapers::wordpress::{ExtractOptions, TitlePrecedence};
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_SEED_URL: &str = "https://techcrunch.com/2023/03/13/etsy-processing-seller-payments-alternative-partners-after-svb-implosion/";

/// Command-line arguments for the crawler.
///
/// # Examples
///
/// ```sh
/// # Defaults: 50 articles from the built-in seed, written to articles.csv
/// wordpress_news_crawler
///
/// # Ten articles, breadth-first, from another seed
/// wordpress_news_crawler -n 10 --order breadth-first -s https://techcrunch.com/2023/03/14/some-story/
///
/// # Replay a captured page instead of hitting the network
/// wordpress_news_crawler --use-local --local-file fixtures/techcrunch.html
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Number of articles to collect
    #[arg(short, long, env = "CRAWL_NUM_ARTICLES", default_value_t = 50)]
    pub num_articles: usize,

    /// Article URL the crawl starts from
    #[arg(short, long, env = "CRAWL_SEED_URL", default_value = DEFAULT_SEED_URL)]
    pub seed_url: String,

    /// CSV file the article table is written to
    #[arg(short, long, default_value = "articles.csv")]
    pub output: PathBuf,

    /// Per-request network timeout, in seconds
    #[arg(long, default_value_t = 30)]
    pub timeout_secs: u64,

    /// Frontier discipline
    #[arg(long, value_enum, default_value_t = TraversalOrder::DepthFirst)]
    pub order: TraversalOrder,

    /// Which title wins when both the metadata tag and the headline exist
    #[arg(long, value_enum, default_value_t = TitlePrecedence::HeadingWins)]
    pub title_precedence: TitlePrecedence,

    /// Treat a body container at the very start of the page as missing
    #[arg(long)]
    pub zero_offset_is_missing: bool,

    /// Read every page from --local-file instead of the network
    #[arg(long, conflicts_with = "write_local")]
    pub use_local: bool,

    /// Write each fetched page to --local-file
    #[arg(long)]
    pub write_local: bool,

    /// Fixture file used by --use-local and --write-local
    #[arg(long, default_value = "techcrunch.html")]
    pub local_file: PathBuf,

    /// User-Agent header sent with every request
    #[arg(long, default_value = concat!("wordpress_news_crawler/", env!("CARGO_PKG_VERSION")))]
    pub user_agent: String,
}

impl Cli {
    /// Run parameters for the crawl driver. The seed URL is trimmed.
    pub fn crawl_config(&self) -> CrawlConfig {
        CrawlConfig {
            seed_url: self.seed_url.trim().to_string(),
            target_count: self.num_articles,
            order: self.order,
        }
    }

    /// Extractor switches selected on the command line.
    pub fn extract_options(&self) -> ExtractOptions {
        ExtractOptions {
            title_precedence: self.title_precedence,
            zero_offset_is_missing: self.zero_offset_is_missing,
        }
    }

    /// Per-request network timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["wordpress_news_crawler"]);

        assert_eq!(cli.num_articles, 50);
        assert_eq!(cli.seed_url, DEFAULT_SEED_URL);
        assert_eq!(cli.output, PathBuf::from("articles.csv"));
        assert_eq!(cli.order, TraversalOrder::DepthFirst);
        assert_eq!(cli.title_precedence, TitlePrecedence::HeadingWins);
        assert!(!cli.use_local);
        assert_eq!(cli.timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_cli_short_flags() {
        let cli = Cli::parse_from([
            "wordpress_news_crawler",
            "-n",
            "7",
            "-s",
            " https://techcrunch.com/2023/03/14/story/ ",
            "-o",
            "/tmp/out.csv",
        ]);

        let config = cli.crawl_config();
        assert_eq!(config.target_count, 7);
        assert_eq!(config.seed_url, "https://techcrunch.com/2023/03/14/story/");
        assert_eq!(cli.output, PathBuf::from("/tmp/out.csv"));
    }

    #[test]
    fn test_cli_value_enums() {
        let cli = Cli::parse_from([
            "wordpress_news_crawler",
            "--order",
            "breadth-first",
            "--title-precedence",
            "metadata-first",
            "--zero-offset-is-missing",
        ]);

        assert_eq!(cli.crawl_config().order, TraversalOrder::BreadthFirst);
        let options = cli.extract_options();
        assert_eq!(options.title_precedence, TitlePrecedence::MetadataFirst);
        assert!(options.zero_offset_is_missing);
    }

    #[test]
    fn test_cli_local_modes_conflict() {
        let result = Cli::try_parse_from(["wordpress_news_crawler", "--use-local", "--write-local"]);
        assert!(result.is_err());
    }
}
