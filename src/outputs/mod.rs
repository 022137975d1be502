//! Output sinks for the crawl results.
//!
//! # Submodules
//!
//! - [`table`]: Writes the article table to CSV and reads it back
//!
//! # Output Structure
//!
//! ```text
//! articles.csv
//! link,title,author,datetime,article_text,links_in_article
//! https://techcrunch.com/2023/03/13/...,Etsy is ...,Jane Doe,2023-03-13T21:15:48+00:00,"...","https://...\thttps://..."
//! ```

pub mod table;
