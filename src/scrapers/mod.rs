//! Page retrieval and field extraction.
//!
//! | Module | Role |
//! |--------|------|
//! | [`fetch`] | `Fetch` trait with HTTP, local-file and snapshot implementations |
//! | [`profile`] | Literal markers and URL patterns for one WordPress site |
//! | [`wordpress`] | Title, author, date, body and link extraction |
//!
//! Extraction never fails: a field that cannot be found is `None`, and a page
//! without any article signal yields no record but still contributes its
//! candidate links.

pub mod fetch;
pub mod profile;
pub mod wordpress;
