//! Menu Source Client
//!
//! Fetches freshly scraped daily menus for a cafeteria from the external
//! menu source service. Sections are returned as raw JSON; callers decide
//! how to flatten them.

mod client;
mod error;
mod types;

pub use client::MenuSourceClient;
pub use error::{MenuSourceError, Result};
pub use types::{DailyMenu, MenuParser, SourceCafeteria};
