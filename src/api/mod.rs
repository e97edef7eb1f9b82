mod client;
mod error;
mod identify;
mod search;

pub use client::{GeoAdminClient, LocationSource, RoofSource};
pub use error::FetchError;
pub use identify::parse_identify;
pub use search::{Location, SearchHit, debounce_search, parse_search, restore_search, sanitize_html};
