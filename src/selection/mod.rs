mod selection;
mod url;

pub use selection::SelectionSet;
pub use url::{History, PageUrl, UrlChange, params};
