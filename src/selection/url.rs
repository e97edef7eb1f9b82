use std::fmt;

use anyhow::{Context, Result};
use reqwest::Url;

use crate::api::Location;

use super::selection::SelectionSet;

/// Query parameters read or written by the roof map page.
pub mod params {
    /// Comma-separated selected roof ids.
    pub const SELECTED_ROOFS: &str = "selectedRoofs";
    /// Projected x of the chosen location.
    pub const X: &str = "x";
    /// Projected y of the chosen location.
    pub const Y: &str = "y";
    /// Label of the chosen location.
    pub const QUERY: &str = "q";
}

/// Base used when only a query string is known.
const LOCAL_BASE: &str = "http://localhost/";

/// The page address; its query string is the only persisted state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageUrl(Url);

impl PageUrl {
    pub fn parse(input: &str) -> Result<Self> {
        let url = Url::parse(input).with_context(|| format!("Invalid page URL {input:?}"))?;
        Ok(Self(url))
    }

    /// A page URL carrying only `query` (with or without the leading `?`).
    pub fn from_query(query: &str) -> Result<Self> {
        let mut url = Url::parse(LOCAL_BASE).context("Invalid local base URL")?;
        let query = query.strip_prefix('?').unwrap_or(query);
        url.set_query((!query.is_empty()).then_some(query));
        Ok(Self(url))
    }

    #[inline] pub fn as_str(&self) -> &str { self.0.as_str() }

    #[inline] pub fn query(&self) -> Option<&str> { self.0.query() }

    /// Decoded value of the first occurrence of `key`.
    pub fn get(&self, key: &str) -> Option<String> {
        self.0.query_pairs().find(|(k, _)| k == key).map(|(_, v)| v.into_owned())
    }

    /// Set `key` to `value`: the first occurrence is overwritten in place, later
    /// occurrences are dropped, and the pair is appended if absent.
    pub fn set(&mut self, key: &str, value: &str) {
        let mut pairs: Vec<(String, String)> = self.0.query_pairs().into_owned().collect();
        let mut seen = false;
        pairs.retain_mut(|(k, v)| {
            if k != key { return true }
            if seen { return false }
            seen = true;
            *v = value.to_string();
            true
        });
        if !seen { pairs.push((key.to_string(), value.to_string())) }

        self.0.query_pairs_mut().clear().extend_pairs(&pairs);
    }

    /// Selection encoded in the URL; empty if the parameter is absent.
    pub fn selected_roofs(&self) -> SelectionSet {
        SelectionSet::restore(self.get(params::SELECTED_ROOFS).as_deref())
    }

    /// Rewrite the selection parameter from `selection`.
    pub fn set_selected_roofs(&mut self, selection: &SelectionSet) {
        self.set(params::SELECTED_ROOFS, &selection.serialize());
    }

    /// Location encoded in the URL. All of `x`, `y` and `q` must be present and
    /// non-empty, and the coordinates must parse.
    pub fn location(&self) -> Option<Location> {
        let non_empty = |key: &str| self.get(key).filter(|v| !v.is_empty());
        let x = non_empty(params::X)?.trim().parse().ok()?;
        let y = non_empty(params::Y)?.trim().parse().ok()?;
        let label = non_empty(params::QUERY)?;
        Some(Location { label, x, y })
    }

    pub fn set_location(&mut self, location: &Location) {
        self.set(params::X, &location.x.to_string());
        self.set(params::Y, &location.y.to_string());
        self.set(params::QUERY, &location.label);
    }
}

impl fmt::Display for PageUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

/// How the page address changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UrlChange {
    /// New history entry (a location was chosen).
    Push(PageUrl),
    /// Current entry rewritten in place (the selection changed).
    Replace(PageUrl),
}

impl UrlChange {
    pub fn url(&self) -> &PageUrl {
        match self {
            UrlChange::Push(url) | UrlChange::Replace(url) => url,
        }
    }
}

/// Browser-style session history.
#[derive(Debug, Clone)]
pub struct History {
    entries: Vec<PageUrl>,
}

impl History {
    pub fn new(initial: PageUrl) -> Self { Self { entries: vec![initial] } }

    #[inline] pub fn len(&self) -> usize { self.entries.len() }

    #[inline] pub fn is_empty(&self) -> bool { self.entries.is_empty() }

    #[inline] pub fn entries(&self) -> &[PageUrl] { &self.entries }

    pub fn current(&self) -> Option<&PageUrl> { self.entries.last() }

    pub fn apply(&mut self, change: UrlChange) {
        match change {
            UrlChange::Push(url) => self.entries.push(url),
            UrlChange::Replace(url) => match self.entries.last_mut() {
                Some(current) => *current = url,
                None => self.entries.push(url),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_replaces_first_and_drops_rest() {
        let mut url = PageUrl::parse("https://roofs.example/?a=1&b=2&a=3").unwrap();
        url.set("a", "x");
        assert_eq!(url.query(), Some("a=x&b=2"));
        url.set("c", "new value");
        assert_eq!(url.query(), Some("a=x&b=2&c=new+value"));
    }

    #[test]
    fn selection_round_trips_through_query() {
        let mut url = PageUrl::parse("https://roofs.example/?q=Bern").unwrap();
        let selection: SelectionSet = ["roof-1-2".to_string(), "77".to_string()].into_iter().collect();
        url.set_selected_roofs(&selection);
        assert!(url.as_str().contains("selectedRoofs="));
        assert_eq!(url.get(params::QUERY).as_deref(), Some("Bern"));
        assert_eq!(url.selected_roofs(), selection);
    }

    #[test]
    fn empty_selection_keeps_empty_parameter() {
        let mut url = PageUrl::from_query("selectedRoofs=a").unwrap();
        url.set_selected_roofs(&SelectionSet::new());
        assert_eq!(url.query(), Some("selectedRoofs="));
        assert!(url.selected_roofs().is_empty());
    }

    #[test]
    fn location_needs_all_three_params() {
        let url = PageUrl::from_query("?x=915000.5&y=5910000&q=Bahnhofstrasse%201").unwrap();
        let loc = url.location().unwrap();
        assert_eq!(loc.x, 915000.5);
        assert_eq!(loc.y, 5910000.0);
        assert_eq!(loc.label, "Bahnhofstrasse 1");

        assert!(PageUrl::from_query("x=1&y=2").unwrap().location().is_none());
        assert!(PageUrl::from_query("x=1&y=2&q=").unwrap().location().is_none());
        assert!(PageUrl::from_query("x=abc&y=2&q=z").unwrap().location().is_none());
    }

    #[test]
    fn set_location_then_read_back() {
        let mut url = PageUrl::from_query("").unwrap();
        let loc = Location { label: "Zürich, Hauptbahnhof".into(), x: 950_000.25, y: 6_000_000.0 };
        url.set_location(&loc);
        assert_eq!(url.location(), Some(loc));
    }

    #[test]
    fn history_push_and_replace() {
        let mut history = History::new(PageUrl::from_query("").unwrap());
        history.apply(UrlChange::Push(PageUrl::from_query("q=a").unwrap()));
        history.apply(UrlChange::Replace(PageUrl::from_query("q=a&selectedRoofs=1").unwrap()));
        assert_eq!(history.len(), 2);
        assert_eq!(history.current().and_then(|u| u.query()), Some("q=a&selectedRoofs=1"));
    }
}
