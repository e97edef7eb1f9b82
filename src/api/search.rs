use std::{sync::OnceLock, time::Duration};

use regex::Regex;
use serde::Deserialize;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::selection::{PageUrl, params};

use super::{client::LocationSource, error::FetchError};

/// A chosen place: a label plus projected coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct Location {
    pub label: String,
    pub x: f64,
    pub y: f64,
}

/// One option returned by the location search.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit {
    /// Location with its label stripped of markup.
    pub location: Location,
    /// Label exactly as the service returned it (may contain HTML).
    pub raw_label: String,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Option<Vec<SearchResult>>,
}

#[derive(Debug, Deserialize)]
struct SearchResult {
    #[serde(default)]
    attrs: Option<SearchAttrs>,
}

#[derive(Debug, Deserialize)]
struct SearchAttrs {
    #[serde(default)]
    label: Option<String>,
    x: Option<f64>,
    y: Option<f64>,
}

/// Remove anything that looks like an HTML tag, including a dangling `<...` at the end.
pub fn sanitize_html(html: &str) -> String {
    static TAG: OnceLock<Regex> = OnceLock::new();
    let tag = TAG.get_or_init(|| Regex::new(r"</?[^>]+(>|$)").expect("tag pattern is valid"));
    tag.replace_all(html, "").into_owned()
}

/// Parse a search response. Results without coordinates are skipped.
pub fn parse_search(bytes: &[u8]) -> Result<Vec<SearchHit>, FetchError> {
    let response: SearchResponse = serde_json::from_slice(bytes)?;
    Ok(response.results.unwrap_or_default().into_iter()
        .filter_map(|r| r.attrs)
        .filter_map(|attrs| {
            let raw_label = attrs.label.unwrap_or_default();
            let location = Location { label: sanitize_html(&raw_label), x: attrs.x?, y: attrs.y? };
            Some(SearchHit { location, raw_label })
        })
        .collect())
}

/// Answer a stream of typed search texts, looking up only the latest text once
/// `quiet` has passed without another keystroke.
///
/// Failed lookups produce an empty option list. Returns when `texts` closes
/// (a text still waiting for its quiet period is discarded) or `options` is dropped.
pub async fn debounce_search<L: LocationSource>(
    source: &L,
    mut texts: mpsc::Receiver<String>,
    options: mpsc::Sender<Vec<SearchHit>>,
    quiet: Duration,
) {
    let mut pending: Option<String> = None;
    loop {
        tokio::select! {
            text = texts.recv() => match text {
                Some(text) => pending = Some(text),
                None => break,
            },
            _ = tokio::time::sleep(quiet), if pending.is_some() => {
                let Some(text) = pending.take() else { continue };
                debug!(%text, "searching locations");
                let hits = source.search(&text).await.unwrap_or_else(|err| {
                    warn!(%text, %err, "location search failed");
                    Vec::new()
                });
                if options.send(hits).await.is_err() { break }
            }
        }
    }
}

/// Re-run the search remembered in the page URL's `q` parameter, without waiting
/// for a quiet period. Returns the restored text and its options, or `None` if
/// the URL carries no search text. A failed lookup yields no options.
pub async fn restore_search<L: LocationSource>(source: &L, url: &PageUrl) -> Option<(String, Vec<SearchHit>)> {
    let text = url.get(params::QUERY).filter(|q| !q.is_empty())?;
    let hits = source.search(&text).await.unwrap_or_else(|err| {
        warn!(%text, %err, "restored location search failed");
        Vec::new()
    });
    Some((text, hits))
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use serde_json::json;

    use super::*;

    #[test]
    fn sanitize_strips_tags() {
        assert_eq!(sanitize_html("<b>Bahnhofstrasse</b> 1, Zürich"), "Bahnhofstrasse 1, Zürich");
        assert_eq!(sanitize_html("plain"), "plain");
        assert_eq!(sanitize_html("<i>open <br/>tail <span"), "open tail ");
        assert_eq!(sanitize_html(""), "");
    }

    #[test]
    fn parse_search_sanitizes_and_skips_incomplete() {
        let body = json!({
            "results": [
                { "id": 1, "attrs": { "label": "<b>Bundesplatz</b> 3 <b>3011 Bern</b>", "x": 828_000.5, "y": 5_933_000.0 } },
                { "id": 2, "attrs": { "label": "no coordinates" } },
                { "id": 3 },
            ]
        });
        let hits = parse_search(&serde_json::to_vec(&body).unwrap()).unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].location.label, "Bundesplatz 3 3011 Bern");
        assert_eq!(hits[0].location.x, 828_000.5);
        assert!(hits[0].raw_label.starts_with("<b>"));
    }

    struct RecordingSearch {
        queries: RefCell<Vec<String>>,
        fail: bool,
    }

    impl LocationSource for RecordingSearch {
        async fn search(&self, text: &str) -> Result<Vec<SearchHit>, FetchError> {
            self.queries.borrow_mut().push(text.to_string());
            if self.fail { return Err(FetchError::BadStatus(reqwest::StatusCode::BAD_GATEWAY)) }
            Ok(vec![SearchHit {
                location: Location { label: text.to_string(), x: 1.0, y: 2.0 },
                raw_label: text.to_string(),
            }])
        }
    }

    #[tokio::test]
    async fn url_query_seeds_search() {
        let source = RecordingSearch { queries: RefCell::new(Vec::new()), fail: false };
        let url = PageUrl::from_query("x=1&y=2&q=Bundesplatz+3").unwrap();
        let (text, hits) = restore_search(&source, &url).await.unwrap();
        assert_eq!(text, "Bundesplatz 3");
        assert_eq!(hits[0].location.label, "Bundesplatz 3");
        assert_eq!(*source.queries.borrow(), vec!["Bundesplatz 3".to_string()]);

        assert!(restore_search(&source, &PageUrl::from_query("q=").unwrap()).await.is_none());
        assert!(restore_search(&source, &PageUrl::from_query("x=1").unwrap()).await.is_none());
        assert_eq!(source.queries.borrow().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn only_last_text_is_searched() {
        let source = RecordingSearch { queries: RefCell::new(Vec::new()), fail: false };
        let (text_tx, text_rx) = mpsc::channel(8);
        let (opt_tx, mut opt_rx) = mpsc::channel(8);

        let driver = async {
            for text in ["Bah", "Bahn", "Bahnhof"] {
                text_tx.send(text.to_string()).await.unwrap();
                tokio::time::sleep(Duration::from_millis(100)).await;
            }
            let hits = opt_rx.recv().await.unwrap();
            drop(text_tx);
            hits
        };
        let (hits, ()) = tokio::join!(driver, debounce_search(&source, text_rx, opt_tx, Duration::from_millis(300)));

        assert_eq!(hits[0].location.label, "Bahnhof");
        assert_eq!(*source.queries.borrow(), vec!["Bahnhof".to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn failed_search_yields_no_options() {
        let source = RecordingSearch { queries: RefCell::new(Vec::new()), fail: true };
        let (text_tx, text_rx) = mpsc::channel(8);
        let (opt_tx, mut opt_rx) = mpsc::channel(8);

        let driver = async {
            text_tx.send("Zürich".to_string()).await.unwrap();
            let hits = opt_rx.recv().await.unwrap();
            drop(text_tx);
            hits
        };
        let (hits, ()) = tokio::join!(driver, debounce_search(&source, text_rx, opt_tx, Duration::from_millis(300)));
        assert!(hits.is_empty());
        assert_eq!(source.queries.borrow().len(), 1);
    }
}
