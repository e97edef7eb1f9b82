use geo::{Coord, Rect};

use crate::{api::Location, selection::UrlChange};

/// Input to the session, as reported by the map surface or the search box.
#[derive(Debug, Clone, PartialEq)]
pub enum MapEvent {
    /// A pan or zoom settled.
    PanEnded { zoom: f64, extent: Rect<f64> },
    /// The user picked a search result; recorded as a new history entry.
    LocationSelected(Location),
    /// The location changed without user input (e.g. read from the URL).
    LocationChanged(Location),
    /// A roof outline was clicked.
    FeatureClicked(String),
    /// A click hit no roof. `extent` is the visible area, if the surface knows it.
    EmptySpaceClicked { point: Coord<f64>, extent: Option<Rect<f64>> },
}

/// Output of the session for whatever renders it.
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceUpdate {
    /// Lookups started (`true`) or all finished (`false`).
    Loading(bool),
    /// Number of stored roofs changed.
    RoofCount(usize),
    /// Styles must be re-evaluated against the selection.
    Redraw,
    /// The page address changed.
    Url(UrlChange),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshState {
    Idle,
    Fetching,
}
