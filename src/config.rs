use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::geom::Viewport;

/// Runtime settings. Every field has a default, so a config file only needs
/// the values it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Identify endpoint of the geo.admin.ch MapServer.
    pub identify_url: String,
    /// Location search endpoint.
    pub search_url: String,
    /// Layer queried for roof outlines.
    pub roof_layer: String,
    /// Feature set searched for addresses.
    pub search_features: String,
    /// Spatial reference of every coordinate sent and received.
    pub spatial_reference: u32,
    /// Half size of the map extent sent with each identify request.
    pub identify_half_extent: f64,
    /// Identify tolerance in pixels.
    pub identify_tolerance: u32,
    /// `width, height, dpi` of the virtual image sent with identify requests.
    pub image_display: [u32; 3],
    /// Cells per side when sampling a visible extent.
    pub grid_size: usize,
    /// Spacing of the fallback fan when no extent is known.
    pub fallback_step: f64,
    /// Pans below this zoom level do not fetch roofs.
    pub min_fetch_zoom: f64,
    /// Zoom level used when jumping to a chosen location.
    pub location_zoom: f64,
    /// Map surface size in pixels, `[width, height]`.
    pub viewport: [u32; 2],
    pub search_limit: u32,
    /// Shorter search texts are answered with no options and no request.
    pub min_search_chars: usize,
    pub search_debounce_ms: u64,
    pub user_agent: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            identify_url: "https://api3.geo.admin.ch/rest/services/api/MapServer/identify".into(),
            search_url: "https://api3.geo.admin.ch/rest/services/api/SearchServer".into(),
            roof_layer: "ch.bfe.solarenergie-eignung-daecher".into(),
            search_features: "ch.bfs.gebaeude_wohnungs_register".into(),
            spatial_reference: 3857,
            identify_half_extent: 400.0,
            identify_tolerance: 100,
            image_display: [3000, 3000, 96],
            grid_size: 5,
            fallback_step: 300.0,
            min_fetch_zoom: 15.0,
            location_zoom: 18.0,
            viewport: [1152, 500],
            search_limit: 10,
            min_search_chars: 3,
            search_debounce_ms: 300,
            user_agent: concat!("roofmap/", env!("CARGO_PKG_VERSION")).into(),
        }
    }
}

impl Config {
    /// Read a JSON config file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        serde_json::from_slice(&bytes)
            .with_context(|| format!("Failed to parse config {}", path.display()))
    }

    #[inline] pub fn viewport(&self) -> Viewport { Viewport::new(self.viewport[0], self.viewport[1]) }
}
