#![doc = "Roof finder: sample a map extent, identify the roofs around each sample point, and keep a URL-backed roof selection"]
mod api;
mod config;
mod geom;
mod selection;
mod session;
mod store;

#[doc(inline)]
pub use api::{FetchError, GeoAdminClient, Location, LocationSource, RoofSource, SearchHit};

#[doc(inline)]
pub use api::{debounce_search, parse_identify, parse_search, restore_search, sanitize_html};

#[doc(inline)]
pub use config::Config;

#[doc(inline)]
pub use geom::{SampleArea, Viewport, extent, fallback_fan, resolution, sample_points};

#[doc(inline)]
pub use selection::{History, PageUrl, SelectionSet, UrlChange, params};

#[doc(inline)]
pub use session::{MapEvent, RefreshState, Session, SurfaceUpdate, refresh_area};

#[doc(inline)]
pub use store::{RawRoof, RoofPolygon, RoofStore, RoofStyle, synthesize_id, to_feature_collection, write_geojson_bytes};
