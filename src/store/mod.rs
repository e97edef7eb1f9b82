mod geojson;
mod roof;
mod store;

pub use geojson::{RoofStyle, to_feature_collection, write_geojson_bytes};
pub use roof::{RawRoof, RoofPolygon, synthesize_id};
pub use store::RoofStore;
