use anyhow::{Context, Result};
use geo::{LineString, Polygon};
use serde_json::{Value, json};

use crate::selection::SelectionSet;

use super::{roof::RoofPolygon, store::RoofStore};

/// Paint for one roof outline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoofStyle {
    pub fill: &'static str,
    pub stroke: &'static str,
    pub stroke_width: f64,
}

impl RoofStyle {
    pub const SELECTED: RoofStyle = RoofStyle {
        fill: "rgba(255, 0, 0, 0.5)",
        stroke: "#ff0000",
        stroke_width: 3.0,
    };

    pub const UNSELECTED: RoofStyle = RoofStyle {
        fill: "rgba(0, 0, 255, 0.3)",
        stroke: "#0000ff",
        stroke_width: 1.0,
    };

    #[inline]
    pub fn for_selection(selected: bool) -> RoofStyle {
        if selected { Self::SELECTED } else { Self::UNSELECTED }
    }
}

/// One GeoJSON feature; the exterior ring is closed as GeoJSON requires.
fn roof_feature(roof: &RoofPolygon, selected: bool) -> Value {
    let polygon = Polygon::new(LineString::from(roof.ring.clone()), vec![]);
    let exterior: Vec<[f64; 2]> = polygon.exterior().coords().map(|c| [c.x, c.y]).collect();
    let style = RoofStyle::for_selection(selected);

    let mut properties = roof.attributes.clone();
    properties.insert("selected".into(), json!(selected));
    properties.insert("fill".into(), json!(style.fill));
    properties.insert("stroke".into(), json!(style.stroke));
    properties.insert("stroke-width".into(), json!(style.stroke_width));

    json!({
        "type": "Feature",
        "id": roof.id,
        "geometry": {
            "type": "Polygon",
            "coordinates": [exterior],
        },
        "properties": properties,
    })
}

/// Render the store as a FeatureCollection, styled by selection membership.
pub fn to_feature_collection(store: &RoofStore, selection: &SelectionSet) -> Value {
    let features: Vec<Value> = store.iter()
        .map(|roof| roof_feature(roof, selection.contains(&roof.id)))
        .collect();

    json!({
        "type": "FeatureCollection",
        "features": features,
    })
}

/// Render the store to GeoJSON bytes.
pub fn write_geojson_bytes(store: &RoofStore, selection: &SelectionSet) -> Result<Vec<u8>> {
    serde_json::to_vec_pretty(&to_feature_collection(store, selection))
        .context("Failed to serialize roofs to GeoJSON")
}

#[cfg(test)]
mod tests {
    use geo::Coord;
    use serde_json::Map;

    use super::*;
    use crate::store::RawRoof;

    fn store_with_two() -> RoofStore {
        let square = |x: f64| vec![
            Coord { x, y: 0.0 },
            Coord { x: x + 1.0, y: 0.0 },
            Coord { x: x + 1.0, y: 1.0 },
        ];
        let mut attrs = Map::new();
        attrs.insert("klasse".into(), json!(4));

        let mut store = RoofStore::new();
        store.add_results([
            RawRoof::new(square(0.0)).with_id("a").with_attributes(attrs),
            RawRoof::new(square(5.0)).with_id("b"),
        ]);
        store
    }

    #[test]
    fn feature_collection_marks_selection() {
        let store = store_with_two();
        let selection: SelectionSet = ["b".to_string()].into_iter().collect();
        let fc = to_feature_collection(&store, &selection);

        let features = fc["features"].as_array().unwrap();
        assert_eq!(features.len(), 2);
        assert_eq!(features[0]["id"], "a");
        assert_eq!(features[0]["properties"]["selected"], false);
        assert_eq!(features[0]["properties"]["klasse"], 4);
        assert_eq!(features[0]["properties"]["stroke"], "#0000ff");
        assert_eq!(features[1]["properties"]["selected"], true);
        assert_eq!(features[1]["properties"]["fill"], "rgba(255, 0, 0, 0.5)");
        assert_eq!(features[1]["properties"]["stroke-width"], 3.0);
    }

    #[test]
    fn ring_is_closed_in_output() {
        let store = store_with_two();
        let fc = to_feature_collection(&store, &SelectionSet::new());
        let ring = fc["features"][0]["geometry"]["coordinates"][0].as_array().unwrap();
        assert_eq!(ring.len(), 4);
        assert_eq!(ring.first(), ring.last());
    }

    #[test]
    fn bytes_parse_back() {
        let bytes = write_geojson_bytes(&store_with_two(), &SelectionSet::new()).unwrap();
        let value: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(value["type"], "FeatureCollection");
    }
}
