use geo::Coord;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::store::RawRoof;

use super::error::FetchError;

/// Only the envelope is typed; results are read leniently so one bad ring
/// cannot reject its siblings.
#[derive(Debug, Deserialize)]
struct IdentifyResponse {
    #[serde(default)]
    results: Option<Vec<Value>>,
}

/// Supplied ids may be strings or numbers; empty strings and zero count as absent.
fn supplied_id(id: Option<&Value>) -> Option<String> {
    match id? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) if n.as_f64() != Some(0.0) => Some(n.to_string()),
        _ => None,
    }
}

/// Convert one vertex; it needs at least two numeric coordinates.
fn parse_vertex(vertex: &Value) -> Option<Coord<f64>> {
    match vertex.as_array()?.as_slice() {
        [x, y, ..] => Some(Coord { x: x.as_f64()?, y: y.as_f64()? }),
        _ => None,
    }
}

/// Convert one ring, or `None` if it is not an array, any vertex is malformed,
/// or it has fewer than 3 vertices.
fn parse_ring(ring: &Value) -> Option<Vec<Coord<f64>>> {
    let vertices = ring.as_array()?;
    if vertices.len() < 3 { return None }
    vertices.iter().map(parse_vertex).collect()
}

/// Flatten an identify response into one raw roof per usable ring.
/// Results without polygon geometry and malformed rings are dropped; only a
/// body that is not a JSON object fails.
pub fn parse_identify(bytes: &[u8]) -> Result<Vec<RawRoof>, FetchError> {
    let response: IdentifyResponse = serde_json::from_slice(bytes)?;

    let mut roofs = Vec::new();
    for result in response.results.unwrap_or_default() {
        let Some(rings) = result.pointer("/geometry/rings").and_then(Value::as_array) else {
            debug!("identify result without rings");
            continue;
        };
        let id = supplied_id(result.get("id"));
        let attributes = result.get("attributes").and_then(Value::as_object).cloned().unwrap_or_default();

        for ring in rings {
            match parse_ring(ring) {
                Some(ring) => roofs.push(RawRoof { ring, attributes: attributes.clone(), id: id.clone() }),
                None => debug!("dropping malformed ring"),
            }
        }
    }
    Ok(roofs)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn parse(value: Value) -> Vec<RawRoof> {
        parse_identify(&serde_json::to_vec(&value).unwrap()).unwrap()
    }

    #[test]
    fn rings_are_flattened_with_shared_attributes() {
        let roofs = parse(json!({
            "results": [{
                "id": 1234567,
                "layerBodId": "ch.bfe.solarenergie-eignung-daecher",
                "geometry": { "rings": [
                    [[0.0, 0.0], [10.0, 0.0], [10.0, 10.0], [0.0, 0.0]],
                    [[20.0, 0.0], [30.0, 0.0], [30.0, 10.0]],
                ]},
                "attributes": { "klasse": 5, "flaeche": 42.5 },
            }]
        }));
        assert_eq!(roofs.len(), 2);
        assert!(roofs.iter().all(|r| r.id.as_deref() == Some("1234567")));
        assert!(roofs.iter().all(|r| r.attributes["klasse"] == 5));
        assert_eq!(roofs[1].ring[0], Coord { x: 20.0, y: 0.0 });
    }

    #[test]
    fn short_and_null_rings_are_dropped() {
        let roofs = parse(json!({
            "results": [{
                "geometry": { "rings": [
                    [[0.0, 0.0], [1.0, 1.0]],
                    null,
                    [[0.0, 0.0], [1.0], [2.0, 2.0]],
                    [[5.0, 5.0, 500.0], [6.0, 5.0, 500.0], [6.0, 6.0, 500.0]],
                ]},
            }]
        }));
        assert_eq!(roofs.len(), 1);
        assert_eq!(roofs[0].ring[2], Coord { x: 6.0, y: 6.0 });
        assert!(roofs[0].id.is_none());
        assert!(roofs[0].attributes.is_empty());
    }

    #[test]
    fn missing_geometry_and_results_are_empty() {
        assert!(parse(json!({ "results": [{ "attributes": {} }, { "geometry": { "x": 1.0 } }] })).is_empty());
        assert!(parse(json!({})).is_empty());
    }

    #[test]
    fn falsy_ids_are_absent() {
        assert_eq!(supplied_id(Some(&json!(""))), None);
        assert_eq!(supplied_id(Some(&json!(0))), None);
        assert_eq!(supplied_id(Some(&json!(null))), None);
        assert_eq!(supplied_id(Some(&json!("abc"))).as_deref(), Some("abc"));
        assert_eq!(supplied_id(None), None);
    }

    #[test]
    fn null_coordinate_only_drops_its_ring() {
        let roofs = parse_identify(br#"{"results": [
            {"id": "good", "geometry": {"rings": [[[0, 0], [1, 0], [1, 1]]]}, "attributes": {}},
            {"id": "bad", "geometry": {"rings": [[[5, 5], [6, null], [6, 6]], "oops"]}, "attributes": null}
        ]}"#).unwrap();
        assert_eq!(roofs.len(), 1);
        assert_eq!(roofs[0].id.as_deref(), Some("good"));
        assert_eq!(roofs[0].ring[1], Coord { x: 1.0, y: 0.0 });
    }

    #[test]
    fn null_or_odd_results_are_empty() {
        assert!(parse(json!({ "results": null })).is_empty());
        assert!(parse(json!({ "results": [null, 3, "x", { "geometry": null }] })).is_empty());
    }

    #[test]
    fn invalid_json_is_decode_error() {
        assert!(matches!(parse_identify(b"<html>"), Err(FetchError::Decode(_))));
    }
}
