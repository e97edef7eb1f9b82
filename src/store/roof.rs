use geo::Coord;
use serde_json::{Map, Value};

/// One ring as normalized from an identify result, before it gets a stable id.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRoof {
    pub ring: Vec<Coord<f64>>,
    pub attributes: Map<String, Value>,
    /// Identifier supplied by the source, if any.
    pub id: Option<String>,
}

impl RawRoof {
    pub fn new(ring: Vec<Coord<f64>>) -> Self {
        Self { ring, attributes: Map::new(), id: None }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_attributes(mut self, attributes: Map<String, Value>) -> Self {
        self.attributes = attributes;
        self
    }

    /// First vertex of the ring, which doubles as the ring's identity anchor.
    #[inline] pub fn first_vertex(&self) -> Option<Coord<f64>> { self.ring.first().copied() }
}

/// A stored roof outline.
#[derive(Debug, Clone, PartialEq)]
pub struct RoofPolygon {
    pub id: String,
    /// At least 3 vertices; first and last need not coincide.
    pub ring: Vec<Coord<f64>>,
    pub attributes: Map<String, Value>,
}

impl RoofPolygon {
    #[inline] pub fn first_vertex(&self) -> Coord<f64> { self.ring[0] }
}

/// Id derived from the ring's first vertex, so re-fetching the same ring gives the same id.
pub fn synthesize_id(first: Coord<f64>) -> String {
    format!("roof-{}-{}", round_half_up(first.x), round_half_up(first.y))
}

/// Round to the nearest integer, ties toward positive infinity.
#[inline]
fn round_half_up(v: f64) -> i64 { (v + 0.5).floor() as i64 }

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn synthesized_id_rounds_first_vertex() {
        assert_eq!(synthesize_id(Coord { x: 915_123.4, y: 5_910_456.6 }), "roof-915123-5910457");
    }

    #[test]
    fn ties_round_up() {
        assert_eq!(synthesize_id(Coord { x: 2.5, y: -2.5 }), "roof-3--2");
        assert_eq!(synthesize_id(Coord { x: -0.4, y: 0.49 }), "roof-0-0");
    }

    #[test]
    fn builder_keeps_fields() {
        let raw = RawRoof::new(vec![Coord { x: 1.0, y: 2.0 }]).with_id("abc");
        assert_eq!(raw.id.as_deref(), Some("abc"));
        assert_eq!(raw.first_vertex(), Some(Coord { x: 1.0, y: 2.0 }));
        assert!(raw.attributes.is_empty());
    }
}
