use ahash::AHashSet;
use geo::Coord;
use tracing::debug;

use super::roof::{RawRoof, RoofPolygon, synthesize_id};

/// Bit pattern of a vertex, with -0.0 folded onto 0.0 so the key agrees with `==`.
type VertexKey = (u64, u64);

#[inline]
fn vertex_key(c: Coord<f64>) -> VertexKey { ((c.x + 0.0).to_bits(), (c.y + 0.0).to_bits()) }

/// Working set of fetched roofs.
///
/// Two rings are treated as the same roof when their first vertices are exactly
/// equal. This is an approximation: distinct roofs sharing a first vertex collapse
/// into one entry, and the same roof serialized from a different starting vertex
/// is stored twice.
#[derive(Debug, Default, Clone)]
pub struct RoofStore {
    roofs: Vec<RoofPolygon>,
    anchors: AHashSet<VertexKey>,
}

impl RoofStore {
    pub fn new() -> Self { Self::default() }

    /// Number of stored roofs.
    #[inline] pub fn len(&self) -> usize { self.roofs.len() }

    #[inline] pub fn is_empty(&self) -> bool { self.roofs.is_empty() }

    /// All stored roofs, in insertion order.
    #[inline] pub fn roofs(&self) -> &[RoofPolygon] { &self.roofs }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &RoofPolygon> + '_ { self.roofs.iter() }

    /// First stored roof carrying `id`.
    pub fn get(&self, id: &str) -> Option<&RoofPolygon> { self.roofs.iter().find(|r| r.id == id) }

    #[inline] pub fn contains_id(&self, id: &str) -> bool { self.get(id).is_some() }

    /// Merge raw rings into the store and return how many were new.
    /// Rings whose first vertex is already anchored are skipped, as are rings
    /// with fewer than 3 vertices.
    pub fn add_results<I>(&mut self, raws: I) -> usize where I: IntoIterator<Item = RawRoof> {
        let mut added = 0;
        for raw in raws {
            if raw.ring.len() < 3 {
                debug!(vertices = raw.ring.len(), "skipping degenerate ring");
                continue;
            }
            let first = raw.ring[0];
            if !self.anchors.insert(vertex_key(first)) { continue }

            let id = raw.id.unwrap_or_else(|| synthesize_id(first));
            self.roofs.push(RoofPolygon { id, ring: raw.ring, attributes: raw.attributes });
            added += 1;
        }
        added
    }

    /// Drop every stored roof.
    pub fn clear(&mut self) {
        self.roofs.clear();
        self.anchors.clear();
    }
}
