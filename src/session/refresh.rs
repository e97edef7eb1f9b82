use futures::future::join_all;
use geo::Coord;
use tracing::{info, warn};

use crate::{api::RoofSource, store::RoofStore};

/// Look up all `points` concurrently and merge whatever succeeds into `store`.
/// A failed lookup counts as no roofs at its point. Returns the number of new roofs.
pub async fn refresh_area<S: RoofSource>(source: &S, store: &mut RoofStore, points: &[Coord<f64>]) -> usize {
    let results = join_all(points.iter().map(|&p| source.fetch_at(p))).await;

    let mut added = 0;
    for (point, result) in points.iter().zip(results) {
        match result {
            Ok(raws) => added += store.add_results(raws),
            Err(err) => warn!(x = point.x, y = point.y, %err, "roof lookup failed"),
        }
    }
    if added > 0 { info!("Added {added} new roofs") }
    added
}
