use std::rc::Rc;

use ahash::AHashMap;
use futures::{FutureExt, StreamExt, future::LocalBoxFuture, stream::FuturesUnordered};
use geo::Coord;
use serde_json::Value;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::{
    api::{FetchError, Location, RoofSource},
    config::Config,
    geom::SampleArea,
    selection::{PageUrl, SelectionSet, UrlChange},
    store::{RawRoof, RoofStore, RoofStyle, to_feature_collection},
};

use super::event::{MapEvent, RefreshState, SurfaceUpdate};

/// Outcome of one sample-point lookup, tagged with the cycle that issued it.
struct Lookup {
    cycle: u64,
    point: Coord<f64>,
    result: Result<Vec<RawRoof>, FetchError>,
}

/// One mounted roof map: the roof store, the selection, the page URL and the
/// refresh cycles in flight.
///
/// The session is driven by [`MapEvent`]s and reports [`SurfaceUpdate`]s.
/// Lookups of overlapping cycles run side by side and are never cancelled;
/// each result is merged as it arrives, so the store does not depend on
/// completion order.
pub struct Session<S> {
    source: Rc<S>,
    config: Config,
    store: RoofStore,
    selection: SelectionSet,
    url: PageUrl,

    /// Coordinates of the last location jumped to.
    last_location: Option<Coord<f64>>,
    /// Set once the selection restored from the URL got its redraw after roofs
    /// arrived; reset whenever the store is cleared for a new location.
    /// Any non-empty selection counts as waiting for roofs; ids are not matched
    /// against the store.
    reconciled: bool,

    lookups: FuturesUnordered<LocalBoxFuture<'static, Lookup>>,
    /// Outstanding lookups per cycle.
    cycles: AHashMap<u64, usize>,
    next_cycle: u64,

    outbox: Vec<SurfaceUpdate>,
}

impl<S: RoofSource + 'static> Session<S> {
    /// Restore the selection from `url` and, if the URL names a location, jump to it.
    pub fn mount(source: S, config: &Config, url: PageUrl) -> Self {
        let selection = url.selected_roofs();
        let location = url.location();
        debug!(selected = selection.len(), "mounting session");

        let mut session = Self {
            source: Rc::new(source),
            config: config.clone(),
            store: RoofStore::new(),
            selection,
            url,
            last_location: None,
            reconciled: false,
            lookups: FuturesUnordered::new(),
            cycles: AHashMap::new(),
            next_cycle: 0,
            outbox: Vec::new(),
        };
        if let Some(location) = location { session.jump_to(location) }
        session
    }

    #[inline] pub fn store(&self) -> &RoofStore { &self.store }

    #[inline] pub fn selection(&self) -> &SelectionSet { &self.selection }

    #[inline] pub fn url(&self) -> &PageUrl { &self.url }

    #[inline] pub fn is_reconciled(&self) -> bool { self.reconciled }

    pub fn state(&self) -> RefreshState {
        if self.cycles.is_empty() { RefreshState::Idle } else { RefreshState::Fetching }
    }

    /// Style of the roof with `id` under the current selection.
    pub fn style_for(&self, id: &str) -> RoofStyle { RoofStyle::for_selection(self.selection.contains(id)) }

    /// Stored roofs as a styled GeoJSON FeatureCollection.
    pub fn to_geojson(&self) -> Value { to_feature_collection(&self.store, &self.selection) }

    pub fn status_line(&self) -> String {
        format!("{} roofs visible | {} selected", self.store.len(), self.selection.len())
    }

    /// Take the updates produced since the last call.
    pub fn drain_updates(&mut self) -> Vec<SurfaceUpdate> { std::mem::take(&mut self.outbox) }

    /// Apply one event. Lookups it starts make progress only while the session
    /// is awaited ([`Session::next_completion`], [`Session::settle`], [`Session::run`]).
    pub fn handle(&mut self, event: MapEvent) {
        debug!(?event, "map event");
        match event {
            MapEvent::PanEnded { zoom, extent } => {
                if zoom >= self.config.min_fetch_zoom {
                    self.start_cycle(SampleArea::Extent(extent));
                }
            }
            MapEvent::LocationSelected(location) => {
                self.url.set_location(&location);
                self.emit(SurfaceUpdate::Url(UrlChange::Push(self.url.clone())));
                self.jump_to(location);
            }
            MapEvent::LocationChanged(location) => self.jump_to(location),
            MapEvent::FeatureClicked(id) => self.toggle(&id),
            MapEvent::EmptySpaceClicked { point, extent } => {
                self.start_cycle(extent.map_or(SampleArea::Around(point), SampleArea::Extent));
            }
        }
    }

    /// Wait for one outstanding lookup and merge it. Returns false if none was in flight.
    pub async fn next_completion(&mut self) -> bool {
        match self.lookups.next().await {
            Some(lookup) => {
                self.complete(lookup);
                true
            }
            None => false,
        }
    }

    /// Wait until every outstanding lookup has been merged.
    pub async fn settle(&mut self) {
        while self.next_completion().await {}
    }

    /// Event loop: apply events from `events` while merging lookups as they finish,
    /// and forward every update to `updates`. When `events` closes, the remaining
    /// lookups are awaited and the session is handed back.
    pub async fn run(
        mut self,
        mut events: mpsc::Receiver<MapEvent>,
        updates: mpsc::UnboundedSender<SurfaceUpdate>,
    ) -> Self {
        loop {
            self.forward(&updates);
            tokio::select! {
                event = events.recv() => match event {
                    Some(event) => self.handle(event),
                    None => break,
                },
                Some(lookup) = self.lookups.next(), if !self.lookups.is_empty() => self.complete(lookup),
            }
        }
        self.settle().await;
        self.forward(&updates);
        self
    }

    fn forward(&mut self, updates: &mpsc::UnboundedSender<SurfaceUpdate>) {
        for update in self.outbox.drain(..) {
            // a closed receiver only means nobody is rendering any more
            let _ = updates.send(update);
        }
    }

    #[inline]
    fn emit(&mut self, update: SurfaceUpdate) { self.outbox.push(update) }

    fn toggle(&mut self, id: &str) {
        let selected = self.selection.toggle(id);
        debug!(id, selected, "roof toggled");
        self.url.set_selected_roofs(&self.selection);
        self.emit(SurfaceUpdate::Url(UrlChange::Replace(self.url.clone())));
        self.emit(SurfaceUpdate::Redraw);
    }

    /// Center on a new location: clear the store and sample the extent visible at
    /// the location zoom. Repeating the last location is a no-op.
    fn jump_to(&mut self, location: Location) {
        let center = Coord { x: location.x, y: location.y };
        if self.last_location == Some(center) {
            debug!(label = %location.label, "location already handled");
            return;
        }
        info!(label = %location.label, x = center.x, y = center.y, "showing roofs near location");

        let extent = self.config.viewport().extent_at(center, self.config.location_zoom);
        self.store.clear();
        self.reconciled = false;
        self.emit(SurfaceUpdate::RoofCount(0));
        self.start_cycle(SampleArea::Extent(extent));
        self.last_location = Some(center);
    }

    fn start_cycle(&mut self, area: SampleArea) {
        let points = area.points(self.config.grid_size, self.config.fallback_step);
        if points.is_empty() { return }

        if self.cycles.is_empty() { self.emit(SurfaceUpdate::Loading(true)) }
        let cycle = self.next_cycle;
        self.next_cycle += 1;
        self.cycles.insert(cycle, points.len());
        debug!(cycle, points = points.len(), "refresh cycle started");

        for point in points {
            let source = Rc::clone(&self.source);
            self.lookups.push(async move {
                let result = source.fetch_at(point).await;
                Lookup { cycle, point, result }
            }.boxed_local());
        }
    }

    fn complete(&mut self, lookup: Lookup) {
        let Lookup { cycle, point, result } = lookup;
        match result {
            Ok(raws) => {
                let added = self.store.add_results(raws);
                if added > 0 {
                    info!("Added {added} new roofs");
                    self.emit(SurfaceUpdate::RoofCount(self.store.len()));
                    self.emit(SurfaceUpdate::Redraw);
                    self.store_changed();
                }
            }
            Err(err) => warn!(cycle, x = point.x, y = point.y, %err, "roof lookup failed"),
        }

        let Some(remaining) = self.cycles.get_mut(&cycle) else { return };
        *remaining -= 1;
        if *remaining == 0 {
            self.cycles.remove(&cycle);
            debug!(cycle, roofs = self.store.len(), "refresh cycle finished");
            self.emit(SurfaceUpdate::Redraw);
            if self.cycles.is_empty() { self.emit(SurfaceUpdate::Loading(false)) }
        }
    }

    /// One extra redraw the first time roofs arrive while a selection is waiting for them.
    fn store_changed(&mut self) {
        if !self.reconciled && !self.selection.is_empty() {
            self.reconciled = true;
            self.emit(SurfaceUpdate::Redraw);
        }
    }
}
