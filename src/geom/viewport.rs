use geo::{Coord, Rect};

/// Circumference of the Web-Mercator sphere in metres.
const EQUATOR_M: f64 = 40_075_016.685_578_49;

/// Tile edge in pixels.
const TILE_PX: f64 = 256.0;

/// Ground resolution (projected units per pixel) at `zoom` in EPSG:3857.
#[inline]
pub fn resolution(zoom: f64) -> f64 { EQUATOR_M / TILE_PX / zoom.exp2() }

/// Pixel size of the map surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self { Self { width, height } }

    /// Extent visible when the surface is centered on `center` at `zoom`.
    pub fn extent_at(&self, center: Coord<f64>, zoom: f64) -> Rect<f64> {
        let res = resolution(zoom);
        let half_w = self.width as f64 * res / 2.0;
        let half_h = self.height as f64 * res / 2.0;
        Rect::new(
            Coord { x: center.x - half_w, y: center.y - half_h },
            Coord { x: center.x + half_w, y: center.y + half_h },
        )
    }
}
