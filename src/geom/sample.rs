use geo::{Coord, Rect};

/// Build an extent from `(min_x, min_y, max_x, max_y)` in projected units.
#[inline]
pub fn extent(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Rect<f64> {
    Rect::new(Coord { x: min_x, y: min_y }, Coord { x: max_x, y: max_y })
}

/// Centers of a `grid_size × grid_size` subdivision of `extent`.
/// Outer loop walks columns (x), inner loop walks rows (y).
/// A zero-width or zero-height extent yields coincident points.
pub fn sample_points(extent: &Rect<f64>, grid_size: usize) -> Vec<Coord<f64>> {
    let (min, width, height) = (extent.min(), extent.width(), extent.height());
    let n = grid_size as f64;

    let mut points = Vec::with_capacity(grid_size * grid_size);
    for i in 0..grid_size {
        for j in 0..grid_size {
            points.push(Coord {
                x: min.x + width * (i as f64 + 0.5) / n,
                y: min.y + height * (j as f64 + 0.5) / n,
            });
        }
    }
    points
}

/// Fixed 13-point fan around `center`: the center, its 8 neighbours at one `step`,
/// and the 4 orthogonal neighbours at two steps.
pub fn fallback_fan(center: Coord<f64>, step: f64) -> [Coord<f64>; 13] {
    let at = |dx: f64, dy: f64| Coord { x: center.x + dx * step, y: center.y + dy * step };
    [
        at(0.0, 0.0),
        at(1.0, 0.0), at(-1.0, 0.0), at(0.0, 1.0), at(0.0, -1.0),
        at(1.0, 1.0), at(-1.0, 1.0), at(1.0, -1.0), at(-1.0, -1.0),
        at(2.0, 0.0), at(-2.0, 0.0), at(0.0, 2.0), at(0.0, -2.0),
    ]
}

/// The area one refresh cycle should cover.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SampleArea {
    /// A visible extent, sampled on a grid.
    Extent(Rect<f64>),
    /// A bare point with no extent available, sampled with the fallback fan.
    Around(Coord<f64>),
}

impl SampleArea {
    pub fn points(&self, grid_size: usize, step: f64) -> Vec<Coord<f64>> {
        match self {
            SampleArea::Extent(rect) => sample_points(rect, grid_size),
            SampleArea::Around(center) => fallback_fan(*center, step).to_vec(),
        }
    }
}
