use geo::{coord, Coord, LineString, MultiPolygon, Polygon};

use crate::map::rhumb::sample_rhumb;

/// Corner points of a gore in WGS84 degrees.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GoreCorners {
    pub north: Coord<f64>,
    pub west: Coord<f64>,
    pub south: Coord<f64>,
    pub east: Coord<f64>,
}

impl GoreCorners {
    pub fn new(central_meridian: f64, width_deg: f64) -> Self {
        let half = width_deg / 2.0;
        Self {
            north: coord! { x: central_meridian, y: 90.0 },
            west: coord! { x: central_meridian - half, y: 0.0 },
            south: coord! { x: central_meridian, y: -90.0 },
            east: coord! { x: central_meridian + half, y: 0.0 },
        }
    }
}

/// Build the closed WGS84 boundary of one gore.
///
/// The west edge runs north to south along the west corner's meridian,
/// the east edge south to north along the east corner's meridian; each
/// edge carries `resolution` interpolated points. The ring therefore has
/// `2 * resolution + 4` vertices plus the repeated closing vertex.
pub fn gore_boundary(central_meridian: f64, width_deg: f64, resolution: usize) -> Polygon<f64> {
    let corners = GoreCorners::new(central_meridian, width_deg);

    let mut ring = sample_rhumb(
        coord! { x: corners.west.x, y: corners.north.y },
        coord! { x: corners.west.x, y: corners.south.y },
        resolution,
    );
    ring.extend(sample_rhumb(
        coord! { x: corners.east.x, y: corners.south.y },
        coord! { x: corners.east.x, y: corners.north.y },
        resolution,
    ));

    // Polygon::new closes the exterior ring
    Polygon::new(LineString::from(ring), vec![])
}

/// One panel of the globe: its boundary and the land inside it.
#[derive(Clone, Debug)]
pub struct Gore {
    pub index: usize,
    pub central_meridian: f64,
    pub width_deg: f64,
    pub boundary: Polygon<f64>,
    pub land: MultiPolygon<f64>,
}

impl Gore {
    pub fn new(
        index: usize,
        central_meridian: f64,
        width_deg: f64,
        boundary: Polygon<f64>,
        land: MultiPolygon<f64>,
    ) -> Self {
        Self {
            index,
            central_meridian,
            width_deg,
            boundary,
            land,
        }
    }

    /// Number of distinct boundary vertices (excluding the closing repeat).
    pub fn vertex_count(&self) -> usize {
        self.boundary.exterior().0.len().saturating_sub(1)
    }
}
