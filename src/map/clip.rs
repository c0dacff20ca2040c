use geo::algorithm::line_intersection::line_intersection;
use geo::{Area, BooleanOps, BoundingRect, Line, MultiPolygon, Polygon};
use tracing::debug;

use crate::error::{GoreError, Result};
use crate::map::spatial::FeatureGrid;

/// Index cell size in degrees.
const GRID_CELL_DEG: f64 = 10.0;
/// Boundaries smaller than this (square degrees) are treated as degenerate.
const MIN_BOUNDARY_AREA: f64 = 1e-9;

/// World land polygons, loaded once and shared read-only by every gore.
#[derive(Debug)]
pub struct LandMass {
    polygons: Vec<Polygon<f64>>,
    index: FeatureGrid,
}

impl LandMass {
    pub fn new(polygons: Vec<Polygon<f64>>) -> Self {
        // Empty polygons have no bbox; drop them so indices stay aligned
        let polygons: Vec<_> = polygons
            .into_iter()
            .filter(|p| p.bounding_rect().is_some())
            .collect();
        let index = FeatureGrid::build(
            polygons.iter().filter_map(|p| p.bounding_rect()),
            GRID_CELL_DEG,
        );
        Self { polygons, index }
    }

    pub fn polygons(&self) -> &[Polygon<f64>] {
        &self.polygons
    }

    pub fn len(&self) -> usize {
        self.polygons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.polygons.is_empty()
    }
}

/// Check that a gore boundary can be clipped against.
///
/// Rejects unclosed rings, rings with fewer than four coordinates,
/// non-finite coordinates, near-zero area, and crossings between
/// non-adjacent edges.
pub fn validate_boundary(gore: usize, boundary: &Polygon<f64>) -> Result<()> {
    let invalid = |reason: String| GoreError::Geometry { gore, reason };
    let ring = boundary.exterior();

    if ring.0.len() < 4 {
        return Err(invalid(format!("boundary has only {} coordinates", ring.0.len())));
    }
    if !ring.is_closed() {
        return Err(invalid("boundary ring is not closed".to_string()));
    }
    if ring.0.iter().any(|c| !c.x.is_finite() || !c.y.is_finite()) {
        return Err(invalid("boundary has non-finite coordinates".to_string()));
    }
    let area = boundary.unsigned_area();
    if area < MIN_BOUNDARY_AREA {
        return Err(invalid(format!("boundary area {area:e} is degenerate")));
    }

    let edges: Vec<Line<f64>> = ring.lines().collect();
    let n = edges.len();
    for i in 0..n {
        for j in (i + 2)..n {
            // First and last edges share the closing vertex
            if i == 0 && j == n - 1 {
                continue;
            }
            if line_intersection(edges[i], edges[j]).is_some() {
                return Err(invalid(format!("boundary edges {i} and {j} intersect")));
            }
        }
    }
    Ok(())
}

/// Clips the shared land dataset against gore boundaries.
pub struct LandClipper<'a> {
    land: &'a LandMass,
}

impl<'a> LandClipper<'a> {
    pub fn new(land: &'a LandMass) -> Self {
        Self { land }
    }

    /// Land inside `boundary`, in WGS84. Empty (not an error) for
    /// ocean-only gores.
    pub fn clip(&self, gore: usize, boundary: &Polygon<f64>) -> Result<MultiPolygon<f64>> {
        validate_boundary(gore, boundary)?;

        let Some(bounds) = boundary.bounding_rect() else {
            return Err(GoreError::Geometry {
                gore,
                reason: "boundary has no extent".to_string(),
            });
        };

        let candidates: Vec<Polygon<f64>> = self
            .land
            .index
            .query(bounds)
            .into_iter()
            .map(|i| self.land.polygons[i].clone())
            .collect();
        debug!(gore, candidates = candidates.len(), "clipping land");

        if candidates.is_empty() {
            return Ok(MultiPolygon::new(vec![]));
        }

        let clipped = boundary.intersection(&MultiPolygon::new(candidates));
        let finite = clipped
            .iter()
            .flat_map(|p| std::iter::once(p.exterior()).chain(p.interiors()))
            .all(|ring| ring.0.iter().all(|c| c.x.is_finite() && c.y.is_finite()));
        if !finite {
            return Err(GoreError::Geometry {
                gore,
                reason: "clip produced non-finite coordinates".to_string(),
            });
        }
        Ok(clipped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::gore::gore_boundary;
    use approx::assert_relative_eq;
    use geo::LineString;

    fn square(x0: f64, y0: f64, x1: f64, y1: f64) -> Polygon<f64> {
        Polygon::new(
            LineString::from(vec![(x0, y0), (x1, y0), (x1, y1), (x0, y1), (x0, y0)]),
            vec![],
        )
    }

    fn test_land() -> LandMass {
        LandMass::new(vec![
            // Rough Africa
            square(-15.0, -35.0, 50.0, 35.0),
            // Rough South America
            square(-80.0, -55.0, -35.0, 10.0),
        ])
    }

    #[test]
    fn test_ocean_gore_is_empty() {
        let land = test_land();
        let boundary = gore_boundary(180.0, 60.0, 100);
        let clipped = LandClipper::new(&land).clip(5, &boundary).unwrap();
        assert!(clipped.0.is_empty());
    }

    #[test]
    fn test_land_sharing_a_grid_cell_but_outside_gore() {
        // West edge of the nudged last gore is 119.99°, in the same 110-120° cell
        let land = LandMass::new(vec![square(111.0, 0.0, 115.0, 10.0)]);
        let boundary = gore_boundary(149.99, 60.0, 100);
        let bounds = boundary.bounding_rect().unwrap();
        assert_eq!(land.index.query(bounds), vec![0]);

        let clipped = LandClipper::new(&land).clip(5, &boundary).unwrap();
        assert!(clipped.unsigned_area() < 1e-9);
    }

    #[test]
    fn test_clip_confines_land_to_gore() {
        let land = test_land();
        let boundary = gore_boundary(30.0, 60.0, 100);
        let clipped = LandClipper::new(&land).clip(3, &boundary).unwrap();
        assert_relative_eq!(clipped.unsigned_area(), 50.0 * 70.0, max_relative = 1e-6);
        let bounds = clipped.bounding_rect().unwrap();
        assert!(bounds.min().x >= -1e-6);
        assert!(bounds.max().x <= 50.0 + 1e-6);
    }

    #[test]
    fn test_clip_splits_across_gores() {
        let land = test_land();
        let west = LandClipper::new(&land)
            .clip(2, &gore_boundary(-30.0, 60.0, 100))
            .unwrap();
        let east = LandClipper::new(&land)
            .clip(3, &gore_boundary(30.0, 60.0, 100))
            .unwrap();
        // 15° of Africa and 25° of South America fall in the western gore
        assert_relative_eq!(west.unsigned_area(), 15.0 * 70.0 + 25.0 * 65.0, max_relative = 1e-6);
        assert_relative_eq!(east.unsigned_area(), 50.0 * 70.0, max_relative = 1e-6);
    }

    #[test]
    fn test_rejects_self_intersecting_boundary() {
        let bowtie = Polygon::new(
            LineString::from(vec![(0.0, 0.0), (10.0, 10.0), (10.0, 0.0), (0.0, 10.0)]),
            vec![],
        );
        let err = LandClipper::new(&test_land()).clip(4, &bowtie).unwrap_err();
        assert!(matches!(err, GoreError::Geometry { gore: 4, .. }));
    }

    #[test]
    fn test_rejects_degenerate_boundary() {
        let flat = Polygon::new(
            LineString::from(vec![(0.0, 0.0), (5.0, 0.0), (10.0, 0.0)]),
            vec![],
        );
        assert!(validate_boundary(1, &flat).is_err());
        assert!(validate_boundary(1, &gore_boundary(0.0, 0.0, 10)).is_err());
    }

    #[test]
    fn test_gore_boundaries_are_valid() {
        for cm in [-150.0, -90.0, -30.0, 30.0, 90.0, 149.99] {
            assert!(validate_boundary(0, &gore_boundary(cm, 60.0, 100)).is_ok());
        }
    }

    #[test]
    fn test_empty_polygons_are_dropped() {
        let land = LandMass::new(vec![Polygon::new(LineString::new(vec![]), vec![]), square(0.0, 0.0, 1.0, 1.0)]);
        assert_eq!(land.len(), 1);
    }
}
