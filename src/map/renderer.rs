use geo::{coord, Coord, LineString};
use glam::DVec2;
use image::Rgb;

use crate::error::{GoreError, Result};
use crate::map::geometry::{draw_thick_line, fill_polygon};
use crate::map::gore::Gore;
use crate::map::projection::{Extent, Sinusoidal, TileFrame};
use crate::raster::{RasterCanvas, RasterTile};

pub const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);
pub const LAND: Rgb<u8> = Rgb([0, 0, 0]);
pub const OUTLINE: Rgb<u8> = Rgb([0, 0, 0]);

/// Longest edge (degrees) projected as a straight pixel segment.
const DENSIFY_STEP_DEG: f64 = 1.0;

/// Subdivide the segment a→b into steps of at most `DENSIFY_STEP_DEG`
/// and call a visitor for each subdivision point, b included.
#[inline]
fn walk_segment(a: Coord<f64>, b: Coord<f64>, mut visitor: impl FnMut(Coord<f64>)) {
    let span = (b.x - a.x).abs().max((b.y - a.y).abs());
    let steps = ((span / DENSIFY_STEP_DEG).ceil() as usize).max(1);
    for i in 1..=steps {
        let t = i as f64 / steps as f64;
        visitor(coord! { x: a.x + (b.x - a.x) * t, y: a.y + (b.y - a.y) * t });
    }
}

/// Renders gores into equally sized tiles.
///
/// The frame is fixed at construction from the gore width alone, so every
/// tile of a run has the same height.
pub struct GoreRasterizer {
    frame: TileFrame,
    stroke_width: f64,
}

impl GoreRasterizer {
    pub fn new(gore_width_deg: f64, pixel_width: u32, stroke_width: f64) -> Result<Self> {
        let extent = Extent::for_gore_width(gore_width_deg);
        let frame = TileFrame::fit(extent, pixel_width, pixel_width).ok_or_else(|| {
            GoreError::Frame {
                reason: format!(
                    "{gore_width_deg}° gore at {pixel_width}px is degenerate or too tall to rasterize"
                ),
            }
        })?;
        Ok(Self {
            frame,
            stroke_width,
        })
    }

    pub fn frame(&self) -> &TileFrame {
        &self.frame
    }

    /// Project a WGS84 ring into tile pixels through the gore's own
    /// sinusoidal system.
    fn project_ring(&self, projection: &Sinusoidal, ring: &LineString<f64>) -> Vec<DVec2> {
        let mut pixels = Vec::with_capacity(ring.0.len());
        let mut to_pixel = |c: Coord<f64>| pixels.push(self.frame.to_pixel(projection.forward(c)));

        if let Some(&first) = ring.0.first() {
            to_pixel(first);
        }
        for pair in ring.0.windows(2) {
            walk_segment(pair[0], pair[1], &mut to_pixel);
        }
        pixels
    }

    /// Background, then land fill, then boundary outline on top.
    pub fn render(&self, gore: &Gore) -> Result<RasterTile> {
        let projection = Sinusoidal::new(gore.central_meridian);
        let mut canvas = RasterCanvas::new(self.frame.width, self.frame.height, BACKGROUND);

        for polygon in &gore.land {
            let rings: Vec<Vec<DVec2>> = std::iter::once(polygon.exterior())
                .chain(polygon.interiors())
                .map(|ring| self.project_ring(&projection, ring))
                .collect();
            if rings.iter().flatten().any(|p| !p.is_finite()) {
                return Err(GoreError::Render {
                    gore: gore.index,
                    reason: "land projected to non-finite pixels".to_string(),
                });
            }
            fill_polygon(&mut canvas, &rings, LAND);
        }

        if self.stroke_width > 0.0 {
            let outline = self.project_ring(&projection, gore.boundary.exterior());
            if outline.iter().any(|p| !p.is_finite()) {
                return Err(GoreError::Render {
                    gore: gore.index,
                    reason: "boundary projected to non-finite pixels".to_string(),
                });
            }
            for pair in outline.windows(2) {
                draw_thick_line(&mut canvas, pair[0], pair[1], self.stroke_width, OUTLINE);
            }
        }

        Ok(RasterTile {
            index: gore.index,
            image: canvas.into_image(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::gore::gore_boundary;
    use geo::{MultiPolygon, Polygon};

    fn gore_with_land(cm: f64, land: Vec<Polygon<f64>>) -> Gore {
        Gore::new(0, cm, 60.0, gore_boundary(cm, 60.0, 100), MultiPolygon::new(land))
    }

    fn square(x0: f64, y0: f64, x1: f64, y1: f64) -> Polygon<f64> {
        Polygon::new(
            LineString::from(vec![(x0, y0), (x1, y0), (x1, y1), (x0, y1), (x0, y0)]),
            vec![],
        )
    }

    #[test]
    fn test_tile_size_is_shared() {
        let rasterizer = GoreRasterizer::new(60.0, 100, 2.0).unwrap();
        let a = rasterizer.render(&gore_with_land(-150.0, vec![])).unwrap();
        let b = rasterizer.render(&gore_with_land(90.0, vec![square(70.0, 0.0, 100.0, 30.0)])).unwrap();
        assert_eq!((a.width(), a.height()), (100, 300));
        assert_eq!((b.width(), b.height()), (100, 300));
    }

    #[test]
    fn test_land_is_filled_at_centre() {
        let rasterizer = GoreRasterizer::new(60.0, 100, 0.0).unwrap();
        let tile = rasterizer
            .render(&gore_with_land(30.0, vec![square(20.0, -10.0, 40.0, 10.0)]))
            .unwrap();
        assert_eq!(*tile.image.get_pixel(50, 150), LAND);
        assert_eq!(*tile.image.get_pixel(50, 20), BACKGROUND);
    }

    #[test]
    fn test_outline_is_a_lens() {
        let rasterizer = GoreRasterizer::new(60.0, 100, 2.0).unwrap();
        let tile = rasterizer.render(&gore_with_land(-90.0, vec![])).unwrap();
        // Equator row: outline touches both edges, centre stays empty
        assert_eq!(*tile.image.get_pixel(0, 150), OUTLINE);
        assert_eq!(*tile.image.get_pixel(99, 150), OUTLINE);
        assert_eq!(*tile.image.get_pixel(50, 150), BACKGROUND);
        // Near the pole the lens has pinched in, so the corners are empty
        assert_eq!(*tile.image.get_pixel(0, 10), BACKGROUND);
        assert_eq!(*tile.image.get_pixel(99, 10), BACKGROUND);
    }

    #[test]
    fn test_no_stroke_leaves_blank_ocean_gore() {
        let rasterizer = GoreRasterizer::new(60.0, 100, 0.0).unwrap();
        let tile = rasterizer.render(&gore_with_land(180.0, vec![])).unwrap();
        assert!(tile.image.pixels().all(|p| *p == BACKGROUND));
    }

    #[test]
    fn test_walk_segment_densifies() {
        let mut points = Vec::new();
        walk_segment(coord! { x: 0.0, y: 90.0 }, coord! { x: 0.0, y: 85.5 }, |c| points.push(c));
        assert_eq!(points.len(), 5);
        assert_eq!(points[4], coord! { x: 0.0, y: 85.5 });
    }
}
