use std::collections::HashMap;

use geo::Rect;

/// Spatial index for land polygons using conservative approximation.
/// Each feature's bounding box is indexed into every cell it overlaps,
/// guaranteeing no false negatives while allowing false positives
/// (eliminated by the exact clip afterwards).
#[derive(Debug)]
pub struct FeatureGrid {
    cells: HashMap<(i32, i32), Vec<usize>>,
    cell_size: f64,
}

impl FeatureGrid {
    pub fn new(cell_size: f64) -> Self {
        Self {
            cells: HashMap::new(),
            cell_size,
        }
    }

    #[inline(always)]
    fn to_cell(&self, lon: f64, lat: f64) -> (i32, i32) {
        let x = (lon / self.cell_size).floor() as i32;
        let y = (lat / self.cell_size).floor() as i32;
        (x, y)
    }

    /// Build from feature bounding boxes, one entry per feature index.
    pub fn build(bboxes: impl Iterator<Item = Rect<f64>>, cell_size: f64) -> Self {
        let mut grid = Self::new(cell_size);
        for (idx, bbox) in bboxes.enumerate() {
            let min_cell = grid.to_cell(bbox.min().x, bbox.min().y);
            let max_cell = grid.to_cell(bbox.max().x, bbox.max().y);
            for y in min_cell.1..=max_cell.1 {
                for x in min_cell.0..=max_cell.0 {
                    grid.cells.entry((x, y)).or_default().push(idx);
                }
            }
        }
        grid
    }

    /// Feature indices whose cells overlap `bounds`, sorted and deduplicated.
    pub fn query(&self, bounds: Rect<f64>) -> Vec<usize> {
        let min_cell = self.to_cell(bounds.min().x, bounds.min().y);
        let max_cell = self.to_cell(bounds.max().x, bounds.max().y);
        let mut results = Vec::new();
        for y in min_cell.1..=max_cell.1 {
            for x in min_cell.0..=max_cell.0 {
                if let Some(indices) = self.cells.get(&(x, y)) {
                    results.extend_from_slice(indices);
                }
            }
        }
        results.sort_unstable();
        results.dedup();
        results
    }
}
