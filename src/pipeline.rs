use rayon::prelude::*;
use tracing::{debug, info};

use crate::config::GoreConfig;
use crate::data::load_land;
use crate::error::Result;
use crate::map::{gore_boundary, Gore, GoreRasterizer, LandClipper, LandMass};
use crate::raster::{GlobeCompositor, GlobeImage, RasterTile};

/// Build gore `index`: boundary, then the land clipped to it.
pub fn build_gore(config: &GoreConfig, land: &LandMass, index: usize) -> Result<Gore> {
    let cm = config.central_meridian(index);
    let width = config.gore_width_deg as f64;
    let boundary = gore_boundary(cm, width, config.rhumb_points);
    let clipped = LandClipper::new(land).clip(index, &boundary)?;
    debug!(gore = index, central_meridian = cm, land_parts = clipped.0.len(), "gore built");
    Ok(Gore::new(index, cm, width, boundary, clipped))
}

fn render_tile(
    config: &GoreConfig,
    land: &LandMass,
    rasterizer: &GoreRasterizer,
    index: usize,
) -> Result<RasterTile> {
    let gore = build_gore(config, land, index)?;
    let tile = rasterizer.render(&gore)?;
    info!(gore = index, central_meridian = gore.central_meridian, "gore rendered");
    Ok(tile)
}

/// Render every gore and composite them west to east.
///
/// With `parallel` set, gores are rendered on the rayon pool and
/// composited by index once all have finished.
pub fn render_globe(config: &GoreConfig, land: &LandMass) -> Result<GlobeImage> {
    config.validate()?;

    let rasterizer = GoreRasterizer::new(
        config.gore_width_deg as f64,
        config.gore_pixel_width,
        config.outline_stroke_width,
    )?;
    let frame = rasterizer.frame();
    let count = config.gore_count();
    info!(gores = count, tile_width = frame.width, tile_height = frame.height, "rendering globe");

    let mut compositor = GlobeCompositor::new(frame.width, frame.height, count)?;
    if config.parallel {
        let tiles = (0..count)
            .into_par_iter()
            .map(|i| render_tile(config, land, &rasterizer, i))
            .collect::<Result<Vec<_>>>()?;
        for tile in &tiles {
            compositor.place(tile)?;
        }
    } else {
        for i in 0..count {
            let tile = render_tile(config, land, &rasterizer, i)?;
            compositor.place(&tile)?;
        }
    }
    Ok(compositor.finish())
}

/// Validate, load the land dataset, render, and write the globe.
pub fn run(config: &GoreConfig) -> Result<()> {
    config.validate()?;
    let land = load_land(&config.land_path)?;
    let globe = render_globe(config, &land)?;
    globe.save(&config.output_path)
}
