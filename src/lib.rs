//! Printable orange-peel globe gores.
//!
//! Each gore is bounded by two pole-to-pole rhumb lines, filled with the
//! land that falls inside it, drawn in its own sinusoidal projection and
//! pasted left to right into one wide image.
//!
//! Land comes from Natural Earth's 1:110m land layer in GeoJSON
//! (`ne_110m_land.geojson` in
//! <https://github.com/nvkelso/natural-earth-vector/tree/master/geojson>),
//! read from `data/ne_110m_land.json` unless `--land` points elsewhere.

pub mod config;
pub mod data;
pub mod error;
pub mod map;
pub mod pipeline;
pub mod raster;

pub use config::{CliArgs, GoreConfig};
pub use error::{GoreError, Result};
pub use pipeline::{build_gore, render_globe, run};
