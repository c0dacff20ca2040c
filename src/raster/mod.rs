mod canvas;
mod compositor;

pub use canvas::RasterCanvas;
pub use compositor::{GlobeCompositor, GlobeImage, RasterTile};
