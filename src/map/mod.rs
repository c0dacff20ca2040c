mod clip;
mod geometry;
mod gore;
mod projection;
mod renderer;
mod rhumb;
mod spatial;

pub use clip::{validate_boundary, LandClipper, LandMass};
pub use gore::{gore_boundary, Gore, GoreCorners};
pub use projection::{
    from_global_projection, from_gore_projection, to_global_projection, to_gore_projection,
    wrap_lon, Extent, Sinusoidal, TileFrame, SPHERE_RADIUS_M,
};
pub use renderer::GoreRasterizer;
pub use rhumb::sample_rhumb;
