use geo::{coord, Coord};
use glam::DVec2;

/// Radius of the spherical sinusoidal surface, in metres.
pub const SPHERE_RADIUS_M: f64 = 6_371_000.0;

/// Wrap a longitude into [-180, 180)
#[inline(always)]
pub fn wrap_lon(lon: f64) -> f64 {
    (lon + 180.0).rem_euclid(360.0) - 180.0
}

#[inline(always)]
fn is_pole(lat: f64) -> bool {
    lat.abs() >= 90.0
}

/// Spherical sinusoidal coordinate system centred on one meridian.
///
/// Forward maps WGS84 degrees to metres, inverse maps back.
/// Longitude is undefined at the poles; forward sends them to x = 0 and
/// inverse returns the central meridian.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sinusoidal {
    pub central_meridian: f64,
    pub radius: f64,
}

impl Sinusoidal {
    pub fn new(central_meridian: f64) -> Self {
        Self {
            central_meridian,
            radius: SPHERE_RADIUS_M,
        }
    }

    /// The fixed system with lon₀ = 0, used for framing tiles.
    pub fn global() -> Self {
        Self::new(0.0)
    }

    pub fn forward(&self, p: Coord<f64>) -> Coord<f64> {
        let y = self.radius * p.y.to_radians();
        if is_pole(p.y) {
            return coord! { x: 0.0, y: y };
        }
        let dlon = wrap_lon(p.x - self.central_meridian);
        let x = self.radius * dlon.to_radians() * p.y.to_radians().cos();
        coord! { x: x, y: y }
    }

    pub fn inverse(&self, p: Coord<f64>) -> Coord<f64> {
        let lat_rad = p.y / self.radius;
        let lat = lat_rad.to_degrees();
        let cos_lat = lat_rad.cos();
        if cos_lat.abs() < 1e-12 {
            return coord! { x: self.central_meridian, y: lat };
        }
        let dlon = (p.x / (self.radius * cos_lat)).to_degrees();
        coord! { x: wrap_lon(self.central_meridian + dlon), y: lat }
    }
}

/// WGS84 → gore-specific sinusoidal.
pub fn to_gore_projection(p: Coord<f64>, central_meridian: f64) -> Coord<f64> {
    Sinusoidal::new(central_meridian).forward(p)
}

/// Gore-specific sinusoidal → WGS84.
pub fn from_gore_projection(p: Coord<f64>, central_meridian: f64) -> Coord<f64> {
    Sinusoidal::new(central_meridian).inverse(p)
}

/// WGS84 → global sinusoidal (lon₀ = 0).
pub fn to_global_projection(p: Coord<f64>) -> Coord<f64> {
    Sinusoidal::global().forward(p)
}

/// Global sinusoidal (lon₀ = 0) → WGS84.
pub fn from_global_projection(p: Coord<f64>) -> Coord<f64> {
    Sinusoidal::global().inverse(p)
}

/// Projected rectangle (metres) a tile has to show.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Extent {
    pub min: DVec2,
    pub max: DVec2,
}

impl Extent {
    /// Extent of one gore, taken from its corner points in the global
    /// system: the poles give the height, the ±half-width equator points
    /// the width. Identical for every gore of the same width.
    pub fn for_gore_width(gore_width_deg: f64) -> Self {
        let half = gore_width_deg / 2.0;
        let north = to_global_projection(coord! { x: 0.0, y: 90.0 });
        let west = to_global_projection(coord! { x: -half, y: 0.0 });
        let south = to_global_projection(coord! { x: 0.0, y: -90.0 });
        let east = to_global_projection(coord! { x: half, y: 0.0 });
        Self {
            min: DVec2::new(west.x, south.y),
            max: DVec2::new(east.x, north.y),
        }
    }

    pub fn size(&self) -> DVec2 {
        self.max - self.min
    }
}

/// Maps projected metres onto a tile's pixel grid.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TileFrame {
    pub extent: Extent,
    /// Canvas pixel width
    pub width: u32,
    /// Canvas pixel height
    pub height: u32,
}

impl TileFrame {
    /// Fit `extent` into a `width` x `height` canvas, growing whichever
    /// side is too short so the whole extent stays visible. Returns `None`
    /// for a degenerate extent or canvas, or when the grown side would not
    /// fit in a `u32`.
    pub fn fit(extent: Extent, width: u32, height: u32) -> Option<Self> {
        let size = extent.size();
        if !(size.x > 0.0 && size.y > 0.0) || width == 0 || height == 0 {
            return None;
        }
        let extent_aspect = size.x / size.y;
        let canvas_aspect = width as f64 / height as f64;

        // The grown side must still fit in a u32
        let grow = |pixels: f64| {
            let pixels = pixels.round();
            (pixels.is_finite() && pixels <= u32::MAX as f64).then(|| (pixels as u32).max(1))
        };
        let (width, height) = if extent_aspect > canvas_aspect {
            (grow(height as f64 * extent_aspect)?, height)
        } else {
            (width, grow(width as f64 / extent_aspect)?)
        };

        Some(Self {
            extent,
            width,
            height,
        })
    }

    /// Pixels per metre along each axis.
    pub fn scale(&self) -> DVec2 {
        DVec2::new(self.width as f64, self.height as f64) / self.extent.size()
    }

    /// Project a point in metres to (fractional) pixel coordinates.
    /// y grows downwards.
    pub fn to_pixel(&self, p: Coord<f64>) -> DVec2 {
        let scale = self.scale();
        DVec2::new(
            (p.x - self.extent.min.x) * scale.x,
            (self.extent.max.y - p.y) * scale.y,
        )
    }
}
