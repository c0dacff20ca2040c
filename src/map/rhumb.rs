use geo::{coord, Coord};
use glam::DVec2;

use crate::map::projection::wrap_lon;

/// First eccentricity of the WGS84 ellipsoid.
const WGS84_E: f64 = 0.081_819_190_842_622;

const FLAT_EPS_DEG: f64 = 1e-12;

#[inline(always)]
fn is_pole(lat: f64) -> bool {
    lat.abs() >= 90.0 - FLAT_EPS_DEG
}

/// Fold a longitude back into range only once it has left it, so points
/// at exactly ±180° keep their sign.
#[inline(always)]
fn normalize_lon(lon: f64) -> f64 {
    if lon.abs() > 180.0 {
        wrap_lon(lon)
    } else {
        lon
    }
}

/// Isometric latitude ψ on the WGS84 ellipsoid. Infinite at the poles.
#[inline]
fn isometric_latitude(lat: f64) -> f64 {
    let s = lat.to_radians().sin();
    s.atanh() - WGS84_E * (WGS84_E * s).atanh()
}

/// Sample a rhumb line (constant bearing) from `start` to `end`.
///
/// Returns `n + 2` points: `start`, `n` interpolated points, `end`.
/// Latitude is spaced evenly; longitude follows the constant-bearing
/// relation λ − λ₀ ∝ ψ − ψ₀ and takes the short way round. Longitudes
/// stay as given unless the path crosses the antimeridian, in which case
/// points past ±180° are folded back.
///
/// Degenerate inputs never fail:
/// - start == end repeats the start point
/// - a polar endpoint has no defined bearing, so the path falls back to the
///   meridian of the non-polar endpoint (or of `start` if both are poles)
pub fn sample_rhumb(start: Coord<f64>, end: Coord<f64>, n: usize) -> Vec<Coord<f64>> {
    let mut points = Vec::with_capacity(n + 2);
    points.push(start);

    let a = DVec2::new(start.x, start.y);
    let b = DVec2::new(start.x + wrap_lon(end.x - start.x), end.y);
    let delta = b - a;
    let crosses_antimeridian = (b.x - end.x).abs() > FLAT_EPS_DEG;
    let steps = (n + 1) as f64;

    let polar = is_pole(start.y) || is_pole(end.y);
    let meridian_lon = if is_pole(start.y) && !is_pole(end.y) {
        end.x
    } else {
        start.x
    };
    let psi_start = isometric_latitude(start.y);
    let psi_end = isometric_latitude(end.y);

    for i in 1..=n {
        let t = i as f64 / steps;
        let p = a.lerp(b, t);

        let lon = if polar {
            meridian_lon
        } else if delta.y.abs() < FLAT_EPS_DEG {
            // Due east/west: the rhumb is the parallel itself
            p.x
        } else {
            let k = (isometric_latitude(p.y) - psi_start) / (psi_end - psi_start);
            a.x + delta.x * k
        };

        let lon = if crosses_antimeridian {
            normalize_lon(lon)
        } else {
            lon
        };
        points.push(coord! { x: lon, y: p.y });
    }

    points.push(end);
    points
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_point_count_and_endpoints() {
        let start = coord! { x: -10.0, y: 20.0 };
        let end = coord! { x: 35.0, y: -40.0 };
        for n in [1, 2, 10, 100] {
            let line = sample_rhumb(start, end, n);
            assert_eq!(line.len(), n + 2);
            assert_eq!(line[0], start);
            assert_eq!(line[n + 1], end);
        }
    }

    #[test]
    fn test_pole_to_pole_is_meridian() {
        let line = sample_rhumb(coord! { x: -30.0, y: 90.0 }, coord! { x: -30.0, y: -90.0 }, 100);
        assert_eq!(line.len(), 102);
        for p in &line {
            assert_relative_eq!(p.x, -30.0);
        }
        // Latitude strictly decreasing, evenly spaced
        for w in line.windows(2) {
            assert_relative_eq!(w[0].y - w[1].y, 180.0 / 101.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_polar_start_follows_end_meridian() {
        let line = sample_rhumb(coord! { x: 0.0, y: 90.0 }, coord! { x: 45.0, y: 0.0 }, 5);
        for p in &line[1..] {
            assert_relative_eq!(p.x, 45.0);
        }
    }

    #[test]
    fn test_degenerate_same_point() {
        let p = coord! { x: 12.5, y: -7.0 };
        let line = sample_rhumb(p, p, 4);
        assert_eq!(line.len(), 6);
        for q in &line {
            assert_relative_eq!(q.x, p.x);
            assert_relative_eq!(q.y, p.y);
        }
    }

    #[test]
    fn test_parallel_is_linear_in_longitude() {
        let line = sample_rhumb(coord! { x: 0.0, y: 45.0 }, coord! { x: 30.0, y: 45.0 }, 2);
        assert_relative_eq!(line[1].x, 10.0, epsilon = 1e-9);
        assert_relative_eq!(line[2].x, 20.0, epsilon = 1e-9);
        assert_relative_eq!(line[1].y, 45.0);
    }

    #[test]
    fn test_constant_bearing_is_straight_in_mercator() {
        let start = coord! { x: 10.0, y: -20.0 };
        let end = coord! { x: 50.0, y: 60.0 };
        let line = sample_rhumb(start, end, 20);
        let psi0 = isometric_latitude(start.y);
        let slope = (end.x - start.x) / (isometric_latitude(end.y) - psi0);
        for p in &line {
            assert_relative_eq!(p.x - start.x, slope * (isometric_latitude(p.y) - psi0), epsilon = 1e-9);
        }
    }

    #[test]
    fn test_short_way_across_antimeridian() {
        let line = sample_rhumb(coord! { x: 170.0, y: 0.0 }, coord! { x: -170.0, y: 0.0 }, 3);
        assert_relative_eq!(line[1].x, 175.0, epsilon = 1e-9);
        assert_relative_eq!(line[2].x, 180.0, epsilon = 1e-9);
        assert_relative_eq!(line[3].x, -175.0, epsilon = 1e-9);
    }

    #[test]
    fn test_out_of_range_meridian_is_kept() {
        let line = sample_rhumb(coord! { x: 210.0, y: -90.0 }, coord! { x: 210.0, y: 90.0 }, 4);
        for p in &line {
            assert_relative_eq!(p.x, 210.0);
        }
    }

    #[test]
    fn test_antimeridian_meridian_keeps_sign() {
        let line = sample_rhumb(coord! { x: 180.0, y: -90.0 }, coord! { x: 180.0, y: 90.0 }, 4);
        for p in &line {
            assert_relative_eq!(p.x, 180.0);
        }
    }
}
