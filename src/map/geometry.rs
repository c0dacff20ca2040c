use glam::DVec2;
use image::Rgb;

use crate::raster::RasterCanvas;

/// Walk the pixels of a line using Bresenham's algorithm
fn walk_line(x0: i32, y0: i32, x1: i32, y1: i32, mut visit: impl FnMut(i32, i32)) {
    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    let mut x = x0;
    let mut y = y0;

    loop {
        visit(x, y);

        if x == x1 && y == y1 {
            break;
        }

        let e2 = 2 * err;

        if e2 >= dy {
            if x == x1 {
                break;
            }
            err += dy;
            x += sx;
        }

        if e2 <= dx {
            if y == y1 {
                break;
            }
            err += dx;
            y += sy;
        }
    }
}

/// Draw a one-pixel line
pub fn draw_line(canvas: &mut RasterCanvas, x0: i32, y0: i32, x1: i32, y1: i32, color: Rgb<u8>) {
    walk_line(x0, y0, x1, y1, |x, y| canvas.set_pixel_signed(x, y, color));
}

/// Draw a line `width` pixels wide with a round brush.
/// Widths up to 1.5 fall back to a plain one-pixel line; 0 draws nothing.
pub fn draw_thick_line(canvas: &mut RasterCanvas, a: DVec2, b: DVec2, width: f64, color: Rgb<u8>) {
    if width <= 0.0 {
        return;
    }
    let (x0, y0) = (a.x.round() as i32, a.y.round() as i32);
    let (x1, y1) = (b.x.round() as i32, b.y.round() as i32);
    if width <= 1.5 {
        draw_line(canvas, x0, y0, x1, y1, color);
        return;
    }
    let radius = width / 2.0;
    walk_line(x0, y0, x1, y1, |x, y| draw_circle(canvas, x, y, radius, color));
}

/// Draw a filled circle
pub fn draw_circle(canvas: &mut RasterCanvas, cx: i32, cy: i32, radius: f64, color: Rgb<u8>) {
    let r = radius.ceil() as i32;
    let r2 = radius * radius;
    for dy in -r..=r {
        for dx in -r..=r {
            if (dx * dx + dy * dy) as f64 <= r2 {
                canvas.set_pixel_signed(cx + dx, cy + dy, color);
            }
        }
    }
}

/// Fill a polygon given as pixel-space rings (exterior first, then holes)
/// with the even-odd rule, sampling at pixel centres.
pub fn fill_polygon(canvas: &mut RasterCanvas, rings: &[Vec<DVec2>], color: Rgb<u8>) {
    let (min_y, max_y) = rings
        .iter()
        .flatten()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| {
            (lo.min(p.y), hi.max(p.y))
        });
    if !(min_y.is_finite() && max_y.is_finite()) {
        return;
    }

    let first_row = (min_y - 0.5).ceil().max(0.0) as i32;
    let last_row = (max_y - 0.5).floor().min(canvas.height() as f64 - 1.0) as i32;
    let mut crossings: Vec<f64> = Vec::new();

    for row in first_row..=last_row {
        let yc = row as f64 + 0.5;
        crossings.clear();

        for ring in rings {
            let n = ring.len();
            if n < 3 {
                continue;
            }
            for i in 0..n {
                let p = ring[i];
                let q = ring[(i + 1) % n];
                if (p.y <= yc && yc < q.y) || (q.y <= yc && yc < p.y) {
                    crossings.push(p.x + (yc - p.y) * (q.x - p.x) / (q.y - p.y));
                }
            }
        }

        crossings.sort_by(f64::total_cmp);
        for pair in crossings.chunks_exact(2) {
            let x0 = (pair[0] - 0.5).ceil() as i32;
            let x1 = (pair[1] - 0.5).ceil() as i32;
            canvas.fill_span(row, x0, x1, color);
        }
    }
}
