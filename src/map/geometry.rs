use glam::DVec2;

use crate::braille::BrailleCanvas;
use crate::map::polygon::MapShape;

/// Draw a line using Bresenham's algorithm
pub fn draw_line(canvas: &mut BrailleCanvas, x0: i64, y0: i64, x1: i64, y1: i64) {
    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    let mut x = x0;
    let mut y = y0;

    loop {
        canvas.set_pixel_signed(x, y);

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

/// Clip a segment to a rectangle (Liang-Barsky).
/// Returns the visible part, or `None` if the segment misses the rectangle.
pub fn clip_segment(a: DVec2, b: DVec2, min: DVec2, max: DVec2) -> Option<(DVec2, DVec2)> {
    let d = b - a;
    let mut t0: f64 = 0.0;
    let mut t1: f64 = 1.0;

    for (p, q) in [
        (-d.x, a.x - min.x),
        (d.x, max.x - a.x),
        (-d.y, a.y - min.y),
        (d.y, max.y - a.y),
    ] {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let r = q / p;
        if p < 0.0 {
            t0 = t0.max(r);
        } else {
            t1 = t1.min(r);
        }
        if t0 > t1 {
            return None;
        }
    }

    Some((a + d * t0, a + d * t1))
}

/// Stroke a screen polyline, clipped to the map area
pub fn draw_polyline(canvas: &mut BrailleCanvas, points: &[DVec2], shape: &MapShape) {
    let min = DVec2::new(shape.left(), shape.top());
    let max = DVec2::new(shape.right(), shape.bottom());

    for pair in points.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        if !shape.touches_segment(a, b) {
            continue;
        }
        let Some((a, b)) = clip_segment(a, b, min, max) else {
            continue;
        };
        draw_line(
            canvas,
            a.x.round() as i64,
            a.y.round() as i64,
            b.x.round() as i64,
            b.y.round() as i64,
        );
    }
}

/// Draw a point marker (small cross)
pub fn draw_marker(canvas: &mut BrailleCanvas, x: i64, y: i64, size: i64) {
    for i in -size..=size {
        canvas.set_pixel_signed(x + i, y);
        canvas.set_pixel_signed(x, y + i);
    }
}

/// Outline the top and bottom map edges when they fall inside the canvas
pub fn draw_map_frame(canvas: &mut BrailleCanvas, shape: &MapShape) {
    let height = canvas.pixel_height() as f64;
    let right = shape.right().round() as i64 - 1;
    for y in [shape.top(), shape.bottom()] {
        if y > 0.0 && y < height {
            let y = (y.round() as i64).min(canvas.pixel_height() as i64 - 1);
            draw_line(canvas, 0, y, right, y);
        }
    }
}
