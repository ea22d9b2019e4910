use tracing::trace;

use crate::map::polygon::ScreenPolygon;
use crate::map::viewport::Viewport;

/// Number of extra globe copies needed (left, right) and the pixel distance
/// between copies. `None` when the centred copy already covers the canvas.
pub fn repeat_counts(viewport: &Viewport) -> Option<(usize, usize, f64)> {
    let (x_west, x_east) = viewport.seams();
    let width = viewport.width as f64;

    if x_west <= 0.0 && x_east >= width - 1.0 {
        return None;
    }

    let interval = x_east - x_west;
    if interval <= 0.0 {
        return None;
    }

    let left = if x_west > 0.0 {
        (x_west / interval).floor() as usize + 1
    } else {
        0
    };
    let right = if x_east < width {
        ((width - x_east) / interval).floor() as usize + 1
    } else {
        0
    };
    Some((left, right, interval))
}

/// Tile polygons horizontally so the periodic map fills a canvas wider than
/// one globe. Output order runs left to right: shifted copies to the west,
/// the originals, shifted copies to the east.
pub fn repeat(polygons: Vec<ScreenPolygon>, viewport: &Viewport) -> Vec<ScreenPolygon> {
    let Some((left, right, interval)) = repeat_counts(viewport) else {
        return polygons;
    };
    trace!(left, right, interval, "repeating polygons");

    let mut repeated = Vec::with_capacity(polygons.len() * (left + right + 1));
    for i in (1..=left).rev() {
        let dx = -(i as f64) * interval;
        repeated.extend(polygons.iter().map(|p| p.translated(dx)));
    }
    let east: Vec<ScreenPolygon> = (1..=right)
        .flat_map(|i| {
            let dx = i as f64 * interval;
            polygons.iter().map(move |p| p.translated(dx))
        })
        .collect();
    repeated.extend(polygons);
    repeated.extend(east);
    repeated
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;
    use crate::map::coord::GeoCoordinate;
    use crate::map::projection::Projection;
    use glam::DVec2;

    fn polygons() -> Vec<ScreenPolygon> {
        vec![
            ScreenPolygon::from_points(vec![DVec2::new(380.0, 100.0), DVec2::new(420.0, 120.0)], 0),
            ScreenPolygon::from_points(vec![DVec2::new(300.0, 200.0), DVec2::new(310.0, 220.0)], 1),
        ]
    }

    #[test]
    fn test_wide_globe_is_unchanged() {
        let vp = Viewport::new(800, 600, 4000.0, GeoCoordinate::default(), Projection::Mercator);
        assert!(repeat_counts(&vp).is_none());
        assert_eq!(repeat(polygons(), &vp), polygons());
    }

    #[test]
    fn test_narrow_globe_repeats_both_sides() {
        // globe width 2*pi*50 ~ 314px inside an 800px canvas
        let vp = Viewport::new(800, 600, 50.0, GeoCoordinate::default(), Projection::Equirectangular);
        let (left, right, interval) = repeat_counts(&vp).unwrap();
        // x_west = 400 - 157 = 243, x_east = 557
        assert_eq!(left, 1);
        assert_eq!(right, 1);
        assert!((interval - 100.0 * PI).abs() < 1e-9);

        let out = repeat(polygons(), &vp);
        assert_eq!(out.len(), 6);
        assert_eq!(out[2], polygons()[0]);
        assert_eq!(out[3], polygons()[1]);
        assert!((out[0].points()[0].x - (380.0 - interval)).abs() < 1e-9);
        assert!((out[5].points()[0].x - (300.0 + interval)).abs() < 1e-9);
    }

    #[test]
    fn test_counts_grow_when_zoomed_out() {
        // interval ~125.7px, x_west ~337.2, x_east ~462.8
        let vp = Viewport::new(800, 600, 20.0, GeoCoordinate::from_degrees(45.0, 10.0), Projection::Equirectangular);
        let (left, right, _) = repeat_counts(&vp).unwrap();
        assert_eq!((left, right), (3, 3));
        assert_eq!(repeat(polygons(), &vp).len(), 14);
    }

    #[test]
    fn test_copies_cover_canvas() {
        let vp = Viewport::new(1000, 400, 30.0, GeoCoordinate::default(), Projection::Miller);
        let (left, right, interval) = repeat_counts(&vp).unwrap();
        let (west, east) = vp.seams();
        assert!(west - left as f64 * interval <= 0.0);
        assert!(east + right as f64 * interval >= 1000.0);
    }
}
