use glam::DVec2;

use crate::map::bbox::{GeoBoundingBox, Pole};
use crate::map::polygon::ScreenPolygon;
use crate::map::viewport::Viewport;

/// Which pole a ring with this bounding box has to be capped at, if any.
///
/// Only rings running around the whole globe in longitude need a cap.
pub fn cap_pole(bbox: &GeoBoundingBox) -> Option<Pole> {
    if !bbox.spans_globe() {
        return None;
    }
    if bbox.contains_pole(Pole::North) {
        Some(Pole::North)
    } else if bbox.contains_pole(Pole::South) {
        Some(Pole::South)
    } else {
        None
    }
}

/// Close the last polygon of a polar ring over the top or bottom of the canvas.
///
/// Adds a vertex above/below each end of the polygon on the canvas edge and
/// repeats the first of them at the end, so the outline ends where it starts.
pub fn close_poles(polygons: &mut [ScreenPolygon], bbox: &GeoBoundingBox, viewport: &Viewport) {
    let Some(pole) = cap_pole(bbox) else {
        return;
    };
    let Some(polygon) = polygons.last_mut() else {
        return;
    };
    let (Some(first), Some(last)) = (polygon.first(), polygon.last()) else {
        return;
    };

    let y = match pole {
        Pole::North => 0.0,
        Pole::South => viewport.height as f64,
    };

    polygon.push_front(DVec2::new(first.x, y));
    polygon.push(DVec2::new(last.x, y));
    polygon.push(DVec2::new(first.x, y));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::coord::GeoCoordinate;
    use crate::map::projection::Projection;

    fn viewport() -> Viewport {
        Viewport::new(1200, 600, 200.0, GeoCoordinate::default(), Projection::Equirectangular)
    }

    fn strip() -> Vec<ScreenPolygon> {
        vec![ScreenPolygon::from_points(
            vec![DVec2::new(10.0, 50.0), DVec2::new(500.0, 60.0), DVec2::new(900.0, 55.0)],
            0,
        )]
    }

    #[test]
    fn test_north_cap() {
        let mut polygons = strip();
        let bbox = GeoBoundingBox::new(std::f64::consts::FRAC_PI_2, 1.0, std::f64::consts::PI, -std::f64::consts::PI);
        close_poles(&mut polygons, &bbox, &viewport());
        let points = polygons[0].points();
        assert_eq!(points.len(), 6);
        assert_eq!(points[0], DVec2::new(10.0, 0.0));
        assert_eq!(points[4], DVec2::new(900.0, 0.0));
        assert_eq!(points[0], points[5]);
    }

    #[test]
    fn test_south_cap_uses_canvas_bottom() {
        let mut polygons = strip();
        let bbox = GeoBoundingBox::new(-1.0, -std::f64::consts::FRAC_PI_2, std::f64::consts::PI, -std::f64::consts::PI);
        // the pole row (457) is inside the canvas, the cap still goes to the edge
        let vp = viewport().with_radius(100.0);
        close_poles(&mut polygons, &bbox, &vp);
        assert_eq!(polygons[0].first().unwrap().y, 600.0);
        assert_eq!(polygons[0].last().unwrap().y, 600.0);
    }

    #[test]
    fn test_partial_width_untouched() {
        let mut polygons = strip();
        let bbox = GeoBoundingBox::new(std::f64::consts::FRAC_PI_2, 1.0, 2.0, -2.0);
        close_poles(&mut polygons, &bbox, &viewport());
        assert_eq!(polygons, strip());
    }

    #[test]
    fn test_full_width_without_pole_untouched() {
        let mut polygons = strip();
        let bbox = GeoBoundingBox::new(0.01, -0.01, std::f64::consts::PI, -std::f64::consts::PI);
        close_poles(&mut polygons, &bbox, &viewport());
        assert_eq!(polygons, strip());
    }
}
