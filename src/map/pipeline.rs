use glam::DVec2;
use tracing::trace;

use crate::map::coord::GeoCoordinate;
use crate::map::line_string::GeoLineString;
use crate::map::pole::close_poles;
use crate::map::polygon::ScreenPolygon;
use crate::map::repeat::{repeat, repeat_counts};
use crate::map::tessellate::tessellate;
use crate::map::viewport::Viewport;

/// Full projection of one line string: tessellation, pole closing for rings,
/// then horizontal repetition.
pub fn project_line_string(line: &GeoLineString, viewport: &Viewport) -> Vec<ScreenPolygon> {
    let mut polygons = tessellate(line, viewport);
    if polygons.is_empty() {
        return polygons;
    }
    if line.is_closed() {
        close_poles(&mut polygons, line.bounding_box(), viewport);
    }
    let polygons = repeat(polygons, viewport);
    trace!(nodes = line.len(), polygons = polygons.len(), "projected line string");
    polygons
}

/// Every on-canvas repetition of a single point
pub fn project_point(coord: &GeoCoordinate, viewport: &Viewport) -> Vec<DVec2> {
    let point = viewport.project(coord);
    let height = viewport.height as f64;
    if point.y < 0.0 || point.y >= height {
        return Vec::new();
    }

    let width = viewport.width as f64;
    let Some((left, right, interval)) = repeat_counts(viewport) else {
        return if point.x >= 0.0 && point.x < width {
            vec![point.to_vec2()]
        } else {
            Vec::new()
        };
    };

    (-(left as i64)..=right as i64)
        .map(|i| DVec2::new(point.x + i as f64 * interval, point.y))
        .filter(|p| p.x >= 0.0 && p.x < width)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::projection::Projection;

    #[test]
    fn test_dateline_invariant() {
        let vp = Viewport::new(800, 600, 800.0, GeoCoordinate::default(), Projection::Mercator);
        let line = GeoLineString::from_degrees(&[(179.0, 30.0), (-179.0, 30.0)], false);
        let polygons = project_line_string(&line, &vp);
        assert!(polygons.len() >= 2);
        for polygon in &polygons {
            assert!(polygon.x_span() <= vp.width as f64);
        }
    }

    #[test]
    fn test_pole_closure() {
        let vp = Viewport::new(1200, 600, 200.0, GeoCoordinate::default(), Projection::Equirectangular);
        let coords = (0..12)
            .map(|k| GeoCoordinate::from_degrees(k as f64 * 30.0, 80.0))
            .collect();
        let ring = GeoLineString::ring(coords);
        let polygons = project_line_string(&ring, &vp);

        // crossing the seam once: the two pieces are joined into one cap
        assert_eq!(polygons.len(), 1);
        let points = polygons[0].points();
        let top = points.iter().map(|p| p.y).fold(f64::INFINITY, f64::min);
        assert_eq!(top, 0.0);
        assert_eq!(points.first(), points.last());

        let (west, east) = vp.seams();
        assert_eq!(points[0].x, west);
        assert!(points.iter().any(|p| p.x == east));
    }

    #[test]
    fn test_south_pole_closure_at_canvas_bottom() {
        let vp = Viewport::new(1200, 700, 200.0, GeoCoordinate::default(), Projection::Equirectangular);
        let coords = (0..12)
            .rev()
            .map(|k| GeoCoordinate::from_degrees(k as f64 * 30.0 + 15.0, -75.0))
            .collect();
        let polygons = project_line_string(&GeoLineString::ring(coords), &vp);
        assert_eq!(polygons.len(), 1);
        let bottom = polygons[0].points().iter().map(|p| p.y).fold(f64::NEG_INFINITY, f64::max);
        assert_eq!(bottom, 700.0);
        assert_eq!(polygons[0].first(), polygons[0].last());
    }

    #[test]
    fn test_pole_closure_in_world_view() {
        // the pole row lies inside the canvas here
        let vp = Viewport::world(800, 600, Projection::Equirectangular);
        assert!(vp.map_shape().top() > 0.0);

        let coords = (0..12)
            .map(|k| GeoCoordinate::from_degrees(k as f64 * 30.0, 80.0))
            .collect();
        let polygons = project_line_string(&GeoLineString::ring(coords), &vp);
        assert_eq!(polygons.len(), 1);
        assert_eq!(polygons[0].mirror(), 0);

        let points = polygons[0].points();
        let top = points.iter().map(|p| p.y).fold(f64::INFINITY, f64::min);
        assert_eq!(top, 0.0);
        assert_eq!(points.first(), points.last());
    }

    #[test]
    fn test_repeat_idempotent_when_globe_covers_view() {
        let vp = Viewport::new(800, 600, 4000.0, GeoCoordinate::default(), Projection::Mercator);
        let line = GeoLineString::from_degrees(&[(-1.0, 0.5), (1.0, -0.5)], false);
        let tessellated = tessellate(&line, &vp);
        assert_eq!(repeat(tessellated.clone(), &vp), tessellated);
        assert_eq!(project_line_string(&line, &vp), tessellated);
    }

    #[test]
    fn test_culling() {
        let vp = Viewport::new(800, 600, 100.0, GeoCoordinate::default(), Projection::Mercator);
        let line = GeoLineString::open(vec![
            GeoCoordinate::new(0.1, 0.1),
            GeoCoordinate::new(0.1 + 2e-3, 0.1 + 2e-3),
        ]);
        assert!(project_line_string(&line, &vp).is_empty());
    }

    #[test]
    fn test_equatorial_band_covers_view() {
        let vp = Viewport::new(800, 600, 4000.0, GeoCoordinate::default(), Projection::Mercator);
        let lat = 0.01_f64.to_degrees();
        let north: Vec<(f64, f64)> = (-4..=4)
            .map(|k| ((k as f64 * 45.0).clamp(-179.99, 179.99), lat))
            .collect();
        let south: Vec<(f64, f64)> = north.iter().rev().map(|&(lon, lat)| (lon, -lat)).collect();
        let ring = GeoLineString::from_degrees(&[north, south].concat(), true);

        assert!(!ring.bounding_box().contains_pole(crate::map::bbox::Pole::North));
        assert!(repeat_counts(&vp).is_none());

        let (west, east) = vp.seams();
        assert!(west <= 0.0 && east >= 799.0);

        let polygons = project_line_string(&ring, &vp);
        assert_eq!(polygons.len(), 1);
        let (min, max) = polygons[0].bounds().unwrap();
        assert!(min.x <= 0.0);
        assert!(max.x >= 800.0);
        // no pole cap: nothing was pushed to the canvas edge rows
        assert!(polygons[0].points().iter().all(|p| p.y > 0.0 && p.y < 600.0));
    }

    #[test]
    fn test_two_point_dateline_scenario() {
        let vp = Viewport::new(800, 600, 1000.0, GeoCoordinate::default(), Projection::Mercator);
        let line = GeoLineString::from_degrees(&[(170.0, 10.0), (-170.0, 10.0)], false);
        assert!(vp.resolves_box(line.bounding_box()));
        let polygons = project_line_string(&line, &vp);
        assert_eq!(polygons.len(), 2);
        assert_eq!(polygons[1].mirror() - polygons[0].mirror(), 1);
    }

    #[test]
    fn test_project_point_repeats() {
        let vp = Viewport::new(800, 600, 50.0, GeoCoordinate::default(), Projection::Equirectangular);
        let points = project_point(&GeoCoordinate::from_degrees(10.0, 0.0), &vp);
        assert_eq!(points.len(), 3);
        assert!(points.windows(2).all(|w| (w[1].x - w[0].x - vp.globe_width()).abs() < 1e-9));
    }

    #[test]
    fn test_project_point_off_canvas() {
        let vp = Viewport::new(800, 600, 4000.0, GeoCoordinate::default(), Projection::Mercator);
        assert!(project_point(&GeoCoordinate::from_degrees(90.0, 0.0), &vp).is_empty());
        assert_eq!(project_point(&GeoCoordinate::default(), &vp), vec![DVec2::new(400.0, 300.0)]);
    }
}
