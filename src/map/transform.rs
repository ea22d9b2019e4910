use glam::DVec2;

use crate::map::coord::{wrap_lon, GeoCoordinate};
use crate::map::polygon::MapShape;
use crate::map::viewport::Viewport;

/// A projected position.
///
/// `hidden` reports whether the globe body hides the point. It is always
/// false for cylindrical maps but kept so all projections share one shape.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
    pub hidden: bool,
}

impl ScreenPoint {
    #[inline(always)]
    pub fn to_vec2(self) -> DVec2 {
        DVec2::new(self.x, self.y)
    }
}

impl Viewport {
    /// Project a geographic coordinate to canvas pixels.
    ///
    /// Longitude is measured from the view center and wrapped into
    /// (-pi, pi], so every coordinate lands on the globe copy around the
    /// center.
    #[inline(always)]
    pub fn project(&self, coord: &GeoCoordinate) -> ScreenPoint {
        self.project_from(coord, self.center_vertical())
    }

    /// Vertical law value of the view center
    #[inline(always)]
    pub fn center_vertical(&self) -> f64 {
        self.projection.vertical(self.center.lat())
    }

    /// [`Viewport::project`] with the center's vertical law value supplied,
    /// for projecting many points in one pass
    #[inline(always)]
    pub fn project_from(&self, coord: &GeoCoordinate, center_vertical: f64) -> ScreenPoint {
        let dlon = wrap_lon(coord.lon() - self.center.lon());
        let v = self.projection.vertical(coord.lat()) - center_vertical;
        ScreenPoint {
            x: self.width as f64 / 2.0 + dlon * self.radius,
            y: self.height as f64 / 2.0 - v * self.radius,
            hidden: false,
        }
    }

    /// Project without wrapping the longitude difference
    #[inline(always)]
    pub fn project_unwrapped(&self, lon: f64, lat: f64) -> DVec2 {
        let v = self.projection.vertical(lat) - self.projection.vertical(self.center.lat());
        DVec2::new(
            self.width as f64 / 2.0 + (lon - self.center.lon()) * self.radius,
            self.height as f64 / 2.0 - v * self.radius,
        )
    }

    /// Canvas pixels back to a geographic coordinate.
    ///
    /// Returns `None` above or below the map area.
    pub fn unproject(&self, x: f64, y: f64) -> Option<GeoCoordinate> {
        let projection = self.projection;
        let v = projection.vertical(self.center.lat()) - (y - self.height as f64 / 2.0) / self.radius;
        if v.abs() > projection.vertical_limit() {
            return None;
        }
        let lon = self.center.lon() + (x - self.width as f64 / 2.0) / self.radius;
        Some(GeoCoordinate::new(lon, projection.latitude(v)))
    }

    /// Canvas rectangle covered by the map, clamped to the canvas
    pub fn map_shape(&self) -> MapShape {
        let center_lon = self.center.lon();
        let top = self.project_unwrapped(center_lon, self.projection.max_lat()).y;
        let bottom = self.project_unwrapped(center_lon, self.projection.min_lat()).y;

        let height = self.height as f64;
        let top = top.clamp(0.0, height);
        let bottom = bottom.clamp(0.0, height);

        MapShape {
            x: 0.0,
            y: top,
            width: self.width as f64,
            height: bottom - top,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::projection::Projection;
    use std::f64::consts::PI;

    fn viewport(projection: Projection) -> Viewport {
        Viewport::new(800, 600, 300.0, GeoCoordinate::from_degrees(20.0, 10.0), projection)
    }

    #[test]
    fn test_project_center() {
        let vp = viewport(Projection::Mercator);
        let p = vp.project(&vp.center);
        assert!((p.x - 400.0).abs() < 1e-9);
        assert!((p.y - 300.0).abs() < 1e-9);
        assert!(!p.hidden);
    }

    #[test]
    fn test_round_trip() {
        for projection in [Projection::Equirectangular, Projection::Mercator, Projection::Miller] {
            let vp = viewport(projection);
            for (lon, lat) in [(20.0, 10.0), (-30.0, 50.0), (60.0, -40.0), (100.0, 70.0)] {
                let c = GeoCoordinate::from_degrees(lon, lat);
                let p = vp.project(&c);
                let back = vp.unproject(p.x, p.y).unwrap();
                // sub-pixel: compare in pixels
                assert!((wrap_lon(back.lon() - c.lon()) * vp.radius).abs() < 1e-6);
                assert!((back.lat() - c.lat()).abs() * vp.radius < 1e-6);
            }
        }
    }

    #[test]
    fn test_longitude_wraps_around_center() {
        let vp = viewport(Projection::Equirectangular);
        // 200 degrees east of the center is drawn 160 degrees to the west
        let p = vp.project(&GeoCoordinate::from_degrees(-140.0, 10.0));
        let expected = 400.0 - 160.0_f64.to_radians() * 300.0;
        assert!((p.x - expected).abs() < 1e-6);
    }

    #[test]
    fn test_project_from_matches_project() {
        let vp = viewport(Projection::Miller);
        let center_vertical = vp.center_vertical();
        for (lon, lat) in [(0.0, 0.0), (-170.0, 60.0), (35.0, -80.0)] {
            let c = GeoCoordinate::from_degrees(lon, lat);
            assert_eq!(vp.project_from(&c, center_vertical), vp.project(&c));
        }
    }

    #[test]
    fn test_pole_is_finite_in_mercator() {
        let vp = viewport(Projection::Mercator);
        let p = vp.project(&GeoCoordinate::new(0.0, PI / 2.0));
        assert!(p.y.is_finite());
    }

    #[test]
    fn test_unproject_outside_map() {
        let vp = Viewport::new(800, 600, 50.0, GeoCoordinate::default(), Projection::Mercator);
        assert!(vp.unproject(400.0, 0.0).is_none());
        assert!(vp.unproject(400.0, 300.0).is_some());
    }

    #[test]
    fn test_map_shape_clamped() {
        let vp = Viewport::new(800, 600, 4000.0, GeoCoordinate::default(), Projection::Mercator);
        let shape = vp.map_shape();
        assert_eq!(shape.top(), 0.0);
        assert_eq!(shape.bottom(), 600.0);
        assert_eq!(shape.width, 800.0);
    }

    #[test]
    fn test_map_shape_zoomed_out() {
        let vp = Viewport::new(800, 600, 50.0, GeoCoordinate::default(), Projection::Equirectangular);
        let shape = vp.map_shape();
        assert!((shape.top() - (300.0 - 50.0 * PI / 2.0)).abs() < 1e-9);
        assert!((shape.bottom() - (300.0 + 50.0 * PI / 2.0)).abs() < 1e-9);
    }
}
