use std::f64::consts::{FRAC_PI_2, PI, TAU};

use crate::map::coord::{wrap_lon, GeoCoordinate};

/// Latitude tolerance for treating a box edge as a pole
const POLE_EPSILON: f64 = 1e-10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pole {
    North,
    South,
}

/// Geographic bounding box in radians.
///
/// `west > east` means the box crosses the antimeridian.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GeoBoundingBox {
    pub north: f64,
    pub south: f64,
    pub east: f64,
    pub west: f64,
}

impl GeoBoundingBox {
    pub fn new(north: f64, south: f64, east: f64, west: f64) -> Self {
        Self {
            north,
            south,
            east,
            west,
        }
    }

    /// The whole globe
    pub fn world() -> Self {
        Self::new(FRAC_PI_2, -FRAC_PI_2, PI, -PI)
    }

    /// Longitudinal extent, accounting for antimeridian wraparound
    pub fn width(&self) -> f64 {
        if self.crosses_date_line() {
            TAU - (self.west - self.east)
        } else {
            self.east - self.west
        }
    }

    pub fn height(&self) -> f64 {
        self.north - self.south
    }

    pub fn crosses_date_line(&self) -> bool {
        self.west > self.east
    }

    /// True when the box covers every longitude
    pub fn spans_globe(&self) -> bool {
        self.width() >= TAU - POLE_EPSILON
    }

    pub fn contains_pole(&self, pole: Pole) -> bool {
        match pole {
            Pole::North => self.north >= FRAC_PI_2 - POLE_EPSILON,
            Pole::South => self.south <= -FRAC_PI_2 + POLE_EPSILON,
        }
    }

    pub fn contains(&self, coord: &GeoCoordinate) -> bool {
        if coord.lat() > self.north || coord.lat() < self.south {
            return false;
        }
        if self.spans_globe() {
            return true;
        }
        let lon = coord.lon();
        if self.crosses_date_line() {
            lon >= self.west || lon <= self.east
        } else {
            lon >= self.west && lon <= self.east
        }
    }

    pub fn center(&self) -> GeoCoordinate {
        let lat = (self.north + self.south) / 2.0;
        GeoCoordinate::new(self.west + self.width() / 2.0, lat)
    }

    /// Bounding box of a path.
    ///
    /// Longitudes are unwrapped along the path, each step taken the short way
    /// round, so a path hopping over the antimeridian yields a narrow box with
    /// `west > east` instead of one spanning the globe. A closed ring whose
    /// unwrapped longitude advances by a full turn encircles a pole; it gets
    /// full width and is extended to the pole of the hemisphere it mostly lies in.
    pub fn from_coordinates(coords: &[GeoCoordinate], closed: bool) -> Option<Self> {
        let first = coords.first()?;

        let mut north = first.lat();
        let mut south = first.lat();
        let mut unwrapped = first.lon();
        let mut min_lon = unwrapped;
        let mut max_lon = unwrapped;
        let mut previous = first.lon();

        let closing = closed.then_some(first);
        for coord in coords[1..].iter().chain(closing) {
            unwrapped += wrap_lon(coord.lon() - previous);
            previous = coord.lon();

            min_lon = min_lon.min(unwrapped);
            max_lon = max_lon.max(unwrapped);
            north = north.max(coord.lat());
            south = south.min(coord.lat());
        }

        let winding = unwrapped - first.lon();
        if closed && winding.abs() > PI {
            if north + south >= 0.0 {
                north = FRAC_PI_2;
            } else {
                south = -FRAC_PI_2;
            }
            return Some(Self::new(north, south, PI, -PI));
        }

        if max_lon - min_lon >= TAU {
            return Some(Self::new(north, south, PI, -PI));
        }

        Some(Self::new(north, south, wrap_lon(max_lon), wrap_lon(min_lon)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn deg(lon: f64, lat: f64) -> GeoCoordinate {
        GeoCoordinate::from_degrees(lon, lat)
    }

    #[test]
    fn test_width_plain() {
        let bbox = GeoBoundingBox::new(0.5, -0.5, 1.0, -1.0);
        assert!((bbox.width() - 2.0).abs() < 1e-12);
        assert!(!bbox.crosses_date_line());
    }

    #[test]
    fn test_width_across_date_line() {
        let bbox = GeoBoundingBox::new(0.5, -0.5, -3.0, 3.0);
        assert!(bbox.crosses_date_line());
        assert!((bbox.width() - (TAU - 6.0)).abs() < 1e-12);
    }

    #[test]
    fn test_world_spans_globe() {
        let world = GeoBoundingBox::world();
        assert_eq!(world.width(), TAU);
        assert!(world.spans_globe());
        assert!(world.contains_pole(Pole::North));
        assert!(world.contains_pole(Pole::South));
    }

    #[test]
    fn test_from_line_across_date_line() {
        let bbox = GeoBoundingBox::from_coordinates(&[deg(170.0, 10.0), deg(-170.0, 12.0)], false)
            .unwrap();
        assert!(bbox.crosses_date_line());
        assert!((bbox.width().to_degrees() - 20.0).abs() < 1e-9);
        assert!((bbox.west.to_degrees() - 170.0).abs() < 1e-9);
        assert!((bbox.east.to_degrees() - -170.0).abs() < 1e-9);
        assert!(bbox.contains(&deg(179.0, 11.0)));
        assert!(!bbox.contains(&deg(0.0, 11.0)));
    }

    #[test]
    fn test_polar_ring_contains_north_pole() {
        let ring: Vec<_> = (0..12).map(|k| deg(k as f64 * 30.0, 80.0)).collect();
        let bbox = GeoBoundingBox::from_coordinates(&ring, true).unwrap();
        assert_eq!(bbox.width(), TAU);
        assert!(bbox.contains_pole(Pole::North));
        assert!(!bbox.contains_pole(Pole::South));
        assert!((bbox.south.to_degrees() - 80.0).abs() < 1e-9);
    }

    #[test]
    fn test_polar_ring_contains_south_pole() {
        let ring: Vec<_> = (0..12).rev().map(|k| deg(k as f64 * 30.0, -70.0)).collect();
        let bbox = GeoBoundingBox::from_coordinates(&ring, true).unwrap();
        assert!(bbox.spans_globe());
        assert!(bbox.contains_pole(Pole::South));
        assert!(!bbox.contains_pole(Pole::North));
    }

    #[test]
    fn test_open_polar_path_is_not_a_cap() {
        let path: Vec<_> = (0..12).map(|k| deg(k as f64 * 30.0, 80.0)).collect();
        let bbox = GeoBoundingBox::from_coordinates(&path, false).unwrap();
        assert!(!bbox.spans_globe());
        assert!(!bbox.contains_pole(Pole::North));
    }

    #[test]
    fn test_center_across_date_line() {
        let bbox = GeoBoundingBox::new(0.2, 0.0, -3.0, 3.0);
        let center = bbox.center();
        assert!((center.lon().abs() - PI).abs() < 1e-9);
        assert!((center.lat() - 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_empty_has_no_box() {
        assert!(GeoBoundingBox::from_coordinates(&[], true).is_none());
    }
}
