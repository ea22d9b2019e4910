use std::sync::OnceLock;

use crate::map::bbox::GeoBoundingBox;
use crate::map::coord::GeoCoordinate;

bitflags::bitflags! {
    /// How the segments between consecutive vertices are drawn.
    ///
    /// With no flag set each segment is a straight screen-space chord.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct TessellationFlags: u8 {
        /// Subdivide segments along the great circle
        const TESSELLATE = 1 << 0;
        /// Segments between equal latitudes follow the parallel instead
        const RESPECT_LATITUDE_CIRCLE = 1 << 1;
        /// Segments hug the ground; no effect on a flat map
        const FOLLOW_GROUND = 1 << 2;
    }
}

/// An ordered path of geographic coordinates, open or closed.
///
/// A closed line string (linear ring) is stored without repeating its first
/// vertex; the closing segment is implied.
#[derive(Debug, Clone, Default)]
pub struct GeoLineString {
    coords: Vec<GeoCoordinate>,
    closed: bool,
    flags: TessellationFlags,
    bbox: OnceLock<GeoBoundingBox>,
}

impl GeoLineString {
    pub fn open(coords: Vec<GeoCoordinate>) -> Self {
        Self {
            coords,
            closed: false,
            flags: TessellationFlags::empty(),
            bbox: OnceLock::new(),
        }
    }

    /// A linear ring. A trailing vertex equal to the first one is dropped.
    pub fn ring(mut coords: Vec<GeoCoordinate>) -> Self {
        if coords.len() > 1 && coords[0].same_position(&coords[coords.len() - 1]) {
            coords.pop();
        }
        Self {
            closed: true,
            ..Self::open(coords)
        }
    }

    /// Convenience constructor from (lon, lat) pairs in degrees
    pub fn from_degrees(points: &[(f64, f64)], closed: bool) -> Self {
        let coords = points
            .iter()
            .map(|&(lon, lat)| GeoCoordinate::from_degrees(lon, lat))
            .collect();
        if closed {
            Self::ring(coords)
        } else {
            Self::open(coords)
        }
    }

    pub fn with_flags(mut self, flags: TessellationFlags) -> Self {
        self.flags = flags;
        self
    }

    pub fn set_flags(&mut self, flags: TessellationFlags) {
        self.flags = flags;
    }

    pub fn push(&mut self, coord: GeoCoordinate) {
        self.coords.push(coord);
        self.bbox = OnceLock::new();
    }

    pub fn coordinates(&self) -> &[GeoCoordinate] {
        &self.coords
    }

    pub fn len(&self) -> usize {
        self.coords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coords.is_empty()
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn flags(&self) -> TessellationFlags {
        self.flags
    }

    /// Whether segments are subdivided rather than drawn as chords
    pub fn tessellate(&self) -> bool {
        self.flags.contains(TessellationFlags::TESSELLATE)
    }

    /// Bounding box, computed on first use
    pub fn bounding_box(&self) -> &GeoBoundingBox {
        self.bbox.get_or_init(|| {
            GeoBoundingBox::from_coordinates(&self.coords, self.closed).unwrap_or_default()
        })
    }

    /// Too few points to draw anything: fewer than 2 for a path, fewer than
    /// 3 distinct positions for a ring
    pub fn is_degenerate(&self) -> bool {
        if !self.closed {
            return self.coords.len() < 2;
        }
        let mut distinct: Vec<&GeoCoordinate> = Vec::with_capacity(3);
        for coord in &self.coords {
            if !distinct.iter().any(|d| d.same_position(coord)) {
                distinct.push(coord);
                if distinct.len() == 3 {
                    return false;
                }
            }
        }
        true
    }
}
