use std::f64::consts::{PI, TAU};

use crate::map::bbox::GeoBoundingBox;
use crate::map::coord::{wrap_lon, GeoCoordinate};
use crate::map::projection::Projection;

/// Projection parameters for one render pass.
///
/// `radius` is the globe radius in pixels, which for a cylindrical map is
/// also the number of pixels per radian along the equator.
#[derive(Debug, Clone, PartialEq)]
pub struct Viewport {
    /// Canvas pixel width
    pub width: usize,
    /// Canvas pixel height
    pub height: usize,
    /// Globe radius in pixels
    pub radius: f64,
    /// Geographic point drawn at the canvas center
    pub center: GeoCoordinate,
    pub projection: Projection,
}

impl Viewport {
    pub fn new(
        width: usize,
        height: usize,
        radius: f64,
        center: GeoCoordinate,
        projection: Projection,
    ) -> Self {
        Self {
            width,
            height,
            radius,
            center,
            projection,
        }
    }

    /// A view in which exactly one globe repetition fills the width
    pub fn world(width: usize, height: usize, projection: Projection) -> Self {
        let radius = (width as f64 / TAU).max(1.0);
        Self::new(width, height, radius, GeoCoordinate::default(), projection)
    }

    pub fn with_center(mut self, center: GeoCoordinate) -> Self {
        self.center = center;
        self
    }

    pub fn with_radius(mut self, radius: f64) -> Self {
        self.radius = radius;
        self
    }

    pub fn with_projection(mut self, projection: Projection) -> Self {
        self.projection = projection;
        self
    }

    pub fn with_size(mut self, width: usize, height: usize) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Pixel width of one full turn of longitude
    #[inline(always)]
    pub fn globe_width(&self) -> f64 {
        TAU * self.radius
    }

    /// Smallest angle that still spans a pixel
    pub fn angular_resolution(&self) -> f64 {
        1.0 / self.radius
    }

    /// Highest vertex detail hint worth drawing at this radius
    pub fn max_detail(&self) -> u8 {
        match self.radius {
            r if r > 5000.0 => 5,
            r if r > 2500.0 => 4,
            r if r > 1000.0 => 3,
            r if r > 600.0 => 2,
            r if r > 50.0 => 1,
            _ => 0,
        }
    }

    /// Whether a box is large enough to cover at least a pixel
    pub fn resolves_box(&self, bbox: &GeoBoundingBox) -> bool {
        (bbox.width() + bbox.height()) * self.radius >= 1.0
    }

    /// Whether two positions are far enough apart to land on different pixels
    #[inline(always)]
    pub fn resolves(&self, a: &GeoCoordinate, b: &GeoCoordinate) -> bool {
        let dlon = wrap_lon(b.lon() - a.lon()).abs();
        let dlat = (b.lat() - a.lat()).abs();
        (dlon + dlat) * self.radius >= 1.0
    }

    /// Screen x of the western and eastern seam of the globe copy centred on
    /// the view, i.e. where the meridian opposite the centre is drawn
    #[inline(always)]
    pub fn seams(&self) -> (f64, f64) {
        let lat = self.center.lat();
        let west = self.project_unwrapped(self.center.lon() - PI, lat).x;
        let east = self.project_unwrapped(self.center.lon() + PI, lat).x;
        (west, east)
    }

    /// Geographic area covered by the canvas
    pub fn view_box(&self) -> GeoBoundingBox {
        let projection = self.projection;
        let top = projection.vertical(self.center.lat()) + self.height as f64 / 2.0 / self.radius;
        let bottom = projection.vertical(self.center.lat()) - self.height as f64 / 2.0 / self.radius;
        let north = projection.latitude(top.min(projection.vertical_limit()));
        let south = projection.latitude(bottom.max(-projection.vertical_limit()));

        if self.globe_width() <= self.width as f64 {
            return GeoBoundingBox::new(north, south, PI, -PI);
        }
        let half = self.width as f64 / 2.0 / self.radius;
        GeoBoundingBox::new(
            north,
            south,
            wrap_lon(self.center.lon() + half),
            wrap_lon(self.center.lon() - half),
        )
    }
}
