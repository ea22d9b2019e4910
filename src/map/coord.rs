use std::f64::consts::{FRAC_PI_2, PI, TAU};

/// Wrap an angle in radians into (-pi, pi]
#[inline(always)]
pub fn wrap_lon(lon: f64) -> f64 {
    let wrapped = (lon + PI).rem_euclid(TAU) - PI;
    if wrapped <= -PI {
        wrapped + TAU
    } else {
        wrapped
    }
}

/// Clamp a latitude in radians to [-pi/2, pi/2]
#[inline(always)]
pub fn clamp_lat(lat: f64) -> f64 {
    lat.clamp(-FRAC_PI_2, FRAC_PI_2)
}

/// A geographic position in radians.
///
/// Longitude is always normalized to (-pi, pi] and latitude to
/// [-pi/2, pi/2]. `detail` is the level-of-detail hint used by the
/// tessellator: 0 means the vertex is significant at every zoom, higher
/// values mark vertices that only matter once the globe is large.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GeoCoordinate {
    lon: f64,
    lat: f64,
    altitude: f64,
    detail: u8,
}

impl GeoCoordinate {
    pub fn new(lon: f64, lat: f64) -> Self {
        Self {
            lon: wrap_lon(lon),
            lat: clamp_lat(lat),
            altitude: 0.0,
            detail: 0,
        }
    }

    pub fn from_degrees(lon: f64, lat: f64) -> Self {
        Self::new(lon.to_radians(), lat.to_radians())
    }

    pub fn with_altitude(mut self, altitude: f64) -> Self {
        self.altitude = altitude;
        self
    }

    pub fn with_detail(mut self, detail: u8) -> Self {
        self.detail = detail;
        self
    }

    #[inline(always)]
    pub fn lon(&self) -> f64 {
        self.lon
    }

    #[inline(always)]
    pub fn lat(&self) -> f64 {
        self.lat
    }

    pub fn altitude(&self) -> f64 {
        self.altitude
    }

    #[inline(always)]
    pub fn detail(&self) -> u8 {
        self.detail
    }

    pub fn lon_degrees(&self) -> f64 {
        self.lon.to_degrees()
    }

    pub fn lat_degrees(&self) -> f64 {
        self.lat.to_degrees()
    }

    /// Same horizontal position, ignoring altitude and detail
    #[inline(always)]
    pub fn same_position(&self, other: &GeoCoordinate) -> bool {
        self.lon == other.lon && self.lat == other.lat
    }
}
