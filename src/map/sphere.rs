use glam::DVec3;

use crate::map::coord::{wrap_lon, GeoCoordinate};

/// Convert a coordinate to a unit sphere vector.
#[inline(always)]
pub fn to_unit_vector(coord: &GeoCoordinate) -> DVec3 {
    let (sin_lat, cos_lat) = coord.lat().sin_cos();
    let (sin_lon, cos_lon) = coord.lon().sin_cos();
    DVec3::new(cos_lat * cos_lon, cos_lat * sin_lon, sin_lat)
}

/// Convert a unit sphere vector back to a coordinate.
#[inline(always)]
pub fn from_unit_vector(p: DVec3) -> GeoCoordinate {
    let lat = p.z.clamp(-1.0, 1.0).asin();
    let lon = p.y.atan2(p.x);
    GeoCoordinate::new(lon, lat)
}

/// Central angle between two coordinates in radians
pub fn angular_distance(a: &GeoCoordinate, b: &GeoCoordinate) -> f64 {
    to_unit_vector(a).dot(to_unit_vector(b)).clamp(-1.0, 1.0).acos()
}

/// Visit the `steps - 1` interior points splitting the great circle arc from
/// `from` to `to` into `steps` equal parts. Endpoints are not visited.
///
/// No allocation: each point is handed to the visitor as it is computed.
#[inline]
pub fn walk_great_circle(
    from: &GeoCoordinate,
    to: &GeoCoordinate,
    steps: usize,
    mut visitor: impl FnMut(GeoCoordinate),
) {
    if steps < 2 {
        return;
    }

    let a = to_unit_vector(from);
    let b = to_unit_vector(to);
    let angle = a.dot(b).clamp(-1.0, 1.0).acos();
    let sin_angle = angle.sin();
    if sin_angle.abs() < 1e-10 {
        // Identical or antipodal: the arc is undefined
        return;
    }

    for i in 1..steps {
        let t = i as f64 / steps as f64;
        let sa = ((1.0 - t) * angle).sin() / sin_angle;
        let sb = (t * angle).sin() / sin_angle;
        let altitude = from.altitude() + t * (to.altitude() - from.altitude());
        visitor(from_unit_vector(a * sa + b * sb).with_altitude(altitude));
    }
}

/// Visit the interior points of a segment that follows the parallel of
/// `from`, going the short way round in longitude.
#[inline]
pub fn walk_latitude_circle(
    from: &GeoCoordinate,
    to: &GeoCoordinate,
    steps: usize,
    mut visitor: impl FnMut(GeoCoordinate),
) {
    let dlon = wrap_lon(to.lon() - from.lon());
    for i in 1..steps {
        let t = i as f64 / steps as f64;
        let altitude = from.altitude() + t * (to.altitude() - from.altitude());
        visitor(GeoCoordinate::new(from.lon() + t * dlon, from.lat()).with_altitude(altitude));
    }
}
