use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, PI};

use clap::ValueEnum;

/// Cylindrical projection families.
///
/// All of them map longitude linearly to x; they differ only in the vertical
/// law applied to latitude.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Projection {
    /// Plate carrée: y is proportional to latitude
    Equirectangular,
    /// Conformal, diverges at the poles
    #[default]
    Mercator,
    /// Mercator variant that stays finite at the poles
    Miller,
}

impl Projection {
    /// Largest latitude the projection can represent
    pub fn max_lat(self) -> f64 {
        match self {
            Projection::Equirectangular | Projection::Miller => FRAC_PI_2,
            // atan(sinh(pi)): the latitude at which Mercator y equals pi
            Projection::Mercator => PI.sinh().atan(),
        }
    }

    pub fn min_lat(self) -> f64 {
        -self.max_lat()
    }

    /// Vertical law in radians-equivalent units (multiply by the globe radius
    /// for pixels). Latitude is clamped to the representable range first.
    #[inline(always)]
    pub fn vertical(self, lat: f64) -> f64 {
        let max = self.max_lat();
        let lat = lat.clamp(-max, max);
        match self {
            Projection::Equirectangular => lat,
            Projection::Mercator => (FRAC_PI_4 + lat / 2.0).tan().ln(),
            Projection::Miller => 1.25 * (FRAC_PI_4 + 0.4 * lat).tan().ln(),
        }
    }

    /// Inverse of [`Projection::vertical`]
    pub fn latitude(self, v: f64) -> f64 {
        let lat = match self {
            Projection::Equirectangular => v,
            Projection::Mercator => v.sinh().atan(),
            Projection::Miller => 2.5 * (0.8 * v).exp().atan() - 0.625 * PI,
        };
        lat.clamp(self.min_lat(), self.max_lat())
    }

    /// Vertical extent of the map from the equator to the top edge
    pub fn vertical_limit(self) -> f64 {
        self.vertical(self.max_lat())
    }

    pub fn name(self) -> &'static str {
        match self {
            Projection::Equirectangular => "Equirectangular",
            Projection::Mercator => "Mercator",
            Projection::Miller => "Miller",
        }
    }

    /// Next family, for cycling through them in the viewer
    pub fn next(self) -> Self {
        match self {
            Projection::Equirectangular => Projection::Mercator,
            Projection::Mercator => Projection::Miller,
            Projection::Miller => Projection::Equirectangular,
        }
    }
}
