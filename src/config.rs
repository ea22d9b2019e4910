use std::path::PathBuf;

use clap::Parser;
use cylmap::map::{GeoCoordinate, Projection};

#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
/// cylmap - cylindrical world map in the terminal
pub struct Cli {
    /// Directory holding Natural Earth GeoJSON files
    #[clap(short, long, value_name = "DIR", default_value = "data")]
    pub data_dir: PathBuf,

    /// Map projection
    #[clap(short, long, value_enum, default_value_t = Projection::Mercator)]
    pub projection: Projection,

    /// Initial center longitude in degrees
    #[clap(long, default_value = "0.0", allow_negative_numbers = true)]
    pub lon: f64,

    /// Initial center latitude in degrees
    #[clap(long, default_value = "0.0", allow_negative_numbers = true)]
    pub lat: f64,

    /// Write logs to this file (the terminal belongs to the map)
    #[clap(long, value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Log level: trace, debug, info, warn or error
    #[clap(long, default_value = "info")]
    pub log_level: tracing::Level,
}

impl Cli {
    pub fn center(&self) -> GeoCoordinate {
        GeoCoordinate::from_degrees(self.lon, self.lat)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["cylmap"]).unwrap();
        assert_eq!(cli.data_dir, PathBuf::from("data"));
        assert_eq!(cli.projection, Projection::Mercator);
        assert_eq!(cli.center(), GeoCoordinate::default());
        assert!(cli.log_file.is_none());
        assert_eq!(cli.log_level, tracing::Level::INFO);
    }

    #[test]
    fn test_parse_all() {
        let cli = Cli::try_parse_from([
            "cylmap",
            "--projection",
            "miller",
            "--lon",
            "-120.5",
            "--lat",
            "35",
            "--log-file",
            "cylmap.log",
            "--log-level",
            "debug",
        ])
        .unwrap();
        assert_eq!(cli.projection, Projection::Miller);
        assert!((cli.center().lon_degrees() + 120.5).abs() < 1e-9);
        assert_eq!(cli.log_level, tracing::Level::DEBUG);
    }

    #[test]
    fn test_rejects_unknown_projection() {
        assert!(Cli::try_parse_from(["cylmap", "--projection", "robinson"]).is_err());
    }
}
