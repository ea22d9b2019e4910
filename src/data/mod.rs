use std::fs;
use std::path::Path;

use geojson::{GeoJson, Geometry, Value};
use tracing::{debug, info, warn};

use crate::map::{GeoCoordinate, GeoLineString, Layer, MapRenderer, TessellationFlags};

/// Errors raised while loading map data
#[derive(Debug, thiserror::Error)]
pub enum DataError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("GeoJSON parsing error: {0}")]
    GeoJson(#[from] simd_json::Error),

    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),
}

pub type Result<T> = std::result::Result<T, DataError>;

/// A single geometry ready for projection.
///
/// Multi-geometries and collections are flattened into several datasets.
#[derive(Debug, Clone)]
pub enum Dataset {
    Point(GeoCoordinate),
    LineString(GeoLineString),
    Polygon {
        outer: GeoLineString,
        holes: Vec<GeoLineString>,
    },
}

impl Dataset {
    /// Hand the geometry to the renderer, lines going to `layer`
    pub fn add_to(self, renderer: &mut MapRenderer, layer: Layer) {
        match self {
            Dataset::Point(coord) => renderer.add_point(coord),
            Dataset::LineString(line) => renderer.add_line(layer, line),
            Dataset::Polygon { outer, holes } => {
                renderer.add_line(layer, outer);
                for hole in holes {
                    renderer.add_line(layer, hole);
                }
            }
        }
    }
}

/// Candidate files per layer, best first. Only the first one found is loaded.
const COASTLINE_FILES: [&str; 3] = ["ne_50m_coastline.json", "natural-earth.json", "ne_110m_coastline.json"];
const BORDER_FILES: [&str; 2] = ["ne_50m_borders.json", "ne_110m_borders.json"];
const POINT_FILES: [&str; 1] = ["ne_110m_populated_places.json"];

/// Load whatever Natural Earth GeoJSON is present in `data_dir`.
///
/// Failing files are logged and skipped. Returns the number of datasets added.
pub fn load_all(renderer: &mut MapRenderer, data_dir: &Path) -> usize {
    let mut loaded = 0;
    for (files, layer) in [
        (&COASTLINE_FILES[..], Layer::Coastlines),
        (&BORDER_FILES[..], Layer::Borders),
        (&POINT_FILES[..], Layer::Coastlines),
    ] {
        for filename in files {
            let path = data_dir.join(filename);
            if !path.exists() {
                continue;
            }
            match load_file(&path) {
                Ok(datasets) => {
                    info!(file = %path.display(), count = datasets.len(), "loaded map data");
                    loaded += datasets.len();
                    for dataset in datasets {
                        dataset.add_to(renderer, layer);
                    }
                    break;
                }
                Err(e) => warn!(file = %path.display(), "failed to load: {e}"),
            }
        }
    }
    loaded
}

/// Read and convert one GeoJSON file
pub fn load_file(path: &Path) -> Result<Vec<Dataset>> {
    let mut bytes = fs::read(path)?;
    parse(&mut bytes)
}

/// Parse GeoJSON text. The buffer is used as scratch space by the parser.
pub fn parse(bytes: &mut [u8]) -> Result<Vec<Dataset>> {
    let geojson: GeoJson = simd_json::serde::from_slice(bytes)?;
    Ok(datasets_from_geojson(&geojson))
}

/// Convert every geometry, skipping invalid ones with a warning
pub fn datasets_from_geojson(geojson: &GeoJson) -> Vec<Dataset> {
    let geometries: Vec<&Geometry> = match geojson {
        GeoJson::FeatureCollection(fc) => fc.features.iter().filter_map(|f| f.geometry.as_ref()).collect(),
        GeoJson::Feature(f) => f.geometry.iter().collect(),
        GeoJson::Geometry(geometry) => vec![geometry],
    };

    let mut datasets = Vec::new();
    for (index, geometry) in geometries.into_iter().enumerate() {
        match convert_geometry(geometry) {
            Ok(converted) => datasets.extend(converted),
            Err(e) => warn!(index, "skipping geometry: {e}"),
        }
    }
    debug!(count = datasets.len(), "converted geometries");
    datasets
}

/// Convert one GeoJSON geometry (degrees) into datasets (radians)
pub fn convert_geometry(geometry: &Geometry) -> Result<Vec<Dataset>> {
    let mut out = Vec::new();
    push_datasets(&geometry.value, &mut out)?;
    Ok(out)
}

fn push_datasets(value: &Value, out: &mut Vec<Dataset>) -> Result<()> {
    match value {
        Value::Point(position) => out.push(Dataset::Point(coordinate(position)?)),
        Value::MultiPoint(positions) => {
            for position in positions {
                out.push(Dataset::Point(coordinate(position)?));
            }
        }
        Value::LineString(positions) => out.push(Dataset::LineString(line(positions)?)),
        Value::MultiLineString(lines) => {
            for positions in lines {
                out.push(Dataset::LineString(line(positions)?));
            }
        }
        Value::Polygon(rings) => out.push(polygon(rings)?),
        Value::MultiPolygon(polygons) => {
            for rings in polygons {
                out.push(polygon(rings)?);
            }
        }
        Value::GeometryCollection(geometries) => {
            for geometry in geometries {
                push_datasets(&geometry.value, out)?;
            }
        }
    }
    Ok(())
}

fn coordinate(position: &[f64]) -> Result<GeoCoordinate> {
    let (lon, lat) = match position {
        [lon, lat, ..] => (*lon, *lat),
        _ => {
            return Err(DataError::InvalidGeometry(format!(
                "position needs 2 values, got {}",
                position.len()
            )))
        }
    };
    if !lon.is_finite() || !lat.is_finite() {
        return Err(DataError::InvalidGeometry(format!("non-finite position ({lon}, {lat})")));
    }
    let coord = GeoCoordinate::from_degrees(lon, lat);
    Ok(match position.get(2) {
        Some(altitude) if altitude.is_finite() => coord.with_altitude(*altitude),
        _ => coord,
    })
}

/// Coarsest detail hint handed out; matches the viewport's finest level
const MAX_DETAIL: u32 = 5;

/// Hierarchical detail hint from a vertex's position in its path.
///
/// Every 32nd vertex is always drawn (0), odd vertices only at the finest
/// level (5), and the levels in between halve the vertex count each step.
pub fn detail_level(index: usize) -> u8 {
    (MAX_DETAIL - index.trailing_zeros().min(MAX_DETAIL)) as u8
}

fn coordinates(positions: &[Vec<f64>]) -> Result<Vec<GeoCoordinate>> {
    positions
        .iter()
        .enumerate()
        .map(|(i, p)| Ok(coordinate(p)?.with_detail(detail_level(i))))
        .collect()
}

fn line(positions: &[Vec<f64>]) -> Result<GeoLineString> {
    if positions.len() < 2 {
        return Err(DataError::InvalidGeometry(format!(
            "line string needs 2 positions, got {}",
            positions.len()
        )));
    }
    Ok(GeoLineString::open(coordinates(positions)?))
}

fn polygon(rings: &[Vec<Vec<f64>>]) -> Result<Dataset> {
    let mut rings = rings.iter().map(|positions| {
        let ring = GeoLineString::ring(coordinates(positions)?);
        if ring.len() < 3 {
            return Err(DataError::InvalidGeometry(format!(
                "ring needs 3 distinct positions, got {}",
                ring.len()
            )));
        }
        Ok(ring)
    });
    let outer = rings
        .next()
        .ok_or_else(|| DataError::InvalidGeometry("polygon without rings".into()))??;
    let holes = rings.collect::<Result<Vec<_>>>()?;
    Ok(Dataset::Polygon { outer, holes })
}

/// Outline rings in degrees for the built-in world
const SIMPLE_WORLD: [&[(f64, f64)]; 6] = [
    // North America
    &[
        (-165.0, 64.0), (-140.0, 59.0), (-124.0, 46.0), (-117.0, 32.0),
        (-105.0, 20.0), (-87.0, 21.0), (-81.0, 26.0), (-76.0, 37.0),
        (-66.0, 44.0), (-56.0, 51.0), (-64.0, 59.0), (-82.0, 64.0),
        (-100.0, 68.0), (-128.0, 70.0), (-156.0, 71.0),
    ],
    // South America
    &[
        (-78.0, 8.0), (-60.0, 8.0), (-50.0, 0.0), (-35.0, -7.0),
        (-41.0, -22.0), (-57.0, -36.0), (-66.0, -47.0), (-71.0, -54.0),
        (-74.0, -44.0), (-71.0, -18.0), (-81.0, -5.0),
    ],
    // Africa
    &[
        (-17.0, 21.0), (-10.0, 35.0), (10.0, 37.0), (32.0, 31.0),
        (43.0, 12.0), (51.0, 11.0), (40.0, -15.0), (32.0, -29.0),
        (19.0, -35.0), (12.0, -17.0), (9.0, 4.0), (-8.0, 5.0),
        (-17.0, 14.0),
    ],
    // Eurasia, running across the dateline into Chukotka
    &[
        (-9.0, 38.0), (3.0, 43.0), (27.0, 40.0), (35.0, 36.0),
        (57.0, 25.0), (73.0, 20.0), (80.0, 8.0), (92.0, 22.0),
        (105.0, 10.0), (122.0, 30.0), (130.0, 42.0), (141.0, 52.0),
        (163.0, 60.0), (-175.0, 65.0), (-172.0, 67.0), (178.0, 70.0),
        (140.0, 73.0), (110.0, 77.0), (70.0, 73.0), (40.0, 68.0),
        (20.0, 70.0), (5.0, 61.0), (-9.0, 52.0),
    ],
    // Australia
    &[
        (114.0, -22.0), (130.0, -12.0), (142.0, -11.0), (153.0, -27.0),
        (147.0, -39.0), (131.0, -32.0), (115.0, -34.0),
    ],
    // Antarctica, a ring around the south pole
    &[
        (-180.0, -78.0), (-150.0, -76.0), (-120.0, -73.0), (-90.0, -72.0),
        (-60.0, -64.0), (-30.0, -75.0), (0.0, -70.0), (30.0, -69.0),
        (60.0, -67.0), (90.0, -66.0), (120.0, -66.0), (150.0, -69.0),
        (170.0, -77.0),
    ],
];

const SIMPLE_PLACES: [(f64, f64); 8] = [
    (-74.0, 40.7),
    (-0.1, 51.5),
    (139.7, 35.7),
    (151.2, -33.9),
    (-43.2, -22.9),
    (77.2, 28.6),
    (-149.9, 61.2),
    (178.4, -18.1),
];

/// A coarse world map for when no data file is available
pub fn generate_simple_world(renderer: &mut MapRenderer) {
    for outline in SIMPLE_WORLD {
        renderer.add_line(Layer::Coastlines, GeoLineString::from_degrees(outline, true));
    }
    for (lon, lat) in SIMPLE_PLACES {
        renderer.add_point(GeoCoordinate::from_degrees(lon, lat));
    }
}

/// Meridians and parallels every `step` degrees.
///
/// Parallels follow the latitude circle rather than the great circle.
pub fn graticule(step: f64) -> Vec<GeoLineString> {
    if !(step > 0.0 && step <= 90.0) {
        return Vec::new();
    }
    let count = |span: f64| (span / step).floor() as i64;
    let mut lines = Vec::new();

    for i in 0..count(360.0) {
        let lon = -180.0 + i as f64 * step;
        let points: Vec<(f64, f64)> = (0..=count(180.0))
            .map(|j| (lon, -90.0 + j as f64 * step))
            .collect();
        lines.push(GeoLineString::from_degrees(&points, false));
    }

    let flags = TessellationFlags::TESSELLATE | TessellationFlags::RESPECT_LATITUDE_CIRCLE;
    for j in 1..count(180.0) {
        let lat = -90.0 + j as f64 * step;
        if lat >= 90.0 {
            break;
        }
        let points: Vec<(f64, f64)> = (0..=count(360.0))
            .map(|i| (-180.0 + i as f64 * step, lat))
            .collect();
        lines.push(GeoLineString::from_degrees(&points, false).with_flags(flags));
    }
    lines
}

/// Add the graticule layer to a renderer
pub fn add_graticule(renderer: &mut MapRenderer, step: f64) {
    for line in graticule(step) {
        renderer.add_line(Layer::Graticule, line);
    }
}
