mod bbox;
mod coord;
pub mod geometry;
mod line_string;
mod pipeline;
mod pole;
mod polygon;
mod projection;
mod renderer;
mod repeat;
pub mod sphere;
mod tessellate;
mod transform;
mod viewport;

pub use bbox::{GeoBoundingBox, Pole};
pub use coord::{clamp_lat, wrap_lon, GeoCoordinate};
pub use line_string::{GeoLineString, TessellationFlags};
pub use pipeline::{project_line_string, project_point};
pub use pole::{cap_pole, close_poles};
pub use polygon::{MapShape, ScreenPolygon};
pub use projection::Projection;
pub use renderer::{DisplaySettings, Layer, MapLayers, MapRenderer};
pub use repeat::{repeat, repeat_counts};
pub use tessellate::tessellate;
pub use transform::ScreenPoint;
pub use viewport::Viewport;
