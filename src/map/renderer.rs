use rayon::prelude::*;
use tracing::debug;

use crate::braille::BrailleCanvas;
use crate::map::coord::GeoCoordinate;
use crate::map::geometry::{draw_map_frame, draw_marker, draw_polyline};
use crate::map::line_string::{GeoLineString, TessellationFlags};
use crate::map::pipeline::{project_line_string, project_point};
use crate::map::polygon::{MapShape, ScreenPolygon};
use crate::map::viewport::Viewport;

/// Line layers, drawn in this order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layer {
    Coastlines,
    Borders,
    Graticule,
}

/// Display settings for map layers
#[derive(Debug, Clone)]
pub struct DisplaySettings {
    pub show_coastlines: bool,
    pub show_borders: bool,
    pub show_graticule: bool,
    pub show_points: bool,
    /// Follow great circles between data vertices
    pub tessellate: bool,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            show_coastlines: true,
            show_borders: true,
            show_graticule: true,
            show_points: true,
            tessellate: true,
        }
    }
}

/// One rendered frame, a canvas per layer so the UI can colour them
pub struct MapLayers {
    pub coastlines: BrailleCanvas,
    pub borders: BrailleCanvas,
    pub graticule: BrailleCanvas,
    pub points: BrailleCanvas,
    /// Top/bottom map edges
    pub frame: BrailleCanvas,
    pub polygon_count: usize,
}

impl MapLayers {
    fn new(width: usize, height: usize) -> Self {
        Self {
            coastlines: BrailleCanvas::new(width, height),
            borders: BrailleCanvas::new(width, height),
            graticule: BrailleCanvas::new(width, height),
            points: BrailleCanvas::new(width, height),
            frame: BrailleCanvas::new(width, height),
            polygon_count: 0,
        }
    }

    fn canvas_mut(&mut self, layer: Layer) -> &mut BrailleCanvas {
        match layer {
            Layer::Coastlines => &mut self.coastlines,
            Layer::Borders => &mut self.borders,
            Layer::Graticule => &mut self.graticule,
        }
    }
}

/// Holds the loaded geometry and renders it through the projection pipeline
#[derive(Default)]
pub struct MapRenderer {
    coastlines: Vec<GeoLineString>,
    borders: Vec<GeoLineString>,
    graticule: Vec<GeoLineString>,
    points: Vec<GeoCoordinate>,
    pub settings: DisplaySettings,
}

impl MapRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a line to a layer. Data layers follow the tessellation setting;
    /// graticule lines keep the flags they were built with.
    pub fn add_line(&mut self, layer: Layer, mut line: GeoLineString) {
        match layer {
            Layer::Coastlines | Layer::Borders => {
                line.set_flags(self.data_flags(line.flags()));
            }
            Layer::Graticule => {}
        }
        self.lines_mut(layer).push(line);
    }

    pub fn add_point(&mut self, coord: GeoCoordinate) {
        self.points.push(coord);
    }

    pub fn lines(&self, layer: Layer) -> &[GeoLineString] {
        match layer {
            Layer::Coastlines => &self.coastlines,
            Layer::Borders => &self.borders,
            Layer::Graticule => &self.graticule,
        }
    }

    fn lines_mut(&mut self, layer: Layer) -> &mut Vec<GeoLineString> {
        match layer {
            Layer::Coastlines => &mut self.coastlines,
            Layer::Borders => &mut self.borders,
            Layer::Graticule => &mut self.graticule,
        }
    }

    fn data_flags(&self, mut flags: TessellationFlags) -> TessellationFlags {
        flags.set(TessellationFlags::TESSELLATE, self.settings.tessellate);
        flags
    }

    fn is_visible(&self, layer: Layer) -> bool {
        match layer {
            Layer::Coastlines => self.settings.show_coastlines,
            Layer::Borders => self.settings.show_borders,
            Layer::Graticule => self.settings.show_graticule,
        }
    }

    /// Check if any data is loaded
    pub fn has_data(&self) -> bool {
        !self.coastlines.is_empty() || !self.borders.is_empty() || !self.points.is_empty()
    }

    /// Render every visible layer.
    ///
    /// The viewport is measured in braille dots; canvases are sized to cover it.
    pub fn render(&self, viewport: &Viewport) -> MapLayers {
        let mut layers = MapLayers::new(viewport.width.div_ceil(2), viewport.height.div_ceil(4));
        let shape = viewport.map_shape();

        for layer in [Layer::Graticule, Layer::Borders, Layer::Coastlines] {
            if !self.is_visible(layer) {
                continue;
            }
            let polygons = project_all(self.lines(layer), viewport);
            layers.polygon_count += polygons.len();
            stroke(layers.canvas_mut(layer), &polygons, &shape);
        }

        if self.settings.show_points {
            for coord in &self.points {
                for p in project_point(coord, viewport) {
                    draw_marker(&mut layers.points, p.x.round() as i64, p.y.round() as i64, 1);
                }
            }
        }

        draw_map_frame(&mut layers.frame, &shape);

        debug!(
            polygons = layers.polygon_count,
            radius = viewport.radius,
            "rendered frame"
        );
        layers
    }

    pub fn toggle_borders(&mut self) {
        self.settings.show_borders = !self.settings.show_borders;
    }

    pub fn toggle_graticule(&mut self) {
        self.settings.show_graticule = !self.settings.show_graticule;
    }

    /// Switch great-circle tessellation of data lines on or off
    pub fn toggle_tessellation(&mut self) {
        self.settings.tessellate = !self.settings.tessellate;
        let tessellate = self.settings.tessellate;
        for line in self.coastlines.iter_mut().chain(self.borders.iter_mut()) {
            let mut flags = line.flags();
            flags.set(TessellationFlags::TESSELLATE, tessellate);
            line.set_flags(flags);
        }
    }
}

/// Tessellate independent shapes in parallel
fn project_all(lines: &[GeoLineString], viewport: &Viewport) -> Vec<ScreenPolygon> {
    lines
        .par_iter()
        .flat_map_iter(|line| project_line_string(line, viewport))
        .collect()
}

fn stroke(canvas: &mut BrailleCanvas, polygons: &[ScreenPolygon], shape: &MapShape) {
    for polygon in polygons {
        draw_polyline(canvas, polygon.points(), shape);
    }
}
