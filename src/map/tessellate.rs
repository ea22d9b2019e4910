//! Line string to screen polygon conversion for cylindrical maps.
//!
//! The walk visits the vertices of a line string in order (revisiting the
//! first vertex of a ring at the end), projects the ones worth drawing and
//! hands each consecutive pair to the segment emitter. The emitter optionally
//! subdivides the segment along the sphere and splits the output wherever the
//! path crosses the seam opposite the view center, so no emitted polygon
//! contains a jump across the whole map.

use glam::DVec2;
use tracing::trace;

use crate::map::coord::GeoCoordinate;
use crate::map::line_string::{GeoLineString, TessellationFlags};
use crate::map::polygon::ScreenPolygon;
use crate::map::sphere::{walk_great_circle, walk_latitude_circle};
use crate::map::transform::ScreenPoint;
use crate::map::viewport::Viewport;

/// Line strings with more vertices than this may have vertices elided
const LONG_LINE_NODES: usize = 50;
/// Screen distance covered by one tessellated sub-segment, in pixels
const TESSELLATION_PRECISION: f64 = 10.0;
const MAX_TESSELLATION_NODES: usize = 200;

/// Project a line string into screen polygons.
///
/// Returns an empty vec when there is nothing to draw: the line is
/// degenerate or too small to cover a pixel.
pub fn tessellate(line: &GeoLineString, viewport: &Viewport) -> Vec<ScreenPolygon> {
    if line.is_degenerate() {
        return Vec::new();
    }
    if !viewport.resolves_box(line.bounding_box()) {
        trace!(nodes = line.len(), "line string below resolution");
        return Vec::new();
    }

    let coords = line.coordinates();
    let max_detail = viewport.max_detail();
    let is_long = coords.len() > LONG_LINE_NODES;

    // (coordinate, is first vertex, is the closing revisit)
    let closing = line.is_closed().then(|| (coords[0], false, true));
    let nodes = coords
        .iter()
        .enumerate()
        .map(|(i, &coord)| (coord, i == 0, false))
        .chain(closing);

    let walk = nodes.fold(Walk::new(viewport, line.flags()), |mut walk, (coord, first, revisit)| {
        let skip = is_long
            && !first
            && !revisit
            && walk.elides(&coord, max_detail);
        if !skip {
            walk.visit(coord);
        }
        walk
    });

    walk.finish(line.is_closed())
}

/// Accumulator of the vertex walk
struct Walk<'a> {
    viewport: &'a Viewport,
    /// Vertical law value of the view center, fixed for the whole walk
    center_vertical: f64,
    flags: TessellationFlags,
    polygons: Vec<ScreenPolygon>,
    previous: Option<(GeoCoordinate, ScreenPoint)>,
    mirror: i32,
}

impl<'a> Walk<'a> {
    fn new(viewport: &'a Viewport, flags: TessellationFlags) -> Self {
        Self {
            viewport,
            center_vertical: viewport.center_vertical(),
            flags,
            polygons: Vec::new(),
            previous: None,
            mirror: 0,
        }
    }

    /// A vertex is dropped only when its detail hint exceeds the budget and
    /// it is not resolved from the last kept vertex
    fn elides(&self, coord: &GeoCoordinate, max_detail: u8) -> bool {
        coord.detail() > max_detail
            && self
                .previous
                .is_some_and(|(prev, _)| !self.viewport.resolves(&prev, coord))
    }

    fn project(&self, coord: &GeoCoordinate) -> ScreenPoint {
        self.viewport.project_from(coord, self.center_vertical)
    }

    fn visit(&mut self, coord: GeoCoordinate) {
        let point = self.project(&coord);

        let Some((prev_coord, prev_point)) = self.previous else {
            let mut polygon = ScreenPolygon::new(self.mirror);
            polygon.push(point.to_vec2());
            self.polygons.push(polygon);
            self.previous = Some((coord, point));
            return;
        };

        if prev_coord.same_position(&coord) {
            return;
        }

        self.emit_segment(&prev_coord, prev_point, &coord, point);
        self.previous = Some((coord, point));
    }

    fn emit_segment(
        &mut self,
        from: &GeoCoordinate,
        from_point: ScreenPoint,
        to: &GeoCoordinate,
        to_point: ScreenPoint,
    ) {
        let mut last = from_point;
        let mut crossed = false;

        if self.flags.contains(TessellationFlags::TESSELLATE) {
            let steps = self.node_count(from_point, to_point);
            let along_parallel = self
                .flags
                .contains(TessellationFlags::RESPECT_LATITUDE_CIRCLE)
                && from.lat() == to.lat();

            let mut emit = |coord: GeoCoordinate| {
                let point = self.project(&coord);
                self.advance(last, point, &mut crossed);
                last = point;
            };
            if along_parallel {
                walk_latitude_circle(from, to, steps, &mut emit);
            } else {
                walk_great_circle(from, to, steps, &mut emit);
            }
        }

        self.advance(last, to_point, &mut crossed);
    }

    /// Number of sub-segments for a segment, from its on-screen length
    fn node_count(&self, from: ScreenPoint, to: ScreenPoint) -> usize {
        let globe_width = self.viewport.globe_width();
        let mut dx = (to.x - from.x).abs();
        if dx > globe_width / 2.0 {
            dx = globe_width - dx;
        }
        let distance = dx + (to.y - from.y).abs();
        ((distance / TESSELLATION_PRECISION) as usize).clamp(1, MAX_TESSELLATION_NODES)
    }

    /// Append `to`, splitting the current polygon if the step from `from`
    /// crosses the seam. At most one split happens per source segment.
    fn advance(&mut self, from: ScreenPoint, to: ScreenPoint, crossed: &mut bool) {
        let globe_width = self.viewport.globe_width();
        let dx = to.x - from.x;

        if !*crossed && dx.abs() > globe_width / 2.0 {
            *crossed = true;
            let (west, east) = self.viewport.seams();

            // dx < 0: left through the east seam, re-entered from the west
            let (exit_x, entry_x, step, travelled) = if dx < 0.0 {
                (east, west, 1, east - from.x)
            } else {
                (west, east, -1, from.x - west)
            };
            let span = globe_width - dx.abs();
            let t = if span > 0.0 {
                (travelled / span).clamp(0.0, 1.0)
            } else {
                0.0
            };
            let y = from.y + t * (to.y - from.y);

            self.current().push_unique(DVec2::new(exit_x, y));
            self.mirror += step;
            let mut polygon = ScreenPolygon::new(self.mirror);
            polygon.push(DVec2::new(entry_x, y));
            self.polygons.push(polygon);
        }

        self.current().push_unique(to.to_vec2());
    }

    fn current(&mut self) -> &mut ScreenPolygon {
        // `visit` opens the first polygon before any segment is emitted
        let last = self.polygons.len() - 1;
        &mut self.polygons[last]
    }

    fn finish(mut self, closed: bool) -> Vec<ScreenPolygon> {
        // A ring ends where it started, so its trailing piece continues into
        // the leading one. The joined piece keeps the leading piece's copy.
        if closed && self.polygons.len() > 1 {
            if let Some(tail) = self.polygons.pop() {
                let head = std::mem::take(&mut self.polygons[0]);
                let mirror = head.mirror();
                self.polygons[0] = tail.join(head).with_mirror(mirror);
            }
        }
        self.polygons.retain(|polygon| polygon.len() > 1);

        if self.mirror != 0 {
            trace!(mirror = self.mirror, pieces = self.polygons.len(), "line string crossed the seam");
        }
        self.polygons
    }
}
