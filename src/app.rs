use cylmap::map::{GeoCoordinate, MapRenderer, Projection, Viewport};

/// Radius limits in braille dots per radian
const MIN_RADIUS: f64 = 4.0;
const MAX_RADIUS: f64 = 50_000.0;
const ZOOM_STEP: f64 = 1.25;

/// Application state
pub struct App {
    pub viewport: Viewport,
    pub map_renderer: MapRenderer,
    pub should_quit: bool,
    /// Last mouse position for drag tracking
    pub last_mouse: Option<(u16, u16)>,
    /// Current mouse position for the status bar readout
    pub mouse_pos: Option<(u16, u16)>,
    home: GeoCoordinate,
    home_projection: Projection,
}

/// Braille dots covered by a terminal area, minus the border and status bar
fn pixel_size(width: usize, height: usize) -> (usize, usize) {
    let inner_width = width.saturating_sub(2);
    let inner_height = height.saturating_sub(3); // 2 for border + 1 for status bar
    (inner_width * 2, inner_height * 4)
}

impl App {
    pub fn new(width: usize, height: usize, projection: Projection, center: GeoCoordinate) -> Self {
        let (pixel_width, pixel_height) = pixel_size(width, height);
        let viewport = Viewport::world(pixel_width, pixel_height, projection).with_center(center);
        let radius = viewport.radius.clamp(MIN_RADIUS, MAX_RADIUS);

        Self {
            viewport: viewport.with_radius(radius),
            map_renderer: MapRenderer::new(),
            should_quit: false,
            last_mouse: None,
            mouse_pos: None,
            home: center,
            home_projection: projection,
        }
    }

    /// Update viewport size when terminal resizes
    pub fn resize(&mut self, width: usize, height: usize) {
        let (pixel_width, pixel_height) = pixel_size(width, height);
        self.viewport.width = pixel_width;
        self.viewport.height = pixel_height;
    }

    /// Move the view by a number of braille dots
    pub fn pan(&mut self, dx: f64, dy: f64) {
        let projection = self.viewport.projection;
        let radius = self.viewport.radius;
        let center = self.viewport.center;

        let limit = projection.vertical_limit();
        let v = (projection.vertical(center.lat()) - dy / radius).clamp(-limit, limit);
        self.viewport.center = GeoCoordinate::new(center.lon() + dx / radius, projection.latitude(v));
    }

    pub fn zoom_in(&mut self) {
        self.set_radius(self.viewport.radius * ZOOM_STEP);
    }

    pub fn zoom_out(&mut self) {
        self.set_radius(self.viewport.radius / ZOOM_STEP);
    }

    fn set_radius(&mut self, radius: f64) {
        self.viewport.radius = radius.clamp(MIN_RADIUS, MAX_RADIUS);
    }

    /// Zoom keeping the map point under a terminal cell in place
    pub fn zoom_at(&mut self, col: u16, row: u16, factor: f64) {
        let (px, py) = cell_to_pixel(col, row);
        let anchor = self.viewport.unproject(px, py);
        self.set_radius(self.viewport.radius * factor);

        let Some(anchor) = anchor else {
            return;
        };
        let vp = &self.viewport;
        let projection = vp.projection;
        let limit = projection.vertical_limit();
        let lon = anchor.lon() - (px - vp.width as f64 / 2.0) / vp.radius;
        let v = (projection.vertical(anchor.lat()) + (py - vp.height as f64 / 2.0) / vp.radius)
            .clamp(-limit, limit);
        self.viewport.center = GeoCoordinate::new(lon, projection.latitude(v));
    }

    pub fn zoom_in_at(&mut self, col: u16, row: u16) {
        self.zoom_at(col, row, ZOOM_STEP);
    }

    pub fn zoom_out_at(&mut self, col: u16, row: u16) {
        self.zoom_at(col, row, 1.0 / ZOOM_STEP);
    }

    /// Switch to the next projection family, keeping the center
    pub fn cycle_projection(&mut self) {
        self.viewport.projection = self.viewport.projection.next();
    }

    /// Back to the startup view
    pub fn reset_view(&mut self) {
        let (width, height) = (self.viewport.width, self.viewport.height);
        let viewport = Viewport::world(width, height, self.home_projection).with_center(self.home);
        let radius = viewport.radius.clamp(MIN_RADIUS, MAX_RADIUS);
        self.viewport = viewport.with_radius(radius);
    }

    /// Request quit
    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    /// Handle mouse drag
    pub fn handle_drag(&mut self, x: u16, y: u16) {
        if let Some((last_x, last_y)) = self.last_mouse {
            let dx = (last_x as f64 - x as f64) * 2.0;
            let dy = (last_y as f64 - y as f64) * 4.0;
            self.pan(dx, dy);
        }
        self.last_mouse = Some((x, y));
    }

    /// Reset drag state when mouse button released
    pub fn end_drag(&mut self) {
        self.last_mouse = None;
    }

    pub fn set_mouse_pos(&mut self, col: u16, row: u16) {
        self.mouse_pos = Some((col, row));
    }

    /// Geographic position under the mouse, if it is over the map
    pub fn cursor_coordinate(&self) -> Option<GeoCoordinate> {
        let (col, row) = self.mouse_pos?;
        let (px, py) = cell_to_pixel(col, row);
        self.viewport.unproject(px, py)
    }

    /// Get current center coordinates as a string
    pub fn center_coords(&self) -> String {
        format_coordinate(&self.viewport.center)
    }

    pub fn radius_label(&self) -> String {
        format!("r={:.0}", self.viewport.radius)
    }
}

/// Terminal cell to braille dot coordinates, accounting for the 1 cell border
fn cell_to_pixel(col: u16, row: u16) -> (f64, f64) {
    let px = col.saturating_sub(1) as f64 * 2.0;
    let py = row.saturating_sub(1) as f64 * 4.0;
    (px, py)
}

pub fn format_coordinate(coord: &GeoCoordinate) -> String {
    let lat = coord.lat_degrees();
    let lon = coord.lon_degrees();
    format!(
        "{:.1}°{}, {:.1}°{}",
        lat.abs(),
        if lat >= 0.0 { "N" } else { "S" },
        lon.abs(),
        if lon >= 0.0 { "E" } else { "W" }
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app() -> App {
        App::new(102, 53, Projection::Mercator, GeoCoordinate::default())
    }

    #[test]
    fn test_new_fits_world() {
        let app = app();
        assert_eq!(app.viewport.width, 200);
        assert_eq!(app.viewport.height, 200);
        assert!((app.viewport.globe_width() - 200.0).abs() < 1e-9);
    }

    #[test]
    fn test_pan_east_and_wrap() {
        let mut app = app();
        let r = app.viewport.radius;
        app.pan(std::f64::consts::PI * r * 1.5, 0.0);
        // 270 degrees east is 90 degrees west
        assert!((app.viewport.center.lon_degrees() + 90.0).abs() < 1e-9);
    }

    #[test]
    fn test_pan_north_stops_at_map_edge() {
        let mut app = app();
        app.pan(0.0, -1e6);
        let max = Projection::Mercator.max_lat();
        assert!((app.viewport.center.lat() - max).abs() < 1e-9);
    }

    #[test]
    fn test_zoom_clamped() {
        let mut app = app();
        for _ in 0..200 {
            app.zoom_in();
        }
        assert_eq!(app.viewport.radius, MAX_RADIUS);
        for _ in 0..400 {
            app.zoom_out();
        }
        assert_eq!(app.viewport.radius, MIN_RADIUS);
    }

    #[test]
    fn test_zoom_at_keeps_point_under_cursor() {
        let mut app = app();
        let (col, row) = (70, 20);
        app.set_mouse_pos(col, row);
        let before = app.cursor_coordinate().unwrap();
        app.zoom_in_at(col, row);
        let after = app.cursor_coordinate().unwrap();
        assert!((before.lon() - after.lon()).abs() < 1e-9);
        assert!((before.lat() - after.lat()).abs() < 1e-9);
        assert!(app.viewport.radius > 200.0 / std::f64::consts::TAU);
    }

    #[test]
    fn test_cycle_and_reset() {
        let mut app = app();
        app.cycle_projection();
        assert_eq!(app.viewport.projection, Projection::Miller);
        app.pan(30.0, 10.0);
        app.zoom_in();
        app.reset_view();
        assert_eq!(app.viewport.projection, Projection::Mercator);
        assert_eq!(app.viewport.center, GeoCoordinate::default());
    }

    #[test]
    fn test_format_coordinate() {
        assert_eq!(format_coordinate(&GeoCoordinate::from_degrees(-74.0, 40.5)), "40.5°N, 74.0°W");
    }
}
