use crate::app::{format_coordinate, App};
use cylmap::braille::BrailleCanvas;
use cylmap::map::MapLayers;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
    Frame,
};

/// Render the UI
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    // Split into map area and status bar
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(3),    // Map
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    let polygons = render_map(frame, app, chunks[0]);
    render_status_bar(frame, app, polygons, chunks[1]);
}

/// Draw the map and return the number of polygons it took
fn render_map(frame: &mut Frame, app: &App, area: Rect) -> usize {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(Span::styled(
            format!(" {} ", app.viewport.projection.name()),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    // Braille gives 2x4 resolution per character
    let viewport = app
        .viewport
        .clone()
        .with_size(inner.width as usize * 2, inner.height as usize * 4);

    let layers = app.map_renderer.render(&viewport);
    let polygons = layers.polygon_count;

    let cursor_pos = app.mouse_pos.and_then(|(col, row)| {
        let cx = col.checked_sub(inner.x)?;
        let cy = row.checked_sub(inner.y)?;
        (cx < inner.width && cy < inner.height).then_some((cx, cy))
    });

    frame.render_widget(MapWidget { layers, cursor_pos }, inner);
    polygons
}

/// Braille map layers with a cursor marker on top
struct MapWidget {
    layers: MapLayers,
    cursor_pos: Option<(u16, u16)>,
}

/// Render a braille canvas layer with a specific color
fn render_layer(canvas: &BrailleCanvas, color: Color, area: Rect, buf: &mut Buffer) {
    for (row_idx, row_str) in canvas.rows().enumerate().take(area.height as usize) {
        let y = area.y + row_idx as u16;

        for (col_idx, ch) in row_str.chars().enumerate().take(area.width as usize) {
            // Empty braille cell
            if ch == '\u{2800}' {
                continue;
            }
            let x = area.x + col_idx as u16;
            buf[(x, y)].set_char(ch).set_fg(color);
        }
    }
}

impl Widget for MapWidget {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // Back to front
        render_layer(&self.layers.frame, Color::DarkGray, area, buf);
        render_layer(&self.layers.graticule, Color::Blue, area, buf);
        render_layer(&self.layers.borders, Color::Yellow, area, buf);
        render_layer(&self.layers.coastlines, Color::Cyan, area, buf);
        render_layer(&self.layers.points, Color::White, area, buf);

        if let Some((cx, cy)) = self.cursor_pos {
            buf[(area.x + cx, area.y + cy)].set_char('╋').set_fg(Color::Red);
        }
    }
}

fn toggle_span(on: bool, on_label: &'static str, off_label: &'static str) -> Span<'static> {
    Span::styled(
        if on { on_label } else { off_label },
        Style::default().fg(if on { Color::Green } else { Color::DarkGray }),
    )
}

fn render_status_bar(frame: &mut Frame, app: &App, polygons: usize, area: Rect) {
    let settings = &app.map_renderer.settings;
    let dim = Style::default().fg(Color::DarkGray);

    let mut spans = vec![
        Span::styled(" ", dim),
        Span::styled(app.radius_label(), Style::default().fg(Color::Yellow)),
        Span::styled(" detail ", dim),
        Span::styled(app.viewport.max_detail().to_string(), Style::default().fg(Color::Magenta)),
        Span::styled(" polys ", dim),
        Span::styled(polygons.to_string(), Style::default().fg(Color::Magenta)),
        Span::styled(" ", dim),
        toggle_span(settings.tessellate, "[T]ess ", "[t]ess "),
        toggle_span(settings.show_graticule, "[G]rid ", "[g]rid "),
        toggle_span(settings.show_borders, "[B]order ", "[b]order "),
        Span::styled("| ", dim),
        Span::styled(app.center_coords(), Style::default().fg(Color::Cyan)),
    ];

    if let Some(cursor) = app.cursor_coordinate() {
        spans.push(Span::styled(" | ", dim));
        spans.push(Span::styled(format_coordinate(&cursor), Style::default().fg(Color::Red)));
    }
    spans.push(Span::styled(" | hjkl:pan +/-:zoom p:proj r:reset q:quit", dim));

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
