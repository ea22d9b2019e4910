mod app;
mod config;
mod ui;

use std::fs::File;
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{Context, Result};
use app::App;
use clap::Parser;
use config::Cli;
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, MouseButton,
    MouseEvent, MouseEventKind,
};
use crossterm::execute;
use cylmap::data;
use ratatui::DefaultTerminal;
use tracing::info;

/// Graticule spacing in degrees
const GRATICULE_STEP: f64 = 30.0;
/// Pan step in braille dots
const PAN_STEP: f64 = 10.0;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli)?;

    let mut terminal = ratatui::init();
    terminal.clear()?;
    execute!(std::io::stdout(), EnableMouseCapture)?;

    let result = run(&mut terminal, &cli);

    let _ = execute!(std::io::stdout(), DisableMouseCapture);
    ratatui::restore();

    result
}

/// Log to a file when asked to; stdout belongs to the terminal UI
fn init_logging(cli: &Cli) -> Result<()> {
    let Some(path) = &cli.log_file else {
        return Ok(());
    };
    let file = File::create(path).with_context(|| format!("creating log file {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_max_level(cli.log_level)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}

/// Handle mouse events for panning and zooming
fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    app.set_mouse_pos(mouse.column, mouse.row);

    match mouse.kind {
        MouseEventKind::ScrollUp => app.zoom_in_at(mouse.column, mouse.row),
        MouseEventKind::ScrollDown => app.zoom_out_at(mouse.column, mouse.row),
        // Horizontal scroll (trackpad two-finger swipe)
        MouseEventKind::ScrollLeft => app.pan(-15.0, 0.0),
        MouseEventKind::ScrollRight => app.pan(15.0, 0.0),
        MouseEventKind::Down(MouseButton::Left) => {
            app.last_mouse = Some((mouse.column, mouse.row));
        }
        MouseEventKind::Drag(MouseButton::Left) => {
            app.handle_drag(mouse.column, mouse.row);
        }
        MouseEventKind::Up(MouseButton::Left) => {
            app.end_drag();
        }
        _ => {}
    }
}

fn load_map(app: &mut App, cli: &Cli) {
    if cli.data_dir.exists() {
        let count = data::load_all(&mut app.map_renderer, &cli.data_dir);
        info!(count, dir = %cli.data_dir.display(), "map data loaded");
    }
    if !app.map_renderer.has_data() {
        info!("no map data found, using the built-in world");
        data::generate_simple_world(&mut app.map_renderer);
    }
    data::add_graticule(&mut app.map_renderer, GRATICULE_STEP);
}

fn run(terminal: &mut DefaultTerminal, cli: &Cli) -> Result<()> {
    let size = terminal.size()?;
    let mut app = App::new(size.width as usize, size.height as usize, cli.projection, cli.center());
    load_map(&mut app, cli);

    loop {
        terminal.draw(|frame| ui::render(frame, &app))?;

        if event::poll(Duration::from_millis(16))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => match key.code {
                    KeyCode::Char('q') | KeyCode::Esc => app.quit(),

                    KeyCode::Left | KeyCode::Char('h') => app.pan(-PAN_STEP, 0.0),
                    KeyCode::Right | KeyCode::Char('l') => app.pan(PAN_STEP, 0.0),
                    KeyCode::Up | KeyCode::Char('k') => app.pan(0.0, -PAN_STEP),
                    KeyCode::Down | KeyCode::Char('j') => app.pan(0.0, PAN_STEP),

                    KeyCode::Char('+') | KeyCode::Char('=') => app.zoom_in(),
                    KeyCode::Char('-') | KeyCode::Char('_') => app.zoom_out(),

                    KeyCode::Char('p') | KeyCode::Char('P') => app.cycle_projection(),
                    KeyCode::Char('t') | KeyCode::Char('T') => app.map_renderer.toggle_tessellation(),
                    KeyCode::Char('g') | KeyCode::Char('G') => app.map_renderer.toggle_graticule(),
                    KeyCode::Char('b') | KeyCode::Char('B') => app.map_renderer.toggle_borders(),

                    KeyCode::Char('r') | KeyCode::Char('0') => app.reset_view(),

                    _ => {}
                },
                Event::Mouse(mouse) => handle_mouse(&mut app, mouse),
                Event::Resize(width, height) => app.resize(width as usize, height as usize),
                _ => {}
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}
