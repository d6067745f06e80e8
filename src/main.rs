mod app;
mod ui;

use anyhow::{Context, Result};
use app::App;
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers,
    MouseEvent, MouseEventKind,
};
use crossterm::execute;
use ratatui::DefaultTerminal;
use std::path::Path;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};
use tracing::info;
use tui_globe::config::{GlobeConfig, CONFIG_FILE};
use tui_globe::data::{load_basemap, load_catalog};
use tui_globe::logging::init_logging;

fn main() -> Result<()> {
    let config = GlobeConfig::load(Path::new(CONFIG_FILE))?;
    init_logging(&config.log_file)?;

    // Fail before touching the terminal if there is nothing to play
    let catalog = load_catalog(&config.data_dir).context("a country catalog is required")?;
    let coastlines = load_basemap(&config.data_dir);
    info!(countries = catalog.len(), coastlines = coastlines.len(), "starting");

    let mut terminal = ratatui::init();
    terminal.clear()?;
    execute!(std::io::stdout(), EnableMouseCapture)?;

    let result = run(&mut terminal, config, catalog, coastlines);

    let _ = execute!(std::io::stdout(), DisableMouseCapture);
    ratatui::restore();

    result
}

fn seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}

fn handle_key(app: &mut App, key: KeyEvent) {
    let now = Instant::now();
    match key.code {
        KeyCode::Esc => app.quit(),
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => app.quit(),
        KeyCode::Enter => {
            let verdict = app.submit(now);
            info!(?verdict, "answer submitted");
        }
        KeyCode::Backspace => app.backspace(),
        KeyCode::F(2) => app.restart(seed(), now),
        KeyCode::F(3) => app.renderer.toggle_graticule(),
        KeyCode::F(4) => app.renderer.toggle_coastlines(),
        KeyCode::Char(c) => app.type_char(c),
        _ => {}
    }
}

fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    if let MouseEventKind::Moved | MouseEventKind::Drag(_) = mouse.kind {
        app.set_mouse_pos(mouse.column, mouse.row);
    }
}

fn run(
    terminal: &mut DefaultTerminal,
    config: GlobeConfig,
    catalog: Vec<tui_globe::data::CountryEntry>,
    coastlines: Vec<tui_globe::data::Coastline>,
) -> Result<()> {
    let size = terminal.size()?;
    let mut app = App::new(
        config,
        catalog,
        coastlines,
        (size.width as usize, size.height as usize),
        seed(),
        Instant::now(),
    );

    loop {
        terminal.draw(|frame| ui::render(frame, &app))?;

        // ~60fps
        if event::poll(Duration::from_millis(16))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => handle_key(&mut app, key),
                Event::Mouse(mouse) => handle_mouse(&mut app, mouse),
                Event::Resize(width, height) => app.resize(width as usize, height as usize),
                _ => {}
            }
        }

        app.tick(Instant::now());

        if app.should_quit {
            break;
        }
    }

    Ok(())
}
