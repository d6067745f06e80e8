use std::time::Instant;

use tracing::{info, warn};
use tui_globe::config::GlobeConfig;
use tui_globe::data::{Coastline, CountryEntry, DirectorySource};
use tui_globe::globe::{FrameEvent, Globe, GlobeScene};
use tui_globe::map::{GlobeLayers, GlobeRenderer, GlobeView};
use tui_globe::quiz::{QuizSession, Verdict, RESULT_VISIBLE};
use tui_globe::sphere::LatLng;

/// Longest answer the input line accepts
const MAX_INPUT: usize = 48;

/// Application state
pub struct App {
    pub globe: Globe<GlobeScene, DirectorySource>,
    pub renderer: GlobeRenderer,
    pub quiz: QuizSession,
    catalog: Vec<CountryEntry>,
    /// Current answer being typed
    pub input: String,
    pub should_quit: bool,
    /// Current mouse position for the hover readout
    pub mouse_pos: Option<(u16, u16)>,
    /// Shown in the status bar when a country could not be loaded
    pub notice: Option<String>,
    clear_input_at: Option<Instant>,
    /// Globe area in characters
    map_size: (usize, usize),
}

impl App {
    pub fn new(
        config: GlobeConfig,
        catalog: Vec<CountryEntry>,
        coastlines: Vec<Coastline>,
        size: (usize, usize),
        seed: u64,
        now: Instant,
    ) -> Self {
        let source = DirectorySource::new(&config.data_dir);
        let quiz = QuizSession::new(&catalog, config.session_size, config.max_chances, seed);
        let mut app = Self {
            globe: Globe::new(GlobeScene::new(), source, config),
            renderer: GlobeRenderer::new(coastlines),
            quiz,
            catalog,
            input: String::new(),
            should_quit: false,
            mouse_pos: None,
            notice: None,
            clear_input_at: None,
            map_size: (0, 0),
        };
        app.resize(size.0, size.1);
        app.show_current(now);
        app
    }

    /// Update the globe area when the terminal resizes
    pub fn resize(&mut self, width: usize, height: usize) {
        // 2 for the border, 3 status lines
        let inner_width = width.saturating_sub(2);
        let inner_height = height.saturating_sub(5);
        self.map_size = (inner_width, inner_height);
        // Braille gives 2x4 dots per character; fit the globe to the tighter side
        let fit = (inner_width * 2).min(inner_height * 4);
        self.globe.set_viewport_width(fit as f64);
    }

    pub fn map_size(&self) -> (usize, usize) {
        self.map_size
    }

    /// Advance animations and the quiz
    pub fn tick(&mut self, now: Instant) {
        if let FrameEvent::Settled { focus, installed } = self.globe.tick(now) {
            info!(?focus, installed, "globe settled");
        }
        if self.clear_input_at.is_some_and(|at| now >= at) {
            self.clear_input_at = None;
            self.input.clear();
        }
        if self.quiz.poll(now).is_some() {
            self.input.clear();
            self.clear_input_at = None;
            self.show_current(now);
        }
    }

    pub fn type_char(&mut self, c: char) {
        if self.input.chars().count() < MAX_INPUT && !c.is_control() {
            self.input.push(c);
        }
    }

    pub fn backspace(&mut self) {
        self.input.pop();
    }

    pub fn submit(&mut self, now: Instant) -> Verdict {
        let verdict = self.quiz.submit(&self.input, now);
        if let Verdict::Wrong { .. } = verdict {
            self.clear_input_at = Some(now + RESULT_VISIBLE);
        }
        verdict
    }

    /// Start a fresh session with a new draw of countries
    pub fn restart(&mut self, seed: u64, now: Instant) {
        let config = self.globe.config();
        self.quiz = QuizSession::new(&self.catalog, config.session_size, config.max_chances, seed);
        self.input.clear();
        self.clear_input_at = None;
        self.globe.reset();
        self.show_current(now);
    }

    fn show_current(&mut self, now: Instant) {
        self.notice = None;
        let Some(country) = self.quiz.current() else {
            return;
        };
        let (code, style) = (country.cca2.clone(), country.style);
        if let Err(err) = self.globe.show_country(&code, style, now) {
            warn!(%code, "showing country failed: {err}");
            self.notice = Some(format!("no map data for {code}"));
        }
    }

    pub fn render_layers(&self) -> GlobeLayers {
        let (w, h) = self.map_size;
        self.renderer.render(self.globe.node(), self.globe.radius(), w, h)
    }

    /// Update mouse cursor position
    pub fn set_mouse_pos(&mut self, col: u16, row: u16) {
        self.mouse_pos = Some((col, row));
    }

    /// Geographic position under the mouse, if it is over the globe
    pub fn hovered(&self) -> Option<LatLng> {
        let (col, row) = self.mouse_pos?;
        // Account for border (1 cell offset); aim at the middle of the cell
        let px = col.checked_sub(1)? as f64 * 2.0 + 1.0;
        let py = row.checked_sub(1)? as f64 * 4.0 + 2.0;
        let (w, h) = self.map_size;
        let node = self.globe.node();
        GlobeView::of(node, node.scale, w * 2, h * 4).unproject(px, py, self.globe.radius())
    }

    /// Request quit
    pub fn quit(&mut self) {
        self.should_quit = true;
    }
}

/// Format a position as e.g. `12.3°N, 45.6°W`
pub fn format_lat_lng(p: LatLng) -> String {
    format!(
        "{:.1}°{}, {:.1}°{}",
        p.lat.abs(),
        if p.lat >= 0.0 { "N" } else { "S" },
        p.lng.abs(),
        if p.lng >= 0.0 { "E" } else { "W" }
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::time::Duration;
    use tui_globe::mesh::HighlightStyle;

    fn fixture() -> (tempfile::TempDir, App, Instant) {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("country")).unwrap();
        fs::write(
            dir.path().join("country").join("AA.json"),
            r#"{"type":"FeatureCollection","features":[{"type":"Feature","properties":{},"geometry":{"type":"Polygon","coordinates":[[[0,0],[2,0],[2,2],[0,2],[0,0]]]}}]}"#,
        )
        .unwrap();
        let catalog = vec![
            CountryEntry { cca2: "AA".into(), name: "Alpha".into(), style: HighlightStyle::Lines },
            CountryEntry { cca2: "BB".into(), name: "Beta".into(), style: HighlightStyle::Pin },
        ];
        let config = GlobeConfig {
            data_dir: dir.path().to_path_buf(),
            viewport_margin: 4.0,
            ..GlobeConfig::default()
        };
        let now = Instant::now();
        let app = App::new(config, catalog, Vec::new(), (82, 45), 3, now);
        (dir, app, now)
    }

    #[test]
    fn test_viewport_fits_tighter_side() {
        let (_dir, app, _) = fixture();
        assert_eq!(app.map_size(), (80, 40));
        // min(160, 160) wide, 4 margin on each side
        assert_eq!(app.globe.radius(), 76.0);
    }

    #[test]
    fn test_missing_country_sets_notice() {
        let (_dir, mut app, now) = fixture();
        // Play through whichever country comes first
        for _ in 0..2 {
            if app.quiz.current().map(|c| c.cca2.as_str()) == Some("BB") {
                assert_eq!(app.notice.as_deref(), Some("no map data for BB"));
            } else {
                assert!(app.notice.is_none());
            }
            let name = app.quiz.current().unwrap().name.clone();
            app.input = name;
            assert_eq!(app.submit(now), Verdict::Correct);
            app.tick(now + Duration::from_secs(2));
        }
        assert!(app.quiz.is_finished());
        assert_eq!(app.quiz.score(), 2);
    }

    #[test]
    fn test_wrong_guess_clears_input_later() {
        let (_dir, mut app, now) = fixture();
        for c in "nope".chars() {
            app.type_char(c);
        }
        assert!(matches!(app.submit(now), Verdict::Wrong { .. }));
        app.tick(now + Duration::from_millis(500));
        assert_eq!(app.input, "nope");
        app.tick(now + RESULT_VISIBLE);
        assert!(app.input.is_empty());
    }
}
