use crate::app::{format_lat_lng, App};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph, Widget},
    Frame,
};
use std::time::Instant;
use tui_globe::braille::BrailleCanvas;
use tui_globe::map::GlobeLayers;

/// Render the UI
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(3),    // Globe
            Constraint::Length(1), // Progress
            Constraint::Length(1), // Score, chances, result
            Constraint::Length(1), // Answer input
        ])
        .split(area);

    render_globe(frame, app, chunks[0]);
    render_progress(frame, app, chunks[1]);
    render_status_bar(frame, app, chunks[2]);
    render_input(frame, app, chunks[3]);
}

fn render_globe(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(Span::styled(
            " Name the country ",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ));

    let inner = block.inner(area);
    frame.render_widget(block, area);
    frame.render_widget(GlobeWidget { layers: app.render_layers() }, inner);
}

/// Braille layers stacked back to front, one colour each
struct GlobeWidget {
    layers: GlobeLayers,
}

fn render_layer(canvas: &BrailleCanvas, color: Color, area: Rect, buf: &mut Buffer) {
    for (row_idx, row_str) in canvas.rows().enumerate() {
        if row_idx >= area.height as usize {
            break;
        }
        let y = area.y + row_idx as u16;

        for (col_idx, ch) in row_str.chars().enumerate() {
            if col_idx >= area.width as usize {
                break;
            }
            // Skip empty braille characters (U+2800)
            if ch == '\u{2800}' {
                continue;
            }
            let x = area.x + col_idx as u16;
            buf[(x, y)].set_char(ch).set_fg(color);
        }
    }
}

impl Widget for GlobeWidget {
    fn render(self, area: Rect, buf: &mut Buffer) {
        render_layer(&self.layers.limb, Color::DarkGray, area, buf);
        render_layer(&self.layers.graticule, Color::DarkGray, area, buf);
        render_layer(&self.layers.coastlines, Color::Cyan, area, buf);
        render_layer(&self.layers.regions, Color::Yellow, area, buf);
        render_layer(&self.layers.pins, Color::Red, area, buf);
    }
}

fn render_progress(frame: &mut Frame, app: &App, area: Rect) {
    let (current, total) = app.quiz.progress();
    let ratio = if total == 0 { 0.0 } else { current as f64 / total as f64 };
    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(Color::Green).bg(Color::Black))
        .ratio(ratio.clamp(0.0, 1.0))
        .label(format!("{current}/{total}"));
    frame.render_widget(gauge, area);
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let now = Instant::now();
    let left = app.quiz.chances_left();
    let flags: String = (0..app.quiz.max_chances())
        .map(|i| if i < left { '⚑' } else { '⚐' })
        .collect();

    let mut spans = vec![
        Span::styled(" Score: ", Style::default().fg(Color::DarkGray)),
        Span::styled(app.quiz.score().to_string(), Style::default().fg(Color::Yellow)),
        Span::styled("  Chances: ", Style::default().fg(Color::DarkGray)),
        Span::styled(flags, Style::default().fg(Color::Red)),
        Span::raw("  "),
    ];

    if let Some(feedback) = app.quiz.feedback(now) {
        let color = if feedback.positive { Color::Green } else { Color::Red };
        spans.push(Span::styled(
            feedback.text.clone(),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ));
    } else if let Some(notice) = &app.notice {
        spans.push(Span::styled(notice.clone(), Style::default().fg(Color::Magenta)));
    }

    if let Some(hovered) = app.hovered() {
        spans.push(Span::styled(" | ", Style::default().fg(Color::DarkGray)));
        spans.push(Span::styled(format_lat_lng(hovered), Style::default().fg(Color::Cyan)));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_input(frame: &mut Frame, app: &App, area: Rect) {
    let line = Line::from(vec![
        Span::styled(" > ", Style::default().fg(Color::Cyan)),
        Span::styled(app.input.clone(), Style::default().fg(Color::White)),
        Span::styled("_", Style::default().fg(Color::DarkGray).add_modifier(Modifier::SLOW_BLINK)),
        Span::styled(
            "   enter:answer F2:new game F3:grid F4:coast esc:quit",
            Style::default().fg(Color::DarkGray),
        ),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}
