pub mod panel;

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::app::{App, Popup};
use crate::theme::Palette;
use panel::SignalPanel;

/// Largest size the card grows to
const PANEL_WIDTH: u16 = 52;
const PANEL_HEIGHT: u16 = 18;

pub fn draw(f: &mut Frame, app: &App) {
    let area = f.area();
    let palette = app.theme.palette();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(0)
        .constraints([
            Constraint::Length(1),               // Info line
            Constraint::Min(5),                  // Panel
            Constraint::Length(1),               // Footer
        ])
        .split(area);

    draw_info_line(f, app, palette, chunks[0]);

    let panel = SignalPanel::new(app.signal.as_ref(), app.is_loading, app.theme)
        .time_format(&app.time_format)
        .spinner_frame(app.spinner_frame);
    f.render_widget(panel, panel_rect(chunks[1]));

    draw_footer(f, palette, chunks[2]);

    // Draw popups on top
    match app.popup {
        Popup::None => {}
        Popup::Help => draw_help_popup(f, palette),
    }
}

/// Centre the card, shrinking it on small terminals
fn panel_rect(area: Rect) -> Rect {
    let width = PANEL_WIDTH.min(area.width);
    let height = PANEL_HEIGHT.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

fn draw_info_line(f: &mut Frame, app: &App, p: &Palette, area: Rect) {
    // Priority: status message > source file > hint
    let line = if let Some(ref status) = app.status_message {
        Line::from(Span::styled(status.as_str(), Style::default().fg(p.text)))
    } else if let Some(ref source) = app.source {
        Line::from(vec![
            Span::styled(source.display().to_string(), Style::default().fg(p.text_muted)),
            Span::styled(" │ ", Style::default().fg(p.border)),
            Span::styled(app.theme.label(), Style::default().fg(p.text_muted)),
        ])
    } else {
        Line::from(Span::styled("No signal file", Style::default().fg(p.text_muted)))
    };

    let info = Paragraph::new(line).alignment(Alignment::Center);
    f.render_widget(info, area);
}

fn draw_footer(f: &mut Frame, p: &Palette, area: Rect) {
    let hints = [("t", "Theme"), ("r", "Reload"), ("c", "Clear"), ("h", "Help"), ("q", "Quit")];

    // Responsive: show fewer hints on narrow terminals
    let max_hints = if area.width < 40 { 3 } else { hints.len() };

    let hint_spans: Vec<Span> = hints
        .iter()
        .take(max_hints)
        .flat_map(|(key, action)| {
            vec![
                Span::styled(*key, Style::default().fg(p.spinner)),
                Span::styled(format!(" {} │ ", action), Style::default().fg(p.text_muted)),
            ]
        })
        .collect();

    let footer = Paragraph::new(Line::from(hint_spans)).alignment(Alignment::Center);
    f.render_widget(footer, area);
}

fn draw_help_popup(f: &mut Frame, p: &Palette) {
    let area = f.area();
    let popup_area = centered_rect(
        if area.width < 80 { 95 } else { 60 },
        if area.height < 30 { 90 } else { 60 },
        area,
    );

    f.render_widget(Clear, popup_area);

    let heading = Style::default().fg(p.text).add_modifier(Modifier::BOLD);
    let key = Style::default().fg(p.spinner);

    let help_text = vec![
        Line::from(Span::styled("═══ Keys ═══", heading)),
        Line::from(vec![Span::styled("  t         ", key), Span::raw("Switch light/dark theme")]),
        Line::from(vec![Span::styled("  r         ", key), Span::raw("Reload the signal file")]),
        Line::from(vec![Span::styled("  c         ", key), Span::raw("Clear the current signal")]),
        Line::from(vec![Span::styled("  q/Ctrl-C  ", key), Span::raw("Quit")]),
        Line::from(""),
        Line::from(Span::styled("═══ Command Line ═══", heading)),
        Line::from(vec![Span::styled("  signal-panel -f signal.json   ", key), Span::raw("Watch a file")]),
        Line::from(vec![Span::styled("  signal-panel --print          ", key), Span::raw("Print the card once")]),
        Line::from(vec![Span::styled("  signal-panel --status         ", key), Span::raw("JSON for status bars")]),
        Line::from(""),
        Line::from(Span::styled("═══ Requirements ═══", heading)),
        Line::from(Span::raw("  Shown while waiting; the panel does not filter signals")),
        Line::from(""),
        Line::from(vec![
            Span::styled("  Press ", Style::default().fg(p.text_muted)),
            Span::styled("h", key),
            Span::styled("/", Style::default().fg(p.text_muted)),
            Span::styled("Esc", key),
            Span::styled(" to close", Style::default().fg(p.text_muted)),
        ]),
    ];

    let help = Paragraph::new(help_text)
        .style(Style::default().fg(p.text_secondary).bg(p.bg))
        .block(
            Block::default()
                .title(Span::styled(" signal-panel Help ", key))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(p.border)),
        )
        .wrap(Wrap { trim: false });

    f.render_widget(help, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::theme::ThemeMode;
    use ratatui::{backend::TestBackend, Terminal};

    fn screen_text(terminal: &Terminal<TestBackend>) -> String {
        let buf = terminal.backend().buffer();
        buf.content().iter().map(|cell| cell.symbol()).collect()
    }

    #[test]
    fn test_panel_rect_is_centered() {
        let rect = panel_rect(Rect::new(0, 1, 100, 30));
        assert_eq!(rect, Rect::new(24, 7, PANEL_WIDTH, PANEL_HEIGHT));

        let small = panel_rect(Rect::new(0, 0, 20, 6));
        assert_eq!(small, Rect::new(0, 0, 20, 6));
    }

    #[test]
    fn test_draw_waiting_screen() {
        let app = App::new(AppConfig::default(), None, ThemeMode::Dark);
        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        terminal.draw(|f| draw(f, &app)).unwrap();

        let text = screen_text(&terminal);
        assert!(text.contains("No signal file"));
        assert!(text.contains("Waiting for Signal"));
        assert!(text.contains("Confidence > 82%"));
    }

    #[test]
    fn test_draw_help_popup() {
        let mut app = App::new(AppConfig::default(), None, ThemeMode::Light);
        app.popup = Popup::Help;
        let mut terminal = Terminal::new(TestBackend::new(80, 30)).unwrap();
        terminal.draw(|f| draw(f, &app)).unwrap();

        assert!(screen_text(&terminal).contains("Switch light/dark theme"));
    }
}
