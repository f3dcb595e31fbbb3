//! The signal card widget.
//!
//! Three mutually exclusive display states, picked by [`PanelState::select`]:
//! the loading flag wins over signal presence, presence wins over the card.

use chrono::Local;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

use crate::format::{
    format_confidence, format_price, format_risk_reward, format_status, format_time,
    DEFAULT_TIME_FORMAT,
};
use crate::signal::{Side, Signal};
use crate::theme::{Palette, ThemeMode};

/// Acceptance thresholds listed while waiting. Display only, nothing enforces them.
pub const THRESHOLDS: [&str; 3] = ["Confidence > 82%", "Spread < 0.2 pips", "Slippage < 0.1 pips"];

pub const SPINNER_FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

pub const UP_ICON: &str = "▲";
pub const DOWN_ICON: &str = "▼";
const TARGET_ICON: &str = "◎";
const SHIELD_ICON: &str = "◆";
const CLOCK_ICON: &str = "◷";
const ZAP_ICON: &str = "ϟ";

const LABEL_WIDTH: usize = 14;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PanelState<'a> {
    Loading,
    Empty,
    Populated(&'a Signal),
}

impl<'a> PanelState<'a> {
    pub fn select(signal: Option<&'a Signal>, is_loading: bool) -> Self {
        if is_loading {
            return PanelState::Loading;
        }
        match signal {
            Some(signal) => PanelState::Populated(signal),
            None => PanelState::Empty,
        }
    }
}

pub fn side_icon(side: Side) -> &'static str {
    match side {
        Side::Buy => UP_ICON,
        Side::Sell => DOWN_ICON,
    }
}

pub struct SignalPanel<'a> {
    state: PanelState<'a>,
    palette: &'static Palette,
    time_format: &'a str,
    spinner_frame: usize,
}

impl<'a> SignalPanel<'a> {
    pub fn new(signal: Option<&'a Signal>, is_loading: bool, theme: ThemeMode) -> Self {
        Self {
            state: PanelState::select(signal, is_loading),
            palette: theme.palette(),
            time_format: DEFAULT_TIME_FORMAT,
            spinner_frame: 0,
        }
    }

    pub fn time_format(mut self, pattern: &'a str) -> Self {
        self.time_format = pattern;
        self
    }

    pub fn spinner_frame(mut self, frame: usize) -> Self {
        self.spinner_frame = frame;
        self
    }

    /// Panel content, independent of the area it is drawn into
    pub fn lines(&self) -> Vec<Line<'static>> {
        match self.state {
            PanelState::Loading => self.loading_lines(),
            PanelState::Empty => self.empty_lines(),
            PanelState::Populated(signal) => self.signal_lines(signal),
        }
    }

    /// Panel content without styling, for `--print`
    pub fn plain_text(&self) -> String {
        self.lines()
            .iter()
            .map(|line| line.spans.iter().map(|s| s.content.as_ref()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn loading_lines(&self) -> Vec<Line<'static>> {
        let glyph = SPINNER_FRAMES[self.spinner_frame % SPINNER_FRAMES.len()];
        vec![Line::from(Span::styled(
            glyph,
            Style::default().fg(self.palette.spinner).add_modifier(Modifier::BOLD),
        ))]
    }

    fn empty_lines(&self) -> Vec<Line<'static>> {
        let p = self.palette;
        let mut lines = vec![
            Line::from(Span::styled(ZAP_ICON, Style::default().fg(p.text_muted))),
            Line::from(""),
            Line::from(Span::styled(
                "Waiting for Signal",
                Style::default().fg(p.text).add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                "AI is analyzing market conditions...",
                Style::default().fg(p.text_secondary),
            )),
            Line::from(""),
            Line::from(Span::styled("Requirements:", Style::default().fg(p.text_faint))),
        ];

        lines.extend(THRESHOLDS.iter().map(|threshold| {
            Line::from(Span::styled(format!("• {}", threshold), Style::default().fg(p.text_faint)))
        }));

        lines
    }

    fn signal_lines(&self, signal: &Signal) -> Vec<Line<'static>> {
        let p = self.palette;
        let side_color = p.side_color(signal.side);
        let header_bg = Style::default().bg(p.side_bg(signal.side));
        let footer_bg = Style::default().bg(p.footer_bg);

        vec![
            Line::from(vec![
                Span::styled(format!(" {} ", side_icon(signal.side)), Style::default().fg(side_color)),
                Span::styled(
                    format!("{} {}", signal.side.label(), signal.symbol),
                    Style::default().fg(side_color).add_modifier(Modifier::BOLD),
                ),
            ])
            .style(header_bg),
            Line::from(vec![
                Span::raw("   "),
                Span::styled(
                    format!("Confidence: {}", format_confidence(signal.confidence)),
                    Style::default().fg(p.text_secondary),
                ),
            ])
            .style(header_bg),
            Line::from(""),
            self.row(TARGET_ICON, p.text_muted, "Entry", format_price(signal.entry), p.text),
            self.row(UP_ICON, p.buy, "Take Profit", format_price(signal.take_profit), p.buy),
            self.row(SHIELD_ICON, p.sell, "Stop Loss", format_price(signal.stop_loss), p.sell),
            self.row(" ", p.text_muted, "Risk:Reward", format_risk_reward(signal.risk_reward), p.text),
            Line::from(Span::styled("─".repeat(LABEL_WIDTH + 16), Style::default().fg(p.border))),
            Line::from(vec![
                Span::styled(format!(" {} ", CLOCK_ICON), Style::default().fg(p.text_muted)),
                Span::styled(format!("{:<LABEL_WIDTH$}", "Generated"), Style::default().fg(p.text_muted)),
                Span::styled(
                    format_time(&signal.timestamp, &Local, self.time_format),
                    Style::default().fg(p.text_muted),
                ),
            ]),
            Line::from(""),
            Line::from(vec![
                Span::styled(" Trade ID: ", Style::default().fg(p.text_secondary).add_modifier(Modifier::BOLD)),
                Span::styled(signal.id.clone(), Style::default().fg(p.text_secondary)),
            ])
            .style(footer_bg),
            Line::from(vec![
                Span::styled(" Status: ", Style::default().fg(p.text_secondary).add_modifier(Modifier::BOLD)),
                Span::styled(format_status(&signal.status), Style::default().fg(p.text_secondary)),
            ])
            .style(footer_bg),
        ]
    }

    fn row(&self, icon: &str, icon_color: Color, label: &str, value: String, value_color: Color) -> Line<'static> {
        Line::from(vec![
            Span::styled(format!(" {} ", icon), Style::default().fg(icon_color)),
            Span::styled(
                format!("{:<LABEL_WIDTH$}", label),
                Style::default().fg(self.palette.text_secondary).add_modifier(Modifier::BOLD),
            ),
            Span::styled(value, Style::default().fg(value_color)),
        ])
    }
}

impl Widget for SignalPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let p = self.palette;
        let block = Block::default()
            .title(Span::styled(" Signal ", Style::default().fg(p.text).add_modifier(Modifier::BOLD)))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(p.border))
            .style(Style::default().bg(p.bg));

        let inner = block.inner(area);
        block.render(area, buf);

        let lines = self.lines();
        let (alignment, top) = match self.state {
            // Loading and waiting content sit in the middle of the card
            PanelState::Loading | PanelState::Empty => (
                Alignment::Center,
                inner.height.saturating_sub(lines.len() as u16) / 2,
            ),
            PanelState::Populated(_) => (Alignment::Left, 0),
        };

        let content = Rect {
            y: inner.y + top.min(inner.height),
            height: inner.height.saturating_sub(top),
            ..inner
        };

        // Tinted rows (header, footer) fill the whole card width
        for (i, line) in lines.iter().enumerate().take(content.height as usize) {
            if let Some(bg) = line.style.bg {
                buf.set_style(
                    Rect::new(content.x, content.y + i as u16, content.width, 1),
                    Style::default().bg(bg),
                );
            }
        }

        Paragraph::new(lines).alignment(alignment).render(content, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn sample_signal(side: Side) -> Signal {
        Signal {
            id: "sig-42".to_string(),
            symbol: "EURUSD".to_string(),
            side,
            confidence: 0.8234,
            entry: 1.23456789,
            take_profit: 1.23956,
            stop_loss: 1.23256,
            risk_reward: 2.5,
            timestamp: Utc.with_ymd_and_hms(2024, 3, 1, 15, 4, 5).unwrap(),
            status: "active".to_string(),
        }
    }

    fn buffer_text(buf: &Buffer) -> String {
        let area = buf.area;
        let mut text = String::new();
        for y in area.top()..area.bottom() {
            for x in area.left()..area.right() {
                text.push_str(buf[(x, y)].symbol());
            }
            text.push('\n');
        }
        text
    }

    fn render(panel: SignalPanel) -> Buffer {
        let mut buf = Buffer::empty(Rect::new(0, 0, 48, 18));
        panel.render(buf.area, &mut buf);
        buf
    }

    #[test]
    fn test_state_priority() {
        let signal = sample_signal(Side::Buy);
        assert_eq!(PanelState::select(Some(&signal), true), PanelState::Loading);
        assert_eq!(PanelState::select(None, true), PanelState::Loading);
        assert_eq!(PanelState::select(None, false), PanelState::Empty);
        assert_eq!(PanelState::select(Some(&signal), false), PanelState::Populated(&signal));
    }

    #[test]
    fn test_loading_hides_signal() {
        let signal = sample_signal(Side::Buy);
        let panel = SignalPanel::new(Some(&signal), true, ThemeMode::Dark).spinner_frame(3);
        let text = panel.plain_text();
        assert_eq!(text, SPINNER_FRAMES[3]);

        let buf = render(panel);
        let rendered = buffer_text(&buf);
        assert!(rendered.contains(SPINNER_FRAMES[3]));
        assert!(!rendered.contains("EURUSD"));
    }

    #[test]
    fn test_spinner_frame_wraps() {
        let panel = SignalPanel::new(None, true, ThemeMode::Light).spinner_frame(SPINNER_FRAMES.len() + 1);
        assert_eq!(panel.plain_text(), SPINNER_FRAMES[1]);
    }

    #[test]
    fn test_empty_state_lists_thresholds() {
        let panel = SignalPanel::new(None, false, ThemeMode::Light);

        let text = panel.plain_text();
        assert!(text.contains("Waiting for Signal"));
        assert!(text.contains("AI is analyzing market conditions..."));
        for threshold in ["Confidence > 82%", "Spread < 0.2 pips", "Slippage < 0.1 pips"] {
            assert!(text.lines().any(|l| l == format!("• {}", threshold)), "missing {}", threshold);
        }

        let rendered = buffer_text(&render(panel));
        assert!(rendered.contains("Waiting for Signal"));
        assert!(rendered.contains("Slippage < 0.1 pips"));
    }

    #[test]
    fn test_buy_header_is_green_and_up() {
        let signal = sample_signal(Side::Buy);
        let panel = SignalPanel::new(Some(&signal), false, ThemeMode::Dark);
        let lines = panel.lines();
        let header = &lines[0];

        assert!(header.spans[0].content.contains(UP_ICON));
        assert_eq!(header.spans[0].style.fg, Some(ThemeMode::Dark.palette().buy));
        assert_eq!(header.spans[1].content, "BUY EURUSD");
        assert_eq!(header.spans[1].style.fg, Some(ThemeMode::Dark.palette().buy));
        assert_eq!(header.style.bg, Some(ThemeMode::Dark.palette().buy_bg));
    }

    #[test]
    fn test_sell_header_is_red_and_down() {
        let signal = sample_signal(Side::Sell);
        let panel = SignalPanel::new(Some(&signal), false, ThemeMode::Light);
        let lines = panel.lines();
        let header = &lines[0];

        assert!(header.spans[0].content.contains(DOWN_ICON));
        assert_eq!(header.spans[0].style.fg, Some(ThemeMode::Light.palette().sell));
        assert_eq!(header.spans[1].content, "SELL EURUSD");
        assert_eq!(header.style.bg, Some(ThemeMode::Light.palette().sell_bg));
    }

    #[test]
    fn test_populated_fields() {
        let signal = sample_signal(Side::Buy);
        let panel = SignalPanel::new(Some(&signal), false, ThemeMode::Dark).time_format("%H:%M:%S");
        let text = panel.plain_text();

        assert!(text.contains("Confidence: 82.3%"));
        assert!(text.contains("Entry         1.23457"));
        assert!(text.contains("Take Profit   1.23956"));
        assert!(text.contains("Stop Loss     1.23256"));
        assert!(text.contains("Risk:Reward   1:2.50"));
        assert!(text.contains(&format_time(&signal.timestamp, &Local, "%H:%M:%S")));
        assert!(text.contains("Trade ID: sig-42"));
        assert!(text.contains("Status: ACTIVE"));
    }

    #[test]
    fn test_card_rounds_ties_up() {
        let signal = Signal {
            confidence: 0.8225,
            entry: 0.015625,
            take_profit: -0.015625,
            risk_reward: 2.125,
            ..sample_signal(Side::Sell)
        };
        let text = SignalPanel::new(Some(&signal), false, ThemeMode::Dark).plain_text();

        assert!(text.contains("Confidence: 82.3%"));
        assert!(text.contains("Entry         0.01563"));
        assert!(text.contains("Take Profit   -0.01563"));
        assert!(text.contains("Risk:Reward   1:2.13"));
    }

    #[test]
    fn test_signal_not_mutated() {
        let signal = sample_signal(Side::Sell);
        let before = signal.clone();
        let _ = render(SignalPanel::new(Some(&signal), false, ThemeMode::Dark));
        assert_eq!(signal, before);
    }

    #[test]
    fn test_render_uses_theme_background() {
        let signal = sample_signal(Side::Buy);

        let dark = render(SignalPanel::new(Some(&signal), false, ThemeMode::Dark));
        let light = render(SignalPanel::new(Some(&signal), false, ThemeMode::Light));

        // Corner is border, cell (1, 4) is plain card body
        assert_eq!(dark[(0, 0)].fg, ThemeMode::Dark.palette().border);
        assert_eq!(dark[(1, 4)].bg, ThemeMode::Dark.palette().bg);
        assert_eq!(light[(1, 4)].bg, ThemeMode::Light.palette().bg);

        // Header row is tinted across the whole card width
        assert_eq!(dark[(46, 1)].bg, ThemeMode::Dark.palette().buy_bg);
    }

    #[test]
    fn test_small_area_does_not_panic() {
        let signal = sample_signal(Side::Buy);
        let mut buf = Buffer::empty(Rect::new(0, 0, 6, 3));
        SignalPanel::new(Some(&signal), false, ThemeMode::Dark).render(buf.area, &mut buf);
        let mut buf = Buffer::empty(Rect::new(0, 0, 0, 0));
        SignalPanel::new(None, false, ThemeMode::Light).render(buf.area, &mut buf);
    }
}
