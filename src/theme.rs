//! Light and dark colour palettes for the signal panel.
//! Selection is a lookup keyed by [`ThemeMode`].

use ratatui::style::Color;
use serde::{Deserialize, Serialize};

use crate::signal::Side;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    Light,
    #[default]
    Dark,
}

impl ThemeMode {
    pub fn toggle(self) -> Self {
        match self {
            ThemeMode::Light => ThemeMode::Dark,
            ThemeMode::Dark => ThemeMode::Light,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ThemeMode::Light => "light",
            ThemeMode::Dark => "dark",
        }
    }

    pub fn palette(self) -> &'static Palette {
        match self {
            ThemeMode::Light => &LIGHT,
            ThemeMode::Dark => &DARK,
        }
    }
}

/// Theme colors for the panel
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    pub bg: Color,               // Card background
    pub border: Color,           // Card border
    pub text: Color,             // Prices, titles
    pub text_secondary: Color,   // Row labels, footer text
    pub text_muted: Color,       // Icons, timestamps
    pub text_faint: Color,       // Threshold list
    pub footer_bg: Color,        // Trade id / status block
    pub buy: Color,
    pub sell: Color,
    pub buy_bg: Color,           // Header tint for BUY
    pub sell_bg: Color,          // Header tint for SELL
    pub spinner: Color,
}

impl Palette {
    pub fn side_color(&self, side: Side) -> Color {
        match side {
            Side::Buy => self.buy,
            Side::Sell => self.sell,
        }
    }

    pub fn side_bg(&self, side: Side) -> Color {
        match side {
            Side::Buy => self.buy_bg,
            Side::Sell => self.sell_bg,
        }
    }
}

pub static LIGHT: Palette = Palette {
    bg: Color::Rgb(255, 255, 255),
    border: Color::Rgb(229, 231, 235),
    text: Color::Rgb(17, 24, 39),
    text_secondary: Color::Rgb(75, 85, 99),
    text_muted: Color::Rgb(107, 114, 128),
    text_faint: Color::Rgb(156, 163, 175),
    footer_bg: Color::Rgb(249, 250, 251),
    buy: Color::Rgb(34, 197, 94),
    sell: Color::Rgb(239, 68, 68),
    buy_bg: Color::Rgb(240, 253, 244),
    sell_bg: Color::Rgb(254, 242, 242),
    spinner: Color::Rgb(59, 130, 246),
};

pub static DARK: Palette = Palette {
    bg: Color::Rgb(31, 41, 55),
    border: Color::Rgb(55, 65, 81),
    text: Color::Rgb(255, 255, 255),
    text_secondary: Color::Rgb(209, 213, 219),
    text_muted: Color::Rgb(148, 163, 184),
    text_faint: Color::Rgb(100, 116, 139),
    footer_bg: Color::Rgb(45, 55, 72),
    buy: Color::Rgb(34, 197, 94),
    sell: Color::Rgb(239, 68, 68),
    buy_bg: Color::Rgb(31, 57, 59),   // green over card bg at 10%
    sell_bg: Color::Rgb(52, 44, 56),  // red over card bg at 10%
    spinner: Color::Rgb(59, 130, 246),
};

#[cfg(test)]
mod tests {
    use super::*;

    /// Background and text tokens, the part that must differ between modes
    fn surface_tokens(p: &Palette) -> [Color; 7] {
        [p.bg, p.border, p.text, p.text_secondary, p.text_muted, p.text_faint, p.footer_bg]
    }

    #[test]
    fn test_surface_tokens_disjoint() {
        let light = surface_tokens(ThemeMode::Light.palette());
        let dark = surface_tokens(ThemeMode::Dark.palette());
        for color in light.iter() {
            assert!(!dark.contains(color), "{:?} appears in both palettes", color);
        }
    }

    #[test]
    fn test_palette_lookup_is_stable() {
        assert_eq!(ThemeMode::Dark.palette(), &DARK);
        assert_eq!(ThemeMode::Light.palette(), &LIGHT);
        assert!(std::ptr::eq(ThemeMode::Dark.palette(), ThemeMode::Dark.palette()));
    }

    #[test]
    fn test_side_colors() {
        let palette = ThemeMode::Light.palette();
        assert_eq!(palette.side_color(Side::Buy), palette.buy);
        assert_eq!(palette.side_color(Side::Sell), palette.sell);
        assert_ne!(palette.side_bg(Side::Buy), palette.side_bg(Side::Sell));
    }

    #[test]
    fn test_toggle() {
        assert_eq!(ThemeMode::Light.toggle(), ThemeMode::Dark);
        assert_eq!(ThemeMode::Dark.toggle().toggle(), ThemeMode::Dark);
        assert_eq!(ThemeMode::default(), ThemeMode::Dark);
    }
}
