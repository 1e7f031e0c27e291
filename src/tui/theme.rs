use std::collections::HashMap;

use ratatui::style::Color;

/// Color theme for the TUI
#[derive(Debug, Clone)]
pub struct Theme {
    pub background: Color,
    pub text: Color,
    pub text_bright: Color,
    pub highlight: Color,
    pub dim: Color,
    pub red: Color,
    pub yellow: Color,
    pub green: Color,
    pub cyan: Color,
    pub selection_bg: Color,
    pub search_match_bg: Color,
    pub search_match_fg: Color,
    /// Per-level colors, keyed by level tag
    pub level_colors: HashMap<String, Color>,
}

impl Default for Theme {
    fn default() -> Self {
        let mut level_colors = HashMap::new();
        level_colors.insert("I".into(), Color::Rgb(0x44, 0xDD, 0xFF));
        level_colors.insert("R".into(), Color::Rgb(0x44, 0xFF, 0x88));
        level_colors.insert("C".into(), Color::Rgb(0x44, 0x88, 0xFF));
        level_colors.insert("U".into(), Color::Rgb(0xCC, 0x66, 0xFF));
        level_colors.insert("M".into(), Color::Rgb(0xFF, 0xD7, 0x00));

        Theme {
            background: Color::Rgb(0x0C, 0x00, 0x1B),
            text: Color::Rgb(0xB0, 0xAA, 0xFF),
            text_bright: Color::Rgb(0xFF, 0xFF, 0xFF),
            highlight: Color::Rgb(0xFB, 0x41, 0x96),
            dim: Color::Rgb(0x7D, 0x78, 0xBF),
            red: Color::Rgb(0xFF, 0x44, 0x44),
            yellow: Color::Rgb(0xFF, 0xD7, 0x00),
            green: Color::Rgb(0x44, 0xFF, 0x88),
            cyan: Color::Rgb(0x44, 0xDD, 0xFF),
            selection_bg: Color::Rgb(0x3D, 0x14, 0x38),
            search_match_bg: Color::Rgb(0x40, 0xE0, 0xD0),
            search_match_fg: Color::Rgb(0x0C, 0x00, 0x1B),
            level_colors,
        }
    }
}

impl Theme {
    /// Get the color for a level tag, falling back to dim
    pub fn level_color(&self, level: &str) -> Color {
        self.level_colors.get(level).copied().unwrap_or(self.dim)
    }

    /// Checkbox color: checked items glow green
    pub fn check_color(&self, checked: bool) -> Color {
        if checked { self.green } else { self.text }
    }
}
