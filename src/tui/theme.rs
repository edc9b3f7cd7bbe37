use ratatui::style::Color;

use crate::model::config::UiConfig;
use crate::model::message::ToastKind;
use crate::model::task::{Category, Priority};

/// Parsed color theme for the TUI
#[derive(Debug, Clone)]
pub struct Theme {
    pub background: Color,
    pub text: Color,
    pub text_bright: Color,
    pub dim: Color,
    pub highlight: Color,
    pub column_border: Color,
    pub selection_bg: Color,
    pub carry_fg: Color,
    pub success: Color,
    pub error: Color,
    pub urgent: Color,
    pub medium: Color,
    pub low: Color,
    pub user_story: Color,
    pub technical_task: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Theme {
            background: Color::Rgb(0x0E, 0x14, 0x1E),
            text: Color::Rgb(0xC8, 0xD2, 0xE0),
            text_bright: Color::Rgb(0xFF, 0xFF, 0xFF),
            dim: Color::Rgb(0x6E, 0x7A, 0x8A),
            highlight: Color::Rgb(0x29, 0xAB, 0xE2),
            column_border: Color::Rgb(0x3A, 0x46, 0x56),
            selection_bg: Color::Rgb(0x1C, 0x2A, 0x3A),
            carry_fg: Color::Rgb(0xFF, 0xD7, 0x00),
            success: Color::Rgb(0x44, 0xFF, 0x88),
            error: Color::Rgb(0xFF, 0x44, 0x44),
            urgent: Color::Rgb(0xFF, 0x3D, 0x00),
            medium: Color::Rgb(0xFF, 0xA8, 0x00),
            low: Color::Rgb(0x7A, 0xE2, 0x29),
            user_story: Color::Rgb(0x00, 0x38, 0xFF),
            technical_task: Color::Rgb(0x1F, 0xD7, 0xC1),
        }
    }
}

impl Theme {
    /// Build a theme from the config's `[ui.colors]` overrides.
    pub fn from_config(ui: &UiConfig) -> Self {
        let mut theme = Theme::default();
        for (name, hex) in &ui.colors {
            let Some(color) = parse_hex_color(hex) else {
                continue;
            };
            match name.as_str() {
                "background" => theme.background = color,
                "text" => theme.text = color,
                "dim" => theme.dim = color,
                "highlight" => theme.highlight = color,
                "success" => theme.success = color,
                "error" => theme.error = color,
                _ => {}
            }
        }
        theme
    }

    pub fn priority_color(&self, priority: Priority) -> Color {
        match priority {
            Priority::Urgent => self.urgent,
            Priority::Medium => self.medium,
            Priority::Low => self.low,
        }
    }

    pub fn category_color(&self, category: Category) -> Color {
        match category {
            Category::UserStory => self.user_story,
            Category::TechnicalTask => self.technical_task,
            Category::Unselected => self.dim,
        }
    }

    pub fn toast_color(&self, kind: ToastKind) -> Color {
        match kind {
            ToastKind::Success => self.success,
            ToastKind::Error => self.error,
        }
    }
}

/// Parse a hex color string like "#FF4444" into an RGB Color
pub fn parse_hex_color(hex: &str) -> Option<Color> {
    let hex = hex.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some(Color::Rgb(r, g, b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn parse_hex_color_roundtrip() {
        assert_eq!(parse_hex_color("#FF4040"), Some(Color::Rgb(0xFF, 0x40, 0x40)));
        assert_eq!(parse_hex_color("008B8B"), None);
        assert_eq!(parse_hex_color("#abc"), None);
        assert_eq!(parse_hex_color("#zzzzzz"), None);
    }

    #[test]
    fn config_overrides_apply() {
        let mut colors = HashMap::new();
        colors.insert("highlight".to_string(), "#123456".to_string());
        colors.insert("bogus".to_string(), "#654321".to_string());
        let ui = UiConfig {
            colors,
            ..UiConfig::default()
        };
        let theme = Theme::from_config(&ui);
        assert_eq!(theme.highlight, Color::Rgb(0x12, 0x34, 0x56));
        // Unknown names and untouched slots keep defaults.
        assert_eq!(theme.error, Theme::default().error);
    }
}
