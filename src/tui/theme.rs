use ratatui::style::Color;

use crate::model::UiConfig;

/// Parsed color theme for the TUI
#[derive(Debug, Clone)]
pub struct Theme {
    pub background: Color,
    pub text: Color,
    pub text_bright: Color,
    pub dim: Color,
    pub accent: Color,
    pub done: Color,
    pub warning: Color,
    pub error: Color,
    pub selection_bg: Color,
    pub selection_border: Color,
}

impl Default for Theme {
    fn default() -> Self {
        // Night-sky blue with the blue→green accent pair of the brand
        Theme {
            background: Color::Rgb(0x0B, 0x12, 0x20),
            text: Color::Rgb(0xD1, 0xD5, 0xDB),
            text_bright: Color::Rgb(0xFF, 0xFF, 0xFF),
            dim: Color::Rgb(0x6B, 0x72, 0x80),
            accent: Color::Rgb(0x3B, 0x82, 0xF6),
            done: Color::Rgb(0x22, 0xC5, 0x5E),
            warning: Color::Rgb(0xFF, 0xD7, 0x00),
            error: Color::Rgb(0xEF, 0x44, 0x44),
            selection_bg: Color::Rgb(0x1E, 0x29, 0x3B),
            selection_border: Color::Rgb(0x3B, 0x82, 0xF6),
        }
    }
}

/// Parse a hex color string like "#FF4444" into an RGB Color
fn parse_hex_color(hex: &str) -> Option<Color> {
    let hex = hex.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some(Color::Rgb(r, g, b))
}

impl Theme {
    /// Create a theme from UI config, falling back to defaults
    pub fn from_config(ui: &UiConfig) -> Self {
        let mut theme = Theme::default();

        for (key, value) in &ui.colors {
            if let Some(color) = parse_hex_color(value) {
                match key.as_str() {
                    "background" => theme.background = color,
                    "text" => theme.text = color,
                    "text_bright" => theme.text_bright = color,
                    "dim" => theme.dim = color,
                    "accent" => theme.accent = color,
                    "done" => theme.done = color,
                    "warning" => theme.warning = color,
                    "error" => theme.error = color,
                    "selection_bg" => theme.selection_bg = color,
                    "selection_border" => theme.selection_border = color,
                    _ => {}
                }
            }
        }

        theme
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn hex_parsing() {
        assert_eq!(parse_hex_color("#FF0000"), Some(Color::Rgb(255, 0, 0)));
        assert_eq!(parse_hex_color("00FF00"), None);
        assert_eq!(parse_hex_color("#GGGGGG"), None);
        assert_eq!(parse_hex_color("#FFF"), None);
    }

    #[test]
    fn config_overrides_apply() {
        let mut colors = HashMap::new();
        colors.insert("background".to_string(), "#000000".to_string());
        colors.insert("unknown_slot".to_string(), "#123456".to_string());
        let ui = UiConfig {
            colors,
            ..Default::default()
        };
        let theme = Theme::from_config(&ui);
        assert_eq!(theme.background, Color::Rgb(0, 0, 0));
        // Untouched slots keep their defaults
        assert_eq!(theme.text_bright, Color::Rgb(0xFF, 0xFF, 0xFF));
    }
}
