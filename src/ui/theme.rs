use std::fmt;
use std::str::FromStr;

use crate::ui::builtin_themes::{find_builtin_theme, ThemeSpec};
use ratatui::style::{Color, Modifier, Style};

/// The two colour schemes offered by the settings panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ThemeMode {
    Dark,
    #[default]
    Light,
}

impl ThemeMode {
    pub fn as_str(self) -> &'static str {
        match self {
            ThemeMode::Dark => "dark",
            ThemeMode::Light => "light",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            ThemeMode::Dark => ThemeMode::Light,
            ThemeMode::Light => ThemeMode::Dark,
        }
    }
}

impl fmt::Display for ThemeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ThemeMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dark" => Ok(ThemeMode::Dark),
            "light" => Ok(ThemeMode::Light),
            other => Err(format!("Unknown theme: {other} (expected dark or light)")),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Theme {
    // Overall background color to paint the full frame
    pub background_color: Color,
    // Chat message styles
    pub user_prefix_style: Style,
    pub user_text_style: Style,
    pub assistant_prefix_style: Style,
    pub assistant_text_style: Style,

    // Chrome
    pub title_style: Style,
    pub subtitle_style: Style,
    pub panel_border_style: Style,
    pub panel_heading_style: Style,
    pub selected_item_style: Style,
    pub description_style: Style,
    pub pending_indicator_style: Style,
    pub error_text_style: Style,
    pub info_text_style: Style,
    pub status_bar_style: Style,

    // Input area
    pub input_border_style: Style,
    pub input_title_style: Style,
    pub input_text_style: Style,
    pub input_cursor_style: Style,
}

impl Theme {
    /// Style set for a mode, built from the embedded theme catalog.
    pub fn for_mode(mode: ThemeMode) -> Self {
        let spec = find_builtin_theme(mode.as_str())
            .expect("builtin_themes.toml defines both dark and light");
        Self::from_spec(&spec)
    }

    pub fn from_spec(spec: &ThemeSpec) -> Self {
        let background_color = spec
            .background
            .as_deref()
            .and_then(parse_color)
            .unwrap_or(Color::Black);

        Theme {
            background_color,
            user_prefix_style: parse_style(&spec.user_prefix),
            user_text_style: parse_style(&spec.user_text),
            assistant_prefix_style: parse_style(&spec.assistant_prefix),
            assistant_text_style: parse_style(&spec.assistant_text),

            title_style: parse_style(&spec.title),
            subtitle_style: parse_style(&spec.subtitle),
            panel_border_style: parse_style(&spec.panel_border),
            panel_heading_style: parse_style(&spec.panel_heading),
            selected_item_style: parse_style(&spec.selected_item),
            description_style: parse_style(&spec.description),
            pending_indicator_style: parse_style(&spec.pending_indicator),
            error_text_style: parse_style(&spec.error_text),
            info_text_style: parse_style(&spec.info_text),
            status_bar_style: parse_style(&spec.status_bar),

            input_border_style: parse_style(&spec.input_border),
            input_title_style: parse_style(&spec.input_title),
            input_text_style: parse_style(&spec.input_text),
            input_cursor_style: parse_modifiers(spec.input_cursor_modifiers.as_deref()),
        }
    }
}

fn parse_color(s: &str) -> Option<Color> {
    let lower = s.trim().to_ascii_lowercase();
    // Hex: #rgb or #rrggbb
    if let Some(c) = parse_hex_color(&lower) {
        return Some(c);
    }
    // rgb(r,g,b)
    if let Some(c) = parse_rgb_func(&lower) {
        return Some(c);
    }
    match lower.as_str() {
        "black" => Some(Color::Black),
        "white" => Some(Color::White),
        "gray" | "grey" => Some(Color::Gray),
        "dark_gray" | "dark-grey" | "darkgray" => Some(Color::DarkGray),
        "red" => Some(Color::Red),
        "light_red" | "light-red" => Some(Color::LightRed),
        "green" => Some(Color::Green),
        "blue" => Some(Color::Blue),
        "light_blue" | "light-blue" => Some(Color::LightBlue),
        "cyan" => Some(Color::Cyan),
        "magenta" => Some(Color::Magenta),
        "yellow" => Some(Color::Yellow),
        "reset" => Some(Color::Reset),
        _ => None,
    }
}

fn parse_hex_color(s: &str) -> Option<Color> {
    let hex = s.strip_prefix('#')?;
    if !hex.is_ascii() {
        return None;
    }
    if hex.len() == 3 {
        let r = u8::from_str_radix(&hex[0..1].repeat(2), 16).ok()?;
        let g = u8::from_str_radix(&hex[1..2].repeat(2), 16).ok()?;
        let b = u8::from_str_radix(&hex[2..3].repeat(2), 16).ok()?;
        Some(Color::Rgb(r, g, b))
    } else if hex.len() == 6 {
        let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
        let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
        let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
        Some(Color::Rgb(r, g, b))
    } else {
        None
    }
}

fn parse_rgb_func(s: &str) -> Option<Color> {
    // Format: rgb(r,g,b)
    let content = s.strip_prefix("rgb(")?.strip_suffix(')')?;
    let parts: Vec<_> = content
        .split([',', ' '])
        .filter(|t| !t.is_empty())
        .collect();
    if parts.len() != 3 {
        return None;
    }
    let r = parts[0].parse::<u16>().ok()?;
    let g = parts[1].parse::<u16>().ok()?;
    let b = parts[2].parse::<u16>().ok()?;
    Some(Color::Rgb(
        r.min(255) as u8,
        g.min(255) as u8,
        b.min(255) as u8,
    ))
}

fn apply_modifier(style: Style, token: &str) -> Style {
    match token.to_ascii_lowercase().as_str() {
        "bold" => style.add_modifier(Modifier::BOLD),
        "reversed" => style.add_modifier(Modifier::REVERSED),
        "italic" => style.add_modifier(Modifier::ITALIC),
        _ => style,
    }
}

fn parse_style(s: &Option<String>) -> Style {
    let mut style = Style::default();
    if let Some(ref spec) = s {
        for tok in spec.split(',').map(|t| t.trim()).filter(|t| !t.is_empty()) {
            style = match parse_color(tok) {
                Some(color) => style.fg(color),
                None => apply_modifier(style, tok),
            };
        }
    }
    style
}

fn parse_modifiers(s: Option<&str>) -> Style {
    s.map(|mods| {
        mods.split(',')
            .map(str::trim)
            .fold(Style::default(), apply_modifier)
    })
    .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn theme_mode_parses_and_toggles() {
        assert_eq!("Dark".parse::<ThemeMode>(), Ok(ThemeMode::Dark));
        assert_eq!(" light ".parse::<ThemeMode>(), Ok(ThemeMode::Light));
        assert!("sepia".parse::<ThemeMode>().is_err());
        assert_eq!(ThemeMode::default(), ThemeMode::Light);
        assert_eq!(ThemeMode::Light.toggled(), ThemeMode::Dark);
    }

    #[test]
    fn builtin_themes_use_original_palette() {
        assert_eq!(
            Theme::for_mode(ThemeMode::Dark).background_color,
            Color::Rgb(0x1e, 0x1e, 0x1e)
        );
        assert_eq!(
            Theme::for_mode(ThemeMode::Light).background_color,
            Color::Rgb(0xf9, 0xf9, 0xf9)
        );
        assert_eq!(
            Theme::for_mode(ThemeMode::Dark).assistant_text_style.fg,
            Some(Color::Rgb(0xf5, 0xf5, 0xf5))
        );
        assert_eq!(
            Theme::for_mode(ThemeMode::Light).assistant_text_style.fg,
            Some(Color::Rgb(0x2d, 0x34, 0x36))
        );
    }

    #[test]
    fn parses_color_notations() {
        assert_eq!(parse_color("#abc"), Some(Color::Rgb(0xaa, 0xbb, 0xcc)));
        assert_eq!(parse_color("rgb(300, 0, 12)"), Some(Color::Rgb(255, 0, 12)));
        assert_eq!(parse_color("Grey"), Some(Color::Gray));
        assert_eq!(parse_color("#12"), None);
        assert_eq!(parse_color("#ééé"), None);
    }

    #[test]
    fn style_combines_color_and_modifiers() {
        let style = parse_style(&Some("#0078ff, bold, italic".to_string()));
        assert_eq!(style.fg, Some(Color::Rgb(0x00, 0x78, 0xff)));
        assert!(style.add_modifier.contains(Modifier::BOLD));
        assert!(style.add_modifier.contains(Modifier::ITALIC));

        let cursor = parse_modifiers(Some("reversed"));
        assert!(cursor.add_modifier.contains(Modifier::REVERSED));
        assert_eq!(parse_modifiers(None), Style::default());
    }
}
