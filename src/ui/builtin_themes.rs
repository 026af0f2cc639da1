use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct ThemeSpec {
    pub id: String,
    pub background: Option<String>,
    pub user_prefix: Option<String>,
    pub user_text: Option<String>,
    pub assistant_prefix: Option<String>,
    pub assistant_text: Option<String>,
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub panel_border: Option<String>,
    pub panel_heading: Option<String>,
    pub selected_item: Option<String>,
    pub description: Option<String>,
    pub pending_indicator: Option<String>,
    pub error_text: Option<String>,
    pub info_text: Option<String>,
    pub input_border: Option<String>,
    pub input_title: Option<String>,
    pub input_text: Option<String>,
    pub input_cursor_modifiers: Option<String>,
    pub status_bar: Option<String>,
}

#[derive(Debug, Deserialize)]
struct BuiltinThemesConfig {
    themes: Vec<ThemeSpec>,
}

pub fn load_builtin_themes() -> Vec<ThemeSpec> {
    const CONFIG_CONTENT: &str = include_str!("../builtin_themes.toml");
    let config: BuiltinThemesConfig =
        toml::from_str(CONFIG_CONTENT).expect("Failed to parse builtin_themes.toml");
    config.themes
}

pub fn find_builtin_theme(id: &str) -> Option<ThemeSpec> {
    load_builtin_themes()
        .into_iter()
        .find(|t| t.id.eq_ignore_ascii_case(id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_has_expected_builtins() {
        let themes = load_builtin_themes();
        let ids: Vec<&str> = themes.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["dark", "light"]);
    }

    #[test]
    fn find_builtin_theme_works_case_insensitive() {
        let t = find_builtin_theme("DaRk").expect("should find 'dark'");
        assert_eq!(t.id, "dark");
        assert_eq!(t.background.as_deref(), Some("#1e1e1e"));
    }

    #[test]
    fn every_builtin_sets_every_colour() {
        for spec in load_builtin_themes() {
            assert!(spec.background.is_some(), "{} lacks background", spec.id);
            assert!(spec.assistant_text.is_some(), "{} lacks text", spec.id);
            assert!(spec.error_text.is_some(), "{} lacks error", spec.id);
            assert!(spec.status_bar.is_some(), "{} lacks status bar", spec.id);
        }
    }
}
