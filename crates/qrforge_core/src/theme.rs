//! Static UI color themes served to web clients.

use serde::Serialize;
use std::collections::BTreeMap;

/// Color palette of one theme, as `#rrggbb` strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Theme {
    pub background: &'static str,
    pub text: &'static str,
    pub primary: &'static str,
    pub secondary: &'static str,
}

/// Returns all built-in themes keyed by name.
pub fn themes() -> BTreeMap<&'static str, Theme> {
    BTreeMap::from([
        (
            "light",
            Theme {
                background: "#ffffff",
                text: "#000000",
                primary: "#3b82f6",
                secondary: "#6b7280",
            },
        ),
        (
            "dark",
            Theme {
                background: "#1f2937",
                text: "#ffffff",
                primary: "#60a5fa",
                secondary: "#9ca3af",
            },
        ),
        (
            "blue",
            Theme {
                background: "#eff6ff",
                text: "#1e40af",
                primary: "#3b82f6",
                secondary: "#60a5fa",
            },
        ),
        (
            "green",
            Theme {
                background: "#f0fdf4",
                text: "#166534",
                primary: "#22c55e",
                secondary: "#4ade80",
            },
        ),
    ])
}

#[cfg(test)]
mod tests {
    use super::themes;

    #[test]
    fn ships_four_themes_with_hex_colors() {
        let themes = themes();
        assert_eq!(
            themes.keys().copied().collect::<Vec<_>>(),
            vec!["blue", "dark", "green", "light"]
        );
        for theme in themes.values() {
            for color in [theme.background, theme.text, theme.primary, theme.secondary] {
                assert!(color.starts_with('#') && color.len() == 7, "{color}");
            }
        }
        assert_eq!(themes["dark"].background, "#1f2937");
    }
}
