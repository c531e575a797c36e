//! Theme system for human-mode output.

use console::{Color, Style};

use crate::model::ThemeColor;

/// Visual theme for human-mode output.
///
/// Centralizes colors and styles for consistent rendering. The accent
/// follows the profile's own theme color.
#[derive(Debug, Clone)]
pub struct AdminTheme {
    pub accent: Style,
    pub success: Style,
    pub error: Style,
    pub warning: Style,
    pub muted: Style,

    pub header: Style,
    pub label: Style,
    pub value: Style,
    pub badge: Style,
}

impl AdminTheme {
    /// Theme whose accent matches a palette entry.
    #[must_use]
    pub fn for_color(color: ThemeColor) -> Self {
        let accent = color.terminal_color();
        Self {
            accent: Style::new().fg(accent).bold(),
            header: Style::new().fg(accent).bold().underlined(),
            badge: Style::new().fg(Color::Black).bg(accent),
            ..Self::default()
        }
    }
}

impl Default for AdminTheme {
    fn default() -> Self {
        Self {
            accent: Style::new().cyan().bold(),
            success: Style::new().green().bold(),
            error: Style::new().red().bold(),
            warning: Style::new().yellow().bold(),
            muted: Style::new().dim(),
            header: Style::new().cyan().bold().underlined(),
            label: Style::new().dim(),
            value: Style::new().bold(),
            badge: Style::new().black().on_cyan(),
        }
    }
}
