//! Visual theme and styling.

use console::Style;

/// Leading mark of a status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mark {
    Success,
    Warning,
    Error,
    Skipped,
}

impl Mark {
    /// The glyph printed before the message.
    pub fn glyph(self) -> &'static str {
        match self {
            Mark::Success => "✓",
            Mark::Warning => "⚠",
            Mark::Error => "✗",
            Mark::Skipped => "○",
        }
    }

    /// Unstyled status line, as written to pipes and logs.
    pub fn plain(self, msg: &str) -> String {
        format!("{} {}", self.glyph(), msg)
    }
}

/// Terminal styles for setup output.
///
/// Warnings use orange (256-colour 208) so advisory problems stand apart
/// from failures.
#[derive(Debug, Clone)]
pub struct StudioTheme {
    pub success: Style,
    pub warning: Style,
    pub error: Style,
    pub dim: Style,
    pub header: Style,
    pub hint: Style,
}

impl Default for StudioTheme {
    fn default() -> Self {
        Self::new()
    }
}

impl StudioTheme {
    /// Colored theme.
    pub fn new() -> Self {
        Self {
            success: Style::new().green(),
            warning: Style::new().color256(208),
            error: Style::new().red().bold(),
            dim: Style::new().dim(),
            header: Style::new().bold().cyan(),
            hint: Style::new().cyan().dim(),
        }
    }

    /// Theme without colors (for non-TTY or --no-color).
    pub fn plain() -> Self {
        Self {
            success: Style::new(),
            warning: Style::new(),
            error: Style::new(),
            dim: Style::new(),
            header: Style::new(),
            hint: Style::new(),
        }
    }

    fn style_for(&self, mark: Mark) -> &Style {
        match mark {
            Mark::Success => &self.success,
            Mark::Warning => &self.warning,
            Mark::Error => &self.error,
            Mark::Skipped => &self.dim,
        }
    }

    /// A styled status line.
    pub fn status(&self, mark: Mark, msg: &str) -> String {
        self.style_for(mark).apply_to(mark.plain(msg)).to_string()
    }

    /// A flow banner, e.g. "▶ Interpreter Installer (Python 3.12.7)".
    pub fn banner(&self, title: &str) -> String {
        self.header.apply_to(format!("▶ {}", title)).to_string()
    }
}

/// Check if colors should be enabled.
pub fn should_use_colors() -> bool {
    // https://no-color.org/
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }

    console::colors_enabled() && console::Term::stdout().is_term()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_status_lines() {
        let theme = StudioTheme::plain();
        assert_eq!(theme.status(Mark::Success, "Python 3.12.7"), "✓ Python 3.12.7");
        assert_eq!(theme.status(Mark::Warning, "pip upgrade failed"), "⚠ pip upgrade failed");
        assert_eq!(theme.status(Mark::Error, "download failed"), "✗ download failed");
        assert_eq!(theme.status(Mark::Skipped, "platform packages"), "○ platform packages");
    }

    #[test]
    fn banner_contains_title() {
        let line = StudioTheme::plain().banner("Dependency Installer");
        assert_eq!(line, "▶ Dependency Installer");
    }

    #[test]
    fn colored_status_keeps_text() {
        let line = StudioTheme::new().status(Mark::Warning, "ffmpeg was not found");
        assert!(line.contains("ffmpeg was not found"));
    }
}
