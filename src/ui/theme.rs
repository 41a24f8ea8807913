//! Visual theme and styling.

use console::Style;

use crate::discovery::LifecycleStage;

/// Terminal styles used by invoke.
#[derive(Debug, Clone)]
pub struct InvokeTheme {
    /// Style for success messages (green).
    pub success: Style,
    /// Style for warning messages (orange).
    pub warning: Style,
    /// Style for error messages (red bold).
    pub error: Style,
    /// Style for dim/secondary text.
    pub dim: Style,
    /// Style for headers (magenta bold).
    pub header: Style,
    /// Style for stub and command names (bold).
    pub name: Style,
    /// Style for parameter flags (cyan).
    pub flag: Style,
    /// Style for contextual hints (magenta dim).
    pub hint: Style,
    /// Style for alpha-stage markers (red).
    pub alpha: Style,
    /// Style for beta-stage markers (yellow).
    pub beta: Style,
}

impl Default for InvokeTheme {
    fn default() -> Self {
        Self::new()
    }
}

impl InvokeTheme {
    /// Create the default colored theme.
    pub fn new() -> Self {
        Self {
            success: Style::new().green(),
            warning: Style::new().color256(208),
            error: Style::new().red().bold(),
            dim: Style::new().dim(),
            header: Style::new().bold().magenta(),
            name: Style::new().bold(),
            flag: Style::new().cyan(),
            hint: Style::new().magenta().dim(),
            alpha: Style::new().red(),
            beta: Style::new().yellow(),
        }
    }

    /// Create a theme without colors (for non-TTY or --no-color).
    pub fn plain() -> Self {
        Self {
            success: Style::new(),
            warning: Style::new(),
            error: Style::new(),
            dim: Style::new(),
            header: Style::new(),
            name: Style::new(),
            flag: Style::new(),
            hint: Style::new(),
            alpha: Style::new(),
            beta: Style::new(),
        }
    }

    /// Pick the colored or plain theme for the current terminal.
    pub fn detect() -> Self {
        if should_use_colors() {
            Self::new()
        } else {
            Self::plain()
        }
    }

    /// Format a success message (icon + text in green).
    pub fn format_success(&self, msg: &str) -> String {
        format!("{}", self.success.apply_to(format!("✓ {}", msg)))
    }

    /// Format a warning message (icon + text in orange).
    pub fn format_warning(&self, msg: &str) -> String {
        format!("{}", self.warning.apply_to(format!("⚠ {}", msg)))
    }

    /// Format an error message (icon + text in red bold).
    pub fn format_error(&self, msg: &str) -> String {
        format!("{}", self.error.apply_to(format!("✗ {}", msg)))
    }

    /// Format a skipped message (icon + text in dim).
    pub fn format_skipped(&self, msg: &str) -> String {
        format!("{}", self.dim.apply_to(format!("○ {}", msg)))
    }

    /// Format a section header.
    pub fn format_header(&self, title: &str) -> String {
        format!("{}", self.header.apply_to(title))
    }

    /// Tag shown next to non-production commands; empty for production.
    pub fn format_stage(&self, stage: LifecycleStage) -> String {
        match stage {
            LifecycleStage::Alpha => format!("{}", self.alpha.apply_to("[alpha]")),
            LifecycleStage::Beta => format!("{}", self.beta.apply_to("[beta]")),
            LifecycleStage::Production => String::new(),
        }
    }
}

/// Check if colors should be enabled.
pub fn should_use_colors() -> bool {
    // Check NO_COLOR env var (https://no-color.org/)
    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }

    // Check if stdout is a TTY
    console::Term::stdout().is_term()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn theme_formats_status_icons() {
        let theme = InvokeTheme::plain();
        assert_eq!(theme.format_success("Done"), "✓ Done");
        assert_eq!(theme.format_warning("Careful"), "⚠ Careful");
        assert_eq!(theme.format_error("Failed"), "✗ Failed");
        assert_eq!(theme.format_skipped("Skipped"), "○ Skipped");
    }

    #[test]
    fn stage_tags_only_for_prerelease() {
        let theme = InvokeTheme::plain();
        assert_eq!(theme.format_stage(LifecycleStage::Alpha), "[alpha]");
        assert_eq!(theme.format_stage(LifecycleStage::Beta), "[beta]");
        assert_eq!(theme.format_stage(LifecycleStage::Production), "");
    }

    #[test]
    fn colored_theme_keeps_text() {
        let theme = InvokeTheme::new();
        assert!(theme.format_success("test").contains("test"));
    }
}
