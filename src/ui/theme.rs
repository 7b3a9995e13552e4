//! Theme configuration for the TUI.
//!
//! Supports light and dark themes with automatic terminal detection.

use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::block::BorderType;

use crate::data::Load;
use crate::source::{LogLevel, Severity};
use crate::surface::Rgba;

/// Color and style theme for the TUI.
///
/// Use [`Theme::auto_detect()`] for automatic theme selection based on
/// terminal background, or [`Theme::dark()`]/[`Theme::light()`] explicitly.
#[derive(Debug, Clone)]
pub struct Theme {
    /// Accent color for highlights and active elements.
    pub highlight: Color,
    /// Color for warning-level values.
    pub warning: Color,
    /// Color for critical-level values.
    pub critical: Color,
    /// Color for healthy values.
    pub healthy: Color,
    /// Color for borders and separators.
    pub border: Color,
    /// Canvas background that translucent strokes are blended against.
    pub background: (u8, u8, u8),
    /// Style for header rows in tables.
    pub header: Style,
    /// Style for selected/highlighted rows.
    pub selected: Style,
    /// Style for the active tab.
    pub tab_active: Style,
    /// Style for inactive tabs.
    pub tab_inactive: Style,
    /// Border style (rounded, plain, etc.).
    pub border_type: BorderType,
}

impl Theme {
    /// Create a dark theme suitable for dark terminal backgrounds.
    pub fn dark() -> Self {
        Self {
            highlight: Color::Cyan,
            warning: Color::Yellow,
            critical: Color::Red,
            healthy: Color::Green,
            border: Color::Gray,
            background: (10, 14, 26),
            header: Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            selected: Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD),
            tab_active: Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            tab_inactive: Style::default().fg(Color::Gray),
            border_type: BorderType::Rounded,
        }
    }

    /// Create a light theme suitable for light terminal backgrounds.
    pub fn light() -> Self {
        Self {
            highlight: Color::Blue,
            warning: Color::Yellow,
            critical: Color::Red,
            healthy: Color::Green,
            border: Color::DarkGray,
            background: (245, 247, 250),
            header: Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
            selected: Style::default().bg(Color::LightBlue).add_modifier(Modifier::BOLD),
            tab_active: Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
            tab_inactive: Style::default().fg(Color::DarkGray),
            border_type: BorderType::Rounded,
        }
    }

    /// Auto-detect based on terminal background
    pub fn auto_detect() -> Self {
        match terminal_light::luma() {
            Ok(luma) if luma > 0.5 => Self::light(),
            _ => Self::dark(),
        }
    }

    /// Terminal colour for a canvas stroke, alpha blended over the background.
    pub fn paint(&self, color: Rgba) -> Color {
        let (r, g, b) = color.blend_over(self.background);
        Color::Rgb(r, g, b)
    }

    pub fn severity_style(&self, severity: Severity) -> Style {
        match severity {
            Severity::Critical => Style::default().fg(self.critical).add_modifier(Modifier::BOLD),
            Severity::High => Style::default().fg(self.critical),
            Severity::Medium => Style::default().fg(self.warning),
            Severity::Low => Style::default().fg(self.healthy),
        }
    }

    /// Style for a gauge band.
    pub fn load_style(&self, load: Load) -> Style {
        match load {
            Load::Normal => Style::default().fg(self.highlight),
            Load::Warning => Style::default().fg(self.warning),
            Load::Critical => Style::default().fg(self.critical).add_modifier(Modifier::BOLD),
        }
    }

    pub fn level_style(&self, level: LogLevel) -> Style {
        match level {
            LogLevel::Info => Style::default().fg(self.highlight),
            LogLevel::Warning => Style::default().fg(self.warning),
            LogLevel::Error => Style::default().fg(self.critical),
            LogLevel::Critical => Style::default().fg(self.critical).add_modifier(Modifier::BOLD),
        }
    }
}
