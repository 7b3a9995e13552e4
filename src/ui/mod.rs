//! Terminal UI rendering using ratatui.
//!
//! Each section is implemented in its own submodule with a `render`
//! function. Animated panels are braille canvases that replay the shapes a
//! scene painted into its [`crate::surface::CanvasSurface`].
//!
//! ## Submodules
//!
//! - [`dashboard`]: stat cards, radar, network map, performance chart, lists
//! - [`threats`]: severity counters and the threat table
//! - [`network`]: connection counters, topology and the connection table
//! - [`alerts`]: unread/today/week counters and the alert feed
//! - [`detail`]: modal overlay with a stat card's history
//! - [`splash`]: loading screen and full-screen backdrop
//! - [`common`]: shared components (header, tabs, status bar, help overlay)
//! - [`canvas`]: replays recorded shapes onto a ratatui canvas
//! - [`layout`]: screen selection and canvas geometry for the frame loop
//! - [`theme`]: light/dark theme support with terminal auto-detection
//!
//! ## Rendering Architecture
//!
//! ```text
//! ┌──────────────────────────────────────┐
//! │ Header (common::render_header)       │
//! ├──────────────────────────────────────┤
//! │ Tabs (common::render_tabs)           │
//! ├──────────────────────────────────────┤
//! │                                      │
//! │ Section Content                      │
//! │ (dashboard/threats/network/alerts)   │
//! │                                      │
//! ├──────────────────────────────────────┤
//! │ Status Bar (common::render_status)   │
//! └──────────────────────────────────────┘
//!         ↑
//!    Overlays rendered on top:
//!    - detail::render_overlay
//!    - common::render_help
//! ```

pub mod alerts;
pub mod canvas;
pub mod common;
pub mod dashboard;
pub mod detail;
pub mod layout;
pub mod network;
pub mod splash;
pub mod theme;
pub mod threats;

pub use theme::Theme;

use ratatui::Frame;
use tokio::time::Instant;

use crate::app::App;
use crate::router::Section;
use layout::{Chrome, Screen};

/// Draw one frame.
pub fn render(frame: &mut Frame, app: &App, now: Instant) {
    let area = frame.area();

    match layout::screen(app, area, now) {
        Screen::TooSmall => {
            common::render_too_small(frame, app, area, (layout::MIN_WIDTH, layout::MIN_HEIGHT));
        }
        Screen::Splash => splash::render(frame, app, area, now),
        Screen::Backdrop => {
            splash::render_backdrop(frame, app, area);
            common::render_status_bar(frame, app, Chrome::new(area).status, now);
        }
        Screen::Main => {
            let chrome = Chrome::new(area);
            common::render_header(frame, app, chrome.header);
            common::render_tabs(frame, app, chrome.tabs);

            match app.section() {
                Section::Dashboard => dashboard::render(frame, app, chrome.content),
                Section::Threats => threats::render(frame, app, chrome.content),
                Section::Network => network::render(frame, app, chrome.content),
                Section::Alerts => alerts::render(frame, app, chrome.content),
            }

            common::render_status_bar(frame, app, chrome.status, now);

            if let Some(slot) = app.detail {
                detail::render_overlay(frame, app, slot, area);
            }
        }
    }

    if app.show_help {
        common::render_help(frame, app, area);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::Local;
    use ratatui::{backend::TestBackend, Terminal};

    use super::*;
    use crate::config::DashboardConfig;
    use crate::source::{
        Alert, Connection, ConnectionStatus, DirectoryProvider, Severity, StatusMetrics, Threat,
        ThreatStatus,
    };

    fn app() -> App {
        App::with_theme(
            DashboardConfig::default(),
            Arc::new(DirectoryProvider::new("fixtures")),
            Theme::dark(),
        )
    }

    fn draw(app: &App, width: u16, height: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        let now = Instant::now();
        terminal.draw(|frame| render(frame, app, now)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_splash_then_dashboard() {
        let mut app = app();
        assert!(draw(&app, 100, 30).contains("NETSECURE ELITE"));

        app.dismiss_splash();
        app.state().status().publish(StatusMetrics {
            threats_detected: 42,
            ..StatusMetrics::default()
        });
        let text = draw(&app, 100, 30);
        assert!(text.contains("Dashboard"));
        assert!(text.contains("Threat Radar"));
    }

    #[test]
    fn test_threat_table() {
        let mut app = app();
        app.dismiss_splash();
        app.navigate(Section::Threats);
        app.state().threats().publish(vec![Threat {
            kind: "Port Scan".to_string(),
            severity: Severity::High,
            source: "10.0.0.9".to_string(),
            target: None,
            timestamp: Local::now(),
            status: ThreatStatus::Active,
        }]);
        let text = draw(&app, 120, 30);
        assert!(text.contains("Port Scan"));
        assert!(text.contains("Threats (1/1)"));
    }

    #[test]
    fn test_network_and_alert_counters() {
        let mut app = app();
        app.dismiss_splash();
        app.state().connections().publish(vec![Connection {
            protocol: "TCP".to_string(),
            local_address: "10.0.0.4:51234".to_string(),
            remote_address: "93.184.216.34".to_string(),
            port: Some(443),
            status: ConnectionStatus::Established,
            bytes_sent: 2048,
            bytes_received: 0,
            duration_seconds: None,
        }]);
        app.state().alerts().publish(vec![Alert {
            severity: Severity::Critical,
            message: "Brute force detected".to_string(),
            timestamp: Local::now(),
            acknowledged: false,
        }]);

        app.navigate(Section::Network);
        let text = draw(&app, 140, 30);
        assert!(text.contains("Secure Connections"));
        assert!(text.contains("93.184.216"));
        assert!(text.contains("2 KB / 0 Bytes"));

        app.navigate(Section::Alerts);
        let text = draw(&app, 120, 30);
        assert!(text.contains("Last 7 Days"));
        assert!(text.contains("Brute force detected"));
    }

    #[test]
    fn test_too_small() {
        let mut app = app();
        app.dismiss_splash();
        assert!(draw(&app, 40, 10).contains("Terminal too small"));
    }
}
