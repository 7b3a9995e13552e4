//! Screen selection and canvas geometry.
//!
//! The frame loop needs to know which canvases are on screen, and how large
//! they are, before it draws. Everything here is pure layout so the answer
//! matches what [`super::render`] later paints.

use ratatui::layout::{Constraint, Layout, Rect};
use tokio::time::Instant;

use super::{dashboard, detail, network};
use crate::app::App;
use crate::router::Section;
use crate::surface::SurfaceId;
use crate::viz::ids;

/// Minimum terminal size for usable display.
pub const MIN_WIDTH: u16 = 60;
pub const MIN_HEIGHT: u16 = 12;

/// What occupies the terminal this frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    TooSmall,
    Splash,
    Backdrop,
    Main,
}

pub fn screen(app: &App, area: Rect, now: Instant) -> Screen {
    if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
        Screen::TooSmall
    } else if app.splash_active(now) {
        Screen::Splash
    } else if app.show_backdrop {
        Screen::Backdrop
    } else {
        Screen::Main
    }
}

/// Header, tabs, content and status bar rows.
#[derive(Debug, Clone, Copy)]
pub struct Chrome {
    pub header: Rect,
    pub tabs: Rect,
    pub content: Rect,
    pub status: Rect,
}

impl Chrome {
    pub fn new(area: Rect) -> Self {
        let [header, tabs, content, status] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(8),
            Constraint::Length(1),
        ])
        .areas(area);
        Self {
            header,
            tabs,
            content,
            status,
        }
    }
}

/// Braille canvas resolution of a cell rectangle.
pub fn pixel_size(rect: Rect) -> (f64, f64) {
    (f64::from(rect.width) * 2.0, f64::from(rect.height) * 4.0)
}

/// Cell rectangles of every canvas drawn this frame.
pub fn surface_rects(app: &App, area: Rect, now: Instant) -> Vec<(SurfaceId, Rect)> {
    match screen(app, area, now) {
        Screen::TooSmall => Vec::new(),
        Screen::Splash | Screen::Backdrop => vec![(ids::BACKDROP, area)],
        Screen::Main => {
            let content = Chrome::new(area).content;
            let mut rects = match app.section() {
                Section::Dashboard => dashboard::Areas::new(content).surfaces(),
                Section::Network => network::Areas::new(content).surfaces(),
                Section::Threats | Section::Alerts => Vec::new(),
            };
            if app.detail.is_some() {
                if let Some(overlay) = detail::Areas::new(area) {
                    rects.extend(overlay.surfaces());
                }
            }
            rects
        }
    }
}

/// Surfaces on screen with their pixel sizes, ready for `App::frame`.
pub fn surfaces(app: &App, area: Rect, now: Instant) -> Vec<(SurfaceId, f64, f64)> {
    surface_rects(app, area, now)
        .into_iter()
        .filter(|(_, rect)| rect.width > 0 && rect.height > 0)
        .map(|(id, rect)| {
            let (w, h) = pixel_size(rect);
            (id, w, h)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::config::DashboardConfig;
    use crate::source::DirectoryProvider;
    use crate::ui::Theme;

    fn app() -> App {
        App::with_theme(
            DashboardConfig::default(),
            Arc::new(DirectoryProvider::new("fixtures")),
            Theme::dark(),
        )
    }

    #[test]
    fn test_screen_selection() {
        let mut app = app();
        let now = Instant::now();
        let area = Rect::new(0, 0, 120, 40);

        assert_eq!(screen(&app, Rect::new(0, 0, 59, 40), now), Screen::TooSmall);
        assert_eq!(screen(&app, area, now), Screen::Splash);

        app.dismiss_splash();
        assert_eq!(screen(&app, area, now), Screen::Main);
        app.toggle_backdrop();
        assert_eq!(screen(&app, area, now), Screen::Backdrop);
        assert_eq!(surfaces(&app, area, now), vec![(ids::BACKDROP, 240.0, 160.0)]);
    }

    #[test]
    fn test_dashboard_surfaces() {
        let mut app = app();
        app.dismiss_splash();
        let found: Vec<SurfaceId> = surfaces(&app, Rect::new(0, 0, 120, 40), Instant::now())
            .into_iter()
            .map(|(id, _, _)| id)
            .collect();
        assert_eq!(found.len(), 7);
        assert!(found.contains(&ids::RADAR));
        assert!(found.contains(&ids::CPU_SPARK));
        assert!(!found.contains(&ids::TOPOLOGY));
        assert!(!found.contains(&ids::BACKDROP));
    }

    #[test]
    fn test_pixel_size() {
        assert_eq!(pixel_size(Rect::new(3, 4, 10, 5)), (20.0, 20.0));
    }
}
