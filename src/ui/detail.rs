//! Stat detail overlay rendering.
//!
//! Displays a modal overlay with the selected stat card's value and a large
//! time-series chart of its history.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use super::{canvas, common};
use crate::app::App;
use crate::data::{format_count, StatSlot};
use crate::surface::SurfaceId;
use crate::viz::ids;

/// Minimum width required for the detail overlay to render properly.
const MIN_OVERLAY_WIDTH: u16 = 40;
/// Minimum height required for the detail overlay to render properly.
const MIN_OVERLAY_HEIGHT: u16 = 10;

/// Overlay rectangles.
#[derive(Debug, Clone, Copy)]
pub struct Areas {
    pub overlay: Rect,
    pub header: Rect,
    pub chart: Rect,
    pub footer: Rect,
}

impl Areas {
    /// `None` when the screen is too small for the overlay.
    pub fn new(area: Rect) -> Option<Self> {
        if area.width < MIN_OVERLAY_WIDTH || area.height < MIN_OVERLAY_HEIGHT {
            return None;
        }
        // Width: 90% of screen, height: 80%, both capped.
        let width = (area.width * 90 / 100).clamp(MIN_OVERLAY_WIDTH, 120);
        let height = (area.height * 80 / 100).clamp(MIN_OVERLAY_HEIGHT, 40);
        let overlay = common::centered(area, width, height);

        let [header, chart, footer] = Layout::vertical([
            Constraint::Length(4),
            Constraint::Fill(1),
            Constraint::Length(1),
        ])
        .areas(overlay);
        Some(Self {
            overlay,
            header,
            chart,
            footer,
        })
    }

    pub fn surfaces(&self) -> Vec<(SurfaceId, Rect)> {
        vec![(ids::DETAIL, common::inner(self.chart))]
    }
}

/// Render the stat detail as a modal overlay.
pub fn render_overlay(frame: &mut Frame, app: &App, slot: StatSlot, area: Rect) {
    let Some(areas) = Areas::new(area) else {
        return;
    };

    frame.render_widget(Clear, areas.overlay);

    let series = app.history().stat_series(slot);
    let bounds = series.iter().copied().fold(None, |acc: Option<(f64, f64)>, v| {
        Some(acc.map_or((v, v), |(lo, hi)| (lo.min(v), hi.max(v))))
    });

    let bold = Style::default().add_modifier(Modifier::BOLD);
    let mut stats = vec![
        Span::raw(" Current: "),
        Span::styled(
            format!("{}{}", format_count(app.animator().shown(slot)), slot.unit()),
            bold.fg(app.theme.highlight),
        ),
    ];
    if let Some((lo, hi)) = bounds {
        stats.push(Span::raw("    Min: "));
        stats.push(Span::styled(format!("{lo:.0}"), bold));
        stats.push(Span::raw("    Max: "));
        stats.push(Span::styled(format!("{hi:.0}"), bold));
    }
    stats.push(Span::raw(format!("    Samples: {}", series.len())));

    let header_block = Block::default()
        .title(format!(" {} ", slot.label()))
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.highlight));
    frame.render_widget(
        Paragraph::new(vec![Line::from(""), Line::from(stats)]).block(header_block),
        areas.header,
    );

    canvas::render(
        frame,
        app.surfaces().get(ids::DETAIL),
        &app.theme,
        Some(common::panel(" History ", app)),
        areas.chart,
    );

    frame.render_widget(
        Paragraph::new(" Esc: close  ↑↓: other card ")
            .style(Style::default().add_modifier(Modifier::DIM)),
        areas.footer,
    );
}
