//! Splash screen and full-screen backdrop.

use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Clear, Gauge, Paragraph},
    Frame,
};
use tokio::time::Instant;

use super::{canvas, common};
use crate::app::App;
use crate::viz::ids;

/// Render the particle backdrop over the whole screen.
pub fn render_backdrop(frame: &mut Frame, app: &App, area: Rect) {
    canvas::render(frame, app.surfaces().get(ids::BACKDROP), &app.theme, None, area);
}

/// Render the loading splash: backdrop, title, cycling message and progress.
pub fn render(frame: &mut Frame, app: &App, area: Rect, now: Instant) {
    render_backdrop(frame, app, area);

    let dialog = common::centered(area, 52, 7);
    frame.render_widget(Clear, dialog);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.highlight));
    let inner = block.inner(dialog);
    frame.render_widget(block, dialog);

    let [title, message, _, progress] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .areas(inner);

    frame.render_widget(
        Paragraph::new(Line::styled("NETSECURE ELITE", app.theme.header.add_modifier(Modifier::BOLD)))
            .alignment(Alignment::Center),
        title,
    );
    frame.render_widget(
        Paragraph::new(app.splash_message(now)).alignment(Alignment::Center),
        message,
    );

    let total = app.config().splash_duration().as_secs_f64();
    let elapsed = app.uptime(now).as_secs_f64();
    let ratio = if total > 0.0 { (elapsed / total).clamp(0.0, 1.0) } else { 1.0 };
    frame.render_widget(
        Gauge::default()
            .gauge_style(Style::default().fg(app.theme.highlight))
            .ratio(ratio)
            .label(""),
        progress,
    );
}
