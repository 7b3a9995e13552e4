//! Common UI components shared across sections.
//!
//! This module contains the header bar, tab bar, status bar, help overlay
//! and the bordered panel used by every section.

use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Tabs},
    Frame,
};
use tokio::time::Instant;

use crate::app::App;
use crate::data::{format_count, StatSlot};
use crate::router::Section;

/// Tab titles, in section order.
const TAB_TITLES: [&str; 4] = [" 1:Dashboard ", " 2:Threats ", " 3:Network ", " 4:Alerts "];

/// Bordered panel in the theme's style.
pub fn panel<'a>(title: impl Into<Line<'a>>, app: &App) -> Block<'a> {
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.border))
}

/// Area inside a [`panel`] border.
pub fn inner(area: Rect) -> Rect {
    Block::default().borders(Borders::ALL).inner(area)
}

/// Centre a `width` x `height` box in `area`, shrinking it to fit.
pub fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    let x = area.x + (area.width - width) / 2;
    let y = area.y + (area.height - height) / 2;
    Rect::new(x, y, width, height)
}

/// Render the header bar with the animated counters.
///
/// Displays: status indicator, threats, alerts, connections and, when the
/// backend reports them, version and uptime.
pub fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let Some(status) = app.state().status().latest() else {
        let line = Line::from(vec![
            Span::styled(" NETSECURE ELITE ", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw("| Connecting..."),
        ]);
        frame.render_widget(Paragraph::new(line), area);
        return;
    };

    let status_style = match status.status.as_deref().map(str::to_ascii_lowercase).as_deref() {
        Some("operational" | "online" | "ok" | "healthy") | None => {
            Style::default().fg(app.theme.healthy)
        }
        Some("warning" | "degraded") => Style::default().fg(app.theme.warning),
        Some(_) => Style::default().fg(app.theme.critical).add_modifier(Modifier::BOLD),
    };

    let animator = app.animator();
    let counter = |slot: StatSlot, style: Style| {
        Span::styled(format_count(animator.shown(slot)), style.add_modifier(Modifier::BOLD))
    };

    let mut spans = vec![
        Span::styled(" ● ", status_style),
        Span::styled("NETSECURE ELITE ", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw("│ "),
        counter(StatSlot::Threats, Style::default().fg(app.theme.critical)),
        Span::raw(" threats "),
        counter(StatSlot::Alerts, Style::default().fg(app.theme.warning)),
        Span::raw(" alerts "),
        counter(StatSlot::Connections, Style::default().fg(app.theme.highlight)),
        Span::raw(" connections"),
    ];
    if let Some(version) = &status.version {
        spans.push(Span::raw(format!(" │ v{version}")));
    }
    if let Some(uptime) = &status.uptime {
        spans.push(Span::raw(format!(" │ up {uptime}")));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Render the tab bar showing available sections.
///
/// Highlights the currently active section.
pub fn render_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let titles: Vec<Line> = TAB_TITLES.iter().map(|t| Line::from(*t)).collect();

    let tabs = Tabs::new(titles)
        .select(app.section().index())
        .style(app.theme.tab_inactive)
        .highlight_style(app.theme.tab_active)
        .divider("|");

    frame.render_widget(tabs, area);
}

/// Section under column `col` of the tab bar.
pub fn tab_at(col: u16) -> Option<Section> {
    // Tabs pads each title with one cell on both sides and puts a one-cell
    // divider between titles.
    let mut start = 0u16;
    for (index, title) in TAB_TITLES.iter().enumerate() {
        let end = start + title.chars().count() as u16 + 2;
        if col < end {
            return Section::from_index(index);
        }
        start = end + 1;
    }
    None
}

/// Render the status bar at the bottom.
///
/// Shows: breadcrumb trail, time since last update, the active section's
/// fetch error and the available controls. Temporary messages take over
/// the whole bar.
pub fn render_status_bar(frame: &mut Frame, app: &App, area: Rect, now: Instant) {
    if let Some(msg) = app.get_status_message() {
        let paragraph =
            Paragraph::new(format!(" {msg} ")).style(Style::default().fg(app.theme.highlight));
        frame.render_widget(paragraph, area);
        return;
    }

    let updated = match app.last_update_secs(now) {
        Some(secs) => format!("Updated {secs:.1}s ago"),
        None => "Waiting for data".to_string(),
    };

    let controls = match app.section() {
        Section::Dashboard => "↑↓:card Enter:detail Tab:switch r:refresh ?:help q:quit",
        _ => "↑↓:select Tab:switch r:refresh e:export ?:help q:quit",
    };

    let mut spans = vec![Span::styled(
        format!(" {} | {} | ", app.breadcrumb(), updated),
        Style::default().add_modifier(Modifier::DIM),
    )];
    if let Some((resource, error)) = app.section_error() {
        spans.push(Span::styled(
            format!("{resource}: {error} | "),
            Style::default().fg(app.theme.critical),
        ));
    }
    spans.push(Span::styled(controls, Style::default().add_modifier(Modifier::DIM)));

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Render the help overlay with keyboard shortcuts.
///
/// Displayed as a centered modal on top of the current section.
pub fn render_help(frame: &mut Frame, app: &App, area: Rect) {
    let bold = Style::default().add_modifier(Modifier::BOLD);
    let help_text = vec![
        Line::from(vec![Span::styled("Keyboard Shortcuts", app.theme.header)]),
        Line::from(""),
        Line::from(vec![Span::styled(" Navigation", bold)]),
        Line::from("  1-4         Jump to section"),
        Line::from("  ←/→ Tab     Switch sections"),
        Line::from("  ↑/↓ j/k     Move selection"),
        Line::from("  Enter       Stat detail (dashboard)"),
        Line::from("  Esc         Close overlay"),
        Line::from(""),
        Line::from(vec![Span::styled(" General", bold)]),
        Line::from("  r         Refresh all data"),
        Line::from("  e         Export to JSON"),
        Line::from("  b         Toggle backdrop"),
        Line::from("  q         Quit"),
        Line::from(""),
        Line::from(vec![Span::styled(
            "Press any key to close",
            Style::default().add_modifier(Modifier::DIM),
        )]),
    ];

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.highlight));

    let paragraph = Paragraph::new(help_text).block(block);

    let help_area = centered(
        area,
        42.min(area.width.saturating_sub(4)),
        18.min(area.height.saturating_sub(2)),
    );

    frame.render_widget(Clear, help_area);
    frame.render_widget(paragraph, help_area);
}

/// Message shown when the terminal is below the minimum size.
pub fn render_too_small(frame: &mut Frame, app: &App, area: Rect, min: (u16, u16)) {
    let msg = format!(
        "Terminal too small: {}x{}\nMinimum: {}x{}\n\nResize to continue",
        area.width, area.height, min.0, min.1
    );
    let paragraph = Paragraph::new(msg)
        .alignment(Alignment::Center)
        .style(Style::default().fg(app.theme.warning));
    let y = area.height.saturating_sub(5) / 2;
    frame.render_widget(paragraph, Rect::new(area.x, area.y + y, area.width, 5.min(area.height)));
}
