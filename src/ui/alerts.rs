//! Alerts section rendering.

use chrono::Local;
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem, ListState, Paragraph},
    Frame,
};

use super::common;
use crate::app::{App, ALERT_ROWS};
use crate::data::AlertCounts;

/// Render the Alerts section: unread / today / week counters over the feed.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let [counters, feed] =
        Layout::vertical([Constraint::Length(3), Constraint::Fill(1)]).areas(area);

    let alerts = app.state().alerts().latest();
    let counts = alerts
        .as_deref()
        .map(|a| AlertCounts::from_alerts(a, Local::now()))
        .unwrap_or_default();

    let boxes: [Rect; 3] = Layout::horizontal([Constraint::Ratio(1, 3); 3]).areas(counters);
    let values = [
        (" Unread ", counts.unread, app.theme.critical),
        (" Today ", counts.today, app.theme.warning),
        (" Last 7 Days ", counts.week, app.theme.highlight),
    ];
    for ((title, value, color), area) in values.into_iter().zip(boxes) {
        let line = Line::from(Span::styled(
            value.to_string(),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ));
        frame.render_widget(Paragraph::new(line).block(common::panel(title, app)), area);
    }

    let items: Vec<ListItem> = alerts
        .as_deref()
        .map(|alerts| {
            alerts
                .iter()
                .take(ALERT_ROWS)
                .map(|a| {
                    let message_style = if a.acknowledged {
                        Style::default().add_modifier(Modifier::DIM)
                    } else {
                        Style::default()
                    };
                    ListItem::new(Line::from(vec![
                        Span::styled(
                            format!("{} {:<8} ", a.severity.icon(), a.severity.label()),
                            app.theme.severity_style(a.severity),
                        ),
                        Span::styled(a.message.clone(), message_style),
                        Span::styled(
                            a.timestamp.format("  %Y-%m-%d %H:%M:%S").to_string(),
                            Style::default().add_modifier(Modifier::DIM),
                        ),
                    ]))
                })
                .collect()
        })
        .unwrap_or_default();

    let total = alerts.as_ref().map_or(0, |a| a.len());
    let title = format!(" Alert Feed ({}/{}) ", items.len(), total);
    let list = List::new(items)
        .block(common::panel(title, app))
        .highlight_style(app.theme.selected)
        .highlight_symbol("▶ ");

    let mut state = ListState::default();
    state.select((total > 0).then(|| app.clamped_row()));
    frame.render_stateful_widget(list, feed, &mut state);
}
