//! Threats section rendering.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Cell, Paragraph, Row, Table, TableState},
    Frame,
};

use super::common;
use crate::app::{App, THREAT_ROWS};
use crate::data::SeverityCounts;
use crate::source::Severity;

/// Render the Threats section: per-severity counters over the threat table.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let [counters, table_area] =
        Layout::vertical([Constraint::Length(3), Constraint::Fill(1)]).areas(area);

    let threats = app.state().threats().latest();
    let counts = threats
        .as_deref()
        .map(|t| SeverityCounts::from_threats(t))
        .unwrap_or_default();

    let boxes: [Rect; 4] = Layout::horizontal([Constraint::Ratio(1, 4); 4]).areas(counters);
    for (severity, area) in Severity::ALL.iter().zip(boxes) {
        let line = Line::from(Span::styled(
            counts.get(*severity).to_string(),
            app.theme.severity_style(*severity).add_modifier(Modifier::BOLD),
        ));
        let paragraph = Paragraph::new(line).block(common::panel(format!(" {} ", severity.label()), app));
        frame.render_widget(paragraph, area);
    }

    let header = Row::new(vec![
        Cell::from("Severity"),
        Cell::from("Type"),
        Cell::from("Source"),
        Cell::from("Target"),
        Cell::from("Time"),
        Cell::from("Status"),
    ])
    .height(1)
    .style(app.theme.header);

    let rows: Vec<Row> = threats
        .as_deref()
        .map(|threats| {
            threats
                .iter()
                .take(THREAT_ROWS)
                .map(|t| {
                    Row::new(vec![
                        Cell::from(t.severity.label()).style(app.theme.severity_style(t.severity)),
                        Cell::from(t.kind.clone()),
                        Cell::from(t.source.clone()),
                        Cell::from(t.target.clone().unwrap_or_else(|| "N/A".to_string())),
                        Cell::from(t.timestamp.format("%Y-%m-%d %H:%M:%S").to_string()),
                        Cell::from(t.status.label()),
                    ])
                })
                .collect()
        })
        .unwrap_or_default();

    let widths = [
        Constraint::Min(9),
        Constraint::Fill(2),
        Constraint::Fill(2),
        Constraint::Fill(2),
        Constraint::Min(19),
        Constraint::Min(10),
    ];

    let total = threats.as_ref().map_or(0, |t| t.len());
    let title = format!(" Threats ({}/{}) ", rows.len(), total);
    let table = Table::new(rows, widths)
        .header(header)
        .block(common::panel(title, app))
        .row_highlight_style(app.theme.selected)
        .highlight_symbol("▶ ");

    let mut state = TableState::default();
    state.select((total > 0).then(|| app.clamped_row()));
    frame.render_stateful_widget(table, table_area, &mut state);
}
