//! Network section rendering.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Cell, Paragraph, Row, Table, TableState},
    Frame,
};

use super::{canvas, common};
use crate::app::{App, CONNECTION_ROWS};
use crate::data::{format_bytes, ConnectionCounts};
use crate::surface::SurfaceId;
use crate::viz::ids;

/// Panel rectangles for one content area.
#[derive(Debug, Clone, Copy)]
pub struct Areas {
    pub total: Rect,
    pub secure: Rect,
    pub topology: Rect,
    pub table: Rect,
}

impl Areas {
    pub fn new(area: Rect) -> Self {
        let [counters, body] =
            Layout::vertical([Constraint::Length(3), Constraint::Fill(1)]).areas(area);
        let [total, secure] =
            Layout::horizontal([Constraint::Ratio(1, 2), Constraint::Ratio(1, 2)]).areas(counters);
        let [topology, table] =
            Layout::horizontal([Constraint::Percentage(40), Constraint::Percentage(60)]).areas(body);
        Self {
            total,
            secure,
            topology,
            table,
        }
    }

    pub fn surfaces(&self) -> Vec<(SurfaceId, Rect)> {
        vec![(ids::TOPOLOGY, common::inner(self.topology))]
    }
}

/// Render the Network section: connection counters, topology and table.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let areas = Areas::new(area);
    let connections = app.state().connections().latest();
    let counts = connections
        .as_deref()
        .map(|c| ConnectionCounts::from_connections(c))
        .unwrap_or_default();

    let counter = |value: usize, color: Color| {
        Line::from(Span::styled(
            value.to_string(),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ))
    };
    frame.render_widget(
        Paragraph::new(counter(counts.total, app.theme.highlight))
            .block(common::panel(" Total Connections ", app)),
        areas.total,
    );
    frame.render_widget(
        Paragraph::new(counter(counts.secure, app.theme.healthy))
            .block(common::panel(" Secure Connections ", app)),
        areas.secure,
    );

    canvas::render(
        frame,
        app.surfaces().get(ids::TOPOLOGY),
        &app.theme,
        Some(common::panel(" Topology ", app)),
        areas.topology,
    );

    let header = Row::new(vec![
        Cell::from("Protocol"),
        Cell::from("Local"),
        Cell::from("Remote"),
        Cell::from("Status"),
        Cell::from("Duration"),
        Cell::from("Sent / Received"),
    ])
    .height(1)
    .style(app.theme.header);

    let rows: Vec<Row> = connections
        .as_deref()
        .map(|connections| {
            connections
                .iter()
                .take(CONNECTION_ROWS)
                .map(|c| {
                    let protocol_style = if c.is_secure() {
                        Style::default().fg(app.theme.healthy)
                    } else {
                        Style::default()
                    };
                    Row::new(vec![
                        Cell::from(c.protocol.clone()).style(protocol_style),
                        Cell::from(c.local_address.clone()),
                        Cell::from(c.remote_endpoint()),
                        Cell::from(c.status.label()),
                        Cell::from(
                            c.duration_seconds
                                .map(|s| format!("{s}s"))
                                .unwrap_or_else(|| "N/A".to_string()),
                        ),
                        Cell::from(format!(
                            "{} / {}",
                            format_bytes(c.bytes_sent),
                            format_bytes(c.bytes_received)
                        )),
                    ])
                })
                .collect()
        })
        .unwrap_or_default();

    let widths = [
        Constraint::Min(8),
        Constraint::Fill(2),
        Constraint::Fill(2),
        Constraint::Min(11),
        Constraint::Min(8),
        Constraint::Fill(2),
    ];

    let title = format!(" Connections ({}/{}) ", rows.len(), counts.total);
    let table = Table::new(rows, widths)
        .header(header)
        .block(common::panel(title, app))
        .row_highlight_style(app.theme.selected)
        .highlight_symbol("▶ ");

    let mut state = TableState::default();
    state.select((counts.total > 0).then(|| app.clamped_row()));
    frame.render_stateful_widget(table, areas.table, &mut state);
}
