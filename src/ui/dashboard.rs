//! Dashboard section rendering.
//!
//! Four animated stat cards across the top, then three rows of panels:
//! radar, threat list and alert stream; network map, performance chart and
//! connection list; resource gauges and system logs.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Gauge, List, ListItem, Paragraph},
    Frame,
};

use super::{canvas, common};
use crate::app::App;
use crate::data::{format_bytes, format_count, format_speed, Load, StatSlot, SystemMetric};
use crate::surface::SurfaceId;
use crate::viz::{ids, sparkline_surface};

pub const THREAT_LIST_ROWS: usize = 5;
pub const ALERT_STREAM_ROWS: usize = 10;
pub const CONNECTION_LIST_ROWS: usize = 8;

/// Panel rectangles for one content area.
#[derive(Debug, Clone, Copy)]
pub struct Areas {
    pub cards: [Rect; 4],
    pub radar: Rect,
    pub threats: Rect,
    pub alerts: Rect,
    pub network_map: Rect,
    pub performance: Rect,
    pub connections: Rect,
    pub resources: Rect,
    pub logs: Rect,
}

impl Areas {
    pub fn new(area: Rect) -> Self {
        let [cards, top, middle, bottom] = Layout::vertical([
            Constraint::Length(5),
            Constraint::Fill(1),
            Constraint::Fill(1),
            Constraint::Fill(1),
        ])
        .areas(area);
        let cards: [Rect; 4] = Layout::horizontal([Constraint::Ratio(1, 4); 4]).areas(cards);
        let [radar, threats, alerts] = Layout::horizontal([
            Constraint::Percentage(30),
            Constraint::Percentage(35),
            Constraint::Percentage(35),
        ])
        .areas(top);
        let [network_map, performance, connections] = Layout::horizontal([
            Constraint::Percentage(30),
            Constraint::Percentage(40),
            Constraint::Percentage(30),
        ])
        .areas(middle);
        let [resources, logs] =
            Layout::horizontal([Constraint::Percentage(40), Constraint::Percentage(60)])
                .areas(bottom);

        Self {
            cards,
            radar,
            threats,
            alerts,
            network_map,
            performance,
            connections,
            resources,
            logs,
        }
    }

    /// Value line and sparkline canvas inside a stat card.
    pub fn card_parts(card: Rect) -> (Rect, Rect) {
        let [value, spark] =
            Layout::vertical([Constraint::Length(1), Constraint::Fill(1)]).areas(common::inner(card));
        (value, spark)
    }

    /// Canvas rectangles for every animated panel.
    pub fn surfaces(&self) -> Vec<(SurfaceId, Rect)> {
        let mut surfaces = vec![
            (ids::RADAR, common::inner(self.radar)),
            (ids::NETWORK_MAP, common::inner(self.network_map)),
            (ids::PERFORMANCE, common::inner(self.performance)),
        ];
        for (slot, card) in StatSlot::ALL.iter().zip(self.cards) {
            surfaces.push((sparkline_surface(*slot), Self::card_parts(card).1));
        }
        surfaces
    }
}

/// Render the Dashboard section.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let areas = Areas::new(area);

    for (slot, card) in StatSlot::ALL.iter().zip(areas.cards) {
        render_card(frame, app, *slot, card);
    }

    let surfaces = app.surfaces();
    canvas::render(
        frame,
        surfaces.get(ids::RADAR),
        &app.theme,
        Some(common::panel(" Threat Radar ", app)),
        areas.radar,
    );
    canvas::render(
        frame,
        surfaces.get(ids::NETWORK_MAP),
        &app.theme,
        Some(common::panel(" Network Map ", app)),
        areas.network_map,
    );
    canvas::render(
        frame,
        surfaces.get(ids::PERFORMANCE),
        &app.theme,
        Some(common::panel(performance_title(app), app)),
        areas.performance,
    );

    render_threats(frame, app, areas.threats);
    render_alerts(frame, app, areas.alerts);
    render_connections(frame, app, areas.connections);
    render_resources(frame, app, areas.resources);
    render_logs(frame, app, areas.logs);
}

fn render_card(frame: &mut Frame, app: &App, slot: StatSlot, area: Rect) {
    let selected = app.selected_stat == slot;
    let mut block = common::panel(format!(" {} ", slot.label()), app);
    if selected {
        block = block.border_style(Style::default().fg(app.theme.highlight));
    }
    frame.render_widget(block, area);

    let (value_area, spark_area) = Areas::card_parts(area);
    let mut spans = vec![Span::styled(
        format!("{}{}", format_count(app.animator().shown(slot)), slot.unit()),
        Style::default().add_modifier(Modifier::BOLD),
    )];
    if let Some(delta) = app.history().delta(slot) {
        let (arrow, color) = if delta > 0.0 {
            ("▲", app.theme.critical)
        } else if delta < 0.0 {
            ("▼", app.theme.healthy)
        } else {
            ("=", app.theme.border)
        };
        spans.push(Span::styled(
            format!(" {arrow}{:.0}", delta.abs()),
            Style::default().fg(color),
        ));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), value_area);

    canvas::render(
        frame,
        app.surfaces().get(sparkline_surface(slot)),
        &app.theme,
        None,
        spark_area,
    );
}

fn performance_title(app: &App) -> Line<'static> {
    Line::from(vec![
        Span::raw(" Performance "),
        Span::styled("cpu ", Style::default().fg(app.theme.highlight)),
        Span::styled("mem ", Style::default().fg(app.theme.warning)),
        Span::styled("net ", Style::default().fg(app.theme.healthy)),
    ])
}

fn render_threats(frame: &mut Frame, app: &App, area: Rect) {
    let items: Vec<ListItem> = app
        .state()
        .threats()
        .latest()
        .map(|threats| {
            threats
                .iter()
                .take(THREAT_LIST_ROWS)
                .map(|t| {
                    ListItem::new(Line::from(vec![
                        Span::styled(format!("{:<8} ", t.severity.label()), app.theme.severity_style(t.severity)),
                        Span::raw(format!("{} from {} ", t.kind, t.source)),
                        Span::styled(
                            t.timestamp.format("%H:%M:%S").to_string(),
                            Style::default().add_modifier(Modifier::DIM),
                        ),
                    ]))
                })
                .collect()
        })
        .unwrap_or_default();

    frame.render_widget(List::new(items).block(common::panel(" Recent Threats ", app)), area);
}

fn render_alerts(frame: &mut Frame, app: &App, area: Rect) {
    let alerts = app.state().alerts().latest();
    let count = alerts.as_ref().map_or(0, |a| a.len());
    let items: Vec<ListItem> = alerts
        .map(|alerts| {
            alerts
                .iter()
                .take(ALERT_STREAM_ROWS)
                .map(|a| {
                    ListItem::new(Line::from(vec![
                        Span::styled(format!("{} ", a.severity.icon()), app.theme.severity_style(a.severity)),
                        Span::raw(a.message.clone()),
                    ]))
                })
                .collect()
        })
        .unwrap_or_default();

    let title = format!(" Alert Stream ({count}) ");
    frame.render_widget(List::new(items).block(common::panel(title, app)), area);
}

fn render_connections(frame: &mut Frame, app: &App, area: Rect) {
    let items: Vec<ListItem> = app
        .state()
        .connections()
        .latest()
        .map(|connections| {
            connections
                .iter()
                .take(CONNECTION_LIST_ROWS)
                .map(|c| {
                    ListItem::new(Line::from(vec![
                        Span::styled(format!("{:<6}", c.protocol), Style::default().fg(app.theme.highlight)),
                        Span::raw(format!("{} ", c.remote_endpoint())),
                        Span::styled(
                            format!("↑{} ↓{}", format_bytes(c.bytes_sent), format_bytes(c.bytes_received)),
                            Style::default().add_modifier(Modifier::DIM),
                        ),
                    ]))
                })
                .collect()
        })
        .unwrap_or_default();

    frame.render_widget(
        List::new(items).block(common::panel(" Live Connections ", app)),
        area,
    );
}

fn render_resources(frame: &mut Frame, app: &App, area: Rect) {
    let block = common::panel(" System Resources ", app);
    frame.render_widget(block, area);
    let inner = common::inner(area);

    let system = app
        .state()
        .status()
        .latest()
        .and_then(|s| s.system)
        .unwrap_or_default();

    let mut rows = [Constraint::Length(1); 5];
    rows[4] = Constraint::Fill(1);
    let rows: [Rect; 5] = Layout::vertical(rows).areas(inner);

    for (metric, row) in SystemMetric::ALL.iter().zip(rows) {
        let percent = metric.percent(&system);
        let gauge = Gauge::default()
            .gauge_style(app.theme.load_style(Load::from_percent(percent)))
            .ratio(percent / 100.0)
            .label(format!("{:<7} {:>3.0}%", metric.label(), percent));
        frame.render_widget(gauge, row);
    }

    let speeds = Line::from(vec![
        Span::raw("Upload "),
        Span::styled(format_speed(system.network_out), Style::default().fg(app.theme.healthy)),
        Span::raw("  Download "),
        Span::styled(format_speed(system.network_in), Style::default().fg(app.theme.highlight)),
    ]);
    frame.render_widget(Paragraph::new(speeds), rows[4]);
}

fn render_logs(frame: &mut Frame, app: &App, area: Rect) {
    let visible = common::inner(area).height as usize;
    let items: Vec<ListItem> = app
        .state()
        .logs()
        .latest()
        .map(|logs| {
            logs.iter()
                .take(visible)
                .map(|l| {
                    ListItem::new(Line::from(vec![
                        Span::styled(
                            l.timestamp.format("%H:%M:%S ").to_string(),
                            Style::default().add_modifier(Modifier::DIM),
                        ),
                        Span::styled(format!("{:<5} ", l.level.label()), app.theme.level_style(l.level)),
                        Span::styled(format!("[{}] ", l.source), Style::default().fg(app.theme.border)),
                        Span::raw(l.message.clone()),
                    ]))
                })
                .collect()
        })
        .unwrap_or_default();

    frame.render_widget(List::new(items).block(common::panel(" System Logs ", app)), area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_surfaces_are_inside_their_panels() {
        let areas = Areas::new(Rect::new(0, 2, 120, 40));
        let surfaces = areas.surfaces();
        assert_eq!(surfaces.len(), 7);

        let (_, radar) = surfaces[0];
        assert_eq!(radar, common::inner(areas.radar));
        for (_, rect) in &surfaces {
            assert!(rect.width > 0 && rect.height > 0);
        }

        let (value, spark) = Areas::card_parts(areas.cards[0]);
        assert_eq!(value.height, 1);
        assert_eq!(spark.y, value.y + 1);
    }
}
