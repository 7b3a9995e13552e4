//! Visualization scenes.
//!
//! Each submodule exposes pure draw functions that take a
//! [`RenderSurface`] plus the data to draw, and a [`Scene`] implementation
//! that owns whatever geometry animates between frames.
//!
//! | Surface | Scene |
//! |---|---|
//! | `matrix-canvas` | [`particles::ParticleField`] |
//! | `threat-radar` | [`radar::RadarScene`] |
//! | `network-map` | [`network::NetworkMap`] |
//! | `network-topology` | [`topology::TopologyScene`] |
//! | `performance-chart` | [`timeseries::PerformanceScene`] |
//! | `*-chart` stat cards | [`sparkline::SparklineScene`] |
//! | `detail-chart` | [`timeseries::DetailScene`] |

pub mod network;
pub mod particles;
pub mod radar;
pub mod sparkline;
pub mod timeseries;
pub mod topology;

use crate::animation::Scene;
use crate::config::RenderConfig;
use crate::data::StatSlot;
use crate::source::Severity;
use crate::surface::{Point, Rgba, SurfaceId};

/// Dashboard palette.
pub mod palette {
    use crate::surface::Rgba;

    pub const CYAN: Rgba = Rgba::hex(0x00d4ff);
    pub const GREEN: Rgba = Rgba::hex(0x00ff88);
    pub const RED: Rgba = Rgba::hex(0xff3366);
    pub const ORANGE: Rgba = Rgba::hex(0xff8800);
    pub const SWEEP: Rgba = Rgba::hex(0x00ffff);
    pub const WHITE: Rgba = Rgba::hex(0xffffff);
}

/// Surface identifiers.
pub mod ids {
    use crate::surface::SurfaceId;

    pub const BACKDROP: SurfaceId = "matrix-canvas";
    pub const RADAR: SurfaceId = "threat-radar";
    pub const NETWORK_MAP: SurfaceId = "network-map";
    pub const PERFORMANCE: SurfaceId = "performance-chart";
    pub const TOPOLOGY: SurfaceId = "network-topology";
    pub const THREAT_SPARK: SurfaceId = "threat-chart";
    pub const ALERT_SPARK: SurfaceId = "alert-chart";
    pub const CONNECTION_SPARK: SurfaceId = "network-chart";
    pub const CPU_SPARK: SurfaceId = "cpu-chart";
    pub const DETAIL: SurfaceId = "detail-chart";
}

pub fn severity_color(severity: Severity) -> Rgba {
    match severity {
        Severity::Critical => palette::RED,
        Severity::High => palette::ORANGE,
        Severity::Medium => palette::CYAN,
        Severity::Low => palette::GREEN,
    }
}

/// Accent colour of a stat card.
pub fn stat_color(slot: StatSlot) -> Rgba {
    match slot {
        StatSlot::Threats => palette::RED,
        StatSlot::Alerts => palette::ORANGE,
        StatSlot::Connections => palette::CYAN,
        StatSlot::Cpu => palette::GREEN,
    }
}

/// Sparkline surface for a stat card.
pub fn sparkline_surface(slot: StatSlot) -> SurfaceId {
    match slot {
        StatSlot::Threats => ids::THREAT_SPARK,
        StatSlot::Alerts => ids::ALERT_SPARK,
        StatSlot::Connections => ids::CONNECTION_SPARK,
        StatSlot::Cpu => ids::CPU_SPARK,
    }
}

/// Kind of a graph node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Router,
    Server,
    Firewall,
    Switch,
    Host,
}

impl NodeKind {
    pub fn color(&self) -> Rgba {
        match self {
            NodeKind::Router => palette::CYAN,
            NodeKind::Server => palette::GREEN,
            NodeKind::Firewall => palette::RED,
            NodeKind::Switch => palette::ORANGE,
            NodeKind::Host => palette::CYAN,
        }
    }
}

/// A node owned by the scene that created it.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphNode {
    pub position: Point,
    pub velocity: Option<Point>,
    pub label: String,
    pub kind: NodeKind,
    pub radius: f64,
    pub color: Rgba,
}

/// Build the scene that paints `surface`, if it is animated.
pub fn scene_for(surface: SurfaceId, render: &RenderConfig) -> Option<Box<dyn Scene>> {
    let scene: Box<dyn Scene> = match surface {
        ids::BACKDROP => Box::new(particles::ParticleField::new(
            render.particles,
            render.link_distance,
        )),
        ids::RADAR => Box::new(radar::RadarScene),
        ids::NETWORK_MAP => Box::new(network::NetworkMap::new()),
        ids::TOPOLOGY => Box::new(topology::TopologyScene),
        ids::PERFORMANCE => Box::new(timeseries::PerformanceScene),
        ids::THREAT_SPARK => Box::new(sparkline::SparklineScene::new(StatSlot::Threats)),
        ids::ALERT_SPARK => Box::new(sparkline::SparklineScene::new(StatSlot::Alerts)),
        ids::CONNECTION_SPARK => Box::new(sparkline::SparklineScene::new(StatSlot::Connections)),
        ids::CPU_SPARK => Box::new(sparkline::SparklineScene::new(StatSlot::Cpu)),
        ids::DETAIL => Box::new(timeseries::DetailScene::new(StatSlot::Threats)),
        _ => return None,
    };
    Some(scene)
}
