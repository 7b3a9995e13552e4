//! Fixed four-node network topology.

use super::{palette, GraphNode, NodeKind};
use crate::animation::{FrameContext, Scene};
use crate::surface::{Point, RenderSurface};

/// Node kinds with their position as a fraction of the surface.
const LAYOUT: [(NodeKind, &str, f64, f64); 4] = [
    (NodeKind::Router, "Router", 0.5, 0.2),
    (NodeKind::Server, "Server", 0.2, 0.6),
    (NodeKind::Firewall, "Firewall", 0.8, 0.6),
    (NodeKind::Switch, "Switch", 0.5, 0.8),
];

/// Node radius for a surface, capped at 20 px.
pub fn node_radius(width: f64, height: f64) -> f64 {
    (width.min(height) / 12.0).clamp(2.0, 20.0)
}

pub fn topology_nodes(width: f64, height: f64) -> Vec<GraphNode> {
    let radius = node_radius(width, height);
    LAYOUT
        .iter()
        .map(|&(kind, label, fx, fy)| GraphNode {
            position: Point::new(width * fx, height * fy),
            velocity: None,
            label: label.to_string(),
            kind,
            radius,
            color: kind.color(),
        })
        .collect()
}

pub fn draw(surface: &mut dyn RenderSurface) {
    let (width, height) = surface.size();
    let nodes = topology_nodes(width, height);

    let edge = palette::CYAN.with_alpha(0.5);
    for (i, a) in nodes.iter().enumerate() {
        for b in &nodes[i + 1..] {
            surface.line(a.position, b.position, edge);
        }
    }

    for node in &nodes {
        surface.fill_circle(node.position, node.radius, node.color);
        // Label centred under the node.
        let half_text = node.label.chars().count() as f64;
        surface.text(
            Point::new(node.position.x - half_text, node.position.y + node.radius + 4.0),
            &node.label,
            palette::WHITE,
        );
    }
}

#[derive(Debug, Default)]
pub struct TopologyScene;

impl Scene for TopologyScene {
    fn tick(&mut self, surface: &mut dyn RenderSurface, _frame: &FrameContext<'_>) {
        draw(surface);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{CanvasSurface, Shape};

    #[test]
    fn test_nodes_at_proportional_positions() {
        let nodes = topology_nodes(200.0, 100.0);
        assert_eq!(nodes.len(), 4);
        assert_eq!(nodes[0].label, "Router");
        assert_eq!(nodes[0].position, Point::new(100.0, 20.0));
        assert_eq!(nodes[2].kind, NodeKind::Firewall);
        assert_eq!(nodes[2].position, Point::new(160.0, 60.0));
        assert_eq!(nodes[2].color, palette::RED);
    }

    #[test]
    fn test_every_pair_connected() {
        let mut surface = CanvasSurface::new(200.0, 100.0);
        draw(&mut surface);

        let shapes = surface.shapes();
        let edges = shapes.iter().filter(|s| matches!(s, Shape::Line { .. })).count();
        let labels: Vec<_> = shapes
            .iter()
            .filter_map(|s| match s {
                Shape::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(edges, 6);
        assert_eq!(labels, vec!["Router", "Server", "Firewall", "Switch"]);
    }

    #[test]
    fn test_node_radius_capped() {
        assert_eq!(node_radius(1000.0, 800.0), 20.0);
        assert_eq!(node_radius(10.0, 10.0), 2.0);
    }
}
