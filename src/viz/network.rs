//! Network map: drifting nodes with random decorative links.
//!
//! The links are noise redrawn every frame. They do not reflect real
//! connections.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use super::{palette, GraphNode, NodeKind};
use crate::animation::{FrameContext, Scene};
use crate::surface::{Point, RenderSurface};

pub const NODE_COUNT: usize = 15;

/// Probability that a given pair is linked in a frame.
pub const EDGE_PROBABILITY: f64 = 0.3;

const NODE_COLORS: [crate::surface::Rgba; 4] = [
    palette::CYAN,
    palette::GREEN,
    palette::ORANGE,
    palette::RED,
];

#[derive(Debug)]
pub struct NetworkMap {
    nodes: Vec<GraphNode>,
    rng: StdRng,
}

impl Default for NetworkMap {
    fn default() -> Self {
        Self::new()
    }
}

impl NetworkMap {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    pub fn with_rng(rng: StdRng) -> Self {
        Self {
            nodes: Vec::new(),
            rng,
        }
    }

    pub fn nodes(&self) -> &[GraphNode] {
        &self.nodes
    }

    /// Place nodes at random over the surface.
    pub fn seed(&mut self, width: f64, height: f64) {
        let rng = &mut self.rng;
        self.nodes = (0..NODE_COUNT)
            .map(|i| GraphNode {
                position: Point::new(rng.gen::<f64>() * width, rng.gen::<f64>() * height),
                velocity: Some(Point::new(
                    rng.gen_range(-0.25..0.25),
                    rng.gen_range(-0.25..0.25),
                )),
                label: format!("node-{i}"),
                kind: NodeKind::Host,
                radius: rng.gen_range(2.0..6.0),
                color: *NODE_COLORS.choose(rng).unwrap_or(&palette::CYAN),
            })
            .collect();
    }

    /// Move every node one frame, bouncing off the edges.
    pub fn step(&mut self, width: f64, height: f64) {
        for node in &mut self.nodes {
            let Some(velocity) = node.velocity.as_mut() else {
                continue;
            };
            node.position.x += velocity.x;
            node.position.y += velocity.y;
            if node.position.x <= 0.0 || node.position.x >= width {
                velocity.x = -velocity.x;
            }
            if node.position.y <= 0.0 || node.position.y >= height {
                velocity.y = -velocity.y;
            }
            node.position.x = node.position.x.clamp(0.0, width);
            node.position.y = node.position.y.clamp(0.0, height);
        }
    }

    /// Pick this frame's decorative links.
    pub fn decorative_edges(&mut self) -> Vec<(usize, usize)> {
        let n = self.nodes.len();
        let mut edges = Vec::new();
        for i in 0..n {
            for j in (i + 1)..n {
                if self.rng.gen_bool(EDGE_PROBABILITY) {
                    edges.push((i, j));
                }
            }
        }
        edges
    }
}

impl Scene for NetworkMap {
    fn tick(&mut self, surface: &mut dyn RenderSurface, _frame: &FrameContext<'_>) {
        let (width, height) = surface.size();
        if width <= 0.0 || height <= 0.0 {
            return;
        }
        if self.nodes.is_empty() {
            self.seed(width, height);
        }

        let link = palette::CYAN.with_alpha(0.2);
        for (i, j) in self.decorative_edges() {
            surface.line(self.nodes[i].position, self.nodes[j].position, link);
        }
        for node in &self.nodes {
            surface.fill_circle(node.position, node.radius, node.color);
        }
        self.step(width, height);
    }
}
