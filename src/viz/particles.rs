//! Particle backdrop.
//!
//! A field of slowly drifting dots that bounce off the surface edges, with
//! faint links between close pairs, over a square grid and a handful of
//! drifting hexagons. Link detection compares every pair, so the particle
//! count has to stay small.

use std::f64::consts::PI;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::palette;
use crate::animation::{FrameContext, Scene};
use crate::surface::{Point, RenderSurface};

/// Grid spacing in pixels.
pub const GRID_SIZE: f64 = 50.0;

const HEXAGONS: usize = 5;

/// Largest per-frame speed on each axis.
const MAX_SPEED: f64 = 0.25;

#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub position: Point,
    pub velocity: Point,
    pub radius: f64,
    pub opacity: f64,
}

/// Bounce `pos` off `[0, max]`, flipping `vel` when it points outward.
fn bounce(pos: &mut f64, vel: &mut f64, max: f64) {
    if *pos <= 0.0 {
        *pos = 0.0;
        *vel = vel.abs();
    } else if *pos >= max {
        *pos = max;
        *vel = -vel.abs();
    }
}

#[derive(Debug)]
pub struct ParticleField {
    particles: Vec<Particle>,
    count: usize,
    link_distance: f64,
    rng: StdRng,
}

impl ParticleField {
    pub fn new(count: usize, link_distance: f64) -> Self {
        Self::with_rng(count, link_distance, StdRng::from_entropy())
    }

    pub fn with_rng(count: usize, link_distance: f64, rng: StdRng) -> Self {
        Self {
            particles: Vec::with_capacity(count),
            count,
            link_distance,
            rng,
        }
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Scatter particles over a `width` x `height` surface.
    pub fn seed(&mut self, width: f64, height: f64) {
        let rng = &mut self.rng;
        self.particles = (0..self.count)
            .map(|_| Particle {
                position: Point::new(rng.gen::<f64>() * width, rng.gen::<f64>() * height),
                velocity: Point::new(
                    rng.gen_range(-MAX_SPEED..MAX_SPEED),
                    rng.gen_range(-MAX_SPEED..MAX_SPEED),
                ),
                radius: rng.gen_range(1.0..3.0),
                opacity: rng.gen_range(0.2..0.7),
            })
            .collect();
    }

    /// Advance every particle by one frame.
    ///
    /// Positions are clamped into the surface, so a particle left outside by
    /// a shrinking resize is pulled back on the next step.
    pub fn step(&mut self, width: f64, height: f64) {
        for p in &mut self.particles {
            p.position.x += p.velocity.x;
            p.position.y += p.velocity.y;
            bounce(&mut p.position.x, &mut p.velocity.x, width);
            bounce(&mut p.position.y, &mut p.velocity.y, height);
        }
    }

    /// Pairs closer than the link distance, with the link opacity.
    pub fn links(&self) -> Vec<(usize, usize, f64)> {
        let mut links = Vec::new();
        for (i, a) in self.particles.iter().enumerate() {
            for (j, b) in self.particles.iter().enumerate().skip(i + 1) {
                let d = a.position.distance(&b.position);
                if d < self.link_distance {
                    links.push((i, j, 0.1 * (1.0 - d / self.link_distance)));
                }
            }
        }
        links
    }

    pub fn draw(&self, surface: &mut dyn RenderSurface, elapsed_secs: f64) {
        let (width, height) = surface.size();
        draw_grid(surface, width, height);

        for p in &self.particles {
            surface.fill_circle(p.position, p.radius, palette::GREEN.with_alpha(p.opacity));
        }

        for (i, j, alpha) in self.links() {
            surface.line(
                self.particles[i].position,
                self.particles[j].position,
                palette::CYAN.with_alpha(alpha),
            );
        }

        for i in 0..HEXAGONS {
            let (center, size, alpha) = hexagon(i, elapsed_secs, width, height);
            let vertices = hexagon_vertices(center, size);
            let color = palette::RED.with_alpha(alpha);
            for k in 0..vertices.len() {
                surface.line(vertices[k], vertices[(k + 1) % vertices.len()], color);
            }
        }
    }
}

impl Scene for ParticleField {
    fn tick(&mut self, surface: &mut dyn RenderSurface, frame: &FrameContext<'_>) {
        let (width, height) = surface.size();
        if width <= 0.0 || height <= 0.0 {
            return;
        }
        if self.particles.len() != self.count {
            self.seed(width, height);
        }
        self.step(width, height);
        self.draw(surface, frame.time.elapsed_secs());
    }
}

fn draw_grid(surface: &mut dyn RenderSurface, width: f64, height: f64) {
    let color = palette::CYAN.with_alpha(0.1);
    let mut x = 0.0;
    while x < width {
        surface.line(Point::new(x, 0.0), Point::new(x, height), color);
        x += GRID_SIZE;
    }
    let mut y = 0.0;
    while y < height {
        surface.line(Point::new(0.0, y), Point::new(width, y), color);
        y += GRID_SIZE;
    }
}

/// Centre, size and opacity of hexagon `index` at time `t` seconds.
///
/// Drift amplitude and size shrink with the surface so small panels still
/// show whole hexagons.
pub fn hexagon(index: usize, t: f64, width: f64, height: f64) -> (Point, f64, f64) {
    let phase = index as f64;
    let scale = (width.min(height) / 300.0).clamp(0.25, 1.0);
    let center = Point::new(
        (t * 0.3 + phase).sin() * 100.0 * scale + width / 2.0,
        (t * 0.2 + phase).cos() * 50.0 * scale + height / 2.0,
    );
    let size = (20.0 + (t + phase).sin() * 5.0) * scale;
    let alpha = 0.2 + (t + phase).sin() * 0.1;
    (center, size, alpha)
}

pub fn hexagon_vertices(center: Point, size: f64) -> [Point; 6] {
    std::array::from_fn(|i| center.polar(i as f64 * PI / 3.0, size))
}
