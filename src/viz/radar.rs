//! Threat radar: rings, spokes, fixed threat markers and a rotating sweep.

use std::f64::consts::{PI, TAU};

use super::{palette, severity_color};
use crate::animation::{FrameContext, Scene};
use crate::source::Severity;
use crate::surface::{GradientStop, Point, RenderSurface};

const RINGS: usize = 4;
const SPOKES: usize = 8;
const MARGIN: f64 = 20.0;
const MARKER_RADIUS: f64 = 4.0;

/// A marker at a fixed polar position (angle in radians, distance as a
/// fraction of the radar radius).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Marker {
    pub angle: f64,
    pub distance: f64,
    pub severity: Severity,
}

pub const MARKERS: [Marker; 6] = [
    Marker { angle: 0.5, distance: 0.7, severity: Severity::Critical },
    Marker { angle: 1.2, distance: 0.4, severity: Severity::High },
    Marker { angle: 2.1, distance: 0.8, severity: Severity::Medium },
    Marker { angle: 3.8, distance: 0.3, severity: Severity::High },
    Marker { angle: 4.7, distance: 0.6, severity: Severity::Critical },
    Marker { angle: 5.9, distance: 0.5, severity: Severity::Medium },
];

/// Sweep angle in radians after `elapsed_secs`: one radian per second.
pub fn sweep_angle(elapsed_secs: f64) -> f64 {
    elapsed_secs.rem_euclid(TAU)
}

/// Centre and radius of the radar on a `width` x `height` surface.
pub fn geometry(width: f64, height: f64) -> (Point, f64) {
    let center = Point::new(width / 2.0, height / 2.0);
    let half = center.x.min(center.y);
    // Small panels cannot afford the full margin.
    let radius = (half - MARGIN).max(half * 0.8);
    (center, radius)
}

pub fn marker_position(marker: &Marker, center: Point, radius: f64) -> Point {
    center.polar(marker.angle, radius * marker.distance)
}

pub fn draw(surface: &mut dyn RenderSurface, elapsed_secs: f64) {
    let (center, radius) = geometry(surface.width(), surface.height());
    if radius <= 0.0 {
        return;
    }

    let grid = palette::CYAN.with_alpha(0.3);
    for i in 1..=RINGS {
        surface.circle(center, radius / RINGS as f64 * i as f64, grid);
    }
    for i in 0..SPOKES {
        let angle = i as f64 * PI / 4.0;
        surface.line(center, center.polar(angle, radius), grid);
    }

    for marker in &MARKERS {
        surface.fill_circle(
            marker_position(marker, center, radius),
            MARKER_RADIUS,
            severity_color(marker.severity),
        );
    }

    let angle = sweep_angle(elapsed_secs);
    surface.gradient_line(
        center,
        center.polar(angle, radius),
        &[
            GradientStop::new(0.0, palette::SWEEP.with_alpha(0.8)),
            GradientStop::new(0.5, palette::SWEEP.with_alpha(0.3)),
            GradientStop::new(1.0, palette::SWEEP.with_alpha(0.0)),
        ],
    );
}

/// Stateless; the sweep is derived from elapsed time.
#[derive(Debug, Default)]
pub struct RadarScene;

impl Scene for RadarScene {
    fn tick(&mut self, surface: &mut dyn RenderSurface, frame: &FrameContext<'_>) {
        draw(surface, frame.time.elapsed_secs());
    }
}
