//! Stat card sparklines.

use super::stat_color;
use crate::animation::{FrameContext, Scene};
use crate::data::StatSlot;
use crate::surface::{Point, RenderSurface, Rgba};

/// Min-max normalise `values` into `0.0..=1.0`.
///
/// A flat series maps to all zeros.
pub fn normalize(values: &[f64]) -> Vec<f64> {
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let range = if max - min > 0.0 { max - min } else { 1.0 };
    values.iter().map(|v| (v - min) / range).collect()
}

/// Polyline points spanning the full surface; higher values sit higher.
pub fn points(values: &[f64], width: f64, height: f64) -> Vec<Point> {
    if values.len() < 2 {
        return Vec::new();
    }
    let last = (values.len() - 1) as f64;
    normalize(values)
        .into_iter()
        .enumerate()
        .map(|(i, n)| Point::new(i as f64 / last * width, height - n * height))
        .collect()
}

pub fn draw(surface: &mut dyn RenderSurface, values: &[f64], color: Rgba) {
    let (width, height) = surface.size();
    let points = points(values, width, height);
    surface.polyline(&points, color);
}

/// Sparkline for one stat card, fed from the status history.
#[derive(Debug, Clone, Copy)]
pub struct SparklineScene {
    slot: StatSlot,
}

impl SparklineScene {
    pub fn new(slot: StatSlot) -> Self {
        Self { slot }
    }
}

impl Scene for SparklineScene {
    fn tick(&mut self, surface: &mut dyn RenderSurface, frame: &FrameContext<'_>) {
        let series = frame.history.stat_series(self.slot);
        draw(surface, &series, stat_color(self.slot));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{CanvasSurface, Shape};

    #[test]
    fn test_normalize() {
        assert_eq!(normalize(&[10.0, 20.0, 15.0]), vec![0.0, 1.0, 0.5]);
        assert_eq!(normalize(&[7.0, 7.0]), vec![0.0, 0.0]);
    }

    #[test]
    fn test_points_span_surface() {
        let pts = points(&[0.0, 5.0, 10.0], 100.0, 40.0);
        assert_eq!(pts.first(), Some(&Point::new(0.0, 40.0)));
        assert_eq!(pts[1], Point::new(50.0, 20.0));
        assert_eq!(pts.last(), Some(&Point::new(100.0, 0.0)));
    }

    #[test]
    fn test_fewer_than_two_samples_draws_nothing() {
        let mut surface = CanvasSurface::new(100.0, 40.0);
        draw(&mut surface, &[], Rgba::rgb(255, 0, 0));
        draw(&mut surface, &[3.0], Rgba::rgb(255, 0, 0));
        assert!(surface.shapes().is_empty());
    }

    #[test]
    fn test_draw_segments() {
        let mut surface = CanvasSurface::new(100.0, 40.0);
        let values: Vec<f64> = (0..20).map(f64::from).collect();
        draw(&mut surface, &values, Rgba::rgb(255, 0, 0));
        assert_eq!(surface.shapes().len(), 19);
        assert!(surface.shapes().iter().all(|s| matches!(s, Shape::Line { .. })));
    }
}
