//! Fixed-scale time series for the performance chart and the stat detail
//! overlay.

use super::{palette, sparkline, stat_color};
use crate::animation::{FrameContext, Scene};
use crate::data::{StatSlot, SystemMetric};
use crate::surface::{Point, RenderSurface, Rgba};

/// Top of the fixed vertical scale.
pub const SCALE_MAX: f64 = 100.0;

pub const GRID_ROWS: usize = 10;
pub const GRID_COLUMNS: usize = 20;

/// Series drawn on the performance chart.
pub const PERFORMANCE_SERIES: [(SystemMetric, Rgba); 3] = [
    (SystemMetric::Cpu, palette::CYAN),
    (SystemMetric::Memory, palette::ORANGE),
    (SystemMetric::Network, palette::GREEN),
];

/// Points on a fixed `0..=100` scale. Out-of-range samples are clamped.
pub fn points(values: &[f64], width: f64, height: f64) -> Vec<Point> {
    if values.len() < 2 {
        return Vec::new();
    }
    let last = (values.len() - 1) as f64;
    values
        .iter()
        .enumerate()
        .map(|(i, v)| {
            let v = if v.is_finite() { v.clamp(0.0, SCALE_MAX) } else { 0.0 };
            Point::new(i as f64 / last * width, height - v / SCALE_MAX * height)
        })
        .collect()
}

pub fn draw_series(surface: &mut dyn RenderSurface, values: &[f64], color: Rgba) {
    let (width, height) = surface.size();
    surface.polyline(&points(values, width, height), color);
}

/// Evenly spaced grid, edges included.
pub fn draw_grid(surface: &mut dyn RenderSurface, rows: usize, columns: usize) {
    let (width, height) = surface.size();
    let color = palette::WHITE.with_alpha(0.1);
    for i in 0..=rows {
        let y = height / rows as f64 * i as f64;
        surface.line(Point::new(0.0, y), Point::new(width, y), color);
    }
    for i in 0..=columns {
        let x = width / columns as f64 * i as f64;
        surface.line(Point::new(x, 0.0), Point::new(x, height), color);
    }
}

/// CPU, memory and network utilisation.
#[derive(Debug, Default)]
pub struct PerformanceScene;

impl Scene for PerformanceScene {
    fn tick(&mut self, surface: &mut dyn RenderSurface, frame: &FrameContext<'_>) {
        for (metric, color) in PERFORMANCE_SERIES {
            draw_series(surface, &frame.history.system_series(metric), color);
        }
    }
}

/// Large chart behind the stat detail overlay.
#[derive(Debug, Clone, Copy)]
pub struct DetailScene {
    slot: StatSlot,
}

impl DetailScene {
    pub fn new(slot: StatSlot) -> Self {
        Self { slot }
    }

    pub fn slot(&self) -> StatSlot {
        self.slot
    }
}

/// Series shown in the detail chart, on the `0..=100` scale.
///
/// CPU is already a percentage; counters are stretched to fill the scale.
pub fn detail_series(slot: StatSlot, frame: &FrameContext<'_>) -> Vec<f64> {
    match slot {
        StatSlot::Cpu => frame.history.system_series(SystemMetric::Cpu),
        _ => sparkline::normalize(&frame.history.stat_series(slot))
            .into_iter()
            .map(|n| n * SCALE_MAX)
            .collect(),
    }
}

impl Scene for DetailScene {
    fn tick(&mut self, surface: &mut dyn RenderSurface, frame: &FrameContext<'_>) {
        draw_grid(surface, GRID_ROWS, GRID_COLUMNS);
        draw_series(surface, &detail_series(self.slot, frame), stat_color(self.slot));
    }
}
