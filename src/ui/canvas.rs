//! Painting recorded surfaces onto a braille canvas.
//!
//! Surfaces measure `y` downward from the top-left corner; the ratatui canvas
//! measures it upward, so every coordinate is flipped on the way out.

use ratatui::{
    layout::Rect,
    style::Style,
    symbols::Marker,
    text::Span,
    widgets::{
        canvas::{Canvas, Context, Line as CanvasLine, Points},
        Block,
    },
    Frame,
};

use super::Theme;
use crate::surface::{gradient_color, CanvasSurface, GradientStop, Point, RenderSurface, Rgba, Shape};

/// Segments used to approximate a gradient stroke.
const GRADIENT_SEGMENTS: usize = 16;

/// Render `surface` into `area`. An absent surface leaves the block empty.
pub fn render(
    frame: &mut Frame,
    surface: Option<&CanvasSurface>,
    theme: &Theme,
    block: Option<Block<'_>>,
    area: Rect,
) {
    let (width, height) = surface.map_or((1.0, 1.0), |s| s.size());
    let mut canvas = Canvas::default()
        .marker(Marker::Braille)
        .x_bounds([0.0, width.max(1.0)])
        .y_bounds([0.0, height.max(1.0)])
        .paint(|ctx| {
            if let Some(surface) = surface {
                paint(ctx, surface, theme);
            }
        });
    if let Some(block) = block {
        canvas = canvas.block(block);
    }
    frame.render_widget(canvas, area);
}

/// Replay a display list onto a canvas context.
pub fn paint(ctx: &mut Context<'_>, surface: &CanvasSurface, theme: &Theme) {
    let height = surface.height();
    let flip = |p: Point| (p.x, height - p.y);

    for shape in surface.shapes() {
        match shape {
            Shape::Line { from, to, color } => line(ctx, flip(*from), flip(*to), theme.paint(*color)),
            Shape::Arc {
                center,
                radius,
                start,
                end,
                color,
            } => {
                let points = arc_points(*center, *radius, *start, *end);
                let color = theme.paint(*color);
                for pair in points.windows(2) {
                    line(ctx, flip(pair[0]), flip(pair[1]), color);
                }
            }
            Shape::FillCircle {
                center,
                radius,
                color,
            } => {
                let coords: Vec<(f64, f64)> =
                    disc_points(*center, *radius).into_iter().map(flip).collect();
                ctx.draw(&Points {
                    coords: &coords,
                    color: theme.paint(*color),
                });
            }
            Shape::Text { at, text, color } => {
                let (x, y) = flip(*at);
                ctx.print(
                    x,
                    y,
                    Span::styled(text.clone(), Style::default().fg(theme.paint(*color))),
                );
            }
            Shape::GradientLine { from, to, stops } => {
                for (a, b, color) in gradient_segments(*from, *to, stops) {
                    line(ctx, flip(a), flip(b), theme.paint(color));
                }
            }
        }
    }
}

fn line(ctx: &mut Context<'_>, from: (f64, f64), to: (f64, f64), color: ratatui::style::Color) {
    ctx.draw(&CanvasLine {
        x1: from.0,
        y1: from.1,
        x2: to.0,
        y2: to.1,
        color,
    });
}

/// Polyline approximating an arc, roughly one vertex every 4 px.
pub fn arc_points(center: Point, radius: f64, start: f64, end: f64) -> Vec<Point> {
    if !(radius.is_finite() && radius > 0.0) {
        return Vec::new();
    }
    let sweep = end - start;
    let segments = ((sweep.abs() * radius / 4.0).ceil() as usize).clamp(8, 96);
    (0..=segments)
        .map(|i| center.polar(start + sweep * i as f64 / segments as f64, radius))
        .collect()
}

/// Pixel centres covered by a filled circle.
pub fn disc_points(center: Point, radius: f64) -> Vec<Point> {
    if !(radius.is_finite() && radius > 0.0) {
        return Vec::new();
    }
    let r = radius.ceil() as i64;
    let mut points = Vec::new();
    for dy in -r..=r {
        for dx in -r..=r {
            let (dx, dy) = (dx as f64, dy as f64);
            if dx.hypot(dy) <= radius {
                points.push(Point::new(center.x + dx, center.y + dy));
            }
        }
    }
    if points.is_empty() {
        points.push(center);
    }
    points
}

/// Split a gradient stroke into solid segments coloured at their midpoints.
pub fn gradient_segments(from: Point, to: Point, stops: &[GradientStop]) -> Vec<(Point, Point, Rgba)> {
    let at = |t: f64| Point::new(from.x + (to.x - from.x) * t, from.y + (to.y - from.y) * t);
    (0..GRADIENT_SEGMENTS)
        .filter_map(|i| {
            let t0 = i as f64 / GRADIENT_SEGMENTS as f64;
            let t1 = (i + 1) as f64 / GRADIENT_SEGMENTS as f64;
            let color = gradient_color(stops, (t0 + t1) / 2.0)?;
            Some((at(t0), at(t1), color))
        })
        .collect()
}
