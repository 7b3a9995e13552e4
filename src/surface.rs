//! Drawing surfaces.
//!
//! A [`RenderSurface`] is a 2D target measured in pixels with the origin in
//! the top-left corner and `y` growing downward. [`CanvasSurface`] records
//! each frame as a display list; the terminal layer paints that list onto a
//! braille canvas.
//!
//! Surfaces are owned by a [`SurfaceRegistry`] keyed by [`SurfaceId`]. Only
//! surfaces that are part of the current layout are registered, and
//! [`SurfaceRegistry::acquire`] returns `None` for the rest.

use std::collections::BTreeMap;
use std::f64::consts::TAU;

use tracing::trace;

/// Opaque surface identifier.
pub type SurfaceId = &'static str;

/// A colour with straight (non-premultiplied) alpha in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f64,
}

impl Rgba {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Colour from a `0xRRGGBB` literal.
    pub const fn hex(value: u32) -> Self {
        Self::rgb(
            ((value >> 16) & 0xff) as u8,
            ((value >> 8) & 0xff) as u8,
            (value & 0xff) as u8,
        )
    }

    pub fn with_alpha(self, a: f64) -> Self {
        let a = if a.is_finite() { a.clamp(0.0, 1.0) } else { 0.0 };
        Self { a, ..self }
    }

    /// Linear interpolation of every channel, alpha included.
    pub fn lerp(self, other: Rgba, t: f64) -> Rgba {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round() as u8;
        Rgba {
            r: mix(self.r, other.r),
            g: mix(self.g, other.g),
            b: mix(self.b, other.b),
            a: self.a + (other.a - self.a) * t,
        }
    }

    /// Composite over an opaque background.
    pub fn blend_over(self, bg: (u8, u8, u8)) -> (u8, u8, u8) {
        let mix = |fg: u8, bg: u8| (fg as f64 * self.a + bg as f64 * (1.0 - self.a)).round() as u8;
        (mix(self.r, bg.0), mix(self.g, bg.1), mix(self.b, bg.2))
    }
}

/// A position in surface pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: &Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Point at `angle` radians and `radius` from `self`.
    pub fn polar(&self, angle: f64, radius: f64) -> Point {
        Point::new(self.x + angle.cos() * radius, self.y + angle.sin() * radius)
    }
}

/// One colour stop of a linear gradient.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradientStop {
    /// Position along the gradient in `0.0..=1.0`.
    pub offset: f64,
    pub color: Rgba,
}

impl GradientStop {
    pub const fn new(offset: f64, color: Rgba) -> Self {
        Self { offset, color }
    }
}

/// Colour of a gradient at `t`, interpolating between the surrounding stops.
///
/// Stops must be sorted by offset. Values outside the first/last stop take
/// that stop's colour.
pub fn gradient_color(stops: &[GradientStop], t: f64) -> Option<Rgba> {
    let first = stops.first()?;
    if t <= first.offset {
        return Some(first.color);
    }
    for pair in stops.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        if t <= b.offset {
            let span = b.offset - a.offset;
            let local = if span > 0.0 { (t - a.offset) / span } else { 1.0 };
            return Some(a.color.lerp(b.color, local));
        }
    }
    stops.last().map(|s| s.color)
}

/// A recorded drawing primitive.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Line {
        from: Point,
        to: Point,
        color: Rgba,
    },
    /// Arc from `start` to `end` radians, clockwise on screen.
    Arc {
        center: Point,
        radius: f64,
        start: f64,
        end: f64,
        color: Rgba,
    },
    FillCircle {
        center: Point,
        radius: f64,
        color: Rgba,
    },
    Text {
        at: Point,
        text: String,
        color: Rgba,
    },
    GradientLine {
        from: Point,
        to: Point,
        stops: Vec<GradientStop>,
    },
}

/// A 2D drawing target.
pub trait RenderSurface {
    /// Width and height in pixels.
    fn size(&self) -> (f64, f64);

    fn resize(&mut self, width: f64, height: f64);

    /// Discard everything drawn so far.
    fn clear(&mut self);

    fn line(&mut self, from: Point, to: Point, color: Rgba);

    fn arc(&mut self, center: Point, radius: f64, start: f64, end: f64, color: Rgba);

    fn fill_circle(&mut self, center: Point, radius: f64, color: Rgba);

    fn text(&mut self, at: Point, text: &str, color: Rgba);

    /// Stroke a line whose colour follows a linear gradient from `from` to `to`.
    fn gradient_line(&mut self, from: Point, to: Point, stops: &[GradientStop]);

    fn width(&self) -> f64 {
        self.size().0
    }

    fn height(&self) -> f64 {
        self.size().1
    }

    fn circle(&mut self, center: Point, radius: f64, color: Rgba) {
        self.arc(center, radius, 0.0, TAU, color);
    }

    fn polyline(&mut self, points: &[Point], color: Rgba) {
        for pair in points.windows(2) {
            self.line(pair[0], pair[1], color);
        }
    }
}

/// Display-list surface painted by the terminal layer.
#[derive(Debug, Clone, Default)]
pub struct CanvasSurface {
    width: f64,
    height: f64,
    shapes: Vec<Shape>,
}

impl CanvasSurface {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            shapes: Vec::new(),
        }
    }

    /// Primitives recorded since the last clear.
    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }
}

impl RenderSurface for CanvasSurface {
    fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    fn resize(&mut self, width: f64, height: f64) {
        self.width = width.max(0.0);
        self.height = height.max(0.0);
    }

    fn clear(&mut self) {
        self.shapes.clear();
    }

    fn line(&mut self, from: Point, to: Point, color: Rgba) {
        self.shapes.push(Shape::Line { from, to, color });
    }

    fn arc(&mut self, center: Point, radius: f64, start: f64, end: f64, color: Rgba) {
        self.shapes.push(Shape::Arc {
            center,
            radius,
            start,
            end,
            color,
        });
    }

    fn fill_circle(&mut self, center: Point, radius: f64, color: Rgba) {
        self.shapes.push(Shape::FillCircle {
            center,
            radius,
            color,
        });
    }

    fn text(&mut self, at: Point, text: &str, color: Rgba) {
        self.shapes.push(Shape::Text {
            at,
            text: text.to_string(),
            color,
        });
    }

    fn gradient_line(&mut self, from: Point, to: Point, stops: &[GradientStop]) {
        self.shapes.push(Shape::GradientLine {
            from,
            to,
            stops: stops.to_vec(),
        });
    }
}

/// Surfaces present in the current layout.
#[derive(Debug, Default)]
pub struct SurfaceRegistry {
    surfaces: BTreeMap<SurfaceId, CanvasSurface>,
}

impl SurfaceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Match the registry to a layout.
    ///
    /// Surfaces in `layout` are created or resized; surfaces not in it are
    /// dropped, so a later [`acquire`](Self::acquire) returns `None`.
    pub fn sync<I>(&mut self, layout: I)
    where
        I: IntoIterator<Item = (SurfaceId, f64, f64)>,
    {
        let mut next = BTreeMap::new();
        for (id, width, height) in layout {
            let mut surface = self.surfaces.remove(id).unwrap_or_default();
            if surface.size() != (width, height) {
                surface.resize(width, height);
            }
            next.insert(id, surface);
        }
        self.surfaces = next;
    }

    /// Mutable access to a laid-out surface.
    pub fn acquire(&mut self, id: SurfaceId) -> Option<&mut CanvasSurface> {
        let surface = self.surfaces.get_mut(id);
        if surface.is_none() {
            trace!(surface = id, "surface not laid out");
        }
        surface
    }

    pub fn get(&self, id: SurfaceId) -> Option<&CanvasSurface> {
        self.surfaces.get(id)
    }

    pub fn is_present(&self, id: SurfaceId) -> bool {
        self.surfaces.contains_key(id)
    }

    pub fn ids(&self) -> impl Iterator<Item = SurfaceId> + '_ {
        self.surfaces.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.surfaces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.surfaces.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_and_alpha() {
        let c = Rgba::hex(0xff3366);
        assert_eq!((c.r, c.g, c.b), (0xff, 0x33, 0x66));
        assert_eq!(c.with_alpha(1.5).a, 1.0);
        assert_eq!(c.with_alpha(f64::NAN).a, 0.0);
    }

    #[test]
    fn test_blend_over() {
        let half_white = Rgba::rgb(255, 255, 255).with_alpha(0.5);
        assert_eq!(half_white.blend_over((0, 0, 0)), (128, 128, 128));
        assert_eq!(Rgba::rgb(10, 20, 30).blend_over((0, 0, 0)), (10, 20, 30));
    }

    #[test]
    fn test_gradient_color() {
        let cyan = Rgba::rgb(0, 255, 255);
        let stops = [
            GradientStop::new(0.0, cyan.with_alpha(0.8)),
            GradientStop::new(0.5, cyan.with_alpha(0.3)),
            GradientStop::new(1.0, cyan.with_alpha(0.0)),
        ];
        assert_eq!(gradient_color(&stops, 0.0).unwrap().a, 0.8);
        assert!((gradient_color(&stops, 0.25).unwrap().a - 0.55).abs() < 1e-9);
        assert_eq!(gradient_color(&stops, 2.0).unwrap().a, 0.0);
        assert!(gradient_color(&[], 0.5).is_none());
    }

    #[test]
    fn test_canvas_records_and_clears() {
        let mut surface = CanvasSurface::new(100.0, 50.0);
        surface.polyline(
            &[Point::new(0.0, 0.0), Point::new(10.0, 10.0), Point::new(20.0, 0.0)],
            Rgba::rgb(0, 255, 0),
        );
        surface.circle(Point::new(5.0, 5.0), 3.0, Rgba::rgb(0, 0, 255));
        assert_eq!(surface.shapes().len(), 3);

        surface.clear();
        assert!(surface.shapes().is_empty());
        assert_eq!(surface.size(), (100.0, 50.0));
    }

    #[test]
    fn test_registry_sync_and_acquire() {
        let mut registry = SurfaceRegistry::new();
        registry.sync([("radar", 80.0, 40.0), ("map", 60.0, 20.0)]);
        assert!(registry.acquire("radar").is_some());
        assert!(registry.acquire("topology").is_none());

        registry
            .acquire("radar")
            .unwrap()
            .line(Point::default(), Point::new(1.0, 1.0), Rgba::rgb(1, 2, 3));

        // Radar survives the re-layout with its new size; map is removed.
        registry.sync([("radar", 100.0, 40.0)]);
        assert!(!registry.is_present("map"));
        let radar = registry.get("radar").unwrap();
        assert_eq!(radar.size(), (100.0, 40.0));
        assert_eq!(radar.shapes().len(), 1);
    }
}
