//! Drawing surface abstraction.

use crate::geometry::Point;

/// An RGB colour with straight (non-premultiplied) alpha in `0.0..=1.0`.
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

    /// Same colour with a different alpha, clamped to `0.0..=1.0`.
    pub fn with_alpha(self, a: f64) -> Self {
        Self {
            a: if a.is_nan() { 0.0 } else { a.clamp(0.0, 1.0) },
            ..self
        }
    }
}

/// A 2D immediate-mode drawing target.
///
/// Coordinates are in virtual pixels with the origin at the top-left corner.
pub trait Surface {
    /// Erase everything drawn so far.
    fn clear(&mut self);

    fn stroke_line(&mut self, from: Point, to: Point, color: Rgba, width: f64);

    /// Stroke a polyline through `points`, closing it back to the first point if `closed`.
    fn stroke_path(&mut self, points: &[Point], closed: bool, color: Rgba, width: f64);

    fn fill_polygon(&mut self, points: &[Point], color: Rgba);

    fn fill_circle(&mut self, center: Point, radius: f64, color: Rgba);
}

/// One recorded draw call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Line {
        from: Point,
        to: Point,
        color: Rgba,
        width: f64,
    },
    Path {
        points: Vec<Point>,
        closed: bool,
        color: Rgba,
        width: f64,
    },
    Polygon {
        points: Vec<Point>,
        color: Rgba,
    },
    Circle {
        center: Point,
        radius: f64,
        color: Rgba,
    },
}

impl DrawOp {
    pub fn color(&self) -> Rgba {
        match self {
            DrawOp::Line { color, .. }
            | DrawOp::Path { color, .. }
            | DrawOp::Polygon { color, .. }
            | DrawOp::Circle { color, .. } => *color,
        }
    }
}

/// A surface that records draw calls instead of rasterizing them.
///
/// The terminal renderer replays the list onto a canvas; tests inspect it.
#[derive(Debug, Clone, Default)]
pub struct DisplayList {
    ops: Vec<DrawOp>,
}

impl DisplayList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}

impl Surface for DisplayList {
    fn clear(&mut self) {
        self.ops.clear();
    }

    fn stroke_line(&mut self, from: Point, to: Point, color: Rgba, width: f64) {
        self.ops.push(DrawOp::Line {
            from,
            to,
            color,
            width,
        });
    }

    fn stroke_path(&mut self, points: &[Point], closed: bool, color: Rgba, width: f64) {
        if points.len() < 2 {
            return;
        }
        self.ops.push(DrawOp::Path {
            points: points.to_vec(),
            closed,
            color,
            width,
        });
    }

    fn fill_polygon(&mut self, points: &[Point], color: Rgba) {
        if points.len() < 3 {
            return;
        }
        self.ops.push(DrawOp::Polygon {
            points: points.to_vec(),
            color,
        });
    }

    fn fill_circle(&mut self, center: Point, radius: f64, color: Rgba) {
        self.ops.push(DrawOp::Circle {
            center,
            radius,
            color,
        });
    }
}
