//! Background animation state management.
//!
//! Bridges the virtual-pixel [`AnimationDriver`] onto a terminal frame: each
//! cell covers `cell.width` x `cell.height` pixels and holds a 2x4 braille
//! dot grid, so the recorded display list is replayed onto a braille canvas.

use std::time::Instant;

use ratatui::{
    Frame,
    layout::Rect,
    style::Color,
    symbols::Marker,
    widgets::canvas::{Canvas, Context, Line, Points},
};
use strata_core::{CellSize, DisplayList, DrawOp, Point};

use crate::color::to_terminal_color;
use crate::driver::{AnimationDriver, DriverSettings, FrameOutcome};

/// Braille dots per terminal cell, horizontally and vertically.
const DOTS_X: f64 = 2.0;
const DOTS_Y: f64 = 4.0;

/// Background animation state.
#[derive(Debug)]
pub struct BackgroundState {
    driver: AnimationDriver,
    /// Draw calls of the last rendered frame.
    display: DisplayList,
    cell: CellSize,
    /// Last known terminal width.
    last_width: u16,
    /// Last known terminal height.
    last_height: u16,
}

impl BackgroundState {
    pub fn new(settings: DriverSettings, seed: Option<u64>, cell: CellSize) -> Self {
        Self {
            driver: AnimationDriver::new(settings, seed),
            display: DisplayList::new(),
            cell,
            last_width: 0,
            last_height: 0,
        }
    }

    /// Start animating over a terminal area.
    pub fn start(&mut self, area: Rect, now: Instant) {
        self.last_width = area.width;
        self.last_height = area.height;
        self.driver
            .start(self.cell.viewport(area.width, area.height), now);
    }

    pub fn stop(&mut self) {
        self.driver.stop();
    }

    pub fn driver(&self) -> &AnimationDriver {
        &self.driver
    }

    pub fn driver_mut(&mut self) -> &mut AnimationDriver {
        &mut self.driver
    }

    pub fn cell(&self) -> CellSize {
        self.cell
    }

    pub fn display(&self) -> &DisplayList {
        &self.display
    }

    /// Point the pointer at the centre of a terminal cell.
    pub fn pointer_at(&mut self, column: u16, row: u16) {
        self.driver.on_pointer_move(self.cell.center(column, row));
    }

    /// Advance one frame and paint it over the whole frame area.
    pub fn render(&mut self, frame: &mut Frame) -> FrameOutcome {
        let area = frame.area();

        // Repopulate if dimensions changed
        if area.width != self.last_width || area.height != self.last_height {
            self.last_width = area.width;
            self.last_height = area.height;
            self.driver
                .on_resize(self.cell.viewport(area.width, area.height));
        }

        let outcome = self.driver.frame(Some(&mut self.display));
        if outcome != FrameOutcome::Drawn {
            return outcome;
        }

        let viewport = self.cell.viewport(area.width, area.height);
        let dot = Point::new(self.cell.width / DOTS_X, self.cell.height / DOTS_Y);
        let ops = self.display.ops();
        let canvas = Canvas::default()
            .marker(Marker::Braille)
            .x_bounds([0.0, viewport.width])
            .y_bounds([0.0, viewport.height])
            .paint(|ctx| paint_ops(ctx, ops, viewport.height, dot));
        frame.render_widget(canvas, area);

        outcome
    }
}

/// Replay draw calls onto a canvas whose y axis grows upward.
fn paint_ops(ctx: &mut Context, ops: &[DrawOp], height: f64, dot: Point) {
    let flip = |p: Point| Point::new(p.x, height - p.y);

    for op in ops {
        let color = to_terminal_color(op.color());
        match op {
            DrawOp::Line { from, to, .. } => draw_segment(ctx, flip(*from), flip(*to), color),
            DrawOp::Path { points, closed, .. } => {
                for pair in points.windows(2) {
                    draw_segment(ctx, flip(pair[0]), flip(pair[1]), color);
                }
                if let (true, Some(first), Some(last)) = (*closed, points.first(), points.last()) {
                    draw_segment(ctx, flip(*last), flip(*first), color);
                }
            }
            DrawOp::Polygon { points, .. } => {
                let flipped: Vec<Point> = points.iter().map(|p| flip(*p)).collect();
                let coords = polygon_fill(&flipped, dot);
                ctx.draw(&Points {
                    coords: &coords,
                    color,
                });
            }
            DrawOp::Circle { center, radius, .. } => {
                let coords = disc_fill(flip(*center), *radius, dot);
                ctx.draw(&Points {
                    coords: &coords,
                    color,
                });
            }
        }
    }
}

fn draw_segment(ctx: &mut Context, from: Point, to: Point, color: Color) {
    ctx.draw(&Line::new(from.x, from.y, to.x, to.y, color));
}

/// Dot centres inside a polygon, by even-odd scanline.
fn polygon_fill(points: &[Point], dot: Point) -> Vec<(f64, f64)> {
    let mut coords = Vec::new();
    if points.len() < 3 {
        return coords;
    }

    let (min_y, max_y) = points
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| {
            (lo.min(p.y), hi.max(p.y))
        });

    let mut crossings = Vec::new();
    let mut y = min_y + dot.y / 2.0;
    while y < max_y {
        crossings.clear();
        for (i, a) in points.iter().enumerate() {
            let b = points[(i + 1) % points.len()];
            if (a.y <= y && y < b.y) || (b.y <= y && y < a.y) {
                crossings.push(a.x + (y - a.y) * (b.x - a.x) / (b.y - a.y));
            }
        }
        crossings.sort_by(f64::total_cmp);

        for span in crossings.chunks_exact(2) {
            let mut x = span[0] + dot.x / 2.0;
            if x >= span[1] {
                coords.push(((span[0] + span[1]) / 2.0, y));
                continue;
            }
            while x < span[1] {
                coords.push((x, y));
                x += dot.x;
            }
        }
        y += dot.y;
    }
    coords
}

/// Dot centres covering a disc. Discs smaller than a dot become one dot.
fn disc_fill(center: Point, radius: f64, dot: Point) -> Vec<(f64, f64)> {
    if radius <= dot.x.min(dot.y) {
        return vec![(center.x, center.y)];
    }

    let mut coords = Vec::new();
    let mut y = center.y - radius + dot.y / 2.0;
    while y < center.y + radius {
        let half = (radius * radius - (y - center.y).powi(2)).max(0.0).sqrt();
        let mut x = center.x - half + dot.x / 2.0;
        while x < center.x + half {
            coords.push((x, y));
            x += dot.x;
        }
        y += dot.y;
    }
    if coords.is_empty() {
        coords.push((center.x, center.y));
    }
    coords
}
