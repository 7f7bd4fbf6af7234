//! Per-frame input snapshot.

use crate::geometry::{Point, Viewport};

/// Everything a layer may read during one frame.
///
/// Built fresh by the driver at the start of each frame and handed to every
/// layer by shared reference. Layers never write back into it.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameState {
    /// Elapsed-time accumulator. Advances by a fixed step per frame.
    pub time: f64,
    /// Current vertical scroll offset of the document.
    pub scroll: f64,
    /// Total scrollable distance (document height minus viewport height).
    pub scrollable: f64,
    /// Pointer position, `None` when the pointer is outside the surface.
    pub pointer: Option<Point>,
    /// Size of the drawing surface.
    pub viewport: Viewport,
}

impl FrameState {
    /// Whether this snapshot can be rendered without producing NaN geometry.
    pub fn is_drawable(&self) -> bool {
        !self.viewport.is_empty()
            && self.time.is_finite()
            && self.scroll.is_finite()
            && self.scrollable.is_finite()
            && self.pointer.is_none_or(Point::is_finite)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drawable() {
        let frame = FrameState {
            viewport: Viewport::new(800.0, 600.0),
            ..Default::default()
        };
        assert!(frame.is_drawable());

        let no_area = FrameState::default();
        assert!(!no_area.is_drawable());

        let bad_scroll = FrameState {
            scroll: f64::INFINITY,
            ..frame
        };
        assert!(!bad_scroll.is_drawable());

        let bad_pointer = FrameState {
            pointer: Some(Point::new(f64::NAN, 0.0)),
            ..frame
        };
        assert!(!bad_pointer.is_drawable());
    }
}
