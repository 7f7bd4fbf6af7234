//! Core types shared by the strata crates.
//!
//! Everything the background engine exchanges with its host lives here:
//! geometry in virtual pixels, colours with alpha, the per-frame input
//! snapshot, user-facing settings enums and the [`Surface`] drawing trait.

mod frame;
mod geometry;
mod surface;
mod theme;

pub use frame::FrameState;
pub use geometry::{CellSize, Point, Viewport};
pub use surface::{DisplayList, DrawOp, Rgba, Surface};
pub use theme::{AnimationSpeed, ColorTheme, Layers};
