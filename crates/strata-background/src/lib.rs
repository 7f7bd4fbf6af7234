//! Scroll-reactive background animation for the strata viewer.
//!
//! The engine draws five layers onto a [`strata_core::Surface`] in virtual
//! pixels: drifting particles, noise-driven strata and contour lines, a
//! swarm of drone glyphs and a wireframe geoid that rises at the end of the
//! document. [`AnimationDriver`] owns the shared input state and the frame
//! clock; [`BackgroundState`] replays each frame onto a ratatui canvas.

pub mod animations;
mod color;
mod driver;
pub mod fade;
mod noise;
mod state;

pub use color::{Palette, hsl_to_rgb, to_terminal_color};
pub use driver::{AnimationDriver, DriverSettings, FrameOutcome, Lifecycle, SkipReason};
pub use noise::NoiseField;
pub use state::BackgroundState;
