//! Per-frame orchestration of the background layers.

use std::time::{Duration, Instant};

use rand::{SeedableRng, rngs::StdRng};
use strata_core::{AnimationSpeed, ColorTheme, FrameState, Layers, Point, Surface, Viewport};
use tracing::{debug, info, trace};

use crate::animations::drones::DroneSwarm;
use crate::animations::geoid::draw_geoid;
use crate::animations::particles::ParticleField;
use crate::animations::terrain::{draw_strata, draw_topography};
use crate::color::Palette;
use crate::fade::{fade_out_fraction, particle_opacity};
use crate::noise::NoiseField;

/// Tunables the host can change at runtime.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DriverSettings {
    pub speed: AnimationSpeed,
    pub theme: ColorTheme,
    pub layers: Layers,
    /// Target frame rate of the frame clock.
    pub fps: u32,
}

impl Default for DriverSettings {
    fn default() -> Self {
        Self {
            speed: AnimationSpeed::default(),
            theme: ColorTheme::default(),
            layers: Layers::default(),
            fps: 60,
        }
    }
}

/// Where the driver is in its start/stop lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    Idle,
    Running,
    Stopped,
}

/// Why a frame drew nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// `start()` has not been called, or `stop()` has.
    NotRunning,
    /// No drawing surface was available.
    NoSurface,
    /// The viewport has zero area.
    EmptyViewport,
    /// Scroll or pointer input was not finite.
    InvalidInput,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    Drawn,
    Skipped(SkipReason),
}

/// Fixed-interval frame deadline. At most one deadline is pending.
#[derive(Debug, Clone)]
struct FrameClock {
    interval: Duration,
    next_due: Option<Instant>,
}

impl FrameClock {
    fn new(fps: u32) -> Self {
        Self {
            interval: Duration::from_secs(1) / fps.max(1),
            next_due: None,
        }
    }

    fn arm(&mut self, now: Instant) {
        self.next_due = Some(now);
    }

    fn cancel(&mut self) {
        self.next_due = None;
    }

    /// Consume the pending deadline if it has passed and schedule the next one.
    fn poll(&mut self, now: Instant) -> bool {
        match self.next_due {
            Some(due) if now >= due => {
                let next = due + self.interval;
                // After a stall, pace from now instead of bursting to catch up.
                self.next_due = Some(if next <= now { now + self.interval } else { next });
                true
            }
            _ => false,
        }
    }

    fn time_until(&self, now: Instant) -> Option<Duration> {
        self.next_due.map(|due| due.saturating_duration_since(now))
    }
}

/// Owns the shared input state and drives every layer once per frame.
#[derive(Debug)]
pub struct AnimationDriver {
    settings: DriverSettings,
    palette: Palette,
    rng: StdRng,
    noise: NoiseField,
    particles: ParticleField,
    drones: DroneSwarm,
    viewport: Viewport,
    scroll: f64,
    scrollable: f64,
    pointer: Option<Point>,
    /// Elapsed-time accumulator, advanced by a fixed step per drawn frame.
    time: f64,
    lifecycle: Lifecycle,
    listening: bool,
    clock: FrameClock,
    last_geoid_fade: Option<f64>,
}

impl AnimationDriver {
    /// Create an idle driver. A seed makes noise and spawns reproducible.
    pub fn new(settings: DriverSettings, seed: Option<u64>) -> Self {
        let mut rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let noise = NoiseField::new(&mut rng);

        Self {
            settings,
            palette: Palette::for_theme(settings.theme),
            rng,
            noise,
            particles: ParticleField::default(),
            drones: DroneSwarm::default(),
            viewport: Viewport::default(),
            scroll: 0.0,
            scrollable: 0.0,
            pointer: None,
            time: 0.0,
            lifecycle: Lifecycle::Idle,
            listening: false,
            clock: FrameClock::new(settings.fps),
            last_geoid_fade: None,
        }
    }

    /// Populate the layers for `viewport`, register input handling and arm
    /// the frame clock so the first frame is due immediately.
    pub fn start(&mut self, viewport: Viewport, now: Instant) {
        if self.lifecycle == Lifecycle::Running {
            return;
        }
        self.lifecycle = Lifecycle::Running;
        self.listening = true;
        self.on_resize(viewport);
        self.clock.arm(now);
        info!(
            width = viewport.width,
            height = viewport.height,
            "background animation started"
        );
    }

    /// Cancel the pending frame and stop listening for input, in one step.
    ///
    /// After this every handler and [`AnimationDriver::frame`] is a no-op.
    pub fn stop(&mut self) {
        if self.lifecycle == Lifecycle::Stopped {
            return;
        }
        self.clock.cancel();
        self.listening = false;
        self.pointer = None;
        self.lifecycle = Lifecycle::Stopped;
        info!(elapsed = self.time, "background animation stopped");
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    pub fn is_listening(&self) -> bool {
        self.listening
    }

    /// Rebuild particle and drone populations for a new viewport size.
    pub fn on_resize(&mut self, viewport: Viewport) {
        if !self.listening {
            return;
        }
        self.viewport = viewport;
        self.particles = ParticleField::populate(viewport, &mut self.rng);
        self.drones = DroneSwarm::spawn(viewport, &mut self.rng);
        debug!(
            width = viewport.width,
            height = viewport.height,
            particles = self.particles.len(),
            "rebuilt background populations"
        );
    }

    pub fn on_pointer_move(&mut self, position: Point) {
        if self.listening {
            self.pointer = Some(position);
        }
    }

    pub fn on_pointer_leave(&mut self) {
        if self.listening {
            self.pointer = None;
        }
    }

    /// Record the document scroll offset. Read at the next frame, not drawn now.
    pub fn on_scroll(&mut self, offset: f64, scrollable: f64) {
        if self.listening {
            self.scroll = offset;
            self.scrollable = scrollable;
        }
    }

    pub fn set_theme(&mut self, theme: ColorTheme) {
        self.settings.theme = theme;
        self.palette = Palette::for_theme(theme);
    }

    pub fn set_speed(&mut self, speed: AnimationSpeed) {
        self.settings.speed = speed;
    }

    pub fn settings(&self) -> &DriverSettings {
        &self.settings
    }

    /// True (once) when the frame clock says a frame should be drawn now.
    pub fn poll_frame(&mut self, now: Instant) -> bool {
        self.clock.poll(now)
    }

    /// Time left until the next frame, `None` when no frame is scheduled.
    pub fn time_until_next_frame(&self, now: Instant) -> Option<Duration> {
        self.clock.time_until(now)
    }

    /// Snapshot of the input state as the next frame would see it.
    pub fn frame_state(&self) -> FrameState {
        FrameState {
            time: self.time,
            scroll: self.scroll,
            scrollable: self.scrollable,
            pointer: self.pointer,
            viewport: self.viewport,
        }
    }

    pub fn particles(&self) -> &ParticleField {
        &self.particles
    }

    pub fn drones(&self) -> &DroneSwarm {
        &self.drones
    }

    /// Geoid opacity used by the last drawn frame, `None` if it was hidden.
    pub fn last_geoid_fade(&self) -> Option<f64> {
        self.last_geoid_fade
    }

    /// Run one frame: advance time, clear, then draw every enabled layer
    /// in order. Draws nothing and leaves time untouched if the frame
    /// cannot be rendered.
    pub fn frame(&mut self, surface: Option<&mut dyn Surface>) -> FrameOutcome {
        let outcome = self.try_frame(surface);
        if let FrameOutcome::Skipped(reason) = outcome {
            trace!(?reason, "skipped background frame");
        }
        outcome
    }

    fn try_frame(&mut self, surface: Option<&mut dyn Surface>) -> FrameOutcome {
        if self.lifecycle != Lifecycle::Running {
            return FrameOutcome::Skipped(SkipReason::NotRunning);
        }
        let Some(surface) = surface else {
            return FrameOutcome::Skipped(SkipReason::NoSurface);
        };

        let state = FrameState {
            time: self.time + self.settings.speed.time_step(),
            ..self.frame_state()
        };
        if state.viewport.is_empty() {
            return FrameOutcome::Skipped(SkipReason::EmptyViewport);
        }
        if !state.is_drawable() {
            return FrameOutcome::Skipped(SkipReason::InvalidInput);
        }
        self.time = state.time;

        surface.clear();

        let layers = self.settings.layers;
        let palette = self.palette;
        let fade_out = fade_out_fraction(state.scroll, state.scrollable);

        let particle_alpha = particle_opacity(state.scroll);
        if layers.particles && particle_alpha > 0.0 {
            self.particles.update(state.pointer, state.viewport);
            self.particles.draw(surface, particle_alpha, palette.particle);
        }

        if layers.strata {
            draw_strata(surface, &self.noise, &state, fade_out, palette.accent);
        }
        if layers.topography {
            draw_topography(surface, &self.noise, &state, fade_out, palette.accent);
        }

        if layers.drones {
            self.drones.update(&state, fade_out, &mut self.rng);
            self.drones.draw(surface, palette.accent);
        }

        self.last_geoid_fade = if layers.geoid {
            draw_geoid(surface, &self.noise, &state, palette.accent)
        } else {
            None
        };

        FrameOutcome::Drawn
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_core::{DisplayList, DrawOp};

    fn running(viewport: Viewport) -> AnimationDriver {
        let mut driver = AnimationDriver::new(DriverSettings::default(), Some(42));
        driver.start(viewport, Instant::now());
        driver
    }

    fn count(list: &DisplayList, pred: impl Fn(&DrawOp) -> bool) -> usize {
        list.ops().iter().filter(|op| pred(op)).count()
    }

    #[test]
    fn test_top_of_page_scenario() {
        let mut driver = running(Viewport::new(1920.0, 1080.0));
        driver.on_scroll(0.0, 10_000.0);

        let mut list = DisplayList::new();
        assert_eq!(driver.frame(Some(&mut list)), FrameOutcome::Drawn);

        assert_eq!(driver.particles().len(), 230);
        assert!(driver.drones().drones().iter().all(|d| d.opacity == 0.0));
        assert_eq!(driver.last_geoid_fade(), None);

        // Only particle discs and links: no terrain paths, no drone polygons.
        assert_eq!(count(&list, |op| matches!(op, DrawOp::Circle { .. })), 230);
        assert_eq!(count(&list, |op| matches!(op, DrawOp::Path { .. })), 0);
        assert_eq!(count(&list, |op| matches!(op, DrawOp::Polygon { .. })), 0);
        assert!(list.ops().iter().all(|op| match op {
            DrawOp::Line { width, .. } => *width == 0.5,
            _ => true,
        }));
    }

    #[test]
    fn test_particles_frozen_once_faded() {
        let mut driver = running(Viewport::new(1920.0, 1080.0));
        driver.on_pointer_move(Point::new(960.0, 540.0));
        driver.on_scroll(600.0, 10_000.0);
        let before = driver.particles().particles().to_vec();

        let mut list = DisplayList::new();
        for _ in 0..3 {
            assert_eq!(driver.frame(Some(&mut list)), FrameOutcome::Drawn);
        }

        assert_eq!(driver.particles().particles(), before.as_slice());
        assert_eq!(count(&list, |op| matches!(op, DrawOp::Circle { .. })), 0);

        // Just before the fade completes they still move.
        driver.on_scroll(599.0, 10_000.0);
        driver.frame(Some(&mut list));
        assert_ne!(driver.particles().particles(), before.as_slice());
    }

    #[test]
    fn test_end_of_page_scenario() {
        let mut driver = running(Viewport::new(1920.0, 1080.0));
        driver.on_scroll(9500.0, 10_000.0);

        let mut list = DisplayList::new();
        assert_eq!(driver.frame(Some(&mut list)), FrameOutcome::Drawn);

        let fade = driver.last_geoid_fade().unwrap_or(0.0);
        assert!((fade - 0.875).abs() < 1e-9);
        assert!(driver.drones().drones().iter().all(|d| d.opacity == 0.0));

        // Everything on the surface belongs to the geoid.
        assert_eq!(count(&list, |op| matches!(op, DrawOp::Path { .. })), 0);
        assert_eq!(count(&list, |op| matches!(op, DrawOp::Polygon { .. })), 0);
        assert!(count(&list, |op| matches!(op, DrawOp::Line { .. })) > 0);
        for op in list.ops() {
            if let DrawOp::Line { color, width, .. } = op {
                assert_eq!(*width, 0.8);
                assert!((color.a - 0.4375).abs() < 1e-9);
            }
        }
    }

    /// Rank of the layer that produced an op, by its stroke signature.
    fn layer_rank(op: &DrawOp) -> u8 {
        let accent = Palette::default().accent;
        match op {
            DrawOp::Circle { color, .. } if color.with_alpha(1.0) == accent => 4,
            DrawOp::Circle { .. } => 0,
            DrawOp::Line { width, .. } if *width == 0.5 => 0,
            DrawOp::Path { width, closed: false, .. } if *width == 1.5 => 1,
            DrawOp::Path { width, closed: false, .. } if *width == 0.5 => 2,
            DrawOp::Line { width, .. } if *width == 1.5 => 3,
            DrawOp::Path { closed: true, .. } | DrawOp::Polygon { .. } => 3,
            _ => 4,
        }
    }

    #[test]
    fn test_composition_order() {
        for scroll in [400.0, 7000.0] {
            let mut driver = running(Viewport::new(1200.0, 800.0));
            driver.on_scroll(scroll, 10_000.0);
            let mut list = DisplayList::new();
            driver.frame(Some(&mut list));
            assert!(!list.is_empty());

            let ranks: Vec<u8> = list.ops().iter().map(layer_rank).collect();
            assert!(
                ranks.windows(2).all(|w| w[0] <= w[1]),
                "layers out of order at scroll {scroll}"
            );
        }
    }

    #[test]
    fn test_time_advances_fixed_step() {
        let mut driver = running(Viewport::new(800.0, 600.0));
        let mut list = DisplayList::new();
        for _ in 0..3 {
            driver.frame(Some(&mut list));
        }
        assert!((driver.frame_state().time - 0.03).abs() < 1e-12);

        driver.set_speed(AnimationSpeed::Fast);
        driver.frame(Some(&mut list));
        assert!((driver.frame_state().time - 0.05).abs() < 1e-12);
    }

    #[test]
    fn test_frame_before_start_is_noop() {
        let mut driver = AnimationDriver::new(DriverSettings::default(), Some(1));
        let mut list = DisplayList::new();
        assert_eq!(
            driver.frame(Some(&mut list)),
            FrameOutcome::Skipped(SkipReason::NotRunning)
        );
        driver.on_pointer_move(Point::new(1.0, 1.0));
        assert_eq!(driver.frame_state().pointer, None);
    }

    #[test]
    fn test_missing_surface_is_noop() {
        let mut driver = running(Viewport::new(800.0, 600.0));
        assert_eq!(
            driver.frame(None),
            FrameOutcome::Skipped(SkipReason::NoSurface)
        );
        assert_eq!(driver.frame_state().time, 0.0);
    }

    #[test]
    fn test_empty_viewport_skips_then_recovers() {
        let mut driver = running(Viewport::new(0.0, 0.0));
        let mut list = DisplayList::new();
        assert_eq!(
            driver.frame(Some(&mut list)),
            FrameOutcome::Skipped(SkipReason::EmptyViewport)
        );
        assert!(driver.particles().is_empty());

        driver.on_resize(Viewport::new(900.0, 900.0));
        assert_eq!(driver.frame(Some(&mut list)), FrameOutcome::Drawn);
        assert_eq!(driver.particles().len(), 90);
    }

    #[test]
    fn test_non_finite_scroll_skips_frame() {
        let mut driver = running(Viewport::new(800.0, 600.0));
        let mut list = DisplayList::new();
        driver.on_scroll(f64::NAN, 10_000.0);
        assert_eq!(
            driver.frame(Some(&mut list)),
            FrameOutcome::Skipped(SkipReason::InvalidInput)
        );
        driver.on_scroll(0.0, 10_000.0);
        assert_eq!(driver.frame(Some(&mut list)), FrameOutcome::Drawn);
    }

    #[test]
    fn test_resize_rebuilds_population() {
        let mut driver = running(Viewport::new(900.0, 900.0));
        assert_eq!(driver.particles().len(), 90);
        driver.on_resize(Viewport::new(1800.0, 900.0));
        assert_eq!(driver.particles().len(), 180);
        assert_eq!(driver.drones().len(), 7);
    }

    #[test]
    fn test_pointer_move_and_leave() {
        let mut driver = running(Viewport::new(800.0, 600.0));
        driver.on_pointer_move(Point::new(10.0, 20.0));
        assert_eq!(driver.frame_state().pointer, Some(Point::new(10.0, 20.0)));
        driver.on_pointer_leave();
        assert_eq!(driver.frame_state().pointer, None);
    }

    #[test]
    fn test_stop_cancels_frames_and_listeners() {
        let now = Instant::now();
        let mut driver = AnimationDriver::new(DriverSettings::default(), Some(5));
        driver.start(Viewport::new(800.0, 600.0), now);
        driver.on_pointer_move(Point::new(5.0, 5.0));
        assert!(driver.time_until_next_frame(now).is_some());

        driver.stop();
        assert_eq!(driver.lifecycle(), Lifecycle::Stopped);
        assert!(!driver.is_listening());
        assert_eq!(driver.time_until_next_frame(now), None);
        assert!(!driver.poll_frame(now + Duration::from_secs(1)));
        assert_eq!(driver.frame_state().pointer, None);

        driver.on_pointer_move(Point::new(1.0, 1.0));
        driver.on_scroll(500.0, 1000.0);
        driver.on_resize(Viewport::new(100.0, 100.0));
        let state = driver.frame_state();
        assert_eq!(state.pointer, None);
        assert_eq!(state.scroll, 0.0);
        assert_eq!(state.viewport, Viewport::new(800.0, 600.0));

        let mut list = DisplayList::new();
        assert_eq!(
            driver.frame(Some(&mut list)),
            FrameOutcome::Skipped(SkipReason::NotRunning)
        );
        // Idempotent.
        driver.stop();
        assert_eq!(driver.lifecycle(), Lifecycle::Stopped);
    }

    #[test]
    fn test_frame_clock_pacing() {
        let now = Instant::now();
        let settings = DriverSettings {
            fps: 50,
            ..Default::default()
        };
        let mut driver = AnimationDriver::new(settings, Some(9));
        assert!(!driver.poll_frame(now));

        driver.start(Viewport::new(800.0, 600.0), now);
        assert!(driver.poll_frame(now));
        assert!(!driver.poll_frame(now));
        assert_eq!(
            driver.time_until_next_frame(now),
            Some(Duration::from_millis(20))
        );
        assert!(driver.poll_frame(now + Duration::from_millis(20)));

        // A long stall schedules one frame ahead of the stall, not a burst.
        let late = now + Duration::from_secs(1);
        assert!(driver.poll_frame(late));
        assert!(!driver.poll_frame(late));
        assert_eq!(
            driver.time_until_next_frame(late),
            Some(Duration::from_millis(20))
        );
    }

    #[test]
    fn test_disabled_layers_draw_nothing() {
        let settings = DriverSettings {
            layers: Layers {
                particles: false,
                strata: false,
                topography: false,
                drones: false,
                geoid: false,
            },
            ..Default::default()
        };
        let mut driver = AnimationDriver::new(settings, Some(3));
        driver.start(Viewport::new(800.0, 600.0), Instant::now());
        for scroll in [0.0, 1000.0, 9000.0] {
            driver.on_scroll(scroll, 10_000.0);
            let mut list = DisplayList::new();
            assert_eq!(driver.frame(Some(&mut list)), FrameOutcome::Drawn);
            assert!(list.is_empty());
        }
    }

    #[test]
    fn test_same_seed_same_frames() {
        let mut a = running(Viewport::new(640.0, 480.0));
        let mut b = running(Viewport::new(640.0, 480.0));
        for scroll in [0.0, 500.0, 1500.0, 7000.0] {
            a.on_scroll(scroll, 10_000.0);
            b.on_scroll(scroll, 10_000.0);
            let mut la = DisplayList::new();
            let mut lb = DisplayList::new();
            a.frame(Some(&mut la));
            b.frame(Some(&mut lb));
            assert_eq!(la.ops(), lb.ops());
        }
    }
}
