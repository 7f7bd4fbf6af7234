//! Interactive viewer: a virtual document scrolled over the background.

use std::time::{Duration, Instant};

use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEvent, MouseEventKind,
};
use ratatui::{
    DefaultTerminal, Frame,
    layout::{Constraint, Layout, Rect},
    style::Stylize,
    text::Line,
};
use strata_background::{BackgroundState, DriverSettings};
use strata_config::Config;
use strata_core::ColorTheme;
use tracing::debug;

/// Event poll timeout when no frame is scheduled.
const IDLE_POLL: Duration = Duration::from_millis(250);

/// The main application which holds the state and logic of the application.
#[derive(Debug)]
pub struct App {
    /// Is the application running?
    running: bool,
    background: BackgroundState,
    /// Current color theme.
    color_theme: ColorTheme,
    /// Scroll offset into the virtual document, in virtual pixels.
    scroll: f64,
    /// Largest reachable scroll offset.
    document_length: f64,
    scroll_step: f64,
    autoscroll: bool,
    autoscroll_rate: f64,
}

impl App {
    /// Construct a new instance of [`App`].
    pub fn new(config: &Config) -> Self {
        let settings = DriverSettings {
            speed: config.speed,
            theme: config.theme,
            layers: config.layers,
            fps: config.fps,
        };
        Self {
            running: false,
            background: BackgroundState::new(settings, config.seed, config.cell),
            color_theme: config.theme,
            scroll: 0.0,
            document_length: config.document_length,
            scroll_step: config.scroll_step,
            autoscroll: config.autoscroll,
            autoscroll_rate: config.autoscroll_rate,
        }
    }

    /// Run the application's main loop.
    pub fn run(mut self, mut terminal: DefaultTerminal) -> color_eyre::Result<()> {
        let size = terminal.size()?;
        self.start(Rect::new(0, 0, size.width, size.height), Instant::now());

        let result = self.event_loop(&mut terminal);
        self.finish(result)
    }

    fn event_loop(&mut self, terminal: &mut DefaultTerminal) -> color_eyre::Result<()> {
        while self.running {
            if self.background.driver_mut().poll_frame(Instant::now()) {
                self.advance_autoscroll();
                terminal.draw(|frame| self.render(frame))?;
            }
            let timeout = self
                .background
                .driver()
                .time_until_next_frame(Instant::now())
                .unwrap_or(IDLE_POLL);
            self.handle_crossterm_events(timeout)?;
        }
        Ok(())
    }

    /// Stop the background whether the loop ended cleanly or with an error.
    fn finish(&mut self, result: color_eyre::Result<()>) -> color_eyre::Result<()> {
        self.running = false;
        self.background.stop();
        result
    }

    fn start(&mut self, area: Rect, now: Instant) {
        self.running = true;
        self.background.start(area, now);
        self.set_scroll(self.scroll);
    }

    /// Renders the background with the status line on top.
    fn render(&mut self, frame: &mut Frame) {
        self.background.render(frame);

        let color = self.color_theme.color();
        let chunks =
            Layout::vertical([Constraint::Fill(1), Constraint::Length(1)]).split(frame.area());

        let scrolled = if self.document_length > 0.0 {
            self.scroll / self.document_length * 100.0
        } else {
            100.0
        };
        let geoid = self.background.driver().last_geoid_fade().unwrap_or(0.0) * 100.0;

        let status = Line::from(vec![
            format!("{scrolled:>3.0}% ").bold().fg(color),
            "scrolled  ".dark_gray(),
            format!("{geoid:>3.0}% ").bold().fg(color),
            "geoid  ".dark_gray(),
            "q".bold().fg(color),
            " quit  ".dark_gray(),
            "j/k".bold().fg(color),
            " scroll  ".dark_gray(),
            "a".bold().fg(color),
            if self.autoscroll {
                " autoscroll on  ".dark_gray()
            } else {
                " autoscroll off  ".dark_gray()
            },
            "c".bold().fg(color),
            " cycle color  ".dark_gray(),
            "s".bold().fg(color),
            format!(" speed: {}", self.background.driver().settings().speed.name()).dark_gray(),
        ])
        .centered();
        frame.render_widget(status, chunks[1]);
    }

    /// Reads the crossterm events and updates the state of [`App`].
    /// Waits at most until the next frame is due.
    fn handle_crossterm_events(&mut self, timeout: Duration) -> color_eyre::Result<()> {
        if event::poll(timeout)? {
            self.on_event(event::read()?);
        }
        Ok(())
    }

    fn on_event(&mut self, event: Event) {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => self.on_key_event(key),
            Event::Mouse(mouse) => self.on_mouse_event(mouse),
            Event::FocusLost => self.background.driver_mut().on_pointer_leave(),
            // Picked up by the next render
            Event::Resize(_, _) => {}
            _ => {}
        }
    }

    /// Handles the key events and updates the state of [`App`].
    fn on_key_event(&mut self, key: KeyEvent) {
        match (key.modifiers, key.code) {
            (_, KeyCode::Esc | KeyCode::Char('q'))
            | (KeyModifiers::CONTROL, KeyCode::Char('c') | KeyCode::Char('C')) => self.quit(),
            (_, KeyCode::Char('c')) => self.cycle_color_theme(),
            (_, KeyCode::Char('s')) => self.cycle_speed(),
            (_, KeyCode::Char('a')) => self.autoscroll = !self.autoscroll,
            (_, KeyCode::Char('j') | KeyCode::Down) => self.scroll_by(self.scroll_step / 2.0),
            (_, KeyCode::Char('k') | KeyCode::Up) => self.scroll_by(-self.scroll_step / 2.0),
            (_, KeyCode::PageDown) => self.scroll_by(self.viewport_height()),
            (_, KeyCode::PageUp) => self.scroll_by(-self.viewport_height()),
            (_, KeyCode::Home) => self.set_scroll(0.0),
            (_, KeyCode::End) => self.set_scroll(self.document_length),
            _ => {}
        }
    }

    fn on_mouse_event(&mut self, mouse: MouseEvent) {
        match mouse.kind {
            MouseEventKind::Moved | MouseEventKind::Drag(_) => {
                self.background.pointer_at(mouse.column, mouse.row)
            }
            MouseEventKind::ScrollDown => self.scroll_by(self.scroll_step),
            MouseEventKind::ScrollUp => self.scroll_by(-self.scroll_step),
            _ => {}
        }
    }

    fn viewport_height(&self) -> f64 {
        self.background.driver().frame_state().viewport.height
    }

    fn scroll_by(&mut self, delta: f64) {
        self.set_scroll(self.scroll + delta);
    }

    /// Clamp to the document and hand the offset to the driver.
    fn set_scroll(&mut self, offset: f64) {
        self.scroll = offset.clamp(0.0, self.document_length);
        self.background
            .driver_mut()
            .on_scroll(self.scroll, self.document_length);
    }

    /// Advance one frame's worth of autoscroll, stopping at the end.
    fn advance_autoscroll(&mut self) {
        if !self.autoscroll {
            return;
        }
        self.scroll_by(self.autoscroll_rate);
        if self.scroll >= self.document_length {
            self.autoscroll = false;
            debug!("autoscroll reached end of document");
        }
    }

    /// Cycle through available color themes.
    fn cycle_color_theme(&mut self) {
        self.color_theme = self.color_theme.next();
        self.background.driver_mut().set_theme(self.color_theme);
    }

    fn cycle_speed(&mut self) {
        let speed = self.background.driver().settings().speed.next();
        self.background.driver_mut().set_speed(speed);
    }

    /// Set running to false to quit the application.
    fn quit(&mut self) {
        self.running = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEventState, MouseButton};
    use strata_background::Lifecycle;
    use strata_core::{AnimationSpeed, Point};

    fn app() -> App {
        let config = Config {
            seed: Some(3),
            document_length: 1000.0,
            ..Config::default()
        };
        let mut app = App::new(&config);
        // 40 x 20 cells = 320 x 320 px
        app.start(Rect::new(0, 0, 40, 20), Instant::now());
        app
    }

    fn press(app: &mut App, code: KeyCode) {
        app.on_event(Event::Key(KeyEvent::new(code, KeyModifiers::NONE)));
    }

    fn mouse(app: &mut App, kind: MouseEventKind, column: u16, row: u16) {
        app.on_event(Event::Mouse(MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }));
    }

    fn driver_scroll(app: &App) -> f64 {
        app.background.driver().frame_state().scroll
    }

    #[test]
    fn test_start_reports_scroll_range() {
        let app = app();
        let state = app.background.driver().frame_state();
        assert_eq!(state.scroll, 0.0);
        assert_eq!(state.scrollable, 1000.0);
    }

    #[test]
    fn test_keys_scroll_and_clamp() {
        let mut app = app();
        press(&mut app, KeyCode::Char('j'));
        assert_eq!(driver_scroll(&app), 50.0);
        press(&mut app, KeyCode::Up);
        press(&mut app, KeyCode::Up);
        assert_eq!(driver_scroll(&app), 0.0);

        press(&mut app, KeyCode::PageDown);
        assert_eq!(driver_scroll(&app), 320.0);
        press(&mut app, KeyCode::End);
        assert_eq!(driver_scroll(&app), 1000.0);
        press(&mut app, KeyCode::PageDown);
        assert_eq!(driver_scroll(&app), 1000.0);
        press(&mut app, KeyCode::Home);
        assert_eq!(driver_scroll(&app), 0.0);
    }

    #[test]
    fn test_mouse_wheel_scrolls() {
        let mut app = app();
        mouse(&mut app, MouseEventKind::ScrollDown, 0, 0);
        mouse(&mut app, MouseEventKind::ScrollDown, 0, 0);
        assert_eq!(driver_scroll(&app), 200.0);
        mouse(&mut app, MouseEventKind::ScrollUp, 0, 0);
        assert_eq!(driver_scroll(&app), 100.0);
    }

    #[test]
    fn test_pointer_follows_mouse_until_focus_lost() {
        let mut app = app();
        mouse(&mut app, MouseEventKind::Moved, 10, 2);
        assert_eq!(
            app.background.driver().frame_state().pointer,
            Some(Point::new(84.0, 40.0))
        );

        mouse(&mut app, MouseEventKind::Drag(MouseButton::Left), 0, 0);
        assert_eq!(
            app.background.driver().frame_state().pointer,
            Some(Point::new(4.0, 8.0))
        );

        app.on_event(Event::FocusLost);
        assert_eq!(app.background.driver().frame_state().pointer, None);
    }

    #[test]
    fn test_autoscroll_stops_at_end() {
        let mut app = app();
        app.autoscroll_rate = 400.0;
        press(&mut app, KeyCode::Char('a'));
        assert!(app.autoscroll);

        app.advance_autoscroll();
        app.advance_autoscroll();
        assert_eq!(driver_scroll(&app), 800.0);
        assert!(app.autoscroll);

        app.advance_autoscroll();
        assert_eq!(driver_scroll(&app), 1000.0);
        assert!(!app.autoscroll);
    }

    #[test]
    fn test_theme_and_speed_cycle() {
        let mut app = app();
        press(&mut app, KeyCode::Char('c'));
        assert_eq!(app.color_theme, ColorTheme::Green);
        assert_eq!(app.background.driver().settings().theme, ColorTheme::Green);

        press(&mut app, KeyCode::Char('s'));
        assert_eq!(
            app.background.driver().settings().speed,
            AnimationSpeed::Fast
        );
    }

    #[test]
    fn test_quit_keys() {
        for key in [
            KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE),
            KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE),
            KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
        ] {
            let mut app = app();
            app.on_event(Event::Key(key));
            assert!(!app.running);
        }
    }

    #[test]
    fn test_finish_stops_background_on_error() {
        let mut app = app();
        let result = app.finish(Err(color_eyre::eyre::eyre!("terminal went away")));

        assert!(result.is_err());
        assert!(!app.running);
        assert_eq!(app.background.driver().lifecycle(), Lifecycle::Stopped);
        assert!(!app.background.driver().is_listening());

        press(&mut app, KeyCode::Char('j'));
        assert_eq!(driver_scroll(&app), 0.0);
    }

    #[test]
    fn test_finish_stops_background_on_clean_exit() {
        let mut app = app();
        press(&mut app, KeyCode::Char('q'));
        assert!(app.finish(Ok(())).is_ok());
        assert_eq!(app.background.driver().lifecycle(), Lifecycle::Stopped);
    }

    #[test]
    fn test_key_release_is_ignored() {
        let mut app = app();
        let mut key = KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE);
        key.kind = KeyEventKind::Release;
        key.state = KeyEventState::NONE;
        app.on_event(Event::Key(key));
        assert!(app.running);
    }
}
