//! Mouse and focus reporting for the lifetime of the UI.

use std::io::stdout;

use crossterm::{
    event::{DisableFocusChange, DisableMouseCapture, EnableFocusChange, EnableMouseCapture},
    execute,
};

/// Enables mouse capture and focus events; disables them again on drop.
#[derive(Debug)]
pub struct TerminalSession;

impl TerminalSession {
    pub fn enter() -> std::io::Result<Self> {
        execute!(stdout(), EnableMouseCapture, EnableFocusChange)?;
        Ok(Self)
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let _ = execute!(stdout(), DisableFocusChange, DisableMouseCapture);
    }
}
