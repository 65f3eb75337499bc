//! Screen ownership for the interactive demo.
//!
//! A [`ScreenSession`] puts the terminal into the state a
//! [`crate::surface::TerminalSurface`] draws into and puts it back afterwards.
//! If the session is dropped without [`ScreenSession::leave`], the terminal
//! is still restored as far as possible.

use crate::constants::surface::{FALLBACK_COLUMNS, FALLBACK_ROWS};
use crate::error::AppError;
use crossterm::{cursor, execute, terminal};
use std::io::{Stdout, stdout};

#[derive(Debug, Clone, Default)]
pub struct ScreenOptions {
    /// Stay on the primary screen in cooked mode so stdout logging remains readable.
    pub debug_mode: bool,
    pub window_title: Option<String>,
}

impl ScreenOptions {
    pub fn takes_over_screen(&self) -> bool {
        !self.debug_mode
    }
}

#[derive(Debug)]
pub struct ScreenSession {
    options: ScreenOptions,
    active: bool,
}

impl ScreenSession {
    /// Switches to the alternate screen and returns the writer to draw into.
    pub fn enter(options: ScreenOptions) -> Result<(Self, Stdout), AppError> {
        let mut out = stdout();
        if let Some(title) = &options.window_title {
            execute!(out, terminal::SetTitle(title))?;
        }

        let session = Self {
            active: options.takes_over_screen(),
            options,
        };
        if session.active {
            terminal::enable_raw_mode()?;
            execute!(out, terminal::EnterAlternateScreen, cursor::Hide)?;
        }
        tracing::debug!("Entered screen session: {:?}", session.options);
        Ok((session, out))
    }

    /// Columns and rows to lay the dialog out in.
    pub fn dimensions(&self) -> (u16, u16) {
        match terminal::size() {
            Ok((0, _)) | Ok((_, 0)) => (FALLBACK_COLUMNS, FALLBACK_ROWS),
            Ok(dimensions) => dimensions,
            Err(e) => {
                tracing::debug!(
                    "Terminal size unavailable ({e}), using {FALLBACK_COLUMNS}x{FALLBACK_ROWS}"
                );
                (FALLBACK_COLUMNS, FALLBACK_ROWS)
            }
        }
    }

    pub fn options(&self) -> &ScreenOptions {
        &self.options
    }

    /// Gives the screen back. Errors are reported here rather than lost in `Drop`.
    pub fn leave(mut self) -> Result<(), AppError> {
        self.restore()
    }

    fn restore(&mut self) -> Result<(), AppError> {
        if !std::mem::take(&mut self.active) {
            return Ok(());
        }
        terminal::disable_raw_mode()?;
        execute!(stdout(), cursor::Show, terminal::LeaveAlternateScreen)?;
        Ok(())
    }
}

impl Drop for ScreenSession {
    fn drop(&mut self) {
        if let Err(e) = self.restore() {
            tracing::warn!("Could not restore terminal: {e}");
        }
    }
}
