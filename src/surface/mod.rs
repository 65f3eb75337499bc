//! Render surfaces for the waiting dialog
//!
//! The dialog controller never draws anything itself. It drives a
//! [`RenderSurface`] through the narrow interface below:
//! - `terminal`: crossterm rendering for interactive terminals
//! - `recording`: in-memory surface that records every call, for tests

pub mod colors;
pub mod recording;
pub mod terminal;

use crate::dialog::{DismissNotifier, HeaderRank};
use crate::error::AppError;
use std::fmt;

pub use recording::{RecordingSurface, SurfaceProbe};
pub use terminal::{DismissHook, TerminalSurface};

/// Identity of one constructed dialog element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SurfaceHandle(u64);

impl SurfaceHandle {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn id(self) -> u64 {
        self.0
    }
}

impl fmt::Display for SurfaceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "surface-{}", self.0)
    }
}

/// Presentational settings passed to [`RenderSurface::construct`].
///
/// None of these fields affect the dialog state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SurfaceSpec {
    /// Size postfix, e.g. "sm", "m", "lg"
    pub dialog_size: String,
    /// Progress bar flavour, e.g. "success", "warning"; empty for the default
    pub progress_type: String,
    /// Fill the progress bar right-to-left
    pub rtl: bool,
    pub header_rank: HeaderRank,
    pub header_class: String,
    pub content_element: String,
    pub content_class: String,
}

/// Visual side of the waiting dialog.
///
/// Implementations must tolerate `close` being called on an element that is
/// already closed, since the controller closes the element after the surface
/// reported its own dismissal.
pub trait RenderSurface: Send {
    /// Builds the dialog element, destroying any previous one.
    fn construct(&mut self, spec: &SurfaceSpec) -> Result<SurfaceHandle, AppError>;

    /// Writes the header region.
    fn set_header(&mut self, text: &str, visible: bool) -> Result<(), AppError>;

    /// Writes the body (progress message) region.
    fn set_body(&mut self, text: &str, visible: bool) -> Result<(), AppError>;

    /// Updates the progress bar width and its label.
    fn set_progress(&mut self, percent: u8, label: &str) -> Result<(), AppError>;

    /// Percentage currently rendered by the progress bar.
    fn progress(&self) -> u8;

    fn open(&mut self) -> Result<(), AppError>;

    fn close(&mut self) -> Result<(), AppError>;

    /// Registers the notifier to call when the user dismisses the element.
    ///
    /// The notifier must not be invoked from inside another `RenderSurface`
    /// method: the controller holds its state lock while calling them.
    fn on_dismissed(&mut self, notifier: DismissNotifier) {
        let _ = notifier;
    }

    /// Adapts the layout to a new screen size and redraws if open.
    fn resize(&mut self, columns: u16, rows: u16) -> Result<(), AppError> {
        let _ = (columns, rows);
        Ok(())
    }
}
