//! Waiting Dialog Library
//!
//! A controller for a single modal "please wait" indicator: open and close
//! it, update its title and message, drive its progress bar, and cycle its
//! header text on a fixed cadence while work is in flight. Drawing is left
//! to a [`surface::RenderSurface`]; a crossterm surface and an in-memory
//! recording surface are included.
//!
//! # Examples
//!
//! ```rust,no_run
//! use std::time::Duration;
//! use waiting_dialog::dialog::{DialogController, DialogOptions};
//! use waiting_dialog::error::AppError;
//! use waiting_dialog::surface::TerminalSurface;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), AppError> {
//!     let dialog = DialogController::new(TerminalSurface::stdout());
//!
//!     // Header shows "Please wait", the message goes below it
//!     dialog.show(
//!         Some("Copying files"),
//!         DialogOptions::new().with_header_text("Please wait"),
//!     )?;
//!     let job = dialog.animate(None, Some(Duration::from_millis(300)), None)?;
//!
//!     for copied in 1..=10u64 {
//!         tokio::time::sleep(Duration::from_millis(200)).await;
//!         dialog.set_progress_ratio(copied, 10)?;
//!     }
//!
//!     dialog.stop_animate(Some(job));
//!     dialog.hide()?;
//!     Ok(())
//! }
//! ```

pub mod animator;
pub mod config;
pub mod constants;
pub mod dialog;
pub mod error;
pub mod surface;
pub mod terminal_manager;
pub mod testing_utils;

// Re-export commonly used types for convenience
pub use animator::{JobHandle, MessageAnimator, MessageSequence};
pub use config::Config;
pub use dialog::{DialogController, DialogOptions, HeaderText, SessionConfig};
pub use error::AppError;
pub use surface::{RecordingSurface, RenderSurface, SurfaceHandle, TerminalSurface};

/// Current version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
