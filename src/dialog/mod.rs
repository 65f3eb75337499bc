//! Waiting dialog state machine
//!
//! A [`DialogController`] owns at most one session at a time:
//! - `show` replaces any previous session with a fresh one
//! - `message` and `set_progress` update the live session
//! - `hide` or a user dismissal closes it and fires `on_hide` once
//!
//! Everything visual is delegated to a [`crate::surface::RenderSurface`].

mod controller;
mod options;
pub mod progress;
mod session;

pub(crate) use controller::{DialogShared, DialogState};
pub use controller::{DialogController, DismissNotifier};
pub use options::{DialogOptions, HeaderRank, HeaderText, OnHide, SessionConfig};
pub use session::SessionSnapshot;
