//! The dialog controller
//!
//! Owns the single session of a dialog and mediates every read and write of
//! it. The state sits behind one mutex shared with the animation jobs, so
//! all operations are serialized and each one runs to completion before a
//! tick can observe it.

use super::options::{DialogOptions, OnHide, SessionConfig};
use super::progress::{clamp_percent, progress_label, ratio_percent};
use super::session::{Placement, Session, SessionSnapshot};
use crate::animator::jobs::{JobHandle, JobRegistry};
use crate::animator::{MessageAnimator, MessageSequence};
use crate::constants::DEFAULT_MESSAGE;
use crate::error::AppError;
use crate::surface::{RenderSurface, SurfaceHandle};
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;

pub(crate) struct DialogState {
    pub surface: Box<dyn RenderSurface>,
    pub session: Option<Session>,
    pub jobs: JobRegistry,
    pub defaults: SessionConfig,
}

impl DialogState {
    /// Marks the current session hidden and releases its jobs.
    ///
    /// Returns the hide callback to fire once the lock is released.
    fn hide_session(&mut self) -> Option<(OnHide, SurfaceHandle)> {
        let session = self.session.as_mut()?;
        let handle = session.handle;
        let on_hide = session.mark_hidden();

        if session.config.stop_animations_on_close {
            let cancelled = self.jobs.cancel_session(handle);
            if cancelled > 0 {
                tracing::debug!("Stopped {cancelled} animation job(s) of {handle}");
            }
        }

        on_hide.map(|callback| (callback, handle))
    }
}

pub(crate) struct DialogShared {
    state: Mutex<DialogState>,
}

impl DialogShared {
    pub(crate) fn lock(&self) -> MutexGuard<'_, DialogState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn dismissed(&self, handle: SurfaceHandle) -> bool {
        let hidden = {
            let mut state = self.lock();
            match state.session.as_ref() {
                Some(session) if session.handle == handle && session.visible => {}
                _ => {
                    tracing::debug!("Ignoring dismissal of stale or hidden {handle}");
                    return false;
                }
            }

            // The surface closed itself; closing again lets it release the element
            if let Err(e) = state.surface.close() {
                tracing::warn!("Failed to close dismissed {handle}: {e}");
            }
            tracing::info!("Waiting dialog {handle} dismissed by the user");
            state.hide_session()
        };

        fire_on_hide(hidden);
        true
    }
}

fn fire_on_hide(hidden: Option<(OnHide, SurfaceHandle)>) {
    if let Some((callback, handle)) = hidden {
        callback.call(handle);
    }
}

/// Reports that the user dismissed a dialog element.
///
/// Handed to [`RenderSurface::on_dismissed`] on every `show`.
#[derive(Clone)]
pub struct DismissNotifier {
    shared: Weak<DialogShared>,
    handle: SurfaceHandle,
}

impl DismissNotifier {
    /// Element this notifier was registered for
    pub fn handle(&self) -> SurfaceHandle {
        self.handle
    }

    /// Hides the session if it still belongs to this element.
    /// Returns whether the dismissal was accepted.
    pub fn notify(&self) -> bool {
        match self.shared.upgrade() {
            Some(shared) => shared.dismissed(self.handle),
            None => false,
        }
    }
}

impl fmt::Debug for DismissNotifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DismissNotifier")
            .field("handle", &self.handle)
            .finish()
    }
}

/// Controller of one waiting dialog.
///
/// Cloning is cheap and every clone drives the same dialog.
#[derive(Clone)]
pub struct DialogController {
    shared: Arc<DialogShared>,
}

impl DialogController {
    /// Creates a controller with the built-in defaults
    pub fn new(surface: impl RenderSurface + 'static) -> Self {
        Self::with_defaults(surface, SessionConfig::default())
    }

    /// Creates a controller whose sessions merge their options over `defaults`
    pub fn with_defaults(surface: impl RenderSurface + 'static, defaults: SessionConfig) -> Self {
        Self {
            shared: Arc::new(DialogShared {
                state: Mutex::new(DialogState {
                    surface: Box::new(surface),
                    session: None,
                    jobs: JobRegistry::new(),
                    defaults,
                }),
            }),
        }
    }

    /// Opens the dialog, replacing any previous session.
    ///
    /// `message` defaults to "Loading". Its placement depends on
    /// `header_text`: hidden header puts it in the body, a header text puts
    /// it under that header, and no header text puts it in the header.
    ///
    /// # Errors
    /// * `AppError::InvalidArgument` - options fail validation; nothing is changed
    /// * Surface errors while building the element; the session is discarded
    pub fn show(
        &self,
        message: Option<&str>,
        options: DialogOptions,
    ) -> Result<SurfaceHandle, AppError> {
        let message = message.unwrap_or(DEFAULT_MESSAGE).to_string();
        let mut state = self.shared.lock();
        let config = state.defaults.merged(&options)?;

        if let Some(previous) = state.session.take() {
            if previous.config.stop_animations_on_close {
                let cancelled = state.jobs.cancel_session(previous.handle);
                if cancelled > 0 {
                    tracing::debug!(
                        "Stopped {cancelled} animation job(s) of replaced {}",
                        previous.handle
                    );
                }
            }
            tracing::debug!("Replacing waiting dialog {}", previous.handle);
        }

        let placement = Placement::for_message(&message, &config.header_text);
        let handle = state.surface.construct(&config.surface_spec())?;
        if let Some(header) = &placement.header {
            state.surface.set_header(header, true)?;
        }
        if let Some(body) = &placement.body {
            state.surface.set_body(body, true)?;
        }
        state.surface.on_dismissed(DismissNotifier {
            shared: Arc::downgrade(&self.shared),
            handle,
        });
        state.surface.open()?;

        tracing::debug!("Showing waiting dialog {handle}: {message}");
        state.session = Some(Session::new(message, config, handle, placement));
        Ok(handle)
    }

    /// Closes the dialog. No-op without a visible session.
    ///
    /// Fires `on_hide` and, unless `stop_animations_on_close` was cleared,
    /// stops the session's animation jobs.
    pub fn hide(&self) -> Result<(), AppError> {
        let hidden = {
            let mut state = self.shared.lock();
            let handle = match state.session.as_ref() {
                Some(session) if session.visible => session.handle,
                _ => return Ok(()),
            };

            state.surface.close()?;
            tracing::debug!("Hiding waiting dialog {handle}");
            state.hide_session()
        };

        fire_on_hide(hidden);
        Ok(())
    }

    /// Reports a user dismissal of element `handle`.
    ///
    /// Same as [`DismissNotifier::notify`] for callers that track handles
    /// themselves.
    pub fn dismiss(&self, handle: SurfaceHandle) -> bool {
        self.shared.dismissed(handle)
    }

    /// Updates the body message and/or the header title.
    ///
    /// Silently ignored without a session. Omitting both is a valid no-op.
    ///
    /// # Errors
    /// * `AppError::InvalidState` - a title was given but the session layout
    ///   has no header region
    pub fn message(
        &self,
        new_message: Option<&str>,
        new_title: Option<&str>,
    ) -> Result<(), AppError> {
        let mut state = self.shared.lock();
        let DialogState {
            surface, session, ..
        } = &mut *state;
        let Some(session) = session.as_mut() else {
            tracing::debug!("Ignoring message update without a waiting dialog");
            return Ok(());
        };

        if let Some(title) = new_title {
            if session.header.is_none() {
                return Err(AppError::invalid_state(format!(
                    "{} has no header region to write the title into",
                    session.handle
                )));
            }
            surface.set_header(title, true)?;
            session.header = Some(title.to_string());
            session.header_visible = true;
        }

        if let Some(message) = new_message {
            surface.set_body(message, true)?;
            session.body = message.to_string();
            session.body_visible = true;
        }

        Ok(())
    }

    /// Percentage currently rendered, `None` without a session.
    pub fn progress(&self) -> Option<u8> {
        let state = self.shared.lock();
        state.session.as_ref()?;
        Some(state.surface.progress())
    }

    /// Sets an absolute percentage, clamped to `0..=100`.
    ///
    /// Returns the stored percentage, `None` without a session.
    pub fn set_progress(&self, percent: i64) -> Result<Option<u8>, AppError> {
        self.write_progress(clamp_percent(percent))
    }

    /// Sets the percentage to `floor(100 * current / total)`, clamped.
    ///
    /// # Errors
    /// * `AppError::DivisionByZero` - `total` is zero, with or without a session
    pub fn set_progress_ratio(&self, current: u64, total: u64) -> Result<Option<u8>, AppError> {
        let percent = ratio_percent(current, total)?;
        self.write_progress(percent)
    }

    fn write_progress(&self, percent: u8) -> Result<Option<u8>, AppError> {
        let mut state = self.shared.lock();
        let DialogState {
            surface, session, ..
        } = &mut *state;
        let Some(session) = session.as_mut() else {
            return Ok(None);
        };

        surface.set_progress(percent, &progress_label(percent))?;
        session.progress = percent;
        Ok(Some(percent))
    }

    /// Forwards a screen size change to the surface
    pub fn resize(&self, columns: u16, rows: u16) -> Result<(), AppError> {
        tracing::debug!("Resizing waiting dialog surface to {columns}x{rows}");
        self.shared.lock().surface.resize(columns, rows)
    }

    /// Copy of the current session state
    pub fn session(&self) -> Option<SessionSnapshot> {
        self.shared.lock().session.as_ref().map(Session::snapshot)
    }

    pub fn is_visible(&self) -> bool {
        self.shared
            .lock()
            .session
            .as_ref()
            .is_some_and(|session| session.visible)
    }

    /// Configuration every `show` merges its options over
    pub fn defaults(&self) -> SessionConfig {
        self.shared.lock().defaults.clone()
    }

    /// Animator cycling this dialog's header
    pub fn animator(&self) -> MessageAnimator {
        MessageAnimator::new(Arc::clone(&self.shared))
    }

    /// Starts cycling the header text. See [`MessageAnimator::animate`].
    pub fn animate(
        &self,
        messages: Option<MessageSequence>,
        cadence: Option<Duration>,
        delay: Option<Duration>,
    ) -> Result<JobHandle, AppError> {
        self.animator().animate(messages, cadence, delay)
    }

    /// Stops a job, or the most recent one. See [`MessageAnimator::stop_animate`].
    pub fn stop_animate(&self, handle: Option<JobHandle>) {
        self.animator().stop_animate(handle)
    }
}
