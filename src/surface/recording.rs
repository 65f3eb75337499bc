//! In-memory render surface
//!
//! Records every call the controller makes and keeps the resulting visual
//! state, so tests (ours and downstream ones) can assert on what would have
//! been drawn without a terminal.

use super::{RenderSurface, SurfaceHandle, SurfaceSpec};
use crate::dialog::DismissNotifier;
use crate::error::AppError;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// One call received by a [`RecordingSurface`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceCall {
    Construct(SurfaceHandle),
    SetHeader { text: String, visible: bool },
    SetBody { text: String, visible: bool },
    SetProgress { percent: u8, label: String },
    Open,
    Close,
}

#[derive(Debug, Default)]
struct RecordedState {
    next_id: u64,
    current: Option<SurfaceHandle>,
    destroyed: Vec<SurfaceHandle>,
    spec: Option<SurfaceSpec>,
    header: Option<String>,
    header_visible: bool,
    body: Option<String>,
    body_visible: bool,
    percent: u8,
    label: String,
    open: bool,
    calls: Vec<SurfaceCall>,
    notifier: Option<DismissNotifier>,
}

fn lock(state: &Mutex<RecordedState>) -> MutexGuard<'_, RecordedState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Render surface that draws nothing and remembers everything.
#[derive(Debug)]
pub struct RecordingSurface {
    state: Arc<Mutex<RecordedState>>,
}

/// Read side of a [`RecordingSurface`], usable after the surface was moved
/// into a controller.
#[derive(Debug, Clone)]
pub struct SurfaceProbe {
    state: Arc<Mutex<RecordedState>>,
}

impl RecordingSurface {
    /// Creates a surface together with its probe
    pub fn new() -> (Self, SurfaceProbe) {
        let state = Arc::new(Mutex::new(RecordedState::default()));
        (
            Self {
                state: Arc::clone(&state),
            },
            SurfaceProbe { state },
        )
    }
}

impl RenderSurface for RecordingSurface {
    fn construct(&mut self, spec: &SurfaceSpec) -> Result<SurfaceHandle, AppError> {
        let mut state = lock(&self.state);
        if let Some(previous) = state.current.take() {
            state.destroyed.push(previous);
        }

        state.next_id += 1;
        let handle = SurfaceHandle::new(state.next_id);
        state.current = Some(handle);
        state.spec = Some(spec.clone());
        state.header = None;
        state.header_visible = false;
        state.body = None;
        state.body_visible = false;
        state.percent = 0;
        state.label.clear();
        state.open = false;
        state.notifier = None;
        state.calls.push(SurfaceCall::Construct(handle));
        Ok(handle)
    }

    fn set_header(&mut self, text: &str, visible: bool) -> Result<(), AppError> {
        let mut state = lock(&self.state);
        state.header = Some(text.to_string());
        state.header_visible = visible;
        state.calls.push(SurfaceCall::SetHeader {
            text: text.to_string(),
            visible,
        });
        Ok(())
    }

    fn set_body(&mut self, text: &str, visible: bool) -> Result<(), AppError> {
        let mut state = lock(&self.state);
        state.body = Some(text.to_string());
        state.body_visible = visible;
        state.calls.push(SurfaceCall::SetBody {
            text: text.to_string(),
            visible,
        });
        Ok(())
    }

    fn set_progress(&mut self, percent: u8, label: &str) -> Result<(), AppError> {
        let mut state = lock(&self.state);
        state.percent = percent;
        state.label = label.to_string();
        state.calls.push(SurfaceCall::SetProgress {
            percent,
            label: label.to_string(),
        });
        Ok(())
    }

    fn progress(&self) -> u8 {
        lock(&self.state).percent
    }

    fn open(&mut self) -> Result<(), AppError> {
        let mut state = lock(&self.state);
        state.open = true;
        state.calls.push(SurfaceCall::Open);
        Ok(())
    }

    fn close(&mut self) -> Result<(), AppError> {
        let mut state = lock(&self.state);
        state.open = false;
        state.calls.push(SurfaceCall::Close);
        Ok(())
    }

    fn on_dismissed(&mut self, notifier: DismissNotifier) {
        lock(&self.state).notifier = Some(notifier);
    }
}

impl SurfaceProbe {
    /// Header text, `None` if nothing was ever written to the header region
    pub fn header(&self) -> Option<String> {
        lock(&self.state).header.clone()
    }

    pub fn header_visible(&self) -> bool {
        lock(&self.state).header_visible
    }

    /// Body text, `None` if nothing was ever written to the body region
    pub fn body(&self) -> Option<String> {
        lock(&self.state).body.clone()
    }

    pub fn body_visible(&self) -> bool {
        lock(&self.state).body_visible
    }

    pub fn percent(&self) -> u8 {
        lock(&self.state).percent
    }

    pub fn label(&self) -> String {
        lock(&self.state).label.clone()
    }

    pub fn is_open(&self) -> bool {
        lock(&self.state).open
    }

    pub fn current_handle(&self) -> Option<SurfaceHandle> {
        lock(&self.state).current
    }

    pub fn destroyed(&self) -> Vec<SurfaceHandle> {
        lock(&self.state).destroyed.clone()
    }

    pub fn spec(&self) -> Option<SurfaceSpec> {
        lock(&self.state).spec.clone()
    }

    pub fn calls(&self) -> Vec<SurfaceCall> {
        lock(&self.state).calls.clone()
    }

    /// Number of header writes so far
    pub fn header_writes(&self) -> usize {
        lock(&self.state)
            .calls
            .iter()
            .filter(|call| matches!(call, SurfaceCall::SetHeader { .. }))
            .count()
    }

    /// Simulates the user closing the element.
    ///
    /// Fires at most once per construct; returns whether the controller
    /// accepted the dismissal.
    pub fn dismiss(&self) -> bool {
        // Take the notifier out first: the controller locks its own state
        // and may call back into this surface.
        let notifier = lock(&self.state).notifier.take();
        match notifier {
            Some(notifier) => notifier.notify(),
            None => false,
        }
    }
}
