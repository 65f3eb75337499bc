use crate::dialog::{DialogController, SessionConfig, SessionSnapshot};
use crate::surface::{RecordingSurface, SurfaceProbe};

/// Controller over a fresh [`RecordingSurface`] with the built-in defaults
pub fn recording_controller() -> (DialogController, SurfaceProbe) {
    let (surface, probe) = RecordingSurface::new();
    (DialogController::new(surface), probe)
}

/// Test utilities for building dialogs and checking their state
pub struct TestDialogBuilder;

impl TestDialogBuilder {
    /// Controller over a recording surface with custom defaults
    pub fn with_defaults(defaults: SessionConfig) -> (DialogController, SurfaceProbe) {
        let (surface, probe) = RecordingSurface::new();
        (DialogController::with_defaults(surface, defaults), probe)
    }

    /// Defaults with the given animation cadence and delay in milliseconds
    pub fn timed_defaults(timer_ms: u64, timeout_ms: u64) -> SessionConfig {
        SessionConfig {
            timer: std::time::Duration::from_millis(timer_ms),
            timeout: std::time::Duration::from_millis(timeout_ms),
            ..SessionConfig::default()
        }
    }

    /// Checks that the session and the surface agree on what is shown
    pub fn validate_consistency(
        session: &SessionSnapshot,
        probe: &SurfaceProbe,
    ) -> Result<(), String> {
        if probe.current_handle() != Some(session.handle) {
            return Err(format!(
                "Surface shows {:?} but session is {}",
                probe.current_handle(),
                session.handle
            ));
        }

        if session.visible != probe.is_open() {
            return Err(format!(
                "Session visible={} but surface open={}",
                session.visible,
                probe.is_open()
            ));
        }

        if session.header != probe.header() {
            return Err(format!(
                "Session header {:?} differs from surface header {:?}",
                session.header,
                probe.header()
            ));
        }

        if session.body_visible && probe.body().as_deref() != Some(session.body.as_str()) {
            return Err(format!(
                "Session body '{}' differs from surface body {:?}",
                session.body,
                probe.body()
            ));
        }

        if session.progress != probe.percent() {
            return Err(format!(
                "Session progress {} differs from surface progress {}",
                session.progress,
                probe.percent()
            ));
        }

        Ok(())
    }
}
