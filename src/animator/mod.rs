//! Header message cycling
//!
//! Each call to [`MessageAnimator::animate`] starts an independent job: a
//! tokio task that rewrites the dialog header on a fixed cadence until it is
//! stopped. Jobs read and write the header through the dialog state lock, so
//! a stopped job never ticks again and a tick always sees the current
//! session.

pub mod jobs;
pub mod messages;

pub use jobs::JobHandle;
pub use messages::{HeaderSlot, MessageSequence, StepFn};

use crate::dialog::{DialogShared, DialogState};
use crate::error::AppError;
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::time::{Instant, MissedTickBehavior};

/// Starts and stops cycling jobs of one dialog.
#[derive(Clone)]
pub struct MessageAnimator {
    shared: Arc<DialogShared>,
}

impl MessageAnimator {
    pub(crate) fn new(shared: Arc<DialogShared>) -> Self {
        Self { shared }
    }

    /// Starts cycling the header text.
    ///
    /// * `messages` - frames or a step function; defaults to the ellipsis
    ///   expansion of the header text shown right now
    /// * `cadence` - time between ticks; defaults to the session `timer`
    /// * `delay` - time before the first tick; defaults to the session `timeout`
    ///
    /// The first tick fires after `delay`, then one tick per `cadence`.
    ///
    /// # Errors
    /// * `AppError::InvalidState` - no open session, no header region, or no tokio runtime
    /// * `AppError::InvalidArgument` - empty frame list, zero cadence or a delay past the clock's range
    pub fn animate(
        &self,
        messages: Option<MessageSequence>,
        cadence: Option<Duration>,
        delay: Option<Duration>,
    ) -> Result<JobHandle, AppError> {
        let runtime = tokio::runtime::Handle::try_current().map_err(|_| {
            AppError::invalid_state("message animation requires a running tokio runtime")
        })?;

        let mut state = self.shared.lock();
        let Some(session) = state.session.as_ref() else {
            return Err(AppError::invalid_state(
                "cannot animate without a waiting dialog",
            ));
        };
        if !session.visible {
            return Err(AppError::invalid_state(format!(
                "{} is closed and cannot be animated",
                session.handle
            )));
        }
        let Some(header) = session.header.as_deref() else {
            return Err(AppError::invalid_state(format!(
                "{} has no header region to animate",
                session.handle
            )));
        };

        let sequence = messages.unwrap_or_else(|| MessageSequence::ellipsis(header));
        sequence.validate()?;

        let cadence = cadence.unwrap_or(session.config.timer);
        if cadence.is_zero() {
            return Err(AppError::invalid_argument(
                "animation cadence must be greater than zero",
            ));
        }
        let delay = delay.unwrap_or(session.config.timeout);
        let start = Instant::now().checked_add(delay).ok_or_else(|| {
            AppError::invalid_argument(format!("animation delay {delay:?} is out of range"))
        })?;
        let session_handle = session.handle;

        let job = state.jobs.allocate();
        let task = runtime.spawn(run_job(
            Arc::downgrade(&self.shared),
            job,
            sequence,
            start,
            cadence,
        ));
        state.jobs.insert(job, session_handle, task.abort_handle());

        tracing::debug!(
            "Started {job} on {session_handle} (cadence {cadence:?}, delay {delay:?})"
        );
        Ok(job)
    }

    /// Stops `handle`, or the most recently started job when `None`.
    ///
    /// Unknown or already stopped handles are ignored. A stopped job never
    /// writes the header again.
    pub fn stop_animate(&self, handle: Option<JobHandle>) {
        match self.shared.lock().jobs.cancel(handle) {
            Some(stopped) => tracing::debug!("Stopped {stopped}"),
            None => tracing::debug!("No animation job to stop for {handle:?}"),
        }
    }

    /// Stops every job. Returns how many were running.
    pub fn stop_all(&self) -> usize {
        let stopped = self.shared.lock().jobs.cancel_all();
        if stopped > 0 {
            tracing::debug!("Stopped {stopped} animation job(s)");
        }
        stopped
    }

    /// Handles of the running jobs, oldest first
    pub fn active_jobs(&self) -> Vec<JobHandle> {
        self.shared.lock().jobs.handles()
    }
}

async fn run_job(
    shared: Weak<DialogShared>,
    job: JobHandle,
    sequence: MessageSequence,
    start: Instant,
    cadence: Duration,
) {
    let mut ticker = tokio::time::interval_at(start, cadence);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;
        let Some(shared) = shared.upgrade() else {
            break;
        };
        if !apply_tick(&shared, job, &sequence) {
            break;
        }
    }
}

/// Advances the header by one step. Returns false once the job was stopped.
fn apply_tick(shared: &DialogShared, job: JobHandle, sequence: &MessageSequence) -> bool {
    let mut state = shared.lock();
    if !state.jobs.contains(job) {
        return false;
    }

    let DialogState {
        surface, session, ..
    } = &mut *state;
    let Some(session) = session.as_mut() else {
        return true;
    };
    let Some(current) = session.header.clone() else {
        tracing::trace!("{job} skipped: {} has no header", session.handle);
        return true;
    };

    let mut slot = HeaderSlot::new(current);
    sequence.step(&mut slot);
    if let Some(next) = slot.into_update() {
        if let Err(e) = surface.set_header(&next, true) {
            tracing::warn!("{job} failed to update header: {e}");
            return true;
        }
        session.header = Some(next);
        session.header_visible = true;
    }
    true
}
