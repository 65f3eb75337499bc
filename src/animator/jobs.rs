//! Registry of running message-cycling jobs.

use crate::surface::SurfaceHandle;
use std::fmt;
use tokio::task::AbortHandle;

/// Opaque identifier of a running animation job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct JobHandle(u64);

impl fmt::Display for JobHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "job-{}", self.0)
    }
}

#[derive(Debug)]
struct JobEntry {
    handle: JobHandle,
    /// Session the job was started against
    session: SurfaceHandle,
    task: AbortHandle,
}

/// Jobs in registration order. No de-duplication: starting a second job on
/// the same header registers a second entry.
#[derive(Debug, Default)]
pub(crate) struct JobRegistry {
    next_id: u64,
    entries: Vec<JobEntry>,
}

impl JobRegistry {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Reserves the handle of the next job
    pub(crate) fn allocate(&mut self) -> JobHandle {
        self.next_id += 1;
        JobHandle(self.next_id)
    }

    pub(crate) fn insert(&mut self, handle: JobHandle, session: SurfaceHandle, task: AbortHandle) {
        self.entries.push(JobEntry {
            handle,
            session,
            task,
        });
    }

    pub(crate) fn contains(&self, handle: JobHandle) -> bool {
        self.entries.iter().any(|entry| entry.handle == handle)
    }

    /// Cancels `handle`, or the most recently registered job when `None`.
    /// Returns the cancelled handle, if any.
    pub(crate) fn cancel(&mut self, handle: Option<JobHandle>) -> Option<JobHandle> {
        let index = match handle {
            Some(handle) => self.entries.iter().position(|entry| entry.handle == handle)?,
            None => self.entries.len().checked_sub(1)?,
        };
        let entry = self.entries.remove(index);
        entry.task.abort();
        Some(entry.handle)
    }

    /// Cancels every job started against `session`
    pub(crate) fn cancel_session(&mut self, session: SurfaceHandle) -> usize {
        let before = self.entries.len();
        self.entries.retain(|entry| {
            if entry.session == session {
                entry.task.abort();
                false
            } else {
                true
            }
        });
        before - self.entries.len()
    }

    pub(crate) fn cancel_all(&mut self) -> usize {
        let count = self.entries.len();
        for entry in self.entries.drain(..) {
            entry.task.abort();
        }
        count
    }

    pub(crate) fn handles(&self) -> Vec<JobHandle> {
        self.entries.iter().map(|entry| entry.handle).collect()
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}
