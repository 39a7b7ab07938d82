// Manages request and backend state for one workbench session

use std::sync::atomic::{AtomicBool, Ordering};

/// Tracks whether a generation request is in flight.
#[derive(Debug, Default)]
pub struct RequestState {
    in_progress: AtomicBool,
}

impl RequestState {
    pub fn in_progress(&self) -> bool {
        self.in_progress.load(Ordering::Acquire)
    }

    /// Claim the single in-flight slot. Returns `None` while another request
    /// holds it; the slot is released when the returned guard drops.
    pub fn try_begin(&self) -> Option<InFlight<'_>> {
        self.in_progress
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| InFlight { state: self })
    }
}

/// Holds the in-flight slot of a [`RequestState`].
#[derive(Debug)]
pub struct InFlight<'a> {
    state: &'a RequestState,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.state.in_progress.store(false, Ordering::Release);
    }
}

/// Whether the backend has answered a readiness probe. Once set it stays set.
#[derive(Debug, Default)]
pub struct BackendState {
    ready: AtomicBool,
}

impl BackendState {
    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }

    pub(crate) fn mark_ready(&self) {
        self.ready.store(true, Ordering::Release);
    }
}

#[derive(Debug, Default)]
pub struct Session {
    pub request: RequestState,
    pub backend: BackendState,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }
}
