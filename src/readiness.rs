// Polls the backend's health endpoint until it reports ready

use crate::backend::WorkflowBackend;
use crate::config::RetryPolicy;
use crate::error::BackendError;
use crate::session::Session;
use crate::status::{StatusIndicator, StatusKind};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;

pub const CONNECTING_NOTICE: &str = "Connecting to the workflow server...";
pub const READY_NOTICE: &str = "Workflow server is ready";
pub const TIMED_OUT_NOTICE: &str =
    "The workflow server did not become ready in time. Please try again later.";

pub struct ReadinessMonitor {
    backend: Arc<dyn WorkflowBackend>,
    session: Arc<Session>,
    status: Arc<StatusIndicator>,
    policy: RetryPolicy,
    // Held for the whole poll so concurrent callers share one loop.
    polling: Mutex<()>,
    // Bumped each time a poll settles, ready or not.
    settled: AtomicU64,
}

impl ReadinessMonitor {
    pub fn new(
        backend: Arc<dyn WorkflowBackend>,
        session: Arc<Session>,
        status: Arc<StatusIndicator>,
        policy: RetryPolicy,
    ) -> Self {
        Self {
            backend,
            session,
            status,
            policy,
            polling: Mutex::new(()),
            settled: AtomicU64::new(0),
        }
    }

    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    /// Returns true once the backend has answered a probe with the ready
    /// sentinel. False means the retry budget ran out.
    ///
    /// Callers that queue up behind a running poll take its result instead
    /// of starting another one.
    pub async fn ensure_ready(&self) -> bool {
        if self.session.backend.is_ready() {
            return true;
        }

        let seen = self.settled.load(Ordering::Acquire);
        let _polling = self.polling.lock().await;
        if self.settled.load(Ordering::Acquire) != seen {
            return self.session.backend.is_ready();
        }

        let ready = self.poll().await;
        self.settled.fetch_add(1, Ordering::Release);
        ready
    }

    async fn poll(&self) -> bool {
        if self.session.backend.is_ready() {
            return true;
        }

        self.status.show(CONNECTING_NOTICE, StatusKind::Processing);
        match self.probe().await {
            Ok(()) => return self.mark_ready(0),
            Err(err) => tracing::info!(%err, "backend not ready yet, polling"),
        }

        if self.policy.max_retries > 0 {
            self.status.show(self.waiting_notice(), StatusKind::Processing);
        }
        for attempt in 1..=self.policy.max_retries {
            tokio::time::sleep(self.policy.interval).await;
            match self.probe().await {
                Ok(()) => return self.mark_ready(attempt),
                Err(err) => tracing::debug!(attempt, %err, "readiness probe failed"),
            }
        }

        tracing::warn!(
            retries = self.policy.max_retries,
            "backend did not become ready"
        );
        self.status.show(TIMED_OUT_NOTICE, StatusKind::Error);
        false
    }

    async fn probe(&self) -> Result<(), BackendError> {
        let ping = tokio::time::timeout(self.policy.probe_timeout, self.backend.ping())
            .await
            .map_err(|_| BackendError::Timeout(self.policy.probe_timeout))??;

        if ping.is_ready() {
            Ok(())
        } else {
            Err(BackendError::NotReady(ping.status))
        }
    }

    fn mark_ready(&self, retries: u32) -> bool {
        self.session.backend.mark_ready();
        tracing::info!(retries, "backend ready");
        self.status.show(READY_NOTICE, StatusKind::Success);
        true
    }

    fn waiting_notice(&self) -> String {
        let ceiling = self.policy.interval * self.policy.max_retries;
        let ceiling = if ceiling.as_secs() >= 120 && ceiling.as_secs() % 60 == 0 {
            format!("{} minutes", ceiling.as_secs() / 60)
        } else {
            format!("{} seconds", ceiling.as_secs())
        };
        format!("Waking up the workflow server, this can take up to {}...", ceiling)
    }
}
