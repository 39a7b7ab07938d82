// Transient status notices shown above the editor

use chrono::{DateTime, Local};
use serde::Serialize;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusKind {
    Processing,
    Success,
    Error,
}

impl StatusKind {
    /// Success and error notices clear themselves; processing notices stay up.
    pub fn auto_hides(self) -> bool {
        matches!(self, StatusKind::Success | StatusKind::Error)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notice {
    pub message: String,
    pub kind: StatusKind,
    pub at: DateTime<Local>,
}

impl Notice {
    pub fn new(message: impl Into<String>, kind: StatusKind) -> Self {
        Self {
            message: message.into(),
            kind,
            at: Local::now(),
        }
    }
}

/// Where notices are rendered.
pub trait StatusView: Send + Sync {
    fn show(&self, notice: &Notice);
    fn hide(&self);
}

pub struct StatusIndicator {
    view: Arc<dyn StatusView>,
    clear_after: Duration,
    pending_hide: Mutex<Option<CancellationToken>>,
}

impl StatusIndicator {
    pub fn new(view: Arc<dyn StatusView>, clear_after: Duration) -> Self {
        Self {
            view,
            clear_after,
            pending_hide: Mutex::new(None),
        }
    }

    pub fn show(&self, message: impl Into<String>, kind: StatusKind) -> Notice {
        let notice = Notice::new(message, kind);
        match kind {
            StatusKind::Error => tracing::warn!(message = %notice.message, "status"),
            _ => tracing::info!(message = %notice.message, "status"),
        }

        let token = kind.auto_hides().then(CancellationToken::new);
        let previous = {
            let mut pending = self.pending_hide.lock().unwrap_or_else(PoisonError::into_inner);
            std::mem::replace(&mut *pending, token.clone())
        };
        if let Some(previous) = previous {
            previous.cancel();
        }

        self.view.show(&notice);

        if let Some(token) = token {
            self.schedule_hide(token);
        }
        notice
    }

    fn schedule_hide(&self, token: CancellationToken) {
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            tracing::debug!("no runtime, notice will stay until replaced");
            return;
        };
        let view = Arc::clone(&self.view);
        let delay = self.clear_after;
        runtime.spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {}
                _ = tokio::time::sleep(delay) => view.hide(),
            }
        });
    }
}
