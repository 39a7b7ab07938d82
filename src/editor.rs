//! The embedded code editor and its one-shot readiness gate.
//!
//! The widget itself lives outside the crate. [`EditorSurface`] is the slice
//! of its API the workbench needs, and [`EditorPane`] adds the readiness
//! wait and the plain-text fallback used when the widget never came up.

use crate::error::EditorError;
use futures_util::future::{FutureExt, Shared};
use serde::Serialize;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::sync::oneshot;

/// Upper bound on how long rendering waits for the widget to report in.
pub const EDITOR_WAIT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LanguageMode {
    #[serde(rename = "json")]
    Json,
    #[serde(rename = "plaintext")]
    PlainText,
}

impl LanguageMode {
    pub fn as_str(self) -> &'static str {
        match self {
            LanguageMode::Json => "json",
            LanguageMode::PlainText => "plaintext",
        }
    }
}

pub trait EditorSurface: Send + Sync {
    fn set_value(&self, text: &str);
    fn value(&self) -> String;
    fn set_read_only(&self, read_only: bool);
    fn set_language(&self, mode: LanguageMode);
    fn format_document(&self) -> Result<(), EditorError>;
    /// Show `text` without the widget, e.g. in a bare `<pre>` block.
    fn render_fallback(&self, text: &str);
}

type Readiness = Result<(), EditorError>;

/// Resolves the [`EditorGate`] it was created with. Only the first call wins.
#[derive(Debug)]
pub struct EditorSignal {
    tx: Mutex<Option<oneshot::Sender<Readiness>>>,
}

impl EditorSignal {
    pub fn ready(&self) -> bool {
        self.resolve(Ok(()))
    }

    pub fn failed(&self, reason: impl Into<String>) -> bool {
        self.resolve(Err(EditorError::InitFailed(reason.into())))
    }

    fn resolve(&self, readiness: Readiness) -> bool {
        let tx = self.tx.lock().unwrap_or_else(PoisonError::into_inner).take();
        match tx {
            Some(tx) => {
                match &readiness {
                    Ok(()) => tracing::info!("editor ready"),
                    Err(err) => tracing::warn!(%err, "editor unavailable"),
                }
                let _ = tx.send(readiness);
                true
            }
            None => {
                tracing::debug!("editor readiness already resolved");
                false
            }
        }
    }
}

/// Shared view of the editor's one-shot readiness.
#[derive(Clone)]
pub struct EditorGate {
    inner: Shared<oneshot::Receiver<Readiness>>,
}

pub fn editor_gate() -> (EditorSignal, EditorGate) {
    let (tx, rx) = oneshot::channel();
    (
        EditorSignal {
            tx: Mutex::new(Some(tx)),
        },
        EditorGate { inner: rx.shared() },
    )
}

impl EditorGate {
    pub async fn wait(&self) -> Readiness {
        flatten(self.inner.clone().await)
    }

    /// The outcome if it is already known, without waiting.
    pub fn peek(&self) -> Option<Readiness> {
        self.inner.clone().now_or_never().map(flatten)
    }
}

fn flatten(received: Result<Readiness, oneshot::error::RecvError>) -> Readiness {
    received.unwrap_or_else(|_| {
        Err(EditorError::InitFailed(
            "editor was torn down before it loaded".to_string(),
        ))
    })
}

pub struct EditorPane {
    surface: Arc<dyn EditorSurface>,
    gate: EditorGate,
    wait_limit: Duration,
}

impl EditorPane {
    pub fn new(surface: Arc<dyn EditorSurface>, gate: EditorGate) -> Self {
        Self {
            surface,
            gate,
            wait_limit: EDITOR_WAIT,
        }
    }

    pub fn with_wait_limit(mut self, wait_limit: Duration) -> Self {
        self.wait_limit = wait_limit;
        self
    }

    async fn available(&self) -> bool {
        match tokio::time::timeout(self.wait_limit, self.gate.wait()).await {
            Ok(Ok(())) => true,
            Ok(Err(_)) => false,
            Err(_) => {
                tracing::warn!(limit = ?self.wait_limit, "editor did not report readiness");
                false
            }
        }
    }

    /// Replace the content, leaving the language mode alone.
    pub async fn show_placeholder(&self, text: &str) {
        if self.available().await {
            self.surface.set_value(text);
        } else {
            self.surface.render_fallback(text);
        }
    }

    /// Show a JSON document and ask the widget to format it.
    pub async fn show_document(&self, text: &str) {
        if !self.available().await {
            self.surface.render_fallback(text);
            return;
        }
        self.surface.set_value(text);
        self.surface.set_language(LanguageMode::Json);
        if let Err(err) = self.surface.format_document() {
            tracing::warn!(%err, "format document failed");
        }
    }

    pub async fn show_diagnostic(&self, text: &str) {
        if self.available().await {
            self.surface.set_value(text);
            self.surface.set_language(LanguageMode::PlainText);
        } else {
            self.surface.render_fallback(text);
        }
    }

    pub fn set_read_only(&self, read_only: bool) {
        if matches!(self.gate.peek(), Some(Ok(()))) {
            self.surface.set_read_only(read_only);
        }
    }

    /// Current widget content; an error if the widget is not (yet) usable.
    pub fn current_text(&self) -> Result<String, EditorError> {
        match self.gate.peek() {
            Some(Ok(())) => Ok(self.surface.value()),
            Some(Err(err)) => Err(err),
            None => Err(EditorError::InitFailed("editor is still loading".to_string())),
        }
    }
}
