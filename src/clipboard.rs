// Validates the editor content and copies it to the system clipboard

use crate::config::ClipboardSettings;
use crate::editor::EditorPane;
use crate::error::ClipboardError;
use crate::session::Session;
use crate::status::{StatusIndicator, StatusKind};
use crate::ui::{Alerts, CopyButton};
use async_trait::async_trait;
use serde::Serialize;
use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

pub const INVALID_JSON_ALERT: &str =
    "The content is not valid JSON. Please generate a valid workflow first.";
pub const COPY_FAILED_ALERT: &str =
    "Failed to copy to clipboard. Please select and copy manually.";
pub const EDITOR_UNAVAILABLE_ALERT: &str =
    "The editor is not available, there is nothing to copy yet.";
pub const BUSY_NOTICE: &str = "Please wait for the current generation to finish.";

#[async_trait]
pub trait Clipboard: Send + Sync {
    async fn write_text(&self, text: &str) -> Result<(), ClipboardError>;
}

/// Copies by piping the text into an external program such as `pbcopy`.
///
/// Each write spawns the program, feeds it, and waits for it to exit. The
/// child is killed if the write is abandoned half way. Its output is
/// discarded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandClipboard {
    program: String,
    args: Vec<String>,
}

impl CommandClipboard {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    pub fn from_settings(settings: &ClipboardSettings) -> Self {
        match settings.fallback_command.as_deref() {
            Some([program, args @ ..]) => Self::new(program.clone(), args.to_vec()),
            _ => Self::platform_default(),
        }
    }

    pub fn platform_default() -> Self {
        if cfg!(target_os = "macos") {
            Self::new("pbcopy", Vec::new())
        } else if cfg!(target_os = "windows") {
            Self::new("clip", Vec::new())
        } else if std::env::var_os("WAYLAND_DISPLAY").is_some() {
            Self::new("wl-copy", Vec::new())
        } else {
            Self::new(
                "xclip",
                vec!["-selection".to_string(), "clipboard".to_string()],
            )
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    fn command_error(&self, reason: impl Into<String>) -> ClipboardError {
        ClipboardError::Command {
            command: self.program.clone(),
            reason: reason.into(),
        }
    }
}

#[async_trait]
impl Clipboard for CommandClipboard {
    async fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| self.command_error(e.to_string()))?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| self.command_error("failed to capture stdin"))?;
        stdin.write_all(text.as_bytes()).await?;
        stdin.shutdown().await?;
        drop(stdin);

        // Tools like xclip leave a child behind to serve the selection, so
        // only the exit of the direct child is awaited.
        let status = child.wait().await?;
        if status.success() {
            Ok(())
        } else {
            Err(self.command_error(status.to_string()))
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CopyPath {
    Primary,
    Fallback,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "path", rename_all = "snake_case")]
pub enum CopyOutcome {
    Copied(CopyPath),
    InvalidJson,
    EditorUnavailable,
    Busy,
    Failed,
}

pub struct ClipboardExporter {
    session: Arc<Session>,
    editor: Arc<EditorPane>,
    primary: Arc<dyn Clipboard>,
    fallback: Arc<dyn Clipboard>,
    button: Arc<dyn CopyButton>,
    alerts: Arc<dyn Alerts>,
    status: Arc<StatusIndicator>,
    feedback: Duration,
}

impl ClipboardExporter {
    /// `primary` is tried first; `fallback` only when it fails.
    pub fn new(
        session: Arc<Session>,
        editor: Arc<EditorPane>,
        primary: Arc<dyn Clipboard>,
        fallback: Arc<dyn Clipboard>,
        button: Arc<dyn CopyButton>,
        alerts: Arc<dyn Alerts>,
        status: Arc<StatusIndicator>,
    ) -> Self {
        Self {
            session,
            editor,
            primary,
            fallback,
            button,
            alerts,
            status,
            feedback: Duration::from_secs(2),
        }
    }

    /// How long the copy button keeps its confirmation label.
    pub fn with_feedback(mut self, feedback: Duration) -> Self {
        self.feedback = feedback;
        self
    }

    pub async fn copy_current(&self) -> CopyOutcome {
        if self.session.request.in_progress() {
            self.status.show(BUSY_NOTICE, StatusKind::Error);
            return CopyOutcome::Busy;
        }

        let content = match self.editor.current_text() {
            Ok(content) => content,
            Err(err) => {
                tracing::warn!(%err, "copy requested without a usable editor");
                self.alerts.alert(EDITOR_UNAVAILABLE_ALERT);
                return CopyOutcome::EditorUnavailable;
            }
        };

        if let Err(err) = serde_json::from_str::<serde_json::Value>(&content) {
            tracing::debug!(%err, "editor content is not JSON");
            self.alerts.alert(INVALID_JSON_ALERT);
            return CopyOutcome::InvalidJson;
        }

        let path = match self.primary.write_text(&content).await {
            Ok(()) => CopyPath::Primary,
            Err(err) => {
                tracing::warn!(%err, "clipboard write failed, trying fallback");
                match self.fallback.write_text(&content).await {
                    Ok(()) => CopyPath::Fallback,
                    Err(err) => {
                        tracing::error!(%err, "fallback copy failed");
                        self.alerts.alert(COPY_FAILED_ALERT);
                        return CopyOutcome::Failed;
                    }
                }
            }
        };

        tracing::info!(?path, bytes = content.len(), "workflow copied");
        self.confirm();
        CopyOutcome::Copied(path)
    }

    fn confirm(&self) {
        self.button.show_copied();
        let button = Arc::clone(&self.button);
        let feedback = self.feedback;
        tokio::spawn(async move {
            tokio::time::sleep(feedback).await;
            button.restore();
        });
    }
}
