// Runs one workflow generation request at a time and renders the result

use crate::backend::WorkflowBackend;
use crate::diagnostics::{self, ErrorCategory};
use crate::editor::EditorPane;
use crate::error::BackendError;
use crate::readiness::ReadinessMonitor;
use crate::session::{BackendState, InFlight, Session};
use crate::status::{StatusIndicator, StatusKind};
use crate::ui::{ControlState, Controls};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

pub const EMPTY_PROMPT_NOTICE: &str = "Please enter a workflow description first!";
pub const BUSY_NOTICE: &str = "Request already in progress...";
pub const UNAVAILABLE_NOTICE: &str =
    "Workflow server is unavailable right now. Please try again later.";
pub const GENERATING_NOTICE: &str = "Generating workflow...";
pub const SUCCESS_NOTICE: &str = "Workflow generated successfully!";
pub const FAILURE_NOTICE: &str = "Error occurred";

pub const GENERATING_PLACEHOLDER: &str = "⏳ Generating n8n workflow, please wait...

• Analyzing your requirements
• Planning the workflow
• Generating production-ready code

This may take 30-60 seconds...";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Rejection {
    EmptyPrompt,
    Busy,
    BackendUnavailable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "detail", rename_all = "snake_case")]
pub enum SubmitOutcome {
    Generated,
    Failed(ErrorCategory),
    Rejected(Rejection),
}

pub struct RequestController {
    session: Arc<Session>,
    backend: Arc<dyn WorkflowBackend>,
    monitor: Arc<ReadinessMonitor>,
    editor: Arc<EditorPane>,
    controls: Arc<dyn Controls>,
    status: Arc<StatusIndicator>,
    backend_url: String,
}

impl RequestController {
    pub fn new(
        session: Arc<Session>,
        backend: Arc<dyn WorkflowBackend>,
        monitor: Arc<ReadinessMonitor>,
        editor: Arc<EditorPane>,
        controls: Arc<dyn Controls>,
        status: Arc<StatusIndicator>,
        backend_url: impl Into<String>,
    ) -> Self {
        Self {
            session,
            backend,
            monitor,
            editor,
            controls,
            status,
            backend_url: backend_url.into(),
        }
    }

    pub async fn submit(&self, prompt: &str) -> SubmitOutcome {
        let prompt = prompt.trim();
        if prompt.is_empty() {
            self.status.show(EMPTY_PROMPT_NOTICE, StatusKind::Error);
            return SubmitOutcome::Rejected(Rejection::EmptyPrompt);
        }

        // The slot is claimed before the readiness wait so a second submit
        // cannot start its own poll or slip in behind this one.
        let Some(in_flight) = self.session.request.try_begin() else {
            self.status.show(BUSY_NOTICE, StatusKind::Error);
            return SubmitOutcome::Rejected(Rejection::Busy);
        };

        if !self.session.backend.is_ready() && !self.monitor.ensure_ready().await {
            self.status.show(UNAVAILABLE_NOTICE, StatusKind::Error);
            return SubmitOutcome::Rejected(Rejection::BackendUnavailable);
        }

        let _busy = BusyControls::engage(
            in_flight,
            &*self.controls,
            &self.editor,
            &self.session.backend,
        );
        self.status.show(GENERATING_NOTICE, StatusKind::Processing);
        self.editor.show_placeholder(GENERATING_PLACEHOLDER).await;

        tracing::info!(prompt_chars = prompt.chars().count(), "requesting workflow");
        let result = self
            .backend
            .generate(prompt)
            .await
            .and_then(|workflow| pretty(&workflow));

        match result {
            Ok(document) => {
                tracing::info!(bytes = document.len(), "workflow generated");
                self.editor.show_document(&document).await;
                self.status.show(SUCCESS_NOTICE, StatusKind::Success);
                SubmitOutcome::Generated
            }
            Err(err) => {
                let diagnostic = diagnostics::diagnose(&err, &self.backend_url);
                tracing::error!(%err, category = ?diagnostic.category, "workflow generation failed");
                self.editor.show_diagnostic(&diagnostic.text).await;
                self.status.show(FAILURE_NOTICE, StatusKind::Error);
                SubmitOutcome::Failed(diagnostic.category)
            }
        }
    }
}

fn pretty(workflow: &Value) -> Result<String, BackendError> {
    serde_json::to_string_pretty(workflow).map_err(|e| BackendError::Decode(e.to_string()))
}

/// Disables the inputs and locks the editor until dropped. Owns the
/// in-flight slot and releases it before the inputs come back.
struct BusyControls<'a> {
    slot: Option<InFlight<'a>>,
    controls: &'a dyn Controls,
    editor: &'a EditorPane,
    backend: &'a BackendState,
}

impl<'a> BusyControls<'a> {
    fn engage(
        slot: InFlight<'a>,
        controls: &'a dyn Controls,
        editor: &'a EditorPane,
        backend: &'a BackendState,
    ) -> Self {
        controls.apply(ControlState {
            busy: true,
            backend_ready: backend.is_ready(),
        });
        editor.set_read_only(true);
        Self {
            slot: Some(slot),
            controls,
            editor,
            backend,
        }
    }
}

impl Drop for BusyControls<'_> {
    fn drop(&mut self) {
        drop(self.slot.take());
        self.editor.set_read_only(false);
        self.controls.apply(ControlState {
            busy: false,
            backend_ready: self.backend.is_ready(),
        });
    }
}
