// Wires the session, readiness monitor, controller and exporter together

use crate::backend::WorkflowBackend;
use crate::clipboard::{Clipboard, ClipboardExporter, CopyOutcome};
use crate::config::Settings;
use crate::controller::{RequestController, SubmitOutcome};
use crate::editor::EditorPane;
use crate::readiness::ReadinessMonitor;
use crate::session::Session;
use crate::status::{StatusIndicator, StatusView};
use crate::ui::{Alerts, Controls, CopyButton};
use serde::Serialize;
use std::sync::Arc;

/// Everything outside the crate the workbench talks to.
pub struct Collaborators {
    pub backend: Arc<dyn WorkflowBackend>,
    pub editor: Arc<EditorPane>,
    pub status_view: Arc<dyn StatusView>,
    pub controls: Arc<dyn Controls>,
    pub copy_button: Arc<dyn CopyButton>,
    pub alerts: Arc<dyn Alerts>,
    pub clipboard: Arc<dyn Clipboard>,
    pub fallback_clipboard: Arc<dyn Clipboard>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SessionSnapshot {
    pub in_progress: bool,
    pub backend_ready: bool,
}

pub struct Workbench {
    session: Arc<Session>,
    monitor: Arc<ReadinessMonitor>,
    controller: RequestController,
    exporter: ClipboardExporter,
}

impl Workbench {
    pub fn new(settings: &Settings, parts: Collaborators) -> Self {
        let session = Arc::new(Session::new());
        let status = Arc::new(StatusIndicator::new(
            parts.status_view,
            settings.ui.status_clear(),
        ));

        let monitor = Arc::new(ReadinessMonitor::new(
            Arc::clone(&parts.backend),
            Arc::clone(&session),
            Arc::clone(&status),
            settings.readiness.policy(),
        ));

        let controller = RequestController::new(
            Arc::clone(&session),
            parts.backend,
            Arc::clone(&monitor),
            Arc::clone(&parts.editor),
            parts.controls,
            Arc::clone(&status),
            settings.backend_url.clone(),
        );

        let exporter = ClipboardExporter::new(
            Arc::clone(&session),
            parts.editor,
            parts.clipboard,
            parts.fallback_clipboard,
            parts.copy_button,
            parts.alerts,
            status,
        )
        .with_feedback(settings.ui.copy_feedback());

        Self {
            session,
            monitor,
            controller,
            exporter,
        }
    }

    pub async fn submit(&self, prompt: &str) -> SubmitOutcome {
        self.controller.submit(prompt).await
    }

    pub async fn copy_current(&self) -> CopyOutcome {
        self.exporter.copy_current().await
    }

    pub async fn ensure_ready(&self) -> bool {
        self.monitor.ensure_ready().await
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            in_progress: self.session.request.in_progress(),
            backend_ready: self.session.backend.is_ready(),
        }
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }
}
