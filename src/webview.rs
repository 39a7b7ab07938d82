// Bridges the workbench views to the webview through Tauri events

use serde::Serialize;
use std::sync::{Mutex, PoisonError};
use tauri::{AppHandle, ClipboardManager, Manager, Window};
use workflowgen::ui::COPIED_LABEL;
use workflowgen::{
    Alerts, Clipboard, ClipboardError, ControlState, Controls, CopyButton, EditorError,
    EditorSurface, LanguageMode, Notice, StatusView,
};

const APP_TITLE: &str = "n8n Workflow Generator";

fn emit<S: Serialize + Clone>(window: &Window, event: &str, payload: S) -> tauri::Result<()> {
    window.emit(event, payload).map_err(|e| {
        tracing::warn!(event, error = %e, "failed to emit webview event");
        e
    })
}

#[derive(Clone, Serialize)]
struct ControlsPayload {
    busy: bool,
    backend_ready: bool,
    send_label: &'static str,
}

/// Status line, controls, copy button and alerts of the main window.
pub struct WebviewShell {
    window: Window,
}

impl WebviewShell {
    pub fn new(window: Window) -> Self {
        Self { window }
    }
}

impl StatusView for WebviewShell {
    fn show(&self, notice: &Notice) {
        let _ = emit(&self.window, "status://show", notice.clone());
    }

    fn hide(&self) {
        let _ = emit(&self.window, "status://hide", ());
    }
}

impl Controls for WebviewShell {
    fn apply(&self, state: ControlState) {
        let payload = ControlsPayload {
            busy: state.busy,
            backend_ready: state.backend_ready,
            send_label: state.send_label(),
        };
        let _ = emit(&self.window, "controls://state", payload);
    }
}

impl CopyButton for WebviewShell {
    fn show_copied(&self) {
        let _ = emit(&self.window, "copy-button://copied", COPIED_LABEL);
    }

    fn restore(&self) {
        let _ = emit(&self.window, "copy-button://restore", ());
    }
}

impl Alerts for WebviewShell {
    fn alert(&self, message: &str) {
        tauri::api::dialog::message(Some(&self.window), APP_TITLE, message);
    }
}

/// The Monaco editor in the webview. Its content is mirrored here: pushes
/// update the mirror before they are emitted, and the webview reports user
/// edits back through the `editor_changed` command.
pub struct WebviewEditor {
    window: Window,
    mirror: Mutex<String>,
}

impl WebviewEditor {
    pub fn new(window: Window) -> Self {
        Self {
            window,
            mirror: Mutex::new(String::new()),
        }
    }

    pub fn sync_from_webview(&self, text: String) {
        *self.mirror.lock().unwrap_or_else(PoisonError::into_inner) = text;
    }
}

impl EditorSurface for WebviewEditor {
    fn set_value(&self, text: &str) {
        self.sync_from_webview(text.to_string());
        let _ = emit(&self.window, "editor://set-value", text.to_string());
    }

    fn value(&self) -> String {
        self.mirror
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn set_read_only(&self, read_only: bool) {
        let _ = emit(&self.window, "editor://read-only", read_only);
    }

    fn set_language(&self, mode: LanguageMode) {
        let _ = emit(&self.window, "editor://language", mode.as_str());
    }

    fn format_document(&self) -> Result<(), EditorError> {
        emit(&self.window, "editor://format", ()).map_err(|e| EditorError::Action {
            action: "editor.action.formatDocument".to_string(),
            reason: e.to_string(),
        })
    }

    fn render_fallback(&self, text: &str) {
        self.sync_from_webview(text.to_string());
        let _ = emit(&self.window, "editor://fallback", text.to_string());
    }
}

/// Tauri's native clipboard.
pub struct TauriClipboard {
    app: AppHandle,
}

impl TauriClipboard {
    pub fn new(app: AppHandle) -> Self {
        Self { app }
    }
}

#[async_trait::async_trait]
impl Clipboard for TauriClipboard {
    async fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        let mut clipboard = self.app.clipboard_manager();
        clipboard
            .write_text(text.to_string())
            .map_err(|e| ClipboardError::Unavailable(e.to_string()))
    }
}
