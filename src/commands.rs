// Handles Tauri command definitions

use crate::webview::WebviewEditor;
use std::sync::Arc;
use tauri::{command, State};
use workflowgen::{CopyOutcome, EditorSignal, SessionSnapshot, SubmitOutcome, Workbench};

pub struct DesktopState {
    pub workbench: Workbench,
    pub editor: Arc<WebviewEditor>,
    pub editor_signal: EditorSignal,
}

pub type AppState = Arc<DesktopState>;

// The webview finished creating the editor
#[command]
pub async fn editor_ready(initial_value: String, state: State<'_, AppState>) -> Result<(), String> {
    state.editor.sync_from_webview(initial_value);
    state.editor_signal.ready();
    Ok(())
}

// The editor bundle failed to load
#[command]
pub async fn editor_failed(reason: String, state: State<'_, AppState>) -> Result<(), String> {
    state.editor_signal.failed(reason);
    Ok(())
}

#[command]
pub async fn editor_changed(value: String, state: State<'_, AppState>) -> Result<(), String> {
    state.editor.sync_from_webview(value);
    Ok(())
}

#[command]
pub async fn generate_workflow(
    prompt: String,
    state: State<'_, AppState>,
) -> Result<SubmitOutcome, String> {
    Ok(state.workbench.submit(&prompt).await)
}

#[command]
pub async fn copy_workflow(state: State<'_, AppState>) -> Result<CopyOutcome, String> {
    Ok(state.workbench.copy_current().await)
}

#[command]
pub async fn ensure_backend(state: State<'_, AppState>) -> Result<bool, String> {
    Ok(state.workbench.ensure_ready().await)
}

#[command]
pub async fn session_state(state: State<'_, AppState>) -> Result<SessionSnapshot, String> {
    Ok(state.workbench.snapshot())
}
