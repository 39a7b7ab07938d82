mod commands;
mod webview;

use commands::{AppState, DesktopState};
use std::sync::Arc;
use tauri::Manager;
use webview::{TauriClipboard, WebviewEditor, WebviewShell};
use workflowgen::{
    editor_gate, logging, Collaborators, CommandClipboard, EditorPane, HttpBackend, Settings,
    Workbench,
};

// application entry point
fn main() {
    let settings = match Settings::load() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Failed to load settings, using defaults: {}", e);
            Settings::default()
        }
    };

    if let Err(e) = logging::init_logging(&settings.logging) {
        eprintln!("Failed to initialize logging: {}", e);
    }
    tracing::info!(backend = %settings.backend_url, "starting workflowgen");

    tauri::Builder::default()
        .setup(move |app| {
            let window = app.get_window("main").ok_or("main window missing")?;

            let (editor_signal, gate) = editor_gate();
            let editor = Arc::new(WebviewEditor::new(window.clone()));
            let shell = Arc::new(WebviewShell::new(window));
            let backend = Arc::new(HttpBackend::new(settings.backend_url.clone())?);

            let workbench = Workbench::new(
                &settings,
                Collaborators {
                    backend,
                    editor: Arc::new(EditorPane::new(editor.clone(), gate)),
                    status_view: shell.clone(),
                    controls: shell.clone(),
                    copy_button: shell.clone(),
                    alerts: shell,
                    clipboard: Arc::new(TauriClipboard::new(app.handle())),
                    fallback_clipboard: Arc::new(CommandClipboard::from_settings(
                        &settings.clipboard,
                    )),
                },
            );

            let state: AppState = Arc::new(DesktopState {
                workbench,
                editor,
                editor_signal,
            });
            app.manage(state.clone());

            // Free-tier hosts sleep when idle; start waking the backend right away.
            tauri::async_runtime::spawn(async move {
                state.workbench.ensure_ready().await;
            });

            Ok(())
        })
        .invoke_handler(tauri::generate_handler![
            commands::editor_ready,
            commands::editor_failed,
            commands::editor_changed,
            commands::generate_workflow,
            commands::copy_workflow,
            commands::ensure_backend,
            commands::session_state
        ])
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
