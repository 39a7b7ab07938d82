//! Prompt-to-workflow front end.
//!
//! A user describes an n8n workflow in plain language; the [`Workbench`]
//! waits for the remote generator to wake up, sends the prompt, and renders
//! either the returned workflow JSON or a diagnostic into the editor. The
//! editor, status line, buttons and clipboard are reached through traits so
//! the same logic drives the desktop webview and the tests.

pub mod app;
pub mod backend;
pub mod clipboard;
pub mod config;
pub mod controller;
pub mod diagnostics;
pub mod editor;
pub mod error;
pub mod logging;
pub mod readiness;
pub mod session;
pub mod status;
pub mod ui;

pub use app::{Collaborators, SessionSnapshot, Workbench};
pub use backend::{HttpBackend, WorkflowBackend};
pub use clipboard::{Clipboard, ClipboardExporter, CommandClipboard, CopyOutcome, CopyPath};
pub use config::Settings;
pub use controller::{Rejection, RequestController, SubmitOutcome};
pub use diagnostics::ErrorCategory;
pub use editor::{editor_gate, EditorGate, EditorPane, EditorSignal, EditorSurface, LanguageMode};
pub use error::{BackendError, ClipboardError, ConfigError, EditorError};
pub use readiness::ReadinessMonitor;
pub use session::Session;
pub use status::{Notice, StatusIndicator, StatusKind, StatusView};
pub use ui::{Alerts, ControlState, Controls, CopyButton};
