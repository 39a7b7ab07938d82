#![allow(dead_code)]

use async_trait::async_trait;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, OnceLock};
use std::time::Duration;
use tokio::sync::Notify;
use workflowgen::backend::PingResponse;
use workflowgen::{
    editor_gate, Alerts, BackendError, Clipboard, ClipboardError, Collaborators, ControlState,
    Controls, CopyButton, EditorError, EditorPane, EditorSignal, EditorSurface, LanguageMode,
    Notice, Session, Settings, StatusView, Workbench, WorkflowBackend,
};

#[derive(Debug, Clone)]
pub enum Ping {
    Ready,
    NotReady,
    Fail,
    Hang(Duration),
}

pub struct FakeBackend {
    pings: Mutex<VecDeque<Ping>>,
    after_script: Ping,
    generation: Mutex<Result<Value, BackendError>>,
    hold_generation: Mutex<Option<Arc<Notify>>>,
    pub ping_calls: AtomicUsize,
    pub generate_calls: AtomicUsize,
    pub prompts: Mutex<Vec<String>>,
}

impl FakeBackend {
    pub fn new(script: Vec<Ping>, after_script: Ping) -> Self {
        Self {
            pings: Mutex::new(script.into()),
            after_script,
            generation: Mutex::new(Ok(serde_json::json!({ "nodes": [], "connections": {} }))),
            hold_generation: Mutex::new(None),
            ping_calls: AtomicUsize::new(0),
            generate_calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn ready() -> Self {
        Self::new(Vec::new(), Ping::Ready)
    }

    pub fn never_ready() -> Self {
        Self::new(Vec::new(), Ping::NotReady)
    }

    pub fn respond_with(&self, result: Result<Value, BackendError>) {
        *self.generation.lock().unwrap() = result;
    }

    /// Block generation calls until the returned handle is notified.
    pub fn hold(&self) -> Arc<Notify> {
        let notify = Arc::new(Notify::new());
        *self.hold_generation.lock().unwrap() = Some(notify.clone());
        notify
    }

    pub fn pings(&self) -> usize {
        self.ping_calls.load(Ordering::SeqCst)
    }

    pub fn generations(&self) -> usize {
        self.generate_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl WorkflowBackend for FakeBackend {
    async fn ping(&self) -> Result<PingResponse, BackendError> {
        self.ping_calls.fetch_add(1, Ordering::SeqCst);
        let next = self
            .pings
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| self.after_script.clone());
        match next {
            Ping::Ready => Ok(PingResponse {
                status: "ready".to_string(),
            }),
            Ping::NotReady => Ok(PingResponse {
                status: "starting".to_string(),
            }),
            Ping::Fail => Err(BackendError::Network("connection refused".to_string())),
            Ping::Hang(duration) => {
                tokio::time::sleep(duration).await;
                Ok(PingResponse {
                    status: "ready".to_string(),
                })
            }
        }
    }

    async fn generate(&self, prompt: &str) -> Result<Value, BackendError> {
        self.generate_calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(prompt.to_string());
        let hold = self.hold_generation.lock().unwrap().clone();
        if let Some(hold) = hold {
            hold.notified().await;
        }
        self.generation.lock().unwrap().clone()
    }
}

#[derive(Default)]
pub struct FakeEditor {
    pub value: Mutex<String>,
    pub languages: Mutex<Vec<LanguageMode>>,
    pub read_only: Mutex<Vec<bool>>,
    pub formats: AtomicUsize,
    pub fallback: Mutex<Vec<String>>,
}

impl FakeEditor {
    pub fn text(&self) -> String {
        self.value.lock().unwrap().clone()
    }

    pub fn last_language(&self) -> Option<LanguageMode> {
        self.languages.lock().unwrap().last().copied()
    }
}

impl EditorSurface for FakeEditor {
    fn set_value(&self, text: &str) {
        *self.value.lock().unwrap() = text.to_string();
    }

    fn value(&self) -> String {
        self.text()
    }

    fn set_read_only(&self, read_only: bool) {
        self.read_only.lock().unwrap().push(read_only);
    }

    fn set_language(&self, mode: LanguageMode) {
        self.languages.lock().unwrap().push(mode);
    }

    fn format_document(&self) -> Result<(), EditorError> {
        self.formats.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn render_fallback(&self, text: &str) {
        self.fallback.lock().unwrap().push(text.to_string());
    }
}

#[derive(Default)]
pub struct RecordingShell {
    pub notices: Mutex<Vec<Notice>>,
    pub hides: AtomicUsize,
    pub controls: Mutex<Vec<ControlState>>,
    /// Whether the in-flight slot was held at each `Controls::apply`.
    pub slot_held: Mutex<Vec<bool>>,
    pub session: OnceLock<Arc<Session>>,
    pub copied: AtomicUsize,
    pub restored: AtomicUsize,
    pub alerts: Mutex<Vec<String>>,
}

impl RecordingShell {
    pub fn messages(&self) -> Vec<String> {
        self.notices
            .lock()
            .unwrap()
            .iter()
            .map(|n| n.message.clone())
            .collect()
    }

    pub fn last_message(&self) -> Option<String> {
        self.messages().last().cloned()
    }

    pub fn alerts(&self) -> Vec<String> {
        self.alerts.lock().unwrap().clone()
    }

    pub fn control_states(&self) -> Vec<ControlState> {
        self.controls.lock().unwrap().clone()
    }
}

impl StatusView for RecordingShell {
    fn show(&self, notice: &Notice) {
        self.notices.lock().unwrap().push(notice.clone());
    }

    fn hide(&self) {
        self.hides.fetch_add(1, Ordering::SeqCst);
    }
}

impl Controls for RecordingShell {
    fn apply(&self, state: ControlState) {
        if let Some(session) = self.session.get() {
            self.slot_held
                .lock()
                .unwrap()
                .push(session.request.in_progress());
        }
        self.controls.lock().unwrap().push(state);
    }
}

impl CopyButton for RecordingShell {
    fn show_copied(&self) {
        self.copied.fetch_add(1, Ordering::SeqCst);
    }

    fn restore(&self) {
        self.restored.fetch_add(1, Ordering::SeqCst);
    }
}

impl Alerts for RecordingShell {
    fn alert(&self, message: &str) {
        self.alerts.lock().unwrap().push(message.to_string());
    }
}

#[derive(Default)]
pub struct FakeClipboard {
    pub writes: Mutex<Vec<String>>,
    pub broken: bool,
}

impl FakeClipboard {
    pub fn broken() -> Self {
        Self {
            writes: Mutex::new(Vec::new()),
            broken: true,
        }
    }

    pub fn writes(&self) -> Vec<String> {
        self.writes.lock().unwrap().clone()
    }
}

#[async_trait]
impl Clipboard for FakeClipboard {
    async fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        if self.broken {
            return Err(ClipboardError::Unavailable("permission denied".to_string()));
        }
        self.writes.lock().unwrap().push(text.to_string());
        Ok(())
    }
}

pub struct Harness {
    pub workbench: Workbench,
    pub backend: Arc<FakeBackend>,
    pub editor: Arc<FakeEditor>,
    pub shell: Arc<RecordingShell>,
    pub clipboard: Arc<FakeClipboard>,
    pub fallback_clipboard: Arc<FakeClipboard>,
    pub editor_signal: EditorSignal,
}

pub struct HarnessBuilder {
    settings: Settings,
    backend: FakeBackend,
    clipboard: FakeClipboard,
    fallback_clipboard: FakeClipboard,
    editor_ready: bool,
}

impl HarnessBuilder {
    pub fn new(backend: FakeBackend) -> Self {
        Self {
            settings: Settings::default(),
            backend,
            clipboard: FakeClipboard::default(),
            fallback_clipboard: FakeClipboard::default(),
            editor_ready: true,
        }
    }

    pub fn max_retries(mut self, retries: u32) -> Self {
        self.settings.readiness.max_retries = retries;
        self
    }

    pub fn clipboards(mut self, primary: FakeClipboard, fallback: FakeClipboard) -> Self {
        self.clipboard = primary;
        self.fallback_clipboard = fallback;
        self
    }

    /// Leave the editor gate unresolved.
    pub fn editor_pending(mut self) -> Self {
        self.editor_ready = false;
        self
    }

    pub fn build(self) -> Harness {
        let backend = Arc::new(self.backend);
        let editor = Arc::new(FakeEditor::default());
        let shell = Arc::new(RecordingShell::default());
        let clipboard = Arc::new(self.clipboard);
        let fallback_clipboard = Arc::new(self.fallback_clipboard);

        let (editor_signal, gate) = editor_gate();
        if self.editor_ready {
            editor_signal.ready();
        }

        let workbench = Workbench::new(
            &self.settings,
            Collaborators {
                backend: backend.clone(),
                editor: Arc::new(EditorPane::new(editor.clone(), gate)),
                status_view: shell.clone(),
                controls: shell.clone(),
                copy_button: shell.clone(),
                alerts: shell.clone(),
                clipboard: clipboard.clone(),
                fallback_clipboard: fallback_clipboard.clone(),
            },
        );
        let _ = shell.session.set(Arc::clone(workbench.session()));

        Harness {
            workbench,
            backend,
            editor,
            shell,
            clipboard,
            fallback_clipboard,
            editor_signal,
        }
    }
}

/// Let spawned tasks run after the clock moved.
pub async fn settle() {
    for _ in 0..5 {
        tokio::task::yield_now().await;
    }
}
