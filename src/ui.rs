// Views the workbench drives besides the editor and the status line

use serde::Serialize;

pub const SEND_LABEL: &str = "Send";
pub const GENERATING_LABEL: &str = "Generating...";
pub const COPIED_LABEL: &str = "✓ Copied!";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ControlState {
    /// A generation request is in flight: send button, prompt input and copy
    /// button are disabled.
    pub busy: bool,
    pub backend_ready: bool,
}

impl ControlState {
    pub fn send_label(&self) -> &'static str {
        if self.busy {
            GENERATING_LABEL
        } else {
            SEND_LABEL
        }
    }
}

pub trait Controls: Send + Sync {
    fn apply(&self, state: ControlState);
}

pub trait CopyButton: Send + Sync {
    fn show_copied(&self);
    fn restore(&self);
}

/// Blocking, user-acknowledged messages.
pub trait Alerts: Send + Sync {
    fn alert(&self, message: &str);
}
