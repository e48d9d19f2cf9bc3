//! Failure surfacing - modal dialog, log event, or nothing.

use crate::error::RegistryError;
use tracing::error;

pub const DIALOG_TITLE: &str = "error";

/// How the wrapper facade surfaces a failed operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Reporter {
    /// Blocking error dialog with the failure summary.
    #[default]
    Dialog,
    /// `tracing` error event with full details.
    Log,
    Silent,
}

impl Reporter {
    pub fn report(&self, err: &RegistryError) {
        match self {
            Reporter::Dialog => show_error_dialog(&err.summary()),
            Reporter::Log => error!(api = err.api(), "{err}"),
            Reporter::Silent => {}
        }
    }
}

/// Show a modal error dialog and block until it is dismissed.
#[cfg(windows)]
pub fn show_error_dialog(message: &str) {
    use windows::core::PCWSTR;
    use windows::Win32::UI::WindowsAndMessaging::{MessageBoxW, MB_ICONERROR, MB_OK};

    let msg_wide: Vec<u16> = message.encode_utf16().chain(Some(0)).collect();
    let title_wide: Vec<u16> = DIALOG_TITLE.encode_utf16().chain(Some(0)).collect();

    // SAFETY: both buffers are NUL-terminated and outlive the call.
    // No owner window.
    unsafe {
        let _ = MessageBoxW(
            None,
            PCWSTR(msg_wide.as_ptr()),
            PCWSTR(title_wide.as_ptr()),
            MB_OK | MB_ICONERROR,
        );
    }
}

/// No dialogs off Windows; the failure is logged instead.
#[cfg(not(windows))]
pub fn show_error_dialog(message: &str) {
    error!(title = DIALOG_TITLE, "{message}");
}
