//! Single OS notification mirroring session progress while the host is
//! backgrounded. Best-effort: every failure is logged and dropped.

use serde::{Deserialize, Serialize};

use crate::error::BackendError;

/// Content of the progress notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ProgressNotice {
    Timer {
        label: String,
        remaining_secs: u32,
        position: usize,
        total: usize,
    },
    Repetition {
        label: String,
        repetition_count: Option<u32>,
        position: usize,
        total: usize,
    },
    Rest {
        remaining_secs: u32,
        position: usize,
        total: usize,
    },
}

impl ProgressNotice {
    /// One-line plain text rendering, e.g. `"[2/5] Jab — 0:42"`.
    pub fn summary(&self) -> String {
        match self {
            ProgressNotice::Timer {
                label,
                remaining_secs,
                position,
                total,
            } => format!("[{position}/{total}] {label} — {}", format_clock(*remaining_secs)),
            ProgressNotice::Repetition {
                label,
                repetition_count,
                position,
                total,
            } => match repetition_count {
                Some(n) => format!("[{position}/{total}] {label} — {n} reps"),
                None => format!("[{position}/{total}] {label}"),
            },
            ProgressNotice::Rest {
                remaining_secs,
                position,
                total,
            } => format!("[{position}/{total}] Rest — {}", format_clock(*remaining_secs)),
        }
    }
}

/// `m:ss` clock text.
pub fn format_clock(secs: u32) -> String {
    format!("{}:{:02}", secs / 60, secs % 60)
}

/// Notification backend.
pub trait ProgressNotifier {
    fn show_timer(
        &mut self,
        label: &str,
        remaining_secs: u32,
        position: usize,
        total: usize,
    ) -> Result<(), BackendError>;

    fn show_repetition(
        &mut self,
        label: &str,
        repetition_count: Option<u32>,
        position: usize,
        total: usize,
    ) -> Result<(), BackendError>;

    fn show_rest(
        &mut self,
        remaining_secs: u32,
        position: usize,
        total: usize,
    ) -> Result<(), BackendError>;

    fn clear(&mut self) -> Result<(), BackendError>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopNotifier;

impl ProgressNotifier for NoopNotifier {
    fn show_timer(&mut self, _: &str, _: u32, _: usize, _: usize) -> Result<(), BackendError> {
        Ok(())
    }

    fn show_repetition(
        &mut self,
        _: &str,
        _: Option<u32>,
        _: usize,
        _: usize,
    ) -> Result<(), BackendError> {
        Ok(())
    }

    fn show_rest(&mut self, _: u32, _: usize, _: usize) -> Result<(), BackendError> {
        Ok(())
    }

    fn clear(&mut self) -> Result<(), BackendError> {
        Ok(())
    }
}

/// Drives a [`ProgressNotifier`] from engine notices.
pub struct NotificationSync<N> {
    notifier: N,
    enabled: bool,
    visible: bool,
}

impl<N: ProgressNotifier> NotificationSync<N> {
    pub fn new(notifier: N, enabled: bool) -> Self {
        Self {
            notifier,
            enabled,
            visible: false,
        }
    }

    pub fn show(&mut self, notice: &ProgressNotice) {
        if !self.enabled {
            return;
        }
        let result = match notice {
            ProgressNotice::Timer {
                label,
                remaining_secs,
                position,
                total,
            } => self
                .notifier
                .show_timer(label, *remaining_secs, *position, *total),
            ProgressNotice::Repetition {
                label,
                repetition_count,
                position,
                total,
            } => self
                .notifier
                .show_repetition(label, *repetition_count, *position, *total),
            ProgressNotice::Rest {
                remaining_secs,
                position,
                total,
            } => self.notifier.show_rest(*remaining_secs, *position, *total),
        };
        match result {
            Ok(()) => self.visible = true,
            Err(e) => tracing::warn!(error = %e, "failed to show progress notification"),
        }
    }

    /// Forward a clear to the backend whether or not a show succeeded.
    pub fn clear(&mut self) {
        if !self.enabled {
            return;
        }
        match self.notifier.clear() {
            Ok(()) => self.visible = false,
            Err(e) => tracing::warn!(error = %e, "failed to clear progress notification"),
        }
    }

    /// Clear only if a notification is up. A failed clear keeps it marked
    /// visible so the next dismiss retries.
    pub fn dismiss(&mut self) {
        if self.visible {
            self.clear();
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }
}
