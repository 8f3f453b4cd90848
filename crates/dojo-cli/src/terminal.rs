//! Terminal backends: cues ring the bell, the progress notification is a
//! line on stderr.

use std::io::Write;

use dojo_core::{BackendError, Cue, CuePlayer, CueVolumes, ProgressNotice, ProgressNotifier};

#[derive(Default)]
pub struct TerminalCuePlayer {
    volumes: CueVolumes,
}

impl CuePlayer for TerminalCuePlayer {
    async fn init(&mut self) -> Result<(), BackendError> {
        Ok(())
    }

    fn set_volumes(&mut self, volumes: &CueVolumes) {
        self.volumes = *volumes;
    }

    fn play(&mut self, cue: Cue) -> Result<(), BackendError> {
        let level = self.volumes.level_for(cue);
        let mut stderr = std::io::stderr().lock();
        writeln!(
            stderr,
            "\x07[cue] {} ({:?}, gain {:.2})",
            cue.name(),
            level,
            level.gain()
        )
        .map_err(|e| {
            BackendError::Failed {
                backend: "audio",
                message: e.to_string(),
            }
        })
    }
}

pub struct TerminalNotifier;

impl TerminalNotifier {
    fn print(&self, line: &str) -> Result<(), BackendError> {
        writeln!(std::io::stderr().lock(), "[notification] {line}").map_err(|e| {
            BackendError::Failed {
                backend: "notification",
                message: e.to_string(),
            }
        })
    }
}

impl ProgressNotifier for TerminalNotifier {
    fn show_timer(
        &mut self,
        label: &str,
        remaining_secs: u32,
        position: usize,
        total: usize,
    ) -> Result<(), BackendError> {
        let notice = ProgressNotice::Timer {
            label: label.to_string(),
            remaining_secs,
            position,
            total,
        };
        self.print(&notice.summary())
    }

    fn show_repetition(
        &mut self,
        label: &str,
        repetition_count: Option<u32>,
        position: usize,
        total: usize,
    ) -> Result<(), BackendError> {
        let notice = ProgressNotice::Repetition {
            label: label.to_string(),
            repetition_count,
            position,
            total,
        };
        self.print(&notice.summary())
    }

    fn show_rest(
        &mut self,
        remaining_secs: u32,
        position: usize,
        total: usize,
    ) -> Result<(), BackendError> {
        let notice = ProgressNotice::Rest {
            remaining_secs,
            position,
            total,
        };
        self.print(&notice.summary())
    }

    fn clear(&mut self) -> Result<(), BackendError> {
        self.print("cleared")
    }
}
