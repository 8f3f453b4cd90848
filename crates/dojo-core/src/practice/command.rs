use serde::{Deserialize, Serialize};

use crate::audio::Cue;
use crate::events::Event;
use crate::notification::ProgressNotice;

/// Side effect requested by an engine transition.
///
/// The engine never performs I/O itself; the session runner executes these
/// in order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Command {
    PlayCue { cue: Cue },
    ShowNotification { notice: ProgressNotice },
    ClearNotification,
    /// Cancel the running ticker, if any, and schedule a new one.
    RestartTicker,
    CancelTicker,
    AcquireWakeLock,
    ReleaseWakeLock,
    Publish { event: Event },
    /// Terminal signal for the host.
    Finish { completed: bool },
}

impl Command {
    pub fn cue(&self) -> Option<Cue> {
        match self {
            Command::PlayCue { cue } => Some(*cue),
            _ => None,
        }
    }
}
