use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::practice::{Phase, Side};

/// Every host-visible change in a practice session produces an Event.
/// Hosts subscribe to them through the session runner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    SessionStarted {
        session_id: Uuid,
        program: String,
        exercise_count: usize,
        at: DateTime<Utc>,
    },
    PhaseEntered {
        phase: Phase,
        exercise_index: usize,
        exercise_name: String,
        /// Name with the side annotation, as shown to the user.
        exercise_label: String,
        side: Side,
        remaining_secs: u32,
        at: DateTime<Utc>,
    },
    Paused {
        remaining_secs: u32,
        at: DateTime<Utc>,
    },
    Resumed {
        remaining_secs: u32,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        phase: Phase,
        exercise_index: usize,
        exercise_label: String,
        side: Side,
        remaining_secs: u32,
        total_secs: u32,
        paused: bool,
        position: usize,
        total: usize,
        at: DateTime<Utc>,
    },
    /// Terminal event: `completed` is false when the session was aborted.
    SessionFinished {
        completed: bool,
        at: DateTime<Utc>,
    },
}
