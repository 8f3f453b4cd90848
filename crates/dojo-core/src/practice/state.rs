use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Countdown,
    Active,
    Rest,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    #[default]
    None,
    First,
    Second,
}

/// Mutable state of one practice session.
///
/// Fields are crate-private: only the transition functions in
/// [`PracticeEngine`](super::PracticeEngine) write them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    pub(crate) exercise_index: usize,
    pub(crate) side: Side,
    pub(crate) phase: Phase,
    pub(crate) remaining_secs: u32,
    /// Duration snapshot taken at phase entry.
    pub(crate) initial_duration_secs: u32,
    pub(crate) half_cue_fired: bool,
    pub(crate) paused: bool,
    /// Session-scoped: the lead-in runs once, not once per exercise.
    pub(crate) has_shown_initial_countdown: bool,
    pub(crate) is_backgrounded: bool,
}

impl SessionState {
    pub(crate) fn new() -> Self {
        Self {
            exercise_index: 0,
            side: Side::None,
            phase: Phase::Countdown,
            remaining_secs: 0,
            initial_duration_secs: 0,
            half_cue_fired: false,
            paused: false,
            has_shown_initial_countdown: false,
            is_backgrounded: false,
        }
    }

    pub fn exercise_index(&self) -> usize {
        self.exercise_index
    }

    pub fn side(&self) -> Side {
        self.side
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    pub fn initial_duration_secs(&self) -> u32 {
        self.initial_duration_secs
    }

    pub fn half_cue_fired(&self) -> bool {
        self.half_cue_fired
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn has_shown_initial_countdown(&self) -> bool {
        self.has_shown_initial_countdown
    }

    pub fn is_backgrounded(&self) -> bool {
        self.is_backgrounded
    }

    /// `round(initial / 2)`, rounding halves up.
    pub fn half_time_secs(&self) -> u32 {
        self.initial_duration_secs.div_ceil(2)
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn half_time_rounds_half_up() {
        let mut state = SessionState::new();
        state.initial_duration_secs = 10;
        assert_eq!(state.half_time_secs(), 5);
        state.initial_duration_secs = 15;
        assert_eq!(state.half_time_secs(), 8);
        state.initial_duration_secs = 1;
        assert_eq!(state.half_time_secs(), 1);
    }

    #[test]
    fn side_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Side::Second).unwrap(), "\"second\"");
        assert_eq!(serde_json::to_string(&Phase::Rest).unwrap(), "\"rest\"");
    }
}
