//! Audio cue dispatch.
//!
//! The engine only ever names a [`Cue`]. Volumes are applied once when a
//! session starts, and a backend that fails to initialize silences the
//! session instead of aborting it.

use serde::{Deserialize, Serialize};

use crate::error::BackendError;

/// Named timing milestones announced to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cue {
    /// Two seconds left in the lead-in.
    LeadIn,
    Start,
    Halfway,
    /// Two seconds left in a timed exercise.
    FinalCountdown,
    LongCompletion,
}

impl Cue {
    pub fn name(self) -> &'static str {
        match self {
            Cue::LeadIn => "lead_in",
            Cue::Start => "start",
            Cue::Halfway => "halfway",
            Cue::FinalCountdown => "final_countdown",
            Cue::LongCompletion => "long_completion",
        }
    }
}

/// Discrete volume levels offered to users.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VolumeLevel {
    Mute,
    Low,
    #[default]
    Medium,
    High,
}

impl VolumeLevel {
    pub fn gain(self) -> f32 {
        match self {
            VolumeLevel::Mute => 0.0,
            VolumeLevel::Low => 0.35,
            VolumeLevel::Medium => 0.7,
            VolumeLevel::High => 1.0,
        }
    }

    pub fn is_muted(self) -> bool {
        self == VolumeLevel::Mute
    }
}

/// One volume level per cue category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CueVolumes {
    #[serde(default)]
    pub lead_in: VolumeLevel,
    #[serde(default)]
    pub start: VolumeLevel,
    #[serde(default)]
    pub halfway: VolumeLevel,
    #[serde(default)]
    pub final_countdown: VolumeLevel,
    #[serde(default)]
    pub completion: VolumeLevel,
}

impl CueVolumes {
    pub fn uniform(level: VolumeLevel) -> Self {
        Self {
            lead_in: level,
            start: level,
            halfway: level,
            final_countdown: level,
            completion: level,
        }
    }

    pub fn level_for(&self, cue: Cue) -> VolumeLevel {
        match cue {
            Cue::LeadIn => self.lead_in,
            Cue::Start => self.start,
            Cue::Halfway => self.halfway,
            Cue::FinalCountdown => self.final_countdown,
            Cue::LongCompletion => self.completion,
        }
    }
}

/// Playback backend.
#[allow(async_fn_in_trait)]
pub trait CuePlayer {
    /// Bring the backend up. Awaited once, before the session starts.
    async fn init(&mut self) -> Result<(), BackendError>;

    fn set_volumes(&mut self, volumes: &CueVolumes);

    fn play(&mut self, cue: Cue) -> Result<(), BackendError>;
}

/// Player that never makes a sound.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentPlayer;

impl CuePlayer for SilentPlayer {
    async fn init(&mut self) -> Result<(), BackendError> {
        Ok(())
    }

    fn set_volumes(&mut self, _volumes: &CueVolumes) {}

    fn play(&mut self, _cue: Cue) -> Result<(), BackendError> {
        Ok(())
    }
}

/// Wraps a [`CuePlayer`] with the session's failure policy.
pub struct CueDispatcher<P> {
    player: P,
    volumes: CueVolumes,
    enabled: bool,
}

impl<P: CuePlayer> CueDispatcher<P> {
    pub fn new(player: P, volumes: CueVolumes) -> Self {
        Self {
            player,
            volumes,
            enabled: false,
        }
    }

    /// Initialize the backend and apply volumes. Never fails: on error the
    /// dispatcher stays disabled for the rest of the session.
    pub async fn init(&mut self) {
        match self.player.init().await {
            Ok(()) => {
                self.player.set_volumes(&self.volumes);
                self.enabled = true;
            }
            Err(e) => {
                tracing::warn!(error = %e, "audio unavailable, continuing without cues");
                self.enabled = false;
            }
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Play a cue. Returns whether the backend was asked to play it.
    pub fn play(&mut self, cue: Cue) -> bool {
        if !self.enabled || self.volumes.level_for(cue).is_muted() {
            tracing::trace!(cue = cue.name(), "cue skipped");
            return false;
        }
        match self.player.play(cue) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(cue = cue.name(), error = %e, "cue playback failed");
                false
            }
        }
    }

    pub fn player(&self) -> &P {
        &self.player
    }
}
