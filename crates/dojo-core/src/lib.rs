//! # Dojo Core Library
//!
//! This library provides the practice session engine behind Dojo, a
//! martial-arts training client. Instructors assign programs of exercises;
//! the engine walks a student through them with a one-time lead-in,
//! timed or repetition-based active phases, two-sided execution, rests and
//! audio cues.
//!
//! ## Architecture
//!
//! - **Practice Engine**: A pure state machine. Every operation returns the
//!   side effects it wants as [`Command`]s instead of performing them.
//! - **Session Runner**: Executes those commands against the audio,
//!   notification and wake-lock backends on a single tokio task.
//! - **Storage**: TOML-based configuration (per-cue volumes, notification
//!   and wake-lock settings).
//!
//! ## Key Components
//!
//! - [`PracticeEngine`]: Core session state machine
//! - [`SessionRunner`]: Drives an engine from a 1-second ticker and host input
//! - [`Config`]: Application configuration management
//! - [`CuePlayer`], [`ProgressNotifier`], [`WakeLock`]: backend traits

pub mod audio;
pub mod clock;
pub mod error;
pub mod events;
pub mod notification;
pub mod practice;
pub mod session;
pub mod storage;
pub mod wake_lock;

pub use audio::{Cue, CuePlayer, CueVolumes, SilentPlayer, VolumeLevel};
pub use error::{BackendError, ConfigError, CoreError, ValidationError};
pub use events::Event;
pub use notification::{NoopNotifier, ProgressNotice, ProgressNotifier};
pub use practice::{
    Command, Exercise, ExerciseKind, Phase, PracticeEngine, Program, SessionState, Side,
};
pub use session::{
    RunnerSettings, SessionHandle, SessionInput, SessionOutcome, SessionRunner, Visibility,
};
pub use storage::Config;
pub use wake_lock::{NoopWakeLock, WakeLock};
