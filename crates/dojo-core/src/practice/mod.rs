mod command;
mod engine;
mod program;
mod state;

pub use command::Command;
pub use engine::PracticeEngine;
pub use program::{Exercise, ExerciseKind, Program, DEFAULT_EXERCISE_SECS, LEAD_IN_SECS};
pub use state::{Phase, SessionState, Side};
