use serde::{Deserialize, Serialize};
use std::path::Path;

use super::state::Side;
use crate::error::{Result, ValidationError};

/// Active duration used when a timed exercise carries no duration.
pub const DEFAULT_EXERCISE_SECS: u32 = 60;

/// Fixed lead-in shown once at the beginning of a session.
pub const LEAD_IN_SECS: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExerciseKind {
    Timed,
    RepetitionCount,
    Combined,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exercise {
    pub name: String,
    pub kind: ExerciseKind,
    #[serde(default)]
    pub duration_secs: Option<u32>,
    /// Duration of the second side; falls back to `duration_secs`.
    #[serde(default)]
    pub side_duration_secs: Option<u32>,
    /// Informational only, no timer runs for repetitions.
    #[serde(default)]
    pub repetition_count: Option<u32>,
    #[serde(default)]
    pub rest_after_secs: u32,
    #[serde(default)]
    pub has_sides: bool,
    #[serde(default)]
    pub description: String,
}

impl Exercise {
    /// A plain timed exercise with no sides and no rest.
    pub fn timed(name: impl Into<String>, duration_secs: u32) -> Self {
        Self {
            name: name.into(),
            kind: ExerciseKind::Timed,
            duration_secs: Some(duration_secs),
            side_duration_secs: None,
            repetition_count: None,
            rest_after_secs: 0,
            has_sides: false,
            description: String::new(),
        }
    }

    /// A repetition exercise, completed by the user marking it done.
    pub fn repetitions(name: impl Into<String>, count: u32) -> Self {
        Self {
            name: name.into(),
            kind: ExerciseKind::RepetitionCount,
            duration_secs: None,
            side_duration_secs: None,
            repetition_count: Some(count),
            rest_after_secs: 0,
            has_sides: false,
            description: String::new(),
        }
    }

    pub fn with_rest(mut self, rest_after_secs: u32) -> Self {
        self.rest_after_secs = rest_after_secs;
        self
    }

    pub fn with_sides(mut self, side_duration_secs: Option<u32>) -> Self {
        self.has_sides = true;
        self.side_duration_secs = side_duration_secs;
        self
    }

    /// Whether a countdown timer drives the active phase.
    pub fn is_timed(&self) -> bool {
        matches!(self.kind, ExerciseKind::Timed | ExerciseKind::Combined)
    }

    /// Active duration for the given side, following the fallback chain
    /// side duration -> duration -> [`DEFAULT_EXERCISE_SECS`].
    pub fn active_duration_secs(&self, side: Side) -> u32 {
        if self.has_sides && side == Side::Second {
            self.side_duration_secs
                .or(self.duration_secs)
                .unwrap_or(DEFAULT_EXERCISE_SECS)
        } else {
            self.duration_secs.unwrap_or(DEFAULT_EXERCISE_SECS)
        }
    }

    /// Display label including the side annotation when one applies.
    pub fn label(&self, side: Side) -> String {
        match side {
            Side::None => self.name.clone(),
            Side::First => format!("{} — First Side", self.name),
            Side::Second => format!("{} — Second Side", self.name),
        }
    }

    /// Side an exercise starts on.
    pub fn first_side(&self) -> Side {
        if self.has_sides {
            Side::First
        } else {
            Side::None
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Program {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub exercises: Vec<Exercise>,
}

impl Program {
    /// Build a program, rejecting an empty exercise list.
    pub fn new(name: impl Into<String>, exercises: Vec<Exercise>) -> Result<Self, ValidationError> {
        if exercises.is_empty() {
            return Err(ValidationError::EmptyCollection(
                "program has no exercises".into(),
            ));
        }
        Ok(Self {
            name: name.into(),
            exercises,
        })
    }

    /// Check the program for an empty list and zero durations.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.exercises.is_empty() {
            return Err(ValidationError::EmptyCollection(
                "program has no exercises".into(),
            ));
        }
        for (i, ex) in self.exercises.iter().enumerate() {
            let fields = [
                ("duration_secs", ex.duration_secs),
                ("side_duration_secs", ex.side_duration_secs),
                ("repetition_count", ex.repetition_count),
            ];
            for (field, value) in fields {
                if value == Some(0) {
                    return Err(ValidationError::InvalidValue {
                        field: format!("exercises[{i}].{field}"),
                        message: "must be a positive integer".into(),
                    });
                }
            }
            if ex.name.trim().is_empty() {
                return Err(ValidationError::InvalidValue {
                    field: format!("exercises[{i}].name"),
                    message: "must not be empty".into(),
                });
            }
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.exercises.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exercises.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Exercise> {
        self.exercises.get(index)
    }

    /// Rough wall-clock length: lead-in, timed sides and rests.
    /// Repetition exercises count as zero since the user sets their pace.
    pub fn estimated_duration_secs(&self) -> u64 {
        if self.exercises.is_empty() {
            return 0;
        }
        let body: u64 = self
            .exercises
            .iter()
            .map(|ex| {
                let mut secs = ex.rest_after_secs as u64;
                if ex.is_timed() {
                    secs += ex.active_duration_secs(ex.first_side()) as u64;
                    if ex.has_sides {
                        secs += ex.active_duration_secs(Side::Second) as u64;
                    }
                }
                secs
            })
            .sum();
        LEAD_IN_SECS as u64 + body
    }

    pub fn from_toml_str(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }

    pub fn from_json_str(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }

    /// Load a program file. `.json` files are read as JSON, anything else as TOML.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::from_json_str(&content),
            _ => Self::from_toml_str(&content),
        }
    }
}
