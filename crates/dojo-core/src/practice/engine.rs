//! Practice session state machine.
//!
//! The engine is pure: every operation mutates [`SessionState`] and returns
//! the side effects it wants performed as a list of [`Command`]s. The caller
//! owns the ticker and calls [`PracticeEngine::tick`] once per second while
//! the last ticker command was [`Command::RestartTicker`].
//!
//! ## Phase Transitions
//!
//! ```text
//! start -> Countdown (once per session) -> Active [First -> Second] -> Rest? -> next exercise
//!                                            ^                                      |
//!                                            +--------------------------------------+
//! last exercise done -> LongCompletion cue -> Finish { completed: true }
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let mut engine = PracticeEngine::new(program);
//! run(engine.start());
//! // Every second while the ticker runs:
//! run(engine.tick());
//! ```

use chrono::Utc;
use uuid::Uuid;

use super::command::Command;
use super::program::{Exercise, Program, LEAD_IN_SECS};
use super::state::{Phase, SessionState, Side};
use crate::audio::Cue;
use crate::events::Event;
use crate::notification::ProgressNotice;

#[derive(Debug, Clone)]
pub struct PracticeEngine {
    id: Uuid,
    program: Program,
    state: SessionState,
    started: bool,
    /// `Some(completed)` once the session has ended.
    outcome: Option<bool>,
    ticker_active: bool,
}

impl PracticeEngine {
    pub fn new(program: Program) -> Self {
        Self {
            id: Uuid::new_v4(),
            program,
            state: SessionState::new(),
            started: false,
            outcome: None,
            ticker_active: false,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    /// Identifier carried by [`Event::SessionStarted`].
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn program(&self) -> &Program {
        &self.program
    }

    pub fn is_finished(&self) -> bool {
        self.outcome.is_some()
    }

    /// `Some(true)` after natural or manual completion, `Some(false)` after
    /// an abort, `None` while running.
    pub fn outcome(&self) -> Option<bool> {
        self.outcome
    }

    /// Whether the caller should currently be delivering ticks.
    pub fn ticker_active(&self) -> bool {
        self.ticker_active
    }

    pub fn current_exercise(&self) -> Option<&Exercise> {
        self.program.get(self.state.exercise_index)
    }

    /// 1-based position of the current exercise.
    pub fn position(&self) -> usize {
        self.state.exercise_index + 1
    }

    pub fn snapshot(&self) -> Event {
        let label = self
            .current_exercise()
            .map(|ex| ex.label(self.state.side))
            .unwrap_or_default();
        Event::StateSnapshot {
            phase: self.state.phase,
            exercise_index: self.state.exercise_index,
            exercise_label: label,
            side: self.state.side,
            remaining_secs: self.state.remaining_secs,
            total_secs: self.state.initial_duration_secs,
            paused: self.state.paused,
            position: self.position(),
            total: self.program.len(),
            at: Utc::now(),
        }
    }

    /// Notification content for the current phase. None during the lead-in.
    pub fn notice(&self) -> Option<ProgressNotice> {
        let exercise = self.current_exercise()?;
        let position = self.position();
        let total = self.program.len();
        match self.state.phase {
            Phase::Countdown => None,
            Phase::Active if exercise.is_timed() => Some(ProgressNotice::Timer {
                label: exercise.label(self.state.side),
                remaining_secs: self.state.remaining_secs,
                position,
                total,
            }),
            Phase::Active => Some(ProgressNotice::Repetition {
                label: exercise.label(self.state.side),
                repetition_count: exercise.repetition_count,
                position,
                total,
            }),
            Phase::Rest => Some(ProgressNotice::Rest {
                remaining_secs: self.state.remaining_secs,
                position,
                total,
            }),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Begin the session. An empty program finishes immediately with
    /// `completed: false` and no phase is entered.
    pub fn start(&mut self) -> Vec<Command> {
        let mut cmds = Vec::new();
        if self.started || self.is_finished() {
            return cmds;
        }
        self.started = true;
        self.state = SessionState::new();

        if self.program.is_empty() {
            tracing::warn!(program = %self.program.name, "refusing to start an empty program");
            cmds.push(Command::Finish { completed: false });
            self.outcome = Some(false);
            return cmds;
        }

        tracing::info!(
            program = %self.program.name,
            exercises = self.program.len(),
            session_id = %self.id,
            "practice session started"
        );
        cmds.push(Command::AcquireWakeLock);
        cmds.push(Command::Publish {
            event: Event::SessionStarted {
                session_id: self.id,
                program: self.program.name.clone(),
                exercise_count: self.program.len(),
                at: Utc::now(),
            },
        });
        self.state.side = self.program.exercises[0].first_side();
        self.enter_countdown(&mut cmds);
        cmds
    }

    /// One second has elapsed.
    pub fn tick(&mut self) -> Vec<Command> {
        let mut cmds = Vec::new();
        if !self.is_running() || !self.ticker_active {
            return cmds;
        }

        match self.state.phase {
            Phase::Countdown => {
                self.state.remaining_secs = self.state.remaining_secs.saturating_sub(1);
                if self.state.remaining_secs == 2 {
                    cmds.push(Command::PlayCue { cue: Cue::LeadIn });
                }
                if self.state.remaining_secs == 0 {
                    self.finish_countdown(&mut cmds);
                }
            }
            Phase::Active => {
                if self.state.paused {
                    self.push_notice(&mut cmds);
                    return cmds;
                }
                if self.state.remaining_secs > 0 {
                    // Fires one second ahead of the literal midpoint.
                    let half = self.state.half_time_secs();
                    if !self.state.half_cue_fired && self.state.remaining_secs == half + 1 {
                        cmds.push(Command::PlayCue { cue: Cue::Halfway });
                        self.state.half_cue_fired = true;
                    }
                    if self.state.remaining_secs == 2 {
                        cmds.push(Command::PlayCue {
                            cue: Cue::FinalCountdown,
                        });
                    }
                    self.state.remaining_secs -= 1;
                }
                if self.state.remaining_secs == 0 {
                    self.complete_active(&mut cmds);
                } else {
                    self.push_notice(&mut cmds);
                }
            }
            Phase::Rest => {
                self.state.remaining_secs = self.state.remaining_secs.saturating_sub(1);
                if self.state.remaining_secs == 0 {
                    self.next_exercise(&mut cmds);
                } else {
                    self.push_notice(&mut cmds);
                }
            }
        }
        cmds
    }

    pub fn skip(&mut self) -> Vec<Command> {
        let mut cmds = Vec::new();
        if !self.is_running() {
            return cmds;
        }
        tracing::debug!(
            phase = ?self.state.phase,
            index = self.state.exercise_index,
            side = ?self.state.side,
            "skip"
        );
        match self.state.phase {
            Phase::Countdown => self.finish_countdown(&mut cmds),
            Phase::Active if self.on_first_side() => {
                self.state.side = Side::Second;
                self.enter_active(&mut cmds, true);
            }
            Phase::Active | Phase::Rest => {
                self.state.side = Side::None;
                self.next_exercise(&mut cmds);
            }
        }
        cmds
    }

    pub fn pause(&mut self) -> Vec<Command> {
        let mut cmds = Vec::new();
        if self.can_pause() && !self.state.paused {
            self.state.paused = true;
            cmds.push(Command::Publish {
                event: Event::Paused {
                    remaining_secs: self.state.remaining_secs,
                    at: Utc::now(),
                },
            });
        }
        cmds
    }

    pub fn resume(&mut self) -> Vec<Command> {
        let mut cmds = Vec::new();
        if self.can_pause() && self.state.paused {
            self.state.paused = false;
            cmds.push(Command::Publish {
                event: Event::Resumed {
                    remaining_secs: self.state.remaining_secs,
                    at: Utc::now(),
                },
            });
        }
        cmds
    }

    pub fn toggle_pause(&mut self) -> Vec<Command> {
        if self.state.paused {
            self.resume()
        } else {
            self.pause()
        }
    }

    /// Finish a repetition exercise. Ignored for timed phases.
    pub fn mark_done(&mut self) -> Vec<Command> {
        let mut cmds = Vec::new();
        if !self.is_running() || self.state.phase != Phase::Active {
            return cmds;
        }
        if self.current_exercise().is_some_and(|ex| ex.is_timed()) {
            return cmds;
        }
        self.complete_active(&mut cmds);
        cmds
    }

    /// End the session now, counting it as completed.
    pub fn complete_now(&mut self) -> Vec<Command> {
        let mut cmds = Vec::new();
        if !self.is_running() {
            return cmds;
        }
        cmds.push(Command::PlayCue {
            cue: Cue::LongCompletion,
        });
        self.finish(&mut cmds, true);
        cmds
    }

    /// Abandon the session without a completion cue.
    pub fn exit(&mut self) -> Vec<Command> {
        let mut cmds = Vec::new();
        if self.is_finished() {
            return cmds;
        }
        self.started = true;
        self.finish(&mut cmds, false);
        cmds
    }

    /// Host visibility changed. Only gates the progress notification.
    pub fn set_backgrounded(&mut self, backgrounded: bool) -> Vec<Command> {
        let mut cmds = Vec::new();
        let was = self.state.is_backgrounded;
        self.state.is_backgrounded = backgrounded;
        if !self.is_running() || was == backgrounded {
            return cmds;
        }
        if backgrounded {
            self.push_notice(&mut cmds);
        } else {
            cmds.push(Command::ClearNotification);
        }
        cmds
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn is_running(&self) -> bool {
        self.started && self.outcome.is_none()
    }

    fn on_first_side(&self) -> bool {
        self.state.side == Side::First && self.current_exercise().is_some_and(|ex| ex.has_sides)
    }

    fn can_pause(&self) -> bool {
        self.is_running()
            && self.state.phase == Phase::Active
            && self.current_exercise().is_some_and(|ex| ex.is_timed())
    }

    fn enter_countdown(&mut self, cmds: &mut Vec<Command>) {
        if self.state.has_shown_initial_countdown {
            self.enter_active(cmds, true);
            return;
        }
        self.state.phase = Phase::Countdown;
        self.state.remaining_secs = LEAD_IN_SECS;
        self.state.initial_duration_secs = LEAD_IN_SECS;
        self.state.paused = false;
        self.restart_ticker(cmds);
        self.publish_phase(cmds);
    }

    fn finish_countdown(&mut self, cmds: &mut Vec<Command>) {
        cmds.push(Command::PlayCue { cue: Cue::Start });
        self.state.has_shown_initial_countdown = true;
        self.enter_active(cmds, false);
    }

    /// `announce` is false only for the first exercise, whose start cue
    /// comes from the lead-in.
    fn enter_active(&mut self, cmds: &mut Vec<Command>, announce: bool) {
        let index = self.state.exercise_index;
        let exercise = &self.program.exercises[index];
        let timed = exercise.is_timed();
        let duration = exercise.active_duration_secs(self.state.side);

        self.state.phase = Phase::Active;
        self.state.paused = false;
        self.state.half_cue_fired = false;
        if announce {
            cmds.push(Command::PlayCue { cue: Cue::Start });
        }
        if timed {
            self.state.initial_duration_secs = duration;
            self.state.remaining_secs = duration;
            self.restart_ticker(cmds);
        } else {
            self.state.initial_duration_secs = 0;
            self.state.remaining_secs = 0;
            self.cancel_ticker(cmds);
        }
        self.publish_phase(cmds);
        self.push_notice(cmds);
    }

    /// Active phase is over, by timer expiry, mark-done or skip.
    fn complete_active(&mut self, cmds: &mut Vec<Command>) {
        if self.on_first_side() {
            self.state.side = Side::Second;
            self.enter_active(cmds, true);
            return;
        }
        self.state.side = Side::None;
        let rest = self.program.exercises[self.state.exercise_index].rest_after_secs;
        if rest > 0 {
            self.enter_rest(cmds, rest);
        } else {
            self.next_exercise(cmds);
        }
    }

    fn enter_rest(&mut self, cmds: &mut Vec<Command>, rest: u32) {
        self.state.phase = Phase::Rest;
        self.state.remaining_secs = rest;
        self.state.initial_duration_secs = rest;
        self.state.paused = false;
        self.restart_ticker(cmds);
        self.publish_phase(cmds);
        self.push_notice(cmds);
    }

    fn next_exercise(&mut self, cmds: &mut Vec<Command>) {
        let next = self.state.exercise_index + 1;
        if next < self.program.len() {
            self.state.exercise_index = next;
            self.state.side = self.program.exercises[next].first_side();
            self.enter_countdown(cmds);
        } else {
            cmds.push(Command::PlayCue {
                cue: Cue::LongCompletion,
            });
            self.finish(cmds, true);
        }
    }

    /// Dispose: ticker, notification and wake-lock are always released.
    fn finish(&mut self, cmds: &mut Vec<Command>, completed: bool) {
        self.cancel_ticker(cmds);
        cmds.push(Command::ClearNotification);
        cmds.push(Command::ReleaseWakeLock);
        cmds.push(Command::Finish { completed });
        self.outcome = Some(completed);
        tracing::info!(
            completed,
            reached = self.position(),
            total = self.program.len(),
            "practice session finished"
        );
    }

    fn restart_ticker(&mut self, cmds: &mut Vec<Command>) {
        cmds.push(Command::RestartTicker);
        self.ticker_active = true;
    }

    fn cancel_ticker(&mut self, cmds: &mut Vec<Command>) {
        cmds.push(Command::CancelTicker);
        self.ticker_active = false;
    }

    fn publish_phase(&self, cmds: &mut Vec<Command>) {
        let (name, label) = self
            .current_exercise()
            .map(|ex| (ex.name.clone(), ex.label(self.state.side)))
            .unwrap_or_default();
        tracing::debug!(
            phase = ?self.state.phase,
            index = self.state.exercise_index,
            side = ?self.state.side,
            remaining = self.state.remaining_secs,
            "phase entered"
        );
        cmds.push(Command::Publish {
            event: Event::PhaseEntered {
                phase: self.state.phase,
                exercise_index: self.state.exercise_index,
                exercise_name: name,
                exercise_label: label,
                side: self.state.side,
                remaining_secs: self.state.remaining_secs,
                at: Utc::now(),
            },
        });
    }

    fn push_notice(&self, cmds: &mut Vec<Command>) {
        if !self.state.is_backgrounded {
            return;
        }
        if let Some(notice) = self.notice() {
            cmds.push(Command::ShowNotification { notice });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::practice::program::ExerciseKind;

    fn cues(cmds: &[Command]) -> Vec<Cue> {
        cmds.iter().filter_map(Command::cue).collect()
    }

    fn program(exercises: Vec<Exercise>) -> Program {
        Program::new("test", exercises).unwrap()
    }

    /// Tick through the lead-in, returning the collected commands.
    fn run_lead_in(engine: &mut PracticeEngine) -> Vec<Command> {
        let mut cmds = Vec::new();
        for _ in 0..LEAD_IN_SECS {
            cmds.extend(engine.tick());
        }
        cmds
    }

    /// Tick until finished or `limit` ticks, collecting everything.
    fn run_to_end(engine: &mut PracticeEngine, limit: usize) -> Vec<Command> {
        let mut cmds = Vec::new();
        for _ in 0..limit {
            if engine.is_finished() {
                break;
            }
            cmds.extend(engine.tick());
        }
        cmds
    }

    #[test]
    fn empty_program_aborts_without_phase() {
        let mut engine = PracticeEngine::new(Program {
            name: "empty".into(),
            exercises: vec![],
        });
        let cmds = engine.start();
        assert_eq!(cmds, vec![Command::Finish { completed: false }]);
        assert_eq!(engine.outcome(), Some(false));
        assert!(!engine.ticker_active());
        assert!(engine.tick().is_empty());
    }

    #[test]
    fn scenario_single_timed_exercise() {
        let mut engine = PracticeEngine::new(program(vec![Exercise::timed("Jab", 10)]));
        let start = engine.start();
        assert!(start.contains(&Command::AcquireWakeLock));
        assert!(start.contains(&Command::RestartTicker));
        assert_eq!(engine.state().phase(), Phase::Countdown);
        assert_eq!(engine.state().remaining_secs(), 10);

        let mut lead_in_at = None;
        for _ in 0..LEAD_IN_SECS {
            let cmds = engine.tick();
            if cues(&cmds).contains(&Cue::LeadIn) {
                lead_in_at = Some(engine.state().remaining_secs());
            }
            if engine.state().phase() == Phase::Active {
                assert_eq!(cues(&cmds), vec![Cue::Start]);
            }
        }
        assert_eq!(lead_in_at, Some(2));
        assert_eq!(engine.state().phase(), Phase::Active);
        assert_eq!(engine.state().remaining_secs(), 10);
        assert!(engine.state().has_shown_initial_countdown());

        let mut halfway_at = None;
        let mut final_at = None;
        let mut all = Vec::new();
        for _ in 0..10 {
            let before = engine.state().remaining_secs();
            let cmds = engine.tick();
            if cues(&cmds).contains(&Cue::Halfway) {
                halfway_at = Some(before);
            }
            if cues(&cmds).contains(&Cue::FinalCountdown) {
                final_at = Some(before);
            }
            all.extend(cmds);
        }
        assert_eq!(halfway_at, Some(6));
        assert_eq!(final_at, Some(2));
        assert_eq!(engine.outcome(), Some(true));
        assert_eq!(cues(&all).last(), Some(&Cue::LongCompletion));
        assert_eq!(all.last(), Some(&Command::Finish { completed: true }));
        assert!(all.contains(&Command::ReleaseWakeLock));
    }

    #[test]
    fn scenario_two_sided_timed_exercise() {
        let ex = Exercise::timed("Side kick", 20).with_sides(Some(15));
        let mut engine = PracticeEngine::new(program(vec![ex]));
        engine.start();
        assert_eq!(engine.state().side(), Side::First);
        run_lead_in(&mut engine);
        assert_eq!(engine.state().remaining_secs(), 20);
        assert_eq!(engine.state().side(), Side::First);

        for _ in 0..19 {
            engine.tick();
        }
        assert_eq!(engine.state().remaining_secs(), 1);
        let cmds = engine.tick();
        assert_eq!(cues(&cmds), vec![Cue::Start]);
        assert_eq!(engine.state().side(), Side::Second);
        assert_eq!(engine.state().phase(), Phase::Active);
        assert_eq!(engine.state().remaining_secs(), 15);
        assert_eq!(engine.state().initial_duration_secs(), 15);

        let rest = run_to_end(&mut engine, 15);
        assert_eq!(engine.outcome(), Some(true));
        assert_eq!(cues(&rest).last(), Some(&Cue::LongCompletion));
    }

    #[test]
    fn scenario_repetition_waits_for_mark_done() {
        let mut ex = Exercise::repetitions("Push-ups", 5);
        ex.rest_after_secs = 3;
        let mut engine = PracticeEngine::new(program(vec![ex, Exercise::timed("Jab", 5)]));
        engine.start();
        let cmds = run_lead_in(&mut engine);
        assert_eq!(engine.state().phase(), Phase::Active);
        assert!(!engine.ticker_active());
        assert!(cmds.contains(&Command::CancelTicker));

        for _ in 0..100 {
            assert!(engine.tick().is_empty());
        }
        assert_eq!(engine.state().phase(), Phase::Active);
        assert!(engine.pause().is_empty());
        assert!(!engine.state().is_paused());

        let cmds = engine.mark_done();
        assert!(cues(&cmds).is_empty());
        assert_eq!(engine.state().phase(), Phase::Rest);
        assert_eq!(engine.state().remaining_secs(), 3);
        assert!(engine.ticker_active());
    }

    #[test]
    fn mark_done_ignored_for_timed() {
        let mut engine = PracticeEngine::new(program(vec![Exercise::timed("Jab", 5)]));
        engine.start();
        run_lead_in(&mut engine);
        assert!(engine.mark_done().is_empty());
        assert_eq!(engine.state().remaining_secs(), 5);
    }

    #[test]
    fn scenario_skip_first_side() {
        let ex = Exercise::timed("Side kick", 20).with_sides(Some(15));
        let mut engine = PracticeEngine::new(program(vec![ex]));
        engine.start();
        run_lead_in(&mut engine);
        engine.tick();
        engine.tick();
        assert_eq!(engine.state().remaining_secs(), 18);

        let cmds = engine.skip();
        assert_eq!(cues(&cmds), vec![Cue::Start]);
        assert!(cmds.contains(&Command::RestartTicker));
        assert_eq!(engine.state().side(), Side::Second);
        assert_eq!(engine.state().remaining_secs(), 15);
        assert!(!engine.state().half_cue_fired());
    }

    #[test]
    fn skip_during_countdown_starts_full_duration() {
        let mut engine = PracticeEngine::new(program(vec![Exercise::timed("Jab", 30)]));
        engine.start();
        engine.tick();
        engine.tick();
        let cmds = engine.skip();
        assert_eq!(cues(&cmds), vec![Cue::Start]);
        assert_eq!(engine.state().phase(), Phase::Active);
        assert_eq!(engine.state().remaining_secs(), 30);
        assert!(engine.state().has_shown_initial_countdown());
    }

    #[test]
    fn skip_from_rest_goes_to_next_exercise() {
        let mut engine = PracticeEngine::new(program(vec![
            Exercise::timed("Jab", 2).with_rest(30),
            Exercise::timed("Cross", 8),
        ]));
        engine.start();
        engine.skip();
        engine.tick();
        engine.tick();
        assert_eq!(engine.state().phase(), Phase::Rest);
        assert_eq!(engine.state().side(), Side::None);

        let cmds = engine.skip();
        assert_eq!(cues(&cmds), vec![Cue::Start]);
        assert_eq!(engine.state().exercise_index(), 1);
        assert_eq!(engine.state().phase(), Phase::Active);
        assert_eq!(engine.state().remaining_secs(), 8);
    }

    #[test]
    fn skip_on_last_exercise_completes() {
        let mut engine = PracticeEngine::new(program(vec![Exercise::timed("Jab", 20)]));
        engine.start();
        engine.skip();
        let cmds = engine.skip();
        assert_eq!(cues(&cmds), vec![Cue::LongCompletion]);
        assert_eq!(engine.outcome(), Some(true));
    }

    #[test]
    fn countdown_shown_once_per_session() {
        let mut engine = PracticeEngine::new(program(vec![
            Exercise::timed("Jab", 3).with_rest(2),
            Exercise::timed("Cross", 4),
        ]));
        engine.start();
        run_lead_in(&mut engine);
        for _ in 0..3 {
            engine.tick();
        }
        assert_eq!(engine.state().phase(), Phase::Rest);
        engine.tick();
        let cmds = engine.tick();
        assert_eq!(engine.state().exercise_index(), 1);
        assert_eq!(engine.state().phase(), Phase::Active);
        assert_eq!(engine.state().remaining_secs(), 4);
        assert_eq!(cues(&cmds), vec![Cue::Start]);
    }

    #[test]
    fn pause_freezes_remaining() {
        let mut engine = PracticeEngine::new(program(vec![Exercise::timed("Jab", 10)]));
        engine.start();
        run_lead_in(&mut engine);
        engine.tick();
        assert!(!engine.pause().is_empty());
        for _ in 0..25 {
            engine.tick();
        }
        assert_eq!(engine.state().remaining_secs(), 9);
        assert!(engine.pause().is_empty());
        assert!(!engine.resume().is_empty());

        let mut ticks = 0;
        while !engine.is_finished() {
            engine.tick();
            ticks += 1;
        }
        assert_eq!(ticks, 9);
    }

    #[test]
    fn pause_ignored_outside_active() {
        let mut engine = PracticeEngine::new(program(vec![Exercise::timed("Jab", 2).with_rest(5)]));
        engine.start();
        assert!(engine.pause().is_empty());
        assert!(engine.toggle_pause().is_empty());
        engine.skip();
        engine.tick();
        engine.tick();
        assert_eq!(engine.state().phase(), Phase::Rest);
        assert!(engine.pause().is_empty());
        assert!(!engine.state().is_paused());
    }

    #[test]
    fn combined_exercise_is_timed_and_pausable() {
        let mut ex = Exercise::timed("Burpees", 12);
        ex.kind = ExerciseKind::Combined;
        ex.repetition_count = Some(10);
        let mut engine = PracticeEngine::new(program(vec![ex]));
        engine.start();
        engine.skip();
        assert!(engine.ticker_active());
        assert!(!engine.toggle_pause().is_empty());
        assert!(engine.state().is_paused());
        assert!(engine.mark_done().is_empty());
    }

    #[test]
    fn missing_duration_defaults_to_sixty() {
        let mut ex = Exercise::timed("Stretch", 1);
        ex.duration_secs = None;
        let mut engine = PracticeEngine::new(program(vec![ex]));
        engine.start();
        engine.skip();
        assert_eq!(engine.state().remaining_secs(), 60);
    }

    #[test]
    fn complete_now_and_exit() {
        let mut engine = PracticeEngine::new(program(vec![Exercise::timed("Jab", 10)]));
        engine.start();
        let cmds = engine.complete_now();
        assert_eq!(cues(&cmds), vec![Cue::LongCompletion]);
        assert_eq!(cmds.last(), Some(&Command::Finish { completed: true }));
        assert!(engine.exit().is_empty());

        let mut engine = PracticeEngine::new(program(vec![Exercise::timed("Jab", 10)]));
        engine.start();
        engine.skip();
        let cmds = engine.exit();
        assert!(cues(&cmds).is_empty());
        assert!(cmds.contains(&Command::CancelTicker));
        assert!(cmds.contains(&Command::ClearNotification));
        assert!(cmds.contains(&Command::ReleaseWakeLock));
        assert_eq!(cmds.last(), Some(&Command::Finish { completed: false }));
        assert!(engine.tick().is_empty());
        assert!(engine.skip().is_empty());
    }

    #[test]
    fn scenario_background_notifications() {
        let mut engine = PracticeEngine::new(program(vec![Exercise::timed("Jab", 30)]));
        engine.start();

        let cmds = engine.set_backgrounded(true);
        assert!(cmds.is_empty(), "no notification during countdown");
        let lead_in = run_lead_in(&mut engine);
        let shown: Vec<_> = lead_in
            .iter()
            .filter(|c| matches!(c, Command::ShowNotification { .. }))
            .collect();
        assert_eq!(shown.len(), 1, "only on entering Active");

        let cmds = engine.tick();
        assert_eq!(
            cmds,
            vec![Command::ShowNotification {
                notice: ProgressNotice::Timer {
                    label: "Jab".into(),
                    remaining_secs: 29,
                    position: 1,
                    total: 1,
                }
            }]
        );

        let cmds = engine.set_backgrounded(false);
        assert_eq!(cmds, vec![Command::ClearNotification]);
        assert!(engine.set_backgrounded(false).is_empty());
        for _ in 0..5 {
            assert!(engine.tick().is_empty());
        }

        let cmds = engine.set_backgrounded(true);
        assert!(matches!(cmds.as_slice(), [Command::ShowNotification { .. }]));
    }

    #[test]
    fn notice_labels_side_and_rest() {
        let ex = Exercise::timed("Side kick", 4).with_sides(None).with_rest(6);
        let mut engine = PracticeEngine::new(program(vec![ex, Exercise::repetitions("Squats", 12)]));
        engine.start();
        engine.skip();
        engine.set_backgrounded(true);
        match engine.notice() {
            Some(ProgressNotice::Timer { label, .. }) => {
                assert_eq!(label, "Side kick — First Side")
            }
            other => panic!("unexpected notice: {other:?}"),
        }
        engine.skip();
        match engine.notice() {
            Some(ProgressNotice::Timer { label, .. }) => {
                assert_eq!(label, "Side kick — Second Side")
            }
            other => panic!("unexpected notice: {other:?}"),
        }
        for _ in 0..4 {
            engine.tick();
        }
        assert!(matches!(
            engine.notice(),
            Some(ProgressNotice::Rest {
                remaining_secs: 6,
                position: 1,
                total: 2
            })
        ));
        engine.skip();
        assert_eq!(
            engine.notice(),
            Some(ProgressNotice::Repetition {
                label: "Squats".into(),
                repetition_count: Some(12),
                position: 2,
                total: 2,
            })
        );
    }

    #[test]
    fn start_cue_count_matches_exercises_and_sides() {
        let exercises = vec![
            Exercise::timed("A", 4).with_rest(2),
            Exercise::timed("B", 3).with_sides(Some(2)),
            Exercise::repetitions("C", 5),
            Exercise::timed("D", 2).with_sides(None).with_rest(1),
        ];
        let mut engine = PracticeEngine::new(program(exercises));
        let mut all = engine.start();
        all.extend(run_to_end(&mut engine, 200));
        assert_eq!(engine.state().exercise_index(), 2);
        all.extend(engine.mark_done());
        all.extend(run_to_end(&mut engine, 200));
        assert_eq!(engine.outcome(), Some(true));

        let played = cues(&all);
        let count = |cue: Cue| played.iter().filter(|c| **c == cue).count();
        assert_eq!(count(Cue::Start), 4 + 2);
        assert_eq!(count(Cue::LongCompletion), 1);
        assert_eq!(count(Cue::LeadIn), 1);
        // A(4) B(3,2) D(2,2): halfway fires where remaining == half + 1 is reachable
        assert_eq!(count(Cue::Halfway), 3 + 2);
        assert_eq!(count(Cue::FinalCountdown), 5);
        let finishes = all
            .iter()
            .filter(|c| matches!(c, Command::Finish { .. }))
            .count();
        assert_eq!(finishes, 1);
    }

    #[test]
    fn phase_entered_carries_side_label() {
        let ex = Exercise::timed("Side kick", 20).with_sides(Some(15));
        let mut engine = PracticeEngine::new(program(vec![ex]));
        engine.start();
        engine.skip();
        let cmds = engine.skip();
        let label = cmds.iter().find_map(|c| match c {
            Command::Publish {
                event: Event::PhaseEntered { exercise_label, .. },
            } => Some(exercise_label.clone()),
            _ => None,
        });
        assert_eq!(label.as_deref(), Some("Side kick — Second Side"));
    }
}
