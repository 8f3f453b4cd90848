//! Session runner: executes engine commands against the audio,
//! notification and wake-lock backends.
//!
//! Everything runs on one task. Ticks, host commands and visibility changes
//! are pulled from a single `tokio::select!` loop, so no two of them can
//! interleave while the engine is mid-transition.

use std::time::Duration;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

use crate::audio::{CueDispatcher, CuePlayer, CueVolumes};
use crate::clock::{Ticker, TICK_PERIOD};
use crate::events::Event;
use crate::notification::{NotificationSync, ProgressNotifier};
use crate::practice::{Command, PracticeEngine};
use crate::storage::Config;
use crate::wake_lock::{WakeLock, WakeLockGuard, DEFAULT_RENEW_SECS};

/// Host visibility as reported by the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Foreground,
    Background,
}

/// Input delivered to a running session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionInput {
    Skip,
    Pause,
    Resume,
    TogglePause,
    MarkDone,
    CompleteNow,
    Exit,
    Visibility(Visibility),
}

/// Cloneable handle used by the host to drive a session.
///
/// Sends after the session has ended are silently dropped.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    tx: mpsc::UnboundedSender<SessionInput>,
}

impl SessionHandle {
    /// Create a handle and the receiver to pass to [`SessionRunner::run`].
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<SessionInput>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    pub fn send(&self, input: SessionInput) {
        let _ = self.tx.send(input);
    }

    pub fn skip(&self) {
        self.send(SessionInput::Skip);
    }

    pub fn pause(&self) {
        self.send(SessionInput::Pause);
    }

    pub fn resume(&self) {
        self.send(SessionInput::Resume);
    }

    pub fn toggle_pause(&self) {
        self.send(SessionInput::TogglePause);
    }

    pub fn mark_done(&self) {
        self.send(SessionInput::MarkDone);
    }

    pub fn complete_now(&self) {
        self.send(SessionInput::CompleteNow);
    }

    pub fn exit(&self) {
        self.send(SessionInput::Exit);
    }

    pub fn set_visibility(&self, visibility: Visibility) {
        self.send(SessionInput::Visibility(visibility));
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RunnerSettings {
    pub tick_period: Duration,
    pub wake_lock_renewal: Duration,
    pub volumes: CueVolumes,
    pub notifications_enabled: bool,
}

impl RunnerSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            tick_period: TICK_PERIOD,
            wake_lock_renewal: Duration::from_secs(config.session.wake_lock_renew_secs.max(1)),
            volumes: config.audio.volumes(),
            notifications_enabled: config.notifications.enabled,
        }
    }
}

impl Default for RunnerSettings {
    fn default() -> Self {
        Self {
            tick_period: TICK_PERIOD,
            wake_lock_renewal: Duration::from_secs(DEFAULT_RENEW_SECS),
            volumes: CueVolumes::default(),
            notifications_enabled: true,
        }
    }
}

/// Result handed back to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionOutcome {
    /// True on natural or manual completion, false on abort.
    pub completed: bool,
    /// 1-based position of the last exercise reached, 0 if none was.
    pub exercises_reached: usize,
    pub elapsed_secs: u64,
}

pub struct SessionRunner<P, N, W> {
    engine: PracticeEngine,
    audio: CueDispatcher<P>,
    notifications: NotificationSync<N>,
    wake_lock: WakeLockGuard<W>,
    ticker: Ticker,
    settings: RunnerSettings,
    events: Option<mpsc::UnboundedSender<Event>>,
    finished: Option<bool>,
}

impl<P, N, W> SessionRunner<P, N, W>
where
    P: CuePlayer,
    N: ProgressNotifier,
    W: WakeLock,
{
    pub fn new(
        engine: PracticeEngine,
        player: P,
        notifier: N,
        wake_lock: W,
        settings: RunnerSettings,
    ) -> Self {
        Self {
            engine,
            audio: CueDispatcher::new(player, settings.volumes),
            notifications: NotificationSync::new(notifier, settings.notifications_enabled),
            wake_lock: WakeLockGuard::new(wake_lock),
            ticker: Ticker::new(settings.tick_period),
            settings,
            events: None,
            finished: None,
        }
    }

    /// Forward every published [`Event`] to `sender`, plus a
    /// [`Event::StateSnapshot`] after each tick.
    pub fn with_events(mut self, sender: mpsc::UnboundedSender<Event>) -> Self {
        self.events = Some(sender);
        self
    }

    /// Run the session to its end. Dropping every [`SessionHandle`] counts
    /// as host teardown and exits the session.
    pub async fn run(mut self, mut inputs: mpsc::UnboundedReceiver<SessionInput>) -> SessionOutcome {
        let started = Instant::now();
        self.audio.init().await;

        let cmds = self.engine.start();
        self.execute(cmds);

        let mut renewal = interval_at(
            Instant::now() + self.settings.wake_lock_renewal,
            self.settings.wake_lock_renewal,
        );
        renewal.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut inputs_open = true;

        while self.finished.is_none() {
            tokio::select! {
                _ = self.ticker.tick() => {
                    let cmds = self.engine.tick();
                    self.execute(cmds);
                    if self.finished.is_none() {
                        self.emit(self.engine.snapshot());
                    }
                }
                _ = renewal.tick() => {
                    self.wake_lock.renew();
                }
                input = inputs.recv(), if inputs_open => {
                    let cmds = match input {
                        Some(input) => self.apply(input),
                        None => {
                            tracing::debug!("session inputs closed, exiting");
                            inputs_open = false;
                            self.engine.exit()
                        }
                    };
                    self.execute(cmds);
                }
            }
        }

        self.dispose();
        let completed = self.finished.unwrap_or(false);
        SessionOutcome {
            completed,
            exercises_reached: if self.engine.program().is_empty() {
                0
            } else {
                self.engine.position()
            },
            elapsed_secs: started.elapsed().as_secs(),
        }
    }

    fn apply(&mut self, input: SessionInput) -> Vec<Command> {
        tracing::debug!(?input, "session input");
        match input {
            SessionInput::Skip => self.engine.skip(),
            SessionInput::Pause => self.engine.pause(),
            SessionInput::Resume => self.engine.resume(),
            SessionInput::TogglePause => self.engine.toggle_pause(),
            SessionInput::MarkDone => self.engine.mark_done(),
            SessionInput::CompleteNow => self.engine.complete_now(),
            SessionInput::Exit => self.engine.exit(),
            SessionInput::Visibility(v) => self.engine.set_backgrounded(v == Visibility::Background),
        }
    }

    fn execute(&mut self, cmds: Vec<Command>) {
        for cmd in cmds {
            match cmd {
                Command::PlayCue { cue } => {
                    self.audio.play(cue);
                }
                Command::ShowNotification { notice } => self.notifications.show(&notice),
                // On disposal only a visible notification needs clearing.
                Command::ClearNotification if self.engine.is_finished() => {
                    self.notifications.dismiss()
                }
                Command::ClearNotification => self.notifications.clear(),
                Command::RestartTicker => self.ticker.restart(),
                Command::CancelTicker => self.ticker.cancel(),
                Command::AcquireWakeLock => self.wake_lock.acquire(),
                Command::ReleaseWakeLock => self.wake_lock.release(),
                Command::Publish { event } => self.emit(event),
                Command::Finish { completed } => {
                    self.finished = Some(completed);
                    self.emit(Event::SessionFinished {
                        completed,
                        at: Utc::now(),
                    });
                }
            }
        }
        debug_assert_eq!(
            self.ticker.is_active(),
            self.engine.ticker_active(),
            "ticker out of sync with engine"
        );
    }

    /// Mandatory cleanup, whatever ended the session.
    fn dispose(&mut self) {
        self.ticker.cancel();
        if self.wake_lock.is_held() {
            self.wake_lock.release();
        }
        self.notifications.dismiss();
    }

    fn emit(&self, event: Event) {
        if let Some(tx) = &self.events {
            let _ = tx.send(event);
        }
    }
}
