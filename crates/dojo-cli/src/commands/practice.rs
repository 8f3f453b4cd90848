use std::path::Path;

use dojo_core::notification::format_clock;
use dojo_core::{
    Config, Event, NoopWakeLock, Phase, PracticeEngine, Program, RunnerSettings, SessionHandle,
    SessionInput, SessionOutcome, SessionRunner, Visibility,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

use crate::terminal::{TerminalCuePlayer, TerminalNotifier};

const HELP: &str = "commands: s(kip) p(ause) d(one) e(nd) q(uit) bg fg";

/// Map one stdin line to a session input.
pub fn parse_input(line: &str) -> Option<SessionInput> {
    let input = match line.trim().to_ascii_lowercase().as_str() {
        "s" | "skip" => SessionInput::Skip,
        "p" | "pause" => SessionInput::TogglePause,
        "d" | "done" => SessionInput::MarkDone,
        "e" | "end" => SessionInput::CompleteNow,
        "q" | "quit" => SessionInput::Exit,
        "bg" => SessionInput::Visibility(Visibility::Background),
        "fg" => SessionInput::Visibility(Visibility::Foreground),
        _ => return None,
    };
    Some(input)
}

pub fn run(path: &Path, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let program = Program::load(path)?;
    program.validate()?;
    let total = program.len();

    let config = Config::load_or_default();
    let settings = RunnerSettings::from_config(&config);

    let (handle, inputs) = SessionHandle::channel();
    let (events_tx, events_rx) = mpsc::unbounded_channel();
    let runner = SessionRunner::new(
        PracticeEngine::new(program),
        TerminalCuePlayer::default(),
        TerminalNotifier,
        NoopWakeLock,
        settings,
    )
    .with_events(events_tx);

    if !json {
        eprintln!("{HELP}");
    }

    let rt = tokio::runtime::Runtime::new()?;
    let outcome = rt.block_on(async move {
        let printer = tokio::spawn(print_events(events_rx, json));
        let reader = tokio::spawn(read_inputs(handle.clone()));
        let outcome = runner.run(inputs).await;
        reader.abort();
        let _ = printer.await;
        drop(handle);
        outcome
    });
    // stdin reads block a worker thread; do not wait on them.
    rt.shutdown_background();

    print_outcome(&outcome, total, json)?;
    Ok(())
}

async fn read_inputs(handle: SessionHandle) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        match lines.next_line().await {
            Ok(Some(line)) => match parse_input(&line) {
                Some(input) => handle.send(input),
                None if line.trim().is_empty() => {}
                None => eprintln!("unknown command '{}' ({HELP})", line.trim()),
            },
            Ok(None) => break,
            Err(e) => {
                tracing::warn!(error = %e, "stopped reading stdin");
                break;
            }
        }
    }
}

async fn print_events(mut events: mpsc::UnboundedReceiver<Event>, json: bool) {
    while let Some(event) = events.recv().await {
        if json {
            match serde_json::to_string(&event) {
                Ok(line) => println!("{line}"),
                Err(e) => tracing::warn!(error = %e, "failed to encode event"),
            }
            continue;
        }
        if let Some(line) = describe(&event) {
            println!("{line}");
        }
    }
}

fn describe(event: &Event) -> Option<String> {
    match event {
        Event::SessionStarted {
            program,
            exercise_count,
            ..
        } => Some(format!("Starting {program} ({exercise_count} exercises)")),
        Event::PhaseEntered {
            phase,
            exercise_index,
            exercise_label: label,
            remaining_secs,
            ..
        } => {
            let line = match phase {
                Phase::Countdown => format!("Get ready: {label} in {remaining_secs}s"),
                Phase::Active if *remaining_secs == 0 => {
                    format!("▶ {}. {label} (enter 'd' when done)", exercise_index + 1)
                }
                Phase::Active => format!(
                    "▶ {}. {label} {}",
                    exercise_index + 1,
                    format_clock(*remaining_secs)
                ),
                Phase::Rest => format!("Rest {}", format_clock(*remaining_secs)),
            };
            Some(line)
        }
        Event::Paused { remaining_secs, .. } => {
            Some(format!("paused at {}", format_clock(*remaining_secs)))
        }
        Event::Resumed { .. } => Some("resumed".to_string()),
        Event::StateSnapshot { .. } | Event::SessionFinished { .. } => None,
    }
}

fn print_outcome(
    outcome: &SessionOutcome,
    total: usize,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if json {
        println!("{}", serde_json::to_string(outcome)?);
        return Ok(());
    }
    let verdict = if outcome.completed {
        "Session completed"
    } else {
        "Session ended early"
    };
    let elapsed = format_clock(outcome.elapsed_secs.min(u32::MAX as u64) as u32);
    println!(
        "{verdict}: reached {}/{total}, {elapsed}",
        outcome.exercises_reached
    );
    Ok(())
}
