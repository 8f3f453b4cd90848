use clap::Subcommand;
use dojo_core::notification::format_clock;
use dojo_core::{ExerciseKind, Program, Side};
use std::path::PathBuf;

#[derive(Subcommand)]
pub enum ProgramAction {
    /// Show the exercises of a program
    Show {
        /// Program file (.toml or .json)
        path: PathBuf,
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Check a program file for errors
    Validate {
        /// Program file (.toml or .json)
        path: PathBuf,
    },
}

pub fn run(action: ProgramAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ProgramAction::Show { path, json } => {
            let program = Program::load(&path)?;
            if json {
                let estimated = program.estimated_duration_secs();
                let value = serde_json::json!({
                    "name": &program.name,
                    "exercises": &program.exercises,
                    "estimated_duration_secs": estimated,
                });
                println!("{}", serde_json::to_string_pretty(&value)?);
            } else {
                print_program(&program);
            }
        }
        ProgramAction::Validate { path } => {
            let program = Program::load(&path)?;
            program.validate()?;
            println!("ok");
        }
    }
    Ok(())
}

fn print_program(program: &Program) {
    println!("{} ({} exercises)", program.name, program.len());
    for (i, ex) in program.exercises.iter().enumerate() {
        let detail = match ex.kind {
            ExerciseKind::RepetitionCount => match ex.repetition_count {
                Some(n) => format!("{n} reps"),
                None => "reps".to_string(),
            },
            ExerciseKind::Timed | ExerciseKind::Combined => {
                let mut d = format_clock(ex.active_duration_secs(ex.first_side()));
                if ex.has_sides {
                    d.push_str(&format!(
                        " / {}",
                        format_clock(ex.active_duration_secs(Side::Second))
                    ));
                }
                if let Some(n) = ex.repetition_count {
                    d.push_str(&format!(", {n} reps"));
                }
                d
            }
        };
        let sides = if ex.has_sides { " [both sides]" } else { "" };
        let rest = if ex.rest_after_secs > 0 {
            format!(", rest {}", format_clock(ex.rest_after_secs))
        } else {
            String::new()
        };
        println!("{:>3}. {}{sides}: {detail}{rest}", i + 1, ex.name);
    }
    let total = program.estimated_duration_secs().min(u32::MAX as u64) as u32;
    println!("estimated: {}", format_clock(total));
}
