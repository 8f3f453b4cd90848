//! Shared helpers for CLI end-to-end tests.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use tempfile::TempDir;

pub struct CliOutput {
    pub code: i32,
    pub stdout: String,
    pub stderr: String,
}

/// An isolated HOME so config writes never touch the real one.
pub struct Sandbox {
    home: TempDir,
}

impl Sandbox {
    pub fn new() -> Self {
        Self {
            home: TempDir::new().expect("create temp home"),
        }
    }

    pub fn path(&self) -> &Path {
        self.home.path()
    }

    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.home.path().join(name);
        std::fs::write(&path, contents).expect("write fixture");
        path
    }

    pub fn run(&self, args: &[&str]) -> CliOutput {
        self.run_with_stdin(args, "")
    }

    pub fn run_with_stdin(&self, args: &[&str], stdin: &str) -> CliOutput {
        let mut child = Command::new(env!("CARGO_BIN_EXE_dojo"))
            .args(args)
            .env("HOME", self.home.path())
            .env_remove("DOJO_ENV")
            .env_remove("DOJO_LOG")
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .expect("spawn dojo");

        if let Some(mut input) = child.stdin.take() {
            input
                .write_all(stdin.as_bytes())
                .expect("write stdin");
        }

        let output = child.wait_with_output().expect("wait for dojo");
        CliOutput {
            code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        }
    }
}

pub const BASIC_PROGRAM: &str = r#"
name = "Basics"

[[exercises]]
name = "Jab"
kind = "timed"
duration_secs = 30
rest_after_secs = 10

[[exercises]]
name = "Push-ups"
kind = "repetition_count"
repetition_count = 10
"#;
