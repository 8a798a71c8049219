//! Shared integration-test harness for running the `td-authorizer` binary
//! and locating fixtures.

#![allow(dead_code)]

use std::path::PathBuf;
use std::process::{Command, Output, Stdio};

/// Handle on the compiled `td-authorizer` binary.
pub struct Authorizer;

impl Authorizer {
    /// Runs the binary with `args` to completion and captures its output.
    ///
    /// Logging is disabled with `--quiet` so stdout only carries command
    /// output. Stdin is closed, so any prompt not served by a script sees
    /// end of input.
    #[allow(clippy::missing_panics_doc)]
    pub fn run(args: &[&str]) -> Output {
        Command::new(env!("CARGO_BIN_EXE_td-authorizer"))
            .args(args)
            .arg("--quiet")
            .env_remove("TD_AUTHORIZER_CONFIG")
            .env_remove("TD_AUTHORIZER_LOG_JSON")
            .stdin(Stdio::null())
            .output()
            .expect("failed to run td-authorizer")
    }

    /// Returns the absolute path of a file under `tests/fixtures`.
    #[must_use]
    pub fn fixture_path(name: &str) -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("tests/fixtures")
            .join(name)
    }

    /// Same as [`fixture_path`](Self::fixture_path), as a `String` for
    /// argument lists.
    #[must_use]
    pub fn fixture(name: &str) -> String {
        Self::fixture_path(name).display().to_string()
    }
}

/// Stdout of a finished run as text.
#[must_use]
pub fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

/// Stderr of a finished run as text.
#[must_use]
pub fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}
