//! Shared integration-test harness for running the `podium` binary
//! against snapshot fixtures.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use chrono::{DateTime, Utc};
use tempfile::TempDir;

/// Absolute path of a file under `tests/fixtures/`.
pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// Copies a fixture into a fresh temp dir so a command may rewrite it.
///
/// Keep the returned [`TempDir`] alive for as long as the path is used.
#[allow(clippy::missing_panics_doc)]
pub fn fixture_copy(name: &str) -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let path = dir.path().join(name);
    std::fs::copy(fixture_path(name), &path).expect("failed to copy fixture");
    (dir, path)
}

/// Runs `podium` with `args` and `--quiet`, returning its output.
#[allow(clippy::missing_panics_doc)]
pub fn podium(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_podium"))
        .args(args)
        .arg("--quiet")
        .env_remove("PODIUM_EVENTS_FILE")
        .env_remove("PODIUM_LOG_LEVEL")
        .output()
        .expect("failed to spawn podium")
}

/// Path as `&str` for argument lists.
pub fn arg(path: &Path) -> &str {
    path.to_str().expect("non-UTF-8 path")
}

/// Stdout as text.
pub fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

/// Stderr as text.
pub fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

/// Stdout parsed as JSON.
#[allow(clippy::missing_panics_doc)]
pub fn stdout_json(output: &Output) -> serde_json::Value {
    serde_json::from_slice(&output.stdout).unwrap_or_else(|e| {
        panic!("stdout is not JSON ({e}): {}", stdout(output));
    })
}

/// Parses an RFC 3339 instant.
#[allow(clippy::missing_panics_doc)]
pub fn at(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s)
        .expect("bad instant")
        .with_timezone(&Utc)
}
