#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

pub fn copy_fixture(name: &str, destination: &Path) -> PathBuf {
    let content = fs::read_to_string(fixture_path(name)).expect("fixture should be readable");
    let target = destination.join(name);
    fs::write(&target, content).expect("fixture copy should succeed");
    target
}

/// Writes an executable stub standing in for an external tool (cdktf,
/// terraform, az). The stub must carry the exact name the harness resolves
/// through PATH.
#[cfg(unix)]
pub fn write_stub_tool(dir: &Path, name: &str, body: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join(name);
    fs::write(&path, format!("#!/bin/sh\n{body}\n")).expect("stub tool write should succeed");
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755))
        .expect("stub tool should be made executable");
    path
}

/// A stub that appends its argument list to `log` and exits zero.
#[cfg(unix)]
pub fn write_recording_stub(dir: &Path, name: &str, log: &Path) -> PathBuf {
    write_stub_tool(dir, name, &format!("echo \"$@\" >> {}", log.display()))
}

pub fn run_cdkharness(args: &[&str]) -> Output {
    let mut command = Command::new(env!("CARGO_BIN_EXE_cdkharness"));
    command.args(args);
    command.output().expect("failed to run cdkharness binary")
}

/// Runs the binary with `stub_dir` prepended to PATH so stub tools shadow
/// any real cdktf/terraform/az installation.
pub fn run_cdkharness_with_stubs(args: &[&str], stub_dir: &Path) -> Output {
    let original_path = std::env::var("PATH").unwrap_or_default();
    let mut command = Command::new(env!("CARGO_BIN_EXE_cdkharness"));
    command.args(args);
    command.env("PATH", format!("{}:{original_path}", stub_dir.display()));
    command.output().expect("failed to run cdkharness binary")
}

pub fn stdout_json(output: &Output) -> serde_json::Value {
    let stdout = String::from_utf8_lossy(&output.stdout);
    serde_json::from_str(stdout.trim()).unwrap_or_else(|error| {
        panic!("stdout should be JSON, got error {error} for: {stdout}")
    })
}

pub fn error_type(output: &Output) -> String {
    stdout_json(output)["error"]["type"]
        .as_str()
        .expect("error response should carry a type")
        .to_string()
}
