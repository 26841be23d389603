//! Common test utilities shared across integration tests.

use std::io::Write;
use std::path::Path;
use std::process::{Command, Output, Stdio};

/// Run the sqlsnip binary in the specified directory
pub fn run_sqlsnip_in_dir(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_sqlsnip"))
        .args(args)
        .current_dir(dir)
        .env("NO_COLOR", "1")
        .output()
        .expect("Failed to execute sqlsnip binary")
}

/// Run the sqlsnip binary with `input` on stdin
pub fn run_sqlsnip_with_stdin(dir: &Path, args: &[&str], input: &str) -> Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_sqlsnip"))
        .args(args)
        .current_dir(dir)
        .env("NO_COLOR", "1")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to spawn sqlsnip binary");

    child
        .stdin
        .take()
        .expect("stdin is piped")
        .write_all(input.as_bytes())
        .expect("Failed to write script to stdin");

    child
        .wait_with_output()
        .expect("Failed to wait for sqlsnip binary")
}

/// Write a script file into `dir` and return its file name
pub fn write_script(dir: &Path, name: &str, content: &str) -> String {
    std::fs::write(dir.join(name), content).expect("Failed to write script");
    name.to_string()
}
