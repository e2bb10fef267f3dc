use std::io::Write;
use std::path::Path;
use std::process::{Command, Output, Stdio};
use tempfile::TempDir;

fn hook(state_dir: &Path, pane: Option<&str>, stdin: impl AsRef<[u8]>) -> Output {
    let mut command = Command::new(env!("CARGO_BIN_EXE_tmux-stat-hook"));
    command
        .arg("--state-dir")
        .arg(state_dir)
        .arg("handle")
        .env_remove("TMUX")
        .env_remove("TMUX_PANE")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    if let Some(pane) = pane {
        command.env("TMUX_PANE", pane);
    }

    let mut child = command.spawn().expect("Failed to spawn tmux-stat-hook");
    child
        .stdin
        .take()
        .expect("stdin")
        .write_all(stdin.as_ref())
        .expect("write stdin");
    child.wait_with_output().expect("wait for hook")
}

fn status(state_dir: &Path, extra: &[&str]) -> String {
    let output = Command::new(env!("CARGO_BIN_EXE_tmux-stat-hook"))
        .arg("--state-dir")
        .arg(state_dir)
        .arg("status")
        .args(extra)
        .output()
        .expect("Failed to run status");
    assert!(output.status.success());
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

#[test]
fn hook_events_drive_the_status_line() {
    let home = TempDir::new().expect("temp dir");
    let state_dir = home.path().join("state");

    let out = hook(&state_dir, Some("%1"), r#"{"event":"SessionStart"}"#);
    assert!(out.status.success());
    assert!(out.stdout.is_empty(), "handle must not print to stdout");
    assert!(state_dir.join("1.state").exists());
    assert_eq!(status(&state_dir, &[]), "●");

    let out = hook(
        &state_dir,
        Some("%2"),
        r#"{"hook_event_name":"PermissionRequest","tool_name":"Bash"}"#,
    );
    assert!(out.status.success());
    assert_eq!(status(&state_dir, &["--attention-icon", "A"]), "A");

    let out = hook(&state_dir, Some("%2"), r#"{"hook_event_name":"SessionEnd"}"#);
    assert!(out.status.success());
    assert!(!state_dir.join("2.state").exists());
    assert_eq!(status(&state_dir, &[]), "●");
}

#[test]
fn handle_outside_tmux_is_a_silent_noop() {
    let home = TempDir::new().expect("temp dir");
    let state_dir = home.path().join("state");

    let out = hook(&state_dir, None, r#"{"hook_event_name":"SessionStart"}"#);
    assert!(out.status.success());
    assert_eq!(status(&state_dir, &[]), "");
}

#[test]
fn status_with_no_state_prints_nothing() {
    let home = TempDir::new().expect("temp dir");
    assert_eq!(status(&home.path().join("missing"), &["--window", "@1"]), "");
}

#[test]
fn invalid_utf8_input_is_ignored() {
    let home = TempDir::new().expect("temp dir");
    let state_dir = home.path().join("state");

    let out = hook(&state_dir, Some("%1"), b"{\"event\":\"Session\xffStart\"}");
    assert!(out.status.success(), "exit: {:?}", out.status.code());
    assert!(!state_dir.join("1.state").exists());

    let out = hook(&state_dir, Some("%1"), b"\xfe\xff");
    assert!(out.status.success());
}

#[test]
fn status_does_not_create_log_directory() {
    let home = TempDir::new().expect("temp dir");
    let state_dir = home.path().join("state");
    std::fs::create_dir_all(&state_dir).expect("state dir");

    assert_eq!(status(&state_dir, &[]), "");
    assert!(!state_dir.join("logs").exists());

    let out = hook(&state_dir, Some("%1"), r#"{"event":"SessionStart"}"#);
    assert!(out.status.success());
    assert!(state_dir.join("logs").is_dir());
}
