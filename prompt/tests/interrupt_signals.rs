// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! `SIGINT` handling that ends the process. Each test re-runs itself in a child
//! process, which does the interesting part and is expected to die by the signal.

#![cfg(unix)]

use std::{io,
          os::unix::process::ExitStatusExt,
          process::{Command, Output},
          sync::Arc,
          thread,
          time::Duration};

use pretty_assertions::assert_eq;
use r3bl_prompt::{is_sigint_hooked,
                  test_utils::TerminalMock,
                  InterruptForwarder,
                  ProcessInterruptForwarder,
                  ProgressBar};
use serial_test::serial;
use signal_hook::{consts::SIGINT, low_level};

/// Names the test a child process should run its body for.
const CHILD_TEST_ENV: &str = "R3BL_PROMPT_SIGNAL_CHILD";

const SURVIVED_MARKER: &str = "process survived SIGINT";

fn is_child_for(test_name: &str) -> bool {
    std::env::var(CHILD_TEST_ENV).as_deref() == Ok(test_name)
}

fn run_in_child(test_name: &str) -> Output {
    Command::new(std::env::current_exe().unwrap())
        .args([test_name, "--exact", "--nocapture", "--test-threads=1"])
        .env(CHILD_TEST_ENV, test_name)
        .output()
        .unwrap()
}

fn assert_killed_by_sigint(output: &Output) {
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(output.status.signal(), Some(SIGINT), "stdout: {stdout:?}");
    assert!(!stdout.contains(SURVIVED_MARKER), "{stdout:?}");
}

fn wait_then_report_survival() {
    thread::sleep(Duration::from_secs(5));
    println!("{SURVIVED_MARKER}");
}

fn watched_bar() -> ProgressBar<io::Stdout> {
    ProgressBar::new("copy ", io::stdout(), Arc::new(TerminalMock::default()))
}

#[test]
#[serial]
fn test_forwarded_interrupt_terminates() {
    const NAME: &str = "test_forwarded_interrupt_terminates";
    if is_child_for(NAME) {
        ProcessInterruptForwarder.forward_interrupt().unwrap();
        wait_then_report_survival();
        return;
    }

    assert_killed_by_sigint(&run_in_child(NAME));
}

#[test]
#[serial]
fn test_forwarded_interrupt_terminates_after_progress_bar_ran() {
    const NAME: &str = "test_forwarded_interrupt_terminates_after_progress_bar_ran";
    if is_child_for(NAME) {
        let mut bar = watched_bar();
        bar.start().unwrap();
        bar.print(0.5).unwrap();
        bar.stop().unwrap();
        assert!(is_sigint_hooked());

        ProcessInterruptForwarder.forward_interrupt().unwrap();
        wait_then_report_survival();
        return;
    }

    assert_killed_by_sigint(&run_in_child(NAME));
}

#[test]
#[serial]
fn test_interrupt_during_progress_shows_cursor_and_terminates() {
    const NAME: &str = "test_interrupt_during_progress_shows_cursor_and_terminates";
    if is_child_for(NAME) {
        let mut bar = watched_bar();
        bar.start().unwrap();
        bar.print(0.25).unwrap();

        low_level::raise(SIGINT).unwrap();
        wait_then_report_survival();
        drop(bar);
        return;
    }

    let output = run_in_child(NAME);
    assert_killed_by_sigint(&output);
    let stdout = String::from_utf8_lossy(&output.stdout);
    let hidden_at = stdout.find("\x1b[?25l").unwrap();
    let shown_at = stdout.rfind("\x1b[?25h").unwrap();
    assert!(hidden_at < shown_at, "{stdout:?}");
}
