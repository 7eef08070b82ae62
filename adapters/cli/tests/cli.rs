use std::{
    io::Write,
    process::{Command, Output, Stdio},
};

fn fixture(name: &str) -> String {
    format!("{}/tests/fixtures/{name}", env!("CARGO_MANIFEST_DIR"))
}

fn goblin_hunt(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_goblin-hunt"))
        .args(args)
        .env_remove("GOBLIN_HUNT_LOG")
        .output()
        .expect("failed to launch goblin-hunt binary")
}

fn stdout_of(output: &Output) -> String {
    assert!(
        output.status.success(),
        "goblin-hunt failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8(output.stdout.clone()).expect("stdout is utf-8")
}

#[test]
fn replay_of_perfect_player_wins_once() {
    let script = fixture("ten_claims.script");
    let stdout = stdout_of(&goblin_hunt(&["--seed", "7", "replay", &script]));
    assert!(stdout.contains("session 2 | hits 0/10 | misses 0/5"));
    assert!(stdout.ends_with("wins 1 | losses 0\n"));
}

#[test]
fn replay_of_idle_player_loses_once() {
    let script = fixture("idle.script");
    let stdout = stdout_of(&goblin_hunt(&["--seed", "7", "replay", &script]));
    assert!(stdout.ends_with("wins 0 | losses 1\n"));
}

#[test]
fn event_transcript_is_json_lines() {
    let script = fixture("ten_claims.script");
    let stdout = stdout_of(&goblin_hunt(&[
        "--seed", "7", "--board-size", "8", "replay", "--events", &script,
    ]));

    let events: Vec<serde_json::Value> = stdout
        .lines()
        .map(|line| serde_json::from_str(line).expect("each line is json"))
        .collect();
    assert_eq!(
        events.first(),
        Some(&serde_json::json!({ "SessionStarted": { "session": 1 } }))
    );
    let ended: Vec<&serde_json::Value> = events
        .iter()
        .filter_map(|event| event.get("SessionEnded"))
        .collect();
    assert_eq!(
        ended,
        vec![&serde_json::json!({ "outcome": "Won", "hits": 10, "misses": 0 })]
    );
}

#[test]
fn same_seed_replays_identically() {
    let script = fixture("idle.script");
    let args = ["--seed", "99", "replay", "--events", script.as_str()];
    let first = stdout_of(&goblin_hunt(&args));
    let second = stdout_of(&goblin_hunt(&args));
    assert_eq!(first, second);
}

#[test]
fn config_file_sets_board_and_timing() {
    let config = fixture("small_board.toml");
    let script = fixture("idle.script");
    let stdout = stdout_of(&goblin_hunt(&["--config", &config, "replay", &script]));
    // Half-second ticks lose a session every 3000ms of idling.
    assert!(stdout.starts_with(". .\n. .\nsession 3 |"), "{stdout}");
    assert!(stdout.ends_with("wins 0 | losses 2\n"));
}

#[test]
fn malformed_script_reports_line() {
    let output = goblin_hunt(&["replay", &fixture("broken.script")]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("line 2: unknown command `dance`"), "{stderr}");
}

#[test]
fn zero_board_size_is_rejected() {
    let output = goblin_hunt(&["--board-size", "0", "replay", &fixture("idle.script")]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("board size must be positive"), "{stderr}");
}

#[test]
fn play_reads_commands_from_stdin() {
    let mut child = Command::new(env!("CARGO_BIN_EXE_goblin-hunt"))
        .args(["--seed", "3", "play"])
        .env_remove("GOBLIN_HUNT_LOG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to launch goblin-hunt binary");
    child
        .stdin
        .take()
        .expect("stdin is piped")
        .write_all(b"wait 1000\nclick target\nquit\n")
        .expect("write commands");

    let stdout = stdout_of(&child.wait_with_output().expect("binary exits"));
    assert!(stdout.starts_with("Welcome to Goblin Hunt."));
    assert!(stdout.contains("got it at cell"));
    assert!(stdout.contains("hits 1/10"));
}

#[test]
fn autoplay_finishes_a_session() {
    let stdout = stdout_of(&goblin_hunt(&[
        "--seed",
        "5",
        "autoplay",
        "--accuracy",
        "1",
        "--reaction-ms",
        "200",
    ]));
    assert!(stdout.contains("session won with 10 hits and 0 misses"));
    assert!(stdout.contains("You win! Your points are 10"));
}

#[test]
fn theme_flag_reaches_the_board() {
    let script = fixture("idle.script");
    let stdout = stdout_of(&goblin_hunt(&["--theme", "arctic", "replay", &script]));
    assert!(stdout.contains("| arctic\n"), "{stdout}");

    let output = goblin_hunt(&["--theme", "volcano", "replay", &script]);
    assert!(!output.status.success());
}

#[test]
fn safety_timeout_shorter_than_tick_is_rejected() {
    let output = goblin_hunt(&["--safety-ms", "0", "replay", &fixture("idle.script")]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("shorter than the 1000ms tick interval"), "{stderr}");
}

#[test]
fn unknown_command_with_argument_is_reported_as_unknown() {
    let output = goblin_hunt(&["replay", &fixture("broken.script")]);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!stderr.contains("trailing input"), "{stderr}");
}
