// Drives the compiled binary with piped stdin. The game is line oriented,
// so no terminal is needed; a bound of 1 makes every round show zero.

use assert_cmd::Command;
use tempfile::tempdir;

fn run_game(args: &[&str], stdin: &str) -> (bool, String) {
    let dir = tempdir().unwrap();
    let config = dir.path().join("absent.json");
    let output = Command::cargo_bin("hexdec")
        .unwrap()
        .arg("--no-banner")
        .arg("--config")
        .arg(&config)
        .args(args)
        .write_stdin(stdin)
        .output()
        .unwrap();
    (
        output.status.success(),
        String::from_utf8(output.stdout).unwrap(),
    )
}

#[test]
fn wrong_answer_prints_summary_and_exits_zero() {
    let (ok, out) = run_game(&[], "1\nx2d\n0\n0\n5\n");

    assert!(ok);
    assert!(out.contains("Choose a maximal number [default is 256]: "));
    assert!(out.contains("Game mode (x2d, d2x, both) [x2d]: "));
    assert!(out.contains("To stop the game use CTRL+C"));
    assert_eq!(out.matches("* 0x0 = ").count(), 3);
    assert!(out.contains("Oops, you got that last one wrong..."));
    assert!(out.contains("You placed 3 iterations and your average response time was"));
}

#[test]
fn oversized_bound_is_clamped() {
    let (ok, out) = run_game(&[], "1000\nd2x\nzz\n");

    assert!(ok);
    assert!(out.contains("Number can't be greater than 256! Setting it to 256 for you :)"));
    assert!(out.contains("You placed"));
}

#[test]
fn flags_skip_the_prompts() {
    let (ok, out) = run_game(&["-m", "1", "-g", "d2x"], "0\n1\n");

    assert!(ok);
    assert!(!out.contains("Choose a maximal number"));
    assert!(!out.contains("Game mode"));
    assert_eq!(out.matches("* 0 = ").count(), 2);
    assert!(out.contains("You placed 2 iterations"));
}

#[test]
fn end_of_input_ends_the_session() {
    let (ok, out) = run_game(&["-m", "1", "-g", "x2d"], "0\n");

    assert!(ok);
    assert!(!out.contains("Oops"));
    assert!(out.contains("You placed 1 iterations"));
}

#[test]
fn defaults_file_changes_prompt_defaults() {
    let dir = tempdir().unwrap();
    let config = dir.path().join("config.json");
    std::fs::write(&config, r#"{ "upper_bound": 1, "mode": "d2x" }"#).unwrap();

    let output = Command::cargo_bin("hexdec")
        .unwrap()
        .arg("--no-banner")
        .arg("--config")
        .arg(&config)
        .write_stdin("\n\n7\n")
        .output()
        .unwrap();
    let out = String::from_utf8(output.stdout).unwrap();

    assert!(output.status.success());
    assert!(out.contains("[default is 1]"));
    assert!(out.contains("[d2x]"));
    assert!(out.contains("* 0 = "));
}

#[test]
fn invalid_flag_value_is_a_usage_error() {
    let output = Command::cargo_bin("hexdec")
        .unwrap()
        .args(["--game-mode", "sideways"])
        .write_stdin("")
        .output()
        .unwrap();
    assert!(!output.status.success());
}
