use assert_cmd::Command;
use predicates::prelude::*;

/// Declining every prompt walks the full sequence without touching the
/// runtime, so this is safe to run anywhere.
#[test]
fn declining_everything_runs_no_commands() {
    let assert = Command::cargo_bin("rr")
        .expect("binary")
        .arg("cleanup")
        .write_stdin("n\nn\nn\nn\nn\nn\nn\nn\n")
        .assert()
        .success();

    assert
        .stdout(predicate::str::contains("Skipping:").count(8))
        .stdout(predicate::str::contains("Cleanup finished."))
        .stdout(predicate::str::contains("-> docker").not());
}

#[test]
fn end_of_input_is_a_clean_exit() {
    Command::cargo_bin("rr")
        .expect("binary")
        .arg("cleanup")
        .write_stdin("")
        .assert()
        .success()
        .stdout(predicate::str::contains("Cleanup finished."));
}

#[test]
fn prompts_appear_in_fixed_order() {
    let output = Command::cargo_bin("rr")
        .expect("binary")
        .arg("cleanup")
        .write_stdin("n\nn\nn\nn\nn\nn\nn\nn\n")
        .output()
        .expect("command run");

    let stdout = String::from_utf8(output.stdout).expect("utf8 stdout");
    let banners: Vec<&str> = stdout
        .lines()
        .filter(|line| line.starts_with("=== "))
        .collect();

    assert_eq!(
        banners,
        vec![
            "=== Stop all containers ===",
            "=== Remove all containers ===",
            "=== Remove all images ===",
            "=== Prune containers ===",
            "=== Prune images ===",
            "=== Prune volumes ===",
            "=== Prune networks ===",
            "=== Full system prune ===",
        ]
    );
}
