use assert_cmd::Command;
use predicates::prelude::*;

fn transcriptor(dir: &std::path::Path) -> Command {
    let mut cmd = Command::cargo_bin("transcriptor").unwrap();
    cmd.current_dir(dir)
        .env_remove("TRANSCRIPTOR_CONFIG")
        .env("HOME", dir)
        .env("XDG_CONFIG_HOME", dir.join(".config"))
        .env("RUST_LOG", "off");
    cmd
}

#[test]
fn test_help_lists_commands() {
    let dir = tempfile::tempdir().unwrap();
    transcriptor(dir.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("transcribe"))
        .stdout(predicate::str::contains("split"));
}

#[test]
fn test_missing_input_file() {
    let dir = tempfile::tempdir().unwrap();
    transcriptor(dir.path())
        .args(["transcribe", "-i", "missing.csv", "-o", "out.csv", "-q"])
        .assert()
        .failure()
        .stderr(predicate::str::starts_with("Error: Input file not found"));

    assert!(!dir.path().join("out.csv").exists());
}

#[test]
fn test_missing_columns_creates_no_output() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("videos.csv"), "Title;Link\nA;https://youtu.be/aaaaaaaaaaa\n").unwrap();

    transcriptor(dir.path())
        .args(["transcribe", "-q"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error: Invalid input: Missing required columns: Creator"));

    assert!(!dir.path().join("transcripts.csv").exists());
}

#[test]
fn test_invalid_config_file() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("transcriptor.yaml"), "service: [not, a, map]\n").unwrap();

    transcriptor(dir.path())
        .args(["config", "--show"])
        .assert()
        .failure()
        .stderr(predicate::str::starts_with("Unexpected error: Failed to parse config file"));
}

#[test]
fn test_config_show_uses_local_file() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("transcriptor.yaml"),
        "input:\n  delimiter: ','\nbatch:\n  default_language: es\n",
    )
    .unwrap();

    transcriptor(dir.path())
        .args(["config", "--show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Input delimiter: ','"))
        .stdout(predicate::str::contains("Default language: es"));
}

#[test]
fn test_split_command() {
    let dir = tempfile::tempdir().unwrap();
    let mut content = String::from("Title;Link;Creator\n");
    for i in 0..5 {
        content.push_str(&format!("Video {};https://youtu.be/{:011};Someone\n", i, i));
    }
    std::fs::write(dir.path().join("videos.csv"), content).unwrap();

    transcriptor(dir.path())
        .args(["split", "--chunk-size", "2", "--out-dir", "parts"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Split 5 videos into 3 files"));

    assert!(dir.path().join("parts").join("videos_0001.csv").exists());
    assert!(dir.path().join("parts").join("videos_0003.csv").exists());
    assert!(!dir.path().join("parts").join("videos_0004.csv").exists());
}

#[test]
fn test_rejects_bad_delimiter_argument() {
    let dir = tempfile::tempdir().unwrap();
    transcriptor(dir.path())
        .args(["transcribe", "--delimiter", ";;"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("single ASCII character"));
}

#[test]
fn test_transcribe_runs_without_subcommand() {
    let dir = tempfile::tempdir().unwrap();
    transcriptor(dir.path())
        .args(["-i", "missing.csv", "-o", "out.csv", "-q"])
        .assert()
        .failure()
        .stderr(predicate::str::starts_with("Error: Input file not found"));
}
