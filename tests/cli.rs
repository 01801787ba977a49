//! CLI behavior tests: exit codes, output formats, serve, init.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;

const INTRODUCTION: &str = "test-data/transcripts/introduction.txt";
const SHORT: &str = "test-data/transcripts/short.txt";
const TRANSCRIPTS_DIR: &str = "test-data/transcripts";
const KEYWORDS_RUBRIC: &str = "test-data/rubrics/keywords.json";

fn scorer_cmd() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_transcript-scorer"));
    cmd.env_remove("RUBRIC_PATH");
    cmd
}

#[test]
fn no_args_returns_error_not_panic() {
    let mut cmd = scorer_cmd();
    cmd.assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("PATH"));
}

#[test]
fn below_threshold_exit_1() {
    let mut cmd = scorer_cmd();
    cmd.arg(SHORT).arg("--threshold").arg("90");
    cmd.assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("below threshold 90"));
}

#[test]
fn above_threshold_exit_0() {
    let mut cmd = scorer_cmd();
    cmd.arg(INTRODUCTION).arg("--threshold").arg("20");
    cmd.assert().success();
}

#[test]
fn json_single_transcript_is_wire_format() {
    let mut cmd = scorer_cmd();
    cmd.arg(INTRODUCTION).arg("--json");
    let output = cmd.output().unwrap();
    assert!(output.status.success());

    let s = String::from_utf8_lossy(&output.stdout);
    let value: serde_json::Value = serde_json::from_str(s.trim()).expect("valid JSON");
    let object = value.as_object().unwrap();
    assert_eq!(object.len(), 3);
    assert_eq!(value["word_count"], 131);
    assert!(value["overall_score"].as_u64().unwrap() <= 100);

    let names: Vec<&str> = value["criteria"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["criterion_name"].as_str().unwrap())
        .collect();
    assert_eq!(
        names,
        ["Length", "Vocabulary Diversity", "Sentence Structure", "Filler Words"]
    );
}

#[test]
fn json_directory_has_results_and_summary() {
    let mut cmd = scorer_cmd();
    cmd.arg(TRANSCRIPTS_DIR).arg("--json");
    let output = cmd.output().unwrap();
    assert!(output.status.success());

    let value: serde_json::Value =
        serde_json::from_str(String::from_utf8_lossy(&output.stdout).trim()).unwrap();
    let results = value["results"].as_array().unwrap();
    // introduction.txt, nested/standup.md, rambling.txt, short.txt; audio.wav is skipped
    assert_eq!(results.len(), 4);
    assert!(results[0]["path"]
        .as_str()
        .unwrap()
        .ends_with("introduction.txt"));
    assert_eq!(value["summary"]["transcripts_scored"], 4);
    assert!(value["summary"]["average_grade"].is_string());
}

#[test]
fn stdin_transcript() {
    let mut cmd = scorer_cmd();
    cmd.arg("-")
        .arg("--json")
        .write_stdin("The quick brown fox");
    let output = cmd.output().unwrap();
    assert!(output.status.success());

    let value: serde_json::Value =
        serde_json::from_str(String::from_utf8_lossy(&output.stdout).trim()).unwrap();
    assert_eq!(value["word_count"], 4);
}

#[test]
fn empty_stdin_exit_2() {
    let mut cmd = scorer_cmd();
    cmd.arg("-").write_stdin("   \n");
    cmd.assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("No transcript provided"));
}

#[test]
fn file_not_found_exit_2() {
    let mut cmd = scorer_cmd();
    cmd.arg("test-data/does-not-exist.txt");
    cmd.assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("Path does not exist"));
}

#[test]
fn partial_failure_still_scores_the_rest() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("good.txt"),
        "We shipped the release. It went well.",
    )
    .unwrap();
    fs::write(dir.path().join("empty.txt"), "  \n").unwrap();

    let mut cmd = scorer_cmd();
    cmd.arg(dir.path()).arg("--quiet");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("good.txt: "))
        .stderr(predicate::str::contains("empty.txt"))
        .stderr(predicate::str::contains("No transcript provided"));
}

#[test]
fn every_transcript_failed_exit_2() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("blank.txt"), "").unwrap();
    fs::write(dir.path().join("spaces.txt"), "   ").unwrap();

    let mut cmd = scorer_cmd();
    cmd.arg(dir.path());
    cmd.assert().failure().code(2);
}

#[test]
fn empty_directory_exit_2() {
    let dir = tempfile::tempdir().unwrap();
    let mut cmd = scorer_cmd();
    cmd.arg(dir.path());
    cmd.assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("No transcript files found"));
}

#[test]
fn quiet_output_one_line_per_transcript() {
    let mut cmd = scorer_cmd();
    cmd.arg(INTRODUCTION).arg("--quiet");
    let output = cmd.output().unwrap();
    assert!(output.status.success());

    let s = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<&str> = s.lines().collect();
    assert_eq!(lines.len(), 1);
    assert!(lines[0].contains("introduction.txt: "));
    assert!(lines[0].ends_with(')'));
}

#[test]
fn console_output_lists_criteria() {
    let mut cmd = scorer_cmd();
    cmd.arg(INTRODUCTION).arg("--verbose").env("NO_COLOR", "1");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Transcript Evaluation"))
        .stdout(predicate::str::contains("Sentence Structure"))
        .stdout(predicate::str::contains("Good length: 131 words"))
        .stdout(predicate::str::contains("metric: word count | weight: 1.5"));
}

#[test]
fn explicit_config_changes_rubric() {
    let mut cmd = scorer_cmd();
    cmd.arg(INTRODUCTION)
        .arg("--json")
        .arg("--config")
        .arg(KEYWORDS_RUBRIC);
    let output = cmd.output().unwrap();
    assert!(output.status.success());

    let value: serde_json::Value =
        serde_json::from_str(String::from_utf8_lossy(&output.stdout).trim()).unwrap();
    let criteria = value["criteria"].as_array().unwrap();
    assert_eq!(criteria.len(), 2);
    assert_eq!(criteria[1]["criterion_name"], "Topic Keywords");
    assert_eq!(criteria[1]["metric"], "3/4");
}

#[test]
fn rubric_path_env_is_used() {
    let mut cmd = scorer_cmd();
    cmd.arg(INTRODUCTION)
        .arg("--json")
        .env("RUBRIC_PATH", KEYWORDS_RUBRIC);
    let output = cmd.output().unwrap();
    assert!(output.status.success());

    let value: serde_json::Value =
        serde_json::from_str(String::from_utf8_lossy(&output.stdout).trim()).unwrap();
    assert_eq!(value["criteria"].as_array().unwrap().len(), 2);
}

#[test]
fn invalid_config_exit_2() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("bad.json");
    fs::write(&config, r#"{ "disabled": ["Nonexistent"] }"#).unwrap();

    let mut cmd = scorer_cmd();
    cmd.arg(INTRODUCTION).arg("--config").arg(&config);
    cmd.assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("unknown criterion 'Nonexistent'"));
}

#[test]
fn config_threshold_applies_without_flag() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join(".scorerc.json"), r#"{ "threshold": 95 }"#).unwrap();
    fs::copy(SHORT, dir.path().join("short.txt")).unwrap();

    let mut cmd = scorer_cmd();
    cmd.arg(dir.path().join("short.txt"));
    cmd.assert().failure().code(1);
}

#[test]
fn ignore_globs_skip_files() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join(".scorerc.json"),
        r#"{ "ignore": ["**/drafts/**"] }"#,
    )
    .unwrap();
    fs::create_dir(dir.path().join("drafts")).unwrap();
    fs::copy(INTRODUCTION, dir.path().join("final.txt")).unwrap();
    fs::copy(SHORT, dir.path().join("drafts/early.txt")).unwrap();

    let mut cmd = scorer_cmd();
    cmd.arg(dir.path()).arg("--quiet");
    let output = cmd.output().unwrap();
    assert!(output.status.success());

    let s = String::from_utf8_lossy(&output.stdout);
    assert_eq!(s.lines().count(), 1);
    assert!(s.contains("final.txt"));
}

#[test]
fn serve_answers_each_line() {
    let input = concat!(
        r#"{"transcript": "The quick brown fox"}"#,
        "\n",
        r#"{"transcript": 7}"#,
        "\n",
        "\n",
        r#"{"transcript": "   "}"#,
        "\n"
    );

    let mut cmd = scorer_cmd();
    cmd.arg("serve").write_stdin(input);
    let output = cmd.output().unwrap();
    assert!(output.status.success());

    let responses: Vec<serde_json::Value> = String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert_eq!(responses.len(), 3);
    assert_eq!(responses[0]["status"], 200);
    assert_eq!(responses[0]["body"]["word_count"], 4);
    assert_eq!(responses[1]["status"], 400);
    assert_eq!(responses[2]["status"], 400);
    assert_eq!(responses[2]["body"]["error"], "No transcript provided");
}

#[test]
fn init_creates_config() {
    let dir = tempfile::tempdir().unwrap();
    let mut cmd = scorer_cmd();
    cmd.arg("init")
        .arg("--dir")
        .arg(dir.path())
        .arg("--threshold")
        .arg("65");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("threshold=65"));

    let written = fs::read_to_string(dir.path().join(".scorerc.json")).unwrap();
    let value: serde_json::Value = serde_json::from_str(&written).unwrap();
    assert_eq!(value["threshold"], 65);
    assert_eq!(value["criteria"].as_array().unwrap().len(), 4);
    assert_eq!(value["criteria"][0]["kind"], "length");
}

#[test]
fn init_keeps_existing_config() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(".scorerc.json");
    fs::write(&path, r#"{ "threshold": 10 }"#).unwrap();

    let mut cmd = scorer_cmd();
    cmd.arg("init").arg("--dir").arg(dir.path());
    cmd.assert()
        .success()
        .stderr(predicate::str::contains("already exists"));

    assert_eq!(fs::read_to_string(&path).unwrap(), r#"{ "threshold": 10 }"#);
}

#[test]
fn init_output_is_a_loadable_rubric() {
    let dir = tempfile::tempdir().unwrap();
    scorer_cmd()
        .arg("init")
        .arg("--dir")
        .arg(dir.path())
        .assert()
        .success();
    fs::copy(INTRODUCTION, dir.path().join("talk.txt")).unwrap();

    let mut cmd = scorer_cmd();
    cmd.arg(dir.path().join("talk.txt")).arg("--quiet");
    cmd.assert().success();
}
