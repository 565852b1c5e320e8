use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::{tempdir, TempDir};

fn setup_test_directory() -> TempDir {
    let dir = tempdir().unwrap();

    fs::create_dir_all(dir.path().join("repo/Source Code")).unwrap();
    fs::write(dir.path().join("repo/Source Code/My C++ File#1.txt"), "cpp").unwrap();
    fs::write(dir.path().join("repo/Video & Audio.MP4"), "media").unwrap();
    fs::write(dir.path().join("repo/clean-name.txt"), "ok").unwrap();

    fs::create_dir_all(dir.path().join("repo/build/Generated Stuff")).unwrap();
    fs::write(dir.path().join("repo/build/Generated Stuff/Out File.o"), "obj").unwrap();

    dir
}

// Runs from inside the temp dir so no stray rules.json is picked up
fn reponamer(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("reponamer").unwrap();
    cmd.current_dir(dir).env_remove("REPONAMER_RULES");
    cmd
}

#[test]
fn test_missing_folder_fails() {
    let dir = tempdir().unwrap();

    reponamer(dir.path())
        .args(["rename", "does-not-exist"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Folder does not exist"));
}

#[test]
fn test_dry_run_lists_without_renaming() {
    let dir = setup_test_directory();

    reponamer(dir.path())
        .args(["rename", "repo"])
        .assert()
        .success()
        .stdout(predicate::str::contains("my-cpp-file1.txt"))
        .stdout(predicate::str::contains("video-and-audio.mp4"))
        .stdout(predicate::str::contains("source-code"))
        .stdout(predicate::str::contains("No changes applied"));

    assert!(dir.path().join("repo/Source Code/My C++ File#1.txt").exists());
    assert!(dir.path().join("repo/Video & Audio.MP4").exists());
}

#[test]
fn test_apply_renames_tree() {
    let dir = setup_test_directory();

    reponamer(dir.path())
        .args(["rename", "repo", "--apply", "--style", "snake"])
        .assert()
        .success()
        .stdout(predicate::str::contains("All changes have been applied"));

    assert!(dir.path().join("repo/source_code/my_cpp_file1.txt").exists());
    assert!(dir.path().join("repo/video_and_audio.mp4").exists());
    assert!(!dir.path().join("repo/clean-name.txt").exists());
    assert!(dir.path().join("repo/clean_name.txt").exists());
}

#[test]
fn test_ignore_override() {
    let dir = setup_test_directory();

    reponamer(dir.path())
        .args(["rename", "repo", "--apply", "--ignore", "build"])
        .assert()
        .success();

    assert!(dir.path().join("repo/build/Generated Stuff/Out File.o").exists());
    assert!(dir.path().join("repo/source-code/my-cpp-file1.txt").exists());
}

#[test]
fn test_default_ignore_renames_build() {
    let dir = setup_test_directory();

    reponamer(dir.path())
        .args(["rename", "repo", "--apply"])
        .assert()
        .success();

    assert!(dir.path().join("repo/build/generated-stuff/out-file.o").exists());
}

#[test]
fn test_nothing_to_rename() {
    let dir = tempdir().unwrap();
    fs::create_dir_all(dir.path().join("tidy/src")).unwrap();
    fs::write(dir.path().join("tidy/src/main.rs"), "").unwrap();

    reponamer(dir.path())
        .args(["rename", "tidy", "--apply"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No files or folders need to be renamed"));
}

#[test]
fn test_csv_report() {
    let dir = setup_test_directory();

    reponamer(dir.path())
        .args(["rename", "repo", "--report", "changes.csv"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Report written to changes.csv"));

    let report = fs::read_to_string(dir.path().join("changes.csv")).unwrap();
    assert!(report.starts_with("Old Path,New Path\n"));
    assert!(report.contains("video-and-audio.mp4"));
}

#[test]
fn test_report_format_override() {
    let dir = setup_test_directory();

    reponamer(dir.path())
        .args(["rename", "repo", "--report", "changes.log", "--report-format", "json"])
        .assert()
        .success();

    let report = fs::read_to_string(dir.path().join("changes.log")).unwrap();
    let value: serde_json::Value = serde_json::from_str(&report).unwrap();
    assert_eq!(value["style"], "kebab");
}

#[test]
fn test_clean_command() {
    let dir = tempdir().unwrap();

    reponamer(dir.path())
        .args(["clean", "My C++ File#1.txt", "weird   name.txt", "--style", "upper-camel"])
        .assert()
        .success()
        .stdout(predicate::str::contains("My C++ File#1.txt → MyCppFile1.txt"))
        .stdout(predicate::str::contains("weird   name.txt → WeirdName.txt"));
}

#[test]
fn test_rules_set_and_use() {
    let dir = tempdir().unwrap();

    reponamer(dir.path())
        .args(["rules", "set", r#"{"@": "at", " ": "_"}"#])
        .assert()
        .success();

    let saved = fs::read_to_string(dir.path().join("rules.json")).unwrap();
    assert!(saved.contains("\"@\": \"at\""));

    reponamer(dir.path())
        .args(["clean", "Me @ Home"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Me @ Home → me-at-home"));
}

#[test]
fn test_rules_set_rejects_malformed_json() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("rules.json"), r#"{"x": "y"}"#).unwrap();

    reponamer(dir.path())
        .args(["rules", "set", "{ broken"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid rules"));

    assert_eq!(fs::read_to_string(dir.path().join("rules.json")).unwrap(), r#"{"x": "y"}"#);
}

#[test]
fn test_rules_show_defaults_when_file_malformed() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("rules.json"), "not json").unwrap();

    reponamer(dir.path())
        .args(["rules", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"c++\": \"cpp\""));
}

#[test]
fn test_rules_path_from_env() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("custom.json"), r#"{"foo": "bar"}"#).unwrap();

    reponamer(dir.path())
        .env("REPONAMER_RULES", "custom.json")
        .args(["clean", "Foo"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Foo → bar"));
}
