//! CLI integration tests

use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

/// Run the CLI with an isolated home directory and no inherited settings
fn run(home: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_ftype"))
        .args(args)
        .env("HOME", home)
        .env_remove("FTYPE_MODEL_PATH")
        .env_remove("FTYPE_MODEL_CONFIG_PATH")
        .env_remove("FTYPE_MODEL_SHA256")
        .env_remove("FTYPE_SETTINGS")
        .output()
        .expect("Failed to execute command")
}

/// Test that the CLI shows help
#[test]
fn test_cli_help() {
    let home = TempDir::new().unwrap();
    let output = run(home.path(), &["--help"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "CLI help should succeed");
    assert!(stdout.contains("Detect file types"), "Should show about text");
    assert!(stdout.contains("file"), "Should show file command");
    assert!(stdout.contains("dir"), "Should show dir command");
    assert!(stdout.contains("stdin"), "Should show stdin command");
    assert!(stdout.contains("--model"), "Should show model option");
}

/// Test that the CLI shows version
#[test]
fn test_cli_version() {
    let home = TempDir::new().unwrap();
    let output = run(home.path(), &["--version"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "CLI version should succeed");
    assert!(stdout.contains("ftype"), "Should show binary name");
}

/// Test dir subcommand help
#[test]
fn test_dir_help() {
    let home = TempDir::new().unwrap();
    let output = run(home.path(), &["dir", "--help"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "Dir help should succeed");
    assert!(stdout.contains("--recursive"), "Should show recursive option");
}

/// File command requires at least one path
#[test]
fn test_file_requires_paths() {
    let home = TempDir::new().unwrap();
    let output = run(home.path(), &["file"]);
    assert!(!output.status.success());
}

/// Without a model the CLI fails with a hint
#[test]
fn test_missing_model_configuration() {
    let home = TempDir::new().unwrap();
    let output = run(home.path(), &["file", "Cargo.toml"]);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(!output.status.success());
    assert!(stderr.contains("No model configured"), "stderr was: {}", stderr);
}

/// A configured but absent model file is reported as not found
#[test]
fn test_model_file_not_found() {
    let home = TempDir::new().unwrap();
    let models = TempDir::new().unwrap();
    std::fs::write(
        models.path().join("config.json"),
        r#"{"beg_size": 4, "mid_size": 0, "end_size": 4, "padding_token": 0,
            "min_file_size_for_dl": 8, "target_labels_space": ["txt", "json"]}"#,
    )
    .unwrap();
    let model = models.path().join("model.onnx");

    let output = run(
        home.path(),
        &["--model", model.to_str().unwrap(), "file", "Cargo.toml"],
    );
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(!output.status.success());
    assert!(stderr.contains("Path not found"), "stderr was: {}", stderr);
}

/// Model settings can come from a settings file
#[test]
fn test_settings_file_is_used() {
    let home = TempDir::new().unwrap();
    let settings = home.path().join("settings.toml");
    std::fs::write(&settings, "model_path = \"/nonexistent/model.onnx\"\n").unwrap();

    let output = run(
        home.path(),
        &["--settings", settings.to_str().unwrap(), "stdin"],
    );
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(!output.status.success());
    assert!(
        stderr.contains("/nonexistent/config.json"),
        "stderr was: {}",
        stderr
    );
}
