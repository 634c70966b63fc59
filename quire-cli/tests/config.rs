use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::fs;
use tempfile::tempdir;

#[test]
fn markdown_respects_heading_style_from_config() {
    let dir = tempdir().unwrap();
    let input_path = dir.path().join("page.html");
    fs::write(&input_path, "<h1>Title</h1><p>Body</p>").unwrap();

    let config_path = dir.path().join("quire.toml");
    fs::write(
        &config_path,
        r#"[markdown]
heading_style = "setext"
"#,
    )
    .unwrap();

    let mut cmd = cargo_bin_cmd!("quire");
    cmd.arg(input_path.as_os_str())
        .arg("--to")
        .arg("markdown")
        .arg("--config")
        .arg(config_path.as_os_str());

    let output = cmd.assert().success().get_output().stdout.clone();
    let stdout = String::from_utf8(output).unwrap();
    assert!(stdout.contains("Title\n=====\n"));
    assert!(!stdout.contains("# Title"));
}

#[test]
fn quire_toml_in_working_directory_is_picked_up() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("page.html"), "<p>One</p><p>Two</p>").unwrap();
    fs::write(
        dir.path().join("quire.toml"),
        "[text]\nblock_separator = \" | \"\n",
    )
    .unwrap();

    let mut cmd = cargo_bin_cmd!("quire");
    cmd.current_dir(dir.path())
        .arg("page.html")
        .arg("--to")
        .arg("text");

    cmd.assert().success().stdout("One | Two");
}

#[test]
fn languages_from_config_are_listed() {
    let dir = tempdir().unwrap();
    let config_path = dir.path().join("quire.toml");
    fs::write(&config_path, "[code]\nlanguages = [\"zig\"]\n").unwrap();

    let mut cmd = cargo_bin_cmd!("quire");
    cmd.arg("languages").arg("--config").arg(&config_path);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("zig\n"));
}

#[test]
fn missing_config_file_fails() {
    let mut cmd = cargo_bin_cmd!("quire");
    cmd.arg("languages").arg("--config").arg("/nonexistent/quire.toml");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load configuration"));
}
