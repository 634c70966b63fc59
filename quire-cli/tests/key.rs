use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::fs;
use tempfile::tempdir;

const TABS_THEN_PARAGRAPH: &str = r#"{"type":"doc","content":[
  {"type":"tabs","content":[
    {"type":"tab","attrs":{"title":"First"},"content":[
      {"type":"paragraph","content":[{"type":"text","text":"Hello"}]}
    ]}
  ]},
  {"type":"paragraph","content":[{"type":"text","text":"World"}]}
]}"#;

#[test]
fn backspace_merges_paragraph_into_tab() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("doc.json");
    fs::write(&input, TABS_THEN_PARAGRAPH).unwrap();

    let mut cmd = cargo_bin_cmd!("quire");
    cmd.arg("key")
        .arg(&input)
        .arg("backspace")
        .arg("--anchor")
        .arg("12");

    let output = cmd.assert().success().get_output().stdout.clone();
    let json: serde_json::Value = serde_json::from_slice(&output).unwrap();
    let content = json["content"].as_array().unwrap();
    assert_eq!(content.len(), 1);
    let tab = &content[0]["content"][0];
    assert_eq!(tab["attrs"]["title"], "First");
    assert_eq!(tab["content"][1]["content"][0]["text"], "World");
}

#[test]
fn backspace_inside_text_declines() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("doc.json");
    fs::write(&input, TABS_THEN_PARAGRAPH).unwrap();

    let mut cmd = cargo_bin_cmd!("quire");
    cmd.arg("key")
        .arg(&input)
        .arg("backspace")
        .arg("--anchor")
        .arg("13");

    cmd.assert().success().stdout("declined\n");
}

#[test]
fn tab_indents_code() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("doc.json");
    fs::write(
        &input,
        r#"{"type":"doc","content":[{"type":"codeBlock","content":[{"type":"text","text":"x"}]}]}"#,
    )
    .unwrap();

    let mut cmd = cargo_bin_cmd!("quire");
    cmd.arg("key").arg(&input).arg("tab").arg("--anchor").arg("1");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("\"text\": \"\u{a0}\u{a0}x\""));
}

#[test]
fn invalid_document_is_an_error() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("doc.json");
    fs::write(&input, r#"{"type":"doc","content":[{"type":"text","text":"loose"}]}"#).unwrap();

    let mut cmd = cargo_bin_cmd!("quire");
    cmd.arg("key")
        .arg(&input)
        .arg("backspace")
        .arg("--anchor")
        .arg("0");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Parse error"));
}
