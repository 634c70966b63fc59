use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::fs;
use tempfile::tempdir;

const DOC_JSON: &str = r#"{"type":"doc","content":[
  {"type":"heading","attrs":{"level":2},"content":[{"type":"text","text":"Setup"}]},
  {"type":"paragraph","content":[{"type":"text","text":"Hello"}]}
]}"#;

#[test]
fn inspect_prints_tree() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("doc.json");
    fs::write(&input, DOC_JSON).unwrap();

    let mut cmd = cargo_bin_cmd!("quire");
    cmd.arg("inspect").arg(&input);

    cmd.assert().success().stdout(
        predicate::str::starts_with("⧉ doc (2 blocks")
            .and(predicate::str::contains("├─ § heading {level=2} \"Setup\""))
            .and(predicate::str::contains("└─ ¶ paragraph \"Hello\"")),
    );
}

#[test]
fn inspect_with_positions() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("doc.json");
    fs::write(&input, DOC_JSON).unwrap();

    let mut cmd = cargo_bin_cmd!("quire");
    cmd.arg("inspect").arg(&input).arg("--extra-show-pos");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("000 ├─ § heading").and(predicate::str::contains("007 └─ ¶ paragraph")));
}

#[test]
fn inspect_markdown_source() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("notes.md");
    fs::write(&input, "- [x] done\n- [ ] open\n").unwrap();

    let mut cmd = cargo_bin_cmd!("quire");
    cmd.arg("inspect").arg(&input);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("taskList (2 items)"));
}

#[test]
fn languages_lists_configured_extras() {
    let mut cmd = cargo_bin_cmd!("quire");
    cmd.arg("languages");
    cmd.assert().success().stdout(
        predicate::str::contains("mermaid\n").and(predicate::str::contains("rust\n")),
    );
}
