#![allow(missing_docs)]
#![allow(clippy::all)]

use std::fs;
use std::path::PathBuf;

use assert_cmd::Command;
use serde_json::Value;
use tempfile::TempDir;

const FIXTURE: &str = r#"
[[node]]
path = "/objects/a"
primary_type = "nt:folder"
mixins = ["fedora:object"]
[node.properties]
"dc:title" = "A"
"dc:subject" = ["rust", "rdf"]

[[node]]
path = "/objects/b"
primary_type = "nt:folder"

[[node]]
path = "/objects/c"
primary_type = "nt:folder"

[[extractor]]
type = "fedora:object"
id = "tree-properties"
"#;

fn setup() -> (TempDir, PathBuf, PathBuf) {
    let dir = TempDir::new().expect("tempdir");
    let fixture = dir.path().join("repo.toml");
    fs::write(&fixture, FIXTURE).expect("write fixture");
    let config = dir.path().join("fresco.toml");
    fs::write(&config, "base_uri = \"http://example.org/rest\"\n").expect("write config");
    (dir, fixture, config)
}

fn fresco(fixture: &PathBuf, config: &PathBuf) -> Command {
    let mut cmd = Command::cargo_bin("fresco").expect("binary");
    cmd.env_remove("RUST_LOG")
        .arg("--config")
        .arg(config)
        .arg("--fixture")
        .arg(fixture);
    cmd
}

#[test]
fn dump_prints_every_graph_as_text() {
    let (_dir, fixture, config) = setup();
    let output = fresco(&fixture, &config)
        .args(["dump", "/objects/a"])
        .output()
        .expect("run dump");
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let stdout = String::from_utf8(output.stdout).expect("utf8");
    assert!(stdout.contains("# subject http://example.org/rest/objects/a"));
    assert!(stdout.contains("# graph default"));
    assert!(stdout.contains("# graph tree"));
    assert!(stdout.contains("# graph problems (0 triples)"));
    assert!(stdout.contains(
        "<http://example.org/rest/objects/a> <http://purl.org/dc/elements/1.1/title> \"A\" ."
    ));
}

#[test]
fn dump_json_honours_the_child_window() {
    let (_dir, fixture, config) = setup();
    let output = fresco(&fixture, &config)
        .args(["--format", "json", "dump", "/objects", "--offset", "1", "--limit", "1"])
        .output()
        .expect("run dump");
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let report: Value = serde_json::from_slice(&output.stdout).expect("json");
    assert_eq!(report["subject"], "http://example.org/rest/objects");
    assert_eq!(report["context"]["uri"], "http://example.org/rest/objects");

    let tree: Vec<&str> = report["graphs"]["tree"]
        .as_array()
        .expect("tree graph")
        .iter()
        .filter_map(Value::as_str)
        .collect();
    let children: Vec<&&str> = tree.iter().filter(|t| t.contains("#hasChild>")).collect();
    assert_eq!(children.len(), 1);
    assert!(children[0].ends_with("<http://example.org/rest/objects/b> ."));
    assert!(tree.iter().any(|t| t.contains("#numberOfChildren> \"3\"")));
}

#[test]
fn negative_limit_lists_all_children() {
    let (_dir, fixture, config) = setup();
    let output = fresco(&fixture, &config)
        .args(["--format", "json", "dump", "/objects", "--limit", "-1"])
        .output()
        .expect("run dump");
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let report: Value = serde_json::from_slice(&output.stdout).expect("json");
    let children = report["graphs"]["tree"]
        .as_array()
        .expect("tree graph")
        .iter()
        .filter_map(Value::as_str)
        .filter(|t| t.contains("#hasChild>"))
        .count();
    assert_eq!(children, 3);
}

#[test]
fn extractors_lists_catalog_and_node_resolution() {
    let (_dir, fixture, config) = setup();
    let output = fresco(&fixture, &config)
        .arg("extractors")
        .output()
        .expect("run extractors");
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).expect("utf8");
    assert!(stdout.contains("fedora:object: tree-properties"));

    let output = fresco(&fixture, &config)
        .args(["--format", "json", "extractors", "/objects/b"])
        .output()
        .expect("run extractors");
    assert!(output.status.success());
    let report: Value = serde_json::from_slice(&output.stdout).expect("json");
    assert_eq!(report["entries"]["/objects/b"][0], "tree-properties");
}

#[test]
fn missing_node_exits_with_error() {
    let (_dir, fixture, config) = setup();
    let output = fresco(&fixture, &config)
        .args(["dump", "/objects/zzz"])
        .output()
        .expect("run dump");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("node not found: /objects/zzz"));
}
