use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use tempfile::tempdir;

fn fixture(path: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join(path)
}

fn path_as_str(path: &Path) -> &str {
    path.to_str().expect("utf-8 path")
}

#[test]
fn convert_writes_nml_topology() {
    let dir = tempdir().expect("tempdir");
    let output = dir.path().join("topology.xml");

    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("topology-translator"));
    cmd.arg("convert")
        .arg(fixture("fixtures/nmwg-esnet.xml"))
        .arg("--output")
        .arg(path_as_str(&output))
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "topology=urn:ogf:network:es.net:2013:",
        ))
        .stdout(predicate::str::contains("links=7"))
        .stdout(predicate::str::contains("ports=4"));

    let xml = fs::read_to_string(&output).expect("read output");
    let root = xml_tree::parse_str(&xml).expect("parse output");
    assert_eq!(root.tag, "nml:Topology");
    assert_eq!(root.attribute("id"), Some("urn:ogf:network:es.net:2013:"));
    assert_eq!(root.children_named("BidirectionalPort").count(), 4);
    assert!(xml.contains("urn:ogf:network:es.net:2013::albu-cr5:xe-6_0_0:cust1:in"));
    assert!(!xml.contains("xe-1_0_0:star-cr5"));
    assert!(!xml.contains("broken"));
}

#[test]
fn convert_applies_configuration_and_writes_mapping() {
    let dir = tempdir().expect("tempdir");
    let output = dir.path().join("topology.xml");
    let mapping = dir.path().join("stps.json");

    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("topology-translator"));
    cmd.arg("convert")
        .arg(fixture("fixtures/nmwg-esnet.xml"))
        .arg("-o")
        .arg(path_as_str(&output))
        .arg("--mapping")
        .arg(path_as_str(&mapping))
        .arg("--config")
        .arg(fixture("fixtures/translator.toml"))
        .assert()
        .success()
        .stdout(predicate::str::contains("ports=3"));

    let xml = fs::read_to_string(&output).expect("read output");
    assert!(xml.contains("urn:ogf:network:internet2.edu:2013:chic:esnet:out"));
    assert!(xml.contains("1780-1790"));
    assert!(!xml.contains("orphan"));

    let stps: Value =
        serde_json::from_str(&fs::read_to_string(&mapping).expect("read mapping")).expect("json");
    let stps = stps.as_array().expect("array");
    assert_eq!(stps.len(), 7);
    assert!(stps.iter().any(|stp| {
        stp["stpId"] == "urn:ogf:network:es.net:2013::star-cr5:xe-4_0_0:orphan"
            && stp["oscarsId"] == "urn:ogf:network:domain=es.net:node=star-cr5:port=xe-4/0/0:link=orphan"
    }));
}

#[test]
fn convert_refuses_to_overwrite_input() {
    let dir = tempdir().expect("tempdir");
    let input = dir.path().join("nmwg.xml");
    fs::copy(fixture("fixtures/nmwg-esnet.xml"), &input).expect("copy fixture");
    let before = fs::read_to_string(&input).expect("read input");

    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("topology-translator"));
    cmd.arg("convert")
        .arg(path_as_str(&input))
        .arg("--output")
        .arg(path_as_str(&input))
        .assert()
        .failure()
        .stderr(predicate::str::contains("refusing to overwrite source topology"));

    assert_eq!(fs::read_to_string(&input).expect("read input"), before);
}

#[test]
fn convert_rejects_multiple_domains() {
    let dir = tempdir().expect("tempdir");
    let output = dir.path().join("topology.xml");

    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("topology-translator"));
    cmd.arg("convert")
        .arg(fixture("fixtures/nmwg-two-domains.xml"))
        .arg("--output")
        .arg(path_as_str(&output))
        .assert()
        .failure()
        .stderr(predicate::str::contains("unexpected number of domains (2)"));

    assert!(!output.exists());
}

#[test]
fn convert_rejects_empty_input() {
    let dir = tempdir().expect("tempdir");
    let input = dir.path().join("empty.xml");
    let output = dir.path().join("topology.xml");
    fs::write(&input, "   \n").expect("write input");

    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("topology-translator"));
    cmd.arg("convert")
        .arg(path_as_str(&input))
        .arg("--output")
        .arg(path_as_str(&output))
        .assert()
        .failure()
        .stderr(predicate::str::contains("empty"));

    assert!(!output.exists());
}
