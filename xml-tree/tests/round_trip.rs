use std::path::PathBuf;

use pretty_assertions::assert_eq;
use xml_tree::{parse, parse_file, write, write_document, write_file, XmlNode};

fn fixture(path: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join(path)
}

#[test]
fn parse_write_parse_round_trip_preserves_tree_shape() {
    let first = parse_file(&fixture("fixtures/nmwg-esnet.xml")).expect("initial parse");

    let written = write(&first).expect("write should succeed");
    let second = parse(&written).expect("re-parse should succeed");

    assert_eq!(first, second);
}

#[test]
fn built_tree_survives_write_file() {
    let node = XmlNode::new("nml:Topology")
        .with_attribute("xmlns:nml", "http://schemas.ogf.org/nml/2013/05/base#")
        .with_attribute("id", "urn:ogf:network:es.net:2013:")
        .with_child(XmlNode::new("nml:name").with_text("es.net"));

    let out_dir = tempfile::tempdir().expect("tempdir should be created");
    let out_path = out_dir.path().join("topology.xml");
    write_file(&node, &out_path).expect("write_file should succeed");

    let reparsed = parse_file(&out_path).expect("parse_file should succeed");
    assert_eq!(node, reparsed);
}

#[test]
fn document_output_parses_back() {
    let node = XmlNode::new("root").with_child(XmlNode::new("leaf").with_text("1 < 2"));
    let bytes = write_document(&node).expect("write");
    assert_eq!(parse(&bytes).expect("parse"), node);
}
