use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use thiserror::Error;

use crate::tree::XmlNode;

/// Errors that can occur while writing XML from an [`XmlNode`] tree.
#[derive(Debug, Error)]
pub enum WriteError {
    /// Failed to serialize XML bytes.
    #[error("failed to write XML: {0}")]
    Xml(#[from] quick_xml::Error),
    /// Failed to write output file.
    #[error("failed to write XML file: {0}")]
    Io(#[from] std::io::Error),
}

/// Serialize an [`XmlNode`] tree into indented XML bytes without a declaration.
pub fn write(node: &XmlNode) -> Result<Vec<u8>, WriteError> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    write_element(&mut writer, node)?;
    Ok(writer.into_inner())
}

/// Serialize an [`XmlNode`] tree as a standalone UTF-8 document.
pub fn write_document(node: &XmlNode) -> Result<Vec<u8>, WriteError> {
    let mut bytes = Vec::new();
    emit_document(&mut bytes, node)?;
    Ok(bytes)
}

/// Write `node` as a standalone document to `path`, replacing any existing file.
pub fn write_file(node: &XmlNode, path: &Path) -> Result<(), WriteError> {
    let mut out = BufWriter::new(File::create(path)?);
    emit_document(&mut out, node)?;
    out.flush()?;
    Ok(())
}

fn emit_document<W: Write>(out: &mut W, node: &XmlNode) -> Result<(), WriteError> {
    let mut writer = Writer::new_with_indent(&mut *out, b' ', 2);
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))?;
    write_element(&mut writer, node)?;
    writer.into_inner().write_all(b"\n")?;
    Ok(())
}

fn write_element<W: Write>(writer: &mut Writer<W>, node: &XmlNode) -> Result<(), quick_xml::Error> {
    let name = node.tag.as_str();
    let start = BytesStart::new(name).with_attributes(
        node.attributes
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str())),
    );

    match (&node.text, node.children.as_slice()) {
        (None, []) => writer.write_event(Event::Empty(start))?,
        (text, children) => {
            writer.write_event(Event::Start(start))?;
            if let Some(text) = text {
                writer.write_event(Event::Text(BytesText::new(text)))?;
            }
            for child in children {
                write_element(writer, child)?;
            }
            writer.write_event(Event::End(BytesEnd::new(name)))?;
        }
    }
    Ok(())
}
