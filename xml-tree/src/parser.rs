use std::fs;
use std::path::Path;

use quick_xml::events::{BytesStart, Event};
use quick_xml::name::QName;
use quick_xml::Reader;
use thiserror::Error;

use crate::tree::XmlNode;

/// Failures while reading XML into an [`XmlNode`] tree.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("failed to parse XML: {0}")]
    Xml(#[from] quick_xml::Error),
    /// A tag or attribute name was not UTF-8.
    #[error("invalid UTF-8 while parsing XML: {0}")]
    Utf8(#[from] std::str::Utf8Error),
    /// An entity or character reference could not be expanded.
    #[error("failed to decode XML text: {0}")]
    Escape(#[from] quick_xml::escape::EscapeError),
    #[error("failed to read XML file: {0}")]
    Io(#[from] std::io::Error),
    /// Input held nothing but whitespace.
    #[error("XML document is empty")]
    Empty,
    #[error("malformed XML: {0}")]
    Malformed(&'static str),
}

/// Parse XML bytes into an [`XmlNode`] tree.
///
/// Whitespace-only text runs are dropped; comments, processing instructions
/// and the declaration are skipped.
pub fn parse(xml: &[u8]) -> Result<XmlNode, ParseError> {
    if xml.iter().all(u8::is_ascii_whitespace) {
        return Err(ParseError::Empty);
    }

    let mut reader = Reader::from_reader(xml);
    reader.config_mut().trim_text(false);

    let mut tree = TreeBuilder::default();
    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => tree.open(element(&e, &reader)?),
            Event::Empty(e) => tree.attach(element(&e, &reader)?)?,
            Event::End(_) => tree.close()?,
            Event::Text(e) => tree.text(&e.unescape()?),
            Event::CData(e) => tree.text(std::str::from_utf8(&e)?),
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }
    tree.finish()
}

pub fn parse_str(xml: &str) -> Result<XmlNode, ParseError> {
    parse(xml.as_bytes())
}

pub fn parse_file(path: &Path) -> Result<XmlNode, ParseError> {
    parse(&fs::read(path)?)
}

/// Open elements plus the finished root, if any.
#[derive(Default)]
struct TreeBuilder {
    open: Vec<XmlNode>,
    root: Option<XmlNode>,
}

impl TreeBuilder {
    fn open(&mut self, node: XmlNode) {
        self.open.push(node);
    }

    fn close(&mut self) -> Result<(), ParseError> {
        let node = self
            .open
            .pop()
            .ok_or(ParseError::Malformed("closing tag without open tag"))?;
        self.attach(node)
    }

    fn attach(&mut self, node: XmlNode) -> Result<(), ParseError> {
        match self.open.last_mut() {
            Some(parent) => parent.push(node),
            None if self.root.is_none() => self.root = Some(node),
            None => return Err(ParseError::Malformed("multiple top-level elements")),
        }
        Ok(())
    }

    fn text(&mut self, text: &str) {
        let Some(current) = self.open.last_mut() else {
            return;
        };
        if text.trim().is_empty() {
            return;
        }
        current
            .text
            .get_or_insert_with(String::new)
            .push_str(text);
    }

    fn finish(self) -> Result<XmlNode, ParseError> {
        if !self.open.is_empty() {
            return Err(ParseError::Malformed("unclosed element at end of document"));
        }
        self.root.ok_or(ParseError::Malformed("no root element"))
    }
}

fn element(start: &BytesStart<'_>, reader: &Reader<&[u8]>) -> Result<XmlNode, ParseError> {
    let mut node = XmlNode::new(name(start.name())?);
    for attribute in start.attributes() {
        let attribute = attribute.map_err(quick_xml::Error::from)?;
        let value = attribute.decode_and_unescape_value(reader.decoder())?;
        node.attributes
            .insert(name(attribute.key)?, value.into_owned());
    }
    Ok(node)
}

fn name(qname: QName<'_>) -> Result<String, ParseError> {
    std::str::from_utf8(qname.as_ref())
        .map(str::to_string)
        .map_err(ParseError::from)
}
