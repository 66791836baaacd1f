//! Owned XML element trees for document translation tools.
//!
//! Documents are parsed into [`XmlNode`] values, inspected or assembled in
//! memory, and written back out. Lookups come in two flavours: exact tag
//! matches (`get_child`) and namespace-agnostic local-name matches
//! (`child`), since producers are free to pick whatever prefix they like for
//! a namespace.

pub mod parser;
pub mod tree;
pub mod writer;

pub use parser::{parse, parse_file, parse_str, ParseError};
pub use tree::XmlNode;
pub use writer::{write, write_document, write_file, WriteError};
