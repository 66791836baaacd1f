use std::collections::BTreeMap;

/// An XML element with its attributes, child elements and text content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlNode {
    /// Qualified tag name, including any namespace prefix.
    pub tag: String,
    /// Attributes keyed by qualified name.
    pub attributes: BTreeMap<String, String>,
    /// Child elements in document order.
    pub children: Vec<XmlNode>,
    /// Concatenated non-whitespace text content.
    pub text: Option<String>,
}

impl XmlNode {
    /// Create an element with no attributes, children, or text.
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attributes: BTreeMap::new(),
            children: Vec::new(),
            text: None,
        }
    }

    /// Tag name with any `prefix:` stripped.
    pub fn local_name(&self) -> &str {
        local_part(&self.tag)
    }

    /// Return the first child whose tag matches exactly.
    pub fn get_child(&self, tag: &str) -> Option<&XmlNode> {
        self.children.iter().find(|child| child.tag == tag)
    }

    /// Walk a path of exact tags and return the terminal node text.
    pub fn get_text<'a>(&'a self, path: &[&str]) -> Option<&'a str> {
        let mut current = self;
        for segment in path {
            current = current.get_child(segment)?;
        }
        current.text.as_deref()
    }

    /// Return the first child with the given local name, whatever its prefix.
    pub fn child(&self, local: &str) -> Option<&XmlNode> {
        self.children
            .iter()
            .find(|child| child.local_name() == local)
    }

    /// Mutable variant of [`XmlNode::child`].
    pub fn child_mut(&mut self, local: &str) -> Option<&mut XmlNode> {
        self.children
            .iter_mut()
            .find(|child| child.local_name() == local)
    }

    /// Iterate over children with the given local name.
    pub fn children_named<'a>(&'a self, local: &'a str) -> impl Iterator<Item = &'a XmlNode> {
        self.children
            .iter()
            .filter(move |child| child.local_name() == local)
    }

    /// Trimmed text of the first child with the given local name.
    ///
    /// Empty or whitespace-only text reads as absent.
    pub fn child_text(&self, local: &str) -> Option<&str> {
        self.child(local)
            .and_then(|child| child.text.as_deref())
            .map(str::trim)
            .filter(|text| !text.is_empty())
    }

    /// Attribute value by exact name.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Builder: set an attribute.
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Builder: set the text content.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Builder: append a child element.
    pub fn with_child(mut self, child: XmlNode) -> Self {
        self.children.push(child);
        self
    }

    /// Append a child element.
    pub fn push(&mut self, child: XmlNode) {
        self.children.push(child);
    }
}

fn local_part(name: &str) -> &str {
    name.rsplit_once(':').map_or(name, |(_, local)| local)
}
