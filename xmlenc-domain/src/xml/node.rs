// /////////////////////////////////////////////////////////////////////////////
// xmlenc
// SPDX-License-Identifier: BSD-3-Clause
// /////////////////////////////////////////////////////////////////////////////

//! A minimal, dependency-free XML element tree.
//!
//! The engine only ever needs to navigate a fixed, shallow grammar
//! (`EncryptedData`'s children) and splice small fragments back into a
//! document; it does not need a general-purpose DOM. Parsing an XML
//! document into this tree, and serializing it back out, is an
//! infrastructure concern (see `xmlenc::infrastructure::xml_dom`), kept out
//! of this crate along with every other concrete serialization format.

/// A child of an [`Element`]: either a nested element or a text run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
}

impl Node {
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(e) => Some(e),
            Node::Text(_) => None,
        }
    }

    pub fn as_element_mut(&mut self) -> Option<&mut Element> {
        match self {
            Node::Element(e) => Some(e),
            Node::Text(_) => None,
        }
    }
}

/// A mutable XML element: a qualified name, attributes, and ordered
/// children (elements and text interleaved, as in the parsed document).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub name: String,
    pub namespace: Option<String>,
    pub attrs: Vec<(String, String)>,
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(name: impl Into<String>, namespace: Option<&str>) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.map(|s| s.to_string()),
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.iter().find(|(k, _)| k == name).map(|(_, v)| v.as_str())
    }

    pub fn set_attr(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        if let Some(entry) = self.attrs.iter_mut().find(|(k, _)| *k == name) {
            entry.1 = value;
        } else {
            self.attrs.push((name, value));
        }
    }

    pub fn append_child(&mut self, child: Element) {
        self.children.push(Node::Element(child));
    }

    pub fn insert_child(&mut self, index: usize, child: Element) {
        self.children.insert(index, Node::Element(child));
    }

    /// Index, among `children`, of the given element-slot count: the Nth
    /// element child's position within `children` (text nodes don't count).
    pub fn nth_element_child_index(&self, n: usize) -> Option<usize> {
        self.children
            .iter()
            .enumerate()
            .filter(|(_, c)| matches!(c, Node::Element(_)))
            .nth(n)
            .map(|(i, _)| i)
    }

    pub fn first_element_child(&self) -> Option<&Element> {
        self.children.iter().find_map(Node::as_element)
    }

    pub fn element_children(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(Node::as_element)
    }

    pub fn find_child(&self, name: &str) -> Option<&Element> {
        self.element_children().find(|e| e.name == name)
    }

    pub fn find_child_mut(&mut self, name: &str) -> Option<&mut Element> {
        self.children
            .iter_mut()
            .filter_map(Node::as_element_mut)
            .find(|e| e.name == name)
    }

    /// Replaces all children with a single text node.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.children = vec![Node::Text(text.into())];
    }

    /// Concatenation of every direct text-node child (xmlNodeGetContent for
    /// a leaf text element).
    pub fn text_content(&self) -> String {
        self.children
            .iter()
            .filter_map(|c| match c {
                Node::Text(t) => Some(t.as_str()),
                Node::Element(_) => None,
            })
            .collect::<Vec<_>>()
            .join("")
    }

    pub fn element_child_count(&self) -> usize {
        self.element_children().count()
    }

    /// Structural equivalence ignoring attribute order and whitespace-only
    /// text runs -- enough to call two trees "canonically equivalent" for
    /// round-trip comparisons after a parse/serialize cycle.
    pub fn canonical_eq(&self, other: &Element) -> bool {
        if self.name != other.name || self.namespace != other.namespace {
            return false;
        }
        let mut a = self.attrs.clone();
        let mut b = other.attrs.clone();
        a.sort();
        b.sort();
        if a != b {
            return false;
        }
        let mine: Vec<&Node> = self
            .children
            .iter()
            .filter(|c| !matches!(c, Node::Text(t) if t.trim().is_empty()))
            .collect();
        let theirs: Vec<&Node> = other
            .children
            .iter()
            .filter(|c| !matches!(c, Node::Text(t) if t.trim().is_empty()))
            .collect();
        if mine.len() != theirs.len() {
            return false;
        }
        mine.iter().zip(theirs.iter()).all(|(x, y)| match (x, y) {
            (Node::Text(a), Node::Text(b)) => a.trim() == b.trim(),
            (Node::Element(a), Node::Element(b)) => a.canonical_eq(b),
            _ => false,
        })
    }
}
