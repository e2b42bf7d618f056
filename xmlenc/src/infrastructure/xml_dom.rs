// /////////////////////////////////////////////////////////////////////////////
// xmlenc
// SPDX-License-Identifier: BSD-3-Clause
// /////////////////////////////////////////////////////////////////////////////

//! `quick-xml`-backed parse/serialize for the domain's [`Element`] tree, plus
//! the splice primitives the encrypt/decrypt drivers use to graft ciphertext
//! or recovered plaintext back into a document.
//!
//! The domain crate navigates an already-built tree; everything here is the
//! infrastructure half of that split -- turning bytes into a tree and back,
//! and the two distinct "replace a node" operations the drivers need.

use std::collections::HashMap;
use std::io::Cursor;

use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Reader;
use quick_xml::Writer;

use xmlenc_domain::error::XmlEncError;
use xmlenc_domain::xml::{Element, Node};

type NsScope = HashMap<String, String>;

fn split_prefix(tag: &str) -> (&str, Option<&str>) {
    match tag.split_once(':') {
        Some((prefix, local)) => (local, Some(prefix)),
        None => (tag, None),
    }
}

fn child_scope(parent: &NsScope, attrs: &[(String, String)]) -> NsScope {
    let mut scope = parent.clone();
    for (k, v) in attrs {
        if k == "xmlns" {
            scope.insert(String::new(), v.clone());
        } else if let Some(prefix) = k.strip_prefix("xmlns:") {
            scope.insert(prefix.to_string(), v.clone());
        }
    }
    scope
}

fn resolve_ns(tag: &str, scope: &NsScope) -> (String, Option<String>) {
    let (local, prefix) = split_prefix(tag);
    let ns = match prefix {
        Some(p) => scope.get(p).cloned(),
        None => scope.get("").cloned(),
    };
    (local.to_string(), ns)
}

fn collect_attrs(start: &BytesStart, decoder: quick_xml::Decoder) -> Result<Vec<(String, String)>, XmlEncError> {
    let mut out = Vec::new();
    for attr in start.attributes() {
        let attr = attr.map_err(|e| XmlEncError::XmlFailure(e.to_string()))?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr
            .decode_and_unescape_value(decoder)
            .map_err(|e| XmlEncError::XmlFailure(e.to_string()))?
            .into_owned();
        out.push((key, value));
    }
    Ok(out)
}

/// Parses a complete, single-root XML document into an [`Element`] tree.
pub fn parse_document(xml: &str) -> Result<Element, XmlEncError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(false);

    let mut stack: Vec<(Element, NsScope)> = Vec::new();
    let mut root: Option<Element> = None;
    let mut buf = Vec::new();

    loop {
        let event = reader
            .read_event_into(&mut buf)
            .map_err(|e| XmlEncError::XmlFailure(e.to_string()))?;
        match event {
            Event::Start(ref e) => {
                let parent_scope = stack.last().map(|(_, s)| s.clone()).unwrap_or_default();
                let tag = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                let raw_attrs = collect_attrs(e, reader.decoder())?;
                let scope = child_scope(&parent_scope, &raw_attrs);
                let (local, ns) = resolve_ns(&tag, &scope);
                let attrs: Vec<(String, String)> = raw_attrs
                    .into_iter()
                    .filter(|(k, _)| k != "xmlns" && !k.starts_with("xmlns:"))
                    .map(|(k, v)| {
                        let (local_k, _) = split_prefix(&k);
                        (local_k.to_string(), v)
                    })
                    .collect();
                let mut elem = Element::new(local, ns.as_deref());
                elem.attrs = attrs;
                stack.push((elem, scope));
            }
            Event::Empty(ref e) => {
                let parent_scope = stack.last().map(|(_, s)| s.clone()).unwrap_or_default();
                let tag = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                let raw_attrs = collect_attrs(e, reader.decoder())?;
                let scope = child_scope(&parent_scope, &raw_attrs);
                let (local, ns) = resolve_ns(&tag, &scope);
                let attrs: Vec<(String, String)> = raw_attrs
                    .into_iter()
                    .filter(|(k, _)| k != "xmlns" && !k.starts_with("xmlns:"))
                    .map(|(k, v)| {
                        let (local_k, _) = split_prefix(&k);
                        (local_k.to_string(), v)
                    })
                    .collect();
                let mut elem = Element::new(local, ns.as_deref());
                elem.attrs = attrs;
                append_finished(&mut stack, &mut root, elem)?;
            }
            Event::End(_) => {
                let (finished, _) = stack.pop().ok_or_else(|| XmlEncError::XmlFailure("unbalanced end tag".into()))?;
                append_finished(&mut stack, &mut root, finished)?;
            }
            Event::Text(t) => {
                let decoded = t.decode().map_err(|e| XmlEncError::XmlFailure(e.to_string()))?;
                let text = quick_xml::escape::unescape(&decoded)
                    .map_err(|e| XmlEncError::XmlFailure(e.to_string()))?
                    .into_owned();
                if let Some((top, _)) = stack.last_mut() {
                    top.children.push(Node::Text(text));
                }
            }
            Event::CData(t) => {
                let text = String::from_utf8_lossy(t.as_ref()).into_owned();
                if let Some((top, _)) = stack.last_mut() {
                    top.children.push(Node::Text(text));
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    root.ok_or_else(|| XmlEncError::XmlFailure("no root element".into()))
}

fn append_finished(stack: &mut Vec<(Element, NsScope)>, root: &mut Option<Element>, elem: Element) -> Result<(), XmlEncError> {
    match stack.last_mut() {
        Some((parent, _)) => parent.children.push(Node::Element(elem)),
        None => *root = Some(elem),
    }
    Ok(())
}

/// Parses `xml` as a sequence of top-level nodes (zero or more elements and
/// text runs), for the `#Content` splice case where the plaintext isn't
/// itself a single well-formed document.
pub fn parse_fragment(xml: &str) -> Result<Vec<Node>, XmlEncError> {
    let wrapped = format!("<xmlenc-fragment>{}</xmlenc-fragment>", xml);
    let root = parse_document(&wrapped)?;
    Ok(root.children)
}

fn write_element(writer: &mut Writer<Cursor<Vec<u8>>>, e: &Element, parent_default_ns: Option<&str>) -> Result<(), XmlEncError> {
    let mut start = BytesStart::new(e.name.as_str());
    for (k, v) in &e.attrs {
        start.push_attribute((k.as_str(), v.as_str()));
    }
    let needs_xmlns = e.namespace.as_deref() != parent_default_ns;
    if needs_xmlns {
        if let Some(ns) = &e.namespace {
            start.push_attribute(("xmlns", ns.as_str()));
        }
    }

    if e.children.is_empty() {
        writer
            .write_event(Event::Empty(start))
            .map_err(|err| XmlEncError::XmlFailure(err.to_string()))?;
        return Ok(());
    }

    writer
        .write_event(Event::Start(start))
        .map_err(|err| XmlEncError::XmlFailure(err.to_string()))?;
    for child in &e.children {
        match child {
            Node::Element(c) => write_element(writer, c, e.namespace.as_deref())?,
            Node::Text(t) => {
                writer
                    .write_event(Event::Text(BytesText::new(t)))
                    .map_err(|err| XmlEncError::XmlFailure(err.to_string()))?;
            }
        }
    }
    writer
        .write_event(Event::End(BytesEnd::new(e.name.as_str())))
        .map_err(|err| XmlEncError::XmlFailure(err.to_string()))?;
    Ok(())
}

/// Serializes a single element and its subtree (`xmlNodeDump`).
pub fn dump_element(e: &Element) -> Result<String, XmlEncError> {
    let mut writer = Writer::new(Cursor::new(Vec::new()));
    write_element(&mut writer, e, None)?;
    let bytes = writer.into_inner().into_inner();
    String::from_utf8(bytes).map_err(|err| XmlEncError::XmlFailure(err.to_string()))
}

/// Serializes every child of `e` in document order, concatenated -- the
/// `#Content` encrypt path dumps an element's children rather than the
/// element itself.
pub fn dump_children(e: &Element, parent_default_ns: Option<&str>) -> Result<String, XmlEncError> {
    let mut writer = Writer::new(Cursor::new(Vec::new()));
    for child in &e.children {
        match child {
            Node::Element(c) => write_element(&mut writer, c, parent_default_ns)?,
            Node::Text(t) => {
                writer
                    .write_event(Event::Text(BytesText::new(t)))
                    .map_err(|err| XmlEncError::XmlFailure(err.to_string()))?;
            }
        }
    }
    let bytes = writer.into_inner().into_inner();
    String::from_utf8(bytes).map_err(|err| XmlEncError::XmlFailure(err.to_string()))
}

/// A path from a document's root to one of its descendants, expressed as
/// `children` indices at each level (text nodes count toward the index).
pub type NodePath = Vec<usize>;

pub fn locate<'a>(root: &'a Element, path: &[usize]) -> Option<&'a Element> {
    let mut cur = root;
    for &i in path {
        cur = cur.children.get(i)?.as_element()?;
    }
    Some(cur)
}

pub fn locate_mut<'a>(root: &'a mut Element, path: &[usize]) -> Option<&'a mut Element> {
    let mut cur = root;
    for &i in path {
        cur = cur.children.get_mut(i)?.as_element_mut()?;
    }
    Some(cur)
}

/// Finds the `children`-index path to the descendant (including `root`
/// itself, represented by an empty path) whose `Id` attribute equals `id`.
pub fn find_path_by_id(root: &Element, id: &str) -> Option<NodePath> {
    if root.attr("Id") == Some(id) {
        return Some(Vec::new());
    }
    for (i, child) in root.children.iter().enumerate() {
        if let Node::Element(c) = child {
            if let Some(mut rest) = find_path_by_id(c, id) {
                rest.insert(0, i);
                return Some(rest);
            }
        }
    }
    None
}

/// Finds the `children`-index path to the first descendant (including
/// `root` itself, represented by an empty path) whose local name is
/// `tag`, in document order. Used by the CLI to locate an `EncryptedData`
/// element without requiring the caller to know its `Id`.
pub fn find_path_by_tag(root: &Element, tag: &str) -> Option<NodePath> {
    if root.name == tag {
        return Some(Vec::new());
    }
    for (i, child) in root.children.iter().enumerate() {
        if let Node::Element(c) = child {
            if let Some(mut rest) = find_path_by_tag(c, tag) {
                rest.insert(0, i);
                return Some(rest);
            }
        }
    }
    None
}

/// Replaces the node at `path` wholesale with `replacement`. `path` must be
/// non-empty (the document root itself cannot be replaced through this
/// primitive). Used for the `Type=...#Element` splice on both encrypt and
/// decrypt.
pub fn replace_element(root: &mut Element, path: &[usize], replacement: Element) -> Result<(), XmlEncError> {
    let (&index, parent_path) = path
        .split_last()
        .ok_or_else(|| XmlEncError::XmlFailure("cannot replace the document root".into()))?;
    let parent = locate_mut(root, parent_path).ok_or_else(|| XmlEncError::XmlFailure("splice target not found".into()))?;
    let slot = parent
        .children
        .get_mut(index)
        .ok_or_else(|| XmlEncError::XmlFailure("splice index out of range".into()))?;
    *slot = Node::Element(replacement);
    Ok(())
}

/// Replaces every child of the node at `path` with `new_children`. Used for
/// the `Type=...#Content` splice on encrypt (the source node keeps its
/// identity; only its content changes).
pub fn replace_children(root: &mut Element, path: &[usize], new_children: Vec<Node>) -> Result<(), XmlEncError> {
    let node = locate_mut(root, path).ok_or_else(|| XmlEncError::XmlFailure("splice target not found".into()))?;
    node.children = new_children;
    Ok(())
}

/// Removes the node at `path` from its parent and splices `fragment`
/// in its place, flattening the fragment's nodes into the parent's child
/// list rather than nesting them under a wrapper. This is the corrected
/// `Type=...#Content` decrypt splice: the buggy original called the same
/// whole-node-replace primitive as `#Element`, which leaves the recovered
/// content wrapped in a single element instead of restored in place.
pub fn splice_children_in_place(root: &mut Element, path: &[usize], fragment: Vec<Node>) -> Result<(), XmlEncError> {
    let (&index, parent_path) = path
        .split_last()
        .ok_or_else(|| XmlEncError::XmlFailure("cannot splice at the document root".into()))?;
    let parent = locate_mut(root, parent_path).ok_or_else(|| XmlEncError::XmlFailure("splice target not found".into()))?;
    if index >= parent.children.len() {
        return Err(XmlEncError::XmlFailure("splice index out of range".into()));
    }
    parent.children.splice(index..=index, fragment);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_nested_elements_with_default_namespace_changes() {
        let xml = r#"<root xmlns="urn:a"><child xmlns="urn:b"><leaf>text</leaf></child></root>"#;
        let root = parse_document(xml).unwrap();
        assert_eq!(root.name, "root");
        assert_eq!(root.namespace.as_deref(), Some("urn:a"));
        let child = root.first_element_child().unwrap();
        assert_eq!(child.namespace.as_deref(), Some("urn:b"));
        let leaf = child.first_element_child().unwrap();
        assert_eq!(leaf.namespace.as_deref(), Some("urn:b"));
        assert_eq!(leaf.text_content(), "text");
    }

    #[test]
    fn round_trips_through_dump_and_parse() {
        let mut root = Element::new("root", Some("urn:a"));
        let mut child = Element::new("child", Some("urn:a"));
        child.set_text("hello");
        root.append_child(child);
        let dumped = dump_element(&root).unwrap();
        let reparsed = parse_document(&dumped).unwrap();
        assert!(root.canonical_eq(&reparsed));
    }

    #[test]
    fn replace_element_swaps_node_identity() {
        let mut root = Element::new("root", None);
        root.append_child(Element::new("secret", None));
        root.append_child(Element::new("other", None));
        replace_element(&mut root, &[0], Element::new("EncryptedData", None)).unwrap();
        let names: Vec<&str> = root.element_children().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["EncryptedData", "other"]);
    }

    #[test]
    fn splice_children_in_place_flattens_fragment() {
        let mut root = Element::new("secret", None);
        root.append_child(Element::new("EncryptedData", None));
        let fragment = vec![
            Node::Element(Element::new("a", None)),
            Node::Element(Element::new("b", None)),
        ];
        splice_children_in_place(&mut root, &[0], fragment).unwrap();
        let names: Vec<&str> = root.element_children().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn find_path_by_tag_locates_first_matching_element() {
        let mut root = Element::new("root", None);
        root.append_child(Element::new("other", None));
        root.append_child(Element::new("EncryptedData", None));
        let path = find_path_by_tag(&root, "EncryptedData").unwrap();
        assert_eq!(path, vec![1]);
    }

    #[test]
    fn find_path_by_id_locates_nested_element() {
        let mut root = Element::new("root", None);
        let mut child = Element::new("EncryptedData", None);
        child.set_attr("Id", "target");
        root.append_child(child);
        let path = find_path_by_id(&root, "target").unwrap();
        assert_eq!(path, vec![0]);
        assert_eq!(locate(&root, &path).unwrap().name, "EncryptedData");
    }
}
