//! Owned, mutable XML tree.
//!
//! Parsing goes through `roxmltree`; the result is copied into plain owned
//! nodes so leaf text can be rewritten and the whole part serialized back.

use std::borrow::Cow;

use docx_replace_core::{ReplaceError, Result, TextNode};
use roxmltree::NodeType;

pub const XML_NS: &str = "http://www.w3.org/XML/1998/namespace";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub prefix: Option<String>,
    pub name: String,
    pub namespace: Option<String>,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum XmlNode {
    Element(Element),
    Text(String),
    Comment(String),
    ProcessingInstruction { target: String, value: Option<String> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub prefix: Option<String>,
    pub name: String,
    pub namespace: Option<String>,
    /// Namespace declarations made on this element, as (prefix, uri).
    pub namespaces: Vec<(Option<String>, String)>,
    pub attributes: Vec<Attribute>,
    pub children: Vec<XmlNode>,
}

impl Element {
    pub fn attribute(&self, namespace: Option<&str>, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.namespace.as_deref() == namespace && a.name == name)
            .map(|a| a.value.as_str())
    }

    /// Sets an attribute, replacing any existing value.
    pub fn set_attribute(
        &mut self,
        prefix: Option<&str>,
        namespace: Option<&str>,
        name: &str,
        value: &str,
    ) {
        if let Some(existing) = self
            .attributes
            .iter_mut()
            .find(|a| a.namespace.as_deref() == namespace && a.name == name)
        {
            existing.value = value.to_string();
            return;
        }
        self.attributes.push(Attribute {
            prefix: prefix.map(str::to_string),
            name: name.to_string(),
            namespace: namespace.map(str::to_string),
            value: value.to_string(),
        });
    }
}

impl TextNode for Element {
    fn local_name(&self) -> &str {
        &self.name
    }

    fn children<'a>(&'a self, namespace: &'a str) -> impl Iterator<Item = &'a Self> + 'a
    where
        Self: 'a,
    {
        self.children.iter().filter_map(move |child| match child {
            XmlNode::Element(e) if e.namespace.as_deref() == Some(namespace) => Some(e),
            _ => None,
        })
    }

    fn child_mut(&mut self, namespace: &str, index: usize) -> Option<&mut Self> {
        self.children
            .iter_mut()
            .filter_map(|child| match child {
                XmlNode::Element(e) if e.namespace.as_deref() == Some(namespace) => Some(e),
                _ => None,
            })
            .nth(index)
    }

    fn text(&self) -> Cow<'_, str> {
        let mut texts = self.children.iter().filter_map(|child| match child {
            XmlNode::Text(t) => Some(t.as_str()),
            _ => None,
        });
        match (texts.next(), texts.next()) {
            (None, _) => Cow::Borrowed(""),
            (Some(only), None) => Cow::Borrowed(only),
            (Some(first), Some(second)) => {
                let mut joined = format!("{}{}", first, second);
                texts.for_each(|t| joined.push_str(t));
                Cow::Owned(joined)
            }
        }
    }

    /// Replaces the direct text children with `value`, keeping other children in place.
    ///
    /// Setting the text a leaf already has leaves the element as it is.
    fn set_text(&mut self, value: &str) {
        if self.text() == value {
            return;
        }
        let position = self
            .children
            .iter()
            .position(|child| matches!(child, XmlNode::Text(_)))
            .unwrap_or(self.children.len());
        // No text precedes `position`, so it survives the retain unchanged.
        self.children.retain(|child| !matches!(child, XmlNode::Text(_)));
        if !value.is_empty() {
            self.children.insert(position, XmlNode::Text(value.to_string()));
        }

        // Word trims unmarked leading/trailing whitespace in text leaves.
        if value.starts_with(char::is_whitespace) || value.ends_with(char::is_whitespace) {
            self.set_attribute(Some("xml"), Some(XML_NS), "space", "preserve");
        }
    }
}

/// A parsed XML part: optional declaration, top-level misc nodes and the root element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlTree {
    declaration: Option<String>,
    prolog: Vec<XmlNode>,
    root: Element,
    epilog: Vec<XmlNode>,
}

impl XmlTree {
    pub fn parse(text: &str) -> Result<Self> {
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);
        let doc = roxmltree::Document::parse(text)
            .map_err(|e| ReplaceError::InvalidStructure(format!("Failed to parse XML: {}", e)))?;

        let mut prolog = Vec::new();
        let mut epilog = Vec::new();
        let mut root = None;
        for node in doc.root().children() {
            if node.is_element() {
                root = Some(convert_element(node));
            } else if let Some(misc) = convert_node(node) {
                if root.is_none() {
                    prolog.push(misc);
                } else {
                    epilog.push(misc);
                }
            }
        }

        Ok(Self {
            declaration: declaration(text),
            prolog,
            root: root
                .ok_or_else(|| ReplaceError::InvalidStructure("XML has no root element".into()))?,
            epilog,
        })
    }

    pub fn root(&self) -> &Element {
        &self.root
    }

    pub fn root_mut(&mut self) -> &mut Element {
        &mut self.root
    }

    pub fn to_xml(&self) -> String {
        let mut out = String::new();
        if let Some(decl) = &self.declaration {
            out.push_str(decl);
            out.push('\n');
        }
        for node in &self.prolog {
            write_node(&mut out, node);
        }
        write_element(&mut out, &self.root);
        for node in &self.epilog {
            write_node(&mut out, node);
        }
        out
    }
}

fn declaration(text: &str) -> Option<String> {
    let text = text.trim_start();
    let is_decl = text.starts_with("<?xml")
        && text.as_bytes().get(5).is_some_and(u8::is_ascii_whitespace);
    if !is_decl {
        return None;
    }
    let end = text.find("?>")?;
    Some(text[..end + 2].to_string())
}

fn convert_element(node: roxmltree::Node<'_, '_>) -> Element {
    let tag = node.tag_name();
    let attributes = node
        .attributes()
        .map(|attr| Attribute {
            prefix: attr.namespace().and_then(|uri| prefix_for(node, uri)),
            name: attr.name().to_string(),
            namespace: attr.namespace().map(str::to_string),
            value: attr.value().to_string(),
        })
        .collect();

    Element {
        prefix: tag.namespace().and_then(|uri| prefix_for(node, uri)),
        name: tag.name().to_string(),
        namespace: tag.namespace().map(str::to_string),
        namespaces: declared_namespaces(node),
        attributes,
        children: node.children().filter_map(convert_node).collect(),
    }
}

fn convert_node(node: roxmltree::Node<'_, '_>) -> Option<XmlNode> {
    match node.node_type() {
        NodeType::Element => Some(XmlNode::Element(convert_element(node))),
        NodeType::Text => node.text().map(|t| XmlNode::Text(t.to_string())),
        NodeType::Comment => node.text().map(|t| XmlNode::Comment(t.to_string())),
        NodeType::PI => node.pi().map(|pi| XmlNode::ProcessingInstruction {
            target: pi.target.to_string(),
            value: pi.value.map(str::to_string),
        }),
        NodeType::Root => None,
    }
}

fn prefix_for(node: roxmltree::Node<'_, '_>, uri: &str) -> Option<String> {
    if uri == XML_NS {
        return Some("xml".to_string());
    }
    node.lookup_prefix(uri).map(str::to_string)
}

/// Namespaces in scope on `node` that its parent element does not already bind.
fn declared_namespaces(node: roxmltree::Node<'_, '_>) -> Vec<(Option<String>, String)> {
    let inherited: Vec<(Option<&str>, &str)> = node
        .parent_element()
        .map(|parent| parent.namespaces().map(|ns| (ns.name(), ns.uri())).collect())
        .unwrap_or_default();

    node.namespaces()
        .filter(|ns| ns.name() != Some("xml"))
        .filter(|ns| !inherited.contains(&(ns.name(), ns.uri())))
        .map(|ns| (ns.name().map(str::to_string), ns.uri().to_string()))
        .collect()
}

fn write_node(out: &mut String, node: &XmlNode) {
    match node {
        XmlNode::Element(e) => write_element(out, e),
        XmlNode::Text(t) => escape_into(out, t, false),
        XmlNode::Comment(c) => {
            out.push_str("<!--");
            out.push_str(c);
            out.push_str("-->");
        }
        XmlNode::ProcessingInstruction { target, value } => {
            out.push_str("<?");
            out.push_str(target);
            if let Some(value) = value {
                out.push(' ');
                out.push_str(value);
            }
            out.push_str("?>");
        }
    }
}

fn write_element(out: &mut String, element: &Element) {
    out.push('<');
    push_qname(out, element.prefix.as_deref(), &element.name);

    for (prefix, uri) in &element.namespaces {
        match prefix {
            Some(p) => {
                out.push_str(" xmlns:");
                out.push_str(p);
            }
            None => out.push_str(" xmlns"),
        }
        out.push_str("=\"");
        escape_into(out, uri, true);
        out.push('"');
    }
    for attr in &element.attributes {
        out.push(' ');
        push_qname(out, attr.prefix.as_deref(), &attr.name);
        out.push_str("=\"");
        escape_into(out, &attr.value, true);
        out.push('"');
    }

    if element.children.is_empty() {
        out.push_str("/>");
        return;
    }
    out.push('>');
    for child in &element.children {
        write_node(out, child);
    }
    out.push_str("</");
    push_qname(out, element.prefix.as_deref(), &element.name);
    out.push('>');
}

fn push_qname(out: &mut String, prefix: Option<&str>, name: &str) {
    if let Some(prefix) = prefix {
        out.push_str(prefix);
        out.push(':');
    }
    out.push_str(name);
}

fn escape_into(out: &mut String, text: &str, attribute: bool) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\r' => out.push_str("&#13;"),
            '"' if attribute => out.push_str("&quot;"),
            '\n' if attribute => out.push_str("&#10;"),
            '\t' if attribute => out.push_str("&#9;"),
            _ => out.push(c),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const W: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";

    const SAMPLE: &str = concat!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
        "\n",
        r#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main" "#,
        r#"xmlns:mc="urn:mc">"#,
        r#"<w:body><w:p w:rsidR="00A1"><w:r><w:rPr><w:b/></w:rPr><w:t>Hello</w:t></w:r>"#,
        r#"<!-- note --><w:r><w:t xml:space="preserve"> World</w:t></w:r>"#,
        r#"<mc:Fallback><w:t>hidden</w:t></mc:Fallback></w:p></w:body></w:document>"#
    );

    fn leaf<'a>(tree: &'a mut XmlTree, path: &[usize]) -> &'a mut Element {
        let mut node = tree.root_mut();
        for &index in path {
            node = node.child_mut(W, index).unwrap();
        }
        node
    }

    fn leaf_in<'a>(tree: &'a mut XmlTree, namespace: &str, index: usize) -> &'a mut Element {
        tree.root_mut().child_mut(namespace, index).unwrap()
    }

    #[test]
    fn test_round_trip_is_byte_identical() {
        let tree = XmlTree::parse(SAMPLE).unwrap();
        assert_eq!(tree.to_xml(), SAMPLE);
    }

    #[test]
    fn test_escaping_round_trip() {
        let xml = r#"<a b="x &quot;y&quot; &amp; &lt;z&gt;">1 &lt; 2 &amp;&amp; 3 &gt; 2</a>"#;
        let tree = XmlTree::parse(xml).unwrap();
        assert_eq!(tree.root().text(), "1 < 2 && 3 > 2");
        assert_eq!(tree.root().attribute(None, "b"), Some(r#"x "y" & <z>"#));
        assert_eq!(tree.to_xml(), xml);
    }

    #[test]
    fn test_children_are_scoped_to_namespace() {
        let tree = XmlTree::parse(SAMPLE).unwrap();
        let paragraph = tree.root().children(W).next().unwrap().children(W).next().unwrap();
        let names: Vec<&str> = paragraph.children(W).map(|c| c.local_name()).collect();
        assert_eq!(names, vec!["r", "r"]);
        assert_eq!(paragraph.child_count(W), 2);
    }

    #[test]
    fn test_set_text_keeps_non_text_children() {
        let mut tree = XmlTree::parse(r#"<w:t xmlns:w="urn:w">a<!--c-->b</w:t>"#).unwrap();
        assert_eq!(tree.root().text(), "ab");

        tree.root_mut().set_text("xyz");
        assert_eq!(tree.to_xml(), r#"<w:t xmlns:w="urn:w">xyz<!--c--></w:t>"#);
    }

    #[test]
    fn test_set_text_marks_whitespace_preserve() {
        let mut tree = XmlTree::parse(SAMPLE).unwrap();
        let t = leaf(&mut tree, &[0, 0, 0, 1]);
        t.set_text("Hello ");
        assert_eq!(t.attribute(Some(XML_NS), "space"), Some("preserve"));
        assert!(tree.to_xml().contains(r#"<w:t xml:space="preserve">Hello </w:t>"#));
    }

    #[test]
    fn test_set_text_unchanged_keeps_element() {
        let xml = r#"<w:p xmlns:w="urn:w"><w:t>Dear </w:t><w:t>
  </w:t></w:p>"#;
        let mut tree = XmlTree::parse(xml).unwrap();
        leaf_in(&mut tree, "urn:w", 0).set_text("Dear ");
        leaf_in(&mut tree, "urn:w", 1).set_text("\n  ");
        assert_eq!(tree.to_xml(), xml);
    }

    #[test]
    fn test_set_text_empty_clears_leaf() {
        let mut tree = XmlTree::parse(SAMPLE).unwrap();
        leaf(&mut tree, &[0, 0, 0, 1]).set_text("");
        assert!(tree.to_xml().contains("<w:r><w:rPr><w:b/></w:rPr><w:t/></w:r>"));
    }

    #[test]
    fn test_default_namespace_is_kept() {
        let xml = r#"<root xmlns="urn:d"><child a="1"/></root>"#;
        let tree = XmlTree::parse(xml).unwrap();
        assert_eq!(tree.root().namespace.as_deref(), Some("urn:d"));
        assert_eq!(tree.to_xml(), xml);
    }

    #[test]
    fn test_byte_order_mark_is_skipped() {
        let tree = XmlTree::parse("\u{feff}<a>x</a>").unwrap();
        assert_eq!(tree.to_xml(), "<a>x</a>");
    }

    #[test]
    fn test_malformed_xml_is_invalid_structure() {
        let err = XmlTree::parse("<w:document><w:body></w:document>").unwrap_err();
        assert!(matches!(err, ReplaceError::InvalidStructure(_)), "got {:?}", err);
    }
}
