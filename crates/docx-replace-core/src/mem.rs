//! In-memory tree used by the unit tests.

use std::borrow::Cow;

use crate::tree::TextNode;

pub(crate) const NS: &str = "urn:test:main";
pub(crate) const OTHER_NS: &str = "urn:test:other";

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct MemNode {
    pub namespace: String,
    pub name: String,
    pub text: String,
    pub children: Vec<MemNode>,
}

impl MemNode {
    pub fn leaf(name: &str, text: &str) -> Self {
        Self {
            namespace: NS.to_string(),
            name: name.to_string(),
            text: text.to_string(),
            children: Vec::new(),
        }
    }

    pub fn branch(name: &str, children: Vec<MemNode>) -> Self {
        Self {
            namespace: NS.to_string(),
            name: name.to_string(),
            text: String::new(),
            children,
        }
    }

    pub fn foreign(mut self) -> Self {
        self.namespace = OTHER_NS.to_string();
        self
    }

    /// `document/body/p/r/t` with one run per fragment.
    pub fn paragraph(fragments: &[&str]) -> Self {
        let runs = fragments
            .iter()
            .map(|text| Self::branch("r", vec![Self::leaf("t", text)]))
            .collect();
        Self::branch("document", vec![Self::branch("body", vec![Self::branch("p", runs)])])
    }

    /// Text of every namespace leaf in document order, empty ones included.
    pub fn leaf_texts(&self) -> Vec<String> {
        let mut out = Vec::new();
        for child in self.children(NS) {
            if child.has_children(NS) {
                out.extend(child.leaf_texts());
            } else {
                out.push(child.text.clone());
            }
        }
        out
    }
}

impl TextNode for MemNode {
    fn local_name(&self) -> &str {
        &self.name
    }

    fn children<'a>(&'a self, namespace: &'a str) -> impl Iterator<Item = &'a Self> + 'a
    where
        Self: 'a,
    {
        self.children.iter().filter(move |c| c.namespace == namespace)
    }

    fn child_mut(&mut self, namespace: &str, index: usize) -> Option<&mut Self> {
        self.children
            .iter_mut()
            .filter(|c| c.namespace == namespace)
            .nth(index)
    }

    fn text(&self) -> Cow<'_, str> {
        Cow::Borrowed(&self.text)
    }

    fn set_text(&mut self, value: &str) {
        self.text = value.to_string();
    }
}
