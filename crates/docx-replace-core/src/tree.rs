use std::borrow::Cow;

use crate::error::Result;

/// Navigable, mutable view of a markup tree.
///
/// Every child accessor is scoped to one namespace: children outside it are
/// invisible to flattening and path descent.
pub trait TextNode {
    /// Local (unprefixed) name of this node.
    fn local_name(&self) -> &str;

    /// Children in `namespace`, in document order.
    fn children<'a>(&'a self, namespace: &'a str) -> impl Iterator<Item = &'a Self> + 'a
    where
        Self: 'a;

    /// The `index`-th child in `namespace`.
    fn child_mut(&mut self, namespace: &str, index: usize) -> Option<&mut Self>;

    /// Direct text value of this node.
    fn text(&self) -> Cow<'_, str>;

    /// Overwrites the direct text value of this node.
    fn set_text(&mut self, value: &str);

    fn child_count(&self, namespace: &str) -> usize {
        self.children(namespace).count()
    }

    fn has_children(&self, namespace: &str) -> bool {
        self.children(namespace).next().is_some()
    }

    /// The `occurrence`-th child named `name` in `namespace`.
    fn named_child_mut(
        &mut self,
        namespace: &str,
        name: &str,
        occurrence: usize,
    ) -> Option<&mut Self> {
        let index = self
            .children(namespace)
            .enumerate()
            .filter(|(_, child)| child.local_name() == name)
            .nth(occurrence)
            .map(|(index, _)| index)?;
        self.child_mut(namespace, index)
    }
}

/// Archive holding the document parts.
pub trait Container {
    /// Reads an entry; `Ok(None)` when the archive has no such entry.
    fn read_entry(&mut self, name: &str) -> Result<Option<Vec<u8>>>;

    /// Replaces (or adds) an entry and persists the archive.
    fn write_entry(&mut self, name: &str, bytes: &[u8]) -> Result<()>;
}
