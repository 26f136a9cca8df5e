use std::path::Path;

use docx_replace_core::{
    apply, flat_text, flatten, splice, Container, ReplaceError, Result, Segment,
};
use tracing::{debug, info, warn};

use crate::container::ZipContainer;
use crate::options::DocumentOptions;
use crate::xml::XmlTree;

/// An open document: the archive handle plus the parsed, mutable text tree.
///
/// Every replacement re-flattens the tree from scratch, so segment paths are
/// always taken from the tree as it currently is.
pub struct Document<C: Container = ZipContainer> {
    container: C,
    tree: XmlTree,
    options: DocumentOptions,
}

impl Document<ZipContainer> {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with(path, DocumentOptions::default())
    }

    pub fn open_with(path: impl AsRef<Path>, options: DocumentOptions) -> Result<Self> {
        let container = ZipContainer::open(path)?;
        let document = Self::from_container(container, options)?;
        info!(
            "Opened document {:?} (entry {})",
            document.container.path(),
            document.options.entry
        );
        Ok(document)
    }

    /// Writes the edited document to `path`, leaving the source archive as it was.
    pub fn save_as(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let xml = self.tree.to_xml();
        self.container
            .write_entry_to(path.as_ref(), &self.options.entry, xml.as_bytes())
    }
}

impl<C: Container> Document<C> {
    pub fn from_container(mut container: C, options: DocumentOptions) -> Result<Self> {
        let bytes = container.read_entry(&options.entry)?.ok_or_else(|| {
            ReplaceError::InvalidStructure(format!(
                "Entry '{}' not found in archive",
                options.entry
            ))
        })?;
        let text = String::from_utf8(bytes).map_err(|e| {
            ReplaceError::InvalidStructure(format!("Entry '{}' is not UTF-8: {}", options.entry, e))
        })?;
        let tree = XmlTree::parse(&text)?;

        Ok(Self {
            container,
            tree,
            options,
        })
    }

    pub fn options(&self) -> &DocumentOptions {
        &self.options
    }

    pub fn tree(&self) -> &XmlTree {
        &self.tree
    }

    /// Text segments of the current tree, in document order.
    pub fn segments(&self) -> Vec<Segment> {
        flatten(self.tree.root(), &self.options.namespace)
    }

    /// The flat text of the document: every text leaf concatenated.
    pub fn raw_text(&self) -> String {
        flat_text(&self.segments())
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.raw_text().contains(needle)
    }

    /// Replaces the first occurrence of `needle`. Returns false, with the tree
    /// untouched, when there is none.
    pub fn replace(&mut self, needle: &str, replacement: &str) -> Result<bool> {
        Ok(self.replace_from(needle, replacement, 0)?.is_some())
    }

    /// Replaces occurrences one at a time until none is left, returning the count.
    ///
    /// Each round searches only past the previous replacement, so a replacement
    /// containing `needle` is not matched again.
    pub fn replace_all(&mut self, needle: &str, replacement: &str) -> Result<usize> {
        let mut count = 0;
        let mut from = 0;
        while let Some(next) = self.replace_from(needle, replacement, from)? {
            count += 1;
            from = next;
        }
        debug!("Replaced {} occurrence(s) of {:?}", count, needle);
        Ok(count)
    }

    /// Replaces the first occurrence at or after flat offset `from`.
    /// Returns the flat offset just past the inserted replacement.
    fn replace_from(
        &mut self,
        needle: &str,
        replacement: &str,
        from: usize,
    ) -> Result<Option<usize>> {
        if needle.is_empty() {
            warn!("Ignoring replace with an empty search string");
            return Ok(None);
        }

        let mut segments = self.segments();
        let text = flat_text(&segments);
        let Some(start) = text
            .get(from..)
            .and_then(|tail| tail.find(needle))
            .map(|i| i + from)
        else {
            return Ok(None);
        };

        splice(&mut segments, start, needle.len(), replacement)?;
        apply(self.tree.root_mut(), &self.options.namespace, &segments)?;
        debug!("Replaced {:?} at offset {}", needle, start);
        Ok(Some(start + replacement.len()))
    }

    /// Serializes the tree and writes it back into the container's entry.
    ///
    /// On failure the edited tree is kept, so saving can be retried.
    pub fn save(&mut self) -> Result<()> {
        let xml = self.tree.to_xml();
        self.container.write_entry(&self.options.entry, xml.as_bytes())?;
        info!("Saved entry {}", self.options.entry);
        Ok(())
    }

    pub fn into_container(self) -> C {
        self.container
    }
}
