use tracing::debug;

use crate::error::{ReplaceError, Result};
use crate::segment::{PathStep, Segment, SegmentPath};
use crate::tree::TextNode;

/// Writes every segment's data back into the leaf its path addresses.
///
/// Leaves are only ever overwritten, never removed, so the occurrence indices
/// recorded in sibling paths stay valid for the whole pass. All paths are
/// resolved before the first write: if any is stale the tree is left untouched.
pub fn apply<N: TextNode>(root: &mut N, namespace: &str, segments: &[Segment]) -> Result<()> {
    if let Some(stale) = segments
        .iter()
        .find(|segment| descend(&*root, namespace, &segment.path).is_none())
    {
        return Err(ReplaceError::PathNotFound(stale.path.to_string()));
    }

    for segment in segments {
        descend_mut(root, namespace, &segment.path)?.set_text(&segment.data);
    }
    debug!("Wrote {} segments back into the tree", segments.len());
    Ok(())
}

fn descend<'a, N: TextNode>(root: &'a N, namespace: &'a str, path: &SegmentPath) -> Option<&'a N> {
    let mut node = root;
    let mut name: Option<&str> = None;
    for step in path.steps() {
        match step {
            PathStep::Named(n) => name = Some(n.as_str()),
            PathStep::Indexed(index) => {
                node = match name.take() {
                    Some(n) => node
                        .children(namespace)
                        .filter(|child| child.local_name() == n)
                        .nth(*index)?,
                    None => node.children(namespace).nth(*index)?,
                };
            }
        }
    }
    // A trailing name with no occurrence does not address a node.
    name.is_none().then_some(node)
}

fn descend_mut<'a, N: TextNode>(
    root: &'a mut N,
    namespace: &str,
    path: &SegmentPath,
) -> Result<&'a mut N> {
    let mut node = root;
    let mut name: Option<&str> = None;
    for step in path.steps() {
        match step {
            PathStep::Named(n) => name = Some(n.as_str()),
            PathStep::Indexed(index) => {
                let next = match name.take() {
                    Some(n) => node.named_child_mut(namespace, n, *index),
                    None => node.child_mut(namespace, *index),
                };
                node = next.ok_or_else(|| ReplaceError::PathNotFound(path.to_string()))?;
            }
        }
    }
    if name.is_some() {
        return Err(ReplaceError::PathNotFound(path.to_string()));
    }
    Ok(node)
}
