use std::collections::HashMap;

use tracing::debug;

use crate::segment::{Segment, SegmentPath};
use crate::tree::TextNode;

/// Walks `root` depth-first and returns its non-empty text leaves in document order.
///
/// Only children in `namespace` are visited. A child with namespace children of
/// its own is descended into; otherwise it is a leaf and yields one segment if
/// its text is non-empty. Empty leaves are never emitted.
pub fn flatten<N: TextNode>(root: &N, namespace: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    collect(root, namespace, &SegmentPath::new(), &mut segments);
    debug!("Flattened {} text segments", segments.len());
    segments
}

fn collect<N: TextNode>(node: &N, namespace: &str, path: &SegmentPath, out: &mut Vec<Segment>) {
    // Same-named siblings are numbered per parent.
    let mut occurrences: HashMap<&str, usize> = HashMap::new();

    for child in node.children(namespace) {
        let name = child.local_name();
        let counter = occurrences.entry(name).or_insert(0);
        let occurrence = *counter;
        *counter += 1;

        let child_path = path.child(name, occurrence);
        if child.has_children(namespace) {
            collect(child, namespace, &child_path, out);
        } else {
            let text = child.text();
            if !text.is_empty() {
                out.push(Segment::new(text.into_owned(), child_path));
            }
        }
    }
}
