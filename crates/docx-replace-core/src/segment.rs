use std::fmt;

use serde::{Deserialize, Serialize};

/// One step of a path from the tree root down to a text leaf.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PathStep {
    /// Restrict the next `Indexed` step to children with this local name.
    Named(String),
    /// Descend into the n-th child of the current selection.
    Indexed(usize),
}

/// Address of a leaf captured during one flatten pass.
///
/// Flattening emits `Named(name), Indexed(occurrence)` pairs, one per level,
/// where `occurrence` counts same-named siblings within the namespace. A bare
/// `Indexed` step (no preceding name) indexes all namespace children.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SegmentPath(Vec<PathStep>);

impl SegmentPath {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn steps(&self) -> &[PathStep] {
        &self.0
    }

    /// Returns a copy of this path extended by one level.
    pub fn child(&self, name: &str, occurrence: usize) -> Self {
        let mut steps = Vec::with_capacity(self.0.len() + 2);
        steps.extend_from_slice(&self.0);
        steps.push(PathStep::Named(name.to_string()));
        steps.push(PathStep::Indexed(occurrence));
        Self(steps)
    }
}

impl From<Vec<PathStep>> for SegmentPath {
    fn from(steps: Vec<PathStep>) -> Self {
        Self(steps)
    }
}

impl fmt::Display for SegmentPath {
    /// Renders as `body[0]/p[3]/r[1]/t[0]`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        let mut pending_name: Option<&str> = None;
        for step in &self.0 {
            match step {
                PathStep::Named(name) => pending_name = Some(name.as_str()),
                PathStep::Indexed(index) => {
                    if !first {
                        f.write_str("/")?;
                    }
                    first = false;
                    write!(f, "{}[{}]", pending_name.take().unwrap_or("*"), index)?;
                }
            }
        }
        if let Some(name) = pending_name {
            if !first {
                f.write_str("/")?;
            }
            f.write_str(name)?;
        }
        Ok(())
    }
}

/// Text content of one leaf plus the address it was read from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    pub data: String,
    pub path: SegmentPath,
}

impl Segment {
    pub fn new(data: impl Into<String>, path: SegmentPath) -> Self {
        Self {
            data: data.into(),
            path,
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Concatenates segment data in order into the flat text view.
pub fn flat_text(segments: &[Segment]) -> String {
    let mut text = String::with_capacity(segments.iter().map(Segment::len).sum());
    for segment in segments {
        text.push_str(&segment.data);
    }
    text
}
