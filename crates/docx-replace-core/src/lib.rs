//! Search-and-replace across text that a markup tree splits into many leaves.
//!
//! The pipeline for one replacement:
//! - `flatten`: walk the tree into ordered, addressable `Segment`s
//! - `locate`: map a flat-text offset to a segment and an offset inside it
//! - `splice`: rewrite the segments a match range covers
//! - `apply`: write each segment back to its leaf by stored path
//!
//! The tree and the archive holding it are reached through the `TextNode`
//! and `Container` traits; concrete implementations live in `docx-replace`.

mod error;
mod flatten;
mod resolve;
mod segment;
mod splice;
mod tree;
mod writer;

#[cfg(test)]
mod mem;

pub use error::{ReplaceError, Result};
pub use flatten::flatten;
pub use resolve::{locate, Location};
pub use segment::{flat_text, PathStep, Segment, SegmentPath};
pub use splice::splice;
pub use tree::{Container, TextNode};
pub use writer::apply;
