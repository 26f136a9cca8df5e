//! .docx search-and-replace built on `docx-replace-core`.
//!
//! `ZipContainer` opens the archive, `XmlTree` holds the editable part, and
//! `Document` ties them to the flatten/splice/write pipeline.

pub mod container;
pub mod document;
pub mod options;
pub mod xml;

pub use container::ZipContainer;
pub use document::Document;
pub use docx_replace_core::{ReplaceError, Result, Segment, SegmentPath};
pub use options::{DocumentOptions, DOCUMENT_ENTRY, WORDPROCESSINGML_NS};
pub use xml::{Element, XmlTree};
