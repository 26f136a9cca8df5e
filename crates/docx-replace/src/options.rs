use serde::{Deserialize, Serialize};

/// WordprocessingML main namespace; text runs and their containers live here.
pub const WORDPROCESSINGML_NS: &str =
    "http://schemas.openxmlformats.org/wordprocessingml/2006/main";

/// Archive entry holding the main document body.
pub const DOCUMENT_ENTRY: &str = "word/document.xml";

/// Which archive entry to edit and which namespace carries its text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentOptions {
    /// Entry name inside the archive, e.g. `word/header1.xml`.
    pub entry: String,
    /// Only children in this namespace are flattened and addressed.
    pub namespace: String,
}

impl Default for DocumentOptions {
    fn default() -> Self {
        Self {
            entry: DOCUMENT_ENTRY.to_string(),
            namespace: WORDPROCESSINGML_NS.to_string(),
        }
    }
}
