use std::path::PathBuf;

use clap::{Parser, Subcommand};
use docx_replace::{DocumentOptions, DOCUMENT_ENTRY, WORDPROCESSINGML_NS};

/// Configuration for the docx-replace command line.
#[derive(Parser, Debug, Clone)]
#[command(name = "docx-replace")]
#[command(about = "Find and replace text in .docx documents, across run boundaries")]
pub struct Config {
    /// Archive entry holding the text to edit
    #[arg(long, global = true, default_value = DOCUMENT_ENTRY, env = "DOCX_REPLACE_ENTRY")]
    pub entry: String,

    /// Namespace of the elements that carry text
    #[arg(long, global = true, default_value = WORDPROCESSINGML_NS, env = "DOCX_REPLACE_NAMESPACE")]
    pub namespace: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Print the document's flat text
    Text { file: PathBuf },

    /// Exit 0 if the text contains NEEDLE, 1 otherwise
    Contains { file: PathBuf, needle: String },

    /// Replace the first (or every) occurrence of NEEDLE
    Replace {
        file: PathBuf,
        needle: String,
        replacement: String,

        /// Replace every occurrence instead of the first
        #[arg(long)]
        all: bool,

        /// Write to this path instead of overwriting FILE
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Dump text segments and their paths as JSON
    Segments { file: PathBuf },
}

impl Config {
    pub fn document_options(&self) -> DocumentOptions {
        DocumentOptions {
            entry: self.entry.clone(),
            namespace: self.namespace.clone(),
        }
    }
}
