mod config;

use std::path::Path;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use docx_replace::{Document, DocumentOptions};
use tracing::info;
use tracing_subscriber::EnvFilter;

use config::{Command, Config};

fn main() -> anyhow::Result<ExitCode> {
    // Logs go to stderr; stdout carries command output.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = Config::parse();
    let options = config.document_options();

    match config.command {
        Command::Text { file } => {
            let doc = open(&file, options)?;
            println!("{}", doc.raw_text());
        }
        Command::Contains { file, needle } => {
            let doc = open(&file, options)?;
            if !doc.contains(&needle) {
                return Ok(ExitCode::from(1));
            }
        }
        Command::Replace {
            file,
            needle,
            replacement,
            all,
            output,
        } => {
            let mut doc = open(&file, options)?;
            let count = if all {
                doc.replace_all(&needle, &replacement)?
            } else {
                usize::from(doc.replace(&needle, &replacement)?)
            };

            if count == 0 {
                info!("No occurrence of {:?} in {:?}", needle, file);
                return Ok(ExitCode::from(1));
            }

            match output {
                Some(path) => doc
                    .save_as(&path)
                    .with_context(|| format!("Failed to write {:?}", path))?,
                None => doc
                    .save()
                    .with_context(|| format!("Failed to save {:?}", file))?,
            }
            info!("Replaced {} occurrence(s) of {:?}", count, needle);
        }
        Command::Segments { file } => {
            let doc = open(&file, options)?;
            println!("{}", serde_json::to_string_pretty(&doc.segments())?);
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn open(file: &Path, options: DocumentOptions) -> anyhow::Result<Document> {
    Document::open_with(file, options).with_context(|| format!("Failed to open {:?}", file))
}
