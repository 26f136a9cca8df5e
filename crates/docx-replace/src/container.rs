use std::fs::{self, File};
use std::io::{Read as _, Write as _};
use std::path::{Path, PathBuf};

use docx_replace_core::{Container, ReplaceError, Result};
use tracing::{debug, info};
use zip::result::ZipError;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

/// A .docx (zip) archive held open for the lifetime of this value.
///
/// The file handle is released on drop, whether or not anything was written.
pub struct ZipContainer {
    path: PathBuf,
    archive: ZipArchive<File>,
}

impl ZipContainer {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ReplaceError::NotFound(path.to_path_buf()));
        }
        let archive = open_archive(path)?;
        debug!("Opened archive {:?} with {} entries", path, archive.len());
        Ok(Self {
            path: path.to_path_buf(),
            archive,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn entry_names(&self) -> Vec<String> {
        self.archive.file_names().map(str::to_string).collect()
    }

    /// Writes a copy of the archive to `dest` with entry `name` set to `bytes`.
    ///
    /// Every other entry is copied raw, without recompression. The copy is
    /// built in a temporary sibling of `dest` and renamed into place.
    pub fn write_entry_to(&mut self, dest: &Path, name: &str, bytes: &[u8]) -> Result<()> {
        let temp_path = dest.with_extension("docx.tmp");
        if let Err(err) = self.write_archive(&temp_path, name, bytes) {
            let _ = fs::remove_file(&temp_path);
            return Err(err);
        }
        if let Err(err) = fs::rename(&temp_path, dest) {
            let _ = fs::remove_file(&temp_path);
            return Err(err.into());
        }
        info!("Wrote {} ({} bytes) to {:?}", name, bytes.len(), dest);
        Ok(())
    }

    fn write_archive(&mut self, dest: &Path, name: &str, bytes: &[u8]) -> Result<()> {
        let mut writer = ZipWriter::new(File::create(dest)?);

        let mut replaced = false;
        for i in 0..self.archive.len() {
            let entry = self.archive.by_index_raw(i).map_err(container_error)?;
            if entry.name() == name {
                writer.start_file(name, entry_options()).map_err(container_error)?;
                writer.write_all(bytes)?;
                replaced = true;
            } else {
                writer.raw_copy_file(entry).map_err(container_error)?;
            }
        }
        if !replaced {
            writer.start_file(name, entry_options()).map_err(container_error)?;
            writer.write_all(bytes)?;
        }

        writer.finish().map_err(container_error)?;
        Ok(())
    }
}

impl Container for ZipContainer {
    fn read_entry(&mut self, name: &str) -> Result<Option<Vec<u8>>> {
        let mut entry = match self.archive.by_name(name) {
            Ok(entry) => entry,
            Err(ZipError::FileNotFound) => return Ok(None),
            Err(err) => return Err(container_error(err)),
        };
        let mut buf = Vec::with_capacity(entry.size() as usize);
        entry.read_to_end(&mut buf)?;
        Ok(Some(buf))
    }

    /// Rewrites the archive in place, then reopens it.
    fn write_entry(&mut self, name: &str, bytes: &[u8]) -> Result<()> {
        let path = self.path.clone();
        self.write_entry_to(&path, name, bytes)?;
        self.archive = open_archive(&path)?;
        Ok(())
    }
}

impl Drop for ZipContainer {
    fn drop(&mut self) {
        debug!("Closing archive {:?}", self.path);
    }
}

fn open_archive(path: &Path) -> Result<ZipArchive<File>> {
    let file = File::open(path)?;
    ZipArchive::new(file).map_err(|e| {
        ReplaceError::InvalidStructure(format!("{:?} is not a zip archive: {}", path, e))
    })
}

fn entry_options() -> SimpleFileOptions {
    SimpleFileOptions::default().compression_method(CompressionMethod::Deflated)
}

fn container_error(err: ZipError) -> ReplaceError {
    ReplaceError::Container(err.to_string())
}
