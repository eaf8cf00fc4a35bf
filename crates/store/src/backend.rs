//! Blob persistence backends.
//!
//! The store never touches the filesystem directly; it hands a fully
//! encoded snapshot to a [`BlobBackend`]. `FileBackend` is what the CLI uses,
//! `MemoryBackend` is what tests use.

use matprice_core::{Error, ErrorCode, Result};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};
use tempfile::NamedTempFile;

/// Reader/writer for the single persisted blob.
pub trait BlobBackend: Send {
    /// Current blob, or `None` when nothing has been written yet.
    fn read(&self) -> Result<Option<Vec<u8>>>;

    /// Replace the blob.
    fn write(&mut self, bytes: &[u8]) -> Result<()>;

    /// Short label for log messages.
    fn describe(&self) -> String;
}

/// Blob stored in a single local file.
///
/// Writes go to a temporary file in the same directory that is then renamed
/// over the target, so a crash mid-write leaves the previous blob intact.
#[derive(Debug, Clone)]
pub struct FileBackend {
    path: PathBuf,
}

impl FileBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn parent_dir(&self) -> PathBuf {
        match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }
}

impl BlobBackend for FileBackend {
    fn read(&self) -> Result<Option<Vec<u8>>> {
        match std::fs::read(&self.path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(Error::from(e).with_context(format!("Reading {}", self.path.display()))),
        }
    }

    fn write(&mut self, bytes: &[u8]) -> Result<()> {
        let dir = self.parent_dir();
        std::fs::create_dir_all(&dir)?;

        let mut tmp = NamedTempFile::new_in(&dir)?;
        tmp.write_all(bytes)?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path)
            .map_err(|e| Error::from(e.error).with_context(format!("Writing {}", self.path.display())))?;
        Ok(())
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Blob held in memory.
///
/// Clones share the same buffer, so dropping a store and opening a new one
/// on a clone behaves like an application restart.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    blob: Arc<RwLock<Option<Vec<u8>>>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with existing blob content.
    pub fn with_blob(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            blob: Arc::new(RwLock::new(Some(bytes.into()))),
        }
    }

    /// Copy of the current blob.
    pub fn contents(&self) -> Option<Vec<u8>> {
        self.blob.read().ok().and_then(|guard| guard.clone())
    }
}

impl BlobBackend for MemoryBackend {
    fn read(&self) -> Result<Option<Vec<u8>>> {
        let guard = self
            .blob
            .read()
            .map_err(|_| Error::new(ErrorCode::Internal, "Failed to acquire blob read lock"))?;
        Ok(guard.clone())
    }

    fn write(&mut self, bytes: &[u8]) -> Result<()> {
        let mut guard = self
            .blob
            .write()
            .map_err(|_| Error::new(ErrorCode::Internal, "Failed to acquire blob write lock"))?;
        *guard = Some(bytes.to_vec());
        Ok(())
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}
