//! Storage adapter boundary.
//!
//! The pipeline never touches a filesystem path directly; every byte-level
//! operation goes through [`Storage`]. Hosts plug in their own adapter
//! (object store, quarantine area, plain directory); [`MemoryStorage`] is the
//! in-tree implementation used by tests and by hosts that stage submissions
//! in memory.

use std::collections::HashMap;

use crate::diagnostics::StorageError;

/// The five operations the validation pipeline needs from a backing store.
pub trait Storage: Send + std::fmt::Debug {
    /// Read the full contents of a stored file.
    fn open(&self, path: &str) -> Result<Vec<u8>, StorageError>;

    /// Create a file with the given contents, replacing any existing one.
    fn create(&mut self, path: &str, content: &[u8]) -> Result<(), StorageError>;

    /// Whether a file exists at `path`.
    fn exists(&self, path: &str) -> bool;

    /// Move a file out of the active area. The workspace treats removal as a
    /// soft delete, so adapters should quarantine rather than destroy.
    fn remove(&mut self, path: &str) -> Result<(), StorageError>;

    /// Move a file to a new path.
    fn rename(&mut self, from: &str, to: &str) -> Result<(), StorageError>;
}

/// In-memory [`Storage`] implementation.
///
/// Removed files are moved to a quarantine map, mirroring how the production
/// adapter keeps removed content around for audit.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    files: HashMap<String, Vec<u8>>,
    removed: HashMap<String, Vec<u8>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Contents of a quarantined file, if present.
    pub fn removed_contents(&self, path: &str) -> Option<&[u8]> {
        self.removed.get(path).map(|c| c.as_slice())
    }

    /// Number of active files.
    pub fn file_count(&self) -> usize {
        self.files.len()
    }
}

impl Storage for MemoryStorage {
    fn open(&self, path: &str) -> Result<Vec<u8>, StorageError> {
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| StorageError::NotFound {
                path: path.to_string(),
            })
    }

    fn create(&mut self, path: &str, content: &[u8]) -> Result<(), StorageError> {
        self.files.insert(path.to_string(), content.to_vec());
        Ok(())
    }

    fn exists(&self, path: &str) -> bool {
        self.files.contains_key(path)
    }

    fn remove(&mut self, path: &str) -> Result<(), StorageError> {
        match self.files.remove(path) {
            Some(content) => {
                self.removed.insert(path.to_string(), content);
                Ok(())
            }
            None => Err(StorageError::NotFound {
                path: path.to_string(),
            }),
        }
    }

    fn rename(&mut self, from: &str, to: &str) -> Result<(), StorageError> {
        if self.files.contains_key(to) {
            return Err(StorageError::AlreadyExists {
                path: to.to_string(),
            });
        }
        match self.files.remove(from) {
            Some(content) => {
                self.files.insert(to.to_string(), content);
                Ok(())
            }
            None => Err(StorageError::NotFound {
                path: from.to_string(),
            }),
        }
    }
}
