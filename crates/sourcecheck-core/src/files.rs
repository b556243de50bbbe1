//! The workspace file arena.
//!
//! Files are stored in an arena addressed by stable [`FileKey`] handles, so
//! checkers can rename or soft-remove files while an ordered snapshot of the
//! set is being walked: both operations are O(1) updates on the arena entry,
//! never structural mutation of the collection being iterated.

use std::collections::HashMap;

use serde::Serialize;

use crate::file_types::FileType;

/// Stable, opaque handle to a file in a workspace.
///
/// A key survives renames and soft-removal; it is only meaningful within the
/// workspace that issued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct FileKey(pub(crate) usize);

/// One tracked file.
///
/// Owned exclusively by the workspace; checkers address files through
/// [`FileKey`] handles.
#[derive(Debug, Clone)]
pub struct UserFile {
    pub(crate) path: String,
    pub(crate) file_type: FileType,
    pub(crate) size_bytes: u64,
    pub(crate) is_ancillary: bool,
    pub(crate) is_removed: bool,
    pub(crate) is_checked: bool,
    pub(crate) reason_for_removal: Option<String>,
}

impl UserFile {
    pub(crate) fn new(path: String, file_type: FileType, size_bytes: u64) -> Self {
        let mut path = path;
        // Directory paths always end with '/'.
        if file_type == FileType::Directory && !path.ends_with('/') {
            path.push('/');
        }
        Self {
            path,
            file_type,
            size_bytes,
            is_ancillary: false,
            is_removed: false,
            is_checked: false,
            reason_for_removal: None,
        }
    }

    /// Path relative to the workspace root, forward-slash separated.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// File name without directory info.
    pub fn name(&self) -> &str {
        let trimmed = self.path.trim_end_matches('/');
        match trimmed.rsplit_once('/') {
            Some((_, name)) => name,
            None => trimmed,
        }
    }

    /// Extension without the leading dot, or `""` when there is none.
    pub fn ext(&self) -> &str {
        match self.name().rsplit_once('.') {
            Some((stem, ext)) if !stem.is_empty() => ext,
            _ => "",
        }
    }

    /// Containing directory, ending with `/`; `""` for top-level files.
    pub fn dir(&self) -> &str {
        match self.path.trim_end_matches('/').rsplit_once('/') {
            Some((dir, _)) => &self.path[..dir.len() + 1],
            None => "",
        }
    }

    pub fn file_type(&self) -> FileType {
        self.file_type
    }

    pub fn size_bytes(&self) -> u64 {
        self.size_bytes
    }

    pub fn is_ancillary(&self) -> bool {
        self.is_ancillary
    }

    pub fn is_removed(&self) -> bool {
        self.is_removed
    }

    pub fn is_directory(&self) -> bool {
        self.file_type == FileType::Directory
    }

    pub fn is_always_ignore(&self) -> bool {
        self.file_type.is_always_ignore()
    }

    /// Whether this file is zero-length.
    pub fn is_empty(&self) -> bool {
        self.size_bytes == 0
    }

    /// Why the file was soft-removed, when it was.
    pub fn reason_for_removal(&self) -> Option<&str> {
        self.reason_for_removal.as_deref()
    }
}

/// Arena of [`UserFile`] entries with a live-path lookup map.
///
/// Soft-removed entries stay in the arena for audit; only live entries are
/// reachable by path.
#[derive(Debug, Default)]
pub struct FileIndex {
    entries: Vec<UserFile>,
    by_path: HashMap<String, FileKey>,
}

impl FileIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a file, replacing any live entry at the same path in place.
    pub fn insert(&mut self, file: UserFile) -> FileKey {
        if let Some(&existing) = self.by_path.get(&file.path) {
            self.entries[existing.0] = file;
            return existing;
        }
        let key = FileKey(self.entries.len());
        self.by_path.insert(file.path.clone(), key);
        self.entries.push(file);
        key
    }

    /// Key of the live entry at `path`, if any.
    pub fn key_for(&self, path: &str) -> Option<FileKey> {
        self.by_path.get(path).copied()
    }

    pub fn contains(&self, path: &str) -> bool {
        self.by_path.contains_key(path)
    }

    pub fn get(&self, key: FileKey) -> Option<&UserFile> {
        self.entries.get(key.0)
    }

    pub fn get_mut(&mut self, key: FileKey) -> Option<&mut UserFile> {
        self.entries.get_mut(key.0)
    }

    /// Move the entry to a new path. The key is unchanged.
    pub fn rename(&mut self, key: FileKey, new_path: String) {
        let entry = &mut self.entries[key.0];
        self.by_path.remove(&entry.path);
        entry.path = new_path.clone();
        self.by_path.insert(new_path, key);
    }

    /// Soft-remove the entry: it drops out of path lookup and live
    /// iteration but is retained for audit.
    pub fn remove(&mut self, key: FileKey, reason: String) {
        let entry = &mut self.entries[key.0];
        self.by_path.remove(&entry.path);
        entry.is_removed = true;
        entry.reason_for_removal = Some(reason);
    }

    /// All entries, removed ones included, in insertion order.
    pub fn all(&self) -> impl Iterator<Item = (FileKey, &UserFile)> {
        self.entries.iter().enumerate().map(|(i, f)| (FileKey(i), f))
    }

    /// Live (non-removed) entries, in insertion order.
    pub fn live(&self) -> impl Iterator<Item = (FileKey, &UserFile)> {
        self.all().filter(|(_, f)| !f.is_removed)
    }

    /// Keys of live entries, ordered by path ascending.
    pub fn live_keys_by_path(&self) -> Vec<FileKey> {
        let mut keys: Vec<(&str, FileKey)> =
            self.live().map(|(k, f)| (f.path.as_str(), k)).collect();
        keys.sort_by(|a, b| a.0.cmp(b.0));
        keys.into_iter().map(|(_, k)| k).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
