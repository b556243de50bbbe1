//! The workspace aggregate: file arena, diagnostic log, derived source type,
//! registered checkers, and the storage adapter behind them.

use std::collections::HashMap;
use std::fmt;

use serde::Serialize;
use tracing::debug;

use crate::checks::Checker;
use crate::diagnostics::{CheckError, CheckResult, Code, DiagnosticLog, Scope, Severity};
use crate::file_types::FileType;
use crate::files::{FileIndex, FileKey, UserFile};
use crate::registry::CheckerRegistry;
use crate::storage::Storage;
use crate::strategy::{CheckingStrategy, SynchronousStrategy};

/// Path prefix under which ancillary files live.
pub const ANCILLARY_PREFIX: &str = "anc/";

/// Code attached to the informational note recorded when a file is removed.
pub const FILE_REMOVED: Code = "file_removed";

/// High-level type of the submission source as a whole.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    Unknown,
    Invalid,
    #[serde(rename = "ps")]
    Postscript,
    Pdf,
    Html,
    Tex,
}

impl SourceType {
    /// Whether the slot is still unclaimed for the current run.
    pub fn is_unknown(self) -> bool {
        self == SourceType::Unknown
    }

    pub fn is_invalid(self) -> bool {
        self == SourceType::Invalid
    }
}

/// File counts per type, recomputed on demand from the live file set.
///
/// Per-type tallies cover live, non-directory, non-ancillary files that are
/// not of an always-ignore type; those two groups are carried in the
/// synthetic [`ancillary`](TypeCounts::ancillary) and
/// [`ignore`](TypeCounts::ignore) counters instead.
#[derive(Debug, Clone, Default)]
pub struct TypeCounts {
    counts: HashMap<FileType, usize>,
    /// Every live, non-directory file.
    pub all_files: usize,
    /// Live ancillary files.
    pub ancillary: usize,
    /// Live files of an always-ignore type.
    pub ignore: usize,
}

impl TypeCounts {
    /// Tally for one file type.
    pub fn count(&self, file_type: FileType) -> usize {
        self.counts.get(&file_type).copied().unwrap_or(0)
    }

    /// Countable source files: everything but ancillary material.
    pub fn files(&self) -> usize {
        self.all_files - self.ancillary
    }
}

/// The in-memory aggregate representing one submission's file tree plus its
/// validation state.
pub struct Workspace {
    files: FileIndex,
    log: DiagnosticLog,
    source_type: SourceType,
    checkers: Vec<Box<dyn Checker>>,
    strategy: Option<Box<dyn CheckingStrategy>>,
    storage: Box<dyn Storage>,
}

impl fmt::Debug for Workspace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Workspace")
            .field("source_type", &self.source_type)
            .field("file_count", &self.file_count())
            .field("diagnostics", &self.log.len())
            .field("checkers", &self.checker_names())
            .finish()
    }
}

impl Workspace {
    /// Create an empty workspace over the given storage adapter, with no
    /// checkers registered and the synchronous strategy installed.
    pub fn new(storage: Box<dyn Storage>) -> Self {
        Self {
            files: FileIndex::new(),
            log: DiagnosticLog::new(),
            source_type: SourceType::Unknown,
            checkers: Vec::new(),
            strategy: Some(Box::new(SynchronousStrategy)),
            storage,
        }
    }

    /// Create a workspace with the default checker list registered.
    pub fn with_default_checkers(storage: Box<dyn Storage>) -> Self {
        let mut workspace = Self::new(storage);
        for checker in CheckerRegistry::with_defaults().checkers() {
            workspace.register_checker(checker);
        }
        workspace
    }

    // ===== Checker and strategy registration =====

    /// Append a checker to the ordered list. Registration order is
    /// load-bearing: tie-breaks in source-type inference depend on it.
    pub fn register_checker(&mut self, checker: Box<dyn Checker>) {
        self.checkers.push(checker);
    }

    /// Names of the registered checkers, in registration order.
    pub fn checker_names(&self) -> Vec<&'static str> {
        self.checkers.iter().map(|c| c.name()).collect()
    }

    pub fn set_strategy(&mut self, strategy: Box<dyn CheckingStrategy>) {
        self.strategy = Some(strategy);
    }

    /// Run every registered checker over the current file set using the
    /// installed strategy.
    ///
    /// Safe to re-run: the source type is re-derived from scratch and every
    /// file is re-visited. Persistent diagnostics from earlier runs are
    /// retained; non-persistent ones are re-derived and deduplicated.
    pub fn perform_checks(&mut self) -> CheckResult<()> {
        debug!(files = self.file_count(), "perform checks");
        self.source_type = SourceType::Unknown;
        self.mark_all_unchecked();
        let strategy = self.strategy.take().ok_or(CheckError::NoStrategy)?;
        let result = strategy.check(self);
        self.strategy = Some(strategy);
        result
    }

    // ===== File set =====

    /// Create a file in the workspace and in storage.
    ///
    /// Missing parent directories get `Directory` entries. A path under
    /// `anc/` is ancillary. A live file already at `path` is replaced in
    /// place.
    pub fn create(
        &mut self,
        path: &str,
        file_type: FileType,
        content: &[u8],
    ) -> CheckResult<FileKey> {
        let path = path.strip_prefix("./").unwrap_or(path);
        let is_ancillary = path.starts_with(ANCILLARY_PREFIX);

        // Materialize parent directory entries.
        let parts: Vec<&str> = path.split('/').filter(|p| !p.is_empty()).collect();
        let mut parent = String::new();
        for part in parts.iter().take(parts.len().saturating_sub(1)) {
            let next = format!("{parent}{part}/");
            if !self.files.contains(&next) {
                let mut dir = UserFile::new(next.clone(), FileType::Directory, 0);
                dir.is_ancillary = is_ancillary;
                self.files.insert(dir);
            }
            parent = next;
        }

        let mut file = UserFile::new(path.to_string(), file_type, content.len() as u64);
        file.is_ancillary = is_ancillary;
        if file_type != FileType::Directory {
            self.storage.create(path, content)?;
        }
        debug!(path, ?file_type, "create file");
        Ok(self.files.insert(file))
    }

    /// Rename a file in place. The handle stays valid; subsequent hooks and
    /// passes address the file by its new identity.
    pub fn rename(&mut self, key: FileKey, new_path: &str) -> CheckResult<()> {
        let (old_path, is_directory) = {
            let file = self.live_file(key)?;
            (file.path().to_string(), file.is_directory())
        };
        if is_directory {
            let new_dir = if new_path.ends_with('/') {
                new_path.to_string()
            } else {
                format!("{new_path}/")
            };
            // Storage has no directory objects; move the children one by one
            // and fix up their index entries.
            let children: Vec<(FileKey, String, bool)> = self
                .files
                .live()
                .filter(|(k, f)| *k != key && f.path().starts_with(old_path.as_str()))
                .map(|(k, f)| (k, f.path().to_string(), f.is_directory()))
                .collect();
            for (child_key, child_path, child_is_dir) in children {
                let child_new = format!("{new_dir}{}", &child_path[old_path.len()..]);
                if !child_is_dir {
                    self.storage.rename(&child_path, &child_new)?;
                }
                self.files.rename(child_key, child_new);
            }
            debug!(from = %old_path, to = %new_dir, "rename directory");
            self.files.rename(key, new_dir);
        } else {
            self.storage.rename(&old_path, new_path)?;
            debug!(from = %old_path, to = %new_path, "rename file");
            self.files.rename(key, new_path.to_string());
        }
        Ok(())
    }

    /// Soft-remove a file: it leaves counts and iteration but is retained
    /// for audit, and an informational note lands in the log.
    pub fn remove(&mut self, key: FileKey, reason: impl Into<String>) -> CheckResult<()> {
        let reason = reason.into();
        let (path, is_directory) = {
            let file = self.live_file(key)?;
            (file.path().to_string(), file.is_directory())
        };
        debug!(%path, %reason, "remove file");
        if is_directory {
            let children: Vec<(FileKey, String, bool)> = self
                .files
                .live()
                .filter(|(k, f)| *k != key && f.path().starts_with(path.as_str()))
                .map(|(k, f)| (k, f.path().to_string(), f.is_directory()))
                .collect();
            for (child_key, child_path, child_is_dir) in children {
                if !child_is_dir {
                    self.storage.remove(&child_path)?;
                }
                self.files
                    .remove(child_key, format!("Removed with '{path}'."));
            }
        } else {
            self.storage.remove(&path)?;
        }
        self.log.add(
            Scope::File(key),
            Some(path),
            Severity::Warning,
            FILE_REMOVED,
            reason.clone(),
            false,
        );
        self.files.remove(key, reason);
        Ok(())
    }

    /// Whether a live file exists at `path`.
    pub fn exists(&self, path: &str) -> bool {
        self.files.contains(path)
    }

    /// Handle of the live file at `path`, if any.
    pub fn key_for(&self, path: &str) -> Option<FileKey> {
        self.files.key_for(path)
    }

    /// The file behind a handle, removed entries included.
    pub fn get(&self, key: FileKey) -> Option<&UserFile> {
        self.files.get(key)
    }

    /// The file behind a handle, or a contract error for a dangling key.
    pub fn file(&self, key: FileKey) -> CheckResult<&UserFile> {
        self.files.get(key).ok_or(CheckError::UnknownFile)
    }

    fn live_file(&self, key: FileKey) -> CheckResult<&UserFile> {
        match self.files.get(key) {
            Some(file) if !file.is_removed() => Ok(file),
            _ => Err(CheckError::UnknownFile),
        }
    }

    /// Live files, directories included, in insertion order.
    pub fn iter_files(&self) -> impl Iterator<Item = (FileKey, &UserFile)> {
        self.files.live()
    }

    /// All files ever added, removed entries included.
    pub fn iter_all_files(&self) -> impl Iterator<Item = (FileKey, &UserFile)> {
        self.files.all()
    }

    // ===== Counts =====

    /// Count of live, non-directory files (ancillary files included).
    pub fn file_count(&self) -> usize {
        self.files
            .live()
            .filter(|(_, f)| !f.is_directory())
            .count()
    }

    /// Count of live ancillary files.
    pub fn ancillary_file_count(&self) -> usize {
        self.files
            .live()
            .filter(|(_, f)| !f.is_directory() && f.is_ancillary())
            .count()
    }

    /// Per-type tallies over the live file set. Never cached; every call
    /// reflects the current state of the arena.
    pub fn type_counts(&self) -> TypeCounts {
        let mut counts = TypeCounts::default();
        for (_, file) in self.files.live() {
            if file.is_directory() {
                continue;
            }
            counts.all_files += 1;
            if file.is_ancillary() {
                counts.ancillary += 1;
                continue;
            }
            if file.is_always_ignore() {
                counts.ignore += 1;
                continue;
            }
            *counts.counts.entry(file.file_type()).or_insert(0) += 1;
        }
        counts
    }

    // ===== Source type =====

    pub fn source_type(&self) -> SourceType {
        self.source_type
    }

    pub fn set_source_type(&mut self, source_type: SourceType) {
        debug!(?source_type, "set source type");
        self.source_type = source_type;
    }

    // ===== Diagnostics =====

    /// Attach a warning to a file.
    pub fn add_warning(
        &mut self,
        key: FileKey,
        code: Code,
        message: impl Into<String>,
        persistent: bool,
    ) -> CheckResult<()> {
        let path = self.file(key)?.path().to_string();
        self.log.add(
            Scope::File(key),
            Some(path),
            Severity::Warning,
            code,
            message,
            persistent,
        );
        Ok(())
    }

    /// Attach a persistent error to a file.
    pub fn add_error(
        &mut self,
        key: FileKey,
        code: Code,
        message: impl Into<String>,
    ) -> CheckResult<()> {
        let path = self.file(key)?.path().to_string();
        self.log.add(
            Scope::File(key),
            Some(path),
            Severity::Error,
            code,
            message,
            true,
        );
        Ok(())
    }

    /// Attach a warning to the workspace itself.
    pub fn add_warning_non_file(&mut self, code: Code, message: impl Into<String>, persistent: bool) {
        self.log
            .add(Scope::Workspace, None, Severity::Warning, code, message, persistent);
    }

    /// Attach a persistent error to the workspace itself.
    pub fn add_error_non_file(&mut self, code: Code, message: impl Into<String>) {
        self.log
            .add(Scope::Workspace, None, Severity::Error, code, message, true);
    }

    /// Retract every error with the given code, workspace-wide.
    pub fn remove_error(&mut self, code: Code) -> usize {
        self.log.remove_error(code)
    }

    /// Whether any active persistent error remains.
    pub fn has_errors(&self) -> bool {
        self.log.has_errors()
    }

    /// The ordered diagnostic log.
    pub fn log(&self) -> &DiagnosticLog {
        &self.log
    }

    // ===== Engine support =====

    pub(crate) fn take_checkers(&mut self) -> Vec<Box<dyn Checker>> {
        std::mem::take(&mut self.checkers)
    }

    pub(crate) fn restore_checkers(&mut self, checkers: Vec<Box<dyn Checker>>) {
        self.checkers = checkers;
    }

    /// Whether the handle refers to a live file.
    pub(crate) fn is_live(&self, key: FileKey) -> bool {
        self.files.get(key).is_some_and(|f| !f.is_removed())
    }

    pub(crate) fn file_type_of(&self, key: FileKey) -> CheckResult<FileType> {
        Ok(self.file(key)?.file_type())
    }

    /// Ordered snapshot (path ascending) of live files not yet visited in
    /// the current run.
    pub(crate) fn snapshot_unchecked(&self) -> Vec<FileKey> {
        self.files
            .live_keys_by_path()
            .into_iter()
            .filter(|&k| self.files.get(k).is_some_and(|f| !f.is_checked))
            .collect()
    }

    pub(crate) fn has_unchecked_files(&self) -> bool {
        self.files.live().any(|(_, f)| !f.is_checked)
    }

    pub(crate) fn mark_all_unchecked(&mut self) {
        let keys: Vec<FileKey> = self.files.all().map(|(k, _)| k).collect();
        for key in keys {
            if let Some(file) = self.files.get_mut(key) {
                file.is_checked = false;
            }
        }
    }

    /// Mark every live file as visited for this run.
    pub(crate) fn mark_all_checked(&mut self) {
        let keys: Vec<FileKey> = self.files.live().map(|(k, _)| k).collect();
        for key in keys {
            if let Some(file) = self.files.get_mut(key) {
                file.is_checked = true;
            }
        }
    }
}
