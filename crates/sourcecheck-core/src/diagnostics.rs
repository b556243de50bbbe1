//! Diagnostic types, the workspace diagnostic log, and error reporting.

use serde::Serialize;
use thiserror::Error;

use crate::files::FileKey;

/// Result alias for fallible pipeline operations.
pub type CheckResult<T> = Result<T, CheckError>;

/// Symbolic identifier of a diagnostic condition.
///
/// Codes are registered in the `sourcecheck-codes` crate and are the stable
/// key for retraction and display grouping; messages may be reworded freely.
pub type Code = &'static str;

/// Severity of a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

/// What a diagnostic is about: one file, or the workspace as a whole.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    Workspace,
    File(FileKey),
}

/// One warning or error recorded against a workspace.
#[derive(Debug, Clone, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub code: Code,
    pub message: String,
    #[serde(skip)]
    pub scope: Scope,
    /// Path of the file the diagnostic is about, captured at emission time.
    /// `None` for workspace-level diagnostics.
    pub path: Option<String>,
    /// Persistent diagnostics block the submission from being considered
    /// valid; non-persistent ones are informational (e.g. rename notes).
    pub persistent: bool,
    /// Set when the diagnostic was retracted by a later judgment. Retracted
    /// entries stay in the log so an export shows both the add and the
    /// removal.
    pub retracted: bool,
}

impl Diagnostic {
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    pub fn is_warning(&self) -> bool {
        self.severity == Severity::Warning
    }

    /// Registered description of this diagnostic's code, when known.
    pub fn code_description(&self) -> Option<&'static str> {
        sourcecheck_codes::get_code_description(self.code)
    }
}

/// Append-only, queryable store of the warnings and errors attached to a
/// workspace.
///
/// Entries are kept in insertion order. Among non-retracted entries there is
/// at most one per `(scope, code, severity)`; re-adding the same condition is
/// a no-op. Retraction ([`DiagnosticLog::remove_error`]) marks entries rather
/// than deleting them.
///
/// The log holds no locks; the owning workspace serializes access.
#[derive(Debug, Default)]
pub struct DiagnosticLog {
    entries: Vec<Diagnostic>,
}

impl DiagnosticLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a diagnostic. Returns `false` if an equivalent active entry
    /// already exists.
    pub fn add(
        &mut self,
        scope: Scope,
        path: Option<String>,
        severity: Severity,
        code: Code,
        message: impl Into<String>,
        persistent: bool,
    ) -> bool {
        let duplicate = self
            .entries
            .iter()
            .any(|d| !d.retracted && d.scope == scope && d.code == code && d.severity == severity);
        if duplicate {
            return false;
        }
        self.entries.push(Diagnostic {
            severity,
            code,
            message: message.into(),
            scope,
            path,
            persistent,
            retracted: false,
        });
        true
    }

    /// Retract every active error with the given code, regardless of scope.
    /// Returns the number of entries retracted.
    pub fn remove_error(&mut self, code: Code) -> usize {
        let mut retracted = 0;
        for entry in &mut self.entries {
            if !entry.retracted && entry.severity == Severity::Error && entry.code == code {
                entry.retracted = true;
                retracted += 1;
            }
        }
        retracted
    }

    /// Whether any active persistent error remains.
    pub fn has_errors(&self) -> bool {
        self.active()
            .any(|d| d.persistent && d.severity == Severity::Error)
    }

    /// Whether any active warning remains.
    pub fn has_warnings(&self) -> bool {
        self.active().any(|d| d.severity == Severity::Warning)
    }

    /// Full ordered log, retracted entries included, for display or export.
    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter()
    }

    /// Non-retracted entries, in insertion order.
    pub fn active(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter().filter(|d| !d.retracted)
    }

    /// Active diagnostics attached to one file.
    pub fn for_file(&self, key: FileKey) -> impl Iterator<Item = &Diagnostic> {
        self.active().filter(move |d| d.scope == Scope::File(key))
    }

    /// Active workspace-level diagnostics.
    pub fn workspace_level(&self) -> impl Iterator<Item = &Diagnostic> {
        self.active().filter(|d| d.scope == Scope::Workspace)
    }

    /// Whether the given code was added and later retracted at some point.
    pub fn was_retracted(&self, code: Code) -> bool {
        self.entries.iter().any(|d| d.retracted && d.code == code)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Fatal pipeline failures.
///
/// Policy violations and classification failures are *diagnostics*, never
/// errors; this type covers the conditions under which no further judgment is
/// trustworthy (unreliable storage, contract misuse).
#[derive(Error, Debug)]
pub enum CheckError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("unknown or removed file handle")]
    UnknownFile,

    #[error("no checking strategy is registered")]
    NoStrategy,

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Failures reported by a storage adapter.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("no such file in storage: {path}")]
    NotFound { path: String },

    #[error("destination already exists in storage: {path}")]
    AlreadyExists { path: String },

    #[error("storage I/O failure on {path}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(n: usize) -> FileKey {
        FileKey(n)
    }

    // ===== Idempotence =====

    #[test]
    fn test_same_scope_code_severity_is_not_duplicated() {
        let mut log = DiagnosticLog::new();
        assert!(log.add(
            Scope::File(key(0)),
            Some("a.tex".into()),
            Severity::Error,
            "bbl_missing",
            "first",
            true,
        ));
        assert!(!log.add(
            Scope::File(key(0)),
            Some("a.tex".into()),
            Severity::Error,
            "bbl_missing",
            "second",
            true,
        ));
        assert_eq!(log.active().count(), 1);
        assert_eq!(log.active().next().unwrap().message, "first");
    }

    #[test]
    fn test_same_code_different_scope_coexists() {
        let mut log = DiagnosticLog::new();
        log.add(Scope::File(key(0)), None, Severity::Error, "x", "a", true);
        log.add(Scope::File(key(1)), None, Severity::Error, "x", "b", true);
        log.add(Scope::Workspace, None, Severity::Error, "x", "c", true);
        assert_eq!(log.active().count(), 3);
    }

    #[test]
    fn test_same_code_different_severity_coexists() {
        let mut log = DiagnosticLog::new();
        log.add(Scope::File(key(0)), None, Severity::Warning, "x", "w", true);
        log.add(Scope::File(key(0)), None, Severity::Error, "x", "e", true);
        assert_eq!(log.active().count(), 2);
    }

    // ===== Retraction =====

    #[test]
    fn test_remove_error_retracts_across_scopes() {
        let mut log = DiagnosticLog::new();
        log.add(Scope::File(key(0)), None, Severity::Error, "x", "a", true);
        log.add(Scope::Workspace, None, Severity::Error, "x", "b", true);
        log.add(Scope::Workspace, None, Severity::Error, "y", "c", true);
        assert_eq!(log.remove_error("x"), 2);
        assert!(log.has_errors()); // "y" remains
        assert_eq!(log.remove_error("y"), 1);
        assert!(!log.has_errors());
    }

    #[test]
    fn test_remove_error_leaves_warnings_alone() {
        let mut log = DiagnosticLog::new();
        log.add(Scope::Workspace, None, Severity::Warning, "x", "w", true);
        assert_eq!(log.remove_error("x"), 0);
        assert!(log.has_warnings());
    }

    #[test]
    fn test_retracted_entries_remain_queryable() {
        let mut log = DiagnosticLog::new();
        log.add(Scope::Workspace, None, Severity::Error, "x", "a", true);
        log.remove_error("x");
        assert_eq!(log.active().count(), 0);
        assert_eq!(log.iter().count(), 1);
        assert!(log.was_retracted("x"));
    }

    #[test]
    fn test_re_add_after_retraction_appends_fresh_entry() {
        let mut log = DiagnosticLog::new();
        log.add(Scope::Workspace, None, Severity::Error, "x", "a", true);
        log.remove_error("x");
        assert!(log.add(Scope::Workspace, None, Severity::Error, "x", "b", true));
        // Audit trail: the retracted entry and the fresh one both visible.
        assert_eq!(log.iter().count(), 2);
        assert_eq!(log.active().count(), 1);
        assert!(log.has_errors());
        assert!(log.was_retracted("x"));
    }

    // ===== has_errors =====

    #[test]
    fn test_non_persistent_error_does_not_block() {
        let mut log = DiagnosticLog::new();
        log.add(Scope::Workspace, None, Severity::Error, "x", "a", false);
        assert!(!log.has_errors());
    }

    #[test]
    fn test_persistent_warning_does_not_block() {
        let mut log = DiagnosticLog::new();
        log.add(Scope::Workspace, None, Severity::Warning, "x", "a", true);
        assert!(!log.has_errors());
        assert!(log.has_warnings());
    }

    // ===== Queries =====

    #[test]
    fn test_for_file_and_workspace_level() {
        let mut log = DiagnosticLog::new();
        log.add(Scope::File(key(0)), None, Severity::Error, "x", "a", true);
        log.add(Scope::File(key(1)), None, Severity::Warning, "y", "b", true);
        log.add(Scope::Workspace, None, Severity::Warning, "z", "c", true);
        assert_eq!(log.for_file(key(0)).count(), 1);
        assert_eq!(log.for_file(key(1)).count(), 1);
        assert_eq!(log.for_file(key(2)).count(), 0);
        assert_eq!(log.workspace_level().count(), 1);
    }

    #[test]
    fn test_code_description_lookup() {
        let mut log = DiagnosticLog::new();
        log.add(
            Scope::Workspace,
            None,
            Severity::Error,
            "bbl_missing",
            "m",
            true,
        );
        let diag = log.iter().next().unwrap();
        assert!(diag.code_description().is_some());
    }

    #[test]
    fn test_insertion_order_preserved() {
        let mut log = DiagnosticLog::new();
        log.add(Scope::Workspace, None, Severity::Warning, "a", "1", true);
        log.add(Scope::Workspace, None, Severity::Error, "b", "2", true);
        log.add(Scope::Workspace, None, Severity::Warning, "c", "3", true);
        let codes: Vec<Code> = log.iter().map(|d| d.code).collect();
        assert_eq!(codes, vec!["a", "b", "c"]);
    }
}
