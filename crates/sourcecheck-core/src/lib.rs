//! # sourcecheck-core
//!
//! Validation pipeline for submitted source packages.
//!
//! A [`Workspace`] owns the file set of one submission, a queryable
//! [`DiagnosticLog`], and the derived overall [`SourceType`]. Callers
//! register an ordered list of [`Checker`]s, then invoke
//! [`Workspace::perform_checks`]: every checker walks the file set through
//! up to four optional hooks, repairing files, recording coded diagnostics,
//! and converging on a single classification for the whole submission.
//!
//! The pipeline is a library with narrow edges: bytes are reached only
//! through the [`Storage`] adapter, file types come from an external
//! classifier (callers pass a [`FileType`] when adding a file), and results
//! are exposed read-only (see [`Workspace::summary`]). Checking is
//! sequential and deterministic; [`CheckQueue`] defers the same algorithm to
//! a worker thread when the caller cannot block.
//!
//! ```
//! use sourcecheck_core::{FileType, MemoryStorage, SourceType, Workspace};
//!
//! let mut workspace = Workspace::with_default_checkers(Box::new(MemoryStorage::new()));
//! workspace
//!     .create("main.tex", FileType::Latex, b"\\documentclass{article}")
//!     .unwrap();
//! workspace.perform_checks().unwrap();
//! assert_eq!(workspace.source_type(), SourceType::Tex);
//! ```

pub mod checks;
pub mod diagnostics;
pub mod file_types;
pub mod files;
pub mod registry;
pub mod storage;
pub mod strategy;
pub mod summary;
pub mod workspace;

pub use checks::{Capabilities, Checker, CheckerMetadata};
pub use diagnostics::{
    CheckError, CheckResult, Code, Diagnostic, DiagnosticLog, Scope, Severity, StorageError,
};
pub use file_types::FileType;
pub use files::{FileKey, UserFile};
pub use registry::{CheckerFactory, CheckerRegistry, CheckerRegistryBuilder};
pub use storage::{MemoryStorage, Storage};
pub use strategy::{CheckJob, CheckQueue, CheckingStrategy, JobResult, SynchronousStrategy};
pub use summary::{FileSummary, WorkspaceSummary};
pub use workspace::{ANCILLARY_PREFIX, FILE_REMOVED, SourceType, TypeCounts, Workspace};
