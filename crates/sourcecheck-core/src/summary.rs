//! Read-only snapshots of workspace state for a surrounding service.
//!
//! The pipeline persists nothing itself; a host serializes these views into
//! its API responses or database rows.

use serde::Serialize;

use crate::diagnostics::Diagnostic;
use crate::file_types::FileType;
use crate::workspace::{SourceType, Workspace};

/// One file as exposed to the host service.
#[derive(Debug, Clone, Serialize)]
pub struct FileSummary {
    pub path: String,
    pub name: String,
    pub size_bytes: u64,
    pub file_type: FileType,
    pub removed: bool,
    pub ancillary: bool,
}

/// Snapshot of everything a host needs to serialize about a workspace.
#[derive(Debug, Clone, Serialize)]
pub struct WorkspaceSummary {
    pub source_type: SourceType,
    pub has_errors: bool,
    pub file_count: usize,
    pub ancillary_file_count: usize,
    /// Every file ever tracked, removed entries included.
    pub files: Vec<FileSummary>,
    /// The full ordered diagnostic log, retracted entries included.
    pub diagnostics: Vec<Diagnostic>,
}

impl Workspace {
    /// Build a serializable snapshot of the workspace state.
    pub fn summary(&self) -> WorkspaceSummary {
        let files = self
            .iter_all_files()
            .map(|(_, f)| FileSummary {
                path: f.path().to_string(),
                name: f.name().to_string(),
                size_bytes: f.size_bytes(),
                file_type: f.file_type(),
                removed: f.is_removed(),
                ancillary: f.is_ancillary(),
            })
            .collect();
        WorkspaceSummary {
            source_type: self.source_type(),
            has_errors: self.has_errors(),
            file_count: self.file_count(),
            ancillary_file_count: self.ancillary_file_count(),
            files,
            diagnostics: self.log().iter().cloned().collect(),
        }
    }
}
