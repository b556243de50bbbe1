//! Check for and remove zero-length files.

use crate::checks::{Capabilities, Checker, CheckerMetadata};
use crate::diagnostics::{CheckResult, Code};
use crate::files::FileKey;
use crate::workspace::Workspace;

pub const EMPTY_FILE: Code = "empty_file";

/// Removes zero-length regular files.
pub struct RemoveEmptyFiles;

impl Checker for RemoveEmptyFiles {
    fn metadata(&self) -> CheckerMetadata {
        CheckerMetadata {
            name: self.name(),
            codes: &[EMPTY_FILE],
        }
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities {
            generic: true,
            ..Capabilities::NONE
        }
    }

    fn check(&self, workspace: &mut Workspace, file: FileKey) -> CheckResult<FileKey> {
        let (empty, name) = {
            let f = workspace.file(file)?;
            (!f.is_directory() && f.is_empty(), f.name().to_string())
        };
        if empty {
            workspace.add_warning(
                file,
                EMPTY_FILE,
                format!("File '{name}' is empty (size is zero)."),
                false,
            )?;
            workspace.remove(file, format!("Removed file '{name}' [file is empty]."))?;
        }
        Ok(file)
    }
}
