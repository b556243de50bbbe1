//! Checks for and removes hidden files and archive artifacts.

use crate::checks::{Capabilities, Checker, CheckerMetadata};
use crate::diagnostics::{CheckResult, Code};
use crate::files::FileKey;
use crate::workspace::Workspace;

pub const MACOSX_DIRECTORY: Code = "macosx_directory";
pub const HIDDEN_FILE: Code = "hidden_file";

/// Removes `__MACOSX` directories left behind by macOS archive tools.
pub struct RemoveMacOsArtifacts;

impl Checker for RemoveMacOsArtifacts {
    fn metadata(&self) -> CheckerMetadata {
        CheckerMetadata {
            name: self.name(),
            codes: &[MACOSX_DIRECTORY],
        }
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities {
            generic: true,
            ..Capabilities::NONE
        }
    }

    fn check(&self, workspace: &mut Workspace, file: FileKey) -> CheckResult<FileKey> {
        let is_macosx = {
            let f = workspace.file(file)?;
            f.is_directory() && f.name() == "__MACOSX"
        };
        if is_macosx {
            workspace.add_warning(file, MACOSX_DIRECTORY, "Removed '__MACOSX' directory.", false)?;
            workspace.remove(file, "Removed '__MACOSX' directory.")?;
        }
        Ok(file)
    }
}

/// Removes files and directories whose name starts with a dot.
pub struct RemoveHiddenFiles;

impl Checker for RemoveHiddenFiles {
    fn metadata(&self) -> CheckerMetadata {
        CheckerMetadata {
            name: self.name(),
            codes: &[HIDDEN_FILE],
        }
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities {
            generic: true,
            ..Capabilities::NONE
        }
    }

    fn check(&self, workspace: &mut Workspace, file: FileKey) -> CheckResult<FileKey> {
        let (hidden, name) = {
            let f = workspace.file(file)?;
            (f.name().starts_with('.'), f.name().to_string())
        };
        if hidden {
            workspace.add_warning(file, HIDDEN_FILE, "Hidden files are not allowed.", false)?;
            workspace.remove(file, format!("Removed file '{name}' [File not allowed]."))?;
        }
        Ok(file)
    }
}
