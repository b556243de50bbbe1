//! Check for a `processed` directory.
//!
//! A `processed` directory usually means the submitter packed up the output
//! of an earlier compilation run. Replacement handling may eventually delete
//! it outright; until then it is only flagged.

use crate::checks::{Capabilities, Checker, CheckerMetadata};
use crate::diagnostics::{CheckResult, Code};
use crate::files::FileKey;
use crate::workspace::Workspace;

pub const PROCESSED_DIRECTORY: Code = "processed_directory";

/// Check for and warn about a `processed` directory.
pub struct WarnAboutProcessedDirectory;

impl Checker for WarnAboutProcessedDirectory {
    fn metadata(&self) -> CheckerMetadata {
        CheckerMetadata {
            name: self.name(),
            codes: &[PROCESSED_DIRECTORY],
        }
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities {
            generic: true,
            ..Capabilities::NONE
        }
    }

    fn check(&self, workspace: &mut Workspace, file: FileKey) -> CheckResult<FileKey> {
        let is_processed = {
            let f = workspace.file(file)?;
            f.is_directory() && f.name() == "processed"
        };
        if is_processed {
            workspace.add_warning(
                file,
                PROCESSED_DIRECTORY,
                "Detected 'processed' directory. Please check.",
                true,
            )?;
        }
        Ok(file)
    }
}
