//! Methods for checking for invalid file types.

use crate::checks::{Capabilities, Checker, CheckerMetadata};
use crate::diagnostics::{CheckResult, Code};
use crate::file_types::FileType;
use crate::files::FileKey;
use crate::workspace::{SourceType, Workspace};

pub const DISALLOWED_FILE_TYPE: Code = "disallowed_file_type";

/// Flags single-file submissions of types that are not accepted.
///
/// Uses its own diagnostic code rather than `invalid_source_type`, so that a
/// later retraction of the source-type code cannot clear these judgments.
pub struct FlagDisallowedTypes;

impl FlagDisallowedTypes {
    const DOCX_MESSAGE: &'static str =
        "Submissions in docx are not supported. Please create a PDF file and \
         submit that instead; server-side conversion of .docx can lead to \
         incorrect font substitutions, among other problems.";
    const ODF_MESSAGE: &'static str =
        "OpenDocument submissions are not supported. Please submit PDF instead.";
    const EPS_MESSAGE: &'static str =
        "This file appears to be a single encapsulated PostScript file.";
    const TEXAUX_MESSAGE: &'static str =
        "This file appears to be a single auxiliary TeX file.";

    fn flag(
        &self,
        workspace: &mut Workspace,
        file: FileKey,
        message: &'static str,
    ) -> CheckResult<FileKey> {
        if workspace.file_count() == 1 {
            workspace.set_source_type(SourceType::Invalid);
            workspace.add_error(file, DISALLOWED_FILE_TYPE, message)?;
        }
        Ok(file)
    }
}

impl Checker for FlagDisallowedTypes {
    fn metadata(&self) -> CheckerMetadata {
        CheckerMetadata {
            name: self.name(),
            codes: &[DISALLOWED_FILE_TYPE],
        }
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities {
            typed: true,
            ..Capabilities::NONE
        }
    }

    fn check_typed(
        &self,
        workspace: &mut Workspace,
        file: FileKey,
        file_type: FileType,
    ) -> CheckResult<FileKey> {
        match file_type {
            FileType::Docx => self.flag(workspace, file, Self::DOCX_MESSAGE),
            FileType::Odf => self.flag(workspace, file, Self::ODF_MESSAGE),
            FileType::DosEps => self.flag(workspace, file, Self::EPS_MESSAGE),
            FileType::TexAux => self.flag(workspace, file, Self::TEXAUX_MESSAGE),
            _ => Ok(file),
        }
    }
}
