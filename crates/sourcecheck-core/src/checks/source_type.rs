//! Inference of the overall source type for a workspace.

use tracing::debug;

use crate::checks::{Capabilities, Checker, CheckerMetadata};
use crate::diagnostics::{CheckResult, Code};
use crate::file_types::FileType;
use crate::files::FileKey;
use crate::workspace::{SourceType, Workspace};

pub const INVALID_SOURCE_TYPE: Code = "invalid_source_type";

/// Attempt to determine the source type for the workspace as a whole.
///
/// Multi-file rules live in the workspace hook; single-file rules are spread
/// over the per-file hooks. PDF detection is authoritative for single-file
/// submissions: it overrides an earlier invalid judgment from the ancillary
/// rule and retracts the accompanying error.
pub struct InferSourceType;

impl InferSourceType {
    const ALL_IGNORE_MESSAGE: &'static str =
        "All files in this submission are of types that are ignored \
         automatically, so there is no usable source content.";
    const SINGLE_ANCILLARY_MESSAGE: &'static str =
        "Found single ancillary file. Invalid submission.";
    const SINGLE_FILE_UNKNOWN_MESSAGE: &'static str = "Could not determine file type.";
    const UNSUPPORTED_MESSAGE: &'static str = "Unsupported submission type.";

    fn check_tex_types(&self, workspace: &mut Workspace, file: FileKey) -> CheckResult<FileKey> {
        if workspace.source_type().is_unknown() && workspace.file_count() == 1 {
            workspace.remove_error(INVALID_SOURCE_TYPE);
            workspace.set_source_type(SourceType::Tex);
        }
        Ok(file)
    }

    fn check_postscript(&self, workspace: &mut Workspace, file: FileKey) -> CheckResult<FileKey> {
        if workspace.source_type().is_unknown() && workspace.file_count() == 1 {
            workspace.remove_error(INVALID_SOURCE_TYPE);
            workspace.set_source_type(SourceType::Postscript);
        }
        Ok(file)
    }

    fn check_pdf(&self, workspace: &mut Workspace, file: FileKey) -> CheckResult<FileKey> {
        // No is_unknown guard: a single PDF file is a PDF submission even if
        // an earlier rule already flagged the workspace invalid.
        if workspace.file_count() == 1 {
            workspace.remove_error(INVALID_SOURCE_TYPE);
            workspace.set_source_type(SourceType::Pdf);
        }
        Ok(file)
    }

    fn check_html(&self, workspace: &mut Workspace, file: FileKey) -> CheckResult<FileKey> {
        if workspace.source_type().is_unknown() && workspace.file_count() == 1 {
            workspace.remove_error(INVALID_SOURCE_TYPE);
            workspace.set_source_type(SourceType::Html);
        }
        Ok(file)
    }

    fn check_failed(&self, workspace: &mut Workspace, file: FileKey) -> CheckResult<FileKey> {
        if workspace.source_type().is_unknown() && workspace.file_count() == 1 {
            workspace.set_source_type(SourceType::Invalid);
            workspace.add_error_non_file(INVALID_SOURCE_TYPE, Self::SINGLE_FILE_UNKNOWN_MESSAGE);
        }
        Ok(file)
    }
}

impl Checker for InferSourceType {
    fn metadata(&self) -> CheckerMetadata {
        CheckerMetadata {
            name: self.name(),
            codes: &[INVALID_SOURCE_TYPE],
        }
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::ALL
    }

    /// Single-file rule: a lone ancillary or always-ignore file is not a
    /// valid submission.
    fn check(&self, workspace: &mut Workspace, file: FileKey) -> CheckResult<FileKey> {
        if workspace.file_count() != 1 {
            return Ok(file);
        }
        let (is_ancillary, is_always_ignore) = {
            let f = workspace.file(file)?;
            (f.is_ancillary(), f.is_always_ignore())
        };
        // PDF outranks this rule, so never downgrade a PDF determination.
        if (is_ancillary || is_always_ignore) && workspace.source_type() != SourceType::Pdf {
            debug!("ancillary or always-ignore file; invalid source");
            workspace.set_source_type(SourceType::Invalid);
            workspace.add_error_non_file(INVALID_SOURCE_TYPE, Self::SINGLE_ANCILLARY_MESSAGE);
        }
        Ok(file)
    }

    fn check_typed(
        &self,
        workspace: &mut Workspace,
        file: FileKey,
        file_type: FileType,
    ) -> CheckResult<FileKey> {
        match file_type {
            t if t.is_tex_type() => self.check_tex_types(workspace, file),
            FileType::Postscript => self.check_postscript(workspace, file),
            FileType::Pdf => self.check_pdf(workspace, file),
            FileType::Html => self.check_html(workspace, file),
            FileType::Failed => self.check_failed(workspace, file),
            _ => Ok(file),
        }
    }

    /// Determine the source type for the workspace as a whole.
    fn check_workspace(&self, workspace: &mut Workspace) -> CheckResult<()> {
        if workspace.file_count() == 0 {
            // Users are allowed to remove every file, so an empty workspace
            // is invalid without any diagnostic of its own.
            debug!("workspace has no files; source type is invalid");
            workspace.set_source_type(SourceType::Invalid);
            return Ok(());
        }
        if !workspace.source_type().is_unknown() {
            return Ok(());
        }
        if workspace.file_count() == 1 {
            // The single-file hooks own this case.
            return Ok(());
        }

        let counts = workspace.type_counts();

        // HTML submissions may contain the formats below.
        let html_aux_count = counts.count(FileType::Html)
            + counts.count(FileType::Image)
            + counts.count(FileType::Include)
            + counts.count(FileType::Postscript)
            + counts.count(FileType::Pdf)
            + counts.count(FileType::Directory)
            + counts.count(FileType::Readme);

        // A postscript submission may be composed of several other formats.
        let postscript_aux_count = counts.count(FileType::Postscript)
            + counts.count(FileType::Pdf)
            + counts.ignore
            + counts.count(FileType::Directory)
            + counts.count(FileType::Image);

        if counts.files() == counts.ignore {
            workspace.set_source_type(SourceType::Invalid);
            workspace.add_warning_non_file(INVALID_SOURCE_TYPE, Self::ALL_IGNORE_MESSAGE, false);
            debug!("all files are auto-ignore; source type is invalid");
        } else if counts.all_files > 0 && counts.files() == 0 {
            // Only ancillary material remains; the primary source is gone.
            workspace.set_source_type(SourceType::Invalid);
        } else if counts.count(FileType::Html) > 0 && counts.files() == html_aux_count {
            workspace.remove_error(INVALID_SOURCE_TYPE);
            workspace.set_source_type(SourceType::Html);
        } else if counts.count(FileType::Postscript) > 0 && counts.files() == postscript_aux_count
        {
            workspace.remove_error(INVALID_SOURCE_TYPE);
            workspace.set_source_type(SourceType::Postscript);
        } else {
            // Default source type is TeX.
            workspace.remove_error(INVALID_SOURCE_TYPE);
            workspace.set_source_type(SourceType::Tex);
        }
        Ok(())
    }

    /// Catch-all: a single file that nothing above could place.
    fn check_finally(&self, workspace: &mut Workspace, file: FileKey) -> CheckResult<FileKey> {
        if workspace.source_type().is_unknown() && workspace.file_count() == 1 {
            debug!("source type not known, and only one file");
            workspace.set_source_type(SourceType::Invalid);
            workspace.add_error_non_file(INVALID_SOURCE_TYPE, Self::UNSUPPORTED_MESSAGE);
        }
        Ok(file)
    }
}
