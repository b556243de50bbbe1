//! Canonical filename extensions for known formats.

use crate::checks::{Capabilities, Checker, CheckerMetadata};
use crate::diagnostics::{CheckResult, Code};
use crate::file_types::FileType;
use crate::files::FileKey;
use crate::workspace::Workspace;

pub const FIXED_EXTENSION: Code = "fixed_extension";

/// Renames files whose classified type implies an extension they do not
/// carry (`fig.eps` → `fig.ps` for a PostScript file, and so on). The
/// classification itself is never touched.
pub struct FixFileExtensions;

impl FixFileExtensions {
    fn change_extension(
        &self,
        workspace: &mut Workspace,
        file: FileKey,
        extension: &str,
    ) -> CheckResult<FileKey> {
        let (prev_name, dir, stem) = {
            let f = workspace.file(file)?;
            let name = f.name();
            let stem = match name.rsplit_once('.') {
                Some((stem, _)) if !stem.is_empty() => stem,
                _ => name,
            };
            (name.to_string(), f.dir().to_string(), stem.to_string())
        };
        let new_name = format!("{stem}.{extension}");
        workspace.rename(file, &format!("{dir}{new_name}"))?;
        workspace.add_warning(
            file,
            FIXED_EXTENSION,
            format!("Renamed '{prev_name}' to '{new_name}'."),
            false,
        )?;
        Ok(file)
    }
}

impl Checker for FixFileExtensions {
    fn metadata(&self) -> CheckerMetadata {
        CheckerMetadata {
            name: self.name(),
            codes: &[FIXED_EXTENSION],
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
        let Some(extension) = file_type.canonical_extension() else {
            return Ok(file);
        };
        if workspace.file(file)?.ext() == extension {
            return Ok(file);
        }
        self.change_extension(workspace, file, extension)
    }
}
