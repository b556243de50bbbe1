//! Checks for possible missing references.

use std::sync::LazyLock;

use regex::Regex;

use crate::checks::{Capabilities, Checker, CheckerMetadata};
use crate::diagnostics::{CheckResult, Code};
use crate::files::FileKey;
use crate::workspace::Workspace;

pub const BIB_WITH_BBL: Code = "bib_with_bbl";
pub const BIB_NO_BBL: Code = "bib_no_bbl";
pub const BBL_MISSING: Code = "bbl_missing";

static BIB_FILE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(.*)\.bib$").expect("valid bib pattern"));

/// Checks for `.bib` files, and removes them when the compiled `.bbl` is
/// bundled.
///
/// A `.bib` without its `.bbl` is not deleted: it stays in place as the
/// marker of a blocking error until the `.bbl` shows up, at which point the
/// `.bib` is dropped and the error retracted.
pub struct CheckMissingReferences;

impl CheckMissingReferences {
    const BIB_WITH_BBL_MESSAGE: &'static str =
        "bibtex is not run during processing, so the .bib database is not \
         used; the bundled .bbl file provides the references.";
    const BIB_NO_BBL_MESSAGE: &'static str =
        "bibtex is not run during processing. Include the .bbl file that \
         bibtex produces on your machine; otherwise the references will not \
         come out correctly.";

    fn check_for_missing_bbl(&self, workspace: &mut Workspace, file: FileKey) -> CheckResult<()> {
        let (name, dir, base) = {
            let f = workspace.file(file)?;
            let base = match BIB_FILE.captures(f.name()) {
                Some(captures) => captures[1].to_string(),
                None => return Ok(()),
            };
            (f.name().to_string(), f.dir().to_string(), base)
        };
        let bbl_name = format!("{base}.bbl");
        let bbl_path = format!("{dir}{bbl_name}");

        if workspace.exists(&bbl_path) {
            // The .bbl is what processing consumes; drop the database and
            // clear any missing-references error from an earlier run.
            workspace.add_warning(file, BIB_WITH_BBL, Self::BIB_WITH_BBL_MESSAGE, false)?;
            workspace.remove_error(BBL_MISSING);
            workspace.remove(
                file,
                format!("Removed the file '{name}'. Using '{bbl_name}' for references."),
            )?;
        } else {
            // Missing references. Keep the .bib in place as the flag until
            // the .bbl exists.
            workspace.add_warning(file, BIB_NO_BBL, Self::BIB_NO_BBL_MESSAGE, true)?;
            workspace.add_error(
                file,
                BBL_MISSING,
                format!(
                    "Your submission contained {base}.bib file, but no {base}.bbl \
                     file (include {base}.bbl, or submit without {base}.bib; and \
                     remember to verify references)."
                ),
            )?;
        }
        Ok(())
    }
}

impl Checker for CheckMissingReferences {
    fn metadata(&self) -> CheckerMetadata {
        CheckerMetadata {
            name: self.name(),
            codes: &[BIB_WITH_BBL, BIB_NO_BBL, BBL_MISSING],
        }
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities {
            workspace: true,
            ..Capabilities::NONE
        }
    }

    fn check_workspace(&self, workspace: &mut Workspace) -> CheckResult<()> {
        let bib_files: Vec<FileKey> = workspace
            .iter_files()
            .filter(|(_, f)| !f.is_directory() && BIB_FILE.is_match(f.name()))
            .map(|(key, _)| key)
            .collect();
        for file in bib_files {
            self.check_for_missing_bbl(workspace, file)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::file_types::FileType;
    use crate::storage::MemoryStorage;

    fn workspace() -> Workspace {
        let mut ws = Workspace::new(Box::new(MemoryStorage::new()));
        ws.register_checker(Box::new(CheckMissingReferences));
        ws
    }

    #[test]
    fn test_bib_without_bbl_is_a_blocking_error() {
        let mut ws = workspace();
        ws.create("paper.tex", FileType::Latex, b"t").unwrap();
        let bib = ws.create("refs.bib", FileType::Bibtex, b"@article{}").unwrap();
        ws.perform_checks().unwrap();

        assert!(ws.has_errors());
        assert!(ws.exists("refs.bib")); // not deleted while the error stands
        let diags: Vec<_> = ws.log().for_file(bib).collect();
        assert!(diags.iter().any(|d| d.code == BIB_NO_BBL && d.persistent));
        assert!(
            diags
                .iter()
                .any(|d| d.code == BBL_MISSING && d.message.contains("refs.bbl"))
        );
    }

    #[test]
    fn test_bib_with_bbl_is_removed_with_a_note() {
        let mut ws = workspace();
        ws.create("refs.bib", FileType::Bibtex, b"@article{}").unwrap();
        let bib = ws.key_for("refs.bib").unwrap();
        ws.create("refs.bbl", FileType::TexAux, b"\\bibitem{}").unwrap();
        ws.perform_checks().unwrap();

        assert!(!ws.exists("refs.bib"));
        assert!(ws.exists("refs.bbl"));
        assert!(!ws.has_errors());
        assert!(
            ws.log()
                .for_file(bib)
                .any(|d| d.code == BIB_WITH_BBL && !d.persistent)
        );
    }

    #[test]
    fn test_adding_bbl_and_rerunning_clears_the_error() {
        let mut ws = workspace();
        ws.create("paper.tex", FileType::Latex, b"t").unwrap();
        ws.create("refs.bib", FileType::Bibtex, b"@article{}").unwrap();
        ws.perform_checks().unwrap();
        assert!(ws.has_errors());

        ws.create("refs.bbl", FileType::TexAux, b"\\bibitem{}").unwrap();
        ws.perform_checks().unwrap();
        assert!(!ws.has_errors());
        assert!(!ws.exists("refs.bib"));
        assert!(ws.log().was_retracted(BBL_MISSING));
    }

    #[test]
    fn test_bbl_must_be_a_sibling() {
        let mut ws = workspace();
        ws.create("sub/refs.bib", FileType::Bibtex, b"@article{}").unwrap();
        ws.create("refs.bbl", FileType::TexAux, b"\\bibitem{}").unwrap();
        ws.perform_checks().unwrap();
        // The .bbl at the top level does not satisfy sub/refs.bib.
        assert!(ws.has_errors());
        assert!(ws.exists("sub/refs.bib"));
    }

    #[test]
    fn test_suffix_match_is_case_insensitive() {
        let mut ws = workspace();
        ws.create("refs.BIB", FileType::Bibtex, b"@article{}").unwrap();
        ws.create("refs.bbl", FileType::TexAux, b"\\bibitem{}").unwrap();
        ws.perform_checks().unwrap();
        assert!(!ws.exists("refs.BIB"));
        assert!(!ws.has_errors());
    }

    #[test]
    fn test_each_bib_checked_independently() {
        let mut ws = workspace();
        ws.create("one.bib", FileType::Bibtex, b"@a{}").unwrap();
        ws.create("one.bbl", FileType::TexAux, b"\\bibitem{}").unwrap();
        ws.create("two.bib", FileType::Bibtex, b"@b{}").unwrap();
        ws.perform_checks().unwrap();
        assert!(!ws.exists("one.bib"));
        assert!(ws.exists("two.bib"));
        assert!(ws.has_errors());
    }
}
