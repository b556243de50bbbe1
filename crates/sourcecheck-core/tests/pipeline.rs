//! End-to-end behavior of the default checking pipeline.

use sourcecheck_core::{FileType, MemoryStorage, Severity, SourceType, Workspace};

fn workspace() -> Workspace {
    Workspace::with_default_checkers(Box::new(MemoryStorage::new()))
}

#[test]
fn empty_workspace_is_invalid_with_no_errors() {
    let mut ws = workspace();
    ws.perform_checks().unwrap();
    assert_eq!(ws.source_type(), SourceType::Invalid);
    assert!(!ws.has_errors());
}

#[test]
fn all_ignore_workspace_is_invalid_with_warning() {
    let mut ws = workspace();
    ws.create("Thumbs.db", FileType::AlwaysIgnore, b"x").unwrap();
    ws.create("desktop.ini", FileType::AlwaysIgnore, b"x").unwrap();
    ws.perform_checks().unwrap();
    assert_eq!(ws.source_type(), SourceType::Invalid);
    assert!(
        ws.log()
            .workspace_level()
            .any(|d| d.severity == Severity::Warning && d.code == "invalid_source_type")
    );
}

#[test]
fn rerun_on_unchanged_files_is_idempotent() {
    let mut ws = workspace();
    ws.create("main.tex", FileType::Latex, b"t").unwrap();
    ws.create("refs.bib", FileType::Bibtex, b"@a{}").unwrap();
    ws.create("fig.eps", FileType::Postscript, b"%!PS").unwrap();

    ws.perform_checks().unwrap();
    let first_type = ws.source_type();
    let first_errors = ws.has_errors();
    let first_persistent: Vec<(&str, Option<String>)> = ws
        .log()
        .active()
        .filter(|d| d.persistent)
        .map(|d| (d.code, d.path.clone()))
        .collect();
    let first_active = ws.log().active().count();

    ws.perform_checks().unwrap();
    let second_persistent: Vec<(&str, Option<String>)> = ws
        .log()
        .active()
        .filter(|d| d.persistent)
        .map(|d| (d.code, d.path.clone()))
        .collect();

    assert_eq!(ws.source_type(), first_type);
    assert_eq!(ws.has_errors(), first_errors);
    assert_eq!(second_persistent, first_persistent);
    // Non-persistent diagnostics are re-derived, never duplicated.
    assert_eq!(ws.log().active().count(), first_active);
}

#[test]
fn postscript_extension_is_repaired() {
    let mut ws = workspace();
    let key = ws.create("fig.eps", FileType::Postscript, b"%!PS").unwrap();
    ws.perform_checks().unwrap();

    assert!(ws.exists("fig.ps"));
    assert!(!ws.exists("fig.eps"));
    assert_eq!(ws.file(key).unwrap().file_type(), FileType::Postscript);

    let rename_notes: Vec<_> = ws
        .log()
        .for_file(key)
        .filter(|d| d.code == "fixed_extension")
        .collect();
    assert_eq!(rename_notes.len(), 1);
    assert!(!rename_notes[0].persistent);
    assert!(rename_notes[0].message.contains("fig.eps"));
    assert!(rename_notes[0].message.contains("fig.ps"));
}

#[test]
fn missing_bbl_blocks_until_provided() {
    let mut ws = workspace();
    ws.create("paper.tex", FileType::Latex, b"t").unwrap();
    ws.create("refs.bib", FileType::Bibtex, b"@a{}").unwrap();
    ws.perform_checks().unwrap();

    assert!(ws.has_errors());
    assert!(
        ws.log()
            .active()
            .any(|d| d.is_error() && d.message.contains("refs.bbl"))
    );

    ws.create("refs.bbl", FileType::TexAux, b"\\bibitem{}").unwrap();
    ws.perform_checks().unwrap();

    assert!(!ws.exists("refs.bib"));
    assert!(!ws.has_errors());
    assert_eq!(ws.source_type(), SourceType::Tex);
}

#[test]
fn single_pdf_wins_over_ancillary_flag() {
    let mut ws = workspace();
    ws.create("anc/paper.pdf", FileType::Pdf, b"%PDF-1.5").unwrap();
    ws.perform_checks().unwrap();
    assert_eq!(ws.source_type(), SourceType::Pdf);
    assert!(!ws.has_errors());
}

#[test]
fn single_pdf_workspace_is_pdf() {
    let mut ws = workspace();
    ws.create("paper.pdf", FileType::Pdf, b"%PDF-1.5").unwrap();
    ws.perform_checks().unwrap();
    assert_eq!(ws.source_type(), SourceType::Pdf);
    assert!(!ws.has_errors());
}

#[test]
fn html_composition_yields_html() {
    let mut ws = workspace();
    ws.create("index.html", FileType::Html, b"<html>").unwrap();
    ws.create("fig.png", FileType::Image, b"png").unwrap();
    ws.create("defs.inc", FileType::Include, b"inc").unwrap();
    ws.create("part.ps", FileType::Postscript, b"%!PS").unwrap();
    ws.create("extra.pdf", FileType::Pdf, b"%PDF").unwrap();
    ws.create("figs/fig2.png", FileType::Image, b"png").unwrap();
    ws.create("README", FileType::Readme, b"readme").unwrap();
    ws.perform_checks().unwrap();
    assert_eq!(ws.source_type(), SourceType::Html);
    assert!(!ws.has_errors());
}

#[test]
fn cleanup_checkers_run_before_inference() {
    // Empty and hidden files disappear before the source type is decided,
    // so a lone surviving PDF is still a PDF submission.
    let mut ws = workspace();
    ws.create("paper.pdf", FileType::Pdf, b"%PDF").unwrap();
    ws.create("stray.log", FileType::TexAux, b"").unwrap();
    ws.create(".DS_Store", FileType::AlwaysIgnore, b"x").unwrap();
    ws.perform_checks().unwrap();
    assert!(!ws.exists("stray.log"));
    assert!(!ws.exists(".DS_Store"));
    assert_eq!(ws.source_type(), SourceType::Pdf);
    assert!(!ws.has_errors());
}

#[test]
fn summary_reflects_final_state() {
    let mut ws = workspace();
    ws.create("paper.tex", FileType::Latex, b"t").unwrap();
    ws.create("refs.bib", FileType::Bibtex, b"@a{}").unwrap();
    ws.perform_checks().unwrap();

    let summary = ws.summary();
    assert_eq!(summary.source_type, SourceType::Tex);
    assert!(summary.has_errors);
    assert_eq!(summary.file_count, 2);
    assert!(summary.diagnostics.iter().any(|d| d.code == "bbl_missing"));
}
