//! Diagnostic codes for sourcecheck - the submission source validation
//! pipeline.
//!
//! Every warning or error the pipeline can attach to a workspace carries a
//! symbolic code from this registry. Codes are the stable identifiers
//! (messages may be reworded freely); downstream services key retraction,
//! display grouping, and documentation on them.
//!
//! # Usage
//!
//! ```
//! use sourcecheck_codes::CODES_DATA;
//!
//! // CODES_DATA is a static array of (code, description) tuples
//! for (code, description) in CODES_DATA {
//!     println!("{}: {}", code, description);
//! }
//! ```

/// All known diagnostic codes, paired with a short description of the
/// condition they report.
pub const CODES_DATA: &[(&str, &str)] = &[
    (
        "invalid_source_type",
        "The source type of the submission could not be determined to be valid",
    ),
    (
        "fixed_extension",
        "A file was renamed to carry the canonical extension for its type",
    ),
    (
        "bib_with_bbl",
        "A .bib database was removed because the matching compiled .bbl is present",
    ),
    (
        "bib_no_bbl",
        "bibtex is not run during processing; a compiled .bbl must accompany each .bib",
    ),
    (
        "bbl_missing",
        "A .bib database is present without its matching compiled .bbl",
    ),
    ("hidden_file", "Hidden files are not allowed in a submission"),
    (
        "macosx_directory",
        "A __MACOSX archive artifact directory was removed",
    ),
    ("empty_file", "A zero-length file was removed"),
    (
        "processed_directory",
        "The submission contains a 'processed' directory",
    ),
    (
        "disallowed_file_type",
        "The file is of a type that is not accepted as submission source",
    ),
    ("file_removed", "A file was removed from the workspace"),
];

/// Returns the total number of registered codes.
pub fn code_count() -> usize {
    CODES_DATA.len()
}

/// Looks up a code, returning its description if registered.
pub fn get_code_description(code: &str) -> Option<&'static str> {
    CODES_DATA
        .iter()
        .find(|(registered, _)| *registered == code)
        .map(|(_, description)| *description)
}
