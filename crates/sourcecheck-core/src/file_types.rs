//! File type definitions.

use serde::{Deserialize, Serialize};

/// Known file types.
///
/// A tag is assigned once, by the external classifier, when a file enters the
/// workspace. The pipeline never re-classifies: renaming a file changes its
/// name, not its tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FileType {
    /// The file type has not been inferred.
    Unknown,
    /// The classifier could not determine a type.
    Failed,
    /// Represents a directory.
    Directory,
    /// Junk that is dropped from every submission (`.DS_Store` and friends).
    AlwaysIgnore,
    Tex,
    Latex,
    PdfTex,
    PdfLatex,
    Texinfo,
    /// Input for (La)TeX (`\input` / `\include` targets).
    Input,
    /// Kept verbatim alongside the primary source.
    Include,
    Bibtex,
    /// TeX byproducts (`.aux`, `.toc`, ...).
    TexAux,
    Postscript,
    DosEps,
    Pdf,
    Dvi,
    Html,
    Image,
    Anim,
    Docx,
    Odf,
    Notebook,
    Readme,
}

impl FileType {
    /// Whether this tag belongs to the TeX family of source types.
    pub fn is_tex_type(self) -> bool {
        matches!(
            self,
            FileType::Tex
                | FileType::Latex
                | FileType::PdfTex
                | FileType::PdfLatex
                | FileType::Texinfo
        )
    }

    /// Whether files of this type are unconditionally ignored.
    pub fn is_always_ignore(self) -> bool {
        matches!(self, FileType::AlwaysIgnore)
    }

    /// The extension files of this type are expected to carry, if the
    /// pipeline enforces one.
    pub fn canonical_extension(self) -> Option<&'static str> {
        match self {
            FileType::Postscript => Some("ps"),
            FileType::Pdf => Some("pdf"),
            FileType::Html => Some("html"),
            _ => None,
        }
    }

    /// Human-readable name of the file type.
    pub fn label(self) -> &'static str {
        match self {
            FileType::Unknown => "Unknown",
            FileType::Failed => "unknown",
            FileType::Directory => "Directory",
            FileType::AlwaysIgnore => "Always ignore",
            FileType::Tex => "TeX",
            FileType::Latex => "LaTeX",
            FileType::PdfTex => "PDFTeX",
            FileType::PdfLatex => "PDFLaTeX",
            FileType::Texinfo => "Texinfo",
            FileType::Input => "Input for (La)TeX",
            FileType::Include => "Keep",
            FileType::Bibtex => "BiBTeX",
            FileType::TexAux => "TeX auxiliary",
            FileType::Postscript => "Postscript",
            FileType::DosEps => "DOS EPS Binary File",
            FileType::Pdf => "PDF",
            FileType::Dvi => "DVI",
            FileType::Html => "HTML",
            FileType::Image => "Image (gif/jpg etc)",
            FileType::Anim => "Animation (mpeg etc)",
            FileType::Docx => "Microsoft DOCX",
            FileType::Odf => "OpenDocument Format",
            FileType::Notebook => "Mathematica Notebook",
            FileType::Readme => "Override",
        }
    }
}
