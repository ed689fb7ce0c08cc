//! Export errors.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to load font {path}: {source}")]
    Font {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The PDF library rejected the document.
    #[error("PDF generation failed: {0}")]
    Pdf(String),

    #[error("invalid page size {width_mm}x{height_mm}mm with {margin_mm}mm margins")]
    PageSize {
        width_mm: f32,
        height_mm: f32,
        margin_mm: f32,
    },
}

/// Write `contents` to `path`, creating parent directories.
pub(crate) fn write_file(path: &std::path::Path, contents: &[u8]) -> Result<(), ExportError> {
    let wrap = |source| ExportError::Write {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(wrap)?;
    }
    std::fs::write(path, contents).map_err(wrap)
}
