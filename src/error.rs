//! Error types for the zhihu-md library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`ZhihuMdError`] — **Fatal**: the conversion cannot proceed at all
//!   (missing input, undecodable bytes, unwritable output). Returned as
//!   `Err(ZhihuMdError)` from [`crate::convert::convert`] and friends. No
//!   output file exists when one of these is returned.
//!
//! * [`ReferenceWarning`] — **Non-fatal**: a single image reference could
//!   not be rewritten (the local file is missing). The reference is left as
//!   written and the warning is stored in
//!   [`crate::output::ConversionOutput::warnings`]; every other reference and
//!   formula is still processed.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the zhihu-md library.
#[derive(Debug, Error)]
pub enum ZhihuMdError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("File not found: '{}'", path.display())]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{}'", path.display())]
    PermissionDenied { path: PathBuf },

    /// Reading the input failed for another I/O reason.
    #[error("Failed to read '{}': {source}", path.display())]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Encoding errors ───────────────────────────────────────────────────
    /// An explicit encoding label is not known.
    #[error("Unknown encoding '{label}'")]
    UnknownEncoding { label: String },

    /// The input bytes are not valid under the resolved encoding.
    #[error("Cannot decode '{}' as {encoding}: input contains malformed byte sequences", path.display())]
    DecodeFailed { path: PathBuf, encoding: String },

    /// The converted text contains characters the encoding cannot represent.
    #[error("Cannot encode output '{}' as {encoding}: text contains unmappable characters", path.display())]
    EncodeFailed { path: PathBuf, encoding: String },

    // ── Output errors ─────────────────────────────────────────────────────
    /// Could not create or write the output Markdown file.
    #[error("Failed to write output file '{}': {source}", path.display())]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Image utility errors ──────────────────────────────────────────────
    /// Decoding, resizing or re-encoding an image failed.
    #[error("Image processing failed for '{}': {source}", path.display())]
    ImageProcessing {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

impl ZhihuMdError {
    /// `true` when the error means the input document does not exist.
    ///
    /// Callers (the CLI in particular) report this case distinctly from
    /// every other failure.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ZhihuMdError::FileNotFound { .. })
    }
}

/// A non-fatal problem with one image reference.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum ReferenceWarning {
    /// The resolved local file does not exist; the reference was kept as is.
    #[error("Image file not found: {}", local_path.display())]
    ImageNotFound {
        reference: String,
        local_path: PathBuf,
    },

    /// The reference has an empty path and cannot point at a file.
    #[error("Image reference has an empty path: {reference}")]
    EmptyPath { reference: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_not_found_display() {
        let e = ZhihuMdError::FileNotFound {
            path: PathBuf::from("notes.md"),
        };
        assert_eq!(e.to_string(), "File not found: 'notes.md'");
        assert!(e.is_not_found());
    }

    #[test]
    fn decode_failed_is_not_not_found() {
        let e = ZhihuMdError::DecodeFailed {
            path: PathBuf::from("a.md"),
            encoding: "UTF-8".into(),
        };
        assert!(!e.is_not_found());
        assert!(e.to_string().contains("UTF-8"), "got: {e}");
    }

    #[test]
    fn output_write_failed_keeps_source() {
        use std::error::Error as _;
        let e = ZhihuMdError::OutputWriteFailed {
            path: PathBuf::from("/nope/out.md"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such directory"),
        };
        assert!(e.source().is_some());
        assert!(e.to_string().contains("/nope/out.md"));
    }

    #[test]
    fn image_not_found_display() {
        let w = ReferenceWarning::ImageNotFound {
            reference: "![cat](img/missing.png)".into(),
            local_path: PathBuf::from("docs/img/missing.png"),
        };
        assert_eq!(w.to_string(), "Image file not found: docs/img/missing.png");
    }
}
