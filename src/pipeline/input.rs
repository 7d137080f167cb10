//! Input resolution: load a Markdown file into a [`Document`].
//!
//! The file is read in one call, so the handle is released before any text
//! processing starts, including on a decode failure. Encoding is either the
//! caller's explicit label or the detector's guess on the raw bytes.

use crate::error::ZhihuMdError;
use crate::pipeline::encoding;
use encoding_rs::Encoding;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

/// A Markdown file loaded into memory.
#[derive(Debug, Clone)]
pub struct Document {
    /// Path the document was read from.
    pub path: PathBuf,
    /// Directory used to resolve relative image paths.
    pub source_dir: PathBuf,
    pub text: String,
    /// Encoding used to decode the file; the output is written with it too.
    pub encoding: &'static Encoding,
}

/// Read and decode the document at `path`.
///
/// `explicit_encoding` bypasses detection entirely.
pub fn read_document(
    path: &Path,
    explicit_encoding: Option<&str>,
) -> Result<Document, ZhihuMdError> {
    let bytes = read_bytes(path)?;
    let encoding = match explicit_encoding {
        Some(label) => encoding::resolve_label(label)?,
        None => encoding::detect(&bytes).encoding,
    };
    let text = encoding::decode(&bytes, encoding, path)?;
    debug!(
        "Read {} bytes from {} as {}",
        bytes.len(),
        path.display(),
        encoding.name()
    );

    Ok(Document {
        path: path.to_path_buf(),
        source_dir: source_dir(path),
        text,
        encoding,
    })
}

/// Read the raw bytes of `path`, mapping I/O failures to library errors.
pub fn read_bytes(path: &Path) -> Result<Vec<u8>, ZhihuMdError> {
    std::fs::read(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => ZhihuMdError::FileNotFound {
            path: path.to_path_buf(),
        },
        ErrorKind::PermissionDenied => ZhihuMdError::PermissionDenied {
            path: path.to_path_buf(),
        },
        _ => ZhihuMdError::ReadFailed {
            path: path.to_path_buf(),
            source: e,
        },
    })
}

/// Directory containing `path`; empty (the working directory) for a bare
/// file name.
pub fn source_dir(path: &Path) -> PathBuf {
    path.parent().map(Path::to_path_buf).unwrap_or_default()
}
