//! Conversion entry points.
//!
//! [`convert`] is the file-to-file orchestrator: read → detect encoding →
//! rewrite images → normalise formulas → write. [`convert_markdown`] is the
//! same text pipeline without any file I/O beyond image existence checks.
//!
//! Conversion is single-shot and all-or-nothing: a fatal error leaves no
//! output file behind, and nothing is retried.

use crate::config::ConversionConfig;
use crate::error::ZhihuMdError;
use crate::output::{ConversionOutput, ConversionStats, TransformedMarkdown};
use crate::pipeline::encoding::{self, EncodingDetection};
use crate::pipeline::{formula, images, input};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Suffix appended to the input stem when no output path is given.
pub const OUTPUT_SUFFIX: &str = "_for_zhihu.md";

/// Convert a Markdown file for Zhihu import.
///
/// # Arguments
/// * `input_path`  — Markdown file to convert
/// * `output_path` — destination; defaults to [`default_output_path`]
/// * `config`      — conversion configuration
///
/// # Returns
/// `Ok(ConversionOutput)` on success, even if some image references could
/// not be resolved (see `output.warnings`).
///
/// # Errors
/// - [`ZhihuMdError::FileNotFound`] when the input does not exist
/// - [`ZhihuMdError::DecodeFailed`] when the bytes do not match the encoding
/// - [`ZhihuMdError::EncodeFailed`] / [`ZhihuMdError::OutputWriteFailed`]
///   when the result cannot be written
pub fn convert(
    input_path: impl AsRef<Path>,
    output_path: Option<&Path>,
    config: &ConversionConfig,
) -> Result<ConversionOutput, ZhihuMdError> {
    let total_start = Instant::now();
    let input_path = input_path.as_ref();
    info!("Starting conversion: {}", input_path.display());

    if config.compress_images {
        // Placeholder: image compression is not implemented.
        warn!("Image compression is not implemented; the compress option has no effect");
    }

    // ── Step 1: Read and decode ──────────────────────────────────────────
    let document = input::read_document(input_path, config.encoding.as_deref())?;

    // ── Step 2: Images, then formulas ────────────────────────────────────
    let transformed = convert_markdown(&document.text, &document.source_dir, config);

    // ── Step 3: Write with the input's encoding ──────────────────────────
    let output_path = output_path
        .map(Path::to_path_buf)
        .unwrap_or_else(|| default_output_path(input_path));
    let bytes = encoding::encode(&transformed.markdown, document.encoding, &output_path)?;
    write_atomic(&output_path, &bytes)?;

    info!("Output file created: {}", output_path.display());

    let stats = ConversionStats::from_transform(
        &transformed,
        total_start.elapsed().as_millis() as u64,
    );
    debug!(
        "Conversion complete: {} images rewritten, {} missing, {} formulas, {}ms",
        stats.images_rewritten,
        stats.images_missing,
        stats.formulas_rewritten,
        stats.total_duration_ms
    );

    Ok(ConversionOutput {
        output_path,
        encoding: document.encoding.name().to_string(),
        images: transformed.images,
        warnings: transformed.warnings,
        stats,
    })
}

/// Run the text pipeline on an in-memory document.
///
/// `source_dir` is the directory relative image paths are resolved against.
/// Image references are rewritten before formulas, always in that order.
pub fn convert_markdown(
    text: &str,
    source_dir: &Path,
    config: &ConversionConfig,
) -> TransformedMarkdown {
    let rewritten = images::rewrite_images(text, source_dir, &config.base_url);
    let normalized = formula::normalize_formulas(&rewritten.text, config.formula_style);

    TransformedMarkdown {
        markdown: normalized.text,
        images: rewritten.references,
        warnings: rewritten.warnings,
        formulas_rewritten: normalized.rewritten,
    }
}

/// `<dir>/<stem>_for_zhihu.md`, next to the input file.
pub fn default_output_path(input_path: &Path) -> PathBuf {
    let stem = input_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    input::source_dir(input_path).join(format!("{stem}{OUTPUT_SUFFIX}"))
}

/// Detect the encoding of a file without converting it.
pub fn inspect(input_path: impl AsRef<Path>) -> Result<EncodingDetection, ZhihuMdError> {
    let bytes = input::read_bytes(input_path.as_ref())?;
    Ok(encoding::detect(&bytes))
}

// ── Internal helpers ─────────────────────────────────────────────────────

/// Atomic write: temp file in the destination directory, then rename.
///
/// The destination directory must already exist. A new file gets the
/// umask-filtered `0o666` mode a plain create would give it; an existing
/// file keeps its permissions.
fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), ZhihuMdError> {
    let write_failed = |source: std::io::Error| ZhihuMdError::OutputWriteFailed {
        path: path.to_path_buf(),
        source,
    };

    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut builder = tempfile::Builder::new();
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(fs::Permissions::from_mode(0o666));
    }
    let mut tmp = builder.tempfile_in(dir).map_err(write_failed)?;
    if let Ok(existing) = fs::metadata(path) {
        tmp.as_file()
            .set_permissions(existing.permissions())
            .map_err(write_failed)?;
    }
    tmp.write_all(bytes).map_err(write_failed)?;
    tmp.flush().map_err(write_failed)?;
    tmp.persist(path).map_err(|e| write_failed(e.error))?;
    Ok(())
}
