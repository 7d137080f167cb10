//! Pipeline stages for Markdown-to-Zhihu conversion.
//!
//! Each submodule implements exactly one step. The two text transforms are
//! pure `&str → String` functions apart from the image existence checks, so
//! they are tested without any output files.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ encoding ──▶ images ──▶ formula ──▶ (convert writes the file)
//! (bytes)   (detect)     (URLs)     ($ → $$)
//! ```
//!
//! 1. [`input`]    — read the file, resolve its encoding, decode it
//! 2. [`encoding`] — detector plus strict decode/encode helpers
//! 3. [`images`]   — rewrite local image references to published URLs
//! 4. [`formula`]  — normalise math delimiters

pub mod encoding;
pub mod formula;
pub mod images;
pub mod input;
