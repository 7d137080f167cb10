//! # zhihu-md
//!
//! Rewrite a Markdown document so that it imports cleanly into Zhihu.
//!
//! Zhihu's Markdown importer cannot see local image files and only renders
//! `$$…$$` math. This crate rewrites local image references to absolute URLs
//! on a host you control and promotes inline `$…$` math to the double-dollar
//! form. The transform is lexical: the text is scanned with patterns, never
//! parsed into a Markdown tree, so everything else in the document survives
//! byte for byte.
//!
//! ## Pipeline Overview
//!
//! ```text
//! notes.md
//!  │
//!  ├─ 1. Input    read bytes, detect encoding (BOM / UTF-8 / chardetng)
//!  ├─ 2. Images   ![alt](p) and <img src="p" → base_url + p, if p exists
//!  ├─ 3. Formula  $E$ → $$E$$ (blocks untouched)
//!  └─ 4. Output   notes_for_zhihu.md, same encoding
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use zhihu_md::{convert, ConversionConfig};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ConversionConfig::builder()
//!         .base_url("https://cdn.example.org/blog/")
//!         .build()?;
//!     let output = convert("posts/notes.md", None, &config)?;
//!     eprintln!(
//!         "{} → {} images rewritten, {} missing",
//!         output.output_path.display(),
//!         output.stats.images_rewritten,
//!         output.stats.images_missing,
//!     );
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `zhihu-md` binary (clap + anyhow + tracing-subscriber) |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod convert;
pub mod error;
pub mod imaging;
pub mod output;
pub mod pipeline;
pub mod publish;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ConversionConfig, ConversionConfigBuilder, FormulaStyle, DEFAULT_BASE_URL};
pub use convert::{convert, convert_markdown, default_output_path, inspect};
pub use error::{ReferenceWarning, ZhihuMdError};
pub use output::{
    ConversionOutput, ConversionStats, ImageReference, ImageSyntax, ReferenceOutcome,
    TransformedMarkdown,
};
pub use pipeline::encoding::{Confidence, EncodingDetection};
pub use publish::{GitPublisher, PublishError};
