//! Configuration types for Markdown-to-Zhihu conversion.
//!
//! All conversion behaviour is controlled through [`ConversionConfig`], built
//! via its [`ConversionConfigBuilder`]. The config is constructed once per run
//! and only read afterwards; nothing in the pipeline keeps global state
//! between conversions.

use crate::error::ZhihuMdError;
use serde::{Deserialize, Serialize};

/// Base URL used when the caller does not supply one.
///
/// Points at the original author's asset bucket. Treat it as a placeholder:
/// real callers should always pass their own host.
pub const DEFAULT_BASE_URL: &str =
    "http://113.44.140.251:9000/junk/Discrete-Distribution-Networks.github.io/";

/// Configuration for one conversion run.
///
/// Built via [`ConversionConfig::builder()`] or using
/// [`ConversionConfig::default()`].
///
/// # Example
/// ```rust
/// use zhihu_md::{ConversionConfig, FormulaStyle};
///
/// let config = ConversionConfig::builder()
///     .base_url("https://cdn.example.org/blog/")
///     .encoding("utf-8")
///     .formula_style(FormulaStyle::DoubleDollar)
///     .build()
///     .unwrap();
/// assert_eq!(config.base_url, "https://cdn.example.org/blog/");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionConfig {
    /// Prefix prepended verbatim to every rewritten image path.
    ///
    /// No separator is inserted, so the value normally ends with `/`.
    pub base_url: String,

    /// Encoding label (e.g. `"utf-8"`, `"gbk"`). `None` means detect it from
    /// the input bytes.
    pub encoding: Option<String>,

    /// Compress oversized images before publishing.
    ///
    /// Not implemented: the flag is accepted and logged, but has no effect on
    /// the output.
    pub compress_images: bool,

    /// How math delimiters are rewritten. Default: [`FormulaStyle::DoubleDollar`].
    pub formula_style: FormulaStyle,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            encoding: None,
            compress_images: false,
            formula_style: FormulaStyle::default(),
        }
    }
}

impl ConversionConfig {
    /// Create a new builder for `ConversionConfig`.
    pub fn builder() -> ConversionConfigBuilder {
        ConversionConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`ConversionConfig`].
#[derive(Debug)]
pub struct ConversionConfigBuilder {
    config: ConversionConfig,
}

impl ConversionConfigBuilder {
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = url.into();
        self
    }

    pub fn encoding(mut self, label: impl Into<String>) -> Self {
        self.config.encoding = Some(label.into());
        self
    }

    /// Set or clear the explicit encoding in one call.
    pub fn maybe_encoding(mut self, label: Option<String>) -> Self {
        self.config.encoding = label;
        self
    }

    pub fn compress_images(mut self, v: bool) -> Self {
        self.config.compress_images = v;
        self
    }

    pub fn formula_style(mut self, style: FormulaStyle) -> Self {
        self.config.formula_style = style;
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ConversionConfig, ZhihuMdError> {
        let c = &self.config;
        if c.base_url.trim().is_empty() {
            return Err(ZhihuMdError::InvalidConfig(
                "base URL must not be empty".into(),
            ));
        }
        if let Some(ref label) = c.encoding {
            if encoding_rs::Encoding::for_label(label.trim().as_bytes()).is_none() {
                return Err(ZhihuMdError::InvalidConfig(format!(
                    "unknown encoding '{label}'"
                )));
            }
        }
        Ok(self.config)
    }
}

// ── Enums ────────────────────────────────────────────────────────────────

/// Strategy used by the formula normaliser.
///
/// The two strategies are separate modes, never combined in one run.
///
/// | Style | Inline `$E$` | Block `$$E$$` |
/// |-------|--------------|---------------|
/// | `DoubleDollar` | ` $$E$$ ` | unchanged |
/// | `EquationImage` | `<img>` via the equation endpoint | `<img>` on its own line |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FormulaStyle {
    /// Promote inline math to `$$…$$`, which the Zhihu importer renders. (default)
    #[default]
    DoubleDollar,
    /// Legacy: render every formula through Zhihu's equation image endpoint.
    EquationImage,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let c = ConversionConfig::default();
        assert_eq!(c.base_url, DEFAULT_BASE_URL);
        assert!(c.encoding.is_none());
        assert!(!c.compress_images);
        assert_eq!(c.formula_style, FormulaStyle::DoubleDollar);
    }

    #[test]
    fn builder_sets_fields() {
        let c = ConversionConfig::builder()
            .base_url("https://host/assets/")
            .encoding("gbk")
            .compress_images(true)
            .formula_style(FormulaStyle::EquationImage)
            .build()
            .unwrap();
        assert_eq!(c.base_url, "https://host/assets/");
        assert_eq!(c.encoding.as_deref(), Some("gbk"));
        assert!(c.compress_images);
        assert_eq!(c.formula_style, FormulaStyle::EquationImage);
    }

    #[test]
    fn empty_base_url_rejected() {
        let err = ConversionConfig::builder().base_url("  ").build().unwrap_err();
        assert!(matches!(err, ZhihuMdError::InvalidConfig(_)));
    }

    #[test]
    fn unknown_encoding_rejected() {
        let err = ConversionConfig::builder()
            .encoding("klingon-8")
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("klingon-8"), "got: {err}");
    }

    #[test]
    fn maybe_encoding_clears() {
        let c = ConversionConfig::builder()
            .encoding("utf-8")
            .maybe_encoding(None)
            .build()
            .unwrap();
        assert!(c.encoding.is_none());
    }
}
