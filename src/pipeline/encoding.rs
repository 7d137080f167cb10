//! Encoding detection and strict decode/encode helpers.
//!
//! Detection has to run on raw bytes: the encoding is unknown until it has
//! been guessed. The detector never fails. It always settles on *some*
//! encoding, and whether that guess was right only shows up later when the
//! bytes are decoded. Decoding and encoding here are strict: malformed input
//! or unmappable output is an error, never a silent `U+FFFD` substitution.
//!
//! Detection order:
//!
//! 1. byte-order mark → [`Confidence::Certain`]
//! 2. bytes are valid UTF-8 (pure ASCII included) → [`Confidence::High`]
//! 3. statistical guess from `chardetng` → [`Confidence::Guess`]

use crate::error::ZhihuMdError;
use chardetng::EncodingDetector;
use encoding_rs::{Encoding, UTF_16BE, UTF_16LE, UTF_8};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use tracing::info;

/// How much the detector trusts its answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Confidence {
    /// A byte-order mark names the encoding.
    Certain,
    /// The bytes validate as UTF-8.
    High,
    /// Best statistical guess; no threshold is guaranteed.
    Guess,
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Confidence::Certain => "certain (byte-order mark)",
            Confidence::High => "high (valid UTF-8)",
            Confidence::Guess => "guess",
        };
        f.write_str(s)
    }
}

/// Result of running the detector over a file's bytes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EncodingDetection {
    pub encoding: &'static Encoding,
    pub confidence: Confidence,
}

impl EncodingDetection {
    /// Canonical WHATWG name of the detected encoding, e.g. `"UTF-8"`.
    pub fn name(&self) -> &'static str {
        self.encoding.name()
    }
}

/// Guess the text encoding of `bytes`.
///
/// Emits an `info` diagnostic with the encoding name and confidence.
pub fn detect(bytes: &[u8]) -> EncodingDetection {
    let detection = if let Some((encoding, _bom_len)) = Encoding::for_bom(bytes) {
        EncodingDetection {
            encoding,
            confidence: Confidence::Certain,
        }
    } else if std::str::from_utf8(bytes).is_ok() {
        EncodingDetection {
            encoding: UTF_8,
            confidence: Confidence::High,
        }
    } else {
        let mut detector = EncodingDetector::new();
        detector.feed(bytes, true);
        EncodingDetection {
            // UTF-8 was already ruled out above.
            encoding: detector.guess(None, false),
            confidence: Confidence::Guess,
        }
    };

    info!(
        "Detected encoding: {} (confidence: {})",
        detection.name(),
        detection.confidence
    );
    detection
}

/// Look up an encoding by label (`"utf-8"`, `"GBK"`, `"latin1"`, …).
pub fn resolve_label(label: &str) -> Result<&'static Encoding, ZhihuMdError> {
    Encoding::for_label(label.trim().as_bytes()).ok_or_else(|| ZhihuMdError::UnknownEncoding {
        label: label.to_string(),
    })
}

/// Decode `bytes` with `encoding`, failing on any malformed sequence.
///
/// A byte-order mark is not stripped: it decodes to `U+FEFF` and is written
/// back by [`encode`], so the output keeps the input's BOM.
pub fn decode(
    bytes: &[u8],
    encoding: &'static Encoding,
    path: &Path,
) -> Result<String, ZhihuMdError> {
    encoding
        .decode_without_bom_handling_and_without_replacement(bytes)
        .map(|text| text.into_owned())
        .ok_or_else(|| ZhihuMdError::DecodeFailed {
            path: path.to_path_buf(),
            encoding: encoding.name().to_string(),
        })
}

/// Encode `text` with `encoding`, failing on unmappable characters.
///
/// `encoding_rs` only encodes UTF-16 as UTF-8, so the two UTF-16 variants
/// are serialised by hand to keep the output in the input's encoding.
pub fn encode(
    text: &str,
    encoding: &'static Encoding,
    path: &Path,
) -> Result<Vec<u8>, ZhihuMdError> {
    if encoding == UTF_16LE {
        return Ok(text.encode_utf16().flat_map(u16::to_le_bytes).collect());
    }
    if encoding == UTF_16BE {
        return Ok(text.encode_utf16().flat_map(u16::to_be_bytes).collect());
    }

    let (bytes, _actual, had_errors) = encoding.encode(text);
    if had_errors {
        return Err(ZhihuMdError::EncodeFailed {
            path: path.to_path_buf(),
            encoding: encoding.name().to_string(),
        });
    }
    Ok(bytes.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use encoding_rs::{GBK, WINDOWS_1252};

    #[test]
    fn ascii_detected_as_utf8() {
        let d = detect(b"# Title\n\n![cat](img/cat.png)\n");
        assert_eq!(d.encoding, UTF_8);
        assert_eq!(d.confidence, Confidence::High);
    }

    #[test]
    fn multibyte_utf8_detected() {
        let d = detect("公式 $x+y$ 与图片".as_bytes());
        assert_eq!(d.name(), "UTF-8");
    }

    #[test]
    fn bom_wins() {
        let d = detect(&[0xFF, 0xFE, b'a', 0x00]);
        assert_eq!(d.encoding, UTF_16LE);
        assert_eq!(d.confidence, Confidence::Certain);
    }

    #[test]
    fn legacy_bytes_are_guessed() {
        let (bytes, _, _) = GBK.encode("知乎文章：数学公式和图片的转换测试。这是一段较长的中文文本。");
        let d = detect(&bytes);
        assert_ne!(d.encoding, UTF_8);
        assert_eq!(d.confidence, Confidence::Guess);
    }

    #[test]
    fn resolve_known_and_unknown_labels() {
        assert_eq!(resolve_label("utf-8").unwrap(), UTF_8);
        assert_eq!(resolve_label(" GBK ").unwrap(), GBK);
        assert!(matches!(
            resolve_label("nope"),
            Err(ZhihuMdError::UnknownEncoding { .. })
        ));
    }

    #[test]
    fn decode_rejects_malformed_utf8() {
        let err = decode(b"abc\xff", UTF_8, Path::new("a.md")).unwrap_err();
        assert!(matches!(err, ZhihuMdError::DecodeFailed { .. }));
    }

    #[test]
    fn decode_keeps_utf8_bom() {
        let text = decode(b"\xEF\xBB\xBFhi", UTF_8, Path::new("a.md")).unwrap();
        assert_eq!(text, "\u{FEFF}hi");
        assert_eq!(encode(&text, UTF_8, Path::new("a.md")).unwrap(), b"\xEF\xBB\xBFhi");
    }

    #[test]
    fn encode_rejects_unmappable() {
        let err = encode("中", WINDOWS_1252, Path::new("out.md")).unwrap_err();
        assert!(matches!(err, ZhihuMdError::EncodeFailed { .. }));
    }

    #[test]
    fn utf16le_stays_utf16le() {
        let bytes = encode("\u{FEFF}$x$", UTF_16LE, Path::new("out.md")).unwrap();
        assert_eq!(&bytes[..2], &[0xFF_u8, 0xFE]);
        assert_eq!(decode(&bytes, UTF_16LE, Path::new("out.md")).unwrap(), "\u{FEFF}$x$");
    }
}
