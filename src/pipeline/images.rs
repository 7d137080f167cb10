//! Image reference rewriting: local image paths → published URLs.
//!
//! Two surface syntaxes are handled, each in its own pass over the text:
//!
//! 1. `![alt](path)` — the whole match is replaced by `![alt](base_url + path)`.
//! 2. `<img src="path"` — only this prefix is replaced, so attributes that
//!    follow (`alt`, `style="zoom:40%;"`, …) survive byte for byte.
//!
//! A reference is rewritten only when `source_dir/path` exists at conversion
//! time. Otherwise the original text is kept and a warning is recorded. The
//! scan is lexical; nothing here parses Markdown structure.

use crate::error::ReferenceWarning;
use crate::output::{ImageReference, ImageSyntax, ReferenceOutcome};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::path::Path;
use tracing::{debug, info, warn};

static RE_MARKDOWN_IMAGE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"!\[(.*?)\]\((.*?)\)").unwrap());

static RE_HTML_IMAGE: Lazy<Regex> = Lazy::new(|| Regex::new(r#"<img src="(.*?)""#).unwrap());

/// Output of [`rewrite_images`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewrittenImages {
    pub text: String,
    pub references: Vec<ImageReference>,
    pub warnings: Vec<ReferenceWarning>,
}

/// Rewrite every eligible image reference in `text`.
///
/// Runs the Markdown pass first, then the HTML pass. Each pass is a single
/// left-to-right scan, so a replacement is never rescanned by the pass that
/// produced it.
///
/// Side effects: one filesystem existence check per local reference and
/// `tracing` diagnostics (local path and URL at `info`, missing files at
/// `warn`). Nothing is written to disk.
pub fn rewrite_images(text: &str, source_dir: &Path, base_url: &str) -> RewrittenImages {
    let mut references = Vec::new();
    let mut warnings = Vec::new();

    let text = RE_MARKDOWN_IMAGE.replace_all(text, |caps: &Captures<'_>| {
        let reference = resolve_reference(
            ImageSyntax::Markdown,
            Some(&caps[1]),
            &caps[2],
            source_dir,
            base_url,
        );
        let replacement = match reference.url() {
            Some(url) => format!("![{}]({})", &caps[1], url),
            None => caps[0].to_string(),
        };
        report(&reference, &caps[0], &mut warnings);
        references.push(reference);
        replacement
    });

    let text = RE_HTML_IMAGE.replace_all(&text, |caps: &Captures<'_>| {
        let reference =
            resolve_reference(ImageSyntax::HtmlTag, None, &caps[1], source_dir, base_url);
        let replacement = match reference.url() {
            Some(url) => format!("<img src=\"{}\"", url),
            None => caps[0].to_string(),
        };
        report(&reference, &caps[0], &mut warnings);
        references.push(reference);
        replacement
    });

    RewrittenImages {
        text: text.into_owned(),
        references,
        warnings,
    }
}

/// Resolve one reference against the document's directory.
///
/// Strips a single leading `./`, joins the remainder onto `source_dir` and
/// checks the result exists. The URL is `base_url` followed by the stripped
/// path, with no separator inserted. This is the only place the rewriter
/// touches the filesystem.
pub fn resolve_reference(
    syntax: ImageSyntax,
    alt: Option<&str>,
    path: &str,
    source_dir: &Path,
    base_url: &str,
) -> ImageReference {
    let mut reference = ImageReference {
        syntax,
        alt: alt.map(str::to_string),
        path: path.to_string(),
        local_path: None,
        outcome: ReferenceOutcome::Missing,
    };

    if is_remote(path) {
        reference.outcome = ReferenceOutcome::Remote;
        return reference;
    }

    let relative = path.strip_prefix("./").unwrap_or(path);
    if relative.trim().is_empty() {
        reference.outcome = ReferenceOutcome::EmptyPath;
        return reference;
    }

    let local_path = source_dir.join(relative);
    if local_path.exists() {
        reference.outcome = ReferenceOutcome::Rewritten {
            url: format!("{base_url}{relative}"),
        };
    }
    reference.local_path = Some(local_path);
    reference
}

fn is_remote(path: &str) -> bool {
    path.starts_with("http://") || path.starts_with("https://")
}

/// Emit the diagnostic for one processed reference.
fn report(reference: &ImageReference, matched: &str, warnings: &mut Vec<ReferenceWarning>) {
    match (&reference.outcome, &reference.local_path) {
        (ReferenceOutcome::Rewritten { url }, Some(local)) => {
            info!("Local path: {}", local.display());
            info!("Converted URL: {}", url);
        }
        (ReferenceOutcome::Remote, _) => {
            debug!("Skipping remote image: {}", reference.path);
        }
        (ReferenceOutcome::EmptyPath, _) => {
            warn!("Image reference has an empty path: {}", matched);
            warnings.push(ReferenceWarning::EmptyPath {
                reference: matched.to_string(),
            });
        }
        (_, local) => {
            let local = local.clone().unwrap_or_default();
            warn!("Image file not found: {}", local.display());
            warnings.push(ReferenceWarning::ImageNotFound {
                reference: matched.to_string(),
                local_path: local,
            });
        }
    }
}
