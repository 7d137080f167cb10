//! Formula normalisation: rewrite math delimiters for the Zhihu importer.
//!
//! The default [`FormulaStyle::DoubleDollar`] promotes every inline span
//! `$E$` to ` $$E$$ `, since Zhihu only renders the double-dollar form.
//! Existing `$$…$$` blocks are copied through verbatim, which makes the pass
//! a no-op on its own output.
//!
//! Delimiter rules for inline spans:
//!
//! - a `$` directly followed by another `$` is never an inline delimiter; the
//!   pair opens a block that runs to the next `$$`, possibly across lines
//! - a `$` preceded by a backslash is escaped
//! - the span is the shortest text up to the next eligible `$` on the same
//!   line; reaching a newline or a `$$` first means there is no span
//!
//! The legacy [`FormulaStyle::EquationImage`] turns every formula, block and
//! inline, into an `<img>` served by Zhihu's equation renderer.

use crate::config::FormulaStyle;

/// Zhihu's server-side TeX renderer.
pub const EQUATION_ENDPOINT: &str = "https://www.zhihu.com/equation?tex=";

/// Output of [`normalize_formulas`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedFormulas {
    pub text: String,
    /// Number of spans (inline and block) that were rewritten.
    pub rewritten: usize,
}

/// Rewrite the math delimiters in `text` using `style`.
pub fn normalize_formulas(text: &str, style: FormulaStyle) -> NormalizedFormulas {
    match style {
        FormulaStyle::DoubleDollar => rewrite_inline(text, |expr| format!(" $${expr}$$ ")),
        FormulaStyle::EquationImage => {
            let blocks = rewrite_blocks_as_images(text);
            let inline = rewrite_inline(&blocks.text, |expr| format!(" {} ", equation_img(expr)));
            NormalizedFormulas {
                text: inline.text,
                rewritten: blocks.rewritten + inline.rewritten,
            }
        }
    }
}

/// `<img>` tag asking Zhihu to render `expr`.
pub fn equation_img(expr: &str) -> String {
    format!(
        r#"<img src="{EQUATION_ENDPOINT}{expr}" alt="{expr}" class="ee_img tr_noresize" eeimg="1">"#
    )
}

// ── Inline spans ─────────────────────────────────────────────────────────────

// Only ASCII bytes are compared, so every index we slice at is a char boundary.
fn rewrite_inline(text: &str, render: impl Fn(&str) -> String) -> NormalizedFormulas {
    let bytes = text.as_bytes();
    let mut out = String::with_capacity(text.len() + 16);
    let mut rewritten = 0;
    let mut copied = 0;
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'$' if bytes.get(i + 1) == Some(&b'$') => {
                i = find_block_close(text, i + 2).unwrap_or(i + 2);
            }
            b'$' => match find_inline_close(bytes, i + 1) {
                Some(close) => {
                    out.push_str(&text[copied..i]);
                    out.push_str(&render(&text[i + 1..close]));
                    rewritten += 1;
                    i = close + 1;
                    copied = i;
                }
                None => i += 1,
            },
            _ => i += 1,
        }
    }
    out.push_str(&text[copied..]);

    NormalizedFormulas {
        text: out,
        rewritten,
    }
}

/// Index of the `$` closing an inline span whose body starts at `start`.
fn find_inline_close(bytes: &[u8], start: usize) -> Option<usize> {
    let mut j = start;
    while j < bytes.len() {
        match bytes[j] {
            b'\n' => return None,
            b'\\' => j += 2,
            b'$' if bytes.get(j + 1) == Some(&b'$') => return None,
            b'$' => return Some(j),
            _ => j += 1,
        }
    }
    None
}

/// Index just past the `$$` closing a block whose body starts at `start`.
fn find_block_close(text: &str, start: usize) -> Option<usize> {
    text.get(start..)?.find("$$").map(|p| start + p + 2)
}

// ── Legacy block images ──────────────────────────────────────────────────────

/// Replace `$$E$$` blocks that end a line with a standalone equation image.
///
/// The newline after the closing `$$` is consumed and the image is emitted on
/// its own line. A `$$` pair that is not followed by a newline (or the end of
/// the text) does not close the block; the search moves on to the next one.
fn rewrite_blocks_as_images(text: &str) -> NormalizedFormulas {
    let mut out = String::with_capacity(text.len());
    let mut rewritten = 0;
    let mut rest = text;

    while let Some(open) = rest.find("$$") {
        let body_start = open + 2;
        let Some((close, after)) = find_line_ending_close(rest, body_start) else {
            break;
        };
        let expr = rest[body_start..close].trim_start();
        out.push_str(&rest[..open]);
        out.push('\n');
        out.push_str(&equation_img(expr));
        out.push('\n');
        rewritten += 1;
        rest = &rest[after..];
    }
    out.push_str(rest);

    NormalizedFormulas {
        text: out,
        rewritten,
    }
}

/// Find a `$$` at or after `from` that is followed by `\n` or the end of
/// `text`. Returns its index and the index after the consumed newline.
fn find_line_ending_close(text: &str, from: usize) -> Option<(usize, usize)> {
    let mut search = from;
    while let Some(p) = text[search..].find("$$") {
        let close = search + p;
        let end = close + 2;
        match text.as_bytes().get(end) {
            None => return Some((close, end)),
            Some(b'\n') => return Some((close, end + 1)),
            Some(_) => search = end,
        }
    }
    None
}
