//! CLI binary for zhihu-md.
//!
//! A thin shim over the library crate that maps CLI flags to
//! `ConversionConfig`, runs one conversion, and optionally pushes the
//! repository afterwards.

use anyhow::{Context, Result};
use clap::Parser;
use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use zhihu_md::{
    convert, inspect, ConversionConfig, ConversionOutput, FormulaStyle, GitPublisher, ZhihuMdError,
    DEFAULT_BASE_URL,
};

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn paint(code: &str, s: &str) -> String {
    if io::stderr().is_terminal() {
        format!("\x1b[{code}m{s}\x1b[0m")
    } else {
        s.to_string()
    }
}
fn green(s: &str) -> String {
    paint("32", s)
}
fn red(s: &str) -> String {
    paint("31", s)
}
fn cyan(s: &str) -> String {
    paint("36", s)
}
fn bold(s: &str) -> String {
    paint("1", s)
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Convert next to the input (writes posts/notes_for_zhihu.md)
  zhihu-md -i posts/notes.md --base-url https://cdn.example.org/blog/

  # Explicit output and encoding
  zhihu-md -i notes.md -o upload.md -e gbk

  # Convert, then commit and push so the image URLs resolve
  zhihu-md -i notes.md --git

  # Render every formula through Zhihu's equation images instead
  zhihu-md -i notes.md --legacy-formula

  # Only report the detected encoding
  zhihu-md -i notes.md --detect-only

WHAT IS REWRITTEN:
  ![alt](img/a.png)        → ![alt](<base-url>img/a.png)   when img/a.png exists
  <img src="img/a.png" …   → <img src="<base-url>img/a.png" …
  $x+y$                    →  $$x+y$$
  $$ block $$              unchanged

  Image paths are resolved relative to the input file's directory. Missing
  files are reported and left as written.

ENVIRONMENT VARIABLES:
  ZHIHU_MD_BASE_URL   Default for --base-url
  ZHIHU_MD_ENCODING   Default for --encoding
  RUST_LOG            Overrides the log filter (e.g. RUST_LOG=debug)
"#;

/// Convert Markdown files for import into Zhihu.
#[derive(Parser, Debug)]
#[command(
    name = "zhihu-md",
    version,
    about = "Convert Markdown files for import into Zhihu",
    long_about = "Rewrite local image references to absolute URLs under a base URL and \
promote inline $…$ math to the $$…$$ form that Zhihu's Markdown importer renders.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Path to the Markdown file to convert.
    #[arg(short, long)]
    input: PathBuf,

    /// Output file path [default: <input-stem>_for_zhihu.md next to the input].
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Encoding of the input file (auto-detected when omitted).
    #[arg(short, long, env = "ZHIHU_MD_ENCODING")]
    encoding: Option<String>,

    /// Prefix prepended to every rewritten image path.
    #[arg(long, env = "ZHIHU_MD_BASE_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Compress images that are too large (not implemented; no effect).
    #[arg(long)]
    compress: bool,

    /// Stage, commit and push the repository after conversion.
    #[arg(long)]
    git: bool,

    /// Convert every formula into a Zhihu equation image instead of $$…$$.
    #[arg(long)]
    legacy_formula: bool,

    /// Print the detected encoding only, no conversion.
    #[arg(long)]
    detect_only: bool,

    /// Print a JSON report instead of the output path.
    #[arg(long)]
    json: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long)]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_ansi(io::stderr().is_terminal())
        .with_writer(io::stderr)
        .init();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            match e.downcast_ref::<ZhihuMdError>() {
                Some(err) if err.is_not_found() => {
                    eprintln!("{} File not found: {}", red("Error:"), cli.input.display());
                }
                _ => eprintln!("{} {e:#}", red("Error:")),
            }
            ExitCode::from(1)
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    // ── Detect-only mode ─────────────────────────────────────────────────
    if cli.detect_only {
        let detection = inspect(&cli.input)?;
        if cli.json {
            let report = serde_json::json!({
                "file": cli.input,
                "encoding": detection.name(),
                "confidence": detection.confidence,
            });
            println!(
                "{}",
                serde_json::to_string_pretty(&report).context("Failed to serialise report")?
            );
        } else {
            println!("File:        {}", cli.input.display());
            println!("Encoding:    {}", detection.name());
            println!("Confidence:  {}", detection.confidence);
        }
        return Ok(());
    }

    // ── Convert ──────────────────────────────────────────────────────────
    let config = build_config(cli)?;
    let output = convert(&cli.input, cli.output.as_deref(), &config)?;

    // ── Publish ──────────────────────────────────────────────────────────
    if cli.git {
        GitPublisher::new(repo_dir(&cli.input))
            .publish(&cli.input)
            .context("Git publish failed")?;
    }

    if cli.json {
        let json = serde_json::to_string_pretty(&output).context("Failed to serialise output")?;
        println!("{json}");
    } else {
        println!("{}", output.output_path.display());
        if !cli.quiet {
            print_summary(&output);
        }
    }

    Ok(())
}

/// Map CLI args to `ConversionConfig`.
fn build_config(cli: &Cli) -> Result<ConversionConfig> {
    let style = if cli.legacy_formula {
        FormulaStyle::EquationImage
    } else {
        FormulaStyle::DoubleDollar
    };

    let config = ConversionConfig::builder()
        .base_url(cli.base_url.clone())
        .maybe_encoding(cli.encoding.clone())
        .compress_images(cli.compress)
        .formula_style(style)
        .build()?;
    Ok(config)
}

/// Directory git runs in: the input's parent, or `.` for a bare file name.
fn repo_dir(input: &Path) -> PathBuf {
    match input.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

fn print_summary(output: &ConversionOutput) {
    let stats = &output.stats;
    eprintln!(
        "{}  {} images rewritten, {} missing, {} formulas  {}ms  →  {}",
        if stats.images_missing == 0 {
            green("✔")
        } else {
            cyan("⚠")
        },
        stats.images_rewritten,
        stats.images_missing,
        stats.formulas_rewritten,
        stats.total_duration_ms,
        bold(&output.output_path.display().to_string()),
    );
}
