//! Command implementations.

use std::io::{IsTerminal, Read};

use anyhow::{Context, bail};
use camino::{Utf8Path, Utf8PathBuf};
use clap::Args;

use readable_iq_core::{Text, markdown};

pub mod info;
pub mod report;
pub mod score;
#[cfg(feature = "mcp")]
pub mod serve;

/// Where the text to analyze comes from.
#[derive(Args, Debug, Default)]
pub struct InputArgs {
    /// File to analyze, or `-` for stdin. `.md` files are reduced to prose.
    #[arg(value_name = "FILE", conflicts_with = "text")]
    pub file: Option<Utf8PathBuf>,

    /// Analyze this text instead of a file
    #[arg(long, value_name = "TEXT")]
    pub text: Option<String>,

    /// Treat the input as markdown regardless of file extension
    #[arg(long)]
    pub markdown: bool,
}

impl InputArgs {
    /// Read, size-check and validate the input.
    pub fn load(&self, max_bytes: Option<usize>) -> anyhow::Result<Text> {
        let (raw, is_markdown) = match (&self.text, &self.file) {
            (Some(text), _) => {
                check_size("--text", text.len(), max_bytes)?;
                (text.clone(), self.markdown)
            }
            (None, Some(path)) if path.as_str() == "-" => (read_stdin(max_bytes)?, self.markdown),
            (None, Some(path)) => (
                read_input_file(path, max_bytes)?,
                self.markdown || path.extension() == Some("md"),
            ),
            (None, None) if !std::io::stdin().is_terminal() => {
                (read_stdin(max_bytes)?, self.markdown)
            }
            (None, None) => bail!("no input: pass a FILE, `-` for stdin, or --text"),
        };

        let prose = if is_markdown {
            markdown::strip_to_prose(&raw)
        } else {
            raw
        };
        Ok(Text::new(prose)?)
    }
}

/// Read a file and validate its size against the configured limit.
pub fn read_input_file(path: &Utf8Path, max_bytes: Option<usize>) -> anyhow::Result<String> {
    // Check metadata first so oversized files are never read into memory
    let metadata =
        std::fs::metadata(path.as_std_path()).with_context(|| format!("failed to read {path}"))?;
    let size = usize::try_from(metadata.len()).unwrap_or(usize::MAX);
    check_size(path.as_str(), size, max_bytes)?;

    std::fs::read_to_string(path.as_std_path()).with_context(|| format!("failed to read {path}"))
}

/// Read all of stdin, stopping one byte past the limit.
fn read_stdin(max_bytes: Option<usize>) -> anyhow::Result<String> {
    let cap = max_bytes.map_or(u64::MAX, |max| {
        u64::try_from(max).unwrap_or(u64::MAX).saturating_add(1)
    });
    let mut buf = String::new();
    std::io::stdin()
        .lock()
        .take(cap)
        .read_to_string(&mut buf)
        .context("failed to read stdin")?;
    check_size("stdin", buf.len(), max_bytes)?;
    Ok(buf)
}

fn check_size(source: &str, size: usize, max_bytes: Option<usize>) -> anyhow::Result<()> {
    if let Some(max) = max_bytes
        && size > max
    {
        bail!("input too large: {source} is {size} bytes (limit: {max} bytes)");
    }
    Ok(())
}
