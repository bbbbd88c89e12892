//! Binary asset to C header conversion.
//!
//! Each input becomes `<output_dir>/<stem>.h` holding an `unsigned char`
//! array and an `unsigned int` length, in the layout `xxd -i` produces. The
//! first line carries a generator stamp so headers written by an older layout
//! are regenerated even when newer than their input.

use std::fmt::Write as _;
use std::fs;
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::debug;

use crate::consts::{HEADER_COLUMNS, HEADER_EXTENSION, HEADER_GENERATOR_VERSION};
use crate::reporter::{BuildEvent, Reporter};
use crate::stale;

#[derive(Debug, Error)]
pub enum HeaderError {
  #[error("failed to create header directory {path}: {source}")]
  OutputDir {
    path: PathBuf,
    #[source]
    source: io::Error,
  },
}

/// Outcome of a header generation batch. Per-file failures land in `failed`.
#[derive(Debug, Default, Serialize)]
pub struct HeaderReport {
  pub generated: Vec<PathBuf>,
  pub up_to_date: Vec<PathBuf>,
  pub missing: Vec<PathBuf>,
  pub failed: Vec<(PathBuf, String)>,
}

impl HeaderReport {
  /// Every header that exists after the batch, generated or fresh.
  pub fn headers(&self) -> impl Iterator<Item = &PathBuf> {
    self.generated.iter().chain(self.up_to_date.iter())
  }
}

pub fn stamp() -> String {
  format!("/* generated by littlebuild header v{} */", HEADER_GENERATOR_VERSION)
}

/// Derived header path: `output_dir` + base name up to its first `.` + `.h`.
pub fn header_path(output_dir: &Path, input: &Path) -> PathBuf {
  let base = base_name(input);
  let stem = base.split('.').next().unwrap_or(&base);
  output_dir.join(format!("{}.{}", stem, HEADER_EXTENSION))
}

/// C identifier for the input's base name.
///
/// Anything outside `[A-Za-z0-9_]` becomes `_`; a leading digit gets a `_` prefix.
pub fn identifier(input: &Path) -> String {
  let mut ident: String = base_name(input)
    .chars()
    .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
    .collect();
  if ident.is_empty() || ident.starts_with(|c: char| c.is_ascii_digit()) {
    ident.insert(0, '_');
  }
  ident
}

/// Render the full header text for `bytes` under `ident`.
pub fn render(ident: &str, bytes: &[u8]) -> String {
  let mut out = String::with_capacity(bytes.len() * 6 + 128);
  let _ = writeln!(out, "{}", stamp());
  let _ = writeln!(out, "unsigned char {}[] = {{", ident);

  let rows = bytes.len().div_ceil(HEADER_COLUMNS);
  for (row, chunk) in bytes.chunks(HEADER_COLUMNS).enumerate() {
    out.push_str("  ");
    let values: Vec<String> = chunk.iter().map(|b| format!("0x{:02x}", b)).collect();
    out.push_str(&values.join(", "));
    if row + 1 < rows {
      out.push(',');
    }
    out.push('\n');
  }

  out.push_str("};\n");
  let _ = writeln!(out, "unsigned int {}_len = {};", ident, bytes.len());
  out
}

/// Convert each input into a header under `output_dir`, skipping fresh ones.
///
/// # Errors
///
/// Only failing to create `output_dir` is fatal. Missing inputs and per-file
/// I/O failures are reported and recorded, and the batch continues.
pub fn generate_headers<P: AsRef<Path>>(
  output_dir: &Path,
  inputs: &[P],
  reporter: &dyn Reporter,
) -> Result<HeaderReport, HeaderError> {
  fs::create_dir_all(output_dir).map_err(|source| HeaderError::OutputDir {
    path: output_dir.to_path_buf(),
    source,
  })?;

  let mut report = HeaderReport::default();

  for input in inputs {
    let input = input.as_ref();
    let out = header_path(output_dir, input);

    if !input.is_file() {
      reporter.report(BuildEvent::Skipped {
        path: input,
        reason: "asset not found",
      });
      report.missing.push(input.to_path_buf());
      continue;
    }

    if !stale::is_stale(input, &out) && has_current_stamp(&out) {
      reporter.report(BuildEvent::UpToDate { artifact: &out });
      report.up_to_date.push(out);
      continue;
    }

    match write_header(input, &out, output_dir) {
      Ok(()) => {
        reporter.report(BuildEvent::Generated { artifact: &out });
        report.generated.push(out);
      }
      Err(e) => {
        let detail = e.to_string();
        reporter.report(BuildEvent::Failed {
          subject: input,
          detail: &detail,
        });
        report.failed.push((input.to_path_buf(), detail));
      }
    }
  }

  Ok(report)
}

fn write_header(input: &Path, out: &Path, output_dir: &Path) -> io::Result<()> {
  let bytes = fs::read(input)?;
  let text = render(&identifier(input), &bytes);

  let mut staged = NamedTempFile::new_in(output_dir)?;
  staged.write_all(text.as_bytes())?;
  staged.flush()?;
  staged.persist(out).map_err(|e| e.error)?;

  debug!(input = %input.display(), header = %out.display(), bytes = bytes.len(), "header written");
  Ok(())
}

fn has_current_stamp(header: &Path) -> bool {
  let Ok(file) = fs::File::open(header) else {
    return false;
  };
  let mut first = String::new();
  if BufReader::new(file).read_line(&mut first).is_err() {
    return false;
  }
  first.trim_end() == stamp()
}

fn base_name(path: &Path) -> String {
  path
    .file_name()
    .map(|n| n.to_string_lossy().into_owned())
    .unwrap_or_default()
}
