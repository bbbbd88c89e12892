//! Timestamp-based staleness checks.
//!
//! An artifact is fresh when it exists and no declared input has a later
//! modification time. Anything that cannot be
//! certified fresh (missing files, unreadable metadata) counts as stale.

use std::io;
use std::path::Path;
use std::time::SystemTime;

use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StaleError {
  /// A derived artifact must declare at least one input.
  #[error("invalid argument: no inputs declared for {output}")]
  NoInputs { output: String },
}

/// Returns true if `output` must be regenerated from `inputs`.
///
/// # Errors
///
/// Returns [`StaleError::NoInputs`] when `inputs` is empty.
pub fn needs_rebuild<P: AsRef<Path>>(inputs: &[P], output: impl AsRef<Path>) -> Result<bool, StaleError> {
  let output = output.as_ref();

  if inputs.is_empty() {
    return Err(StaleError::NoInputs {
      output: output.display().to_string(),
    });
  }

  let Some(output_mtime) = mtime(output) else {
    return Ok(true);
  };

  for input in inputs {
    let input = input.as_ref();
    match mtime(input) {
      None => return Ok(true),
      Some(input_mtime) if input_mtime > output_mtime => {
        debug!(input = %input.display(), output = %output.display(), "input is newer than output");
        return Ok(true);
      }
      Some(_) => {}
    }
  }

  Ok(false)
}

/// Single-input convenience wrapper that cannot fail.
pub fn is_stale(input: impl AsRef<Path>, output: impl AsRef<Path>) -> bool {
  needs_rebuild(&[input.as_ref()], output).unwrap_or(true)
}

fn mtime(path: &Path) -> Option<SystemTime> {
  match path.metadata().and_then(|m| m.modified()) {
    Ok(time) => Some(time),
    Err(e) if e.kind() == io::ErrorKind::NotFound => None,
    Err(e) => {
      debug!(path = %path.display(), error = %e, "unreadable metadata, treating as stale");
      None
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::fs;
  use std::time::Duration;

  use tempfile::TempDir;

  use crate::util::testutil::{set_mtime, write_at};

  #[test]
  fn empty_inputs_is_invalid() {
    let temp = TempDir::new().unwrap();
    let out = temp.path().join("out.o");
    let inputs: [&Path; 0] = [];

    let err = needs_rebuild(&inputs, &out).unwrap_err();
    assert!(matches!(err, StaleError::NoInputs { .. }));
  }

  #[test]
  fn missing_output_always_stale() {
    let temp = TempDir::new().unwrap();
    let input = write_at(temp.path(), "a.c", "int a;", 100);

    assert!(needs_rebuild(&[&input], temp.path().join("a.o")).unwrap());
    // Even when the inputs are missing too.
    assert!(needs_rebuild(&[temp.path().join("nope.c")], temp.path().join("a.o")).unwrap());
  }

  #[test]
  fn missing_input_is_stale() {
    let temp = TempDir::new().unwrap();
    let input = write_at(temp.path(), "a.c", "int a;", 100);
    let output = write_at(temp.path(), "a.o", "obj", 200);

    assert!(needs_rebuild(&[input, temp.path().join("gone.c")], &output).unwrap());
  }

  #[test]
  fn newer_input_is_stale() {
    let temp = TempDir::new().unwrap();
    let old = write_at(temp.path(), "old.c", "", 100);
    let new = write_at(temp.path(), "new.c", "", 300);
    let output = write_at(temp.path(), "out", "", 200);

    assert!(needs_rebuild(&[&old, &new], &output).unwrap());
    assert!(!needs_rebuild(&[&old], &output).unwrap());
  }

  #[test]
  fn equal_mtime_is_fresh() {
    let temp = TempDir::new().unwrap();
    let input = write_at(temp.path(), "a.c", "", 150);
    let output = write_at(temp.path(), "a.o", "", 150);

    assert!(!needs_rebuild(&[&input], &output).unwrap());
  }

  #[test]
  fn touching_input_makes_output_stale() {
    let temp = TempDir::new().unwrap();
    let input = write_at(temp.path(), "a.c", "", 100);
    let output = write_at(temp.path(), "a.o", "", 200);
    assert!(!is_stale(&input, &output));

    fs::write(&input, "int changed;").unwrap();
    set_mtime(&input, Duration::from_secs(300));
    assert!(is_stale(&input, &output));
  }
}
