//! Request, outcome and error types for compiler and linker invocations.

use std::collections::BTreeMap;
use std::fmt;
use std::io;
use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

use crate::stale::StaleError;

/// Everything needed to turn sources into objects.
///
/// Built once per invocation and never mutated afterwards.
#[derive(Debug, Clone, Default)]
pub struct CompileRequest {
  pub compiler: String,
  pub flags: Vec<String>,
  /// Preprocessor macros, emitted in key order. An empty value gives a bare `-DNAME`.
  pub macros: BTreeMap<String, String>,
  pub include_dirs: Vec<PathBuf>,
  pub sources: Vec<PathBuf>,
  pub out_dir: PathBuf,
}

/// Everything needed to link objects into one output.
#[derive(Debug, Clone, Default)]
pub struct LinkRequest {
  pub compiler: String,
  pub objects: Vec<PathBuf>,
  pub lib_dirs: Vec<String>,
  pub libs: Vec<String>,
  pub extra_flags: Vec<String>,
  pub out_dir: PathBuf,
  pub out_name: String,
}

impl LinkRequest {
  pub fn output_path(&self) -> PathBuf {
    self.out_dir.join(&self.out_name)
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum LinkOutcome {
  Linked(PathBuf),
  UpToDate(PathBuf),
}

impl LinkOutcome {
  pub fn path(&self) -> &PathBuf {
    match self {
      LinkOutcome::Linked(p) | LinkOutcome::UpToDate(p) => p,
    }
  }
}

/// A source whose compiler process exited unsuccessfully.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompileFailure {
  pub source: PathBuf,
  pub code: Option<i32>,
  pub stderr: String,
}

/// Newline-separated list of failed sources, for error messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureList(pub Vec<CompileFailure>);

impl fmt::Display for FailureList {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    for (i, failure) in self.0.iter().enumerate() {
      if i > 0 {
        write!(f, ", ")?;
      }
      write!(f, "{}", failure.source.display())?;
    }
    Ok(())
  }
}

#[derive(Debug, Error)]
pub enum ToolchainError {
  #[error("invalid argument: {0}")]
  InvalidArgument(String),

  #[error("tool not found on PATH: {0}")]
  ToolNotFound(String),

  #[error("compilation failed for {} source(s): {failures}", .failures.0.len())]
  CompilationFailed { failures: FailureList },

  #[error("linking {output} failed with exit code {code:?}")]
  LinkFailed {
    output: PathBuf,
    code: Option<i32>,
    stderr: String,
  },

  #[error("failed to run {program}: {source}")]
  Spawn {
    program: String,
    #[source]
    source: io::Error,
  },

  #[error("io error: {0}")]
  Io(#[from] io::Error),
}

impl From<StaleError> for ToolchainError {
  fn from(e: StaleError) -> Self {
    ToolchainError::InvalidArgument(e.to_string())
  }
}

impl ToolchainError {
  /// Failed sources, if this is a compilation failure.
  pub fn failed_sources(&self) -> Vec<&PathBuf> {
    match self {
      ToolchainError::CompilationFailed { failures } => failures.0.iter().map(|f| &f.source).collect(),
      _ => Vec::new(),
    }
  }
}
