//! Process execution for toolchain steps.
//!
//! Commands are built as argument vectors and handed straight to the OS; no
//! shell ever sees them, so paths with spaces or quotes need no escaping.

use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::debug;

/// Captured result of a finished process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessOutput {
  /// Exit code, `None` when the process was killed by a signal.
  pub code: Option<i32>,
  pub stdout: String,
  pub stderr: String,
}

impl ProcessOutput {
  pub fn success(&self) -> bool {
    self.code == Some(0)
  }

  /// stderr, falling back to stdout when the tool wrote its diagnostics there.
  pub fn diagnostics(&self) -> &str {
    if self.stderr.trim().is_empty() {
      &self.stdout
    } else {
      &self.stderr
    }
  }
}

/// Seam between command construction and process spawning.
pub trait ProcessRunner {
  /// Resolve a tool name (or path) to an executable.
  fn resolve(&self, tool: &str) -> Option<PathBuf>;

  /// Run `program` with `args` to completion, capturing its output.
  fn run(&self, program: &Path, args: &[OsString]) -> io::Result<ProcessOutput>;
}

impl<R: ProcessRunner + ?Sized> ProcessRunner for &R {
  fn resolve(&self, tool: &str) -> Option<PathBuf> {
    (**self).resolve(tool)
  }

  fn run(&self, program: &Path, args: &[OsString]) -> io::Result<ProcessOutput> {
    (**self).run(program, args)
  }
}

/// Spawns real processes, blocking until each exits.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl ProcessRunner for SystemRunner {
  fn resolve(&self, tool: &str) -> Option<PathBuf> {
    which::which(tool).ok()
  }

  fn run(&self, program: &Path, args: &[OsString]) -> io::Result<ProcessOutput> {
    debug!(program = %program.display(), argc = args.len(), "spawning process");

    let output = Command::new(program).args(args).output()?;

    let result = ProcessOutput {
      code: output.status.code(),
      stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
      stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    };

    if !result.stdout.is_empty() {
      debug!(stdout = %result.stdout.trim_end(), "process stdout");
    }
    if !result.stderr.is_empty() {
      debug!(stderr = %result.stderr.trim_end(), "process stderr");
    }

    Ok(result)
  }
}
