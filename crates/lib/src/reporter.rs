//! Progress reporting.
//!
//! Components never print directly. They emit [`BuildEvent`]s to an injected
//! [`Reporter`], so the CLI can render colored output while tests capture
//! events in memory.

use std::cell::RefCell;
use std::ffi::OsString;
use std::fmt;
use std::path::Path;

use tracing::{error, info, warn};

/// Something worth telling the user about.
#[derive(Debug, Clone, Copy)]
pub enum BuildEvent<'a> {
  /// The artifact is fresh and was left alone.
  UpToDate { artifact: &'a Path },
  /// An external process is about to run.
  Running { program: &'a Path, args: &'a [OsString] },
  /// An artifact was written by the toolkit itself.
  Generated { artifact: &'a Path },
  /// A generated file was deleted.
  Removed { path: &'a Path },
  /// An input was ignored; the batch carries on.
  Skipped { path: &'a Path, reason: &'a str },
  /// A step failed. `detail` carries captured diagnostics, possibly empty.
  Failed { subject: &'a Path, detail: &'a str },
}

impl fmt::Display for BuildEvent<'_> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      BuildEvent::UpToDate { artifact } => write!(f, "{} -> nothing to do!", artifact.display()),
      BuildEvent::Running { program, args } => write!(f, "COMMAND: {}", render_command(program, args)),
      BuildEvent::Generated { artifact } => write!(f, "GENERATED: {}", artifact.display()),
      BuildEvent::Removed { path } => write!(f, "REMOVED: {}", path.display()),
      BuildEvent::Skipped { path, reason } => write!(f, "SKIPPED: {} ({})", path.display(), reason),
      BuildEvent::Failed { subject, detail } if detail.is_empty() => write!(f, "FAILED: {}", subject.display()),
      BuildEvent::Failed { subject, detail } => write!(f, "FAILED: {}\n{}", subject.display(), detail.trim_end()),
    }
  }
}

/// Render a program and its arguments as a single display line.
///
/// For display only; the argument vector is never re-parsed by a shell.
pub fn render_command(program: &Path, args: &[OsString]) -> String {
  let mut line = program.display().to_string();
  for arg in args {
    line.push(' ');
    line.push_str(&arg.to_string_lossy());
  }
  line
}

pub trait Reporter {
  fn report(&self, event: BuildEvent<'_>);
}

impl<R: Reporter + ?Sized> Reporter for &R {
  fn report(&self, event: BuildEvent<'_>) {
    (**self).report(event)
  }
}

/// Forwards events to `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
  fn report(&self, event: BuildEvent<'_>) {
    match event {
      BuildEvent::UpToDate { artifact } => info!(artifact = %artifact.display(), "up to date"),
      BuildEvent::Running { program, args } => info!(command = %render_command(program, args), "running"),
      BuildEvent::Generated { artifact } => info!(artifact = %artifact.display(), "generated"),
      BuildEvent::Removed { path } => info!(path = %path.display(), "removed"),
      BuildEvent::Skipped { path, reason } => warn!(path = %path.display(), reason, "skipped"),
      BuildEvent::Failed { subject, detail } => error!(subject = %subject.display(), detail, "failed"),
    }
  }
}

/// Records rendered events. Handy in tests and for callers that want a transcript.
#[derive(Debug, Default)]
pub struct MemoryReporter {
  lines: RefCell<Vec<String>>,
}

impl MemoryReporter {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn lines(&self) -> Vec<String> {
    self.lines.borrow().clone()
  }

  /// Number of recorded lines starting with `prefix`.
  pub fn count(&self, prefix: &str) -> usize {
    self.lines.borrow().iter().filter(|l| l.starts_with(prefix)).count()
  }
}

impl Reporter for MemoryReporter {
  fn report(&self, event: BuildEvent<'_>) {
    self.lines.borrow_mut().push(event.to_string());
  }
}
