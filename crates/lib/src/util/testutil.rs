//! Test utilities for littlebuild-lib.
//!
//! Helpers for pinning file timestamps and a recording [`FakeRunner`] that
//! stands in for a real compiler.

use std::cell::RefCell;
use std::ffi::OsString;
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use crate::toolchain::{ProcessOutput, ProcessRunner};

/// Set a file's modification time to `UNIX_EPOCH + since_epoch`.
pub fn set_mtime(path: &Path, since_epoch: Duration) {
  let file = File::options().write(true).open(path).unwrap();
  file.set_modified(SystemTime::UNIX_EPOCH + since_epoch).unwrap();
}

/// Write `contents` to `dir/name` and pin its mtime to `secs` after the epoch.
pub fn write_at(dir: &Path, name: &str, contents: impl AsRef<[u8]>, secs: u64) -> PathBuf {
  let path = dir.join(name);
  if let Some(parent) = path.parent() {
    fs::create_dir_all(parent).unwrap();
  }
  fs::write(&path, contents).unwrap();
  set_mtime(&path, Duration::from_secs(secs));
  path
}

/// Returns the command and args to echo a message.
#[cfg(unix)]
pub fn echo_msg(msg: &str) -> (&'static str, Vec<OsString>) {
  ("/bin/echo", vec![OsString::from(msg)])
}

/// Returns the shell command and args to execute a shell script.
#[cfg(unix)]
pub fn shell_cmd(script: &str) -> (&'static str, Vec<OsString>) {
  ("/bin/sh", vec![OsString::from("-c"), OsString::from(script)])
}

/// One recorded invocation.
#[derive(Debug, Clone)]
pub struct Call {
  pub program: PathBuf,
  pub args: Vec<String>,
}

struct Failure {
  needle: String,
  code: i32,
  stderr: String,
}

/// A [`ProcessRunner`] that records calls instead of spawning processes.
///
/// On success it creates the file following `-o`, like a real compiler would.
#[derive(Default)]
pub struct FakeRunner {
  calls: RefCell<Vec<Call>>,
  missing: Vec<String>,
  failures: Vec<Failure>,
}

impl FakeRunner {
  pub fn new() -> Self {
    Self::default()
  }

  /// Make `tool` unresolvable.
  pub fn without_tool(mut self, tool: &str) -> Self {
    self.missing.push(tool.to_string());
    self
  }

  /// Exit with `code` and `stderr` whenever an argument contains `needle`.
  pub fn fail_when_arg_contains(mut self, needle: &str, code: i32, stderr: &str) -> Self {
    self.failures.push(Failure {
      needle: needle.to_string(),
      code,
      stderr: stderr.to_string(),
    });
    self
  }

  pub fn calls(&self) -> Vec<Call> {
    self.calls.borrow().clone()
  }
}

impl ProcessRunner for FakeRunner {
  fn resolve(&self, tool: &str) -> Option<PathBuf> {
    if self.missing.iter().any(|m| m == tool) {
      return None;
    }
    Some(PathBuf::from("/fake/bin").join(tool))
  }

  fn run(&self, program: &Path, args: &[OsString]) -> io::Result<ProcessOutput> {
    let args: Vec<String> = args.iter().map(|a| a.to_string_lossy().into_owned()).collect();
    self.calls.borrow_mut().push(Call {
      program: program.to_path_buf(),
      args: args.clone(),
    });

    if let Some(failure) = self.failures.iter().find(|f| args.iter().any(|a| a.contains(&f.needle))) {
      return Ok(ProcessOutput {
        code: Some(failure.code),
        stdout: String::new(),
        stderr: failure.stderr.clone(),
      });
    }

    if let Some(pos) = args.iter().position(|a| a == "-o")
      && let Some(out) = args.get(pos + 1)
    {
      fs::write(out, b"fake artifact")?;
    }

    Ok(ProcessOutput {
      code: Some(0),
      ..Default::default()
    })
  }
}
