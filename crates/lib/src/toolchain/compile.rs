//! Source to object compilation.

use std::collections::BTreeMap;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::consts::{OBJECT_EXTENSION, SOURCE_EXTENSIONS};
use crate::reporter::{BuildEvent, Reporter};
use crate::stale;
use crate::toolchain::runner::ProcessRunner;
use crate::toolchain::types::{CompileFailure, CompileRequest, FailureList, ToolchainError};

/// Compile every source in `request` that is stale.
///
/// Missing sources and files without a recognised extension are reported and
/// skipped. A failing source does not stop the batch; once every source has
/// been tried, all failures are returned together.
///
/// # Returns
///
/// The object path of every accepted source, whether it was rebuilt or was
/// already fresh.
pub fn compile(
  request: &CompileRequest,
  runner: &dyn ProcessRunner,
  reporter: &dyn Reporter,
) -> Result<Vec<PathBuf>, ToolchainError> {
  if request.sources.is_empty() {
    return Err(ToolchainError::InvalidArgument("no sources to compile".to_string()));
  }

  let compiler = runner
    .resolve(&request.compiler)
    .ok_or_else(|| ToolchainError::ToolNotFound(request.compiler.clone()))?;

  fs::create_dir_all(&request.out_dir)?;

  let mut objects = Vec::with_capacity(request.sources.len());
  let mut failures = Vec::new();

  for source in &request.sources {
    if let Some(reason) = reject_reason(source) {
      reporter.report(BuildEvent::Skipped { path: source, reason });
      continue;
    }

    let object = object_path(&request.out_dir, source);
    objects.push(object.clone());

    if !stale::needs_rebuild(&[source], &object)? {
      reporter.report(BuildEvent::UpToDate { artifact: &object });
      continue;
    }

    let args = compile_args(request, source, &object);
    reporter.report(BuildEvent::Running {
      program: &compiler,
      args: &args,
    });

    let output = runner.run(&compiler, &args).map_err(|e| ToolchainError::Spawn {
      program: request.compiler.clone(),
      source: e,
    })?;

    if !output.success() {
      reporter.report(BuildEvent::Failed {
        subject: source,
        detail: output.diagnostics(),
      });
      failures.push(CompileFailure {
        source: source.clone(),
        code: output.code,
        stderr: output.diagnostics().to_string(),
      });
    }
  }

  if !failures.is_empty() {
    return Err(ToolchainError::CompilationFailed {
      failures: FailureList(failures),
    });
  }

  info!(objects = objects.len(), "compilation finished");
  Ok(objects)
}

/// `out_dir` + source file stem + `.o`.
pub fn object_path(out_dir: &Path, source: &Path) -> PathBuf {
  let mut name = source.file_stem().unwrap_or_default().to_os_string();
  name.push(".");
  name.push(OBJECT_EXTENSION);
  out_dir.join(name)
}

/// Arguments after the program name:
/// `flags… -D… -I… -c -o <object> <source>`.
pub fn compile_args(request: &CompileRequest, source: &Path, object: &Path) -> Vec<OsString> {
  let mut args: Vec<OsString> = request.flags.iter().map(OsString::from).collect();
  args.extend(macro_defines(&request.macros));
  args.extend(request.include_dirs.iter().map(|dir| {
    let mut token = OsString::from("-I");
    token.push(dir);
    token
  }));
  args.push("-c".into());
  args.push("-o".into());
  args.push(object.into());
  args.push(source.into());
  args
}

/// One `-DNAME=VALUE` token per macro, or `-DNAME` when the value is empty.
pub fn macro_defines(macros: &BTreeMap<String, String>) -> impl Iterator<Item = OsString> + '_ {
  macros.iter().map(|(name, value)| {
    if value.is_empty() {
      OsString::from(format!("-D{}", name))
    } else {
      OsString::from(format!("-D{}={}", name, value))
    }
  })
}

fn reject_reason(source: &Path) -> Option<&'static str> {
  if !source.is_file() {
    debug!(source = %source.display(), "source missing");
    return Some("source file not found");
  }
  let accepted = source
    .extension()
    .and_then(|e| e.to_str())
    .is_some_and(|e| SOURCE_EXTENSIONS.contains(&e));
  if !accepted {
    return Some("not a C/C++ source file");
  }
  None
}
