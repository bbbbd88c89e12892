//! Object to executable linking.

use std::ffi::OsString;
use std::fs;

use tracing::info;

use crate::reporter::{BuildEvent, Reporter};
use crate::stale;
use crate::toolchain::runner::ProcessRunner;
use crate::toolchain::types::{LinkOutcome, LinkRequest, ToolchainError};

/// Link `request.objects` into `out_dir/out_name`, unless the output is
/// already newer than every object. Any linker failure is fatal.
pub fn link(
  request: &LinkRequest,
  runner: &dyn ProcessRunner,
  reporter: &dyn Reporter,
) -> Result<LinkOutcome, ToolchainError> {
  if request.objects.is_empty() {
    return Err(ToolchainError::InvalidArgument("no objects to link".to_string()));
  }

  let output = request.output_path();

  if !stale::needs_rebuild(&request.objects, &output)? {
    reporter.report(BuildEvent::UpToDate { artifact: &output });
    return Ok(LinkOutcome::UpToDate(output));
  }

  let linker = runner
    .resolve(&request.compiler)
    .ok_or_else(|| ToolchainError::ToolNotFound(request.compiler.clone()))?;

  fs::create_dir_all(&request.out_dir)?;

  let args = link_args(request);
  reporter.report(BuildEvent::Running {
    program: &linker,
    args: &args,
  });

  let result = runner.run(&linker, &args).map_err(|e| ToolchainError::Spawn {
    program: request.compiler.clone(),
    source: e,
  })?;

  if !result.success() {
    reporter.report(BuildEvent::Failed {
      subject: &output,
      detail: result.diagnostics(),
    });
    return Err(ToolchainError::LinkFailed {
      output,
      code: result.code,
      stderr: result.diagnostics().to_string(),
    });
  }

  info!(output = %output.display(), objects = request.objects.len(), "linked");
  Ok(LinkOutcome::Linked(output))
}

/// Arguments after the program name:
/// `-o <output> <objects…> -L… -l… <extra flags…>`.
pub fn link_args(request: &LinkRequest) -> Vec<OsString> {
  let mut args = vec![OsString::from("-o"), request.output_path().into_os_string()];
  args.extend(request.objects.iter().map(|o| o.as_os_str().to_os_string()));
  args.extend(request.lib_dirs.iter().map(|d| prefixed("-L", d)));
  args.extend(request.libs.iter().map(|l| prefixed("-l", l)));
  args.extend(request.extra_flags.iter().map(OsString::from));
  args
}

/// `prefix` + `value`, unless `value` is already a flag.
fn prefixed(prefix: &str, value: &str) -> OsString {
  if value.starts_with('-') {
    OsString::from(value)
  } else {
    OsString::from(format!("{}{}", prefix, value))
  }
}
