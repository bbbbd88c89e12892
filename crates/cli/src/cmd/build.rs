//! Implementation of the `lb build` command.

use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};

use littlebuild_lib::toolchain::SystemRunner;

use super::{load_project, reporter_for};
use crate::output::{OutputFormat, Summary, Tone, elapsed, print_json, say};

/// Run statics (unless skipped), then compile and link one target.
///
/// Sources that fail to compile are all reported before the command fails;
/// the linker only runs once every object is fresh.
pub fn cmd_build(config: Option<&Path>, target: Option<&str>, no_statics: bool, output: OutputFormat) -> Result<()> {
  let start = Instant::now();
  let project = load_project(config)?;
  let reporter = reporter_for(output);

  let statics = if no_statics {
    None
  } else {
    Some(project.statics(&*reporter).context("Failed to generate statics")?)
  };

  let report = project.build(target, &SystemRunner, &*reporter)?;

  if output.is_json() {
    print_json(&serde_json::json!({ "statics": statics, "build": report }))?;
  } else {
    println!();
    say(Tone::Done, &format!("Target '{}' {}", report.target, report.state));
    Summary::new()
      .row("Objects", report.objects.len())
      .row("Output", report.output.path().display())
      .row("Duration", elapsed(start.elapsed()))
      .print();
  }

  Ok(())
}
