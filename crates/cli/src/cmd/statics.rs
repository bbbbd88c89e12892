use std::path::Path;

use anyhow::Result;

use littlebuild_lib::pipeline::ArchiveStep;

use super::{load_project, reporter_for};
use crate::output::{OutputFormat, Summary, Tone, human_size, print_json, say};

pub fn cmd_statics(config: Option<&Path>, output: OutputFormat) -> Result<()> {
  let project = load_project(config)?;
  let reporter = reporter_for(output);

  let report = project.statics(&*reporter)?;

  if output.is_json() {
    return print_json(&report);
  }

  if project.config().statics.is_none() {
    say(Tone::Note, "Project declares no statics");
    return Ok(());
  }

  let written: Vec<_> = report
    .archives
    .iter()
    .filter_map(|step| match step {
      ArchiveStep::Written(summary) => Some(summary),
      ArchiveStep::UpToDate { .. } => None,
    })
    .collect();

  println!();
  say(Tone::Done, "Statics ready");
  Summary::new()
    .row("Archives written", written.len())
    .row("Archived", human_size(written.iter().map(|summary| summary.bytes).sum()))
    .row("Headers generated", report.headers.generated.len())
    .row("Headers up to date", report.headers.up_to_date.len())
    .print();

  if !report.headers.missing.is_empty() {
    say(Tone::Warn, &format!("{} asset(s) missing", report.headers.missing.len()));
  }
  for (path, reason) in &report.headers.failed {
    say(Tone::Warn, &format!("{}: {}", path.display(), reason));
  }

  Ok(())
}
