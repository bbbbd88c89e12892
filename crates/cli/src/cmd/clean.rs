use std::path::Path;

use anyhow::Result;

use super::{load_project, reporter_for};
use crate::output::{OutputFormat, Tone, print_json, say};

pub fn cmd_clean(config: Option<&Path>, output: OutputFormat) -> Result<()> {
  let project = load_project(config)?;
  let reporter = reporter_for(output);

  let removed = project.clean(&*reporter)?;

  if output.is_json() {
    print_json(&serde_json::json!({ "removed": removed }))?;
  } else if removed.is_empty() {
    say(Tone::Note, "Nothing to clean");
  } else {
    say(Tone::Done, &format!("Removed {} file(s)", removed.len()));
  }

  Ok(())
}
