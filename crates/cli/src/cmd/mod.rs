mod build;
mod clean;
mod info;
mod statics;

use std::path::Path;

use anyhow::{Context, Result};

use littlebuild_lib::config;
use littlebuild_lib::pipeline::Project;
use littlebuild_lib::reporter::{Reporter, TracingReporter};

use crate::output::OutputFormat;
use crate::reporter::TerminalReporter;

pub use build::cmd_build;
pub use clean::cmd_clean;
pub use info::cmd_info;
pub use statics::cmd_statics;

fn load_project(explicit: Option<&Path>) -> Result<Project> {
  let path = config::locate(explicit);
  Project::load(&path).with_context(|| format!("Failed to load project {}", path.display()))
}

/// JSON output owns stdout, so progress goes to the log instead.
fn reporter_for(output: OutputFormat) -> Box<dyn Reporter> {
  if output.is_json() {
    Box::new(TracingReporter)
  } else {
    Box::new(TerminalReporter)
  }
}
