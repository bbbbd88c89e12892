//! Implementation of the `lb info` command.
//!
//! Prints the project identity and, per target, where sources and objects
//! live and whether the compiler resolves on this machine.

use std::path::Path;

use anyhow::Result;
use serde::Serialize;

use littlebuild_lib::config::TargetConfig;
use littlebuild_lib::toolchain::{ProcessRunner, SystemRunner};

use super::load_project;
use crate::output::{OutputFormat, Summary, Tone, print_json, say};

#[derive(Serialize)]
struct TargetInfo<'a> {
  name: &'a str,
  default: bool,
  compiler_path: Option<String>,
  #[serde(flatten)]
  config: &'a TargetConfig,
}

pub fn cmd_info(config: Option<&Path>, output: OutputFormat) -> Result<()> {
  let project = load_project(config)?;
  let cfg = project.config();
  let default_target = cfg.target(None).ok().map(|(name, _)| name);

  let targets: Vec<TargetInfo<'_>> = cfg
    .targets
    .iter()
    .map(|(name, target)| TargetInfo {
      name,
      default: default_target == Some(name.as_str()),
      compiler_path: SystemRunner
        .resolve(&target.compiler)
        .map(|p| p.display().to_string()),
      config: target,
    })
    .collect();

  if output.is_json() {
    return print_json(&serde_json::json!({
      "root": project.root(),
      "project": cfg.project,
      "version_number": cfg.version_number()?,
      "statics": cfg.statics,
      "targets": targets,
    }));
  }

  say(Tone::Done, &format!("{} {}", cfg.project.title, cfg.project.version));
  let mut summary = Summary::new()
    .row("Root", project.root().display())
    .row("PROJECT_VERSION", cfg.version_number()?);
  if let Some(statics) = &cfg.statics {
    summary = summary.row("Statics", statics.output_dir.display());
  }
  summary.print();

  println!();
  println!("Targets:");
  for target in &targets {
    let marker = if target.default { " (default)" } else { "" };
    println!("  {}{}", target.name, marker);
    let mut rows = Summary::indented(4)
      .row("Sources", target.config.src_dir.display())
      .row("Build dir", target.config.build_dir.display());
    if let Some(path) = &target.compiler_path {
      rows = rows.row("Compiler", format!("{} ({})", target.config.compiler, path));
    }
    rows.print();
    if target.compiler_path.is_none() {
      say(Tone::Warn, &format!("compiler '{}' not found on PATH", target.config.compiler));
    }
  }

  Ok(())
}
