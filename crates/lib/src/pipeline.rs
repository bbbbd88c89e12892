//! Build orchestration for a loaded project.
//!
//! A [`Project`] turns its configuration into plain request values and drives
//! the components in order: statics (archives, then headers), compile, link.
//! Every step consults timestamps first, so re-running after a failure only
//! redoes what is stale.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info};

use crate::archive::{self, ArchiveSummary};
use crate::config::{ProjectConfig, TargetConfig};
use crate::error::{Error, Result};
use crate::fsutil::{self, FsError};
use crate::header::{self, HeaderReport};
use crate::reporter::{BuildEvent, Reporter};
use crate::toolchain::{self, CompileRequest, LinkOutcome, LinkRequest, ProcessRunner, ToolchainError};

/// Lifecycle of one target within a single invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TargetState {
  Unbuilt,
  Compiling,
  CompileFailed,
  Compiled,
  Linking,
  LinkFailed,
  Linked,
}

impl TargetState {
  pub fn is_terminal(self) -> bool {
    matches!(self, TargetState::CompileFailed | TargetState::LinkFailed | TargetState::Linked)
  }
}

impl fmt::Display for TargetState {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let s = match self {
      TargetState::Unbuilt => "unbuilt",
      TargetState::Compiling => "compiling",
      TargetState::CompileFailed => "failed to compile",
      TargetState::Compiled => "compiled",
      TargetState::Linking => "linking",
      TargetState::LinkFailed => "failed to link",
      TargetState::Linked => "linked",
    };
    f.write_str(s)
  }
}

/// A fully resolved build target. Paths are absolute or relative to the
/// process working directory, never to the project file.
#[derive(Debug, Clone)]
pub struct BuildTarget {
  pub name: String,
  pub src_dir: PathBuf,
  pub compile: CompileRequest,
  pub lib_dirs: Vec<String>,
  pub libs: Vec<String>,
  pub ld_flags: Vec<String>,
  pub output_name: String,
}

impl BuildTarget {
  pub fn link_request(&self, objects: Vec<PathBuf>) -> LinkRequest {
    LinkRequest {
      compiler: self.compile.compiler.clone(),
      objects,
      lib_dirs: self.lib_dirs.clone(),
      libs: self.libs.clone(),
      extra_flags: self.ld_flags.clone(),
      out_dir: self.compile.out_dir.clone(),
      out_name: self.output_name.clone(),
    }
  }
}

#[derive(Debug, Serialize)]
pub struct BuildReport {
  pub target: String,
  pub state: TargetState,
  pub objects: Vec<PathBuf>,
  pub output: LinkOutcome,
}

#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ArchiveStep {
  Written(ArchiveSummary),
  UpToDate { path: PathBuf },
}

#[derive(Debug, Default, Serialize)]
pub struct StaticsReport {
  pub archives: Vec<ArchiveStep>,
  pub headers: HeaderReport,
}

pub struct Project {
  root: PathBuf,
  config: ProjectConfig,
}

impl Project {
  /// Load a project file. Relative paths inside it resolve against its directory.
  pub fn load(path: &Path) -> Result<Self> {
    let config = ProjectConfig::load(path)?;
    let root = match path.parent() {
      Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
      _ => PathBuf::from("."),
    };
    Ok(Self::new(root, config))
  }

  pub fn new(root: PathBuf, config: ProjectConfig) -> Self {
    Self { root, config }
  }

  pub fn root(&self) -> &Path {
    &self.root
  }

  pub fn config(&self) -> &ProjectConfig {
    &self.config
  }

  fn resolve(&self, path: &Path) -> PathBuf {
    if path.is_absolute() {
      path.to_path_buf()
    } else {
      self.root.join(path)
    }
  }

  /// Build the request values for a target. Reads the source directory
  /// listing but touches nothing.
  pub fn target(&self, name: Option<&str>) -> Result<BuildTarget> {
    let (name, target) = self.config.target(name)?;
    let src_dir = self.resolve(&target.src_dir);

    let mut macros = self.config.project_macros()?;
    macros.extend(target.macros.iter().map(|(k, v)| (k.clone(), v.clone())));

    Ok(BuildTarget {
      name: name.to_string(),
      src_dir: src_dir.clone(),
      compile: CompileRequest {
        compiler: target.compiler.clone(),
        flags: target.flags.clone(),
        macros,
        include_dirs: target.includes.iter().map(|p| self.resolve(p)).collect(),
        sources: list_files(&src_dir)?,
        out_dir: self.resolve(&target.build_dir),
      },
      lib_dirs: target.lib_dirs.clone(),
      libs: target.libs.clone(),
      ld_flags: target.ld_flags.clone(),
      output_name: self.output_name(target),
    })
  }

  fn output_name(&self, target: &TargetConfig) -> String {
    target.output.clone().unwrap_or_else(|| self.config.project.title.clone())
  }

  /// Refresh archives, then convert assets and archives into headers.
  pub fn statics(&self, reporter: &dyn Reporter) -> Result<StaticsReport> {
    let Some(statics) = &self.config.statics else {
      debug!("project declares no statics");
      return Ok(StaticsReport::default());
    };

    let mut report = StaticsReport::default();
    let mut inputs = Vec::new();

    if let Some(dir) = &statics.assets_dir {
      inputs.extend(list_files(&self.resolve(dir))?);
    }
    inputs.extend(statics.files.iter().map(|f| self.resolve(f)));

    for entry in &statics.archives {
      let source = self.resolve(&entry.source);
      let output = self.resolve(&entry.output);
      if !archive::is_fresh(&source, &output)? {
        let summary = archive::archive_directory(&source, &output)?;
        reporter.report(BuildEvent::Generated { artifact: &output });
        report.archives.push(ArchiveStep::Written(summary));
      } else {
        reporter.report(BuildEvent::UpToDate { artifact: &output });
        report.archives.push(ArchiveStep::UpToDate { path: output.clone() });
      }
      inputs.push(output);
    }

    report.headers = header::generate_headers(&self.resolve(&statics.output_dir), &inputs, reporter)?;
    Ok(report)
  }

  /// Compile and link one target.
  ///
  /// # Errors
  ///
  /// [`Error::Target`] carries the state the target stopped in together with
  /// the toolchain error.
  pub fn build(&self, name: Option<&str>, runner: &dyn ProcessRunner, reporter: &dyn Reporter) -> Result<BuildReport> {
    let target = self.target(name)?;
    fsutil::ensure_dirs(&[&target.compile.out_dir])?;

    let mut state = TargetState::Unbuilt;
    let fail = |state: TargetState, source: ToolchainError| Error::Target {
      target: target.name.clone(),
      state,
      source,
    };

    advance(&target.name, &mut state, TargetState::Compiling);
    let no_sources = || {
      ToolchainError::InvalidArgument(format!("no C/C++ sources in {}", target.src_dir.display()))
    };
    if target.compile.sources.is_empty() {
      return Err(fail(TargetState::CompileFailed, no_sources()));
    }
    let objects = match toolchain::compile(&target.compile, runner, reporter) {
      Ok(objects) => objects,
      Err(e) => return Err(fail(TargetState::CompileFailed, e)),
    };
    // Every source was skipped.
    if objects.is_empty() {
      return Err(fail(TargetState::CompileFailed, no_sources()));
    }
    advance(&target.name, &mut state, TargetState::Compiled);

    advance(&target.name, &mut state, TargetState::Linking);
    let output = match toolchain::link(&target.link_request(objects.clone()), runner, reporter) {
      Ok(outcome) => outcome,
      Err(e) => return Err(fail(TargetState::LinkFailed, e)),
    };
    advance(&target.name, &mut state, TargetState::Linked);

    info!(target = %target.name, output = %output.path().display(), "target built");
    Ok(BuildReport {
      target: target.name,
      state,
      objects,
      output,
    })
  }

  /// Remove generated files: target build directories (honouring `keep`
  /// lists from clean rules), the statics directory, archives and any extra
  /// listed files. Returns everything removed.
  pub fn clean(&self, reporter: &dyn Reporter) -> Result<Vec<PathBuf>> {
    let mut dirs: Vec<(PathBuf, Vec<String>)> = self
      .config
      .clean
      .iter()
      .map(|rule| (self.resolve(&rule.dir), rule.keep.clone()))
      .collect();

    let mut extra_dirs: Vec<PathBuf> = self.config.targets.values().map(|t| self.resolve(&t.build_dir)).collect();
    let mut files: Vec<PathBuf> = self.config.clean_files.paths.iter().map(|p| self.resolve(p)).collect();

    if let Some(statics) = &self.config.statics {
      extra_dirs.push(self.resolve(&statics.output_dir));
      files.extend(statics.archives.iter().map(|a| self.resolve(&a.output)));
    }

    for dir in extra_dirs {
      if !dirs.iter().any(|(d, _)| *d == dir) {
        dirs.push((dir, Vec::new()));
      }
    }
    files.sort();
    files.dedup();

    let mut removed = Vec::new();
    for (dir, keep) in &dirs {
      let keep: Vec<&str> = keep.iter().map(String::as_str).collect();
      removed.extend(fsutil::clear_directory(dir, &keep)?);
    }
    removed.extend(fsutil::remove_files(&files)?);

    for path in &removed {
      reporter.report(BuildEvent::Removed { path });
    }
    info!(count = removed.len(), "clean finished");
    Ok(removed)
  }
}

fn advance(target: &str, state: &mut TargetState, next: TargetState) {
  debug!(target, from = %state, to = %next, "target state");
  *state = next;
}

/// Regular files directly inside `dir`, sorted.
fn list_files(dir: &Path) -> std::result::Result<Vec<PathBuf>, FsError> {
  let read_err = |source| FsError::ReadDir {
    path: dir.to_path_buf(),
    source,
  };
  let mut files = Vec::new();
  for entry in fs::read_dir(dir).map_err(read_err)? {
    let entry = entry.map_err(read_err)?;
    if entry.file_type().map_err(read_err)?.is_file() {
      files.push(entry.path());
    }
  }
  files.sort();
  Ok(files)
}
