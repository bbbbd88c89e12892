//! `littlebuild.toml` project files.
//!
//! The project file declares the project identity, the static assets to
//! embed, one table per build target and the clean rules. Relative paths are
//! resolved against the directory holding the project file.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::{CONFIG_ENV_VAR, DEFAULT_CONFIG_FILE};

#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("project file not found: {0}")]
  NotFound(PathBuf),

  #[error("failed to read {path}: {source}")]
  Read {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("failed to parse {path}: {source}")]
  Parse {
    path: PathBuf,
    #[source]
    source: toml::de::Error,
  },

  #[error("unknown target '{name}' (available: {available})")]
  UnknownTarget { name: String, available: String },

  #[error("project declares no targets")]
  NoTargets,

  #[error("invalid project version '{0}': expected dot-separated digits")]
  InvalidVersion(String),
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ProjectConfig {
  pub project: ProjectInfo,
  #[serde(default)]
  pub statics: Option<StaticsConfig>,
  #[serde(default)]
  pub targets: BTreeMap<String, TargetConfig>,
  #[serde(default)]
  pub clean: Vec<CleanRule>,
  #[serde(default)]
  pub clean_files: CleanFiles,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ProjectInfo {
  pub title: String,
  pub version: String,
  #[serde(default)]
  pub default_target: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StaticsConfig {
  pub output_dir: PathBuf,
  /// Every file directly inside becomes a header.
  #[serde(default)]
  pub assets_dir: Option<PathBuf>,
  #[serde(default)]
  pub files: Vec<PathBuf>,
  #[serde(default)]
  pub archives: Vec<ArchiveConfig>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ArchiveConfig {
  pub source: PathBuf,
  pub output: PathBuf,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TargetConfig {
  pub compiler: String,
  #[serde(default)]
  pub flags: Vec<String>,
  pub src_dir: PathBuf,
  pub build_dir: PathBuf,
  #[serde(default)]
  pub includes: Vec<PathBuf>,
  #[serde(default)]
  pub lib_dirs: Vec<String>,
  #[serde(default)]
  pub libs: Vec<String>,
  #[serde(default)]
  pub ld_flags: Vec<String>,
  /// Linked output name, defaults to the project title.
  #[serde(default)]
  pub output: Option<String>,
  #[serde(default)]
  pub macros: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CleanRule {
  pub dir: PathBuf,
  #[serde(default)]
  pub keep: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CleanFiles {
  #[serde(default)]
  pub paths: Vec<PathBuf>,
}

impl ProjectConfig {
  pub fn parse(text: &str, path: &Path) -> Result<Self, ConfigError> {
    let config: ProjectConfig = toml::from_str(text).map_err(|source| ConfigError::Parse {
      path: path.to_path_buf(),
      source,
    })?;
    config.version_number()?;
    Ok(config)
  }

  pub fn load(path: &Path) -> Result<Self, ConfigError> {
    let text = fs::read_to_string(path).map_err(|source| {
      if source.kind() == io::ErrorKind::NotFound {
        ConfigError::NotFound(path.to_path_buf())
      } else {
        ConfigError::Read {
          path: path.to_path_buf(),
          source,
        }
      }
    })?;
    Self::parse(&text, path)
  }

  /// `1.0.0` becomes `100`: the version digits concatenated.
  pub fn version_number(&self) -> Result<u64, ConfigError> {
    let version = &self.project.version;
    let invalid = || ConfigError::InvalidVersion(version.clone());

    if version.is_empty() || version.split('.').any(|part| part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()))
    {
      return Err(invalid());
    }
    version.replace('.', "").parse().map_err(|_| invalid())
  }

  /// Macros every target gets: `PROJECT_TITLE` as a C string literal and
  /// `PROJECT_VERSION` as an integer.
  pub fn project_macros(&self) -> Result<BTreeMap<String, String>, ConfigError> {
    let mut macros = BTreeMap::new();
    macros.insert("PROJECT_TITLE".to_string(), c_string_literal(&self.project.title));
    macros.insert("PROJECT_VERSION".to_string(), self.version_number()?.to_string());
    Ok(macros)
  }

  /// Resolve a target by name, falling back to `default_target` and then the
  /// first declared target.
  pub fn target(&self, name: Option<&str>) -> Result<(&str, &TargetConfig), ConfigError> {
    let wanted = name.or(self.project.default_target.as_deref());

    match wanted {
      Some(name) => self
        .targets
        .get_key_value(name)
        .map(|(k, v)| (k.as_str(), v))
        .ok_or_else(|| ConfigError::UnknownTarget {
          name: name.to_string(),
          available: self.targets.keys().cloned().collect::<Vec<_>>().join(", "),
        }),
      None => self
        .targets
        .iter()
        .next()
        .map(|(k, v)| (k.as_str(), v))
        .ok_or(ConfigError::NoTargets),
    }
  }
}

/// Quote `text` as a C string literal, escaping `\` and `"`.
fn c_string_literal(text: &str) -> String {
  let mut literal = String::with_capacity(text.len() + 2);
  literal.push('"');
  for c in text.chars() {
    if matches!(c, '"' | '\\') {
      literal.push('\\');
    }
    literal.push(c);
  }
  literal.push('"');
  literal
}

/// Locate the project file: an explicit path, else `$LITTLEBUILD_CONFIG`,
/// else `littlebuild.toml` in the working directory.
pub fn locate(explicit: Option<&Path>) -> PathBuf {
  if let Some(path) = explicit {
    return path.to_path_buf();
  }
  match std::env::var_os(CONFIG_ENV_VAR) {
    Some(path) if !path.is_empty() => PathBuf::from(path),
    _ => PathBuf::from(DEFAULT_CONFIG_FILE),
  }
}
