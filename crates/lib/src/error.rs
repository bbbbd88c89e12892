//! Crate-level error returned by the build orchestrator.

use thiserror::Error;

use crate::archive::ArchiveError;
use crate::config::ConfigError;
use crate::fsutil::FsError;
use crate::header::HeaderError;
use crate::pipeline::TargetState;
use crate::stale::StaleError;
use crate::toolchain::ToolchainError;

#[derive(Debug, Error)]
pub enum Error {
  #[error(transparent)]
  Config(#[from] ConfigError),

  #[error(transparent)]
  Fs(#[from] FsError),

  #[error(transparent)]
  Archive(#[from] ArchiveError),

  #[error(transparent)]
  Header(#[from] HeaderError),

  #[error(transparent)]
  Stale(#[from] StaleError),

  /// A target stopped in a failure state.
  #[error("target '{target}' {state}: {source}")]
  Target {
    target: String,
    state: TargetState,
    #[source]
    source: ToolchainError,
  },
}

pub type Result<T> = std::result::Result<T, Error>;
