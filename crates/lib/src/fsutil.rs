//! Directory helpers for build output trees.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum FsError {
  #[error("not a directory: {0}")]
  NotADirectory(PathBuf),

  #[error("failed to create directory {path}: {source}")]
  CreateDir {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("failed to read directory {path}: {source}")]
  ReadDir {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("failed to remove {path}: {source}")]
  Remove {
    path: PathBuf,
    #[source]
    source: io::Error,
  },
}

/// Create each directory (and missing parents) if absent.
pub fn ensure_dirs<P: AsRef<Path>>(paths: &[P]) -> Result<(), FsError> {
  for path in paths {
    let path = path.as_ref();
    if path.exists() && !path.is_dir() {
      return Err(FsError::NotADirectory(path.to_path_buf()));
    }
    fs::create_dir_all(path).map_err(|source| FsError::CreateDir {
      path: path.to_path_buf(),
      source,
    })?;
  }
  Ok(())
}

/// Remove every file directly inside `path` whose name is not in `excluded`.
///
/// Subdirectories are left untouched. A missing `path` is a no-op. Returns the
/// removed paths, sorted.
pub fn clear_directory(path: &Path, excluded: &[&str]) -> Result<Vec<PathBuf>, FsError> {
  if !path.exists() {
    return Ok(Vec::new());
  }
  if !path.is_dir() {
    return Err(FsError::NotADirectory(path.to_path_buf()));
  }

  let read_err = |source| FsError::ReadDir {
    path: path.to_path_buf(),
    source,
  };

  let mut doomed = Vec::new();
  for entry in fs::read_dir(path).map_err(read_err)? {
    let entry = entry.map_err(read_err)?;
    let file_type = entry.file_type().map_err(read_err)?;
    if file_type.is_dir() {
      continue;
    }
    let name = entry.file_name();
    if name.to_str().is_some_and(|n| excluded.contains(&n)) {
      continue;
    }
    doomed.push(entry.path());
  }
  doomed.sort();

  for file in &doomed {
    fs::remove_file(file).map_err(|source| FsError::Remove {
      path: file.clone(),
      source,
    })?;
    debug!(path = %file.display(), "removed");
  }

  Ok(doomed)
}

/// Remove each listed file if present. Returns the paths actually removed.
pub fn remove_files<P: AsRef<Path>>(paths: &[P]) -> Result<Vec<PathBuf>, FsError> {
  let mut removed = Vec::new();
  for path in paths {
    let path = path.as_ref();
    match fs::remove_file(path) {
      Ok(()) => removed.push(path.to_path_buf()),
      Err(e) if e.kind() == io::ErrorKind::NotFound => {}
      Err(source) => {
        return Err(FsError::Remove {
          path: path.to_path_buf(),
          source,
        });
      }
    }
  }
  Ok(removed)
}
