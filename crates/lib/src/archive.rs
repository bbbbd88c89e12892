//! Zip packaging of asset directories.
//!
//! Archives are reproducible: entries are written in sorted order with a fixed
//! timestamp and fixed permissions, so an unchanged tree always produces the
//! same bytes.

use std::fs::{self, File};
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};

use serde::Serialize;
use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::{debug, info};
use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, DateTime, ZipArchive, ZipWriter};

use crate::stale;

#[derive(Debug, Error)]
pub enum ArchiveError {
  #[error("source directory not found: {0}")]
  NotFound(PathBuf),

  #[error("not a directory: {0}")]
  NotADirectory(PathBuf),

  #[error("failed to write archive {path}: {source}")]
  Write {
    path: PathBuf,
    #[source]
    source: zip::result::ZipError,
  },

  #[error("filesystem error at {path}: {source}")]
  Io {
    path: PathBuf,
    #[source]
    source: io::Error,
  },
}

#[derive(Debug, Clone, Serialize)]
pub struct ArchiveSummary {
  pub path: PathBuf,
  /// Number of file entries written (directories not counted).
  pub files: usize,
  pub bytes: u64,
}

/// Zip the contents of `source_dir` into `archive_path`.
///
/// Entry names are relative to `source_dir`. If `archive_path` lives inside
/// `source_dir` it is left out of its own archive.
pub fn archive_directory(source_dir: &Path, archive_path: &Path) -> Result<ArchiveSummary, ArchiveError> {
  check_source(source_dir)?;

  let parent = match archive_path.parent() {
    Some(p) if !p.as_os_str().is_empty() => p,
    _ => Path::new("."),
  };
  fs::create_dir_all(parent).map_err(|source| ArchiveError::Io {
    path: parent.to_path_buf(),
    source,
  })?;

  let entries = walk(source_dir, archive_path)?;

  // Deleted on drop unless persisted.
  let staged = NamedTempFile::new_in(parent).map_err(|source| ArchiveError::Io {
    path: parent.to_path_buf(),
    source,
  })?;
  let zip_err = |source| ArchiveError::Write {
    path: archive_path.to_path_buf(),
    source,
  };

  let mut writer = ZipWriter::new(BufWriter::new(staged));
  let mut files = 0;

  for entry in &entries {
    let name = entry_name(&entry.relative);
    if entry.is_dir {
      writer.add_directory(format!("{}/", name), entry_options(0o755)).map_err(zip_err)?;
      continue;
    }

    writer.start_file(name, entry_options(0o644)).map_err(zip_err)?;
    let mut input = File::open(&entry.absolute).map_err(|source| ArchiveError::Io {
      path: entry.absolute.clone(),
      source,
    })?;
    io::copy(&mut input, &mut writer).map_err(|source| ArchiveError::Io {
      path: entry.absolute.clone(),
      source,
    })?;
    files += 1;
  }

  let staged = writer
    .finish()
    .map_err(zip_err)?
    .into_inner()
    .map_err(|e| ArchiveError::Io {
      path: archive_path.to_path_buf(),
      source: e.into_error(),
    })?;
  staged.persist(archive_path).map_err(|e| ArchiveError::Io {
    path: archive_path.to_path_buf(),
    source: e.error,
  })?;

  let bytes = fs::metadata(archive_path).map(|m| m.len()).unwrap_or(0);
  info!(archive = %archive_path.display(), files, bytes, "archive written");

  Ok(ArchiveSummary {
    path: archive_path.to_path_buf(),
    files,
    bytes,
  })
}

/// Files `archive_directory` would pack, sorted, excluding `archive_path`.
pub fn collect_files(source_dir: &Path, archive_path: &Path) -> Result<Vec<PathBuf>, ArchiveError> {
  check_source(source_dir)?;
  Ok(
    walk(source_dir, archive_path)?
      .into_iter()
      .filter(|e| !e.is_dir)
      .map(|e| e.absolute)
      .collect(),
  )
}

/// True when `archive_path` holds exactly the entries `source_dir` would
/// produce now and no file under `source_dir` is newer than the archive.
///
/// Comparing entry names catches deletions and renames, which leave every
/// remaining mtime untouched. A missing or unreadable archive is not fresh.
pub fn is_fresh(source_dir: &Path, archive_path: &Path) -> Result<bool, ArchiveError> {
  check_source(source_dir)?;
  let entries = walk(source_dir, archive_path)?;

  let Some(mut archived) = archived_names(archive_path) else {
    return Ok(false);
  };
  let mut expected: Vec<String> = entries
    .iter()
    .map(|e| {
      let name = entry_name(&e.relative);
      if e.is_dir { format!("{}/", name) } else { name }
    })
    .collect();
  archived.sort();
  expected.sort();
  if archived != expected {
    debug!(archive = %archive_path.display(), "archive entries differ from source tree");
    return Ok(false);
  }

  let files: Vec<&Path> = entries.iter().filter(|e| !e.is_dir).map(|e| e.absolute.as_path()).collect();
  if files.is_empty() {
    return Ok(true);
  }
  Ok(!stale::needs_rebuild(&files, archive_path).unwrap_or(true))
}

fn archived_names(archive_path: &Path) -> Option<Vec<String>> {
  let file = File::open(archive_path).ok()?;
  match ZipArchive::new(file) {
    Ok(zip) => Some(zip.file_names().map(str::to_string).collect()),
    Err(e) => {
      debug!(archive = %archive_path.display(), error = %e, "unreadable archive");
      None
    }
  }
}

struct Entry {
  absolute: PathBuf,
  relative: PathBuf,
  is_dir: bool,
}

fn check_source(source_dir: &Path) -> Result<(), ArchiveError> {
  if !source_dir.exists() {
    return Err(ArchiveError::NotFound(source_dir.to_path_buf()));
  }
  if !source_dir.is_dir() {
    return Err(ArchiveError::NotADirectory(source_dir.to_path_buf()));
  }
  Ok(())
}

fn walk(source_dir: &Path, archive_path: &Path) -> Result<Vec<Entry>, ArchiveError> {
  let mut entries = Vec::new();

  for entry in WalkDir::new(source_dir).min_depth(1).sort_by_file_name() {
    let entry = entry.map_err(|e| ArchiveError::Io {
      path: e.path().unwrap_or(source_dir).to_path_buf(),
      source: e.into(),
    })?;
    let absolute = entry.path().to_path_buf();

    if same_file(archive_path, &absolute) {
      debug!(path = %absolute.display(), "skipping archive inside its own source");
      continue;
    }

    let file_type = entry.file_type();
    if !file_type.is_file() && !file_type.is_dir() {
      continue;
    }

    let relative = absolute.strip_prefix(source_dir).unwrap_or(&absolute).to_path_buf();
    entries.push(Entry {
      absolute,
      relative,
      is_dir: file_type.is_dir(),
    });
  }

  Ok(entries)
}

fn same_file(a: &Path, b: &Path) -> bool {
  if a == b {
    return true;
  }
  match (fs::canonicalize(a), fs::canonicalize(b)) {
    (Ok(a), Ok(b)) => a == b,
    _ => false,
  }
}

fn entry_options(mode: u32) -> SimpleFileOptions {
  SimpleFileOptions::default()
    .compression_method(CompressionMethod::Deflated)
    .last_modified_time(DateTime::default())
    .unix_permissions(mode)
}

/// Zip entry names always use `/`, whatever the host separator.
fn entry_name(relative: &Path) -> String {
  relative
    .components()
    .map(|c| c.as_os_str().to_string_lossy())
    .collect::<Vec<_>>()
    .join("/")
}
