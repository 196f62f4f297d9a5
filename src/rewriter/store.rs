//! Loading and storing target files.

use crate::error::{RecastError, Result};
use serde::Deserialize;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// How a rewritten buffer is written back to its file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WriteMode {
	/// Truncate the file and write the new content into it.
	#[default]
	InPlace,

	/// Write to a temporary file in the same directory, sync it, and rename it
	/// over the original. A crash leaves either the old or the new content.
	Atomic,
}

/// Read the whole file as UTF-8 text.
pub fn load(path: &Path) -> Result<String> {
	fs::read_to_string(path).map_err(|source| RecastError::ReadFailure {
		path: path.to_path_buf(),
		source,
	})
}

/// Replace the file's content with `content`.
pub fn store(path: &Path, content: &str, mode: WriteMode) -> Result<()> {
	let written = match mode {
		WriteMode::InPlace => fs::write(path, content),
		WriteMode::Atomic => write_atomic(path, content),
	};

	written.map_err(|source| RecastError::WriteFailure {
		path: path.to_path_buf(),
		source,
	})
}

/// Copy the file to `<path>.bak`, overwriting any previous backup.
pub fn backup(path: &Path) -> Result<PathBuf> {
	let target = backup_path(path);
	fs::copy(path, &target).map_err(|source| RecastError::BackupFailure {
		path: path.to_path_buf(),
		source,
	})?;
	Ok(target)
}

/// Path of the backup copy for `path`.
pub fn backup_path(path: &Path) -> PathBuf {
	let mut name = path.as_os_str().to_owned();
	name.push(".bak");
	PathBuf::from(name)
}

fn write_atomic(path: &Path, content: &str) -> std::io::Result<()> {
	// Rename onto the link target, not over the link itself
	let is_symlink = fs::symlink_metadata(path).is_ok_and(|m| m.file_type().is_symlink());
	let target = if is_symlink {
		fs::canonicalize(path)?
	} else {
		path.to_path_buf()
	};
	let path = target.as_path();

	let dir = match path.parent() {
		Some(parent) if !parent.as_os_str().is_empty() => parent,
		_ => Path::new("."),
	};

	let mut temp = tempfile::NamedTempFile::new_in(dir)?;
	temp.write_all(content.as_bytes())?;
	temp.as_file().sync_all()?;

	// Keep the original file's mode
	if let Ok(metadata) = fs::metadata(path) {
		temp.as_file().set_permissions(metadata.permissions())?;
	}

	temp.persist(path).map_err(|e| e.error)?;
	Ok(())
}
