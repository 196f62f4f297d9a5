//! Combine the config file, a preset, and command-line overrides into one run.

use crate::config::LoadedConfig;
use crate::error::{RecastError, Result};
use crate::rewriter::{FailurePolicy, Rewriter, WriteMode};
use crate::rules::{Preset, compile_rules};
use std::path::{Path, PathBuf};

/// Settings given on the command line. They take precedence over the config file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
	/// Preset name, replacing the config's `preset`.
	pub preset: Option<String>,

	/// Target files, relative to the working directory.
	pub files: Vec<String>,

	/// Directory that relative target paths resolve against.
	pub base_dir: Option<PathBuf>,

	pub dry_run: bool,
	pub keep_going: bool,
	pub atomic: bool,
	pub backup: bool,
}

/// A fully resolved run: the rewriter plus the files it should process.
#[derive(Debug)]
pub struct Plan {
	pub rewriter: Rewriter,
	pub files: Vec<String>,
	pub preset: Option<Preset>,
	pub config_path: Option<PathBuf>,
}

impl Plan {
	/// Resolve the run.
	///
	/// Rules are the preset's rules followed by the config's rules. Files come
	/// from the command line, then the config, then the preset. Relative paths
	/// resolve against `--base-dir`, else the working directory for files given
	/// on the command line, else the config file's directory.
	pub fn resolve(
		config: Option<&LoadedConfig>,
		overrides: &Overrides,
		cwd: &Path,
	) -> Result<Self> {
		let preset_name = overrides
			.preset
			.as_deref()
			.or_else(|| config.and_then(|c| c.config.preset.as_deref()));
		let preset = preset_name.map(Preset::from_name).transpose()?;

		let mut rules = match preset {
			Some(preset) => preset.rules()?,
			None => Vec::new(),
		};
		if let Some(loaded) = config {
			rules.extend(compile_rules(&loaded.config.rules)?);
		}
		if rules.is_empty() {
			return Err(RecastError::NoRules);
		}

		let (files, default_base) = if !overrides.files.is_empty() {
			(overrides.files.clone(), cwd.to_path_buf())
		} else {
			let base = config.map_or_else(
				|| cwd.to_path_buf(),
				|c| c.base_dir().to_path_buf(),
			);
			let files = config
				.and_then(|c| c.config.files.clone())
				.or_else(|| preset.map(Preset::files))
				.unwrap_or_default();
			(files, base)
		};
		let base_dir = overrides.base_dir.clone().unwrap_or(default_base);

		let write_mode = if overrides.atomic {
			WriteMode::Atomic
		} else {
			config.map(|c| c.config.write_mode).unwrap_or_default()
		};
		let backup = overrides.backup || config.is_some_and(|c| c.config.backup);
		let keep_going = overrides.keep_going || config.is_some_and(|c| c.config.keep_going);
		let failure_policy = if keep_going {
			FailurePolicy::Continue
		} else {
			FailurePolicy::Abort
		};

		let rewriter = Rewriter::new(base_dir, rules)
			.write_mode(write_mode)
			.backup(backup)
			.dry_run(overrides.dry_run)
			.failure_policy(failure_policy);

		Ok(Plan {
			rewriter,
			files,
			preset,
			config_path: config.map(|c| c.path.clone()),
		})
	}
}
