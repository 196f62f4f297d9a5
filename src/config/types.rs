use crate::error::RecastError;
use crate::rewriter::WriteMode;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Top-level configuration from a `.recast.toml` file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
	/// Built-in preset whose rules run before `rules`.
	#[serde(default)]
	pub preset: Option<String>,

	/// Target files, relative to the directory containing the config file.
	/// Falls back to the preset's file list when absent.
	#[serde(default)]
	pub files: Option<Vec<String>>,

	/// How rewritten content is stored.
	#[serde(default)]
	pub write_mode: WriteMode,

	/// Copy each file to `<file>.bak` before overwriting it.
	#[serde(default)]
	pub backup: bool,

	/// Keep processing remaining files after a read or write failure.
	#[serde(default)]
	pub keep_going: bool,

	/// Rewrite rules, applied in order after any preset rules.
	#[serde(default)]
	pub rules: Vec<Rule>,
}

/// A rewrite rule as written in the config file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Rule {
	/// Human-readable summary of the rule.
	pub description: Option<String>,

	/// Regex to match (mutually exclusive with sed).
	pub pattern: Option<String>,

	/// Replacement text for `pattern`. May reference capture groups unless `literal` is set.
	pub replacement: Option<String>,

	/// Sed-like substitution (mutually exclusive with pattern and replacement).
	/// Format: "s/pattern/replacement/" or "s/pattern/replacement/g" for global.
	pub sed: Option<String>,

	/// Match `pattern` verbatim and insert `replacement` verbatim.
	#[serde(default)]
	pub literal: bool,
}

/// A loaded configuration with its source path for debugging/display.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
	/// The parsed configuration.
	pub config: Config,

	/// The path this config was loaded from.
	pub path: PathBuf,
}

impl LoadedConfig {
	/// Directory that relative target paths resolve against.
	pub fn base_dir(&self) -> &Path {
		match self.path.parent() {
			Some(parent) if !parent.as_os_str().is_empty() => parent,
			_ => Path::new("."),
		}
	}
}

impl Rule {
	/// Validate that exactly one rule form is used and that it is complete.
	pub fn validate(&self) -> Result<(), RecastError> {
		let exclusive = [
			("pattern", "sed", self.pattern.is_some() && self.sed.is_some()),
			(
				"sed",
				"replacement",
				self.sed.is_some() && self.replacement.is_some(),
			),
			("sed", "literal", self.sed.is_some() && self.literal),
		];

		if let Some((option1, option2, _)) = exclusive.iter().find(|(_, _, both)| *both) {
			return Err(RecastError::MutuallyExclusive {
				option1: option1.to_string(),
				option2: option2.to_string(),
			});
		}

		if self.sed.is_some() {
			return Ok(());
		}

		let missing = if self.pattern.is_none() {
			Some("pattern")
		} else if self.replacement.is_none() {
			Some("replacement")
		} else {
			None
		};

		match missing {
			Some(field) => Err(RecastError::MissingField {
				field: field.to_string(),
			}),
			None => Ok(()),
		}
	}
}

impl Config {
	/// Validate the preset name and all rules in this config.
	pub fn validate(&self) -> Result<(), RecastError> {
		if let Some(ref name) = self.preset {
			crate::rules::Preset::from_name(name)?;
		}
		for rule in &self.rules {
			rule.validate()?;
		}
		Ok(())
	}
}
