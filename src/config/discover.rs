use crate::config::parser::parse_config_file;
use crate::config::types::LoadedConfig;
use crate::error::Result;
use std::path::{Path, PathBuf};

/// Name of the config file looked up in each directory.
pub const CONFIG_FILE_NAME: &str = ".recast.toml";

/// Find the nearest config file, starting at `start_dir` and walking up.
pub fn find_config(start_dir: &Path) -> Option<PathBuf> {
	start_dir
		.ancestors()
		.map(|dir| dir.join(CONFIG_FILE_NAME))
		.find(|candidate| candidate.is_file())
}

/// Load the config file at `path`.
pub fn load_config(path: &Path) -> Result<LoadedConfig> {
	let config = parse_config_file(path)?;
	tracing::debug!(path = %path.display(), rules = config.rules.len(), "loaded config");
	Ok(LoadedConfig {
		config,
		path: path.to_path_buf(),
	})
}

/// Discover and load the nearest config file, if there is one.
pub fn discover_config(start_dir: &Path) -> Result<Option<LoadedConfig>> {
	find_config(start_dir).map(|path| load_config(&path)).transpose()
}
