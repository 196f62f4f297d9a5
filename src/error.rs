use std::path::PathBuf;

/// Library-level structured errors for recast.
///
/// Use `thiserror` for structured errors that library consumers can match on.
/// The CLI binary wraps these with `anyhow` for rich context chains.
#[derive(Debug, thiserror::Error)]
pub enum RecastError {
	#[error("Config file not found: {path}")]
	ConfigNotFound { path: PathBuf },

	#[error("Failed to read config file: {path}")]
	ConfigReadError {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("Failed to parse config file: {path}")]
	ConfigParseError {
		path: PathBuf,
		#[source]
		source: toml::de::Error,
	},

	#[error("Invalid regex pattern in rule: {pattern}")]
	InvalidRegex {
		pattern: String,
		#[source]
		source: regex::Error,
	},

	#[error("Invalid substitution `{input}`: {reason}")]
	InvalidSubstitution { input: String, reason: String },

	#[error("Mutually exclusive options: {option1} and {option2}")]
	MutuallyExclusive { option1: String, option2: String },

	#[error("Rule is missing required field: {field}")]
	MissingField { field: String },

	#[error("Unknown preset: {name}")]
	UnknownPreset { name: String },

	#[error("No rewrite rules configured")]
	NoRules,

	#[error("Failed to read {path}")]
	ReadFailure {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("Failed to write {path}")]
	WriteFailure {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("Failed to back up {path}")]
	BackupFailure {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},
}

/// Result type alias using RecastError.
pub type Result<T> = std::result::Result<T, RecastError>;
