//! Configuration loading and parsing for recast.
//!
//! This module handles:
//! - TOML config file parsing and validation
//! - Discovery of the nearest `.recast.toml`
//! - The `--init` template

pub mod discover;
pub mod parser;
pub mod template;
pub mod types;

pub use discover::{CONFIG_FILE_NAME, discover_config, find_config, load_config};
pub use parser::{parse_config_file, parse_config_str};
pub use template::generate_init_template;
pub use types::{Config, LoadedConfig, Rule};
