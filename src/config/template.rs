use crate::rules::Preset;

/// Generate the `.recast.toml` written by `recast --init`.
pub fn generate_init_template(preset: Preset) -> String {
	let files = preset
		.files()
		.iter()
		.map(|file| format!("    \"{file}\",\n"))
		.collect::<String>();

	format!(
		r#"# recast configuration
#
# Target paths are relative to the directory containing this file.

# Built-in rules that run before [[rules]]: {presets}
preset = "{preset}"

files = [
{files}]

# "in-place" truncates and rewrites each file; "atomic" writes a temp file and renames it.
write-mode = "in-place"

# Copy each file to <file>.bak before overwriting it.
backup = false

# Keep going after a file fails to read or write.
keep-going = false

# Extra rules, applied in order after the preset's rules.
#
# [[rules]]
# description = "await route params"
# pattern = 'const \{{ id \}} = params;'
# replacement = "const {{ id }} = await params;"
#
# [[rules]]
# sed = "s#@/lib/auth#@/lib/session#g"
"#,
		presets = Preset::all()
			.iter()
			.map(|p| p.name())
			.collect::<Vec<_>>()
			.join(", "),
	)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::config::parse_config_str;
	use std::path::Path;

	#[test]
	fn test_template_parses() {
		for preset in Preset::all() {
			let template = generate_init_template(*preset);
			let config = parse_config_str(&template, Path::new(".recast.toml")).unwrap();

			assert_eq!(config.preset.as_deref(), Some(preset.name()));
			assert_eq!(config.files, Some(preset.files()));
			assert!(config.rules.is_empty());
		}
	}
}
