use crate::error::{RecastError, Result};
use regex::{NoExpand, Regex};
use std::borrow::Cow;

/// A matcher plus the text that replaces each match.
#[derive(Debug, Clone)]
pub struct Substitution {
	/// The pattern to match.
	pub pattern: Regex,

	/// The replacement string. May reference capture groups (`$1`, `${name}`)
	/// unless the substitution is literal.
	pub replacement: String,

	/// Whether to replace all occurrences (global flag).
	pub global: bool,

	/// Whether the replacement is inserted verbatim, without `$` expansion.
	pub literal: bool,
}

impl Substitution {
	/// Build a global regex substitution.
	pub fn new(pattern: &str, replacement: impl Into<String>) -> Result<Self> {
		Ok(Substitution {
			pattern: compile_regex(pattern)?,
			replacement: replacement.into(),
			global: true,
			literal: false,
		})
	}

	/// Build a global substitution that matches `text` exactly and inserts
	/// `replacement` exactly.
	pub fn literal(text: &str, replacement: impl Into<String>) -> Result<Self> {
		Ok(Substitution {
			pattern: compile_regex(&regex::escape(text))?,
			replacement: replacement.into(),
			global: true,
			literal: true,
		})
	}

	/// Restrict this substitution to the first match only.
	pub fn first_only(mut self) -> Self {
		self.global = false;
		self
	}

	/// Parse a substitution string in sed-like format: "s/pattern/replacement/" or "s/pattern/replacement/g"
	pub fn parse(input: &str) -> Result<Self> {
		let invalid = |reason: &str| RecastError::InvalidSubstitution {
			input: input.to_string(),
			reason: reason.to_string(),
		};

		let mut chars = input.chars();
		if chars.next() != Some('s') {
			return Err(invalid("substitution must start with 's'"));
		}

		// Get the delimiter (character after 's')
		let delimiter = chars.next().ok_or_else(|| invalid("substitution too short"))?;
		let body = chars.as_str();

		let parts = split_by_delimiter(body, delimiter);
		if parts.len() < 3 {
			return Err(invalid(&format!(
				"expected s{delimiter}pattern{delimiter}replacement{delimiter}"
			)));
		}
		if parts.len() > 3 {
			return Err(invalid("unescaped delimiter in pattern or replacement"));
		}

		let flags = &parts[2];
		if let Some(flag) = flags.chars().find(|c| *c != 'g') {
			return Err(invalid(&format!("unsupported flag '{flag}'")));
		}

		Ok(Substitution {
			pattern: compile_regex(&parts[0])?,
			replacement: parts[1].clone(),
			global: flags.contains('g'),
			literal: false,
		})
	}

	/// Apply this substitution to a string.
	pub fn apply(&self, input: &str) -> String {
		self.replace(input).into_owned()
	}

	/// Number of replacements `apply` would make on `input`.
	pub fn count_matches(&self, input: &str) -> usize {
		if self.global {
			self.pattern.find_iter(input).count()
		} else {
			usize::from(self.pattern.is_match(input))
		}
	}

	fn replace<'h>(&self, input: &'h str) -> Cow<'h, str> {
		let limit = if self.global { 0 } else { 1 };
		if self.literal {
			self.pattern
				.replacen(input, limit, NoExpand(self.replacement.as_str()))
		} else {
			self.pattern
				.replacen(input, limit, self.replacement.as_str())
		}
	}
}

/// Compile a regex pattern string.
pub(crate) fn compile_regex(pattern: &str) -> Result<Regex> {
	Regex::new(pattern).map_err(|source| RecastError::InvalidRegex {
		pattern: pattern.to_string(),
		source,
	})
}

/// Split a string by a delimiter, respecting backslash escapes.
///
/// `\\` is always a pair. An escaped delimiter becomes a literal match in the
/// pattern (part 0) and the bare character in the replacement (part 1).
fn split_by_delimiter(input: &str, delimiter: char) -> Vec<String> {
	let mut parts: Vec<String> = Vec::new();
	let mut current = String::new();
	let mut chars = input.chars();

	while let Some(c) = chars.next() {
		if c == delimiter {
			parts.push(std::mem::take(&mut current));
			continue;
		}
		if c != '\\' {
			current.push(c);
			continue;
		}

		let in_pattern = parts.is_empty();
		match chars.next() {
			Some(next) if next == delimiter => {
				if in_pattern {
					current.push_str(&regex::escape(&next.to_string()));
				} else {
					current.push(next);
				}
			}
			Some('\\') if !in_pattern => current.push('\\'),
			Some(next) => {
				current.push('\\');
				current.push(next);
			}
			None => current.push('\\'),
		}
	}

	parts.push(current);
	parts
}
