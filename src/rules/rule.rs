use crate::config::types::Rule;
use crate::error::{RecastError, Result};
use crate::rules::substitution::Substitution;

/// A rewrite rule: a substitution plus a human-readable description.
#[derive(Debug, Clone)]
pub struct RewriteRule {
	/// What the rule does, shown in logs and `config show`.
	pub description: String,

	/// The matcher and its replacement.
	pub substitution: Substitution,
}

/// Result of applying one rule to a buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleOutcome {
	pub text: String,
	pub replacements: usize,
}

/// Result of applying an ordered rule set to a buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transformed {
	/// The buffer after every rule ran.
	pub text: String,

	/// Replacements made by each rule, indexed like the rule set.
	pub hits: Vec<usize>,
}

impl Transformed {
	pub fn total_hits(&self) -> usize {
		self.hits.iter().sum()
	}
}

impl RewriteRule {
	pub fn new(description: impl Into<String>, substitution: Substitution) -> Self {
		RewriteRule {
			description: description.into(),
			substitution,
		}
	}

	/// Compile a rule from its config form.
	pub fn from_config(rule: &Rule) -> Result<Self> {
		rule.validate()?;

		if let Some(ref sed) = rule.sed {
			let substitution = Substitution::parse(sed)?;
			let description = rule.description.clone().unwrap_or_else(|| sed.clone());
			return Ok(RewriteRule::new(description, substitution));
		}

		let (Some(pattern), Some(replacement)) = (&rule.pattern, &rule.replacement) else {
			// validate() guarantees both are present here
			return Err(RecastError::MissingField {
				field: "pattern".to_string(),
			});
		};

		let substitution = if rule.literal {
			Substitution::literal(pattern, replacement.as_str())?
		} else {
			Substitution::new(pattern, replacement.as_str())?
		};
		let description = rule
			.description
			.clone()
			.unwrap_or_else(|| format!("{pattern} -> {replacement}"));

		Ok(RewriteRule::new(description, substitution))
	}

	/// Apply this rule to `text`, counting the replacements made.
	pub fn apply(&self, text: &str) -> RuleOutcome {
		let replacements = self.substitution.count_matches(text);
		let text = if replacements == 0 {
			text.to_string()
		} else {
			self.substitution.apply(text)
		};
		RuleOutcome { text, replacements }
	}
}

/// Compile all rules from config form.
pub fn compile_rules(rules: &[Rule]) -> Result<Vec<RewriteRule>> {
	rules.iter().map(RewriteRule::from_config).collect()
}

/// Apply `rules` in order; each rule sees the output of the rules before it.
pub fn apply_rules(text: &str, rules: &[RewriteRule]) -> Transformed {
	let mut buffer = text.to_string();
	let mut hits = Vec::with_capacity(rules.len());

	for rule in rules {
		let outcome = rule.apply(&buffer);
		if outcome.replacements > 0 {
			tracing::debug!(
				rule = %rule.description,
				replacements = outcome.replacements,
				"rule matched"
			);
		}
		hits.push(outcome.replacements);
		buffer = outcome.text;
	}

	Transformed { text: buffer, hits }
}
