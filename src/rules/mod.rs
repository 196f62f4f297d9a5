//! Rewrite rules for recast.
//!
//! This module handles:
//! - Regex and literal substitutions, including sed-like `s/pattern/replacement/g` parsing
//! - Ordered application of a rule set to a text buffer
//! - Built-in presets

pub mod preset;
pub mod rule;
pub mod substitution;

pub use preset::Preset;
pub use rule::{RewriteRule, RuleOutcome, Transformed, apply_rules, compile_rules};
pub use substitution::Substitution;
