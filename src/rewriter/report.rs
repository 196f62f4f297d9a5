//! Per-file outcomes and the run report.

use std::error::Error;

/// What happened to one file that was rewritten (or would have been, in a dry run).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileChange {
	/// Replacements made by each rule, indexed like the rule set.
	pub hits: Vec<usize>,

	/// Whether the content differs from what was read.
	pub changed: bool,

	/// Whether the content was written back to disk.
	pub written: bool,
}

impl FileChange {
	pub fn total_hits(&self) -> usize {
		self.hits.iter().sum()
	}
}

/// Result of processing one listed path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
	/// The path is not an existing file.
	SkippedNotFound,

	/// The file was loaded, transformed, and stored.
	Fixed(FileChange),

	/// Reading, backing up, or writing the file failed.
	Failed(String),
}

/// Outcome for one path, in the order the paths were given.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileReport {
	pub path: String,
	pub outcome: Outcome,
}

/// Report for a whole run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
	/// Processed paths. When the run aborted, paths after the failure are absent.
	pub files: Vec<FileReport>,

	/// Whether the run stopped early on a failure.
	pub aborted: bool,

	pub(crate) rule_count: usize,
}

impl RunReport {
	pub(crate) fn new(rule_count: usize) -> Self {
		RunReport {
			rule_count,
			..Default::default()
		}
	}

	pub fn fixed_count(&self) -> usize {
		self.changes().count()
	}

	pub fn changed_count(&self) -> usize {
		self.changes().filter(|change| change.changed).count()
	}

	pub fn skipped_count(&self) -> usize {
		self.files
			.iter()
			.filter(|file| file.outcome == Outcome::SkippedNotFound)
			.count()
	}

	pub fn failed_count(&self) -> usize {
		self.files
			.iter()
			.filter(|file| matches!(file.outcome, Outcome::Failed(_)))
			.count()
	}

	pub fn has_failures(&self) -> bool {
		self.failed_count() > 0
	}

	/// Indices of rules that made no replacement in any processed file.
	///
	/// Empty when no file was processed at all.
	pub fn unmatched_rules(&self) -> Vec<usize> {
		let mut totals = vec![0usize; self.rule_count];
		let mut processed = false;

		for change in self.changes() {
			processed = true;
			for (total, hits) in totals.iter_mut().zip(&change.hits) {
				*total += hits;
			}
		}

		if !processed {
			return Vec::new();
		}

		totals
			.iter()
			.enumerate()
			.filter(|(_, total)| **total == 0)
			.map(|(index, _)| index)
			.collect()
	}

	fn changes(&self) -> impl Iterator<Item = &FileChange> {
		self.files.iter().filter_map(|file| match &file.outcome {
			Outcome::Fixed(change) => Some(change),
			_ => None,
		})
	}
}

/// Render an error with its source chain on one line.
pub fn describe_error(err: &dyn Error) -> String {
	let mut message = err.to_string();
	let mut source = err.source();
	while let Some(cause) = source {
		message.push_str(": ");
		message.push_str(&cause.to_string());
		source = cause.source();
	}
	message
}
