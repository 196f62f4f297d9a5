//! The rewriter: loads each listed file, applies the rule set, and stores the result.
//!
//! Files are processed strictly one after another. There is no transaction
//! across files: a failure part way through leaves earlier files rewritten.

pub mod report;
pub mod store;

pub use report::{FileChange, FileReport, Outcome, RunReport, describe_error};
pub use store::WriteMode;

use crate::error::Result;
use crate::rules::{RewriteRule, apply_rules};
use std::path::{Path, PathBuf};

/// What to do after a file fails to read or write.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailurePolicy {
	/// Stop at the first failure; later paths are not processed.
	#[default]
	Abort,

	/// Record the failure and continue with the next path.
	Continue,
}

/// Progress notifications emitted while a run is in flight.
#[derive(Debug)]
pub enum Event<'a> {
	Skipped { path: &'a str },
	Fixing { path: &'a str },
	Fixed { path: &'a str, change: &'a FileChange },
	Failed { path: &'a str, reason: &'a str },
}

/// Applies an ordered rule set to an ordered list of files.
#[derive(Debug)]
pub struct Rewriter {
	base_dir: PathBuf,
	rules: Vec<RewriteRule>,
	write_mode: WriteMode,
	backup: bool,
	dry_run: bool,
	failure_policy: FailurePolicy,
}

impl Rewriter {
	/// Create a rewriter that resolves relative paths against `base_dir`.
	pub fn new(base_dir: impl Into<PathBuf>, rules: Vec<RewriteRule>) -> Self {
		Rewriter {
			base_dir: base_dir.into(),
			rules,
			write_mode: WriteMode::default(),
			backup: false,
			dry_run: false,
			failure_policy: FailurePolicy::default(),
		}
	}

	pub fn write_mode(mut self, write_mode: WriteMode) -> Self {
		self.write_mode = write_mode;
		self
	}

	pub fn backup(mut self, backup: bool) -> Self {
		self.backup = backup;
		self
	}

	pub fn dry_run(mut self, dry_run: bool) -> Self {
		self.dry_run = dry_run;
		self
	}

	pub fn failure_policy(mut self, failure_policy: FailurePolicy) -> Self {
		self.failure_policy = failure_policy;
		self
	}

	pub fn rules(&self) -> &[RewriteRule] {
		&self.rules
	}

	pub fn base_dir(&self) -> &Path {
		&self.base_dir
	}

	/// Resolve a listed path against the base directory. Absolute paths are kept as-is.
	pub fn resolve(&self, path: &str) -> PathBuf {
		self.base_dir.join(path)
	}

	/// Process every path in order and report what happened to each.
	pub fn run<S: AsRef<str>>(&self, paths: &[S]) -> RunReport {
		self.run_with(paths, |_| {})
	}

	/// Like [`Rewriter::run`], calling `on_event` as each path progresses.
	pub fn run_with<S, F>(&self, paths: &[S], mut on_event: F) -> RunReport
	where
		S: AsRef<str>,
		F: FnMut(&Event<'_>),
	{
		let mut report = RunReport::new(self.rules.len());
		tracing::info!(
			files = paths.len(),
			rules = self.rules.len(),
			base_dir = %self.base_dir.display(),
			dry_run = self.dry_run,
			"starting rewrite"
		);

		for path in paths {
			let path = path.as_ref();
			let full_path = self.resolve(path);

			if !full_path.is_file() {
				tracing::debug!(path = %full_path.display(), "not found");
				on_event(&Event::Skipped { path });
				report.files.push(FileReport {
					path: path.to_string(),
					outcome: Outcome::SkippedNotFound,
				});
				continue;
			}

			on_event(&Event::Fixing { path });

			match self.rewrite_file(&full_path) {
				Ok(change) => {
					if change.total_hits() == 0 {
						tracing::warn!(path, "no rule matched; the target list may be stale");
					}
					on_event(&Event::Fixed {
						path,
						change: &change,
					});
					report.files.push(FileReport {
						path: path.to_string(),
						outcome: Outcome::Fixed(change),
					});
				}
				Err(err) => {
					let reason = describe_error(&err);
					tracing::error!(path, %reason, "rewrite failed");
					on_event(&Event::Failed {
						path,
						reason: &reason,
					});
					report.files.push(FileReport {
						path: path.to_string(),
						outcome: Outcome::Failed(reason),
					});

					if self.failure_policy == FailurePolicy::Abort {
						report.aborted = true;
						break;
					}
				}
			}
		}

		for index in report.unmatched_rules() {
			tracing::warn!(
				rule = %self.rules[index].description,
				"rule matched in none of the processed files"
			);
		}

		report
	}

	/// Load, transform, and store a single file.
	pub fn rewrite_file(&self, full_path: &Path) -> Result<FileChange> {
		let original = store::load(full_path)?;
		let transformed = apply_rules(&original, &self.rules);
		let changed = transformed.text != original;

		if self.dry_run {
			return Ok(FileChange {
				hits: transformed.hits,
				changed,
				written: false,
			});
		}

		if self.backup {
			let backup_path = store::backup(full_path)?;
			tracing::debug!(backup = %backup_path.display(), "backed up");
		}

		store::store(full_path, &transformed.text, self.write_mode)?;

		Ok(FileChange {
			hits: transformed.hits,
			changed,
			written: true,
		})
	}
}
