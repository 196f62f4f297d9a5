//! Recast - CLI tool for applying ordered regex rewrite rules to a fixed set of source files.
//!
//! This library provides the core functionality for recast, including:
//! - Regex, literal, and sed-like substitution rules with built-in presets
//! - Configuration file parsing and discovery
//! - The rewriter, which loads, transforms, and stores each listed file and
//!   reports a per-file outcome
//!
//! # Example
//!
//! ```no_run
//! use recast_cli::rewriter::{Outcome, Rewriter};
//! use recast_cli::rules::Preset;
//!
//! let rules = Preset::NextAuthSession.rules().unwrap();
//! let rewriter = Rewriter::new(".", rules);
//! let report = rewriter.run(&Preset::NextAuthSession.files());
//!
//! for file in &report.files {
//!     if let Outcome::Failed(reason) = &file.outcome {
//!         eprintln!("{}: {}", file.path, reason);
//!     }
//! }
//! ```

pub mod config;
pub mod error;
pub mod plan;
pub mod rewriter;
pub mod rules;

pub use error::{RecastError, Result};
