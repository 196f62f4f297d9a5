use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use recast_cli::config::{
	CONFIG_FILE_NAME, LoadedConfig, discover_config, generate_init_template, load_config,
};
use recast_cli::plan::{Overrides, Plan};
use recast_cli::rewriter::{Event, RunReport, describe_error};
use recast_cli::rules::Preset;

#[derive(Parser)]
#[command(name = "recast")]
#[command(
	author,
	version,
	about = "CLI tool for applying ordered regex rewrite rules to a fixed set of source files"
)]
struct Cli {
	#[command(subcommand)]
	command: Option<Commands>,

	/// Use this config file instead of discovering .recast.toml
	#[arg(short, long, value_name = "FILE", global = true)]
	config: Option<PathBuf>,

	/// Built-in rule set to apply (see `recast presets`)
	#[arg(short, long, value_name = "NAME", global = true)]
	preset: Option<String>,

	/// Resolve relative target paths against this directory
	#[arg(long, value_name = "DIR")]
	base_dir: Option<PathBuf>,

	/// Report what would change without writing anything
	#[arg(long)]
	dry_run: bool,

	/// Continue with the remaining files after a read or write failure
	#[arg(long)]
	keep_going: bool,

	/// Write through a temporary file and rename it over the original
	#[arg(long)]
	atomic: bool,

	/// Copy each file to <file>.bak before overwriting it
	#[arg(long)]
	backup: bool,

	/// Increase log verbosity (-v info, -vv debug, -vvv trace)
	#[arg(short, long, action = ArgAction::Count, global = true)]
	verbose: u8,

	/// Create a template .recast.toml in the current directory
	#[arg(long)]
	init: bool,

	/// Overwrite existing .recast.toml when using --init
	#[arg(long, requires = "init")]
	force: bool,

	/// Files to rewrite, replacing the configured list
	files: Vec<String>,
}

#[derive(Subcommand)]
enum Commands {
	/// Configuration management commands
	Config {
		#[command(subcommand)]
		action: ConfigAction,
	},
	/// List the built-in presets
	Presets,
}

#[derive(Subcommand)]
enum ConfigAction {
	/// Display the effective files and rules
	Show,
	/// Check the config file and compile its rules without touching any file
	Validate,
}

fn main() -> ExitCode {
	let cli = Cli::parse();
	init_logging(cli.verbose);

	match run(cli) {
		Ok(code) => code,
		Err(e) => {
			eprintln!("error: {e:?}");
			ExitCode::FAILURE
		}
	}
}

/// Install the stderr log subscriber. `RECAST_LOG` overrides the `-v` level.
fn init_logging(verbose: u8) {
	let default_level = match verbose {
		0 => "warn",
		1 => "info",
		2 => "debug",
		_ => "trace",
	};
	let filter =
		EnvFilter::try_from_env("RECAST_LOG").unwrap_or_else(|_| EnvFilter::new(default_level));

	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.with_ansi(std::io::stderr().is_terminal())
		.with_target(false)
		.without_time()
		.init();
}

fn run(cli: Cli) -> Result<ExitCode> {
	// Handle --init
	if cli.init {
		return handle_init(cli.preset.as_deref(), cli.force);
	}

	// Handle subcommands
	if let Some(ref command) = cli.command {
		return match command {
			Commands::Config { action } => match action {
				ConfigAction::Show => handle_config_show(&cli),
				ConfigAction::Validate => handle_config_validate(&cli),
			},
			Commands::Presets => handle_presets(),
		};
	}

	handle_rewrite(&cli)
}

fn handle_init(preset: Option<&str>, force: bool) -> Result<ExitCode> {
	let config_path = PathBuf::from(CONFIG_FILE_NAME);

	if config_path.exists() && !force {
		anyhow::bail!("{CONFIG_FILE_NAME} already exists. Use --force to overwrite.");
	}

	let preset = match preset {
		Some(name) => Preset::from_name(name)?,
		None => Preset::NextAuthSession,
	};

	let template = generate_init_template(preset);
	std::fs::write(&config_path, template)
		.with_context(|| format!("Failed to write {}", config_path.display()))?;

	println!("Created {CONFIG_FILE_NAME}");
	Ok(ExitCode::SUCCESS)
}

fn handle_presets() -> Result<ExitCode> {
	for preset in Preset::all() {
		println!("{:<20} {}", preset.name(), preset.description());
		println!("{:<20} {} files", "", preset.files().len());
	}
	Ok(ExitCode::SUCCESS)
}

/// Load the config named by --config, or the nearest .recast.toml.
fn load_cli_config(cli: &Cli, cwd: &Path) -> Result<Option<LoadedConfig>> {
	match cli.config {
		Some(ref path) => {
			let loaded = load_config(path)
				.with_context(|| format!("Failed to load configuration: {}", path.display()))?;
			Ok(Some(loaded))
		}
		None => discover_config(cwd).context("Failed to load configuration"),
	}
}

fn overrides(cli: &Cli) -> Overrides {
	Overrides {
		preset: cli.preset.clone(),
		files: cli.files.clone(),
		base_dir: cli.base_dir.clone(),
		dry_run: cli.dry_run,
		keep_going: cli.keep_going,
		atomic: cli.atomic,
		backup: cli.backup,
	}
}

fn handle_config_show(cli: &Cli) -> Result<ExitCode> {
	let cwd = std::env::current_dir().context("Failed to get current directory")?;
	let config = load_cli_config(cli, &cwd)?;

	if config.is_none() && cli.preset.is_none() {
		println!("No configuration files found.");
		return Ok(ExitCode::SUCCESS);
	}

	let plan = Plan::resolve(config.as_ref(), &overrides(cli), &cwd)
		.context("Failed to resolve configuration")?;

	match plan.config_path {
		Some(ref path) => println!("# Source: {}", path.display()),
		None => println!("# Source: (no config file)"),
	}
	if let Some(preset) = plan.preset {
		println!("# preset: {preset}");
	}
	println!("# base-dir: {}", plan.rewriter.base_dir().display());
	println!("# files: {}", plan.files.len());
	for file in &plan.files {
		println!("  {file}");
	}
	println!("# rules: {}", plan.rewriter.rules().len());
	println!();

	for (i, rule) in plan.rewriter.rules().iter().enumerate() {
		let sub = &rule.substitution;
		println!("  Rule {}: {}", i + 1, rule.description);
		println!("    pattern: {}", sub.pattern.as_str());
		println!("    replacement: {:?}", sub.replacement);
		println!("    global: {}", sub.global);
		if sub.literal {
			println!("    literal: true");
		}
		println!();
	}

	Ok(ExitCode::SUCCESS)
}

fn handle_config_validate(cli: &Cli) -> Result<ExitCode> {
	let cwd = std::env::current_dir().context("Failed to get current directory")?;

	let config = match load_cli_config(cli, &cwd) {
		Ok(Some(config)) => config,
		Ok(None) => {
			println!("No configuration files found.");
			return Ok(ExitCode::SUCCESS);
		}
		Err(e) => {
			eprintln!("Configuration error: {e:#}");
			return Ok(ExitCode::FAILURE);
		}
	};

	match Plan::resolve(Some(&config), &overrides(cli), &cwd) {
		Ok(plan) => {
			println!("Configuration is valid:");
			println!(
				"  {} ({} rules, {} files)",
				config.path.display(),
				plan.rewriter.rules().len(),
				plan.files.len()
			);
			Ok(ExitCode::SUCCESS)
		}
		Err(e) => {
			eprintln!(
				"Configuration error: {}: {}",
				config.path.display(),
				describe_error(&e)
			);
			Ok(ExitCode::FAILURE)
		}
	}
}

fn handle_rewrite(cli: &Cli) -> Result<ExitCode> {
	let cwd = std::env::current_dir().context("Failed to get current directory")?;
	let config = load_cli_config(cli, &cwd)?;

	if config.is_none() && cli.preset.is_none() {
		anyhow::bail!(
			"No {CONFIG_FILE_NAME} found and no --preset given. Run `recast --init` or pass --preset <NAME>."
		);
	}

	let plan = Plan::resolve(config.as_ref(), &overrides(cli), &cwd)
		.context("Failed to resolve rewrite plan")?;

	let report = plan.rewriter.run_with(&plan.files, print_event);
	Ok(print_summary(&report, cli.dry_run))
}

fn print_event(event: &Event<'_>) {
	match event {
		Event::Skipped { path } => println!("Skipping {path} (not found)"),
		Event::Fixing { path } => println!("Fixing {path}"),
		Event::Fixed { path, change } => {
			if !change.changed {
				println!("Unchanged {path}");
			} else if !change.written {
				println!("Would fix {path} ({} replacements)", change.total_hits());
			} else {
				println!("Fixed {path}");
			}
		}
		Event::Failed { path, reason } => eprintln!("Failed {path}: {reason}"),
	}
}

fn print_summary(report: &RunReport, dry_run: bool) -> ExitCode {
	println!();

	if report.has_failures() {
		println!(
			"{} fixed, {} skipped, {} failed",
			report.fixed_count(),
			report.skipped_count(),
			report.failed_count()
		);
		if report.aborted {
			eprintln!("Stopped at the first failure; pass --keep-going to process the remaining files.");
		}
		return ExitCode::FAILURE;
	}

	if dry_run {
		println!(
			"Dry run: {} of {} files would change",
			report.changed_count(),
			report.fixed_count()
		);
	} else {
		println!("All files fixed!");
	}
	ExitCode::SUCCESS
}
