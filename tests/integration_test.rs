#![allow(deprecated)] // assert_cmd::Command::cargo_bin is deprecated but replacement requires nightly

use predicates::prelude::*;
use std::fs;
use std::path::Path;

fn recast_cmd() -> assert_cmd::Command {
	let mut cmd = assert_cmd::Command::cargo_bin("recast").unwrap();
	cmd.env_remove("RECAST_LOG");
	cmd
}

const AUTH_ROUTE: &str = "\
import { NextRequest, NextResponse } from 'next/server';
import { getServerSession } from 'next-auth';
import { authOptions } from '@/lib/auth';

export async function GET(request: NextRequest) {
  const session = await getServerSession(authOptions);
  return NextResponse.json({ ok: !!session });
}
";

const AUTH_ROUTE_FIXED: &str = "\
import { NextRequest, NextResponse } from 'next/server';
// Auth using custom JWT session
import { getSession } from '@/lib/auth';

export async function GET(request: NextRequest) {
  const session = await getSession();
  return NextResponse.json({ ok: !!session });
}
";

fn write_file(root: &Path, path: &str, content: &str) {
	let full = root.join(path);
	fs::create_dir_all(full.parent().unwrap()).unwrap();
	fs::write(full, content).unwrap();
}

fn read_file(root: &Path, path: &str) -> String {
	fs::read_to_string(root.join(path)).unwrap()
}

// ============================================================================
// CLI flag tests
// ============================================================================

#[test]
fn test_help_flag() {
	recast_cmd()
		.arg("--help")
		.assert()
		.success()
		.stdout(predicate::str::contains("rewrite rules"));
}

#[test]
fn test_version_flag() {
	recast_cmd()
		.arg("--version")
		.assert()
		.success()
		.stdout(predicate::str::contains("recast"));
}

#[test]
fn test_no_config_no_preset_fails() {
	let temp_dir = tempfile::tempdir().unwrap();

	recast_cmd()
		.current_dir(temp_dir.path())
		.assert()
		.failure()
		.stderr(predicate::str::contains("no --preset given"));
}

#[test]
fn test_presets_lists_all() {
	recast_cmd()
		.arg("presets")
		.assert()
		.success()
		.stdout(predicate::str::contains("next-auth-session"))
		.stdout(predicate::str::contains("next-route-params"))
		.stdout(predicate::str::contains("admin-shell"));
}

#[test]
fn test_unknown_preset_fails() {
	let temp_dir = tempfile::tempdir().unwrap();

	recast_cmd()
		.args(["--preset", "nope"])
		.current_dir(temp_dir.path())
		.assert()
		.failure()
		.stderr(predicate::str::contains("Unknown preset: nope"));
}

// ============================================================================
// --init tests
// ============================================================================

#[test]
fn test_init_creates_config() {
	let temp_dir = tempfile::tempdir().unwrap();
	let config_path = temp_dir.path().join(".recast.toml");

	recast_cmd()
		.arg("--init")
		.current_dir(temp_dir.path())
		.assert()
		.success()
		.stdout(predicate::str::contains("Created .recast.toml"));

	let content = fs::read_to_string(&config_path).unwrap();
	assert!(content.contains("preset = \"next-auth-session\""));
	assert!(content.contains("src/app/api/orders/[id]/report-error/route.ts"));
}

#[test]
fn test_init_with_preset() {
	let temp_dir = tempfile::tempdir().unwrap();

	recast_cmd()
		.args(["--init", "--preset", "admin-shell"])
		.current_dir(temp_dir.path())
		.assert()
		.success();

	let content = read_file(temp_dir.path(), ".recast.toml");
	assert!(content.contains("preset = \"admin-shell\""));
	assert!(content.contains("src/app/admin/wallets/page.tsx"));
}

#[test]
fn test_init_fails_if_exists() {
	let temp_dir = tempfile::tempdir().unwrap();
	write_file(temp_dir.path(), ".recast.toml", "# existing");

	recast_cmd()
		.arg("--init")
		.current_dir(temp_dir.path())
		.assert()
		.failure()
		.stderr(predicate::str::contains("already exists"));
}

#[test]
fn test_init_force_overwrites() {
	let temp_dir = tempfile::tempdir().unwrap();
	write_file(temp_dir.path(), ".recast.toml", "# existing");

	recast_cmd()
		.args(["--init", "--force"])
		.current_dir(temp_dir.path())
		.assert()
		.success();

	let content = read_file(temp_dir.path(), ".recast.toml");
	assert!(content.contains("[[rules]]"));
}

// ============================================================================
// config subcommand tests
// ============================================================================

#[test]
fn test_config_validate_no_config() {
	let temp_dir = tempfile::tempdir().unwrap();

	recast_cmd()
		.args(["config", "validate"])
		.current_dir(temp_dir.path())
		.assert()
		.success()
		.stdout(predicate::str::contains("No configuration files found"));
}

#[test]
fn test_config_validate_valid_config() {
	let temp_dir = tempfile::tempdir().unwrap();
	write_file(
		temp_dir.path(),
		".recast.toml",
		r#"
files = ["a.ts"]

[[rules]]
pattern = "foo"
replacement = "bar"
"#,
	);

	recast_cmd()
		.args(["config", "validate"])
		.current_dir(temp_dir.path())
		.assert()
		.success()
		.stdout(predicate::str::contains("valid"))
		.stdout(predicate::str::contains("1 rules, 1 files"));
}

#[test]
fn test_config_validate_invalid_toml() {
	let temp_dir = tempfile::tempdir().unwrap();
	write_file(temp_dir.path(), ".recast.toml", "invalid toml [[[");

	recast_cmd()
		.args(["config", "validate"])
		.current_dir(temp_dir.path())
		.assert()
		.failure()
		.stderr(predicate::str::contains("Configuration error"));
}

#[test]
fn test_config_validate_invalid_regex() {
	let temp_dir = tempfile::tempdir().unwrap();
	write_file(
		temp_dir.path(),
		".recast.toml",
		r#"
[[rules]]
pattern = "[unclosed"
replacement = "x"
"#,
	);

	recast_cmd()
		.args(["config", "validate"])
		.current_dir(temp_dir.path())
		.assert()
		.failure()
		.stderr(predicate::str::contains("Invalid regex pattern in rule: [unclosed"));
}

#[test]
fn test_config_show_displays_rules() {
	let temp_dir = tempfile::tempdir().unwrap();
	write_file(
		temp_dir.path(),
		".recast.toml",
		r#"
preset = "next-auth-session"
files = ["route.ts"]

[[rules]]
description = "await params"
sed = "s/= params;/= await params;/g"
"#,
	);

	recast_cmd()
		.args(["config", "show"])
		.current_dir(temp_dir.path())
		.assert()
		.success()
		.stdout(predicate::str::contains("# preset: next-auth-session"))
		.stdout(predicate::str::contains("# rules: 4"))
		.stdout(predicate::str::contains("Rule 4: await params"))
		.stdout(predicate::str::contains("route.ts"));
}

// ============================================================================
// Rewrite tests
// ============================================================================

#[test]
fn test_preset_rewrites_files_in_cwd() {
	let temp_dir = tempfile::tempdir().unwrap();
	let route = "src/app/api/admin/error-reports/route.ts";
	write_file(temp_dir.path(), route, AUTH_ROUTE);

	recast_cmd()
		.args(["--preset", "next-auth-session"])
		.current_dir(temp_dir.path())
		.assert()
		.success()
		.stdout(predicate::str::contains(format!("Fixing {route}")))
		.stdout(predicate::str::contains(format!("Fixed {route}")))
		.stdout(predicate::str::contains(
			"Skipping src/app/api/admin/error-reports/[id]/route.ts (not found)",
		))
		.stdout(predicate::str::contains("All files fixed!"));

	assert_eq!(read_file(temp_dir.path(), route), AUTH_ROUTE_FIXED);
}

#[test]
fn test_second_run_is_a_noop() {
	let temp_dir = tempfile::tempdir().unwrap();
	write_file(temp_dir.path(), "route.ts", AUTH_ROUTE);

	for _ in 0..2 {
		recast_cmd()
			.args(["--preset", "next-auth-session", "route.ts"])
			.current_dir(temp_dir.path())
			.assert()
			.success();
	}

	assert_eq!(read_file(temp_dir.path(), "route.ts"), AUTH_ROUTE_FIXED);

	recast_cmd()
		.args(["--preset", "next-auth-session", "route.ts"])
		.current_dir(temp_dir.path())
		.assert()
		.success()
		.stdout(predicate::str::contains("Unchanged route.ts"))
		.stderr(predicate::str::contains("no rule matched"));
}

#[test]
fn test_unlisted_files_untouched() {
	let temp_dir = tempfile::tempdir().unwrap();
	write_file(temp_dir.path(), "listed.ts", AUTH_ROUTE);
	write_file(temp_dir.path(), "other.ts", AUTH_ROUTE);

	recast_cmd()
		.args(["--preset", "next-auth-session", "listed.ts"])
		.current_dir(temp_dir.path())
		.assert()
		.success();

	assert_eq!(read_file(temp_dir.path(), "listed.ts"), AUTH_ROUTE_FIXED);
	assert_eq!(read_file(temp_dir.path(), "other.ts"), AUTH_ROUTE);
}

#[test]
fn test_config_paths_resolve_against_config_dir() {
	let temp_dir = tempfile::tempdir().unwrap();
	write_file(
		temp_dir.path(),
		".recast.toml",
		r#"
files = ["web/route.ts", "web/missing.ts"]

[[rules]]
pattern = 'const \{ id \} = params;'
replacement = "const { id } = await params;"
"#,
	);
	write_file(temp_dir.path(), "web/route.ts", "const { id } = params;\n");
	let nested = temp_dir.path().join("web");

	recast_cmd()
		.current_dir(&nested)
		.assert()
		.success()
		.stdout(predicate::str::contains("Skipping web/missing.ts (not found)"))
		.stdout(predicate::str::contains("Fixed web/route.ts"));

	assert_eq!(
		read_file(temp_dir.path(), "web/route.ts"),
		"const { id } = await params;\n"
	);
}

#[test]
fn test_explicit_config_flag() {
	let temp_dir = tempfile::tempdir().unwrap();
	write_file(
		temp_dir.path(),
		"rules/auth.toml",
		r#"
preset = "next-auth-session"
files = ["route.ts"]
"#,
	);
	write_file(temp_dir.path(), "rules/route.ts", AUTH_ROUTE);

	recast_cmd()
		.args(["--config", "rules/auth.toml"])
		.current_dir(temp_dir.path())
		.assert()
		.success();

	assert_eq!(read_file(temp_dir.path(), "rules/route.ts"), AUTH_ROUTE_FIXED);
}

#[test]
fn test_dry_run_writes_nothing() {
	let temp_dir = tempfile::tempdir().unwrap();
	write_file(temp_dir.path(), "route.ts", AUTH_ROUTE);

	recast_cmd()
		.args(["--preset", "next-auth-session", "--dry-run", "route.ts"])
		.current_dir(temp_dir.path())
		.assert()
		.success()
		.stdout(predicate::str::contains("Would fix route.ts (3 replacements)"))
		.stdout(predicate::str::contains("Dry run: 1 of 1 files would change"));

	assert_eq!(read_file(temp_dir.path(), "route.ts"), AUTH_ROUTE);
}

#[test]
fn test_backup_and_atomic() {
	let temp_dir = tempfile::tempdir().unwrap();
	write_file(temp_dir.path(), "route.ts", AUTH_ROUTE);

	recast_cmd()
		.args([
			"--preset",
			"next-auth-session",
			"--backup",
			"--atomic",
			"route.ts",
		])
		.current_dir(temp_dir.path())
		.assert()
		.success();

	assert_eq!(read_file(temp_dir.path(), "route.ts"), AUTH_ROUTE_FIXED);
	assert_eq!(read_file(temp_dir.path(), "route.ts.bak"), AUTH_ROUTE);
}

#[test]
fn test_read_failure_aborts_run() {
	let temp_dir = tempfile::tempdir().unwrap();
	fs::write(temp_dir.path().join("bad.ts"), [0xff, 0xfe, 0xfd]).unwrap();
	write_file(temp_dir.path(), "good.ts", AUTH_ROUTE);

	recast_cmd()
		.args(["--preset", "next-auth-session", "bad.ts", "good.ts"])
		.current_dir(temp_dir.path())
		.assert()
		.code(1)
		.stderr(predicate::str::contains("Failed bad.ts"))
		.stderr(predicate::str::contains("--keep-going"))
		.stdout(predicate::str::contains("Fixing good.ts").not());

	assert_eq!(read_file(temp_dir.path(), "good.ts"), AUTH_ROUTE);
}

#[test]
fn test_read_failure_with_keep_going() {
	let temp_dir = tempfile::tempdir().unwrap();
	fs::write(temp_dir.path().join("bad.ts"), [0xff, 0xfe, 0xfd]).unwrap();
	write_file(temp_dir.path(), "good.ts", AUTH_ROUTE);

	recast_cmd()
		.args([
			"--preset",
			"next-auth-session",
			"--keep-going",
			"bad.ts",
			"good.ts",
		])
		.current_dir(temp_dir.path())
		.assert()
		.code(1)
		.stdout(predicate::str::contains("1 fixed, 0 skipped, 1 failed"));

	assert_eq!(read_file(temp_dir.path(), "good.ts"), AUTH_ROUTE_FIXED);
}

#[test]
fn test_store_failure_aborts_run() {
	let temp_dir = tempfile::tempdir().unwrap();
	write_file(temp_dir.path(), "a.ts", AUTH_ROUTE);
	write_file(temp_dir.path(), "b.ts", AUTH_ROUTE);
	// A directory in the backup slot makes storing a.ts fail
	fs::create_dir(temp_dir.path().join("a.ts.bak")).unwrap();

	recast_cmd()
		.args(["--preset", "next-auth-session", "--backup", "a.ts", "b.ts"])
		.current_dir(temp_dir.path())
		.assert()
		.code(1)
		.stderr(predicate::str::contains("Failed a.ts: Failed to back up"))
		.stdout(predicate::str::contains("0 fixed, 0 skipped, 1 failed"))
		.stdout(predicate::str::contains("Fixing b.ts").not());

	assert_eq!(read_file(temp_dir.path(), "a.ts"), AUTH_ROUTE);
	assert_eq!(read_file(temp_dir.path(), "b.ts"), AUTH_ROUTE);
}

#[test]
fn test_store_failure_with_keep_going() {
	let temp_dir = tempfile::tempdir().unwrap();
	write_file(temp_dir.path(), "a.ts", AUTH_ROUTE);
	write_file(temp_dir.path(), "b.ts", AUTH_ROUTE);
	fs::create_dir(temp_dir.path().join("a.ts.bak")).unwrap();

	recast_cmd()
		.args([
			"--preset",
			"next-auth-session",
			"--backup",
			"--keep-going",
			"a.ts",
			"b.ts",
		])
		.current_dir(temp_dir.path())
		.assert()
		.code(1)
		.stdout(predicate::str::contains("Fixed b.ts"))
		.stdout(predicate::str::contains("1 fixed, 0 skipped, 1 failed"));

	assert_eq!(read_file(temp_dir.path(), "a.ts"), AUTH_ROUTE);
	assert_eq!(read_file(temp_dir.path(), "b.ts"), AUTH_ROUTE_FIXED);
}

#[test]
fn test_route_params_preset() {
	let temp_dir = tempfile::tempdir().unwrap();
	let route = "src/app/api/orders/[id]/report-error/route.ts";
	write_file(
		temp_dir.path(),
		route,
		"export async function POST(\n  request: NextRequest,\n  { params }: { params: { id: string } }\n) {\n  const { id } = params;\n}\n",
	);

	recast_cmd()
		.args(["--preset", "next-route-params"])
		.current_dir(temp_dir.path())
		.assert()
		.success();

	assert_eq!(
		read_file(temp_dir.path(), route),
		"export async function POST(\n  request: NextRequest,\n  { params }: { params: Promise<{ id: string }> }\n) {\n  const { id } = await params;\n}\n"
	);
}
