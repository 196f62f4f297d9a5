//! Built-in rule sets, each paired with the files it was written for.

use crate::error::{RecastError, Result};
use crate::rules::rule::RewriteRule;
use crate::rules::substitution::Substitution;

const AUTH_ROUTE_FILES: &[&str] = &[
	"src/app/api/admin/error-reports/route.ts",
	"src/app/api/admin/error-reports/[id]/route.ts",
	"src/app/api/admin/product-lines/[id]/route.ts",
	"src/app/api/orders/[id]/bulk-report-error/route.ts",
	"src/app/api/orders/[id]/product-lines/route.ts",
	"src/app/api/orders/[id]/report-error/route.ts",
	"src/app/api/product-lines/[id]/toggle-error/route.ts",
];

const PARAM_ROUTE_FILES: &[&str] = &[
	"src/app/api/admin/error-reports/[id]/route.ts",
	"src/app/api/admin/product-lines/[id]/route.ts",
	"src/app/api/orders/[id]/bulk-report-error/route.ts",
	"src/app/api/orders/[id]/product-lines/route.ts",
	"src/app/api/orders/[id]/report-error/route.ts",
	"src/app/api/product-lines/[id]/toggle-error/route.ts",
];

const ADMIN_PAGE_FILES: &[&str] = &[
	"src/app/admin/products/page.tsx",
	"src/app/admin/orders/page.tsx",
	"src/app/admin/topups/page.tsx",
	"src/app/admin/users/page.tsx",
	"src/app/admin/wallets/page.tsx",
	"src/app/admin/settings/page.tsx",
	"src/app/admin/website-settings/page.tsx",
];

const ROUTE_METHODS: &[&str] = &["GET", "POST", "PATCH", "DELETE"];

/// A named, built-in rule set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
	/// Move API routes from `next-auth` sessions to the custom JWT session helper.
	NextAuthSession,
	/// Make dynamic route handlers await their `params` promise.
	NextRouteParams,
	/// Let `AppShell` render the admin sidebar instead of each admin page.
	AdminShell,
}

impl Preset {
	pub fn all() -> &'static [Preset] {
		&[
			Preset::NextAuthSession,
			Preset::NextRouteParams,
			Preset::AdminShell,
		]
	}

	pub fn name(self) -> &'static str {
		match self {
			Preset::NextAuthSession => "next-auth-session",
			Preset::NextRouteParams => "next-route-params",
			Preset::AdminShell => "admin-shell",
		}
	}

	pub fn description(self) -> &'static str {
		match self {
			Preset::NextAuthSession => "Replace next-auth getServerSession with the custom getSession",
			Preset::NextRouteParams => "Await Promise-typed route params in [id] route handlers",
			Preset::AdminShell => "Drop per-page AdminSidebar in favour of <AppShell isAdmin>",
		}
	}

	/// Look up a preset by its name.
	pub fn from_name(name: &str) -> Result<Self> {
		Preset::all()
			.iter()
			.copied()
			.find(|preset| preset.name() == name)
			.ok_or_else(|| RecastError::UnknownPreset {
				name: name.to_string(),
			})
	}

	/// Files the preset targets, relative to the project root.
	pub fn files(self) -> Vec<String> {
		let files = match self {
			Preset::NextAuthSession => AUTH_ROUTE_FILES,
			Preset::NextRouteParams => PARAM_ROUTE_FILES,
			Preset::AdminShell => ADMIN_PAGE_FILES,
		};
		files.iter().map(|f| f.to_string()).collect()
	}

	/// The preset's rules, in application order.
	pub fn rules(self) -> Result<Vec<RewriteRule>> {
		match self {
			Preset::NextAuthSession => next_auth_session_rules(),
			Preset::NextRouteParams => next_route_params_rules(),
			Preset::AdminShell => admin_shell_rules(),
		}
	}
}

impl std::fmt::Display for Preset {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.name())
	}
}

fn next_auth_session_rules() -> Result<Vec<RewriteRule>> {
	Ok(vec![
		RewriteRule::new(
			"comment out the next-auth getServerSession import",
			Substitution::literal(
				"import { getServerSession } from 'next-auth';",
				"// Auth using custom JWT session",
			)?,
		),
		RewriteRule::new(
			"import getSession instead of authOptions",
			Substitution::literal(
				"import { authOptions } from '@/lib/auth';",
				"import { getSession } from '@/lib/auth';",
			)?,
		),
		RewriteRule::new(
			"call getSession() instead of getServerSession(authOptions)",
			Substitution::literal(
				"const session = await getServerSession(authOptions);",
				"const session = await getSession();",
			)?,
		),
	])
}

fn next_route_params_rules() -> Result<Vec<RewriteRule>> {
	let mut rules = Vec::with_capacity(ROUTE_METHODS.len() + 1);

	for method in ROUTE_METHODS {
		let pattern = format!(
			r"export async function {method}\(\s*request: NextRequest,\s*\{{ params \}}: \{{ params: \{{ id: string \}} \}}\s*\)"
		);
		let replacement = format!(
			"export async function {method}(\n  request: NextRequest,\n  {{ params }}: {{ params: Promise<{{ id: string }}> }}\n)"
		);
		rules.push(RewriteRule::new(
			format!("type {method} handler params as a Promise"),
			Substitution::new(&pattern, replacement)?,
		));
	}

	rules.push(RewriteRule::new(
		"await params before destructuring",
		Substitution::literal("const { id } = params;", "const { id } = await params;")?,
	));

	Ok(rules)
}

fn admin_shell_rules() -> Result<Vec<RewriteRule>> {
	Ok(vec![
		RewriteRule::new(
			"remove the AdminSidebar import",
			Substitution::literal(
				"import { AdminSidebar } from '@/components/layout/admin-sidebar';\n",
				"",
			)?
			.first_only(),
		),
		RewriteRule::new(
			"render AppShell in admin mode",
			Substitution::literal("<AppShell>", "<AppShell isAdmin>")?,
		),
		RewriteRule::new(
			"remove <AdminSidebar /> elements",
			Substitution::new(r"<AdminSidebar />\n\s*", "")?,
		),
	])
}
