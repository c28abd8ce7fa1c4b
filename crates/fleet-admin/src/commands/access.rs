//! `access` subcommands

use anyhow::{bail, Result};
use fleet_access::MenuItem;
use fleet_shared::Role;
use tracing::info;

use crate::cli::AccessCommand;
use crate::context::AppContext;

pub fn run(ctx: &AppContext, command: AccessCommand) -> Result<String> {
    match command {
        AccessCommand::Check { role, path } => Ok(check(ctx, &role, &path)),
        AccessCommand::Menu { role } => Ok(menu(ctx, &role)),
        AccessCommand::Keys => Ok(ctx.resolver.menu().permission_keys().join("\n")),
        AccessCommand::Show => show(ctx),
        AccessCommand::Grant { role, key } => set(ctx, role, &key, true),
        AccessCommand::Revoke { role, key } => set(ctx, role, &key, false),
        AccessCommand::Seed { role } => seed(ctx, role),
        AccessCommand::Reset { role, all } => reset(ctx, role, all),
    }
}

fn check(ctx: &AppContext, role: &Role, path: &str) -> String {
    let allowed = ctx.resolver.is_path_allowed(path, role);
    let source = match ctx.resolver.menu().find_most_specific(path) {
        Some(entry) => format!(" (menu item '{}')", entry.permission_key()),
        None => " (no menu item)".to_string(),
    };
    format!(
        "{} {} for {}{}",
        if allowed { "ALLOW" } else { "DENY" },
        path,
        role,
        source
    )
}

fn menu(ctx: &AppContext, role: &Role) -> String {
    let mut lines = Vec::new();
    render_tree(&ctx.resolver.visible_menu(role), 0, &mut lines);
    lines.join("\n")
}

fn render_tree(items: &[MenuItem], depth: usize, lines: &mut Vec<String>) {
    for item in items {
        let indent = "  ".repeat(depth);
        match &item.url {
            Some(url) => lines.push(format!("{}{} ({})", indent, item.title, url)),
            None => lines.push(format!("{}{}", indent, item.title)),
        }
        render_tree(&item.children, depth + 1, lines);
    }
}

fn show(ctx: &AppContext) -> Result<String> {
    match ctx.permissions.load() {
        Some(overrides) => Ok(serde_json::to_string_pretty(overrides.as_ref())?),
        None => Ok("No permission overrides stored; static roles apply.".to_string()),
    }
}

fn set(ctx: &AppContext, role: Role, key: &str, allowed: bool) -> Result<String> {
    let keys = ctx.resolver.menu().permission_keys();
    if !keys.iter().any(|k| k == key) {
        bail!("Unknown permission key '{}'; see `access keys`", key);
    }

    ctx.permissions
        .update(|overrides| overrides.set(role.clone(), key, allowed))?;
    info!("Permission '{}' for {} set to {}", key, role, allowed);
    Ok(format!(
        "{} '{}' for {}",
        if allowed { "Granted" } else { "Revoked" },
        key,
        role
    ))
}

fn seed(ctx: &AppContext, role: Role) -> Result<String> {
    let menu = ctx.resolver.menu();
    let overrides = ctx
        .permissions
        .update(|overrides| overrides.seed_from_static(menu, &role))?;
    let allowed = overrides
        .entries(&role)
        .map(|entries| entries.values().filter(|v| **v).count())
        .unwrap_or_default();
    Ok(format!(
        "Seeded {} keys for {} ({} allowed)",
        menu.permission_keys().len(),
        role,
        allowed
    ))
}

fn reset(ctx: &AppContext, role: Option<Role>, all: bool) -> Result<String> {
    if all {
        ctx.permissions.clear()?;
        return Ok("Cleared all permission overrides".to_string());
    }
    let Some(role) = role else {
        bail!("Either --role or --all is required");
    };

    let mut had_entries = false;
    ctx.permissions
        .update(|overrides| had_entries = overrides.clear_role(&role))?;
    Ok(if had_entries {
        format!("Reset {} to static roles", role)
    } else {
        format!("{} had no overrides", role)
    })
}
