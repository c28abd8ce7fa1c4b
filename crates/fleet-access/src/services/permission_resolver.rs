// ============================================================================
// Fleet Access - Permission Resolver
// File: crates/fleet-access/src/services/permission_resolver.rs
// Description: Decides which menu items and routes a role may reach
// ============================================================================
//! Two-tier policy: once a role has any entry in the override map, that map
//! is an allow-list for the role; otherwise the menu's static
//! `allowed_roles` decide. Routes that no menu item covers are not gated.

use std::sync::Arc;

use fleet_shared::constants::{ADMIN_ROOT_PATH, ADMIN_SETTINGS_PATH};
use fleet_shared::Role;
use tracing::debug;

use super::permission_store::PermissionStore;
use crate::domain::{permission_key, MenuItem, MenuTree, PermissionOverrides};

pub struct PermissionResolver {
    menu: Arc<MenuTree>,
    permissions: Arc<PermissionStore>,
}

impl PermissionResolver {
    pub fn new(menu: Arc<MenuTree>, permissions: Arc<PermissionStore>) -> Self {
        Self { menu, permissions }
    }

    pub fn menu(&self) -> &MenuTree {
        &self.menu
    }

    /// Override-map answer for one item.
    ///
    /// `None` means the role has no override data and the caller must fall
    /// back to the item's static `allowed_roles`.
    pub fn is_menu_item_allowed(
        &self,
        role: &Role,
        item_title: &str,
        parent_title: Option<&str>,
    ) -> Option<bool> {
        let overrides = self.permissions.load()?;
        overrides.is_allowed(role, &permission_key(item_title, parent_title))
    }

    pub fn is_path_allowed(&self, path: &str, role: &Role) -> bool {
        // Administrators can always reach the dashboard and the settings
        // screen, whatever the override map says.
        if role.is_admin() && (path == ADMIN_ROOT_PATH || path == ADMIN_SETTINGS_PATH) {
            return true;
        }

        let Some(entry) = self.menu.find_most_specific(path) else {
            debug!("No menu item covers {}, allowing", path);
            return true;
        };

        let allowed = match self.is_menu_item_allowed(role, &entry.item.title, entry.parent_title) {
            Some(allowed) => allowed,
            None => entry.item.allows_statically(role),
        };

        debug!(
            "Path {} resolved to '{}' for role {}: {}",
            path,
            entry.permission_key(),
            role,
            if allowed { "allowed" } else { "denied" }
        );
        allowed
    }

    /// Combined rule for a single menu item: override map when the role has
    /// one, static `allowed_roles` otherwise.
    pub fn is_item_visible(&self, role: &Role, item: &MenuItem, parent_title: Option<&str>) -> bool {
        let overrides = self.permissions.load();
        item_visible(overrides.as_deref(), role, item, parent_title)
    }

    /// The navigation tree pruned to what `role` may see.
    ///
    /// A group without its own `url` disappears when none of its children
    /// survive.
    pub fn visible_menu(&self, role: &Role) -> Vec<MenuItem> {
        let overrides = self.permissions.load();
        prune(self.menu.items(), None, overrides.as_deref(), role)
    }
}

fn item_visible(
    overrides: Option<&PermissionOverrides>,
    role: &Role,
    item: &MenuItem,
    parent_title: Option<&str>,
) -> bool {
    overrides
        .and_then(|o| o.is_allowed(role, &permission_key(&item.title, parent_title)))
        .unwrap_or_else(|| item.allows_statically(role))
}

fn prune(
    items: &[MenuItem],
    parent_title: Option<&str>,
    overrides: Option<&PermissionOverrides>,
    role: &Role,
) -> Vec<MenuItem> {
    items
        .iter()
        .filter(|item| item_visible(overrides, role, item, parent_title))
        .filter_map(|item| {
            let children = prune(&item.children, Some(item.title.as_str()), overrides, role);
            if item.url.is_none() && !item.children.is_empty() && children.is_empty() {
                return None;
            }
            Some(MenuItem {
                children,
                ..item.clone()
            })
        })
        .collect()
}
