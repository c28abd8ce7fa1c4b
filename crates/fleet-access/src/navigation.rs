//! Built-in navigation tree of the fleet admin console.

use std::path::Path;

use tracing::info;

use crate::domain::{MenuItem, MenuTree};
use crate::error::AccessError;

const ADMIN: &str = "admin";
const DISPATCHER: &str = "dispatcher";
const FINANCE: &str = "finance";
const SUPPORT: &str = "support";

/// The menu shipped with the console.
pub fn default_menu() -> Result<MenuTree, AccessError> {
    MenuTree::new(vec![
        MenuItem::new("Dashboard").with_url("/admin"),
        MenuItem::new("Fleet")
            .with_child(
                MenuItem::new("Drivers")
                    .with_url("/admin/drivers")
                    .with_roles([ADMIN, DISPATCHER]),
            )
            .with_child(
                MenuItem::new("Vehicles")
                    .with_url("/admin/vehicles")
                    .with_roles([ADMIN, DISPATCHER]),
            )
            .with_child(
                MenuItem::new("Manage Vehicles")
                    .with_url("/admin/vehicles/manage")
                    .with_roles([ADMIN]),
            )
            .with_child(
                MenuItem::new("Devices")
                    .with_url("/admin/devices")
                    .with_roles([ADMIN]),
            ),
        MenuItem::new("Pricing")
            .with_roles([ADMIN, FINANCE])
            .with_child(
                MenuItem::new("Fare Schemes")
                    .with_url("/admin/fare-schemes")
                    .with_roles([ADMIN, FINANCE]),
            )
            .with_child(
                MenuItem::new("Promo Codes")
                    .with_url("/admin/promo-codes")
                    .with_roles([ADMIN, FINANCE]),
            ),
        MenuItem::new("Corporate Accounts")
            .with_url("/admin/corporate-accounts")
            .with_roles([ADMIN, FINANCE]),
        MenuItem::new("SMS")
            .with_url("/admin/sms")
            .with_roles([ADMIN, DISPATCHER, SUPPORT]),
        MenuItem::new("Reports")
            .with_roles([ADMIN, DISPATCHER, FINANCE])
            .with_child(report("Bookings by Status", "/admin/reports/bookings"))
            .with_child(report("Driver Activity", "/admin/reports/driver-activity"))
            .with_child(report("Vehicle Listing", "/admin/reports/vehicles"))
            .with_child(report("Vehicle Makes", "/admin/reports/vehicle-makes"))
            .with_child(report("Vehicle Models", "/admin/reports/vehicle-models"))
            .with_child(report("Vehicle Owners", "/admin/reports/vehicle-owners")),
        MenuItem::new("Administration")
            .with_roles([ADMIN])
            .with_child(MenuItem::new("Users").with_url("/admin/users").with_roles([ADMIN]))
            .with_child(MenuItem::new("Roles").with_url("/admin/roles").with_roles([ADMIN]))
            .with_child(
                MenuItem::new("Settings")
                    .with_url("/admin/settings")
                    .with_roles([ADMIN]),
            ),
    ])
}

/// Path checks only see the matched item, so every page carries its own roles.
fn report(title: &str, url: &str) -> MenuItem {
    MenuItem::new(title)
        .with_url(url)
        .with_roles([ADMIN, DISPATCHER, FINANCE])
}

/// Menu from `path` when configured, the built-in one otherwise.
pub fn load_menu(path: Option<&Path>) -> Result<MenuTree, AccessError> {
    match path {
        Some(path) => {
            let tree = MenuTree::load(path)?;
            info!("Loaded menu with {} entries from {}", tree.walk().len(), path.display());
            Ok(tree)
        }
        None => default_menu(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::{PermissionResolver, PermissionStore};
    use crate::storage::MemoryStorage;
    use fleet_shared::Role;
    use std::io::Write;
    use std::sync::Arc;

    #[test]
    fn test_default_menu_is_valid() {
        let tree = default_menu().unwrap();
        assert!(tree.permission_keys().contains(&"Reports:Driver Activity".to_string()));
        assert_eq!(
            tree.find_most_specific("/admin/vehicles/manage/42").map(|e| e.permission_key()),
            Some("Fleet:Manage Vehicles".to_string())
        );
    }

    #[test]
    fn test_hidden_pages_are_not_reachable_by_path() {
        let tree = default_menu().unwrap();
        let entry = tree.find_most_specific("/admin/reports/bookings").unwrap();
        assert!(!entry.item.allows_statically(&Role::from(SUPPORT)));

        let resolver = PermissionResolver::new(
            Arc::new(tree),
            Arc::new(PermissionStore::new(Arc::new(MemoryStorage::new()))),
        );
        assert!(!resolver.is_path_allowed("/admin/users", &Role::from(DISPATCHER)));
        assert!(!resolver.is_path_allowed("/admin/roles", &Role::from(FINANCE)));
        assert!(!resolver.is_path_allowed("/admin/fare-schemes", &Role::from(SUPPORT)));
        assert!(resolver.is_path_allowed("/admin/fare-schemes", &Role::from(FINANCE)));
    }

    fn urls(items: &[MenuItem], out: &mut Vec<String>) {
        for item in items {
            if let Some(url) = &item.url {
                out.push(url.clone());
            }
            urls(&item.children, out);
        }
    }

    #[test]
    fn test_path_gate_agrees_with_visible_menu() {
        let tree = Arc::new(default_menu().unwrap());
        let resolver = PermissionResolver::new(
            tree.clone(),
            Arc::new(PermissionStore::new(Arc::new(MemoryStorage::new()))),
        );

        let mut all = Vec::new();
        urls(tree.items(), &mut all);

        for role in [ADMIN, DISPATCHER, FINANCE, SUPPORT, "guest"].map(Role::from) {
            let mut visible = Vec::new();
            urls(&resolver.visible_menu(&role), &mut visible);
            for url in &all {
                assert_eq!(
                    resolver.is_path_allowed(url, &role),
                    visible.contains(url),
                    "{} for {}",
                    url,
                    role
                );
            }
        }
    }

    #[test]
    fn test_load_menu_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"[{{"title": "Home", "url": "/admin"}}]"#).unwrap();

        let tree = load_menu(Some(file.path())).unwrap();
        assert_eq!(tree.items().len(), 1);
        assert!(load_menu(None).unwrap().items().len() > 1);
    }
}
