// ============================================================================
// Fleet Access - Permission Overrides
// File: crates/fleet-access/src/domain/overrides.rs
// Description: Per-role permission-key table edited from the settings screen
// ============================================================================

use std::collections::BTreeMap;

use fleet_shared::Role;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::menu::MenuTree;

/// role -> permission key -> allowed.
///
/// Once a role has an entry here it is in allow-list mode: any key that is not
/// explicitly `true` is denied, whatever the menu's static `allowed_roles` say.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct PermissionOverrides(BTreeMap<Role, BTreeMap<String, bool>>);

impl PermissionOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn roles(&self) -> impl Iterator<Item = &Role> {
        self.0.keys()
    }

    pub fn has_role(&self, role: &Role) -> bool {
        self.0.contains_key(role)
    }

    pub fn entries(&self, role: &Role) -> Option<&BTreeMap<String, bool>> {
        self.0.get(role)
    }

    /// `None` when the role has no entry at all, otherwise whether `key` is
    /// explicitly granted.
    pub fn is_allowed(&self, role: &Role, key: &str) -> Option<bool> {
        self.0
            .get(role)
            .map(|entries| entries.get(key).copied().unwrap_or(false))
    }

    pub fn set(&mut self, role: Role, key: impl Into<String>, allowed: bool) {
        self.0.entry(role).or_default().insert(key.into(), allowed);
    }

    /// Puts `role` back into static-fallback mode. Returns whether it had entries.
    pub fn clear_role(&mut self, role: &Role) -> bool {
        self.0.remove(role).is_some()
    }

    /// Writes the static decision of every menu key for `role`, so editing
    /// starts from what the role sees today. Existing entries are kept.
    pub fn seed_from_static(&mut self, tree: &MenuTree, role: &Role) {
        let entries = self.0.entry(role.clone()).or_default();
        for entry in tree.walk() {
            entries
                .entry(entry.permission_key())
                .or_insert_with(|| entry.item.allows_statically(role));
        }
    }
}

// Parsing mirrors lookup: only a literal `true` grants, a `null` role is
// absent, and any other non-object role value denies every key.
impl<'de> Deserialize<'de> for PermissionOverrides {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: BTreeMap<Role, Value> = BTreeMap::deserialize(deserializer)?;
        let mut map = BTreeMap::new();
        for (role, value) in raw {
            let entries = match value {
                Value::Null => continue,
                Value::Object(keys) => keys
                    .into_iter()
                    .map(|(key, allowed)| (key, allowed == Value::Bool(true)))
                    .collect(),
                _ => BTreeMap::new(),
            };
            map.insert(role, entries);
        }
        Ok(Self(map))
    }
}
