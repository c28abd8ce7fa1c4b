// ============================================================================
// Fleet Access - Menu Tree
// File: crates/fleet-access/src/domain/menu.rs
// Description: Statically authored navigation tree and permission keys
// ============================================================================

use std::collections::{BTreeSet, HashSet};
use std::path::Path;

use fleet_shared::Role;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::AccessError;

/// Permission key of a menu item: `title` at the root, `parent:title` when nested.
pub fn permission_key(title: &str, parent_title: Option<&str>) -> String {
    match parent_title {
        Some(parent) => format!("{}:{}", parent, title),
        None => title.to_string(),
    }
}

/// Navigation menu node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    #[validate(length(min = 1, max = 100, message = "Menu title must be between 1 and 100 characters"))]
    pub title: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 255, message = "Menu URL must be between 1 and 255 characters"))]
    pub url: Option<String>,

    /// `None` means every role may see the item.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allowed_roles: Option<BTreeSet<Role>>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    #[validate(nested)]
    pub children: Vec<MenuItem>,
}

impl MenuItem {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into().trim().to_string(),
            url: None,
            allowed_roles: None,
            children: Vec::new(),
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into().trim().to_string());
        self
    }

    pub fn with_roles<I, R>(mut self, roles: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: Into<Role>,
    {
        self.allowed_roles = Some(roles.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_child(mut self, child: MenuItem) -> Self {
        self.children.push(child);
        self
    }

    /// Static rule: allowed unless `allowed_roles` is present and lacks `role`.
    pub fn allows_statically(&self, role: &Role) -> bool {
        match &self.allowed_roles {
            Some(roles) => roles.contains(role),
            None => true,
        }
    }

    /// `url == path`, or `url` is a prefix of `path` followed by `/`.
    pub fn matches_path(&self, path: &str) -> bool {
        match &self.url {
            Some(url) => {
                path == url
                    || (path.len() > url.len()
                        && path.starts_with(url.as_str())
                        && path[url.len()..].starts_with('/'))
            }
            None => false,
        }
    }
}

/// A node reached while walking the tree, with its immediate parent's title.
#[derive(Debug, Clone, Copy)]
pub struct MenuEntry<'a> {
    pub item: &'a MenuItem,
    pub parent_title: Option<&'a str>,
}

impl MenuEntry<'_> {
    pub fn permission_key(&self) -> String {
        permission_key(&self.item.title, self.parent_title)
    }
}

/// Validated, immutable navigation tree.
#[derive(Debug, Clone, PartialEq)]
pub struct MenuTree {
    items: Vec<MenuItem>,
}

impl MenuTree {
    pub fn new(items: Vec<MenuItem>) -> Result<Self, AccessError> {
        for item in &items {
            item.validate()
                .map_err(|e| AccessError::InvalidMenu(format!("{}: {}", item.title, e)))?;
        }

        let mut urls = HashSet::new();
        check_level(&items, "<root>", &mut urls)?;

        Ok(Self { items })
    }

    pub fn from_json(raw: &str) -> Result<Self, AccessError> {
        let items: Vec<MenuItem> = serde_json::from_str(raw)?;
        Self::new(items)
    }

    pub fn load(path: &Path) -> Result<Self, AccessError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json(&raw)
    }

    pub fn items(&self) -> &[MenuItem] {
        &self.items
    }

    /// Depth-first, pre-order: a parent comes before its children, siblings
    /// in declaration order.
    pub fn walk(&self) -> Vec<MenuEntry<'_>> {
        let mut out = Vec::new();
        collect(&self.items, None, &mut out);
        out
    }

    pub fn permission_keys(&self) -> Vec<String> {
        self.walk().iter().map(MenuEntry::permission_key).collect()
    }

    /// Longest matching `url` wins; on equal length the first entry in walk
    /// order is kept.
    pub fn find_most_specific(&self, path: &str) -> Option<MenuEntry<'_>> {
        let mut best: Option<MenuEntry<'_>> = None;
        for entry in self.walk() {
            if !entry.item.matches_path(path) {
                continue;
            }
            let len = entry.item.url.as_deref().map_or(0, str::len);
            let best_len = best
                .and_then(|b| b.item.url.as_deref())
                .map_or(0, str::len);
            if best.is_none() || len > best_len {
                best = Some(entry);
            }
        }
        best
    }
}

fn collect<'a>(items: &'a [MenuItem], parent: Option<&'a str>, out: &mut Vec<MenuEntry<'a>>) {
    for item in items {
        out.push(MenuEntry { item, parent_title: parent });
        collect(&item.children, Some(item.title.as_str()), out);
    }
}

fn check_level<'a>(
    items: &'a [MenuItem],
    parent: &str,
    urls: &mut HashSet<&'a str>,
) -> Result<(), AccessError> {
    let mut titles = HashSet::new();
    for item in items {
        if !titles.insert(item.title.as_str()) {
            return Err(AccessError::DuplicateTitle {
                parent: parent.to_string(),
                title: item.title.clone(),
            });
        }
        if let Some(url) = item.url.as_deref() {
            if !urls.insert(url) {
                return Err(AccessError::DuplicateUrl(url.to_string()));
            }
        }
        check_level(&item.children, &item.title, urls)?;
    }
    Ok(())
}
