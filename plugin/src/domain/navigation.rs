//! Tab catalog and the path arithmetic that ties tabs to URLs.
//!
//! Each tab is a route descriptor: the same record drives the header tab and
//! the nested route it selects.

use serde::Serialize;

use super::permissions::{PermissionKey, PermissionMap};

/// Declarative description of one navigable section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct RouteDescriptor {
    /// Stable tab identifier.
    pub id: &'static str,
    /// Label shown on the tab.
    pub label: &'static str,
    /// Path relative to the mount point, starting with `/`.
    pub path: &'static str,
    /// Permission required to see the tab.
    pub permission: PermissionKey,
}

impl RouteDescriptor {
    /// Whether this is the root tab (`/`).
    pub fn is_root(&self) -> bool {
        self.path == "/"
    }

    /// Nested route pattern matched under the mount point, e.g. `/resources/*`.
    pub fn route_pattern(&self) -> String {
        if self.is_root() {
            "/*".to_owned()
        } else {
            format!("{}/*", self.path)
        }
    }
}

const fn tab(
    id: &'static str,
    label: &'static str,
    path: &'static str,
    permission: PermissionKey,
) -> RouteDescriptor {
    RouteDescriptor {
        id,
        label,
        path,
        permission,
    }
}

/// Every tab the plugin knows, in display order.
pub static TAB_CATALOG: [RouteDescriptor; 13] = [
    tab("resources", "Resources", "/resources", PermissionKey::Resource),
    tab("templates", "Templates", "/templates", PermissionKey::Template),
    tab(
        "integrations",
        "Integrations",
        "/integrations",
        PermissionKey::Integration,
    ),
    tab("storage", "Storage", "/storages", PermissionKey::Storage),
    tab(
        "source-codes",
        "Source Codes",
        "/source_codes",
        PermissionKey::SourceCode,
    ),
    tab(
        "source-code-versions",
        "Source Code Versions",
        "/source_code_versions",
        PermissionKey::SourceCodeVersion,
    ),
    tab("workspaces", "Workspaces", "/workspaces", PermissionKey::Workspace),
    tab("tasks", "Tasks", "/tasks", PermissionKey::Task),
    tab("executors", "Executors", "/executors", PermissionKey::Executor),
    tab("secrets", "Secrets", "/secrets", PermissionKey::Secret),
    tab(
        "batch-operations",
        "Batch Operations",
        "/batch_operations",
        PermissionKey::BatchOperation,
    ),
    tab(
        "auth-providers",
        "Auth Providers",
        "/auth_providers",
        PermissionKey::AuthProvider,
    ),
    tab("settings", "Settings", "/admin", PermissionKey::Wildcard),
];

/// Tabs of `catalog` the user may see, in catalog order.
pub fn visible_tabs<'a>(
    catalog: &'a [RouteDescriptor],
    permissions: &PermissionMap,
) -> Vec<&'a RouteDescriptor> {
    catalog
        .iter()
        .filter(|tab| permissions.allows(tab.permission))
        .collect()
}

fn strip_one_trailing_slash(path: &str) -> &str {
    path.strip_suffix('/').unwrap_or(path)
}

/// Infer the mount point from the current URL.
///
/// For each tab path in order, its first occurrence in `current` is taken as
/// the start of the plugin's own routes when it sits after a non-empty prefix
/// and ends the path or is followed by `/`. The prefix, minus one trailing
/// slash, is the base. Without a match the base is `current` minus one
/// trailing slash, or `/` when that leaves nothing.
///
/// # Examples
/// ```
/// use infrakitchen::domain::infer_base_path;
///
/// let base = infer_base_path("/infrakitchen/resources/123", ["/templates", "/resources"]);
/// assert_eq!(base, "/infrakitchen");
/// ```
pub fn infer_base_path<'a>(current: &str, tab_paths: impl IntoIterator<Item = &'a str>) -> String {
    for route in tab_paths {
        let Some(index) = current.find(route) else {
            continue;
        };
        if index == 0 {
            continue;
        }
        let (Some(prefix), Some(after)) = (current.get(..index), current.get(index + route.len()..))
        else {
            continue;
        };
        if after.is_empty() || after.starts_with('/') {
            return strip_one_trailing_slash(prefix).to_owned();
        }
    }

    match strip_one_trailing_slash(current) {
        "" => "/".to_owned(),
        trimmed => trimmed.to_owned(),
    }
}

/// Path of `current` below `base`, minus one trailing slash, `/` when empty.
pub fn relative_path(current: &str, base: &str) -> String {
    let below = current.strip_prefix(base).unwrap_or(current);
    match strip_one_trailing_slash(below) {
        "" => "/".to_owned(),
        trimmed => trimmed.to_owned(),
    }
}

/// Index of the first tab whose path prefixes `relative`; the root tab only
/// matches `/` exactly. Defaults to `0`.
pub fn active_tab_index(relative: &str, tabs: &[&RouteDescriptor]) -> usize {
    tabs.iter()
        .position(|tab| {
            if tab.is_root() {
                relative == "/"
            } else {
                relative.starts_with(tab.path)
            }
        })
        .unwrap_or(0)
}

/// Navigation target for selecting `tab` under `base`.
pub fn tab_target(base: &str, tab: &RouteDescriptor) -> String {
    if tab.is_root() {
        if base.is_empty() {
            "/".to_owned()
        } else {
            base.to_owned()
        }
    } else {
        format!("{base}{}", tab.path)
    }
}

/// Mount point supplied by the host at registration time.
///
/// Stored without a trailing slash; the root mount is stored as the empty
/// string so `base + tab path` never doubles a slash.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MountPath(String);

impl MountPath {
    /// Normalise `raw` into a mount path. A missing leading slash is added.
    pub fn new(raw: &str) -> Self {
        let trimmed = raw.trim().trim_end_matches('/');
        if trimmed.is_empty() {
            return Self(String::new());
        }
        if trimmed.starts_with('/') {
            Self(trimmed.to_owned())
        } else {
            Self(format!("/{trimmed}"))
        }
    }

    /// Normalised mount path.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// Where the base path of the plugin's routes comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BasePath {
    /// Explicit mount point passed in by the host.
    Mounted(MountPath),
    /// Inferred from the current URL and the visible tab paths.
    Inferred,
}

impl BasePath {
    /// Resolve the base path for `current`.
    pub fn resolve(&self, current: &str, tabs: &[&RouteDescriptor]) -> String {
        match self {
            Self::Mounted(mount) => mount.as_str().to_owned(),
            Self::Inferred => infer_base_path(current, tabs.iter().map(|tab| tab.path)),
        }
    }
}
