//! Resolved user permissions as consumed by the navigation shell.
//!
//! The backend reports permissions as a flat string map such as
//! `{"api:template": "read", "api:*": "admin"}`. That map is parsed once into
//! a closed set of keys so the shell never does string lookups.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Prefix carried by resource permission keys on the wire.
pub const API_PREFIX: &str = "api:";

/// Resource families that carry permissions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PermissionKey {
    /// Every resource (`api:*`, also accepted as a bare `*`).
    Wildcard,
    /// Provisioned resources.
    Resource,
    /// Resource templates.
    Template,
    /// Third-party integrations.
    Integration,
    /// State storages.
    Storage,
    /// Source code repositories.
    SourceCode,
    /// Versions of source code repositories.
    SourceCodeVersion,
    /// Workspaces.
    Workspace,
    /// Tasks.
    Task,
    /// Executors.
    Executor,
    /// Secrets.
    Secret,
    /// Batch operations.
    BatchOperation,
    /// Authentication providers.
    AuthProvider,
}

impl PermissionKey {
    /// Every key, wildcard first.
    pub const ALL: [Self; 13] = [
        Self::Wildcard,
        Self::Resource,
        Self::Template,
        Self::Integration,
        Self::Storage,
        Self::SourceCode,
        Self::SourceCodeVersion,
        Self::Workspace,
        Self::Task,
        Self::Executor,
        Self::Secret,
        Self::BatchOperation,
        Self::AuthProvider,
    ];

    /// Key name without the `api:` prefix.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Wildcard => "*",
            Self::Resource => "resource",
            Self::Template => "template",
            Self::Integration => "integration",
            Self::Storage => "storage",
            Self::SourceCode => "source_code",
            Self::SourceCodeVersion => "source_code_version",
            Self::Workspace => "workspace",
            Self::Task => "task",
            Self::Executor => "executor",
            Self::Secret => "secret",
            Self::BatchOperation => "batch_operation",
            Self::AuthProvider => "auth_provider",
        }
    }

    /// Key as spelled in the permission map, e.g. `api:template`.
    pub fn wire_key(self) -> String {
        format!("{API_PREFIX}{}", self.as_str())
    }

    /// Parse a permission map key. Unknown keys yield `None`.
    pub fn from_wire(raw: &str) -> Option<Self> {
        if raw == "*" {
            return Some(Self::Wildcard);
        }
        let name = raw.strip_prefix(API_PREFIX)?;
        Self::ALL.into_iter().find(|key| key.as_str() == name)
    }
}

/// Access granted for one permission key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessLevel {
    /// Read-only access.
    Read,
    /// Read and write access.
    Write,
    /// Full control.
    Admin,
    /// A level this client does not know; still a grant.
    Other(String),
}

impl AccessLevel {
    /// Parse a permission value. Blank values grant nothing.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "" => None,
            "read" => Some(Self::Read),
            "write" => Some(Self::Write),
            "admin" => Some(Self::Admin),
            other => Some(Self::Other(other.to_owned())),
        }
    }

    /// Whether this is the admin level.
    pub const fn is_admin(&self) -> bool {
        matches!(self, Self::Admin)
    }
}

/// Resolved permission map.
///
/// ## Invariants
/// - `is_empty()` reports whether the source map had no entries at all, so a
///   map holding only unknown keys is *resolved but grants nothing* rather
///   than empty.
///
/// # Examples
/// ```
/// use infrakitchen::domain::{PermissionKey, PermissionMap};
///
/// let map = PermissionMap::from_entries([("api:template", "read")]);
/// assert!(map.allows(PermissionKey::Template));
/// assert!(!map.allows(PermissionKey::Secret));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(from = "BTreeMap<String, String>")]
pub struct PermissionMap {
    grants: BTreeMap<PermissionKey, AccessLevel>,
    ignored: Vec<String>,
}

impl PermissionMap {
    /// Build a map from raw `(key, level)` entries.
    pub fn from_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut map = Self::default();
        for (key, value) in entries {
            let key = key.as_ref();
            match (PermissionKey::from_wire(key), AccessLevel::parse(value.as_ref())) {
                (Some(permission), Some(level)) => map.grant(permission, level),
                _ => map.ignored.push(key.to_owned()),
            }
        }
        map
    }

    fn grant(&mut self, key: PermissionKey, level: AccessLevel) {
        self.grants
            .entry(key)
            .and_modify(|current| {
                if !current.is_admin() {
                    *current = level.clone();
                }
            })
            .or_insert(level);
    }

    /// Whether the source map had no entries.
    pub fn is_empty(&self) -> bool {
        self.grants.is_empty() && self.ignored.is_empty()
    }

    /// Level granted for `key`, if any.
    pub fn level(&self, key: PermissionKey) -> Option<&AccessLevel> {
        self.grants.get(&key)
    }

    /// Whether the wildcard key carries the admin level.
    pub fn is_wildcard_admin(&self) -> bool {
        self.level(PermissionKey::Wildcard)
            .is_some_and(AccessLevel::is_admin)
    }

    /// Whether anything is granted for `key`. Wildcard admin grants all.
    pub fn allows(&self, key: PermissionKey) -> bool {
        self.is_wildcard_admin() || self.grants.contains_key(&key)
    }

    /// Raw keys that were dropped because they were unknown or blank.
    pub fn ignored_keys(&self) -> &[String] {
        &self.ignored
    }
}

impl From<BTreeMap<String, String>> for PermissionMap {
    fn from(raw: BTreeMap<String, String>) -> Self {
        Self::from_entries(raw)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for permission parsing.

    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("api:template", Some(PermissionKey::Template))]
    #[case("api:source_code_version", Some(PermissionKey::SourceCodeVersion))]
    #[case("api:*", Some(PermissionKey::Wildcard))]
    #[case("*", Some(PermissionKey::Wildcard))]
    #[case("template", None)]
    #[case("api:unknown", None)]
    fn parses_wire_keys(#[case] raw: &str, #[case] expected: Option<PermissionKey>) {
        assert_eq!(PermissionKey::from_wire(raw), expected);
    }

    #[rstest]
    fn wire_keys_round_trip() {
        for key in PermissionKey::ALL {
            assert_eq!(PermissionKey::from_wire(&key.wire_key()), Some(key));
        }
    }

    #[rstest]
    fn wildcard_admin_allows_everything() {
        let map = PermissionMap::from_entries([("api:*", "admin")]);
        assert!(map.is_wildcard_admin());
        assert!(PermissionKey::ALL.into_iter().all(|key| map.allows(key)));
    }

    #[rstest]
    fn wildcard_without_admin_only_grants_itself() {
        let map = PermissionMap::from_entries([("api:*", "read")]);
        assert!(!map.is_wildcard_admin());
        assert!(map.allows(PermissionKey::Wildcard));
        assert!(!map.allows(PermissionKey::Task));
    }

    #[rstest]
    fn blank_levels_grant_nothing_but_count_as_entries() {
        let map = PermissionMap::from_entries([("api:task", "")]);
        assert!(!map.allows(PermissionKey::Task));
        assert!(!map.is_empty());
        assert_eq!(map.ignored_keys(), ["api:task".to_owned()]);
    }

    #[rstest]
    fn admin_is_not_downgraded_by_a_later_alias() {
        let map = PermissionMap::from_entries([("*", "admin"), ("api:*", "read")]);
        assert!(map.is_wildcard_admin());
    }

    #[rstest]
    fn empty_source_is_empty() {
        let map = PermissionMap::from_entries(Vec::<(String, String)>::new());
        assert!(map.is_empty());
    }

    #[rstest]
    fn deserialises_from_a_flat_json_object() {
        let map: PermissionMap =
            serde_json::from_str(r#"{"api:secret": "write", "api:custom": "read"}"#)
                .expect("valid permission map");
        assert_eq!(map.level(PermissionKey::Secret), Some(&AccessLevel::Write));
        assert_eq!(map.ignored_keys(), ["api:custom".to_owned()]);
    }
}
