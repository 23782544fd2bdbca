//! Permission-filtered navigation shell.
//!
//! The shell has two observable states. Until the permission map resolves it
//! shows a placeholder. Once resolved it shows the header, the tabs the user
//! may see, and the nested routes behind them. A resolved but empty map shows
//! neither tabs nor routes.

use serde::Serialize;
use tracing::debug;

use super::navigation::{
    BasePath, MountPath, RouteDescriptor, TAB_CATALOG, active_tab_index, relative_path,
    tab_target, visible_tabs,
};
use super::permissions::PermissionMap;

/// Page title shown in the header.
pub const PAGE_TITLE: &str = "InfraKitchen";

/// Page subtitle shown in the header.
pub const PAGE_SUBTITLE: &str = "Run your infrastructure like a Michelin-starred kitchen.";

/// Permission resolution state fed into the shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellState {
    /// The permission map has not resolved yet.
    Loading,
    /// The permission map resolved, possibly empty.
    Ready(PermissionMap),
}

/// Header block of the page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageHeader {
    /// Page title.
    pub title: &'static str,
    /// Page subtitle.
    pub subtitle: &'static str,
}

impl Default for PageHeader {
    fn default() -> Self {
        Self {
            title: PAGE_TITLE,
            subtitle: PAGE_SUBTITLE,
        }
    }
}

/// One rendered tab.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TabView {
    /// Stable tab identifier.
    pub id: &'static str,
    /// Tab label.
    pub label: &'static str,
    /// Path below the base path.
    pub path: &'static str,
    /// Absolute navigation target.
    pub target: String,
}

/// One rendered nested route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteView {
    /// Identifier of the tab that owns the route.
    pub id: &'static str,
    /// Route pattern relative to the base path.
    pub pattern: String,
}

/// Fully resolved page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageView {
    /// Header block.
    pub header: PageHeader,
    /// Base path the tabs are resolved against.
    pub base_path: String,
    /// Visible tabs in catalog order.
    pub tabs: Vec<TabView>,
    /// Index of the active tab, `None` when no tab is shown.
    pub selected_index: Option<usize>,
    /// Routes rendered below the tabs.
    pub routes: Vec<RouteView>,
}

/// What the shell renders for a given state and location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ShellView {
    /// Placeholder while permissions load.
    Loading,
    /// Resolved page.
    Page(PageView),
}

impl ShellView {
    /// The page, when permissions have resolved.
    pub const fn page(&self) -> Option<&PageView> {
        match self {
            Self::Loading => None,
            Self::Page(page) => Some(page),
        }
    }
}

/// Navigation shell over a fixed tab catalog.
///
/// # Examples
/// ```
/// use infrakitchen::domain::{NavigationShell, PermissionMap, ShellState};
///
/// let shell = NavigationShell::inferred();
/// let state = ShellState::Ready(PermissionMap::from_entries([("api:*", "admin")]));
/// let view = shell.render(&state, "/infrakitchen/tasks/9");
/// let page = view.page().expect("permissions resolved");
/// assert_eq!(page.base_path, "/infrakitchen");
/// assert_eq!(page.selected_index, Some(7));
/// ```
#[derive(Debug, Clone)]
pub struct NavigationShell {
    base: BasePath,
    catalog: &'static [RouteDescriptor],
}

impl NavigationShell {
    /// Shell mounted at an explicit path supplied by the host.
    pub fn mounted(mount: MountPath) -> Self {
        Self {
            base: BasePath::Mounted(mount),
            catalog: &TAB_CATALOG,
        }
    }

    /// Shell that infers its base path from the current URL.
    pub fn inferred() -> Self {
        Self {
            base: BasePath::Inferred,
            catalog: &TAB_CATALOG,
        }
    }

    /// Replace the tab catalog.
    #[must_use]
    pub fn with_catalog(mut self, catalog: &'static [RouteDescriptor]) -> Self {
        self.catalog = catalog;
        self
    }

    /// Render the shell for `state` at `current_path`.
    pub fn render(&self, state: &ShellState, current_path: &str) -> ShellView {
        let ShellState::Ready(permissions) = state else {
            debug!(path = current_path, "permissions pending; rendering placeholder");
            return ShellView::Loading;
        };

        if !permissions.ignored_keys().is_empty() {
            debug!(
                keys = ?permissions.ignored_keys(),
                "ignoring unrecognised permission entries"
            );
        }

        let tabs = visible_tabs(self.catalog, permissions);
        let base_path = self.base.resolve(current_path, &tabs);

        if permissions.is_empty() {
            debug!(path = current_path, "permission map is empty; rendering no routes");
            return ShellView::Page(PageView {
                header: PageHeader::default(),
                base_path,
                tabs: Vec::new(),
                selected_index: None,
                routes: Vec::new(),
            });
        }

        let relative = relative_path(current_path, &base_path);
        let selected_index = (!tabs.is_empty()).then(|| active_tab_index(&relative, &tabs));
        let tab_views = tabs
            .iter()
            .map(|tab| TabView {
                id: tab.id,
                label: tab.label,
                path: tab.path,
                target: tab_target(&base_path, tab),
            })
            .collect();
        let routes = tabs
            .iter()
            .map(|tab| RouteView {
                id: tab.id,
                pattern: tab.route_pattern(),
            })
            .collect();

        debug!(
            path = current_path,
            base = %base_path,
            visible = tabs.len(),
            selected = ?selected_index,
            "rendered navigation shell"
        );

        ShellView::Page(PageView {
            header: PageHeader::default(),
            base_path,
            tabs: tab_views,
            selected_index,
            routes,
        })
    }

    /// Navigation target for selecting the visible tab at `index`, or `None`
    /// when no such tab exists.
    pub fn select_tab(
        &self,
        index: usize,
        current_path: &str,
        permissions: &PermissionMap,
    ) -> Option<String> {
        let tabs = visible_tabs(self.catalog, permissions);
        let tab = tabs.get(index)?;
        let base_path = self.base.resolve(current_path, &tabs);
        Some(tab_target(&base_path, tab))
    }
}
