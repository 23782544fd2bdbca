//! Domain types and pure logic.
//!
//! Purpose: hold the backend-agnostic pieces of the plugin. Nothing here
//! performs I/O; adapters in `outbound` implement the ports declared in
//! `ports`.
//!
//! Public surface:
//! - ApiError, ErrorBody: normalised backend failures.
//! - PermissionMap, PermissionKey, AccessLevel: resolved user permissions.
//! - TAB_CATALOG, RouteDescriptor and path helpers: tab routing.
//! - NavigationShell, ShellState, ShellView: the permission-filtered shell.
//! - ThemeMode, Palette, override_css, ColorSchemeGuard: dark-mode overrides.

pub mod error;
pub mod navigation;
pub mod permissions;
pub mod ports;
pub mod shell;
pub mod theme;

pub use self::error::{ApiError, ErrorBody, UNKNOWN_ERROR_CODE};
pub use self::navigation::{
    BasePath, MountPath, RouteDescriptor, TAB_CATALOG, active_tab_index, infer_base_path,
    relative_path, tab_target, visible_tabs,
};
pub use self::permissions::{API_PREFIX, AccessLevel, PermissionKey, PermissionMap};
pub use self::shell::{
    NavigationShell, PAGE_SUBTITLE, PAGE_TITLE, PageHeader, PageView, RouteView, ShellState,
    ShellView, TabView,
};
pub use self::theme::{
    ColorSchemeGuard, IK_SCHEME_ATTRIBUTE, MUI_SCHEME_ATTRIBUTE, Palette, ThemeMode, override_css,
};

/// Result alias for backend calls.
pub type ApiResult<T> = Result<T, ApiError>;
