//! Host integration surface.
//!
//! The host registers two extensions: the API capability keyed by
//! [`API_REF_ID`] and the routable page mounted at [`ROOT_MOUNT_PATH`].
//! [`ExtensionRegistry`] is the seam the host implements; [`InMemoryRegistry`]
//! backs the dev harness and tests.

use std::collections::BTreeMap;
use std::sync::Arc;

use thiserror::Error;
use tracing::info;

use crate::domain::ports::{ConfigApi, IdentityApi, InfraKitchenApi};
use crate::domain::{MountPath, NavigationShell};
use crate::outbound::{ClientBuildError, ClientOptions, InfraKitchenApiClient};

/// Plugin identifier.
pub const PLUGIN_ID: &str = "infrakitchen";

/// Identifier the API capability is registered under.
pub const API_REF_ID: &str = "plugin.infrakitchen";

/// Name of the routable page extension.
pub const PAGE_EXTENSION_NAME: &str = "InfrakitchenPage";

/// Path the page is mounted at.
pub const ROOT_MOUNT_PATH: &str = "/infrakitchen";

/// Prefix the embedded console uses when building links.
pub const LINK_PREFIX: &str = "/infrakitchen/";

/// Routable page registered with the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageExtension {
    /// Extension name.
    pub name: &'static str,
    /// Owning plugin.
    pub plugin_id: &'static str,
    /// Where the page is mounted.
    pub mount_path: MountPath,
    /// Prefix for links generated inside the page.
    pub link_prefix: &'static str,
}

impl PageExtension {
    /// Absolute link to `relative` inside the page.
    ///
    /// # Examples
    /// ```
    /// use infrakitchen::plugin::InfraKitchenPlugin;
    ///
    /// let page = InfraKitchenPlugin::page();
    /// assert_eq!(page.link("/templates/3"), "/infrakitchen/templates/3");
    /// assert_eq!(page.link(""), "/infrakitchen/");
    /// ```
    pub fn link(&self, relative: &str) -> String {
        format!("{}{}", self.link_prefix, relative.trim_start_matches('/'))
    }
}

/// Errors raised when the host registry rejects an extension.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistrationError {
    /// An API is already registered under the identifier.
    #[error("an API is already registered under '{id}'")]
    DuplicateApi {
        /// Conflicting identifier.
        id: String,
    },
    /// A page is already mounted at the path.
    #[error("a page is already mounted at '{path}'")]
    DuplicatePage {
        /// Conflicting mount path.
        path: String,
    },
}

/// Errors raised while installing the plugin.
#[derive(Debug, Error)]
pub enum PluginError {
    /// The API client could not be built.
    #[error(transparent)]
    Client(#[from] ClientBuildError),
    /// The host rejected an extension.
    #[error(transparent)]
    Registration(#[from] RegistrationError),
}

/// Host extension/routing registry.
pub trait ExtensionRegistry {
    /// Register a data-fetching capability under `id`.
    fn register_api(
        &mut self,
        id: &str,
        api: Arc<dyn InfraKitchenApi>,
    ) -> Result<(), RegistrationError>;

    /// Mount a routable page.
    fn register_page(&mut self, page: PageExtension) -> Result<(), RegistrationError>;
}

/// Registry that keeps extensions in memory.
#[derive(Default)]
pub struct InMemoryRegistry {
    apis: BTreeMap<String, Arc<dyn InfraKitchenApi>>,
    pages: Vec<PageExtension>,
}

impl std::fmt::Debug for InMemoryRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryRegistry")
            .field("apis", &self.apis.keys().collect::<Vec<_>>())
            .field("pages", &self.pages)
            .finish()
    }
}

impl InMemoryRegistry {
    /// The API registered under `id`.
    pub fn api(&self, id: &str) -> Option<Arc<dyn InfraKitchenApi>> {
        self.apis.get(id).cloned()
    }

    /// Pages in registration order.
    pub fn pages(&self) -> &[PageExtension] {
        &self.pages
    }
}

impl ExtensionRegistry for InMemoryRegistry {
    fn register_api(
        &mut self,
        id: &str,
        api: Arc<dyn InfraKitchenApi>,
    ) -> Result<(), RegistrationError> {
        if self.apis.contains_key(id) {
            return Err(RegistrationError::DuplicateApi { id: id.to_owned() });
        }
        self.apis.insert(id.to_owned(), api);
        Ok(())
    }

    fn register_page(&mut self, page: PageExtension) -> Result<(), RegistrationError> {
        if self
            .pages
            .iter()
            .any(|existing| existing.mount_path == page.mount_path)
        {
            return Err(RegistrationError::DuplicatePage {
                path: page.mount_path.as_str().to_owned(),
            });
        }
        self.pages.push(page);
        Ok(())
    }
}

/// Factory and installer for the plugin's extensions.
#[derive(Debug, Clone, Copy, Default)]
pub struct InfraKitchenPlugin;

impl InfraKitchenPlugin {
    /// The page extension mounted at [`ROOT_MOUNT_PATH`].
    pub fn page() -> PageExtension {
        PageExtension {
            name: PAGE_EXTENSION_NAME,
            plugin_id: PLUGIN_ID,
            mount_path: MountPath::new(ROOT_MOUNT_PATH),
            link_prefix: LINK_PREFIX,
        }
    }

    /// Build the API capability from the host identity and config providers.
    ///
    /// # Errors
    ///
    /// Returns an error when the backend base URL is missing or invalid.
    pub fn create_api(
        identity: Arc<dyn IdentityApi>,
        config: &dyn ConfigApi,
        options: ClientOptions,
    ) -> Result<Arc<dyn InfraKitchenApi>, ClientBuildError> {
        let client = InfraKitchenApiClient::with_options(identity, config, options)?;
        Ok(Arc::new(client))
    }

    /// Register `api` and the page with `registry`.
    ///
    /// # Errors
    ///
    /// Returns an error when the registry already holds either extension.
    pub fn install<R>(
        registry: &mut R,
        api: Arc<dyn InfraKitchenApi>,
    ) -> Result<(), RegistrationError>
    where
        R: ExtensionRegistry + ?Sized,
    {
        registry.register_api(API_REF_ID, api)?;
        registry.register_page(Self::page())?;
        info!(
            plugin = PLUGIN_ID,
            api = API_REF_ID,
            mount = ROOT_MOUNT_PATH,
            "registered InfraKitchen plugin"
        );
        Ok(())
    }

    /// Create the API client and register both extensions.
    ///
    /// # Errors
    ///
    /// Returns an error when the client cannot be built or the registry
    /// rejects an extension.
    pub fn register<R>(
        registry: &mut R,
        identity: Arc<dyn IdentityApi>,
        config: &dyn ConfigApi,
    ) -> Result<(), PluginError>
    where
        R: ExtensionRegistry + ?Sized,
    {
        let api = Self::create_api(identity, config, ClientOptions::default())?;
        Self::install(registry, api)?;
        Ok(())
    }

    /// Navigation shell for `page`, mounted at its path.
    pub fn shell(page: &PageExtension) -> NavigationShell {
        NavigationShell::mounted(page.mount_path.clone())
    }
}

#[cfg(test)]
mod tests {
    //! Registration coverage against the in-memory registry.

    use super::*;
    use crate::domain::ports::MockInfraKitchenApi;
    use crate::domain::{PermissionMap, ShellState};
    use crate::outbound::{MapConfig, StaticIdentity};
    use rstest::{fixture, rstest};

    #[fixture]
    fn registry() -> InMemoryRegistry {
        InMemoryRegistry::default()
    }

    #[rstest]
    #[tokio::test]
    async fn installed_api_is_reachable_by_id(mut registry: InMemoryRegistry) {
        let mut api = MockInfraKitchenApi::new();
        api.expect_get_token()
            .times(1)
            .returning(|| Ok(Some("abc".to_owned())));

        InfraKitchenPlugin::install(&mut registry, Arc::new(api)).expect("install");

        let api = registry.api(API_REF_ID).expect("api registered");
        assert_eq!(api.get_token().await, Ok(Some("abc".to_owned())));
        assert_eq!(registry.pages(), [InfraKitchenPlugin::page()].as_slice());
    }

    #[rstest]
    fn second_install_is_rejected(mut registry: InMemoryRegistry) {
        InfraKitchenPlugin::install(&mut registry, Arc::new(MockInfraKitchenApi::new()))
            .expect("first install");
        let error = InfraKitchenPlugin::install(&mut registry, Arc::new(MockInfraKitchenApi::new()))
            .expect_err("second install must fail");
        assert_eq!(
            error,
            RegistrationError::DuplicateApi {
                id: API_REF_ID.to_owned()
            }
        );
    }

    #[rstest]
    fn register_builds_the_http_client(mut registry: InMemoryRegistry) {
        let config = MapConfig::with_backend_base_url("http://localhost:7007");
        InfraKitchenPlugin::register(
            &mut registry,
            Arc::new(StaticIdentity::bearer("t")),
            &config,
        )
        .expect("register");
        assert!(registry.api(API_REF_ID).is_some());
        assert_eq!(registry.pages().len(), 1);
    }

    #[rstest]
    fn register_without_base_url_fails(mut registry: InMemoryRegistry) {
        let error = InfraKitchenPlugin::register(
            &mut registry,
            Arc::new(StaticIdentity::anonymous()),
            &MapConfig::default(),
        )
        .expect_err("base URL is required");
        assert!(matches!(error, PluginError::Client(ClientBuildError::Config(_))));
        assert!(registry.pages().is_empty());
    }

    #[rstest]
    fn page_shell_resolves_against_the_mount() {
        let page = InfraKitchenPlugin::page();
        let permissions = PermissionMap::from_entries([("api:template", "read")]);
        let view = InfraKitchenPlugin::shell(&page)
            .render(&ShellState::Ready(permissions), "/infrakitchen/templates");
        let tab = view
            .page()
            .and_then(|page| page.tabs.first())
            .map(|tab| tab.target.clone());
        assert_eq!(tab.as_deref(), Some("/infrakitchen/templates"));
    }
}
