//! Driving contract for the InfraKitchen backend.
//!
//! The UI layer talks to this trait only. Adapters hide the wire convention
//! (range headers, JSON-encoded query parameters, bearer tokens).

use async_trait::async_trait;
use pagination::{Pagination, Sort};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::ApiError;

/// Request for one page of a resource collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    /// Collection name, e.g. `templates`.
    pub resource: String,
    /// Page to fetch.
    pub pagination: Pagination,
    /// Ordering of the collection.
    pub sort: Sort,
    /// Filter criteria passed through to the backend.
    pub filter: Map<String, Value>,
}

impl ListQuery {
    /// First page of `resource` with default sort and no filter.
    pub fn new(resource: impl Into<String>) -> Self {
        Self {
            resource: resource.into(),
            pagination: Pagination::default(),
            sort: Sort::default(),
            filter: Map::new(),
        }
    }

    /// Replace the page request.
    #[must_use]
    pub fn with_pagination(mut self, pagination: Pagination) -> Self {
        self.pagination = pagination;
        self
    }

    /// Replace the sort specification.
    #[must_use]
    pub fn with_sort(mut self, sort: Sort) -> Self {
        self.sort = sort;
        self
    }

    /// Replace the filter criteria.
    #[must_use]
    pub fn with_filter(mut self, filter: Map<String, Value>) -> Self {
        self.filter = filter;
        self
    }
}

/// One page of records plus the backend-reported collection size.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ListResult {
    /// Records on the requested page.
    pub data: Vec<Value>,
    /// Size of the whole collection, independent of the page size.
    pub total: u64,
}

/// Which side of a resource tree to fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TreeDirection {
    /// Ancestors of the entity.
    Parents,
    /// Descendants of the entity.
    #[default]
    Children,
    /// Ancestors and descendants.
    Both,
}

impl TreeDirection {
    /// Path segment used by the tree endpoint.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Parents => "parents",
            Self::Children => "children",
            Self::Both => "both",
        }
    }
}

impl std::fmt::Display for TreeDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TreeDirection {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw {
            "parents" => Ok(Self::Parents),
            "children" => Ok(Self::Children),
            "both" => Ok(Self::Both),
            other => Err(format!(
                "unknown tree direction '{other}', expected parents, children, or both"
            )),
        }
    }
}

/// Backend-agnostic list/CRUD contract consumed by the UI.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait InfraKitchenApi: Send + Sync {
    /// Fetch one page of a collection and its total size.
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// use infrakitchen::domain::ports::{InfraKitchenApi, ListQuery};
    ///
    /// let page = api.get_list(&ListQuery::new("templates")).await?;
    /// assert!(page.data.len() as u64 <= page.total);
    /// ```
    async fn get_list(&self, query: &ListQuery) -> Result<ListResult, ApiError>;

    /// GET `path` with `params` encoded as a query string.
    async fn get(&self, path: &str, params: &Map<String, Value>) -> Result<Value, ApiError>;

    /// POST `body` to `path`.
    async fn post_raw(&self, path: &str, body: &Value) -> Result<Value, ApiError>;

    /// PUT `body` to `path`.
    async fn update_raw(&self, path: &str, body: &Value) -> Result<Value, ApiError>;

    /// PATCH `body` to `path`.
    async fn patch_raw(&self, path: &str, body: &Value) -> Result<Value, ApiError>;

    /// DELETE `path`, sending `body` along.
    async fn delete_raw(&self, path: &str, body: &Value) -> Result<Value, ApiError>;

    /// Fetch the dependency tree of one entity of `component`.
    async fn get_tree(
        &self,
        component: &str,
        id: &str,
        direction: TreeDirection,
    ) -> Result<Value, ApiError>;

    /// Fetch the variable schema of a source code version, resolved against
    /// the named parent resources (none when the slice is empty).
    async fn get_variable_schema(
        &self,
        id: &str,
        parent_resources: &[String],
    ) -> Result<Value, ApiError>;

    /// Download the debug bundle of a resource.
    async fn download_file(&self, id: &str) -> Result<Vec<u8>, ApiError>;

    /// Current bearer token, straight from the identity provider.
    async fn get_token(&self) -> Result<Option<String>, ApiError>;
}
