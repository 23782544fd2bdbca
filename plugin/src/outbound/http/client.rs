//! Reqwest-backed InfraKitchen API client.
//!
//! This adapter owns the wire convention only: URL building, headers, the
//! range/content-range pagination contract, and mapping HTTP failures into
//! [`ApiError`].

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use pagination::{ItemRange, ListQueryParams, append_query, parse_content_range_total};
use reqwest::header::{ACCEPT, CONTENT_RANGE, CONTENT_TYPE, HeaderMap, RANGE};
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, warn};
use url::Url;

use super::dto::ErrorBodyDto;
use crate::domain::ApiError;
use crate::domain::ports::{
    BACKEND_BASE_URL_KEY, ConfigApi, ConfigError, IdentityApi, InfraKitchenApi, ListQuery,
    ListResult, TreeDirection,
};

/// Path below the host backend where the InfraKitchen proxy is mounted.
pub const BACKEND_API_PREFIX: &str = "api/proxy/infrakitchen/api/";

const JSON_MEDIA_TYPE: &str = "application/json";
const DEBUG_RESOURCE: &str = "resources";

/// Transport settings for [`InfraKitchenApiClient`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClientOptions {
    /// Per-request timeout; requests wait indefinitely when `None`.
    pub timeout: Option<Duration>,
}

/// Errors raised while constructing [`InfraKitchenApiClient`].
#[derive(Debug, Error)]
pub enum ClientBuildError {
    /// The backend base URL could not be read from host configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// The backend base URL does not parse.
    #[error("invalid backend base URL '{url}': {source}")]
    InvalidBaseUrl {
        /// Offending URL text.
        url: String,
        /// Parser failure.
        #[source]
        source: url::ParseError,
    },
    /// The underlying HTTP client could not be built.
    #[error("failed to build HTTP client: {0}")]
    Http(#[from] reqwest::Error),
}

/// InfraKitchen adapter that issues one HTTP request per port call.
pub struct InfraKitchenApiClient {
    client: Client,
    root: Url,
    identity: Arc<dyn IdentityApi>,
}

impl std::fmt::Debug for InfraKitchenApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InfraKitchenApiClient")
            .field("root", &self.root.as_str())
            .finish_non_exhaustive()
    }
}

impl InfraKitchenApiClient {
    /// Build a client for the backend named by `backend.baseUrl`.
    /// ```rust,ignore
    /// let client = InfraKitchenApiClient::new(identity, &config)?;
    /// assert!(client.root().as_str().ends_with("/api/proxy/infrakitchen/api/"));
    /// ```
    /// # Errors
    ///
    /// Returns an error when the base URL is missing or invalid, or when the
    /// reqwest client cannot be constructed.
    pub fn new(
        identity: Arc<dyn IdentityApi>,
        config: &dyn ConfigApi,
    ) -> Result<Self, ClientBuildError> {
        Self::with_options(identity, config, ClientOptions::default())
    }

    /// Build a client with explicit transport options.
    ///
    /// # Errors
    ///
    /// Returns an error when the base URL is missing or invalid, or when the
    /// reqwest client cannot be constructed.
    pub fn with_options(
        identity: Arc<dyn IdentityApi>,
        config: &dyn ConfigApi,
        options: ClientOptions,
    ) -> Result<Self, ClientBuildError> {
        let base_url = config.get_string(BACKEND_BASE_URL_KEY)?;
        let root = backend_root(&base_url)?;
        let mut builder = Client::builder();
        if let Some(timeout) = options.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;
        debug!(root = %root, "configured InfraKitchen API client");
        Ok(Self {
            client,
            root,
            identity,
        })
    }

    /// Root URL every request path is resolved against.
    pub fn root(&self) -> &Url {
        &self.root
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        let joined = format!("{}{}", self.root.as_str(), path.trim_start_matches('/'));
        Url::parse(&joined).map_err(|error| {
            ApiError::invalid_request(format!("invalid request path '{path}': {error}"))
        })
    }

    async fn token(&self) -> Result<Option<String>, ApiError> {
        let credentials = self
            .identity
            .get_credentials()
            .await
            .map_err(|error| ApiError::credentials(error.to_string()))?;
        Ok(credentials.token)
    }

    async fn authorised(&self, request: RequestBuilder) -> Result<RequestBuilder, ApiError> {
        Ok(match self.token().await? {
            Some(token) => request.bearer_auth(token),
            None => request,
        })
    }

    fn json_request(&self, method: Method, url: Url) -> RequestBuilder {
        self.client
            .request(method, url)
            .header(ACCEPT, JSON_MEDIA_TYPE)
            .header(CONTENT_TYPE, JSON_MEDIA_TYPE)
    }

    async fn fetch_json(&self, request: RequestBuilder) -> Result<(HeaderMap, Value), ApiError> {
        let request = self.authorised(request).await?;
        let response = request.send().await.map_err(map_transport_error)?;
        let status = response.status();
        let headers = response.headers().clone();
        let text = response.text().await.map_err(map_transport_error)?;
        if !status.is_success() {
            warn!(status = status.as_u16(), "InfraKitchen request failed");
            return Err(classify_error(status, &text));
        }
        Ok((headers, parse_success_body(&text)?))
    }

    async fn send_json(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<Value, ApiError> {
        let url = self.endpoint(path)?;
        debug!(%method, %url, "sending InfraKitchen request");
        let mut request = self.json_request(method, url);
        if let Some(body) = body {
            request = request.body(body.to_string());
        }
        let (_, json) = self.fetch_json(request).await?;
        Ok(json)
    }

    async fn get_url(&self, url: Url) -> Result<Value, ApiError> {
        debug!(method = %Method::GET, %url, "sending InfraKitchen request");
        let (_, json) = self.fetch_json(self.json_request(Method::GET, url)).await?;
        Ok(json)
    }
}

#[async_trait]
impl InfraKitchenApi for InfraKitchenApiClient {
    async fn get_list(&self, query: &ListQuery) -> Result<ListResult, ApiError> {
        let range = ItemRange::from_pagination(query.pagination)
            .map_err(|error| ApiError::invalid_request(error.to_string()))?;
        let mut url = self.endpoint(&query.resource)?;
        ListQueryParams::new(&query.sort, range, &query.filter).apply(&mut url);
        debug!(
            resource = %query.resource,
            start = range.start(),
            end = range.end(),
            "listing InfraKitchen resources"
        );

        let request = self
            .json_request(Method::GET, url)
            .header(RANGE, range.range_header(&query.resource));
        let (headers, json) = self.fetch_json(request).await?;

        let total = content_range_total(&headers)?;
        let Value::Array(data) = json else {
            return Err(ApiError::parse(format!(
                "expected a JSON array of {} records",
                query.resource
            )));
        };
        Ok(ListResult { data, total })
    }

    async fn get(&self, path: &str, params: &Map<String, Value>) -> Result<Value, ApiError> {
        let mut url = self.endpoint(path)?;
        append_query(&mut url, params);
        self.get_url(url).await
    }

    async fn post_raw(&self, path: &str, body: &Value) -> Result<Value, ApiError> {
        self.send_json(Method::POST, path, Some(body)).await
    }

    async fn update_raw(&self, path: &str, body: &Value) -> Result<Value, ApiError> {
        self.send_json(Method::PUT, path, Some(body)).await
    }

    async fn patch_raw(&self, path: &str, body: &Value) -> Result<Value, ApiError> {
        self.send_json(Method::PATCH, path, Some(body)).await
    }

    async fn delete_raw(&self, path: &str, body: &Value) -> Result<Value, ApiError> {
        self.send_json(Method::DELETE, path, Some(body)).await
    }

    async fn get_tree(
        &self,
        component: &str,
        id: &str,
        direction: TreeDirection,
    ) -> Result<Value, ApiError> {
        self.send_json(Method::GET, &format!("{component}/{id}/tree/{direction}"), None)
            .await
    }

    async fn get_variable_schema(
        &self,
        id: &str,
        parent_resources: &[String],
    ) -> Result<Value, ApiError> {
        let mut url = self.endpoint(&format!("source_code_versions/{id}/variables"))?;
        url.query_pairs_mut()
            .append_pair("parent_resources", &parent_resources.join(","));
        self.get_url(url).await
    }

    async fn download_file(&self, id: &str) -> Result<Vec<u8>, ApiError> {
        let url = self.endpoint(&format!("{DEBUG_RESOURCE}/{id}/debug"))?;
        debug!(%url, "downloading InfraKitchen debug bundle");
        let request = self.authorised(self.client.get(url)).await?;
        let response = request.send().await.map_err(map_transport_error)?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.map_err(map_transport_error)?;
            warn!(status = status.as_u16(), "InfraKitchen download failed");
            return Err(ApiError::transport(format!(
                "Request failed with {}, {body}",
                status_line(status)
            )));
        }
        let bytes = response.bytes().await.map_err(map_transport_error)?;
        Ok(bytes.to_vec())
    }

    async fn get_token(&self) -> Result<Option<String>, ApiError> {
        self.token().await
    }
}

fn backend_root(base_url: &str) -> Result<Url, ClientBuildError> {
    let raw = format!("{}/{BACKEND_API_PREFIX}", base_url.trim_end_matches('/'));
    Url::parse(&raw).map_err(|source| ClientBuildError::InvalidBaseUrl {
        url: base_url.to_owned(),
        source,
    })
}

fn content_range_total(headers: &HeaderMap) -> Result<u64, ApiError> {
    let Some(value) = headers.get(CONTENT_RANGE) else {
        return Err(ApiError::transport(
            "The Content-Range header is missing in the HTTP response. List responses must \
             carry it with the total number of results to build the pagination. If the \
             backend sits behind CORS, declare Content-Range in \
             Access-Control-Expose-Headers.",
        ));
    };
    let text = value
        .to_str()
        .map_err(|error| ApiError::transport(format!("unreadable Content-Range header: {error}")))?;
    parse_content_range_total(text).map_err(|error| ApiError::transport(error.to_string()))
}

fn parse_success_body(text: &str) -> Result<Value, ApiError> {
    if text.is_empty() {
        return Ok(Value::Object(Map::new()));
    }
    serde_json::from_str(text)
        .map_err(|error| ApiError::parse(format!("Failed to parse JSON response: {error}")))
}

fn classify_error(status: StatusCode, body: &str) -> ApiError {
    let text = status_text(status);
    match serde_json::from_str::<Value>(body) {
        Ok(parsed) => ErrorBodyDto::classify(parsed).into_api_error(status.as_u16(), text),
        Err(_) => ApiError::status_only(status.as_u16(), text),
    }
}

fn status_text(status: StatusCode) -> &'static str {
    status.canonical_reason().unwrap_or("")
}

fn status_line(status: StatusCode) -> String {
    match status_text(status) {
        "" => status.as_u16().to_string(),
        text => format!("{} {text}", status.as_u16()),
    }
}

fn map_transport_error(error: reqwest::Error) -> ApiError {
    if error.is_timeout() {
        ApiError::transport(format!("request timed out: {error}"))
    } else {
        ApiError::transport(error.to_string())
    }
}
