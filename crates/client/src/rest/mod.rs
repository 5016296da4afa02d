//! Admin REST API client.
//!
//! Provides the remote side of candidate-source browsing: the paged search
//! that fills a screen, and the mutating calls whose success makes cached
//! pages stale.
//!
//! ### Endpoints
//!
//! - **Base URL**: `{api_base_url}` (e.g. `https://tc.example.org/api/admin`), all paths relative to it.
//! - **Authentication**: `Authorization: Bearer <token>`; the token is only required once a call is made.
//! - **Paged search**: `POST saved-list-candidate/{id}/search-paged` or
//!   `POST saved-search-candidate/{id}/search-paged`, zero-based page number in the body.
//! - **List contents**: `PUT saved-list-candidate/{id}/{merge|replace|remove}`.
//! - **Per-source actions**: `PUT {saved-list|saved-search}/{action}/{id}` for
//!   `copy`, `shared-add`, `shared-remove`, `watcher-add`, `watcher-remove`, and
//!   `save-selection` (searches only).
//! - **Status update**: `PUT candidate/status`.
//! - **Errors**: 401/403 map to `AuthError`; other 4xx/5xx carry the server's `message` when present.

pub mod error;
pub mod request;

pub use error::ApiError;
pub use request::{
    ContentUpdateType, CopySourceContentsRequest, SaveSelectionRequest, StatusInfo, StatusUpdateRequest,
    UpdateCandidatesRequest, UserRequest,
};

use async_trait::async_trait;
use reqwest::{Method, header};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tcs_core::{AppConfig, CandidateSource, PagedSearchRequest, RemoteSearch, SavedList, SearchPage, SourceKind};
use url::Url;

use crate::mutate::{ListContentsOp, MutationApi};

/// Default request timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default user agent.
const DEFAULT_USER_AGENT: &str = "tc-sources/0.1";

/// Admin API client configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL of the admin API.
    pub base_url: String,
    /// Bearer token from TC_SOURCES_API_TOKEN.
    pub token: Option<String>,
    /// Request timeout (default: 30s).
    pub timeout: Duration,
    /// User-agent string (default: tc-sources/0.x).
    pub user_agent: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080/api/admin".to_string(),
            token: None,
            timeout: DEFAULT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl From<&AppConfig> for ApiConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            base_url: config.api_base_url.clone(),
            token: config.api_token.clone(),
            timeout: config.timeout(),
            user_agent: config.user_agent.clone(),
        }
    }
}

/// Error body returned by the admin API.
#[derive(Debug, serde::Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
}

/// Extract the server's error message from a failed response body.
fn error_message(body: &[u8]) -> Option<String> {
    serde_json::from_slice::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.message)
        .filter(|m| !m.trim().is_empty())
}

/// Admin REST API client.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base: Url,
    config: ApiConfig,
}

impl ApiClient {
    /// Create a new client with the given configuration.
    ///
    /// A missing token is not an error here; calls fail with
    /// [`ApiError::MissingToken`] until one is configured.
    pub fn new(config: ApiConfig) -> Result<Self, ApiError> {
        let base = Self::parse_base(&config.base_url)?;

        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ApiError::Network(Arc::new(e)))?;

        Ok(Self { http, base, config })
    }

    pub fn from_app_config(config: &AppConfig) -> Result<Self, ApiError> {
        Self::new(ApiConfig::from(config))
    }

    /// Base URL with exactly one trailing slash so relative joins keep the last segment.
    fn parse_base(base_url: &str) -> Result<Url, ApiError> {
        let base = format!("{}/", base_url.trim_end_matches('/'));
        let url = Url::parse(&base).map_err(|e| ApiError::InvalidUrl(format!("{base_url}: {e}")))?;
        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(ApiError::InvalidUrl(format!("unsupported scheme: {other}"))),
        }
    }

    pub fn url(&self, path: &str) -> Result<Url, ApiError> {
        self.base.join(path).map_err(|e| ApiError::InvalidUrl(format!("{path}: {e}")))
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    async fn send<B: Serialize + ?Sized>(
        &self, method: Method, path: &str, body: &B,
    ) -> Result<reqwest::Response, ApiError> {
        let token = self.config.token.as_deref().filter(|t| !t.is_empty()).ok_or(ApiError::MissingToken)?;
        let url = self.url(path)?;

        let response = self
            .http
            .request(method, url)
            .bearer_auth(token)
            .header(header::ACCEPT, "application/json")
            .header(header::USER_AGENT, &self.config.user_agent)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        tracing::debug!("admin API {} -> {}", path, status);

        if status == 401 || status == 403 {
            return Err(ApiError::AuthError { status: status.as_u16() });
        }

        if status.is_client_error() || status.is_server_error() {
            let body = response.bytes().await.unwrap_or_default();
            return Err(ApiError::HttpError { status: status.as_u16(), message: error_message(&body) });
        }

        Ok(response)
    }

    async fn send_for<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self, method: Method, path: &str, body: &B,
    ) -> Result<T, ApiError> {
        let response = self.send(method, path, body).await?;
        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| ApiError::Parse(e.to_string()))
    }

    /// Fetch one page of a source's candidates.
    pub async fn fetch_page(
        &self, source: &CandidateSource, request: &PagedSearchRequest,
    ) -> Result<SearchPage, ApiError> {
        let start = Instant::now();
        let path = request::search_paged_path(source);

        tracing::debug!("searching {}: page={} size={}", source, request.page_number, request.page_size);

        let page: SearchPage = self.send_for(Method::POST, &path, request).await?;

        tracing::debug!(
            "search completed in {:?}, {} of {} results",
            start.elapsed(),
            page.content.len(),
            page.total_elements
        );

        Ok(page)
    }
}

#[async_trait]
impl RemoteSearch for ApiClient {
    async fn search_paged(
        &self, source: &CandidateSource, request: &PagedSearchRequest,
    ) -> Result<SearchPage, tcs_core::Error> {
        request.validate()?;
        Ok(self.fetch_page(source, request).await?)
    }
}

#[async_trait]
impl MutationApi for ApiClient {
    async fn update_list_contents(
        &self, list_id: i64, op: ListContentsOp, request: &UpdateCandidatesRequest,
    ) -> Result<(), ApiError> {
        request.validate()?;
        self.send(Method::PUT, &request::list_contents_path(list_id, op.path()), request).await?;
        Ok(())
    }

    async fn update_status(&self, request: &StatusUpdateRequest) -> Result<(), ApiError> {
        request.validate()?;
        self.send(Method::PUT, "candidate/status", request).await?;
        Ok(())
    }

    async fn set_starred(&self, source: &CandidateSource, user_id: i64, starred: bool) -> Result<(), ApiError> {
        let action = if starred { "shared-add" } else { "shared-remove" };
        self.send(Method::PUT, &request::action_path(source, action), &UserRequest { user_id }).await?;
        Ok(())
    }

    async fn set_watching(&self, source: &CandidateSource, user_id: i64, watching: bool) -> Result<(), ApiError> {
        let action = if watching { "watcher-add" } else { "watcher-remove" };
        self.send(Method::PUT, &request::action_path(source, action), &UserRequest { user_id }).await?;
        Ok(())
    }

    async fn save_selection(
        &self, search: &CandidateSource, request: &SaveSelectionRequest,
    ) -> Result<SavedList, ApiError> {
        if search.kind() != SourceKind::SavedSearch {
            return Err(ApiError::InvalidRequest(format!("{search} is not a saved search")));
        }
        request.validate()?;
        self.send_for(Method::PUT, &request::action_path(search, "save-selection"), request).await
    }

    async fn copy(&self, source: &CandidateSource, request: &CopySourceContentsRequest) -> Result<SavedList, ApiError> {
        request.validate()?;
        self.send_for(Method::PUT, &request::action_path(source, "copy"), request).await
    }
}
