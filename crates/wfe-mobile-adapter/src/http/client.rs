/*
[INPUT]:  HTTP configuration (base URL, timeouts) and bearer tokens
[OUTPUT]: Configured reqwest clients ready for API calls
[POS]:    HTTP layer - client factory and request plumbing
[UPDATE]: When adding connection options or changing request headers
*/

use std::fmt;
use std::time::Duration;

use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Client, Method, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::http::{Result, WfeError};

/// Default base URL of the workflow engine REST API
pub const DEFAULT_BASE_URL: &str = "https://wf.processtech.ru/restapi/";

const JSON_MIME: &str = "application/json";

/// HTTP client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub timeout: Duration,
    pub connect_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
        }
    }
}

/// Unauthenticated client and factory for token-bound clients.
///
/// Cloning is cheap: the connection pool is shared.
#[derive(Debug, Clone)]
pub struct WfeClient {
    http_client: Client,
    base_url: Url,
}

impl WfeClient {
    /// Create a new client with default configuration
    pub fn new() -> Result<Self> {
        Self::with_config(ClientConfig::default())
    }

    /// Create a new client with custom configuration
    pub fn with_config(config: ClientConfig) -> Result<Self> {
        Self::with_config_and_base_url(config, DEFAULT_BASE_URL)
    }

    /// Create a new client with custom configuration and base URL
    pub fn with_config_and_base_url(config: ClientConfig, base_url: &str) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .build()
            .map_err(|e| WfeError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http_client,
            base_url: normalize_base_url(base_url)?,
        })
    }

    /// Base URL all endpoints are resolved against
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Bind a bearer token. Never fails; errors surface when requests are sent.
    pub fn authenticated(&self, token: impl Into<String>) -> AuthenticatedClient {
        AuthenticatedClient {
            http_client: self.http_client.clone(),
            base_url: self.base_url.clone(),
            token: token.into(),
        }
    }

    /// Build request builder for endpoints that need no token
    pub(crate) fn request(&self, method: Method, endpoint: &str) -> Result<RequestBuilder> {
        let url = join_endpoint(&self.base_url, endpoint)?;
        debug!(%method, endpoint, "building request");
        Ok(self
            .http_client
            .request(method, url)
            .header(CONTENT_TYPE, JSON_MIME))
    }
}

/// Request client bound to a bearer token
#[derive(Clone)]
pub struct AuthenticatedClient {
    http_client: Client,
    base_url: Url,
    token: String,
}

impl fmt::Debug for AuthenticatedClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthenticatedClient")
            .field("base_url", &self.base_url.as_str())
            .field("token", &"<redacted>")
            .finish()
    }
}

impl AuthenticatedClient {
    /// Base URL all endpoints are resolved against
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Build request builder carrying the bearer token and JSON headers
    pub(crate) fn request(&self, method: Method, endpoint: &str) -> Result<RequestBuilder> {
        let url = join_endpoint(&self.base_url, endpoint)?;
        debug!(%method, endpoint, "building authenticated request");
        Ok(self
            .http_client
            .request(method, url)
            .bearer_auth(&self.token)
            .header(CONTENT_TYPE, JSON_MIME)
            .header(ACCEPT, JSON_MIME))
    }

    /// Send a request and decode a JSON body
    pub(crate) async fn send_json<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T> {
        let response = send_checked(builder).await?;
        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(WfeError::from)
    }

    /// Send a listing request; 404, an empty body and `null` all mean "nothing"
    pub(crate) async fn send_list<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
    ) -> Result<Vec<T>> {
        self.send_optional::<Vec<T>>(builder)
            .await
            .map(Option::unwrap_or_default)
    }

    /// Like `send_json`, with 404, an empty body and `null` decoding to `None`
    pub(crate) async fn send_optional<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
    ) -> Result<Option<T>> {
        let response = match send_checked(builder).await {
            Ok(response) => response,
            Err(err) if err.status() == Some(404) => {
                debug!("listing not found, treating as empty");
                return Ok(None);
            }
            Err(err) => return Err(err),
        };
        let bytes = response.bytes().await?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(None);
        }
        serde_json::from_slice::<Option<T>>(&bytes).map_err(WfeError::from)
    }

    /// Send a request whose response body is irrelevant
    pub(crate) async fn send_empty(&self, builder: RequestBuilder) -> Result<()> {
        send_checked(builder).await.map(|_| ())
    }
}

/// Send a request, mapping non-2xx responses to `RequestFailure`
pub(crate) async fn send_checked(builder: RequestBuilder) -> Result<Response> {
    let response = builder.send().await.map_err(|e| {
        warn!(error = %e, "request transport failure");
        WfeError::from(e)
    })?;

    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let url = response.url().path().to_string();
    let body = response.text().await.unwrap_or_default();
    warn!(status = status.as_u16(), path = %url, "request rejected by server");
    Err(WfeError::request_failure(status, body))
}

fn normalize_base_url(base_url: &str) -> Result<Url> {
    let trimmed = base_url.trim();
    if trimmed.is_empty() {
        return Err(WfeError::Config("base URL must not be empty".to_string()));
    }
    let with_slash = if trimmed.ends_with('/') {
        trimmed.to_string()
    } else {
        format!("{trimmed}/")
    };
    Ok(Url::parse(&with_slash)?)
}

/// Resolve an endpoint relative to the base so deployment prefixes survive
fn join_endpoint(base: &Url, endpoint: &str) -> Result<Url> {
    Ok(base.join(endpoint.trim_start_matches('/'))?)
}
