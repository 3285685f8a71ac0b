//! HTTP transport for the GreenSpace REST backend

use async_trait::async_trait;
use reqwest::{Client, Method, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use shared::response::ApiProblem;

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};

/// JSON-over-HTTP transport.
///
/// Everything above the transport (fetcher, dispatchers, wallet) is
/// generic over this trait so it can run against an in-memory backend.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T>;
    async fn post<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T>;
    async fn put<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T>;
    async fn delete<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T>;
    fn token(&self) -> Option<&str>;
    fn set_token(&mut self, token: Option<String>);
}

/// Network HTTP client
#[derive(Debug, Clone)]
pub struct NetworkHttpClient {
    client: Client,
    base_url: String,
    fallback_base_url: Option<String>,
    token: Option<String>,
}

impl NetworkHttpClient {
    /// Create a new HTTP client from configuration
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout))
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            fallback_base_url: config
                .fallback_base_url
                .as_ref()
                .map(|u| u.trim_end_matches('/').to_string()),
            token: config.token.clone(),
        })
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Set the authentication token
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    fn auth_header(&self) -> Option<String> {
        self.token.as_ref().map(|t| format!("Bearer {}", t))
    }

    fn build(
        &self,
        base: &str,
        method: Method,
        path: &str,
        body: Option<&serde_json::Value>,
    ) -> reqwest::RequestBuilder {
        let url = join_url(base, path);
        let mut req = self.client.request(method, &url);
        if let Some(body) = body {
            req = req.json(body);
        }
        if let Some(auth) = self.auth_header() {
            req = req.header(reqwest::header::AUTHORIZATION, auth);
        }
        req
    }

    /// Send once against the primary URL, then once against the fallback.
    ///
    /// Any method retries when the primary refused the connection. A
    /// timeout retries only a GET: a write that timed out may already
    /// have been applied.
    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<&serde_json::Value>,
    ) -> ClientResult<reqwest::Response> {
        tracing::debug!(%method, path, "request");
        let primary = self
            .build(&self.base_url, method.clone(), path, body)
            .send()
            .await;
        match primary {
            Ok(response) => Ok(response),
            Err(e) if e.is_connect() || (e.is_timeout() && method == Method::GET) => {
                let Some(fallback) = self.fallback_base_url.as_deref() else {
                    return Err(e.into());
                };
                tracing::warn!(error = %e, fallback, path, "Primary API unreachable, retrying on fallback");
                Ok(self.build(fallback, method, path, body).send().await?)
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<serde_json::Value>,
    ) -> ClientResult<T> {
        let response = self.send(method, path, body.as_ref()).await?;
        let status = response.status();
        let text = response.text().await?;
        handle_response(status, &text)
    }
}

#[async_trait]
impl HttpClient for NetworkHttpClient {
    async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        self.execute(Method::GET, path, None).await
    }

    async fn post<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        let body = serde_json::to_value(body)?;
        self.execute(Method::POST, path, Some(body)).await
    }

    async fn put<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        let body = serde_json::to_value(body)?;
        self.execute(Method::PUT, path, Some(body)).await
    }

    async fn delete<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        self.execute(Method::DELETE, path, None).await
    }

    fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    fn set_token(&mut self, token: Option<String>) {
        self.token = token;
    }
}

/// Join a base URL and an API path with exactly one slash.
pub fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// Map a status and body to a typed result.
///
/// An empty success body decodes as JSON `null`, so `()` and
/// `serde_json::Value` work for endpoints that return nothing.
pub fn handle_response<T: DeserializeOwned>(status: StatusCode, text: &str) -> ClientResult<T> {
    if !status.is_success() {
        if let Some(problem) = ApiProblem::parse(text) {
            return Err(match status {
                StatusCode::UNAUTHORIZED => ClientError::Unauthorized,
                StatusCode::NOT_FOUND => ClientError::NotFound(problem.summary()),
                _ => ClientError::Api {
                    status: status.as_u16(),
                    message: problem.summary(),
                },
            });
        }
        let text = text.to_string();
        return Err(match status {
            StatusCode::UNAUTHORIZED => ClientError::Unauthorized,
            StatusCode::FORBIDDEN => ClientError::Forbidden(text),
            StatusCode::NOT_FOUND => ClientError::NotFound(text),
            StatusCode::BAD_REQUEST => ClientError::Validation(text),
            _ => ClientError::Internal(text),
        });
    }
    let text = text.trim();
    if text.is_empty() {
        return Ok(serde_json::from_str("null")?);
    }
    Ok(serde_json::from_str(text)?)
}
