//! User-lookup API client.

use axum::http::HeaderMap;
use serde::de::DeserializeOwned;
use url::Url;

use crate::client::types::{BriefUser, ClientError, ClientResult, UserDetail};
use crate::trace::{propagation, TraceContext};

/// Thin wrapper over the user-lookup HTTP API.
#[derive(Debug, Clone)]
pub struct UserClient {
    http: reqwest::Client,
    base_url: Url,
}

impl UserClient {
    /// Create a client against the given base address.
    pub fn new(base_url: Url) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    /// Create a client reusing an existing connection pool.
    pub fn with_client(http: reqwest::Client, mut base_url: Url) -> Self {
        // Url::join drops the last path segment unless the base ends in '/'.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Self { http, base_url }
    }

    /// List all users: GET `{base}/external`.
    pub async fn list_users(&self, ctx: &TraceContext) -> ClientResult<Vec<BriefUser>> {
        let url = self.endpoint("external")?;
        self.get_json(url, ctx).await
    }

    /// Fetch one user's detail record: GET `{base}/external/{id}`.
    ///
    /// `id` must be non-empty; an empty or whitespace-only id fails with
    /// `InvalidArgument` before any network call is made.
    pub async fn user_detail(&self, ctx: &TraceContext, id: &str) -> ClientResult<UserDetail> {
        if id.trim().is_empty() {
            return Err(ClientError::InvalidArgument(
                "user id must not be empty".to_string(),
            ));
        }
        let url = self.endpoint(&format!("external/{}", id))?;
        self.get_json(url, ctx).await
    }

    fn endpoint(&self, relative: &str) -> ClientResult<Url> {
        self.base_url
            .join(relative)
            .map_err(|e| ClientError::InvalidArgument(format!("bad path '{}': {}", relative, e)))
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url, ctx: &TraceContext) -> ClientResult<T> {
        let mut headers = HeaderMap::new();
        propagation::inject(ctx, &mut headers);

        tracing::debug!(url = %url, trace_id = %ctx.trace_id, "Outbound user-lookup call");

        let response = self
            .http
            .get(url.clone())
            .headers(headers)
            .send()
            .await
            .map_err(|e| ClientError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Transport(format!(
                "{} returned status {}",
                url, status
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| ClientError::Transport(e.to_string()))?;

        serde_json::from_str(&body).map_err(|e| ClientError::Decode(e.to_string()))
    }
}
