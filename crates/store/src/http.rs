//! HTTP/JSON implementation of [`RemoteStore`] using [`reqwest`].
//!
//! Talks to the dashboard backend API. Responses come wrapped in a
//! `{ "data": ... }` envelope. Every request carries the client-level
//! timeout; expiry surfaces as [`StoreError::RemoteUnavailable`].

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use gridboard_core::layout::DashboardLayout;
use gridboard_core::types::UserId;
use gridboard_core::widget::{Widget, WidgetDraft};

use crate::error::StoreError;
use crate::remote::RemoteStore;

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Response envelope used by the backend API.
#[derive(Debug, Deserialize)]
struct DataResponse<T> {
    data: T,
}

/// HTTP client for the remote widget store.
pub struct HttpRemoteStore {
    client: reqwest::Client,
    base_url: String,
}

impl HttpRemoteStore {
    /// Create a client for the API at `base_url` (e.g.
    /// `http://host:3000`), with a per-request `timeout`.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("HTTP client construction with a timeout cannot fail");
        Self::with_client(client, base_url)
    }

    /// Create a client reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

/// Map a transport-level failure (network, DNS, TLS, timeout).
fn transport(err: reqwest::Error) -> StoreError {
    StoreError::RemoteUnavailable(err.to_string())
}

/// Map a non-2xx HTTP status to a store error.
///
/// 400 and 422 mean the store rejected the payload; everything else is
/// treated as the remote being unavailable.
fn status_error(status: reqwest::StatusCode, body: String) -> StoreError {
    match status.as_u16() {
        400 | 422 => StoreError::Validation(body),
        _ => StoreError::RemoteUnavailable(format!("HTTP {status}: {body}")),
    }
}

/// Unwrap a `{ "data": ... }` envelope or map the error status.
async fn parse_data<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, StoreError> {
    let status = response.status();
    if status.is_success() {
        let envelope: DataResponse<T> = response.json().await.map_err(transport)?;
        Ok(envelope.data)
    } else {
        let body = response.text().await.unwrap_or_default();
        Err(status_error(status, body))
    }
}

/// Check a response that carries no body of interest.
async fn expect_success(response: reqwest::Response) -> Result<(), StoreError> {
    let status = response.status();
    if status.is_success() {
        Ok(())
    } else {
        let body = response.text().await.unwrap_or_default();
        Err(status_error(status, body))
    }
}

#[async_trait]
impl RemoteStore for HttpRemoteStore {
    async fn fetch_widgets(&self, user_id: &UserId) -> Result<Vec<Widget>, StoreError> {
        let response = self
            .client
            .get(self.url(&format!("/api/v1/users/{user_id}/widgets")))
            .send()
            .await
            .map_err(transport)?;
        parse_data(response).await
    }

    async fn fetch_layout(
        &self,
        user_id: &UserId,
    ) -> Result<Option<DashboardLayout>, StoreError> {
        let response = self
            .client
            .get(self.url(&format!("/api/v1/users/{user_id}/layout")))
            .send()
            .await
            .map_err(transport)?;

        // No stored layout yet is a normal outcome, not an error.
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        parse_data(response).await.map(Some)
    }

    async fn create_widget(&self, draft: &WidgetDraft) -> Result<Widget, StoreError> {
        let response = self
            .client
            .post(self.url("/api/v1/widgets"))
            .json(draft)
            .send()
            .await
            .map_err(transport)?;
        parse_data(response).await
    }

    async fn update_widget(&self, widget: &Widget) -> Result<Widget, StoreError> {
        let response = self
            .client
            .put(self.url(&format!("/api/v1/widgets/{}", widget.id)))
            .json(widget)
            .send()
            .await
            .map_err(transport)?;
        parse_data(response).await
    }

    async fn delete_widget(&self, id: &str) -> Result<(), StoreError> {
        let response = self
            .client
            .delete(self.url(&format!("/api/v1/widgets/{id}")))
            .send()
            .await
            .map_err(transport)?;

        // Deleting an already-deleted widget is a success.
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(());
        }
        expect_success(response).await
    }

    async fn save_layout(&self, user_id: &UserId, widgets: &[Widget]) -> Result<(), StoreError> {
        let body = serde_json::json!({ "widgets": widgets });
        let response = self
            .client
            .put(self.url(&format!("/api/v1/users/{user_id}/layout")))
            .json(&body)
            .send()
            .await
            .map_err(transport)?;
        expect_success(response).await
    }
}
