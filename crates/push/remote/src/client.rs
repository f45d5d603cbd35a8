//! reqwest-backed push relay client.

use std::sync::Arc;

use push_core::{NotificationRequest, Subscription, VapidPublicKey};

use crate::{PushService, ServiceError, VapidKeyCache};

#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct VapidKeyResponse {
    public_key: String,
}

/// Push relay reached over HTTP.
#[derive(Debug, Clone)]
pub struct HttpPushService {
    http: reqwest::Client,
    base_url: String,
    vapid: Arc<VapidKeyCache>,
}

impl HttpPushService {
    /// Create a client for the relay at `base_url` with its own key cache.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_cache(base_url, Arc::new(VapidKeyCache::new()))
    }

    /// Create a client sharing an existing key cache.
    pub fn with_cache(base_url: impl Into<String>, vapid: Arc<VapidKeyCache>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();

        Self {
            http: reqwest::Client::new(),
            base_url,
            vapid,
        }
    }

    /// Relay base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The key cache in use.
    pub fn vapid_cache(&self) -> &Arc<VapidKeyCache> {
        &self.vapid
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    /// Fail on non-success status, otherwise hand back the body text.
    async fn read_body(url: &str, response: reqwest::Response) -> Result<String, ServiceError> {
        let status = response.status();
        let body = response.text().await.map_err(|source| ServiceError::Network {
            url: url.to_string(),
            source,
        })?;

        if !status.is_success() {
            return Err(ServiceError::Remote {
                url: url.to_string(),
                status: status.as_u16(),
                body,
            });
        }

        Ok(body)
    }

    async fn fetch_vapid_public_key(&self) -> Result<VapidPublicKey, ServiceError> {
        let url = self.url("vapid-public-key");
        tracing::debug!(url = %url, "fetching VAPID public key");

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|source| ServiceError::Network {
                url: url.clone(),
                source,
            })?;

        let body = Self::read_body(&url, response).await?;
        let parsed: VapidKeyResponse =
            serde_json::from_str(&body).map_err(|source| ServiceError::Decode {
                url: url.clone(),
                source,
            })?;

        Ok(VapidPublicKey::new(parsed.public_key))
    }

    async fn post_json<T: serde::Serialize>(
        &self,
        path: &str,
        body: &T,
    ) -> Result<String, ServiceError> {
        let url = self.url(path);

        let response = self
            .http
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|source| ServiceError::Network {
                url: url.clone(),
                source,
            })?;

        Self::read_body(&url, response).await
    }
}

impl PushService for HttpPushService {
    async fn vapid_public_key(&self) -> Result<VapidPublicKey, ServiceError> {
        self.vapid
            .get_or_fetch(|| self.fetch_vapid_public_key())
            .await
    }

    async fn subscribe(&self, subscription: &Subscription) -> Result<(), ServiceError> {
        self.post_json("subscribe", subscription).await?;
        tracing::info!(endpoint = %subscription.endpoint, "push subscription registered with relay");
        Ok(())
    }

    async fn send_notification(
        &self,
        request: &NotificationRequest,
    ) -> Result<serde_json::Value, ServiceError> {
        let body = self.post_json("send-notification", request).await?;

        // The relay's reply is passed through; plain text stays a string.
        let value = serde_json::from_str(&body).unwrap_or(serde_json::Value::String(body));

        tracing::info!(title = %request.title, response = %value, "push notification sent");
        Ok(value)
    }
}
