//! Notification client.

use push_core::{
    DeviceToken, NotificationChannel, NotificationData, NotificationId, NotificationRequest,
    SchedulingError, Trigger, VapidPublicKey,
};
use push_platform::NotificationProvider;
use push_remote::{PushService, ServiceError};

use crate::RegistrationError;

/// Front door for registering, scheduling, and broadcasting notifications.
///
/// Concurrent registrations are not coordinated: each call that gets past the
/// permission check sends its own subscription to the relay.
pub struct NotificationClient<P, R> {
    provider: P,
    relay: R,
    channel: Option<NotificationChannel>,
    category: Option<String>,
}

impl<P, R> NotificationClient<P, R>
where
    P: NotificationProvider,
    R: PushService,
{
    /// Create a client that configures the default channel on registration.
    pub fn new(provider: P, relay: R) -> Self {
        Self {
            provider,
            relay,
            channel: Some(NotificationChannel::default()),
            category: None,
        }
    }

    /// Channel to configure when registering, or none.
    pub fn with_channel(mut self, channel: Option<NotificationChannel>) -> Self {
        self.channel = channel;
        self
    }

    /// Category attached to local notifications.
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// The platform provider.
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// The push relay.
    pub fn relay(&self) -> &R {
        &self.relay
    }

    /// Register this device for push.
    ///
    /// Returns `None` when permission is refused, the device cannot receive
    /// push, or any step fails. Failures are logged, never retried.
    pub async fn register(&self) -> Option<DeviceToken> {
        match self.try_register().await {
            Ok(token) => Some(token),
            Err(e) if e.is_expected() => {
                tracing::info!(reason = %e, "push registration skipped");
                None
            }
            Err(e) => {
                tracing::error!(error = %e, "push registration failed");
                None
            }
        }
    }

    /// Register this device for push, reporting why no token was produced.
    pub async fn try_register(&self) -> Result<DeviceToken, RegistrationError> {
        if let Some(channel) = &self.channel {
            self.provider.configure_channel(channel).await?;
        }

        if !self.provider.is_push_capable() {
            return Err(RegistrationError::DeviceIncapable);
        }

        let mut permission = self.provider.permission_status().await?;
        if !permission.is_granted() {
            permission = self.provider.request_permission().await?;
        }

        if !permission.is_granted() {
            return Err(RegistrationError::PermissionDenied(permission));
        }

        let token = self.provider.push_token().await?;
        let server_key = self.relay.vapid_public_key().await?;
        let subscription = self.provider.push_subscription(&server_key).await?;

        self.relay.subscribe(&subscription).await?;

        tracing::info!(token = %token, platform = %self.provider.platform(), "registered for push");
        Ok(token)
    }

    /// The relay's VAPID public key, fetched at most once.
    pub async fn public_vapid_key(&self) -> Result<VapidPublicKey, ServiceError> {
        self.relay.vapid_public_key().await
    }

    /// Show a notification on this device after `delay_seconds`.
    ///
    /// Works offline and without push registration.
    pub async fn schedule_local(
        &self,
        title: impl Into<String>,
        body: impl Into<String>,
        data: NotificationData,
        delay_seconds: u64,
    ) -> Result<NotificationId, SchedulingError> {
        let mut request = NotificationRequest::new(title, body, data);
        if let Some(category) = &self.category {
            request = request.with_category(category.clone());
        }

        let id = self
            .provider
            .schedule(request, Trigger::from_secs(delay_seconds))
            .await
            .inspect_err(|e| tracing::warn!(error = %e, "failed to schedule local notification"))?;

        tracing::info!(id = %id, delay_seconds, "local notification scheduled");
        Ok(id)
    }

    /// Ask the relay to deliver a notification to every subscribed device.
    ///
    /// Returns the relay's response unchanged.
    pub async fn send_push(
        &self,
        title: impl Into<String>,
        body: impl Into<String>,
        data: NotificationData,
    ) -> Result<serde_json::Value, ServiceError> {
        let request = NotificationRequest::new(title, body, data);

        self.relay
            .send_notification(&request)
            .await
            .inspect_err(|e| tracing::error!(error = %e, "failed to send push notification"))
    }
}
