//! Push relay traits.

use push_core::{NotificationRequest, Subscription, VapidPublicKey};

use crate::ServiceError;

/// Remote push relay contract.
#[trait_variant::make(Send)]
pub trait PushService: Send + Sync {
    /// Get the relay's VAPID public key.
    async fn vapid_public_key(&self) -> Result<VapidPublicKey, ServiceError>;

    /// Register a device subscription.
    async fn subscribe(&self, subscription: &Subscription) -> Result<(), ServiceError>;

    /// Ask the relay to deliver a notification to every subscribed device.
    ///
    /// Returns the relay's response body unchanged.
    async fn send_notification(
        &self,
        request: &NotificationRequest,
    ) -> Result<serde_json::Value, ServiceError>;
}
