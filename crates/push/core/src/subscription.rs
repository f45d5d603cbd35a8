//! Web push subscription types.

/// Transport keys a push relay needs to encrypt payloads for one device.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SubscriptionKeys {
    /// Uncompressed P-256 public key, base64url without padding.
    pub p256dh: String,
    /// 16-byte authentication secret, base64url without padding.
    pub auth: String,
}

/// Device subscription registered with the remote push relay.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Subscription {
    /// Delivery endpoint for this device.
    pub endpoint: String,
    /// Transport keys.
    pub keys: SubscriptionKeys,
}

/// Relay's VAPID public key, used as the application server key when
/// creating a subscription.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct VapidPublicKey(String);

impl VapidPublicKey {
    /// Wrap a key as returned by the relay.
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Get the key string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for VapidPublicKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
