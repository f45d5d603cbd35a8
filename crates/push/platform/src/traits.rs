//! Notification provider traits.

use push_core::{
    DeviceToken, ForegroundPolicy, Notification, NotificationCategory, NotificationChannel,
    NotificationId, NotificationRequest, NotificationResponse, PermissionState, PlatformError,
    SchedulingError, Subscription, Trigger, VapidPublicKey,
};

use crate::{ListenerGuard, PlatformKind};

/// User-facing permission prompt.
#[trait_variant::make(Send)]
pub trait PermissionPrompt: Send + Sync {
    /// Ask the user whether notifications may be shown.
    async fn ask(&self) -> PermissionState;
}

/// Platform notification capability.
#[trait_variant::make(Send)]
pub trait NotificationProvider: Send + Sync {
    /// Which platform this provider represents.
    fn platform(&self) -> PlatformKind;

    /// Whether this environment can receive remote push at all.
    fn is_push_capable(&self) -> bool;

    /// Read the current permission state without prompting.
    async fn permission_status(&self) -> Result<PermissionState, PlatformError>;

    /// Run the permission prompt flow and return the resulting state.
    async fn request_permission(&self) -> Result<PermissionState, PlatformError>;

    /// Get the token identifying this install.
    async fn push_token(&self) -> Result<DeviceToken, PlatformError>;

    /// Get the push subscription for this install, created against the
    /// relay's application server key.
    async fn push_subscription(
        &self,
        server_key: &VapidPublicKey,
    ) -> Result<Subscription, PlatformError>;

    /// Create or update a notification channel.
    async fn configure_channel(&self, channel: &NotificationChannel) -> Result<(), PlatformError>;

    /// Set the foreground presentation policy. May only be called once.
    fn set_foreground_policy(&self, policy: ForegroundPolicy) -> Result<(), PlatformError>;

    /// Register a notification category.
    async fn set_category(&self, category: NotificationCategory) -> Result<(), PlatformError>;

    /// Schedule a local notification.
    async fn schedule(
        &self,
        request: NotificationRequest,
        trigger: Trigger,
    ) -> Result<NotificationId, SchedulingError>;

    /// Listen for notifications presented while the app runs.
    fn add_received_listener<F>(&self, listener: F) -> ListenerGuard
    where
        F: Fn(&Notification) + Send + Sync + 'static;

    /// Listen for user interactions with presented notifications.
    fn add_response_listener<F>(&self, listener: F) -> ListenerGuard
    where
        F: Fn(&NotificationResponse) + Send + Sync + 'static;
}
