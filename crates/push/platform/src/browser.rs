//! Browser provider.
//!
//! Browsers show notifications right away through the page's permission, with
//! no app badge, sound control, channels, or categories. Push registration is
//! not offered from here.

use std::sync::{Arc, Mutex};

use push_core::{
    DeviceToken, ForegroundPolicy, Notification, NotificationCategory, NotificationChannel,
    NotificationId, NotificationRequest, NotificationResponse, PermissionState, PlatformError,
    Presentation, SchedulingError, Subscription, Trigger, VapidPublicKey,
};

use crate::center::lock;
use crate::{ListenerGuard, NotificationCenter, NotificationProvider, PermissionPrompt, PlatformKind};

/// Provider backed by the browser Notification API.
pub struct BrowserProvider<Q> {
    prompt: Q,
    permission: Mutex<PermissionState>,
    center: Arc<NotificationCenter>,
}

impl<Q: PermissionPrompt> BrowserProvider<Q> {
    /// Create a provider with undetermined permission.
    pub fn new(prompt: Q) -> Self {
        Self {
            prompt,
            permission: Mutex::new(PermissionState::Undetermined),
            center: NotificationCenter::new(),
        }
    }

    /// Start from an already settled permission state.
    pub fn with_permission(self, state: PermissionState) -> Self {
        *lock(&self.permission) = state;
        self
    }

    /// The notification center backing this provider.
    pub fn center(&self) -> &Arc<NotificationCenter> {
        &self.center
    }

    /// The permission prompt.
    pub fn prompt(&self) -> &Q {
        &self.prompt
    }
}

impl<Q: PermissionPrompt> NotificationProvider for BrowserProvider<Q> {
    fn platform(&self) -> PlatformKind {
        PlatformKind::Browser
    }

    fn is_push_capable(&self) -> bool {
        false
    }

    async fn permission_status(&self) -> Result<PermissionState, PlatformError> {
        Ok(*lock(&self.permission))
    }

    async fn request_permission(&self) -> Result<PermissionState, PlatformError> {
        let current = *lock(&self.permission);
        if !current.can_prompt() {
            return Ok(current);
        }

        let answer = self.prompt.ask().await;

        let mut state = lock(&self.permission);
        *state = state.resolve(answer);
        Ok(*state)
    }

    async fn push_token(&self) -> Result<DeviceToken, PlatformError> {
        Err(PlatformError::Unsupported("push registration"))
    }

    async fn push_subscription(
        &self,
        _server_key: &VapidPublicKey,
    ) -> Result<Subscription, PlatformError> {
        Err(PlatformError::Unsupported("push registration"))
    }

    async fn configure_channel(&self, channel: &NotificationChannel) -> Result<(), PlatformError> {
        tracing::debug!(channel = %channel.id, "browser has no channels, ignoring");
        Ok(())
    }

    fn set_foreground_policy(&self, _policy: ForegroundPolicy) -> Result<(), PlatformError> {
        tracing::debug!("browser decides foreground presentation, ignoring policy");
        Ok(())
    }

    async fn set_category(&self, category: NotificationCategory) -> Result<(), PlatformError> {
        tracing::debug!(category = %category.identifier, "browser has no categories, ignoring");
        Ok(())
    }

    async fn schedule(
        &self,
        request: NotificationRequest,
        trigger: Trigger,
    ) -> Result<NotificationId, SchedulingError> {
        let state = *lock(&self.permission);
        if !state.is_granted() {
            return Err(SchedulingError::PermissionDenied(state));
        }

        let presentation = Presentation {
            alert: true,
            sound: false,
            badge: false,
        };

        Ok(self.center.schedule(request, trigger, presentation))
    }

    fn add_received_listener<F>(&self, listener: F) -> ListenerGuard
    where
        F: Fn(&Notification) + Send + Sync + 'static,
    {
        self.center.add_received_listener(listener)
    }

    fn add_response_listener<F>(&self, listener: F) -> ListenerGuard
    where
        F: Fn(&NotificationResponse) + Send + Sync + 'static,
    {
        self.center.add_response_listener(listener)
    }
}

#[cfg(test)]
mod tests {
    use push_core::NotificationData;

    use super::*;
    use crate::FixedPrompt;

    #[tokio::test]
    async fn test_browser_cannot_register_for_push() {
        let provider = BrowserProvider::new(FixedPrompt::granting());

        assert!(!provider.is_push_capable());
        assert!(matches!(
            provider.push_token().await,
            Err(PlatformError::Unsupported(_))
        ));
    }

    #[tokio::test]
    async fn test_browser_shows_alert_only() {
        let provider = BrowserProvider::new(FixedPrompt::granting());
        provider.request_permission().await.unwrap();

        provider
            .schedule(
                NotificationRequest::new("T", "B", NotificationData::new()),
                Trigger::Immediate,
            )
            .await
            .unwrap();

        let presented = provider.center().presented();
        assert_eq!(
            presented[0].presentation,
            Presentation {
                alert: true,
                sound: false,
                badge: false,
            }
        );
        assert_eq!(provider.center().badge_count(), 0);
    }

    #[tokio::test]
    async fn test_browser_schedule_needs_permission() {
        let provider = BrowserProvider::new(FixedPrompt::denying());
        provider.request_permission().await.unwrap();

        let result = provider
            .schedule(
                NotificationRequest::new("T", "B", NotificationData::new()),
                Trigger::Immediate,
            )
            .await;

        assert!(matches!(
            result,
            Err(SchedulingError::PermissionDenied(PermissionState::Denied))
        ));
    }
}
