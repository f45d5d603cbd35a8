//! Native device provider.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, OnceLock};

use push_core::{
    DeviceToken, ForegroundPolicy, Notification, NotificationCategory, NotificationChannel,
    NotificationId, NotificationRequest, NotificationResponse, PermissionState, PlatformError,
    SchedulingError, Subscription, SubscriptionKeys, Trigger, VapidPublicKey,
};

use crate::center::lock;
use crate::{ListenerGuard, NotificationCenter, NotificationProvider, PermissionPrompt, PlatformKind};

/// Native provider settings.
#[derive(Debug, Clone)]
pub struct NativeConfig {
    /// Physical device. Simulators and emulators cannot receive push.
    pub is_device: bool,
    /// Base URL the per-install push endpoint is built from.
    pub endpoint_base: String,
}

impl Default for NativeConfig {
    fn default() -> Self {
        Self {
            is_device: true,
            endpoint_base: "https://push.localhost/device".to_string(),
        }
    }
}

/// Identity issued once per install.
struct Install {
    token: DeviceToken,
    keys: SubscriptionKeys,
}

impl Install {
    fn issue() -> Self {
        let token = DeviceToken::new(uuid::Uuid::new_v4().simple().to_string());
        tracing::debug!(token = %token, "issued install token");

        Self {
            token,
            keys: crate::generate_subscription_keys(),
        }
    }
}

/// Provider for native mobile devices.
pub struct NativeProvider<Q> {
    config: NativeConfig,
    prompt: Q,
    permission: Mutex<PermissionState>,
    install: OnceLock<Install>,
    foreground: OnceLock<ForegroundPolicy>,
    channels: Mutex<HashMap<String, NotificationChannel>>,
    center: Arc<NotificationCenter>,
}

impl<Q: PermissionPrompt> NativeProvider<Q> {
    /// Create a provider with undetermined permission.
    pub fn new(config: NativeConfig, prompt: Q) -> Self {
        Self {
            config,
            prompt,
            permission: Mutex::new(PermissionState::Undetermined),
            install: OnceLock::new(),
            foreground: OnceLock::new(),
            channels: Mutex::new(HashMap::new()),
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

    /// A configured channel by id.
    pub fn channel(&self, id: &str) -> Option<NotificationChannel> {
        lock(&self.channels).get(id).cloned()
    }

    fn install(&self) -> Result<&Install, PlatformError> {
        if !self.config.is_device {
            return Err(PlatformError::DeviceIncapable);
        }

        let state = *lock(&self.permission);
        if !state.is_granted() {
            return Err(PlatformError::NotPermitted(state));
        }

        Ok(self.install.get_or_init(Install::issue))
    }
}

impl<Q: PermissionPrompt> NotificationProvider for NativeProvider<Q> {
    fn platform(&self) -> PlatformKind {
        PlatformKind::Native
    }

    fn is_push_capable(&self) -> bool {
        self.config.is_device
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
        let resolved = state.resolve(answer);
        *state = resolved;
        tracing::info!(permission = %resolved, "permission prompt answered");

        Ok(resolved)
    }

    async fn push_token(&self) -> Result<DeviceToken, PlatformError> {
        Ok(self.install()?.token.clone())
    }

    async fn push_subscription(
        &self,
        server_key: &VapidPublicKey,
    ) -> Result<Subscription, PlatformError> {
        let install = self.install()?;
        let endpoint = format!(
            "{}/{}",
            self.config.endpoint_base.trim_end_matches('/'),
            install.token
        );

        tracing::debug!(endpoint = %endpoint, server_key = %server_key, "created push subscription");

        Ok(Subscription {
            endpoint,
            keys: install.keys.clone(),
        })
    }

    async fn configure_channel(&self, channel: &NotificationChannel) -> Result<(), PlatformError> {
        tracing::debug!(channel = %channel.id, importance = ?channel.importance, "channel configured");
        lock(&self.channels).insert(channel.id.clone(), channel.clone());
        Ok(())
    }

    fn set_foreground_policy(&self, policy: ForegroundPolicy) -> Result<(), PlatformError> {
        self.foreground
            .set(policy)
            .map_err(|_| PlatformError::AlreadyConfigured("foreground policy"))
    }

    async fn set_category(&self, category: NotificationCategory) -> Result<(), PlatformError> {
        self.center.set_category(category);
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

        // Without a policy, foreground notifications are delivered silently.
        let presentation = self
            .foreground
            .get()
            .map(|policy| policy.presentation())
            .unwrap_or_default();

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

    fn provider(prompt: FixedPrompt) -> NativeProvider<FixedPrompt> {
        NativeProvider::new(NativeConfig::default(), prompt)
    }

    #[tokio::test]
    async fn test_prompt_shown_once_from_undetermined() {
        let provider = provider(FixedPrompt::granting());

        assert_eq!(
            provider.permission_status().await.unwrap(),
            PermissionState::Undetermined
        );
        assert_eq!(
            provider.request_permission().await.unwrap(),
            PermissionState::Granted
        );
        assert_eq!(
            provider.request_permission().await.unwrap(),
            PermissionState::Granted
        );
        assert_eq!(provider.prompt().times_asked(), 1);
    }

    #[tokio::test]
    async fn test_denied_is_not_reprompted() {
        let provider = provider(FixedPrompt::granting()).with_permission(PermissionState::Denied);

        assert_eq!(
            provider.request_permission().await.unwrap(),
            PermissionState::Denied
        );
        assert_eq!(provider.prompt().times_asked(), 0);
    }

    #[tokio::test]
    async fn test_token_is_stable_per_install() {
        let provider = provider(FixedPrompt::granting()).with_permission(PermissionState::Granted);

        let first = provider.push_token().await.unwrap();
        let second = provider.push_token().await.unwrap();
        assert_eq!(first, second);
        assert!(!first.is_empty());

        let sub = provider
            .push_subscription(&VapidPublicKey::new("server-key"))
            .await
            .unwrap();
        assert_eq!(
            sub.endpoint,
            format!("https://push.localhost/device/{}", first)
        );
    }

    #[tokio::test]
    async fn test_token_requires_device_and_permission() {
        let simulator = NativeProvider::new(
            NativeConfig {
                is_device: false,
                ..NativeConfig::default()
            },
            FixedPrompt::granting(),
        )
        .with_permission(PermissionState::Granted);
        assert!(matches!(
            simulator.push_token().await,
            Err(PlatformError::DeviceIncapable)
        ));

        let undecided = provider(FixedPrompt::granting());
        assert!(matches!(
            undecided.push_token().await,
            Err(PlatformError::NotPermitted(PermissionState::Undetermined))
        ));
    }

    #[tokio::test]
    async fn test_foreground_policy_set_once() {
        let provider = provider(FixedPrompt::granting()).with_permission(PermissionState::Granted);

        provider
            .set_foreground_policy(ForegroundPolicy::default())
            .unwrap();
        assert!(matches!(
            provider.set_foreground_policy(ForegroundPolicy::default()),
            Err(PlatformError::AlreadyConfigured(_))
        ));

        provider
            .schedule(
                NotificationRequest::new("T", "B", NotificationData::new()),
                Trigger::Immediate,
            )
            .await
            .unwrap();

        let presented = provider.center().presented();
        assert!(presented[0].presentation.alert);
        assert!(presented[0].presentation.sound);
        assert_eq!(provider.center().badge_count(), 1);
    }

    #[tokio::test]
    async fn test_schedule_requires_permission() {
        let provider = provider(FixedPrompt::denying());

        let result = provider
            .schedule(
                NotificationRequest::new("T", "B", NotificationData::new()),
                Trigger::Immediate,
            )
            .await;

        assert!(matches!(
            result,
            Err(SchedulingError::PermissionDenied(PermissionState::Undetermined))
        ));
        assert!(provider.center().presented().is_empty());
    }

    #[tokio::test]
    async fn test_channel_is_stored() {
        let provider = provider(FixedPrompt::granting());
        provider
            .configure_channel(&NotificationChannel::default())
            .await
            .unwrap();

        let channel = provider.channel("default").unwrap();
        assert_eq!(channel.vibration_pattern, vec![0, 250, 250, 250]);
    }
}
