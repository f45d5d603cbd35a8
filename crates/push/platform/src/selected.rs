//! Startup provider selection.

use std::sync::Arc;

use push_core::{
    DeviceToken, ForegroundPolicy, Notification, NotificationCategory, NotificationChannel,
    NotificationId, NotificationRequest, NotificationResponse, PermissionState, PlatformError,
    SchedulingError, Subscription, Trigger, VapidPublicKey,
};

use crate::{
    BrowserProvider, ListenerGuard, NativeConfig, NativeProvider, NotificationCenter,
    NotificationProvider, PermissionPrompt,
};

/// Platform family a provider targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlatformKind {
    #[default]
    Native,
    Browser,
}

impl std::fmt::Display for PlatformKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Native => f.write_str("native"),
            Self::Browser => f.write_str("browser"),
        }
    }
}

impl std::str::FromStr for PlatformKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "native" => Ok(Self::Native),
            "browser" | "web" => Ok(Self::Browser),
            other => Err(format!("unknown platform: {other}")),
        }
    }
}

/// The provider chosen for this process.
pub enum SelectedProvider<Q> {
    Native(NativeProvider<Q>),
    Browser(BrowserProvider<Q>),
}

impl<Q: PermissionPrompt> SelectedProvider<Q> {
    /// Pick the provider for `kind`. Native settings are ignored for browsers.
    pub fn select(kind: PlatformKind, native: NativeConfig, prompt: Q) -> Self {
        tracing::info!(platform = %kind, "notification provider selected");

        match kind {
            PlatformKind::Native => Self::Native(NativeProvider::new(native, prompt)),
            PlatformKind::Browser => Self::Browser(BrowserProvider::new(prompt)),
        }
    }

    /// The notification center backing the selected provider.
    pub fn center(&self) -> &Arc<NotificationCenter> {
        match self {
            Self::Native(p) => p.center(),
            Self::Browser(p) => p.center(),
        }
    }
}

impl<Q: PermissionPrompt> NotificationProvider for SelectedProvider<Q> {
    fn platform(&self) -> PlatformKind {
        match self {
            Self::Native(p) => p.platform(),
            Self::Browser(p) => p.platform(),
        }
    }

    fn is_push_capable(&self) -> bool {
        match self {
            Self::Native(p) => p.is_push_capable(),
            Self::Browser(p) => p.is_push_capable(),
        }
    }

    async fn permission_status(&self) -> Result<PermissionState, PlatformError> {
        match self {
            Self::Native(p) => p.permission_status().await,
            Self::Browser(p) => p.permission_status().await,
        }
    }

    async fn request_permission(&self) -> Result<PermissionState, PlatformError> {
        match self {
            Self::Native(p) => p.request_permission().await,
            Self::Browser(p) => p.request_permission().await,
        }
    }

    async fn push_token(&self) -> Result<DeviceToken, PlatformError> {
        match self {
            Self::Native(p) => p.push_token().await,
            Self::Browser(p) => p.push_token().await,
        }
    }

    async fn push_subscription(
        &self,
        server_key: &VapidPublicKey,
    ) -> Result<Subscription, PlatformError> {
        match self {
            Self::Native(p) => p.push_subscription(server_key).await,
            Self::Browser(p) => p.push_subscription(server_key).await,
        }
    }

    async fn configure_channel(&self, channel: &NotificationChannel) -> Result<(), PlatformError> {
        match self {
            Self::Native(p) => p.configure_channel(channel).await,
            Self::Browser(p) => p.configure_channel(channel).await,
        }
    }

    fn set_foreground_policy(&self, policy: ForegroundPolicy) -> Result<(), PlatformError> {
        match self {
            Self::Native(p) => p.set_foreground_policy(policy),
            Self::Browser(p) => p.set_foreground_policy(policy),
        }
    }

    async fn set_category(&self, category: NotificationCategory) -> Result<(), PlatformError> {
        match self {
            Self::Native(p) => p.set_category(category).await,
            Self::Browser(p) => p.set_category(category).await,
        }
    }

    async fn schedule(
        &self,
        request: NotificationRequest,
        trigger: Trigger,
    ) -> Result<NotificationId, SchedulingError> {
        match self {
            Self::Native(p) => p.schedule(request, trigger).await,
            Self::Browser(p) => p.schedule(request, trigger).await,
        }
    }

    fn add_received_listener<F>(&self, listener: F) -> ListenerGuard
    where
        F: Fn(&Notification) + Send + Sync + 'static,
    {
        match self {
            Self::Native(p) => p.add_received_listener(listener),
            Self::Browser(p) => p.add_received_listener(listener),
        }
    }

    fn add_response_listener<F>(&self, listener: F) -> ListenerGuard
    where
        F: Fn(&NotificationResponse) + Send + Sync + 'static,
    {
        match self {
            Self::Native(p) => p.add_response_listener(listener),
            Self::Browser(p) => p.add_response_listener(listener),
        }
    }
}
