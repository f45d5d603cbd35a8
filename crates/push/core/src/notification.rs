//! Notification content, triggers, and presentation types.

use std::time::Duration;

use crate::NotificationId;

/// Arbitrary key-value payload attached to a notification.
pub type NotificationData = serde_json::Map<String, serde_json::Value>;

/// Action identifier reported when the user opens a notification without
/// choosing a category button.
pub const DEFAULT_ACTION_IDENTIFIER: &str = "default";

/// Title, body, and payload of one notification.
///
/// Serializes to the relay's `send-notification` body. The category is only
/// meaningful on-device and is left out of the wire form when unset.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct NotificationRequest {
    pub title: String,
    pub body: String,
    #[serde(default)]
    pub data: NotificationData,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl NotificationRequest {
    /// Create a request without a category.
    pub fn new(title: impl Into<String>, body: impl Into<String>, data: NotificationData) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            data,
            category: None,
        }
    }

    /// Attach a category so its actions apply to this notification.
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }
}

/// When a local notification fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// Present right away.
    Immediate,
    /// Present once the delay has elapsed.
    After(Duration),
}

impl Trigger {
    /// Build a trigger from a delay in whole seconds. Zero means immediate.
    pub fn from_secs(seconds: u64) -> Self {
        if seconds == 0 {
            Self::Immediate
        } else {
            Self::After(Duration::from_secs(seconds))
        }
    }

    /// Delay before the notification fires.
    pub fn delay(self) -> Duration {
        match self {
            Self::Immediate => Duration::ZERO,
            Self::After(delay) => delay,
        }
    }
}

/// How notifications are presented while the app is in the foreground.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ForegroundPolicy {
    #[serde(default = "default_true")]
    pub show_alert: bool,
    #[serde(default = "default_true")]
    pub play_sound: bool,
    #[serde(default = "default_true")]
    pub set_badge: bool,
}

fn default_true() -> bool {
    true
}

impl Default for ForegroundPolicy {
    fn default() -> Self {
        Self {
            show_alert: true,
            play_sound: true,
            set_badge: true,
        }
    }
}

impl ForegroundPolicy {
    /// Presentation applied to each notification under this policy.
    pub fn presentation(self) -> Presentation {
        Presentation {
            alert: self.show_alert,
            sound: self.play_sound,
            badge: self.set_badge,
        }
    }
}

/// What the platform actually did when presenting a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Presentation {
    pub alert: bool,
    pub sound: bool,
    pub badge: bool,
}

/// A local notification waiting for its trigger.
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduledNotification {
    pub id: NotificationId,
    pub request: NotificationRequest,
    pub trigger: Trigger,
}

/// A notification that has been presented.
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub id: NotificationId,
    pub request: NotificationRequest,
    pub presentation: Presentation,
    pub presented_at: chrono::DateTime<chrono::Utc>,
}

/// The user's interaction with a presented notification.
#[derive(Debug, Clone, PartialEq)]
pub struct NotificationResponse {
    pub notification: Notification,
    pub action_identifier: String,
}

/// Channel importance, mirroring Android's levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Importance {
    Min,
    Low,
    Default,
    High,
    #[default]
    Max,
}

/// Android-style notification channel.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct NotificationChannel {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub importance: Importance,
    /// Alternating off/on durations in milliseconds.
    #[serde(default)]
    pub vibration_pattern: Vec<u64>,
    /// ARGB hex color, e.g. `#FF231F7C`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub light_color: Option<String>,
}

impl Default for NotificationChannel {
    fn default() -> Self {
        Self {
            id: "default".to_string(),
            name: "default".to_string(),
            importance: Importance::Max,
            vibration_pattern: vec![0, 250, 250, 250],
            light_color: Some("#FF231F7C".to_string()),
        }
    }
}

/// A button shown on notifications of a category.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct NotificationAction {
    pub identifier: String,
    pub button_title: String,
    #[serde(default)]
    pub opens_app_to_foreground: bool,
}

/// Named set of actions attachable to notifications.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct NotificationCategory {
    pub identifier: String,
    pub actions: Vec<NotificationAction>,
}

impl NotificationCategory {
    /// The `default` category with a single foregrounding `OK` button.
    pub fn default_category() -> Self {
        Self {
            identifier: "default".to_string(),
            actions: vec![NotificationAction {
                identifier: "default".to_string(),
                button_title: "OK".to_string(),
                opens_app_to_foreground: true,
            }],
        }
    }

    /// Check if the action belongs to this category.
    pub fn has_action(&self, identifier: &str) -> bool {
        self.actions.iter().any(|a| a.identifier == identifier)
    }
}
