//! Platform-side error types.

use crate::PermissionState;

/// Failure reported by a notification provider.
#[derive(Debug, thiserror::Error)]
pub enum PlatformError {
    #[error("device cannot receive push notifications")]
    DeviceIncapable,
    #[error("failed to read permission state: {0}")]
    PermissionQuery(String),
    #[error("{0} is not supported on this platform")]
    Unsupported(&'static str),
    #[error("{0} is already configured")]
    AlreadyConfigured(&'static str),
    #[error("no presented notification with id {0}")]
    UnknownNotification(crate::NotificationId),
    #[error("action {action} is not part of category {category}")]
    UnknownAction { category: String, action: String },
    #[error("notification permission is {0}")]
    NotPermitted(PermissionState),
}

/// Failure scheduling a local notification.
#[derive(Debug, thiserror::Error)]
pub enum SchedulingError {
    #[error("notifications are not permitted (permission {0})")]
    PermissionDenied(PermissionState),
    #[error(transparent)]
    Platform(#[from] PlatformError),
}
