//! Registration outcomes that produce no token.

use push_core::{PermissionState, PlatformError};
use push_remote::ServiceError;

/// Why registration produced no token.
#[derive(Debug, thiserror::Error)]
pub enum RegistrationError {
    #[error("notification permission not granted (permission {0})")]
    PermissionDenied(PermissionState),
    #[error("this device cannot receive push notifications")]
    DeviceIncapable,
    #[error("push relay request failed: {0}")]
    Relay(#[from] ServiceError),
    #[error("platform notification call failed: {0}")]
    Platform(PlatformError),
}

impl From<PlatformError> for RegistrationError {
    fn from(error: PlatformError) -> Self {
        match error {
            PlatformError::DeviceIncapable | PlatformError::Unsupported(_) => Self::DeviceIncapable,
            PlatformError::NotPermitted(state) => Self::PermissionDenied(state),
            other => Self::Platform(other),
        }
    }
}

impl RegistrationError {
    /// Denial and incapable devices are normal outcomes, not faults.
    pub fn is_expected(&self) -> bool {
        matches!(self, Self::PermissionDenied(_) | Self::DeviceIncapable)
    }

    /// The relay never answered.
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Relay(e) if e.is_network())
    }

    /// The relay answered with a non-success status.
    pub fn remote_status(&self) -> Option<u16> {
        match self {
            Self::Relay(e) => e.status(),
            _ => None,
        }
    }
}
