//! Push Platform Providers
//!
//! The platform side of notifications: permission, push tokens, local
//! scheduling, and presentation. One provider is selected at startup.

mod browser;
mod center;
mod keys;
mod native;
mod prompt;
mod selected;
mod traits;

pub use browser::BrowserProvider;
pub use center::{ListenerGuard, NotificationCenter, PRESENTED_HISTORY};
pub use keys::generate_subscription_keys;
pub use native::{NativeConfig, NativeProvider};
pub use prompt::FixedPrompt;
pub use selected::{PlatformKind, SelectedProvider};
pub use traits::*;
