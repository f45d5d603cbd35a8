//! Push Notification Workflow
//!
//! Registration, local scheduling, and push broadcast on top of a platform
//! provider and a push relay.

mod client;
mod error;

pub use client::NotificationClient;
pub use error::RegistrationError;
