//! Push Relay Client
//!
//! HTTP client for the remote push relay: VAPID key lookup, device
//! subscription, and broadcast sends.

mod cache;
mod client;
mod error;
mod traits;

pub use cache::VapidKeyCache;
pub use client::HttpPushService;
pub use error::ServiceError;
pub use traits::*;
