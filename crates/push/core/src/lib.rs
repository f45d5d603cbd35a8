//! Push Core Types
//!
//! Shared types for notification registration, local scheduling, and push
//! broadcast.

mod error;
mod notification;
mod permission;
mod subscription;
mod token;

pub use error::*;
pub use notification::*;
pub use permission::*;
pub use subscription::*;
pub use token::*;
