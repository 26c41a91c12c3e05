//! Notification creation and rate-limiting policy for the Wayfarer social travel app.
//!
//! Layout follows a ports-and-adapters split:
//! - `core`: notification container and the policy that gates creation
//! - `application`: output ports, the typed notification store, event mapping
//!   and the fire-and-forget dispatcher
//! - `infrastructure`: REST and in-memory table adapters, notice adapters
pub mod application;
pub mod cli;
pub mod config;
pub mod core;
pub mod infrastructure;

pub use crate::core::platform::container::notification::{EntityType, NewNotification, Notification};
pub use crate::core::platform::manager::notification_policy::{
    CreateOutcome, NotificationPolicy, NotificationPolicyError, SuppressionReason,
};
