pub mod clock;
pub mod notification_policy;

pub use clock::{Clock, ManualClock, SystemClock};
pub use notification_policy::{
    CreateOutcome, NotificationPolicy, NotificationPolicyConfig, NotificationPolicyError,
    NotificationResult, RateLimitWindows, SuppressionReason,
};
