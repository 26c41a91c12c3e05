// Shared helpers for integration tests

#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use std::sync::{Arc, Once};
use wayfarer::application::storage::notification_store::NotificationStore;
use wayfarer::core::platform::manager::clock::ManualClock;
use wayfarer::core::platform::manager::notification_policy::{NotificationPolicy, NotificationPolicyConfig};
use wayfarer::infrastructure::adapters::storage::InMemoryTableAdapter;

static INIT: Once = Once::new();

/// Enable logging with TEST_LOG=1
pub fn init_test_env() {
    INIT.call_once(|| {
        if std::env::var("TEST_LOG").is_ok() {
            let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug"))
                .is_test(true)
                .try_init();
        }
    });
}

pub fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 7, 1, 9, 0, 0).unwrap()
}

/// Policy wired to an in-memory backend and a manual clock starting at `t0()`
pub struct Harness {
    pub policy: Arc<NotificationPolicy>,
    pub backend: Arc<InMemoryTableAdapter>,
    pub clock: Arc<ManualClock>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_config(NotificationPolicyConfig::default())
    }

    pub fn with_config(config: NotificationPolicyConfig) -> Self {
        init_test_env();
        let backend = Arc::new(InMemoryTableAdapter::new());
        let clock = Arc::new(ManualClock::new(t0()));
        let policy = NotificationPolicy::new(NotificationStore::new(backend.clone()), config)
            .with_clock(clock.clone());

        Self {
            policy: Arc::new(policy),
            backend,
            clock,
        }
    }

    pub fn stored_notifications(&self) -> usize {
        self.backend.rows("notifications").len()
    }

    pub fn inserts(&self) -> u64 {
        self.backend.write_stats("notifications").inserts
    }
}
