/*
Integration Test for Social Event Dispatch

Action handlers hand social events to the dispatcher and carry on. These tests
check that notifications land as expected, that suppression stays silent, and
that backend failures become transient notices instead of errors.
*/

mod common;

use async_trait::async_trait;
use chrono::Duration;
use common::Harness;
use std::sync::Arc;
use wayfarer::application::notifications::presentation::{self, NotificationTarget};
use wayfarer::application::notifications::{NotificationDispatcher, SocialEvent};
use wayfarer::application::ports::output::notice_port::NoticeLevel;
use wayfarer::application::ports::output::table_port::{
    Filter, RemoteTablePort, Row, TablePortError, TablePortResult, TableQuery,
};
use wayfarer::application::storage::notification_store::NotificationStore;
use wayfarer::core::platform::manager::notification_policy::{
    CreateOutcome, NotificationPolicy, NotificationPolicyConfig, SuppressionReason,
};
use wayfarer::infrastructure::adapters::notifications::RecordingNoticeAdapter;

/// Backend that is unreachable
struct OfflineBackend;

#[async_trait]
impl RemoteTablePort for OfflineBackend {
    async fn query(&self, _table: &str, _query: TableQuery) -> TablePortResult<Vec<Row>> {
        Err(TablePortError::Connection("network unreachable".to_string()))
    }

    async fn insert(&self, _table: &str, _record: Row) -> TablePortResult<Row> {
        Err(TablePortError::Connection("network unreachable".to_string()))
    }

    async fn update(&self, _table: &str, _filters: Vec<Filter>, _patch: Row) -> TablePortResult<Vec<Row>> {
        Err(TablePortError::Connection("network unreachable".to_string()))
    }

    async fn delete(&self, _table: &str, _filters: Vec<Filter>) -> TablePortResult<()> {
        Err(TablePortError::Connection("network unreachable".to_string()))
    }
}

fn dispatcher(harness: &Harness) -> (NotificationDispatcher, RecordingNoticeAdapter) {
    let notices = RecordingNoticeAdapter::new();
    let dispatcher = NotificationDispatcher::new(harness.policy.clone(), Arc::new(notices.clone()));
    (dispatcher, notices)
}

#[tokio::test]
async fn test_like_event_reaches_route_owner() {
    let harness = Harness::new();
    let (dispatcher, notices) = dispatcher(&harness);

    let event = SocialEvent::RouteLiked {
        liker_id: "sam".to_string(),
        route_id: "route-42".to_string(),
        route_owner_id: "rita".to_string(),
    };
    let outcome = dispatcher.dispatch_event(&event).await.unwrap().unwrap();

    let created = outcome.notification().unwrap();
    assert_eq!(created.recipient_id, "rita");
    assert_eq!(presentation::target(created), NotificationTarget::Route("route-42".to_string()));
    assert_eq!(presentation::label(created), "liked your route");
    assert!(notices.notices().is_empty());
}

#[tokio::test]
async fn test_double_tap_like_is_suppressed_silently() {
    let harness = Harness::new();
    let (dispatcher, notices) = dispatcher(&harness);

    let event = SocialEvent::RouteLiked {
        liker_id: "sam".to_string(),
        route_id: "route-42".to_string(),
        route_owner_id: "rita".to_string(),
    };

    let first = dispatcher.dispatch_event(&event).await.unwrap();
    harness.clock.advance(Duration::seconds(10));
    let second = dispatcher.dispatch_event(&event).await.unwrap();

    assert!(first.map(|o| o.is_created()).unwrap_or(false));
    assert_eq!(second, Some(CreateOutcome::Suppressed(SuppressionReason::RateLimited)));
    assert_eq!(harness.stored_notifications(), 1);
    assert!(notices.notices().is_empty());
}

#[tokio::test]
async fn test_commenting_on_own_route_is_a_silent_no_op() {
    let harness = Harness::new();
    let (dispatcher, notices) = dispatcher(&harness);

    let event = SocialEvent::CommentPosted {
        author_id: "rita".to_string(),
        route_id: "route-1".to_string(),
        route_owner_id: "rita".to_string(),
    };
    let outcome = dispatcher.dispatch_event(&event).await.unwrap();

    assert_eq!(outcome, Some(CreateOutcome::Suppressed(SuppressionReason::SelfAction)));
    assert_eq!(harness.inserts(), 0);
    assert!(notices.notices().is_empty());
}

#[tokio::test]
async fn test_backend_failure_becomes_a_notice() {
    let policy = NotificationPolicy::new(
        NotificationStore::new(Arc::new(OfflineBackend)),
        NotificationPolicyConfig::default(),
    );
    let notices = RecordingNoticeAdapter::new();
    let dispatcher = NotificationDispatcher::new(Arc::new(policy), Arc::new(notices.clone()));

    let event = SocialEvent::Followed {
        follower_id: "sam".to_string(),
        followee_id: "rita".to_string(),
    };

    // The follow itself is not affected: the handle resolves without an error
    let outcome = dispatcher.dispatch_event(&event).await.unwrap();
    assert!(outcome.is_none());

    let shown = notices.drain();
    assert_eq!(shown.len(), 1);
    assert_eq!(shown[0].level, NoticeLevel::Error);
    assert!(shown[0].message.contains("network unreachable"));
}

#[tokio::test]
async fn test_events_from_many_senders_all_land() {
    let harness = Harness::new();
    let (dispatcher, _) = dispatcher(&harness);

    let handles: Vec<_> = ["ana", "ben", "cai"]
        .iter()
        .map(|follower| {
            dispatcher.dispatch_event(&SocialEvent::Followed {
                follower_id: follower.to_string(),
                followee_id: "rita".to_string(),
            })
        })
        .collect();

    for handle in handles {
        assert!(handle.await.unwrap().map(|o| o.is_created()).unwrap_or(false));
    }

    let listed = harness.policy.list_notifications("rita").await.unwrap();
    assert_eq!(listed.len(), 3);
    assert!(listed
        .iter()
        .all(|item| presentation::display_text(item) == "Someone started following you"));
}
