/*
Notification Store

Typed access to the `notifications` collection on top of the generic
RemoteTablePort. This is the only place that knows the column layout; the
policy above it works with Notification values only.
*/

use crate::application::ports::output::table_port::{
    Filter, OrderBy, RemoteTablePort, Row, TablePortError, TablePortResult, TableQuery,
};
use crate::core::platform::container::notification::{
    EntityType, Notification, NotificationDraft, NotificationWithSender, SenderProfile,
};
use serde_json::Value;
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

/// Table names used by the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationTables {
    pub notifications: String,
    pub profiles: String,
}

impl Default for NotificationTables {
    fn default() -> Self {
        Self {
            notifications: "notifications".to_string(),
            profiles: "profiles".to_string(),
        }
    }
}

#[derive(Clone)]
pub struct NotificationStore {
    port: Arc<dyn RemoteTablePort>,
    tables: NotificationTables,
}

impl NotificationStore {
    pub fn new(port: Arc<dyn RemoteTablePort>) -> Self {
        Self::with_tables(port, NotificationTables::default())
    }

    pub fn with_tables(port: Arc<dyn RemoteTablePort>, tables: NotificationTables) -> Self {
        Self { port, tables }
    }

    pub fn tables(&self) -> &NotificationTables {
        &self.tables
    }

    /// Most recent notification for a (sender, recipient, type) triple
    pub async fn find_latest(
        &self,
        sender_id: &str,
        recipient_id: &str,
        entity_type: EntityType,
    ) -> TablePortResult<Option<Notification>> {
        let query = TableQuery::new()
            .filter(Filter::eq("sender_id", sender_id))
            .filter(Filter::eq("recipient_id", recipient_id))
            .filter(Filter::eq("entity_type", entity_type.as_str()))
            .order_by(OrderBy::desc("created_at"))
            .limit(1);

        let rows = self.port.query(&self.tables.notifications, query).await?;
        rows.into_iter().next().map(row_to_notification).transpose()
    }

    pub async fn insert(&self, draft: &NotificationDraft) -> TablePortResult<Notification> {
        let record = match serde_json::to_value(draft) {
            Ok(Value::Object(map)) => map,
            Ok(other) => {
                return Err(TablePortError::Decode(format!(
                    "Notification draft serialized to {}",
                    other
                )))
            }
            Err(e) => return Err(TablePortError::Decode(e.to_string())),
        };

        let stored = self.port.insert(&self.tables.notifications, record).await?;
        row_to_notification(stored)
    }

    /// Newest-first page of a recipient's notifications with sender profiles joined
    pub async fn list_for_recipient(
        &self,
        recipient_id: &str,
        limit: usize,
    ) -> TablePortResult<Vec<NotificationWithSender>> {
        let query = TableQuery::new()
            .filter(Filter::eq("recipient_id", recipient_id))
            .order_by(OrderBy::desc("created_at"))
            .limit(limit);

        let rows = self.port.query(&self.tables.notifications, query).await?;
        let mut notifications = rows
            .into_iter()
            .map(row_to_notification)
            .collect::<TablePortResult<Vec<_>>>()?;

        // The backend is asked for this order, but the page contract holds regardless
        notifications.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        notifications.truncate(limit);

        let senders = self.load_senders(&notifications).await?;

        Ok(notifications
            .into_iter()
            .map(|notification| {
                let sender = notification
                    .sender_id
                    .as_ref()
                    .and_then(|id| senders.get(id).cloned());
                NotificationWithSender { notification, sender }
            })
            .collect())
    }

    async fn load_senders(
        &self,
        notifications: &[Notification],
    ) -> TablePortResult<HashMap<String, SenderProfile>> {
        let sender_ids: BTreeSet<&str> = notifications
            .iter()
            .filter_map(|n| n.sender_id.as_deref())
            .collect();

        if sender_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let query = TableQuery::new()
            .filter(Filter::in_list("id", sender_ids))
            .select(SenderProfile::COLUMNS);

        let rows = self.port.query(&self.tables.profiles, query).await?;
        let mut profiles = HashMap::with_capacity(rows.len());
        for row in rows {
            let profile: SenderProfile = serde_json::from_value(Value::Object(row))
                .map_err(|e| TablePortError::Decode(format!("Invalid profile row: {}", e)))?;
            profiles.insert(profile.id.clone(), profile);
        }
        Ok(profiles)
    }

    /// Set `is_read` on one notification; returns the rows touched
    pub async fn mark_read(&self, notification_id: &str) -> TablePortResult<Vec<Notification>> {
        let rows = self
            .port
            .update(
                &self.tables.notifications,
                vec![Filter::eq("id", notification_id)],
                read_patch(),
            )
            .await?;

        rows.into_iter().map(row_to_notification).collect()
    }

    pub async fn mark_all_read(&self, recipient_id: &str) -> TablePortResult<usize> {
        let rows = self
            .port
            .update(
                &self.tables.notifications,
                vec![
                    Filter::eq("recipient_id", recipient_id),
                    Filter::eq("is_read", false),
                ],
                read_patch(),
            )
            .await?;

        Ok(rows.len())
    }

    pub async fn count_unread(&self, recipient_id: &str) -> TablePortResult<usize> {
        let query = TableQuery::new()
            .filter(Filter::eq("recipient_id", recipient_id))
            .filter(Filter::eq("is_read", false))
            .select(["id"]);

        Ok(self.port.query(&self.tables.notifications, query).await?.len())
    }

    pub async fn delete(&self, notification_id: &str) -> TablePortResult<()> {
        self.port
            .delete(&self.tables.notifications, vec![Filter::eq("id", notification_id)])
            .await
    }
}

fn read_patch() -> Row {
    let mut patch = Row::new();
    patch.insert("is_read".to_string(), Value::Bool(true));
    patch
}

fn row_to_notification(row: Row) -> TablePortResult<Notification> {
    serde_json::from_value(Value::Object(row))
        .map_err(|e| TablePortError::Decode(format!("Invalid notification row: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::platform::container::notification::NewNotification;
    use crate::infrastructure::adapters::storage::InMemoryTableAdapter;
    use chrono::{Duration, TimeZone, Utc};
    use serde_json::json;

    fn store_with_adapter() -> (NotificationStore, Arc<InMemoryTableAdapter>) {
        let adapter = Arc::new(InMemoryTableAdapter::new());
        (NotificationStore::new(adapter.clone()), adapter)
    }

    #[tokio::test]
    async fn test_insert_assigns_id_and_round_trips_fields() {
        let (store, _) = store_with_adapter();
        let at = Utc.with_ymd_and_hms(2024, 3, 10, 9, 30, 0).unwrap();
        let draft = NewNotification::new("user-1", EntityType::Comment)
            .with_sender("user-2")
            .with_entity("route-9")
            .into_draft(at);

        let created = store.insert(&draft).await.unwrap();

        assert!(!created.id.is_empty());
        assert_eq!(created.recipient_id, "user-1");
        assert_eq!(created.sender_id.as_deref(), Some("user-2"));
        assert_eq!(created.entity_id.as_deref(), Some("route-9"));
        assert_eq!(created.created_at, at);
        assert!(!created.is_read);
    }

    #[tokio::test]
    async fn test_find_latest_picks_newest_matching_row() {
        let (store, _) = store_with_adapter();
        let base = Utc.with_ymd_and_hms(2024, 3, 10, 9, 0, 0).unwrap();

        for (offset, entity_type) in [(0, EntityType::Follow), (5, EntityType::Follow), (9, EntityType::Like)] {
            let draft = NewNotification::new("user-1", entity_type)
                .with_sender("user-2")
                .into_draft(base + Duration::minutes(offset));
            store.insert(&draft).await.unwrap();
        }

        let latest = store
            .find_latest("user-2", "user-1", EntityType::Follow)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(latest.created_at, base + Duration::minutes(5));

        let none = store.find_latest("user-3", "user-1", EntityType::Follow).await.unwrap();
        assert!(none.is_none());
    }

    #[tokio::test]
    async fn test_list_joins_sender_profiles() {
        let (store, adapter) = store_with_adapter();
        adapter.seed(
            "profiles",
            vec![json!({
                "id": "user-2",
                "display_name": "Ana",
                "username": "ana",
                "avatar_url": null,
                "is_verified": true,
                "is_deleted": false
            })],
        );

        let now = Utc::now();
        store
            .insert(&NewNotification::new("user-1", EntityType::Like).with_sender("user-2").into_draft(now))
            .await
            .unwrap();
        store
            .insert(&NewNotification::new("user-1", EntityType::Mention).into_draft(now))
            .await
            .unwrap();

        let listed = store.list_for_recipient("user-1", 50).await.unwrap();
        assert_eq!(listed.len(), 2);

        let liked = listed
            .iter()
            .find(|n| n.notification.entity_type == EntityType::Like)
            .unwrap();
        assert_eq!(liked.sender.as_ref().map(|s| s.id.as_str()), Some("user-2"));

        let system = listed
            .iter()
            .find(|n| n.notification.entity_type == EntityType::Mention)
            .unwrap();
        assert!(system.sender.is_none());
    }

    #[tokio::test]
    async fn test_mark_all_read_counts_only_unread() {
        let (store, _) = store_with_adapter();
        for _ in 0..3 {
            store
                .insert(&NewNotification::new("user-1", EntityType::Like).into_draft(Utc::now()))
                .await
                .unwrap();
        }

        assert_eq!(store.count_unread("user-1").await.unwrap(), 3);
        assert_eq!(store.mark_all_read("user-1").await.unwrap(), 3);
        assert_eq!(store.mark_all_read("user-1").await.unwrap(), 0);
        assert_eq!(store.count_unread("user-1").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_delete_missing_row_reports_not_found() {
        let (store, _) = store_with_adapter();
        let result = store.delete("missing").await;
        assert!(matches!(result, Err(TablePortError::NotFound(_))));
    }
}
