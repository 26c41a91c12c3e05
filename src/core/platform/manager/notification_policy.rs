/*
Notification Policy

Single entry point for creating notification records. Every feature that
produces notifications (follow, like, comment, mention) goes through
`create_notification`, so they all share the same suppression rules:

1. A user acting on their own content never notifies themselves.
2. Entity types with a configured rate-limit window produce at most one
   notification per (sender, recipient, type) inside that window.

Suppression is a successful outcome, not an error. Callers that need to know
whether anything was written match on CreateOutcome.

The rate-limit check reads the latest matching record and then inserts; the two
calls are not transactional. Two clients racing inside the same window can both
pass the check, so the limit is best-effort. A hard guarantee needs a
conditional insert on the backend keyed by the window bucket.
*/

use crate::application::ports::output::table_port::TablePortError;
use crate::application::storage::notification_store::NotificationStore;
use crate::core::platform::container::notification::{
    EntityType, NewNotification, Notification, NotificationDomainError, NotificationWithSender,
};
use crate::core::platform::manager::clock::{Clock, SystemClock};
use chrono::Duration;
use log::{debug, error, info};
use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Arc;
use thiserror::Error;

/// Largest page returned by `list_notifications`. Configured page sizes are capped here.
pub const DEFAULT_PAGE_SIZE: usize = 50;

/// Errors surfaced by the notification policy
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NotificationPolicyError {
    #[error("Invalid notification request: {0}")]
    Validation(#[from] NotificationDomainError),

    #[error("Failed to read notifications: {0}")]
    RemoteRead(#[source] TablePortError),

    #[error("Failed to write notification: {0}")]
    RemoteWrite(#[source] TablePortError),
}

pub type NotificationResult<T> = Result<T, NotificationPolicyError>;

/// Why a notification was not created
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuppressionReason {
    /// Sender and recipient are the same user
    SelfAction,
    /// A matching notification exists inside the entity type's window
    RateLimited,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreateOutcome {
    Created(Notification),
    Suppressed(SuppressionReason),
}

impl CreateOutcome {
    pub fn is_created(&self) -> bool {
        matches!(self, CreateOutcome::Created(_))
    }

    pub fn is_suppressed(&self) -> bool {
        matches!(self, CreateOutcome::Suppressed(_))
    }

    pub fn notification(&self) -> Option<&Notification> {
        match self {
            CreateOutcome::Created(notification) => Some(notification),
            CreateOutcome::Suppressed(_) => None,
        }
    }
}

/// Rate-limit window per entity type. Types without a window are never throttled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimitWindows {
    windows: HashMap<EntityType, Duration>,
}

impl RateLimitWindows {
    /// No throttling at all
    pub fn none() -> Self {
        Self { windows: HashMap::new() }
    }

    pub fn with_window(mut self, entity_type: EntityType, window: Duration) -> Self {
        self.windows.insert(entity_type, window);
        self
    }

    pub fn without(mut self, entity_type: EntityType) -> Self {
        self.windows.remove(&entity_type);
        self
    }

    pub fn window_for(&self, entity_type: EntityType) -> Option<Duration> {
        self.windows.get(&entity_type).copied()
    }

    /// Build from `entity type tag -> milliseconds`, as found in configuration
    pub fn from_millis(millis: &HashMap<String, u64>) -> Result<Self, NotificationDomainError> {
        let mut windows = Self::none();
        for (tag, ms) in millis {
            let entity_type = EntityType::from_str(tag)?;
            let ms = i64::try_from(*ms).unwrap_or(i64::MAX);
            windows = windows.with_window(entity_type, Duration::milliseconds(ms));
        }
        Ok(windows)
    }
}

impl Default for RateLimitWindows {
    fn default() -> Self {
        Self::none()
            .with_window(EntityType::Follow, Duration::hours(24))
            .with_window(EntityType::Like, Duration::minutes(1))
            .with_window(EntityType::Comment, Duration::minutes(1))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationPolicyConfig {
    pub windows: RateLimitWindows,
    /// Never exceeds `DEFAULT_PAGE_SIZE` when listing
    pub page_size: usize,
}

impl Default for NotificationPolicyConfig {
    fn default() -> Self {
        Self {
            windows: RateLimitWindows::default(),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

pub struct NotificationPolicy {
    store: NotificationStore,
    clock: Arc<dyn Clock>,
    config: NotificationPolicyConfig,
}

impl NotificationPolicy {
    pub fn new(store: NotificationStore, config: NotificationPolicyConfig) -> Self {
        Self {
            store,
            clock: Arc::new(SystemClock),
            config,
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn config(&self) -> &NotificationPolicyConfig {
        &self.config
    }

    /// Create a notification unless policy suppresses it
    pub async fn create_notification(&self, request: NewNotification) -> NotificationResult<CreateOutcome> {
        request.validate()?;

        if request.is_self_action() {
            debug!(
                "Suppressed self {} notification for {}",
                request.entity_type, request.recipient_id
            );
            return Ok(CreateOutcome::Suppressed(SuppressionReason::SelfAction));
        }

        let now = self.clock.now();

        if let (Some(window), Some(sender_id)) = (
            self.config.windows.window_for(request.entity_type),
            request.sender_id.as_deref(),
        ) {
            let latest = self
                .store
                .find_latest(sender_id, &request.recipient_id, request.entity_type)
                .await
                .map_err(|e| {
                    error!("Rate-limit lookup failed for {} -> {}: {}", sender_id, request.recipient_id, e);
                    NotificationPolicyError::RemoteRead(e)
                })?;

            if let Some(previous) = latest {
                if now - previous.created_at < window {
                    debug!(
                        "Suppressed {} notification {} -> {}: previous {} is inside the window",
                        request.entity_type, sender_id, request.recipient_id, previous.id
                    );
                    return Ok(CreateOutcome::Suppressed(SuppressionReason::RateLimited));
                }
            }
        }

        let draft = request.into_draft(now);
        let created = self.store.insert(&draft).await.map_err(|e| {
            error!("Failed to insert {} notification for {}: {}", draft.entity_type, draft.recipient_id, e);
            NotificationPolicyError::RemoteWrite(e)
        })?;

        info!(
            "Created {} notification {} for {}",
            created.entity_type, created.id, created.recipient_id
        );
        Ok(CreateOutcome::Created(created))
    }

    /// Newest-first single page of a recipient's notifications
    pub async fn list_notifications(&self, recipient_id: &str) -> NotificationResult<Vec<NotificationWithSender>> {
        require_recipient(recipient_id)?;
        let page_size = self.config.page_size.min(DEFAULT_PAGE_SIZE);
        self.store
            .list_for_recipient(recipient_id, page_size)
            .await
            .map_err(|e| {
                error!("Failed to list notifications for {}: {}", recipient_id, e);
                NotificationPolicyError::RemoteRead(e)
            })
    }

    /// Mark one notification read. Returns false when no such notification exists.
    pub async fn mark_read(&self, notification_id: &str) -> NotificationResult<bool> {
        require_notification_id(notification_id)?;
        match self.store.mark_read(notification_id).await {
            Ok(rows) => Ok(!rows.is_empty()),
            Err(TablePortError::NotFound(_)) => Ok(false),
            Err(e) => {
                error!("Failed to mark notification {} read: {}", notification_id, e);
                Err(NotificationPolicyError::RemoteWrite(e))
            }
        }
    }

    /// Mark every unread notification of a recipient read; returns how many changed
    pub async fn mark_all_read(&self, recipient_id: &str) -> NotificationResult<usize> {
        require_recipient(recipient_id)?;
        self.store
            .mark_all_read(recipient_id)
            .await
            .map_err(|e| {
                error!("Failed to mark notifications read for {}: {}", recipient_id, e);
                NotificationPolicyError::RemoteWrite(e)
            })
    }

    pub async fn unread_count(&self, recipient_id: &str) -> NotificationResult<usize> {
        require_recipient(recipient_id)?;
        self.store
            .count_unread(recipient_id)
            .await
            .map_err(|e| {
                error!("Failed to count unread notifications for {}: {}", recipient_id, e);
                NotificationPolicyError::RemoteRead(e)
            })
    }

    /// Delete a notification. Deleting something already gone succeeds.
    pub async fn delete_notification(&self, notification_id: &str) -> NotificationResult<()> {
        require_notification_id(notification_id)?;
        match self.store.delete(notification_id).await {
            Ok(()) => Ok(()),
            Err(TablePortError::NotFound(_)) => {
                debug!("Notification {} already deleted", notification_id);
                Ok(())
            }
            Err(e) => {
                error!("Failed to delete notification {}: {}", notification_id, e);
                Err(NotificationPolicyError::RemoteWrite(e))
            }
        }
    }
}

fn require_recipient(recipient_id: &str) -> Result<(), NotificationDomainError> {
    if recipient_id.trim().is_empty() {
        return Err(NotificationDomainError::MissingRecipient);
    }
    Ok(())
}

fn require_notification_id(notification_id: &str) -> Result<(), NotificationDomainError> {
    if notification_id.trim().is_empty() {
        return Err(NotificationDomainError::MissingNotificationId);
    }
    Ok(())
}
