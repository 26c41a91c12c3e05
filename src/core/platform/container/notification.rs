/*
Notification Container Module

A Notification is one persisted, user-facing alert about another user's action
on the platform: somebody followed you, liked or commented on one of your routes,
or mentioned you.

Notifications are created only through the notification policy (see
core::platform::manager::notification_policy), mutated only by the read-state
transition, and removed only by an explicit delete.

The entity type selects both the rate-limit window applied at creation and the
label/navigation target used when the notification is displayed.
*/

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors raised while building or decoding notifications
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NotificationDomainError {
    #[error("Recipient id is required")]
    MissingRecipient,

    #[error("Notification id is required")]
    MissingNotificationId,

    #[error("Sender id cannot be blank")]
    BlankSender,

    #[error("Unknown entity type: {0}")]
    UnknownEntityType(String),
}

/// Category of the action a notification reports on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityType {
    Follow,
    Like,
    Comment,
    Mention,
}

impl EntityType {
    pub const ALL: [EntityType; 4] = [
        EntityType::Follow,
        EntityType::Like,
        EntityType::Comment,
        EntityType::Mention,
    ];

    /// Wire tag stored in the `entity_type` column
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityType::Follow => "follow",
            EntityType::Like => "like",
            EntityType::Comment => "comment",
            EntityType::Mention => "mention",
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityType {
    type Err = NotificationDomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "follow" => Ok(EntityType::Follow),
            "like" => Ok(EntityType::Like),
            "comment" => Ok(EntityType::Comment),
            "mention" => Ok(EntityType::Mention),
            _ => Err(NotificationDomainError::UnknownEntityType(s.to_string())),
        }
    }
}

/// A persisted notification record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub id: String,
    pub recipient_id: String,
    #[serde(default)]
    pub sender_id: Option<String>,
    #[serde(default)]
    pub entity_id: Option<String>,
    pub entity_type: EntityType,
    #[serde(default)]
    pub message: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub is_read: bool,
}

/// Request to create a notification, as produced by action handlers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewNotification {
    pub sender_id: Option<String>,
    pub recipient_id: String,
    pub entity_id: Option<String>,
    pub entity_type: EntityType,
    pub message: Option<String>,
}

impl NewNotification {
    pub fn new(recipient_id: impl Into<String>, entity_type: EntityType) -> Self {
        Self {
            sender_id: None,
            recipient_id: recipient_id.into(),
            entity_id: None,
            entity_type,
            message: None,
        }
    }

    pub fn with_sender(mut self, sender_id: impl Into<String>) -> Self {
        self.sender_id = Some(sender_id.into());
        self
    }

    pub fn with_entity(mut self, entity_id: impl Into<String>) -> Self {
        self.entity_id = Some(entity_id.into());
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Check the request before any remote call is made
    pub fn validate(&self) -> Result<(), NotificationDomainError> {
        if self.recipient_id.trim().is_empty() {
            return Err(NotificationDomainError::MissingRecipient);
        }
        if let Some(sender) = &self.sender_id {
            if sender.trim().is_empty() {
                return Err(NotificationDomainError::BlankSender);
            }
        }
        Ok(())
    }

    /// True when the acting user is also the recipient
    pub fn is_self_action(&self) -> bool {
        self.sender_id.as_deref() == Some(self.recipient_id.as_str())
    }

    /// Build the insert payload, stamped with the creation time
    pub fn into_draft(self, created_at: DateTime<Utc>) -> NotificationDraft {
        NotificationDraft {
            recipient_id: self.recipient_id,
            sender_id: self.sender_id,
            entity_id: self.entity_id,
            entity_type: self.entity_type,
            message: self.message,
            created_at,
            is_read: false,
        }
    }
}

/// Insert payload; the backend assigns the id
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NotificationDraft {
    pub recipient_id: String,
    pub sender_id: Option<String>,
    pub entity_id: Option<String>,
    pub entity_type: EntityType,
    pub message: Option<String>,
    pub created_at: DateTime<Utc>,
    pub is_read: bool,
}

/// Minimal projection of the acting user's profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SenderProfile {
    pub id: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default, rename = "username")]
    pub handle: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub is_verified: bool,
    #[serde(default)]
    pub is_deleted: bool,
}

impl SenderProfile {
    /// Columns fetched when joining senders onto a notification list
    pub const COLUMNS: [&'static str; 6] = [
        "id",
        "display_name",
        "username",
        "avatar_url",
        "is_verified",
        "is_deleted",
    ];
}

/// A notification together with its sender, as shown in the inbox
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationWithSender {
    pub notification: Notification,
    pub sender: Option<SenderProfile>,
}
