/*
Notification Presentation

Maps each entity type to the label shown in the inbox and to where tapping the
notification leads. Kept outside the policy, which only cares about entity
types for rate limiting.
*/

use crate::core::platform::container::notification::{EntityType, Notification, NotificationWithSender};
use serde::{Deserialize, Serialize};

/// Screen a notification opens
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum NotificationTarget {
    Profile(String),
    Route(String),
    RouteComments(String),
    None,
}

pub fn default_label(entity_type: EntityType) -> &'static str {
    match entity_type {
        EntityType::Follow => "started following you",
        EntityType::Like => "liked your route",
        EntityType::Comment => "commented on your route",
        EntityType::Mention => "mentioned you",
    }
}

/// The explicit message when one was stored, the entity type's label otherwise
pub fn label(notification: &Notification) -> &str {
    notification
        .message
        .as_deref()
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| default_label(notification.entity_type))
}

pub fn target(notification: &Notification) -> NotificationTarget {
    match notification.entity_type {
        EntityType::Follow => notification
            .sender_id
            .clone()
            .or_else(|| notification.entity_id.clone())
            .map(NotificationTarget::Profile)
            .unwrap_or(NotificationTarget::None),
        EntityType::Like | EntityType::Mention => notification
            .entity_id
            .clone()
            .map(NotificationTarget::Route)
            .unwrap_or(NotificationTarget::None),
        EntityType::Comment => notification
            .entity_id
            .clone()
            .map(NotificationTarget::RouteComments)
            .unwrap_or(NotificationTarget::None),
    }
}

/// One-line inbox text, e.g. "Ana liked your route"
pub fn display_text(item: &NotificationWithSender) -> String {
    let actor = match &item.sender {
        Some(sender) if sender.is_deleted => "Deleted user",
        Some(sender) => sender
            .display_name
            .as_deref()
            .or(sender.handle.as_deref())
            .unwrap_or("Someone"),
        None if item.notification.sender_id.is_none() => return label(&item.notification).to_string(),
        None => "Someone",
    };

    format!("{} {}", actor, label(&item.notification))
}
