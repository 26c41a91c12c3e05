/*
Social Events

Domain events raised by user actions that can notify another user. Action
handlers translate what happened into a SocialEvent and hand it to the
notification dispatcher; the mapping to a notification request lives here so
every handler fills the record the same way.
*/

use crate::core::platform::container::notification::{EntityType, NewNotification};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SocialEvent {
    Followed {
        follower_id: String,
        followee_id: String,
    },
    RouteLiked {
        liker_id: String,
        route_id: String,
        route_owner_id: String,
    },
    CommentPosted {
        author_id: String,
        route_id: String,
        route_owner_id: String,
    },
    Mentioned {
        author_id: String,
        mentioned_user_id: String,
        route_id: String,
    },
}

impl SocialEvent {
    pub fn entity_type(&self) -> EntityType {
        match self {
            SocialEvent::Followed { .. } => EntityType::Follow,
            SocialEvent::RouteLiked { .. } => EntityType::Like,
            SocialEvent::CommentPosted { .. } => EntityType::Comment,
            SocialEvent::Mentioned { .. } => EntityType::Mention,
        }
    }

    /// Notification request for the user affected by this event
    pub fn to_notification(&self) -> NewNotification {
        match self {
            SocialEvent::Followed { follower_id, followee_id } => {
                NewNotification::new(followee_id.clone(), EntityType::Follow)
                    .with_sender(follower_id.clone())
                    .with_entity(follower_id.clone())
            }
            SocialEvent::RouteLiked { liker_id, route_id, route_owner_id } => {
                NewNotification::new(route_owner_id.clone(), EntityType::Like)
                    .with_sender(liker_id.clone())
                    .with_entity(route_id.clone())
            }
            SocialEvent::CommentPosted { author_id, route_id, route_owner_id } => {
                NewNotification::new(route_owner_id.clone(), EntityType::Comment)
                    .with_sender(author_id.clone())
                    .with_entity(route_id.clone())
            }
            SocialEvent::Mentioned { author_id, mentioned_user_id, route_id } => {
                NewNotification::new(mentioned_user_id.clone(), EntityType::Mention)
                    .with_sender(author_id.clone())
                    .with_entity(route_id.clone())
            }
        }
    }
}
