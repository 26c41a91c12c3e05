pub mod notification;

pub use notification::{
    EntityType, NewNotification, Notification, NotificationDomainError, NotificationDraft,
    NotificationWithSender, SenderProfile,
};
