pub mod notification_dispatcher;
pub mod presentation;
pub mod social_events;

pub use notification_dispatcher::NotificationDispatcher;
pub use social_events::SocialEvent;
