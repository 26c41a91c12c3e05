/*
Notification Dispatcher

Fire-and-forget wrapper used by action handlers. A follow, like or comment
succeeds or fails on its own; creating the notification is a side effect of it.
The dispatcher runs the policy on the tokio runtime, logs the outcome and, when
the policy fails, raises a transient notice. Errors never reach the caller.
*/

use crate::application::notifications::social_events::SocialEvent;
use crate::application::ports::output::notice_port::{Notice, NoticePort};
use crate::core::platform::container::notification::NewNotification;
use crate::core::platform::manager::notification_policy::{CreateOutcome, NotificationPolicy};
use log::{debug, warn};
use std::sync::Arc;
use tokio::task::JoinHandle;

#[derive(Clone)]
pub struct NotificationDispatcher {
    policy: Arc<NotificationPolicy>,
    notices: Arc<dyn NoticePort>,
}

impl NotificationDispatcher {
    pub fn new(policy: Arc<NotificationPolicy>, notices: Arc<dyn NoticePort>) -> Self {
        Self { policy, notices }
    }

    /// Spawn creation of a notification. The handle resolves to the outcome, or
    /// None when the policy failed; callers are free to drop it.
    ///
    /// Must be called from within a tokio runtime.
    pub fn dispatch(&self, request: NewNotification) -> JoinHandle<Option<CreateOutcome>> {
        let policy = Arc::clone(&self.policy);
        let notices = Arc::clone(&self.notices);

        tokio::spawn(async move {
            let entity_type = request.entity_type;
            let recipient_id = request.recipient_id.clone();

            match policy.create_notification(request).await {
                Ok(outcome) => {
                    if let CreateOutcome::Suppressed(reason) = &outcome {
                        debug!("{} notification for {} suppressed: {:?}", entity_type, recipient_id, reason);
                    }
                    Some(outcome)
                }
                Err(e) => {
                    warn!("Could not create {} notification for {}: {}", entity_type, recipient_id, e);
                    notices.show(Notice::error("Notification not sent", e.to_string()));
                    None
                }
            }
        })
    }

    pub fn dispatch_event(&self, event: &SocialEvent) -> JoinHandle<Option<CreateOutcome>> {
        self.dispatch(event.to_notification())
    }
}
