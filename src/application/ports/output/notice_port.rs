/*
Notice Port

Transient, non-blocking notices shown to the user when a background side
effect (such as creating a notification) fails. Showing a notice must never
block or fail the action that triggered it.
*/

use serde::{Deserialize, Serialize};

/// Severity of a transient notice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub title: String,
    pub message: String,
}

impl Notice {
    pub fn error(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            title: title.into(),
            message: message.into(),
        }
    }
}

/// Sink for transient notices
pub trait NoticePort: Send + Sync {
    fn show(&self, notice: Notice);
}
