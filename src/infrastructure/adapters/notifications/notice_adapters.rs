/*
Notice Adapters

NoticePort implementations:
- LogNoticeAdapter writes notices to the application log (CLI and headless runs)
- RecordingNoticeAdapter keeps them in memory so a host UI can drain them as toasts
*/

use crate::application::ports::output::notice_port::{Notice, NoticeLevel, NoticePort};
use log::{error, info, warn};
use std::sync::{Arc, Mutex};

#[derive(Debug, Default, Clone, Copy)]
pub struct LogNoticeAdapter;

impl NoticePort for LogNoticeAdapter {
    fn show(&self, notice: Notice) {
        match notice.level {
            NoticeLevel::Info => info!("{}: {}", notice.title, notice.message),
            NoticeLevel::Warning => warn!("{}: {}", notice.title, notice.message),
            NoticeLevel::Error => error!("{}: {}", notice.title, notice.message),
        }
    }
}

#[derive(Debug, Default, Clone)]
pub struct RecordingNoticeAdapter {
    notices: Arc<Mutex<Vec<Notice>>>,
}

impl RecordingNoticeAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.notices.lock().map(|n| n.clone()).unwrap_or_default()
    }

    /// Take every pending notice, leaving the queue empty
    pub fn drain(&self) -> Vec<Notice> {
        self.notices
            .lock()
            .map(|mut n| std::mem::take(&mut *n))
            .unwrap_or_default()
    }
}

impl NoticePort for RecordingNoticeAdapter {
    fn show(&self, notice: Notice) {
        if let Ok(mut notices) = self.notices.lock() {
            notices.push(notice);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_adapter_drains() {
        let adapter = RecordingNoticeAdapter::new();
        adapter.show(Notice::error("Notification not sent", "offline"));
        adapter.show(Notice::error("Notification not sent", "timeout"));

        assert_eq!(adapter.notices().len(), 2);
        let drained = adapter.drain();
        assert_eq!(drained[1].message, "timeout");
        assert!(adapter.notices().is_empty());
    }

    #[test]
    fn test_log_adapter_accepts_every_level() {
        let adapter = LogNoticeAdapter;
        for level in [NoticeLevel::Info, NoticeLevel::Warning, NoticeLevel::Error] {
            adapter.show(Notice { level, title: "t".to_string(), message: "m".to_string() });
        }
    }
}
