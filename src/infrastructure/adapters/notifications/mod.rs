pub mod notice_adapters;

// Re-export main adapters for convenience
pub use notice_adapters::{LogNoticeAdapter, RecordingNoticeAdapter};
