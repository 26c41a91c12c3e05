pub mod application_settings;

pub use application_settings::{BackendConfig, NotificationSettings, Settings};
