use crate::core::platform::container::notification::{EntityType, NotificationDomainError};
use crate::core::platform::manager::notification_policy::{
    NotificationPolicyConfig, RateLimitWindows, DEFAULT_PAGE_SIZE,
};
use crate::application::storage::notification_store::NotificationTables;
use crate::infrastructure::adapters::output::rest_table_adapter::RestTableConfig;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

const MINUTE_MS: u64 = 60 * 1000;
const DAY_MS: u64 = 24 * 60 * MINUTE_MS;

/// Connection to the hosted data platform
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct BackendConfig {
    pub url: String,
    pub api_key: String,
    pub schema: String,
    pub timeout_seconds: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        let rest = RestTableConfig::default();
        Self {
            url: rest.base_url,
            api_key: rest.api_key,
            schema: rest.schema,
            timeout_seconds: rest.timeout_seconds,
        }
    }
}

impl BackendConfig {
    pub fn rest_config(&self) -> RestTableConfig {
        RestTableConfig {
            base_url: self.url.clone(),
            api_key: self.api_key.clone(),
            schema: self.schema.clone(),
            timeout_seconds: self.timeout_seconds,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct NotificationSettings {
    pub table: String,
    pub profiles_table: String,
    pub page_size: usize,
    /// Entity type tag -> rate-limit window in milliseconds
    pub rate_limit_windows_ms: HashMap<String, u64>,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        let mut rate_limit_windows_ms = HashMap::new();
        rate_limit_windows_ms.insert(EntityType::Follow.as_str().to_string(), DAY_MS);
        rate_limit_windows_ms.insert(EntityType::Like.as_str().to_string(), MINUTE_MS);
        rate_limit_windows_ms.insert(EntityType::Comment.as_str().to_string(), MINUTE_MS);

        Self {
            table: "notifications".to_string(),
            profiles_table: "profiles".to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            rate_limit_windows_ms,
        }
    }
}

impl NotificationSettings {
    pub fn policy_config(&self) -> Result<NotificationPolicyConfig, NotificationDomainError> {
        Ok(NotificationPolicyConfig {
            windows: RateLimitWindows::from_millis(&self.rate_limit_windows_ms)?,
            page_size: self.page_size.min(DEFAULT_PAGE_SIZE),
        })
    }

    pub fn tables(&self) -> NotificationTables {
        NotificationTables {
            notifications: self.table.clone(),
            profiles: self.profiles_table.clone(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    pub backend: BackendConfig,
    pub notifications: NotificationSettings,
    pub log_level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            backend: BackendConfig::default(),
            notifications: NotificationSettings::default(),
            log_level: "info".to_string(),
        }
    }
}

impl Settings {
    /// Layered load: the YAML file at `path`, then `config.$APP_ENV` if present,
    /// then `APP_*` variables (`APP_BACKEND__API_KEY` sets `backend.api_key`)
    pub fn load(path: &str) -> Result<Self, ConfigError> {
        Self::layered(Config::builder().add_source(File::new(path, FileFormat::Yaml)))
    }

    /// Same layering with the YAML document given inline
    pub fn from_yaml_str(content: &str) -> Result<Self, ConfigError> {
        Self::layered(Config::builder().add_source(File::from_str(content, FileFormat::Yaml)))
    }

    fn layered(mut builder: ConfigBuilder<DefaultState>) -> Result<Self, ConfigError> {
        if let Ok(env) = std::env::var("APP_ENV") {
            builder = builder.add_source(File::with_name(&format!("config.{}", env)).required(false));
        }

        builder
            .add_source(
                Environment::with_prefix("APP")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_defaults_match_policy_defaults() {
        let settings = Settings::default();
        let policy = settings.notifications.policy_config().unwrap();

        assert_eq!(policy, NotificationPolicyConfig::default());
        assert_eq!(settings.notifications.page_size, 50);
        assert_eq!(settings.log_level, "info");
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let yaml = r#"
backend:
  url: "https://project.example.co"
  api_key: "anon-key"
notifications:
  rate_limit_windows_ms:
    follow: 3600000
"#;
        let settings = Settings::from_yaml_str(yaml).unwrap();

        assert_eq!(settings.backend.url, "https://project.example.co");
        assert_eq!(settings.backend.schema, "public");
        assert_eq!(settings.notifications.table, "notifications");

        let policy = settings.notifications.policy_config().unwrap();
        assert_eq!(policy.windows.window_for(EntityType::Follow), Some(Duration::hours(1)));
        assert_eq!(policy.windows.window_for(EntityType::Like), None);
    }

    #[test]
    fn test_unknown_window_tag_is_rejected() {
        let yaml = r#"
notifications:
  rate_limit_windows_ms:
    bookmark: 1000
"#;
        let settings = Settings::from_yaml_str(yaml).unwrap();
        assert_eq!(
            settings.notifications.policy_config(),
            Err(NotificationDomainError::UnknownEntityType("bookmark".to_string()))
        );
    }

    #[test]
    fn test_backend_maps_to_rest_config() {
        let settings = Settings::default();
        let rest = settings.backend.rest_config();
        assert_eq!(rest.base_url, settings.backend.url);
        assert_eq!(rest.timeout_seconds, 10);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        assert!(Settings::load("does-not-exist.yml").is_err());
    }

    #[test]
    fn test_load_reads_yaml_file() {
        let path = std::env::temp_dir().join(format!("wayfarer-settings-{}.yml", std::process::id()));
        std::fs::write(&path, "log_level: debug\nnotifications:\n  table: inbox\n").unwrap();

        let settings = Settings::load(path.to_str().unwrap());
        std::fs::remove_file(&path).unwrap();

        let settings = settings.unwrap();
        assert_eq!(settings.log_level, "debug");
        assert_eq!(settings.notifications.table, "inbox");
        assert_eq!(settings.notifications.profiles_table, "profiles");
    }

    #[test]
    fn test_environment_overrides_file_values() {
        std::env::set_var("APP_BACKEND__API_KEY", "service-key");
        let settings = Settings::from_yaml_str("backend:\n  api_key: \"file-key\"\n");
        std::env::remove_var("APP_BACKEND__API_KEY");

        assert_eq!(settings.unwrap().backend.api_key, "service-key");
    }

    #[test]
    fn test_policy_config_caps_page_size() {
        let settings = Settings::from_yaml_str("notifications:\n  page_size: 80\n").unwrap();
        assert_eq!(settings.notifications.page_size, 80);

        let policy = settings.notifications.policy_config().unwrap();
        assert_eq!(policy.page_size, DEFAULT_PAGE_SIZE);
    }
}
