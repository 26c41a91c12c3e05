use clap::Parser;
use env_logger::Env;
use log::{error, info};
use std::sync::Arc;
use wayfarer::application::storage::notification_store::NotificationStore;
use wayfarer::cli::{execute, Cli};
use wayfarer::config::Settings;
use wayfarer::core::platform::manager::notification_policy::NotificationPolicy;
use wayfarer::infrastructure::adapters::output::rest_table_adapter::RestTableAdapter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let settings = match Settings::load(&cli.config) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Failed to load configuration from {}: {}", cli.config, e);
            std::process::exit(1);
        }
    };

    env_logger::Builder::from_env(Env::default().default_filter_or(settings.log_level.as_str())).init();
    info!("Using backend {}", settings.backend.url);

    let policy_config = match settings.notifications.policy_config() {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("Invalid notification settings: {}", e);
            std::process::exit(1);
        }
    };

    let adapter = match RestTableAdapter::new(settings.backend.rest_config()) {
        Ok(adapter) => adapter,
        Err(e) => {
            error!("Failed to set up backend client: {}", e);
            std::process::exit(1);
        }
    };

    let store = NotificationStore::with_tables(Arc::new(adapter), settings.notifications.tables());
    let policy = NotificationPolicy::new(store, policy_config);

    match execute(&cli.command, &policy).await {
        Ok(output) => println!("{}", output),
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    }
}
