/*
CLI Commands for Notifications

Command-line access to the notification policy, useful for administrative
tasks and for poking at a backend by hand.
*/

use crate::application::notifications::presentation;
use crate::core::platform::container::notification::{EntityType, NewNotification};
use crate::core::platform::manager::notification_policy::{
    CreateOutcome, NotificationPolicy, NotificationResult,
};
use clap::{Args, Parser, Subcommand};
use std::str::FromStr;

#[derive(Debug, Parser)]
#[command(name = "wayfarer", about = "Manage Wayfarer notifications")]
pub struct Cli {
    /// Path to the YAML configuration file
    #[arg(short, long, default_value = "config.yml")]
    pub config: String,

    #[command(subcommand)]
    pub command: NotificationCommands,
}

#[derive(Debug, Subcommand)]
pub enum NotificationCommands {
    /// Create a notification, subject to the rate-limit policy
    Notify(NotifyArgs),
    /// List a recipient's newest notifications
    List(RecipientArgs),
    /// Mark one notification read
    Read(NotificationIdArgs),
    /// Mark all of a recipient's notifications read
    ReadAll(RecipientArgs),
    /// Delete a notification
    Delete(NotificationIdArgs),
    /// Count a recipient's unread notifications
    Unread(RecipientArgs),
}

#[derive(Debug, Args)]
pub struct NotifyArgs {
    /// Recipient user id
    #[arg(short, long)]
    pub recipient: String,

    /// Acting user id; omit for system notifications
    #[arg(short, long)]
    pub sender: Option<String>,

    /// follow, like, comment or mention
    #[arg(short = 't', long)]
    pub entity_type: String,

    /// Route, comment or profile the notification refers to
    #[arg(short, long)]
    pub entity_id: Option<String>,

    /// Message overriding the default label
    #[arg(short, long)]
    pub message: Option<String>,
}

#[derive(Debug, Args)]
pub struct RecipientArgs {
    /// Recipient user id
    #[arg(short, long)]
    pub recipient: String,
}

#[derive(Debug, Args)]
pub struct NotificationIdArgs {
    /// Notification id
    #[arg(short, long)]
    pub id: String,
}

impl NotifyArgs {
    pub fn to_request(&self) -> NotificationResult<NewNotification> {
        let entity_type = EntityType::from_str(&self.entity_type)?;
        let mut request = NewNotification::new(self.recipient.clone(), entity_type);
        request.sender_id = self.sender.clone();
        request.entity_id = self.entity_id.clone();
        request.message = self.message.clone();
        Ok(request)
    }
}

/// Run a command and return the text to print
pub async fn execute(command: &NotificationCommands, policy: &NotificationPolicy) -> NotificationResult<String> {
    match command {
        NotificationCommands::Notify(args) => {
            let outcome = policy.create_notification(args.to_request()?).await?;
            Ok(match outcome {
                CreateOutcome::Created(n) => format!("Created notification {}", n.id),
                CreateOutcome::Suppressed(reason) => format!("Suppressed: {:?}", reason),
            })
        }
        NotificationCommands::List(args) => {
            let items = policy.list_notifications(&args.recipient).await?;
            if items.is_empty() {
                return Ok("No notifications".to_string());
            }
            let lines: Vec<String> = items
                .iter()
                .map(|item| {
                    let marker = if item.notification.is_read { " " } else { "*" };
                    format!(
                        "{} {} {} {}",
                        marker,
                        item.notification.created_at.to_rfc3339(),
                        item.notification.id,
                        presentation::display_text(item)
                    )
                })
                .collect();
            Ok(lines.join("\n"))
        }
        NotificationCommands::Read(args) => Ok(if policy.mark_read(&args.id).await? {
            format!("Marked {} read", args.id)
        } else {
            format!("Notification {} not found", args.id)
        }),
        NotificationCommands::ReadAll(args) => {
            let count = policy.mark_all_read(&args.recipient).await?;
            Ok(format!("Marked {} notifications read", count))
        }
        NotificationCommands::Delete(args) => {
            policy.delete_notification(&args.id).await?;
            Ok(format!("Deleted {}", args.id))
        }
        NotificationCommands::Unread(args) => {
            let count = policy.unread_count(&args.recipient).await?;
            Ok(count.to_string())
        }
    }
}
