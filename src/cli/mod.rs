pub mod notification_commands;

pub use notification_commands::{execute, Cli, NotificationCommands};

/*
CLI Module Tests

Argument parsing and command execution against an in-memory backend.
*/
