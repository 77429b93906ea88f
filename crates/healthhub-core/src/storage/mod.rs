pub mod config;
pub mod reminders;

pub use config::Config;
pub use reminders::{Reminder, ReminderDraft, ReminderStore};

use std::path::PathBuf;

/// Returns `~/.config/healthhub[-dev]/` based on HEALTHHUB_ENV.
///
/// Set HEALTHHUB_ENV=dev to use the development data directory, or
/// HEALTHHUB_DATA_DIR to point somewhere else entirely (tests use this to
/// stay out of the real user directory).
///
/// # Errors
/// Returns an error if the home directory cannot be determined or if
/// creating the directory fails.
pub fn data_dir() -> Result<PathBuf, Box<dyn std::error::Error>> {
    if let Ok(dir) = std::env::var("HEALTHHUB_DATA_DIR") {
        let dir = PathBuf::from(dir);
        std::fs::create_dir_all(&dir)?;
        return Ok(dir);
    }

    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("HEALTHHUB_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("healthhub-dev")
    } else {
        base_dir.join("healthhub")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
