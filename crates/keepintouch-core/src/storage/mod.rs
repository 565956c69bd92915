mod config;
pub mod database;

pub use config::{AccountConfig, Config, HistoryConfig, LoggingConfig, RemindersConfig};
pub use database::Database;

use std::path::PathBuf;

use crate::error::Result;

/// Returns the data directory, creating it if needed.
///
/// `KEEPINTOUCH_DATA_DIR` overrides the location outright. Otherwise this is
/// `~/.config/keepintouch/`, or `~/.config/keepintouch-dev/` when
/// `KEEPINTOUCH_ENV=dev`.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf> {
    let dir = match std::env::var_os("KEEPINTOUCH_DATA_DIR") {
        Some(custom) if !custom.is_empty() => PathBuf::from(custom),
        _ => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env =
                std::env::var("KEEPINTOUCH_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("keepintouch-dev")
            } else {
                base_dir.join("keepintouch")
            }
        }
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
