//! Configuration loading for fleet-backup
//!
//! A single TOML file carries everything: API credentials, the backup
//! target directory, retention and timeouts, logging, notifications.
//!
//! ## Example Usage
//!
//! ```no_run
//! use fleet_backup::config;
//!
//! # fn main() -> Result<(), config::ConfigError> {
//! let config = config::load_config("fleet-backup.toml")?;
//! println!("Backing up into {:?}", config.global.backup_dir);
//! # Ok(())
//! # }
//! ```

mod loader;
mod types;

pub use loader::{load_config, ConfigError, Result};
pub use types::*;

/// Expand a leading tilde to the user's home directory
pub fn expand_tilde(path: &std::path::Path) -> std::path::PathBuf {
    match (path.strip_prefix("~"), dirs::home_dir()) {
        (Ok(rest), Some(home)) => home.join(rest),
        _ => path.to_path_buf(),
    }
}
