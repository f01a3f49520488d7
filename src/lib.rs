//! Fleet Backup Library
//!
//! Backup lifecycle orchestration for a fleet of cloud servers: trigger
//! remote snapshots, download the resulting images, verify them and
//! rotate out expired local copies.

pub mod api;
pub mod config;
pub mod managers;
pub mod utils;

// Re-export commonly used types
pub use api::{ApiClient, ApiOperations};
pub use config::{load_config, Config};
pub use managers::backup::{BackupOrchestrator, RunSummary};
pub use managers::logging::{init_logging, init_console_logging, LoggingConfig, LogGuard};
pub use managers::notification::NotificationManager;
