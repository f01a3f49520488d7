//! Test utilities for fleet-backup
//!
//! Shared builders, fixtures and loopback HTTP stubs for exercising the
//! backup pipeline without a live cloud account.
//!
//! ```rust,ignore
//! use test_utils::{ConfigBuilder, MockApi, sample_fleet};
//!
//! #[test]
//! fn my_test() {
//!     let (config, _temp_dir) = ConfigBuilder::new().persist();
//!     let mock = MockApi::new().with_servers(sample_fleet());
//!     // drive the pipeline against the mock
//! }
//! ```

pub mod config_builder;
pub mod fixtures;
pub mod http_stub;
pub mod test_context;

pub use config_builder::ConfigBuilder;
pub use fixtures::*;
pub use test_context::TestContext;

// Re-exported from the main crate so test files need one import line.
pub use fleet_backup::api::ops::mock::{ApiCall, MockApi};
pub use fleet_backup::api::{ActionStatus, ApiOperations, BackupImage, Server};
pub use fleet_backup::config::{Config, GlobalConfig, NotificationConfig};
pub use fleet_backup::managers::backup::{BackupOrchestrator, RunSummary};

/// Result alias for tests that bubble setup errors with `?`.
pub type TestResult<T = ()> = anyhow::Result<T>;
