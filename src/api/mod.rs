//! Cloud API client and wire types

pub mod client;
pub mod ops;
pub mod types;

pub use client::{ApiClient, ApiError, ApiResult};
pub use ops::ApiOperations;
pub use types::{Action, ActionStatus, BackupImage, Server};
