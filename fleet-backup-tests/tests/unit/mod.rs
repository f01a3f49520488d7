//! Unit tests for fleet-backup
//!
//! These exercise the library pieces through their public API.

mod config;
mod integrity;
mod naming;
mod retention;
