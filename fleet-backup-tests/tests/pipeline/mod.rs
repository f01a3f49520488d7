//! Pipeline tests for fleet-backup
//!
//! These run the orchestrator end to end against the mock API, with
//! image downloads served from loopback HTTP stubs.

mod fault_isolation;
mod run;
