//! Backup orchestrator - drives the full lifecycle per server
//!
//! For every server in the fleet: trigger a snapshot, wait for the
//! remote action, download the newest image, verify it, rotate old
//! local copies. One server's failure never aborts the run; it is
//! reported and the loop moves on.

use crate::api::{ApiOperations, Server};
use crate::config::{expand_tilde, Config};
use crate::managers::notification::NotificationManager;
use crate::utils::download::{Downloader, ProgressFn};
use crate::utils::integrity::IntegrityChecker;
use crate::utils::retention::RetentionManager;
use crate::utils::waiter::ActionWaiter;
use anyhow::{Context, Result};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

/// Counts for one orchestrator run
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    pub attempted: usize,
    pub succeeded: usize,
    pub failed: usize,
    /// Set when the run aborted before any server was processed
    pub fatal: Option<String>,
}

pub struct BackupOrchestrator {
    api: Arc<dyn ApiOperations>,
    backup_dir: PathBuf,
    download_timeout: Duration,
    waiter: ActionWaiter,
    downloader: Downloader,
    checker: IntegrityChecker,
    retention: RetentionManager,
    notifier: Option<NotificationManager>,
}

impl BackupOrchestrator {
    /// Create an orchestrator from the loaded configuration
    pub fn new(config: &Config, api: Arc<dyn ApiOperations>) -> Self {
        let global = &config.global;
        let notifier = NotificationManager::from_config(&config.notifications);
        let download_timeout = Duration::from_secs(global.download_timeout_seconds);

        Self {
            api,
            backup_dir: expand_tilde(&global.backup_dir),
            download_timeout,
            waiter: ActionWaiter::new(Duration::from_secs(global.action_timeout_seconds)),
            downloader: Downloader::new(download_timeout),
            checker: IntegrityChecker::new(notifier.clone()),
            retention: RetentionManager::new(global.retention_days),
            notifier,
        }
    }

    /// Attach a progress observer for downloads
    pub fn with_progress(mut self, progress: ProgressFn) -> Self {
        self.downloader = Downloader::new(self.download_timeout).with_progress(progress);
        self
    }

    /// Process the whole fleet once. Per-server failures are reported
    /// and counted, never propagated; only a failed fleet listing ends
    /// the run early.
    pub fn run_once(&self) -> RunSummary {
        info!("Starting backup run");

        let servers = match self.api.list_servers() {
            Ok(servers) => servers,
            Err(e) => {
                let message = format!("Backup run aborted: could not list servers: {}", e);
                error!("{}", message);
                self.notify(&message);
                return RunSummary {
                    fatal: Some(message),
                    ..Default::default()
                };
            }
        };

        if servers.is_empty() {
            info!("No servers found to process");
            self.notify("No servers found to process backups");
            return RunSummary::default();
        }

        info!("Found {} server(s)", servers.len());

        let mut summary = RunSummary {
            attempted: servers.len(),
            ..Default::default()
        };

        for server in &servers {
            match self.process_server(server) {
                Ok(()) => {
                    info!("Finished backup for server '{}'", server.name);
                    summary.succeeded += 1;
                }
                Err(e) => {
                    summary.failed += 1;
                    let message = format!("Backup failed for server '{}': {:#}", server.name, e);
                    error!("{}", message);
                    self.notify(&message);
                }
            }
        }

        info!(
            "Backup run finished: {} succeeded, {} failed",
            summary.succeeded, summary.failed
        );
        summary
    }

    /// The per-server pipeline. Any error here is caught by run_once.
    fn process_server(&self, server: &Server) -> Result<()> {
        info!(
            "Processing backup for server '{}' (id {})",
            server.name, server.id
        );

        let action_id = self
            .api
            .trigger_backup(server.id)
            .context("Failed to trigger backup")?;
        info!("Triggered backup for '{}', action {}", server.name, action_id);

        self.waiter
            .wait(self.api.as_ref(), action_id)
            .context("Backup action did not complete")?;

        let backups = self
            .api
            .list_backups(server.id)
            .context("Failed to list backups")?;
        // The listing is ordered oldest first
        let newest = backups
            .last()
            .with_context(|| format!("No backups listed for server '{}'", server.name))?;

        let url = self
            .api
            .download_url(newest.id)
            .context("Failed to resolve download link")?;

        let artifact = self
            .downloader
            .download(&url, &server.name, &self.backup_dir)
            .context("Failed to download backup image")?;

        let verdict = self
            .checker
            .verify(self.api.as_ref(), &artifact.path, &server.name, newest.id)
            .context("Failed to verify backup image")?;
        if !verdict.ok {
            // Reported, not fatal: the suspect artifact is kept for inspection
            warn!("Keeping suspect artifact {:?}", artifact.path);
        }

        let deleted = self
            .retention
            .rotate(&server.name, &self.backup_dir)
            .context("Failed to rotate old backups")?;
        if !deleted.is_empty() {
            info!(
                "Rotated out {} old backup(s) for '{}'",
                deleted.len(),
                server.name
            );
        }

        Ok(())
    }

    /// Send an alert (if notifications are configured)
    fn notify(&self, message: &str) {
        if let Some(ref notifier) = self.notifier {
            notifier.alert(message);
        }
    }
}
