mod api;
mod config;
mod managers;
mod utils;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use managers::backup::BackupOrchestrator;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "fleet-backup")]
#[command(about = "Backup orchestration tool for a cloud server fleet", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "/etc/fleet-backup/config.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Trigger, download and rotate backups for every server in the fleet
    Run,

    /// List the servers visible to the configured API token
    Servers,

    /// Show the local artifact inventory and backup age per server
    Status,

    /// Apply the retention window to local artifacts without contacting the API
    Prune {
        /// Show what would be deleted without making changes
        #[arg(long)]
        dry_run: bool,
    },

    /// Validate configuration file
    Validate,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Validate reports on the config file itself - console logging only
    if let Some(Commands::Validate) = &cli.command {
        managers::logging::init_console_logging();
        return handle_validate(&cli.config);
    }

    // Load and validate configuration
    let config = config::load_config(&cli.config)?;

    // Setup logging with file rotation (must keep guard alive)
    let logging_config = managers::logging::LoggingConfig::from_config(&config.global);
    let _log_guard = managers::logging::init_logging(&logging_config)?;

    let backup_dir = config::expand_tilde(&config.global.backup_dir);

    // If no command specified, run the full backup pipeline
    let command = cli.command.unwrap_or(Commands::Run);

    match command {
        Commands::Run => {
            // One run at a time; cron and manual invocations share the lock
            let _run_lock = utils::locker::RunLock::acquire(&backup_dir)?;

            let notifier =
                managers::notification::NotificationManager::from_config(&config.notifications);
            let api = api::ApiClient::new(&config.global, notifier)?;
            let orchestrator = BackupOrchestrator::new(&config, Arc::new(api))
                .with_progress(Box::new(console_progress));

            println!("Running backups for the fleet...");
            let summary = orchestrator.run_once();

            if let Some(reason) = &summary.fatal {
                eprintln!("✗ {}", reason);
            } else if summary.attempted == 0 {
                println!("No servers found to process backups.");
            } else if summary.failed > 0 {
                println!(
                    "⚠ Backups finished with failures: {} succeeded, {} failed (of {} servers)",
                    summary.succeeded, summary.failed, summary.attempted
                );
            } else {
                println!("✓ All {} backups completed successfully", summary.succeeded);
            }
            // A started run exits zero; failures surface in the logs and
            // through the notification webhook.
        }

        Commands::Servers => {
            let api = api::ApiClient::new(&config.global, None)?;
            let servers = api.list_servers()?;

            if servers.is_empty() {
                println!("No servers are visible to this API token.");
            } else {
                println!("{:<12} {}", "ID", "Name");
                println!("{}", "-".repeat(40));
                for server in &servers {
                    println!("{:<12} {}", server.id, server.name);
                }
                println!("\nTotal: {} server(s)", servers.len());
            }
        }

        Commands::Status => {
            println!("=== Local Backup Status ===\n");
            println!("Backup directory: {}", backup_dir.display());
            println!("Retention: {} days\n", config.global.retention_days);

            let server_dirs = server_directories(&backup_dir)?;
            if server_dirs.is_empty() {
                println!("No local backups found.");
            }

            let today = chrono::Local::now().date_naive();
            for dir in &server_dirs {
                let name = directory_label(dir);
                let artifacts = utils::retention::list_artifacts(dir)?;

                println!("Server: {}", name);
                match artifacts.last() {
                    Some(newest) => {
                        let age_days = (today - newest.date).num_days();
                        println!("  Artifacts: {}", artifacts.len());
                        println!("  Last Backup: {}", newest.date);
                        println!("  Age: {} day(s)", age_days);

                        // Health indicator based on age
                        let health = if age_days < 2 {
                            "✓ Healthy (recent backup)"
                        } else if age_days <= i64::from(config.global.retention_days) {
                            "⚠ Warning (backup is getting old)"
                        } else {
                            "✗ Critical (newest backup is past the retention window)"
                        };
                        println!("  Health: {}", health);
                    }
                    None => {
                        println!("  Artifacts: 0");
                        println!("  Health: ✗ No backups found");
                    }
                }
                println!();
            }
        }

        Commands::Prune { dry_run } => {
            // Rotation takes the same lock as a full run
            let _run_lock = utils::locker::RunLock::acquire(&backup_dir)?;
            let retention = utils::retention::RetentionManager::new(config.global.retention_days);

            println!("=== Pruning Local Artifacts ===\n");
            if dry_run {
                println!("DRY RUN MODE - No changes will be made\n");
            }

            let mut total = 0usize;
            for dir in server_directories(&backup_dir)? {
                let name = directory_label(&dir);

                if dry_run {
                    let expired = retention.expired(&dir)?;
                    for artifact in &expired {
                        println!("  [DRY RUN] Would delete: {}", artifact.path.display());
                    }
                    total += expired.len();
                } else {
                    let deleted = retention.rotate(&name, &backup_dir)?;
                    for path in &deleted {
                        println!("  ✓ Deleted {}", path.display());
                    }
                    total += deleted.len();
                }
            }

            if dry_run {
                println!(
                    "\n{} artifact(s) would be deleted. Run without --dry-run to apply.",
                    total
                );
            } else {
                println!("\n✓ Prune complete: {} artifact(s) deleted", total);
            }
        }

        // Validate is handled at the start of main()
        Commands::Validate => {
            unreachable!("validate is handled before config loading")
        }
    }

    Ok(())
}

/// Handle the validate command (doesn't require file logging)
fn handle_validate(config_path: &Path) -> Result<()> {
    match config::load_config(config_path) {
        Ok(config) => {
            println!("Configuration is valid!");
            println!("API endpoint: {}", config.global.api_base_url);
            println!("Backup directory: {}", config.global.backup_dir.display());
            println!("Retention: {} days", config.global.retention_days);
            println!(
                "Notifications: {}",
                if config.notifications.is_active() {
                    "enabled"
                } else {
                    "disabled"
                }
            );
            Ok(())
        }
        Err(e) => {
            eprintln!("✗ Configuration is invalid: {}", e);
            std::process::exit(1);
        }
    }
}

/// Immediate subdirectories of the backup directory, one per server
fn server_directories(backup_dir: &Path) -> Result<Vec<PathBuf>> {
    if !backup_dir.exists() {
        return Ok(Vec::new());
    }

    let mut dirs: Vec<PathBuf> = std::fs::read_dir(backup_dir)
        .with_context(|| format!("Failed to read backup directory {:?}", backup_dir))?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_dir())
        .collect();
    dirs.sort();
    Ok(dirs)
}

fn directory_label(dir: &Path) -> String {
    dir.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| dir.display().to_string())
}

/// Render download progress as an updating percentage on stderr
fn console_progress(fraction: f64) {
    let percent = (fraction * 100.0).clamp(0.0, 100.0);
    eprint!("\r  downloading... {:>5.1}%", percent);
    if fraction >= 1.0 {
        eprintln!();
    }
}
