//! Application orchestrator.
//! Loads/merges config, initializes logging, installs the signal handler,
//! resolves the root, runs the walk, and prints the summary.

use anyhow::{Result, anyhow};
use clap::CommandFactory;
use std::sync::{Arc, Mutex};
use tracing::{debug, error, info};

use mtime_stamp::StampError;
use mtime_stamp::output as out;

use mtime_stamp::cli::Args;
use mtime_stamp::config::{CONFIG_ENV, config_path, create_template_config, load_config};
use mtime_stamp::{resolve_root, shutdown, stamp_tree};

use crate::logging::init_tracing;

/// Run the CLI application.
pub fn run(args: Args) -> Result<()> {
    // Handle --print-config / --init-config before logging init
    if args.print_config {
        if let Ok(cfg_env) = std::env::var(CONFIG_ENV) {
            out::print_info(&format!("Using {CONFIG_ENV} (explicit):\n  {cfg_env}\n"));
            out::print_info("To override, unset it or set it to another file.");
            return Ok(());
        }
        match config_path() {
            Some(p) => {
                out::print_info(&format!("Default mtime_stamp config path:\n  {}\n", p.display()));
                if p.exists() {
                    out::print_info("A config file already exists at that location.");
                } else {
                    out::print_info("No config file exists there yet. Run with --init-config to create a template.");
                }
            }
            None => {
                out::print_error("Could not determine a default config path.");
            }
        }
        return Ok(());
    }

    if args.init_config {
        let Some(path) = config_path() else {
            out::print_error("Could not determine a config path to initialize.");
            return Err(anyhow!("no config path available"));
        };
        if path.exists() {
            out::print_info(&format!(
                "A config file already exists at: {}",
                path.display()
            ));
            return Ok(());
        }
        create_template_config(&path)?;
        out::print_success(&format!(
            "A template mtime_stamp config was written to: {}",
            path.display()
        ));
        out::print_info("Edit the file to set `log_level`, `log_file` and `strict`, then re-run without --init-config.");
        return Ok(());
    }

    // Build config (may read XML). CLI args override config values.
    let mut cfg = load_config()?;
    args.apply_overrides(&mut cfg);

    // Missing ROOT is the same usage error clap raises for extra positionals.
    let Some(root_arg) = args.resolved_root() else {
        Args::command()
            .error(
                clap::error::ErrorKind::MissingRequiredArgument,
                "the <ROOT> directory argument is required",
            )
            .exit();
    };

    // Initialize logging and capture the guard so we can drop it on signal
    let guard_opt: Option<tracing_appender::non_blocking::WorkerGuard> =
        init_tracing(&cfg.log_level, cfg.log_file.as_deref(), args.json).map_err(|e| {
            out::print_error(&format!("Failed to initialize logging: {}", e));
            e
        })?;

    // Guard needs to be dropped on SIGINT to flush logs
    let guard_slot = Arc::new(Mutex::new(guard_opt));
    {
        let guard_slot = Arc::clone(&guard_slot);
        ctrlc::set_handler(move || {
            shutdown::request();
            out::print_warn("Received interrupt; stopping after the current file...");
            if let Ok(mut g) = guard_slot.lock() {
                let _ = g.take(); // drop guard here to flush tracing_appender
            }
        })
        .expect("failed to install signal handler");
    }

    debug!("Starting mtime_stamp: {:?}", args);

    // Main run (so we can drop guard after)
    let result = (|| -> Result<()> {
        let root = match resolve_root(&root_arg) {
            Ok(p) => p,
            Err(e) => {
                if let Some(se) = e.downcast_ref::<StampError>() {
                    let code = se.code();
                    match se {
                        StampError::RootNotFound(path) => {
                            error!(code, kind = "root_not_found", path = %path.display(), "Root path does not exist")
                        }
                        StampError::RootNotDirectory(path) => {
                            error!(code, kind = "root_not_directory", path = %path.display(), "Root path is not a directory")
                        }
                        _ => {
                            error!(code, kind = "resolve_error", error = ?se, "Failed to resolve the root path")
                        }
                    }
                } else {
                    error!(error = ?e, "Failed to resolve the root path");
                }
                return Err(e);
            }
        };

        let report = match stamp_tree(&cfg, &root) {
            Ok(r) => r,
            Err(e) => {
                if let Some(StampError::Interrupted) = e.downcast_ref::<StampError>() {
                    error!(code = "interrupted", "Walk aborted by user");
                } else {
                    error!(error = ?e, "Walk failed");
                }
                return Err(e);
            }
        };

        info!(
            root = %root.display(),
            processed = report.processed,
            renamed = report.renamed,
            failed = report.failures.len(),
            "Run completed"
        );
        out::print_user(&format!(
            "Processed {} files ({} renamed, {} failed) under '{}'",
            report.processed,
            report.renamed,
            report.failures.len(),
            root.display()
        ));
        if cfg.dry_run {
            out::print_info("Dry-run: no files were modified.");
        }

        if report.has_failures() {
            out::print_warn(&format!(
                "{} entries failed; see the log for details.",
                report.failures.len()
            ));
            if cfg.strict {
                return Err(anyhow!(
                    "{} of {} files failed to rename",
                    report.failures.len(),
                    report.processed
                ));
            }
        }
        Ok(())
    })();

    // Ensure logs are flushed before exit
    if let Ok(mut g) = guard_slot.lock() {
        let _ = g.take();
    }

    result
}
