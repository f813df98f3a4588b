//! CLI entry point for the post-install hook.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use buildhooks::config::{self, OnFailure};
use buildhooks::install::{self, InstallOutcome, InstallPaths};
use buildhooks::runner::SystemRunner;
use clap::Parser;

/// post-install — compile GSettings schemas and refresh the GIO module
/// cache, unless DESTDIR is set.
///
/// Options go before the positionals; positional values may start with `-`.
#[derive(Parser, Debug)]
#[command(name = "post-install", version, about)]
struct Cli {
    /// Installed data directory (schemas live in `<datadir>/glib-2.0/schemas`).
    #[arg(allow_hyphen_values = true)]
    datadir: String,

    /// Installed GIO module directory.
    #[arg(allow_hyphen_values = true)]
    gio_module_dir: String,

    /// Path to a buildhooks.toml configuration file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Failure handling: `ignore` or `propagate` (overrides config).
    #[arg(long, value_enum)]
    on_failure: Option<OnFailure>,
}

fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("buildhooks=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut cfg = config::load_or_default(cli.config.as_deref())?;
    if let Some(policy) = cli.on_failure {
        cfg.install.on_failure = policy;
    }
    cfg.validate_install()?;

    let paths = InstallPaths {
        datadir: cli.datadir,
        gio_module_dir: cli.gio_module_dir,
    };
    let staged_root = install::staged_root_from_env();
    let outcome = install::post_install(
        &paths,
        &cfg.tools,
        staged_root.as_deref(),
        cfg.install.on_failure,
        &mut SystemRunner,
    );
    if let InstallOutcome::Ran { failures, .. } = &outcome {
        if cfg.install.on_failure == OnFailure::Propagate {
            for (command, reason) in failures {
                eprintln!("error: `{command}` {reason}");
            }
        }
    }
    Ok(ExitCode::from(outcome.exit_code()))
}
