//! CLI entry point for the gdbus-codegen dispatcher.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use buildhooks::codegen::{self, InvocationRequest};
use buildhooks::config::{self, OnFailure};
use buildhooks::runner::SystemRunner;
use clap::Parser;

/// codegen-dispatch — run gdbus-codegen as a single build step that emits
/// `<basename>.c` and `<basename>.h`.
///
/// Options go before the positionals; positional values may start with `-`
/// and are forwarded verbatim.
#[derive(Parser, Debug)]
#[command(name = "codegen-dispatch", version, about)]
struct Cli {
    /// Interface prefix stripped from generated names (e.g. `org.gtk.vfs.`).
    #[arg(allow_hyphen_values = true)]
    interface_prefix: String,

    /// Base name shared by the generated `.c` and `.h` files.
    #[arg(allow_hyphen_values = true)]
    output_basename: String,

    /// C namespace for generated types (e.g. `GVfsDBus`).
    #[arg(allow_hyphen_values = true)]
    c_namespace: String,

    /// Directory the generated files are written to.
    #[arg(allow_hyphen_values = true)]
    output_directory: String,

    /// D-Bus introspection XML to generate from.
    #[arg(allow_hyphen_values = true)]
    definition_file: String,

    /// Path to a buildhooks.toml configuration file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Generator program (overrides config).
    #[arg(long)]
    tool: Option<String>,

    /// Failure handling (overrides config).
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
    if let Some(tool) = cli.tool {
        cfg.tools.gdbus_codegen = tool;
    }
    if let Some(policy) = cli.on_failure {
        cfg.codegen.on_failure = policy;
    }

    let request = InvocationRequest::new(
        cli.interface_prefix,
        cli.output_basename,
        cli.c_namespace,
        cli.output_directory,
        cli.definition_file,
    );
    let outcome = codegen::dispatch(
        &request,
        &cfg.tools.gdbus_codegen,
        cfg.codegen.on_failure,
        &mut SystemRunner,
    );
    if let (Some(failure), OnFailure::Propagate) = (&outcome.failure, cfg.codegen.on_failure) {
        eprintln!("error: `{}` {failure}", outcome.command);
    }
    Ok(ExitCode::from(outcome.exit_code))
}
