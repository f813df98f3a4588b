//! Post-install hook: refresh the GSettings schema cache and the GIO module
//! cache after `meson install`.
//!
//! Staged installs (`DESTDIR` set) skip the hook entirely; the caches are
//! rebuilt by the package manager on the target system instead.

use std::ffi::{OsStr, OsString};
use std::path::Path;

use tracing::{info, warn};

use crate::config::{OnFailure, ToolsConfig};
use crate::runner::{ToolCommand, ToolRunner};

/// Environment variable naming the staged-install root.
pub const STAGED_ROOT_VAR: &str = "DESTDIR";

/// Installed locations the hook refreshes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallPaths {
    /// Installed data directory, e.g. `/usr/share`.
    pub datadir: String,
    /// Installed GIO module directory, e.g. `/usr/lib/gio/modules`.
    pub gio_module_dir: String,
}

impl InstallPaths {
    pub fn schema_dir(&self) -> String {
        Path::new(&self.datadir)
            .join("glib-2.0")
            .join("schemas")
            .to_string_lossy()
            .into_owned()
    }

    /// Schema compilation followed by module-cache regeneration.
    pub fn commands(&self, tools: &ToolsConfig) -> [ToolCommand; 2] {
        [
            ToolCommand::new(tools.glib_compile_schemas.as_str()).arg(self.schema_dir()),
            ToolCommand::new(tools.gio_querymodules.as_str()).arg(self.gio_module_dir.as_str()),
        ]
    }
}

/// Current staged-install root; an empty value counts as unset.
pub fn staged_root_from_env() -> Option<OsString> {
    std::env::var_os(STAGED_ROOT_VAR).filter(|v| !v.is_empty())
}

#[derive(Debug, PartialEq, Eq)]
pub enum InstallOutcome {
    /// Staged install; no tool was run.
    Skipped,
    Ran {
        /// Commands that failed, with a reason each.
        failures: Vec<(ToolCommand, String)>,
        /// Exit code the hook process should return.
        exit_code: u8,
    },
}

impl InstallOutcome {
    pub fn exit_code(&self) -> u8 {
        match self {
            InstallOutcome::Skipped => 0,
            InstallOutcome::Ran { exit_code, .. } => *exit_code,
        }
    }
}

/// Run the post-install steps unless `staged_root` is set.
///
/// Both tools run even if the first fails. Under [`OnFailure::Propagate`]
/// the exit code is that of the first failing tool; otherwise it is 0.
pub fn post_install(
    paths: &InstallPaths,
    tools: &ToolsConfig,
    staged_root: Option<&OsStr>,
    on_failure: OnFailure,
    runner: &mut dyn ToolRunner,
) -> InstallOutcome {
    if let Some(root) = staged_root.filter(|r| !r.is_empty()) {
        info!(
            destdir = %root.to_string_lossy(),
            "staged install, skipping schema and module cache updates"
        );
        return InstallOutcome::Skipped;
    }

    let mut failures = Vec::new();
    let mut exit_code = 0;

    for command in paths.commands(tools) {
        info!(command = %command, "running post-install step");
        let (reason, code) = match runner.run(&command) {
            Ok(outcome) if outcome.success() => continue,
            Ok(outcome) => match outcome.code {
                Some(c) => (format!("exited with status {c}"), u8::try_from(c).unwrap_or(1)),
                None => ("terminated by signal".to_string(), 1),
            },
            Err(e) => (format!("{e:#}"), 1),
        };
        warn!(program = %command.program, reason = %reason, "post-install step failed");
        if on_failure == OnFailure::Propagate && exit_code == 0 {
            exit_code = code;
        }
        failures.push((command, reason));
    }

    InstallOutcome::Ran {
        failures,
        exit_code,
    }
}
