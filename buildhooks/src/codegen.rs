//! Codegen dispatcher — one `gdbus-codegen` run per build step.
//!
//! `gdbus-codegen --generate-c-code=<base>` writes `<base>.c` and `<base>.h`
//! from a single invocation. Build coordinators that model one output per
//! step cannot list both, so the dispatcher owns the declared output set
//! ([`CodegenOutputs`]) and checks it after the tool returns.

use std::fmt;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::config::OnFailure;
use crate::runner::{ToolCommand, ToolRunner};

/// Stock generator program name.
pub const GDBUS_CODEGEN: &str = "gdbus-codegen";

/// Extension of the file left behind when a failure is not propagated.
pub const MARKER_EXTENSION: &str = "codegen-failed";

/// The five positional inputs of one dispatch. Values are forwarded
/// verbatim; validation is left to the generator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationRequest {
    pub interface_prefix: String,
    pub output_basename: String,
    pub c_namespace: String,
    pub output_directory: String,
    pub definition_file: String,
}

impl InvocationRequest {
    pub fn new(
        interface_prefix: impl Into<String>,
        output_basename: impl Into<String>,
        c_namespace: impl Into<String>,
        output_directory: impl Into<String>,
        definition_file: impl Into<String>,
    ) -> Self {
        Self {
            interface_prefix: interface_prefix.into(),
            output_basename: output_basename.into(),
            c_namespace: c_namespace.into(),
            output_directory: output_directory.into(),
            definition_file: definition_file.into(),
        }
    }

    /// Build the generator command line.
    pub fn command(&self, tool: &str) -> ToolCommand {
        ToolCommand::new(tool)
            .arg(format!("--interface-prefix={}", self.interface_prefix))
            .arg(format!("--generate-c-code={}", self.output_basename))
            .arg(format!("--c-namespace={}", self.c_namespace))
            .arg(format!("--output-directory={}", self.output_directory))
            .arg(self.definition_file.as_str())
    }

    pub fn outputs(&self) -> CodegenOutputs {
        let dir = Path::new(&self.output_directory);
        let base = &self.output_basename;
        CodegenOutputs {
            source: dir.join(format!("{base}.c")),
            header: dir.join(format!("{base}.h")),
            marker: dir.join(format!("{base}.{MARKER_EXTENSION}")),
        }
    }
}

/// Files one dispatch is expected to produce, plus the failure marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodegenOutputs {
    pub source: PathBuf,
    pub header: PathBuf,
    pub marker: PathBuf,
}

impl CodegenOutputs {
    /// Declared outputs that do not exist on disk.
    pub fn missing(&self) -> Vec<PathBuf> {
        [&self.source, &self.header]
            .into_iter()
            .filter(|p| !p.exists())
            .cloned()
            .collect()
    }
}

/// Why a dispatch did not produce its outputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Failure {
    /// The generator could not be started.
    Spawn(String),
    /// The generator exited non-zero or was killed by a signal.
    Status(Option<i32>),
    /// The generator reported success but left outputs missing.
    MissingOutputs(Vec<PathBuf>),
}

impl Failure {
    /// Exit code used when the failure is propagated.
    pub fn exit_code(&self) -> u8 {
        match self {
            Failure::Status(Some(code)) => u8::try_from(*code)
                .ok()
                .filter(|c| *c != 0)
                .unwrap_or(1),
            _ => 1,
        }
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Failure::Spawn(err) => write!(f, "{err}"),
            Failure::Status(Some(code)) => write!(f, "exited with status {code}"),
            Failure::Status(None) => f.write_str("terminated by signal"),
            Failure::MissingOutputs(paths) => {
                f.write_str("did not produce")?;
                for p in paths {
                    write!(f, " {}", p.display())?;
                }
                Ok(())
            }
        }
    }
}

/// Result of [`dispatch`].
#[derive(Debug)]
pub struct DispatchOutcome {
    pub command: ToolCommand,
    pub outputs: CodegenOutputs,
    pub failure: Option<Failure>,
    /// Exit code the wrapper process should return.
    pub exit_code: u8,
}

/// Run the generator for `request` and apply `on_failure`.
///
/// Under [`OnFailure::Ignore`] and [`OnFailure::Marker`] the returned exit
/// code is always 0, whatever happened to the child.
pub fn dispatch(
    request: &InvocationRequest,
    tool: &str,
    on_failure: OnFailure,
    runner: &mut dyn ToolRunner,
) -> DispatchOutcome {
    let command = request.command(tool);
    let outputs = request.outputs();

    info!(
        command = %command,
        output_dir = %request.output_directory,
        "generating D-Bus bindings"
    );

    let failure = match runner.run(&command) {
        Err(e) => Some(Failure::Spawn(format!("{e:#}"))),
        Ok(outcome) if !outcome.success() => Some(Failure::Status(outcome.code)),
        Ok(_) => {
            let missing = outputs.missing();
            (!missing.is_empty()).then_some(Failure::MissingOutputs(missing))
        }
    };

    let exit_code = match &failure {
        None => {
            info!(
                source = %outputs.source.display(),
                header = %outputs.header.display(),
                "generated"
            );
            clear_marker(&outputs.marker);
            0
        }
        Some(failure) => match on_failure {
            OnFailure::Ignore => {
                warn!(tool, reason = %failure, "code generation failed; ignoring");
                0
            }
            OnFailure::Marker => {
                warn!(
                    tool,
                    reason = %failure,
                    marker = %outputs.marker.display(),
                    "code generation failed; writing marker"
                );
                write_marker(&outputs.marker, &command, failure);
                0
            }
            OnFailure::Propagate => {
                warn!(tool, reason = %failure, "code generation failed");
                failure.exit_code()
            }
        },
    };

    DispatchOutcome {
        command,
        outputs,
        failure,
        exit_code,
    }
}

fn write_marker(path: &Path, command: &ToolCommand, failure: &Failure) {
    let content = format!("command: {command}\nreason: {failure}\n");
    if let Err(e) = std::fs::write(path, content) {
        warn!(path = %path.display(), err = %e, "could not write failure marker");
    }
}

fn clear_marker(path: &Path) {
    match std::fs::remove_file(path) {
        Ok(()) => debug!(path = %path.display(), "removed stale failure marker"),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => warn!(path = %path.display(), err = %e, "could not remove failure marker"),
    }
}
