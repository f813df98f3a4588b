//! Tool runner — the boundary between the helpers and child processes.

use std::fmt;
use std::process::Command;

use anyhow::{Context, Result};
use tracing::debug;

/// A program plus its argument list, in invocation order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl ToolCommand {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Program followed by its arguments.
    pub fn argv(&self) -> Vec<&str> {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect()
    }
}

impl fmt::Display for ToolCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.argv().join(" "))
    }
}

/// Exit state of a finished tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunOutcome {
    /// `None` when the process was killed by a signal.
    pub code: Option<i32>,
}

impl RunOutcome {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Runs one tool to completion.
pub trait ToolRunner {
    /// Returns `Err` only when the tool could not be started at all.
    fn run(&mut self, command: &ToolCommand) -> Result<RunOutcome>;
}

/// Blocking runner backed by [`std::process::Command`]; stdio is inherited.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl ToolRunner for SystemRunner {
    fn run(&mut self, command: &ToolCommand) -> Result<RunOutcome> {
        debug!(command = %command, "spawning tool");
        let status = Command::new(&command.program)
            .args(&command.args)
            .status()
            .with_context(|| format!("failed to run `{}`", command.program))?;
        debug!(program = %command.program, code = ?status.code(), "tool exited");
        Ok(RunOutcome {
            code: status.code(),
        })
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::collections::HashMap;

    use super::*;

    /// Records every command and answers with a scripted outcome per program.
    /// Programs without a scripted outcome succeed.
    #[derive(Default)]
    pub(crate) struct RecordingRunner {
        pub(crate) calls: Vec<ToolCommand>,
        outcomes: HashMap<String, Option<RunOutcome>>,
    }

    impl RecordingRunner {
        pub(crate) fn exit_with(mut self, program: &str, code: Option<i32>) -> Self {
            self.outcomes
                .insert(program.to_string(), Some(RunOutcome { code }));
            self
        }

        pub(crate) fn missing(mut self, program: &str) -> Self {
            self.outcomes.insert(program.to_string(), None);
            self
        }
    }

    impl ToolRunner for RecordingRunner {
        fn run(&mut self, command: &ToolCommand) -> Result<RunOutcome> {
            self.calls.push(command.clone());
            match self.outcomes.get(&command.program) {
                Some(Some(outcome)) => Ok(*outcome),
                Some(None) => anyhow::bail!("failed to run `{}`: not found", command.program),
                None => Ok(RunOutcome { code: Some(0) }),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_joins_program_and_args() {
        let cmd = ToolCommand::new("gio-querymodules").arg("/usr/lib/gio/modules");
        assert_eq!(cmd.to_string(), "gio-querymodules /usr/lib/gio/modules");
        assert_eq!(cmd.argv(), ["gio-querymodules", "/usr/lib/gio/modules"]);
    }

    #[test]
    fn only_zero_is_success() {
        assert!(RunOutcome { code: Some(0) }.success());
        assert!(!RunOutcome { code: Some(1) }.success());
        assert!(!RunOutcome { code: None }.success());
    }

    #[cfg(unix)]
    #[test]
    fn system_runner_reports_exit_codes() {
        let ok = SystemRunner.run(&ToolCommand::new("true")).unwrap();
        assert_eq!(ok.code, Some(0));
        let failed = SystemRunner.run(&ToolCommand::new("false")).unwrap();
        assert_eq!(failed.code, Some(1));
    }

    #[test]
    fn system_runner_errors_on_missing_program() {
        let err = SystemRunner
            .run(&ToolCommand::new("buildhooks-no-such-tool"))
            .unwrap_err();
        assert!(err.to_string().contains("buildhooks-no-such-tool"));
    }
}
