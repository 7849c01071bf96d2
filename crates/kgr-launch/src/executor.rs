use std::fs::File;
use std::process::{Command, Stdio};

use kgr_core::errors::{ErrorInfo, KgrError};
use serde::{Deserialize, Serialize};

use crate::invocation::Invocation;

/// Executes a single run to completion.
pub trait RunExecutor: Send + Sync {
    /// Returns once the run has finished; `Err` for spawn failures and
    /// unsuccessful exits.
    fn execute(&self, invocation: &Invocation) -> Result<(), KgrError>;
}

/// Where the child's standard streams go.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutputMode {
    /// One console file per run, opened for the run and closed afterwards.
    #[default]
    Capture,
    /// Share the dispatcher's stdout and stderr.
    Inherit,
}

/// Spawns the external binary and waits for it, without a timeout.
#[derive(Debug, Clone, Default)]
pub struct ProcessExecutor {
    pub output: OutputMode,
}

impl ProcessExecutor {
    pub fn new(output: OutputMode) -> Self {
        Self { output }
    }

    fn run_error(code: &str, invocation: &Invocation, message: impl Into<String>) -> KgrError {
        KgrError::Dispatch(
            ErrorInfo::new(code, message)
                .with_context("index", invocation.index.to_string())
                .with_context("program", invocation.program.display().to_string()),
        )
    }
}

impl RunExecutor for ProcessExecutor {
    fn execute(&self, invocation: &Invocation) -> Result<(), KgrError> {
        let mut command = Command::new(&invocation.program);
        command.args(&invocation.args).stdin(Stdio::null());
        // The handles move into `command` and are closed when it drops,
        // whichever way this function returns.
        match self.output {
            OutputMode::Inherit => {
                command.stdout(Stdio::inherit()).stderr(Stdio::inherit());
            }
            OutputMode::Capture => {
                let path = &invocation.console_path;
                let stdout =
                    File::create(path).map_err(|err| KgrError::io("console_create", path, err))?;
                let stderr = stdout
                    .try_clone()
                    .map_err(|err| KgrError::io("console_clone", path, err))?;
                command.stdout(stdout).stderr(stderr);
            }
        }

        let status = command
            .status()
            .map_err(|err| Self::run_error("run_spawn", invocation, err.to_string()))?;
        if status.success() {
            return Ok(());
        }
        let mut err = Self::run_error("run_exit", invocation, format!("binary exited with {status}"));
        if let KgrError::Dispatch(info) = &mut err {
            if let Some(code) = status.code() {
                info.context.insert("exit_code".into(), code.to_string());
            }
            info.hint = Some(format!("see {}", invocation.log_path.display()));
        }
        Err(err)
    }
}
