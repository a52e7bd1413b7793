use std::io::{self, BufRead};
use std::process::{Command, ExitStatus, Stdio};

use thiserror::Error;
use tracing::debug;

use super::error::AppError;
use crate::engine::{Config, Operation};
use crate::source::TryIter;
use crate::threaded::Threaded;

/// Failure of one external command
#[derive(Error, Debug)]
pub enum CommandError {
    #[error("Failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("{program} failed on {item} ({status})")]
    Failed {
        program: String,
        item: String,
        status: ExitStatus,
    },
}

/// External command run once per input item, with the item as last argument
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    program: String,
    args: Vec<String>,
}

impl CommandLine {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    fn command(&self, item: &str) -> Command {
        let mut command = Command::new(&self.program);
        command.args(&self.args).arg(item).stdin(Stdio::null());
        command
    }

    fn spawn_error(&self, source: io::Error) -> CommandError {
        CommandError::Spawn {
            program: self.program.clone(),
            source,
        }
    }

    fn failed(&self, item: &str, status: ExitStatus) -> CommandError {
        CommandError::Failed {
            program: self.program.clone(),
            item: item.to_string(),
            status,
        }
    }

    /// Whether the command exits successfully; only a failure to start is an error
    pub fn succeeds(&self, item: &str) -> Result<bool, CommandError> {
        let status = self
            .command(item)
            .stdout(Stdio::null())
            .status()
            .map_err(|e| self.spawn_error(e))?;
        debug!(item, code = status.code(), "Command exited");
        Ok(status.success())
    }

    /// Run with inherited stdout, failing on a non-zero exit
    pub fn check(&self, item: &str) -> Result<(), CommandError> {
        let status = self.command(item).status().map_err(|e| self.spawn_error(e))?;
        debug!(item, code = status.code(), "Command exited");
        if status.success() {
            Ok(())
        } else {
            Err(self.failed(item, status))
        }
    }

    /// Captured stdout, failing on a non-zero exit
    pub fn output(&self, item: &str) -> Result<Vec<u8>, CommandError> {
        let output = self.command(item).output().map_err(|e| self.spawn_error(e))?;
        debug!(item, code = output.status.code(), "Command exited");
        if output.status.success() {
            Ok(output.stdout)
        } else {
            Err(self.failed(item, output.status))
        }
    }
}

/// What a batch of commands produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Report {
    /// Every command ran and succeeded
    Done,
    /// Captured stdout of every command, in input order
    Outputs(Vec<Vec<u8>>),
}

/// Run `command` once per non-empty line of `input` on `config.workers()` threads.
///
/// `operation` picks the behavior: `each` runs everything and fails on the
/// first failing command, `all` stops dispatching at the first failure in
/// input order, `map` collects outputs in input order.
pub fn run_commands<R>(
    input: R,
    operation: Operation,
    config: Config,
    command: &CommandLine,
) -> Result<Report, AppError>
where
    R: BufRead + Send,
{
    let lines = input
        .lines()
        .filter(|line| !matches!(line, Ok(line) if line.trim().is_empty()));
    let items = Threaded::with_config(TryIter::new(lines), config);

    match operation {
        Operation::Each => {
            items.each(|line| command.check(&line))?;
            Ok(Report::Done)
        }
        Operation::All => {
            let all = items.all(|line| command.succeeds(&line))?.into_value();
            if all {
                Ok(Report::Done)
            } else {
                Err(AppError::NotAllSucceeded)
            }
        }
        Operation::Map => {
            let outputs = items.map(|line| command.output(&line))?.into_value();
            Ok(Report::Outputs(outputs))
        }
        other => Err(AppError::InvalidArguments(format!(
            "mode {} is not available from the command line",
            other.name()
        ))),
    }
}
