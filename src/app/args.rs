use crate::engine::{Config, Operation};

use super::error::AppError;

pub const USAGE: &str = "Usage: orderly [--workers N] [--mode each|all|map] -- <command> [args...]";

/// Environment variable read when `--workers` is not given
pub const WORKERS_ENV: &str = "ORDERLY_WORKERS";

/// Parsed command line of the `orderly` binary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Args {
    pub config: Config,
    pub operation: Operation,
    pub program: String,
    pub args: Vec<String>,
}

/// Parse `args` (program name first); `env_workers` is the value of [`WORKERS_ENV`], if set
pub fn parse_args(args: Vec<String>, env_workers: Option<String>) -> Result<Args, AppError> {
    let mut rest = args.into_iter().skip(1);
    let mut workers = None;
    let mut operation = Operation::Each;
    let mut command = Vec::new();

    while let Some(arg) = rest.next() {
        match arg.as_str() {
            "--workers" | "-w" => workers = Some(value_of(&arg, rest.next())?),
            "--mode" | "-m" => {
                operation = mode(&value_of(&arg, rest.next())?)?;
            }
            "--" => {
                command.extend(rest.by_ref());
            }
            flag if flag.starts_with('-') => {
                return Err(AppError::InvalidArguments(format!(
                    "unknown option {flag}\n{USAGE}"
                )));
            }
            _ => {
                command.push(arg);
                command.extend(rest.by_ref());
            }
        }
    }

    let config = match workers.or(env_workers) {
        Some(value) => Config::new(worker_count(&value)?)?,
        None => Config::default(),
    };

    let mut command = command.into_iter();
    let Some(program) = command.next() else {
        return Err(AppError::InvalidArguments(format!("missing command\n{USAGE}")));
    };

    Ok(Args {
        config,
        operation,
        program,
        args: command.collect(),
    })
}

fn value_of(flag: &str, value: Option<String>) -> Result<String, AppError> {
    value.ok_or_else(|| AppError::InvalidArguments(format!("{flag} needs a value\n{USAGE}")))
}

fn worker_count(value: &str) -> Result<usize, AppError> {
    value
        .parse()
        .map_err(|_| AppError::InvalidArguments(format!("worker count must be a number, got {value}")))
}

fn mode(name: &str) -> Result<Operation, AppError> {
    match Operation::from_name(name)? {
        operation @ (Operation::Each | Operation::All | Operation::Map) => Ok(operation),
        operation => Err(AppError::InvalidArguments(format!(
            "mode {} is not available from the command line\n{USAGE}",
            operation.name()
        ))),
    }
}
