pub mod args;
pub mod cli;
pub mod commands;
pub mod error;

// Re-export commonly used types
pub use args::{Args, USAGE, WORKERS_ENV, parse_args};
pub use cli::{CliApp, CliCommand, Writers, write_all};
pub use commands::{CommandError, CommandLine, Report, run_commands};
pub use error::AppError;
