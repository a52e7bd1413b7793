//! Prelude module for convenient imports
//!
//! Import everything you need with: `use orderly::prelude::*;`

// Source types
pub use crate::source::{Chunks, Cycle, Enumerate, Iter, Reversed, Source, TryIter, Windows, ZipWith};

// Engine types
pub use crate::engine::{
    Completion, Config, ConfigError, DEFAULT_WORKERS, IntoStep, MIN_WORKERS, Mode, OPERATIONS,
    Operation, Relay, RunError, RunResult, RunValue, SEQUENTIAL_ONLY, Step, run, run_ignoring,
    run_ordered,
};

// Threaded types
pub use crate::threaded::{InThreads, Threaded};

// App types
pub use crate::app::{
    AppError, Args, CliApp, CommandError, CommandLine, Report, WORKERS_ENV, Writers, parse_args,
    run_commands, write_all,
};
