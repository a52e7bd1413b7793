pub mod config;
pub mod error;
pub mod feeder;
pub mod operation;
pub mod relay;
pub mod run;
pub mod step;

// Re-export commonly used types
pub use config::{Config, DEFAULT_WORKERS, MIN_WORKERS};
pub use error::{ConfigError, RunError};
pub use operation::{Mode, OPERATIONS, Operation, SEQUENTIAL_ONLY};
pub use relay::Relay;
pub use run::{RunResult, RunValue, run, run_ignoring, run_ordered};
pub use step::{Completion, IntoStep, Step};
