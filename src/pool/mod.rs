pub mod state;
pub mod workers;

// Re-export commonly used types
pub(crate) use state::{Fault, Interrupt, PoolState};
pub(crate) use workers::{Submitter, WorkerPool};
