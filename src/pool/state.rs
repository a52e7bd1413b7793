use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};

use tracing::debug;

use crate::engine::{Completion, Config, RunError, Step};

/// First qualifying event observed by any unit of a run
pub(crate) enum Fault<B, E, S> {
    Exit(B),
    Operation(E),
    Traversal(S),
    Panic(Box<dyn Any + Send + 'static>),
}

impl<B, E, S> Fault<B, E, S> {
    fn kind(&self) -> &'static str {
        match self {
            Fault::Exit(_) => "exit",
            Fault::Operation(_) => "operation",
            Fault::Traversal(_) => "traversal",
            Fault::Panic(_) => "panic",
        }
    }
}

/// Cooperative stop signal read by the feeder, the runner and the relay
pub(crate) trait Interrupt {
    fn is_stopped(&self) -> bool;
}

/// Who got to the fault cell first
enum Cell<B, E, S> {
    Open,
    /// An exit, failure or panic raised by an operation
    Held(Fault<B, E, S>),
    /// The traversal failed first and hands its fault back to its caller
    Claimed,
}

/// Coordination state shared by every unit of one run.
///
/// `first_fault` leaves `Open` at most once; either transition also raises
/// `stopped`, after which nothing new is dispatched.
pub(crate) struct PoolState<B, E, S> {
    workers: usize,
    stopped: AtomicBool,
    first_fault: Mutex<Cell<B, E, S>>,
}

impl<B, E, S> PoolState<B, E, S> {
    pub(crate) fn new(config: Config) -> Self {
        Self {
            workers: config.workers(),
            stopped: AtomicBool::new(false),
            first_fault: Mutex::new(Cell::Open),
        }
    }

    pub(crate) fn workers(&self) -> usize {
        self.workers
    }

    /// Halt further dispatch without recording a fault
    pub(crate) fn stop(&self) {
        self.stopped.store(true, Ordering::Release);
    }

    /// Move the cell out of `Open`, unless another fault got there first
    fn settle(&self, kind: &'static str, fill: impl FnOnce() -> Cell<B, E, S>) -> bool {
        let won = {
            let mut first = self
                .first_fault
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            if matches!(*first, Cell::Open) {
                *first = fill();
                true
            } else {
                false
            }
        };
        self.stop();

        if won {
            debug!(kind, "First fault recorded, stopping dispatch");
        } else {
            debug!(kind, "Later fault discarded");
        }
        won
    }

    /// Record `fault` unless another one got there first; returns whether it won
    pub(crate) fn record(&self, fault: Fault<B, E, S>) -> bool {
        self.settle(fault.kind(), move || Cell::Held(fault))
    }

    /// Run one operation call, turning exits, failures and panics into faults
    pub(crate) fn catch<T>(&self, call: impl FnOnce() -> Step<T, B, E>) -> Option<T> {
        match panic::catch_unwind(AssertUnwindSafe(call)) {
            Ok(Step::Next(value)) => Some(value),
            Ok(Step::Exit(value)) => {
                self.record(Fault::Exit(value));
                None
            }
            Ok(Step::Fail(error)) => {
                self.record(Fault::Operation(error));
                None
            }
            Err(payload) => {
                self.record(Fault::Panic(payload));
                None
            }
        }
    }

    /// Run a source traversal, catching its failure or panic.
    ///
    /// The fault is always handed back to the caller; the cell only notes
    /// whether it came before every operation fault.
    pub(crate) fn catch_traversal<O>(
        &self,
        traverse: impl FnOnce() -> Result<O, S>,
    ) -> Result<O, Fault<B, E, S>> {
        let fault = match panic::catch_unwind(AssertUnwindSafe(traverse)) {
            Ok(Ok(output)) => return Ok(output),
            Ok(Err(error)) => Fault::Traversal(error),
            Err(payload) => Fault::Panic(payload),
        };
        self.settle(fault.kind(), || Cell::Claimed);
        Err(fault)
    }

    /// Final outcome of the run, once every unit has been joined.
    ///
    /// `outcome` is the run's value, or the traversal's fault. An operation
    /// fault recorded before the traversal failed wins over both; a captured
    /// panic resumes on the calling thread.
    pub(crate) fn resolve<T>(
        self,
        outcome: Result<T, Fault<B, E, S>>,
    ) -> Result<Completion<T, B>, RunError<E, S>> {
        let cell = self
            .first_fault
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner);

        let fault = match (cell, outcome) {
            (Cell::Held(fault), _) => fault,
            (_, Err(fault)) => fault,
            (_, Ok(value)) => return Ok(Completion::Finished(value)),
        };
        match fault {
            Fault::Exit(value) => Ok(Completion::Exited(value)),
            Fault::Operation(error) => Err(RunError::Operation(error)),
            Fault::Traversal(error) => Err(RunError::Traversal(error)),
            Fault::Panic(payload) => panic::resume_unwind(payload),
        }
    }
}

impl<B, E, S> Interrupt for PoolState<B, E, S> {
    fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::Acquire)
    }
}
