//! Typed sequence operations running on worker threads.
//!
//! `Threaded<S>` pairs a [`Source`] with a [`Config`] and exposes one method
//! per entry of the operation table. Side-effect operations (`each` and
//! friends) return what the plain traversal returns; the rest hand their
//! results to a sequential algorithm in input order.
//!
//! ```no_run
//! use std::convert::Infallible;
//! use orderly::prelude::*;
//!
//! let lengths = vec!["a", "bb", "ccc"]
//!     .in_threads(4)?
//!     .map(|word| Ok::<_, Infallible>(word.len()))
//!     .map_err(RunError::into_operation)?
//!     .into_value();
//! assert_eq!(lengths, vec![1, 2, 3]);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod each;
pub mod ordered;

use tracing::debug;

use crate::engine::{
    Config, ConfigError, IntoStep, Mode, Operation, Relay, RunResult, run_ignoring, run_ordered,
};
use crate::source::{Iter, Source};

/// A source bound to a worker count
#[derive(Debug, Clone)]
pub struct Threaded<S> {
    source: S,
    config: Config,
}

impl<S: Source> Threaded<S> {
    /// Wrap `source`, rejecting fewer than two workers
    pub fn new(source: S, workers: usize) -> Result<Self, ConfigError> {
        Ok(Self::with_config(source, Config::new(workers)?))
    }

    pub fn with_config(source: S, config: Config) -> Self {
        Self { source, config }
    }

    /// Same source with another worker count
    pub fn in_threads(self, workers: usize) -> Result<Self, ConfigError> {
        Self::new(self.source, workers)
    }

    pub fn workers(&self) -> usize {
        self.config.workers()
    }

    pub fn config(&self) -> Config {
        self.config
    }

    pub fn into_source(self) -> S {
        self.source
    }

    fn ignoring<T, F, O>(
        self,
        operation: Operation,
        wrap: impl FnOnce(S) -> T,
        op: F,
    ) -> RunResult<T::Output, O, T::Error>
    where
        T: Source,
        T::Item: Send,
        T::Error: Send,
        F: Fn(T::Item) -> O + Sync,
        O: IntoStep,
        O::Exit: Send,
        O::Error: Send,
    {
        debug_assert_eq!(operation.mode(), Mode::IgnoreResult);
        debug!(operation = operation.name(), "Running in threads");
        run_ignoring(wrap(self.source), self.config, op)
    }

    fn ordered<F, O, D, T>(self, operation: Operation, op: F, driver: D) -> RunResult<T, O, S::Error>
    where
        S: Send,
        S::Item: Clone + Send,
        S::Error: Send,
        F: Fn(S::Item) -> O + Sync,
        O: IntoStep,
        O::Value: Send,
        O::Exit: Send,
        O::Error: Send,
        D: FnOnce(&mut Relay<'_, S::Item, O::Value>) -> T,
    {
        self.ordered_over(operation, |source| source, op, driver)
    }

    fn ordered_over<W, F, O, D, T>(
        self,
        operation: Operation,
        wrap: impl FnOnce(S) -> W,
        op: F,
        driver: D,
    ) -> RunResult<T, O, W::Error>
    where
        W: Source + Send,
        W::Item: Clone + Send,
        W::Error: Send,
        F: Fn(W::Item) -> O + Sync,
        O: IntoStep,
        O::Value: Send,
        O::Exit: Send,
        O::Error: Send,
        D: FnOnce(&mut Relay<'_, W::Item, O::Value>) -> T,
    {
        debug_assert_eq!(operation.mode(), Mode::OrderPreserving);
        debug!(operation = operation.name(), "Running in threads");
        run_ordered(wrap(self.source), self.config, op, driver)
    }
}

/// `.in_threads(n)` on anything iterable
pub trait InThreads: IntoIterator + Sized {
    fn in_threads(self, workers: usize) -> Result<Threaded<Iter<Self>>, ConfigError> {
        Threaded::new(Iter::new(self), workers)
    }
}

impl<I: IntoIterator> InThreads for I {}
