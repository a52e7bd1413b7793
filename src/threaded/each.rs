use std::num::NonZeroUsize;

use super::Threaded;
use crate::engine::{IntoStep, Operation, RunResult};
use crate::source::{Chunks, Cycle, Enumerate, Reversed, Source, Windows, ZipWith};

/// Side-effect operations; results are dropped and the run yields whatever
/// the plain traversal returns
impl<S> Threaded<S>
where
    S: Source,
    S::Item: Send,
    S::Error: Send,
{
    pub fn each<F, O>(self, op: F) -> RunResult<S::Output, O, S::Error>
    where
        F: Fn(S::Item) -> O + Sync,
        O: IntoStep,
        O::Exit: Send,
        O::Error: Send,
    {
        self.ignoring(Operation::Each, |source| source, op)
    }

    pub fn each_with_index<F, O>(self, op: F) -> RunResult<S::Output, O, S::Error>
    where
        F: Fn(S::Item, usize) -> O + Sync,
        O: IntoStep,
        O::Exit: Send,
        O::Error: Send,
    {
        self.ignoring(Operation::EachWithIndex, Enumerate::new, |(index, item)| {
            op(item, index)
        })
    }

    /// Visits last to first; the source is walked completely before the first call
    pub fn reverse_each<F, O>(self, op: F) -> RunResult<S::Output, O, S::Error>
    where
        F: Fn(S::Item) -> O + Sync,
        O: IntoStep,
        O::Exit: Send,
        O::Error: Send,
    {
        self.ignoring(Operation::ReverseEach, Reversed::new, op)
    }

    pub fn each_slice<F, O>(self, size: NonZeroUsize, op: F) -> RunResult<S::Output, O, S::Error>
    where
        F: Fn(Vec<S::Item>) -> O + Sync,
        O: IntoStep,
        O::Exit: Send,
        O::Error: Send,
    {
        self.ignoring(Operation::EachSlice, |source| Chunks::new(source, size), op)
    }

    pub fn each_cons<F, O>(self, size: NonZeroUsize, op: F) -> RunResult<S::Output, O, S::Error>
    where
        S::Item: Clone,
        F: Fn(Vec<S::Item>) -> O + Sync,
        O: IntoStep,
        O::Exit: Send,
        O::Error: Send,
    {
        self.ignoring(Operation::EachCons, |source| Windows::new(source, size), op)
    }

    /// Pairs every element with the next value of `other`, `None` once it runs dry
    pub fn zip<I, F, O>(self, other: I, op: F) -> RunResult<S::Output, O, S::Error>
    where
        I: IntoIterator,
        I::Item: Send,
        F: Fn(S::Item, Option<I::Item>) -> O + Sync,
        O: IntoStep,
        O::Exit: Send,
        O::Error: Send,
    {
        self.ignoring(
            Operation::Zip,
            |source| ZipWith::new(source, other),
            |(item, partner)| op(item, partner),
        )
    }

    /// Runs over the elements `times` times; the source itself is walked once
    pub fn cycle<F, O>(self, times: usize, op: F) -> RunResult<S::Output, O, S::Error>
    where
        S::Item: Clone,
        F: Fn(S::Item) -> O + Sync,
        O: IntoStep,
        O::Exit: Send,
        O::Error: Send,
    {
        self.ignoring(Operation::Cycle, |source| Cycle::new(source, times), op)
    }
}
