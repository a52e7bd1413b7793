use std::ops::ControlFlow;

use crossbeam::channel::Sender;
use tracing::trace;

use crate::engine::IntoStep;
use crate::pool::{Fault, Interrupt, PoolState, WorkerPool};
use crate::source::Source;

/// Walk `source` once, wrapping every element into a pool task.
///
/// Runs on the calling thread; a full task queue suspends the traversal.
/// Returns the traversal output, or the fault that ended the traversal.
pub(crate) fn feed_pool<'env, S, F, O>(
    source: S,
    pool: &WorkerPool<'_, 'env>,
    state: &'env PoolState<O::Exit, O::Error, S::Error>,
    op: &'env F,
) -> Result<S::Output, Fault<O::Exit, O::Error, S::Error>>
where
    S: Source,
    S::Item: Send + 'env,
    S::Error: Send,
    F: Fn(S::Item) -> O + Sync,
    O: IntoStep,
    O::Exit: Send,
    O::Error: Send,
{
    let mut sequence = 0usize;
    state.catch_traversal(|| {
        source.traverse(|item| {
            trace!(sequence, "Dispatching element");
            sequence += 1;

            let submitted = pool.submit(move || {
                let _ = state.catch(|| op(item).into_step());
            });
            if !submitted || state.is_stopped() {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        })
    })
}

/// Walk `source` once, pushing every element onto each of `queues`.
///
/// Dropping the senders on return closes every queue, whether the source was
/// exhausted, failed, or the run was stopped.
pub(crate) fn feed_queues<S, B, E>(
    source: S,
    state: &PoolState<B, E, S::Error>,
    queues: Vec<Sender<S::Item>>,
) -> Result<(), Fault<B, E, S::Error>>
where
    S: Source,
    S::Item: Clone,
{
    let traversal = state.catch_traversal(|| {
        source.traverse(|item| {
            if !push_all(&queues, item) || state.is_stopped() {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        })
    });
    trace!(failed = traversal.is_err(), "Feeder finished");
    traversal.map(drop)
}

fn push_all<T: Clone>(queues: &[Sender<T>], item: T) -> bool {
    let Some((last, rest)) = queues.split_last() else {
        return false;
    };
    rest.iter().all(|queue| queue.send(item.clone()).is_ok()) && last.send(item).is_ok()
}
