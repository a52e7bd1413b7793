use std::panic::{self, AssertUnwindSafe};

use crossbeam::channel;
use tracing::debug;

use super::config::Config;
use super::error::RunError;
use super::feeder::{feed_pool, feed_queues};
use super::operation::Mode;
use super::relay::{Relay, dispatch_in_order};
use super::step::{Completion, IntoStep};
use crate::pool::{Fault, PoolState, WorkerPool};
use crate::source::Source;

/// Outcome of a run whose operation returns `O` over a source failing with `E`
pub type RunResult<T, O, E> =
    Result<Completion<T, <O as IntoStep>::Exit>, RunError<<O as IntoStep>::Error, E>>;

/// Value of a [`run`] that finished normally
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunValue<O, R> {
    /// Ignore-result mode: what the traversal itself returned
    Traversed(O),
    /// Order-preserving mode: every result, in input order
    Mapped(Vec<R>),
}

/// Run `op` over every element of `source` on `config.workers()` threads.
///
/// In [`Mode::IgnoreResult`] results are dropped and the traversal output is
/// returned; in [`Mode::OrderPreserving`] results are collected in input
/// order. The first exit, failure or panic observed by any thread decides the
/// outcome, and only after everything already started has finished.
pub fn run<S, F, O>(
    source: S,
    config: Config,
    mode: Mode,
    op: F,
) -> RunResult<RunValue<S::Output, O::Value>, O, S::Error>
where
    S: Source + Send,
    S::Item: Clone + Send,
    S::Error: Send,
    F: Fn(S::Item) -> O + Sync,
    O: IntoStep,
    O::Value: Send,
    O::Exit: Send,
    O::Error: Send,
{
    match mode {
        Mode::IgnoreResult => {
            run_ignoring(source, config, op).map(|done| done.map(RunValue::Traversed))
        }
        Mode::OrderPreserving => {
            run_ordered(source, config, op, |relay| relay.map(|(_, value)| value).collect())
                .map(|done| done.map(RunValue::Mapped))
        }
    }
}

/// Ignore-result mode: the calling thread feeds a bounded task queue directly
pub fn run_ignoring<S, F, O>(source: S, config: Config, op: F) -> RunResult<S::Output, O, S::Error>
where
    S: Source,
    S::Item: Send,
    S::Error: Send,
    F: Fn(S::Item) -> O + Sync,
    O: IntoStep,
    O::Exit: Send,
    O::Error: Send,
{
    debug!(mode = ?Mode::IgnoreResult, workers = config.workers(), "Run started");

    let state = PoolState::new(config);
    let (state_ref, op_ref) = (&state, &op);

    let output = crossbeam::thread::scope(move |scope| {
        let pool = WorkerPool::start(scope, state_ref, Some(config.backlog()));
        let output = feed_pool(source, &pool, state_ref, op_ref);
        pool.finalize();
        output
    })
    .unwrap_or_else(|payload| panic::resume_unwind(payload));

    finish(state.resolve(output))
}

/// Order-preserving mode.
///
/// A feeder thread walks `source` into a dispatch queue and a consumer queue,
/// a runner thread submits dispatched elements and forwards their result
/// slots in order, and `driver` runs on the calling thread reading both
/// through a [`Relay`]. Whatever `driver` returns is discarded when a fault
/// was recorded.
pub fn run_ordered<S, F, O, D, T>(
    source: S,
    config: Config,
    op: F,
    driver: D,
) -> RunResult<T, O, S::Error>
where
    S: Source + Send,
    S::Item: Clone + Send,
    S::Error: Send,
    F: Fn(S::Item) -> O + Sync,
    O: IntoStep,
    O::Value: Send,
    O::Exit: Send,
    O::Error: Send,
    D: FnOnce(&mut Relay<'_, S::Item, O::Value>) -> T,
{
    debug!(mode = ?Mode::OrderPreserving, workers = config.workers(), "Run started");

    let state = PoolState::new(config);
    let (state_ref, op_ref) = (&state, &op);

    let (value, traversal) = crossbeam::thread::scope(move |scope| {
        let pool = WorkerPool::start(scope, state_ref, None);
        let (dispatch_tx, dispatch_rx) = channel::unbounded();
        let (consume_tx, consume_rx) = channel::bounded(config.backlog());
        let (slots_tx, slots_rx) = channel::bounded(config.backlog());

        let feeder =
            scope.spawn(move |_| feed_queues(source, state_ref, vec![dispatch_tx, consume_tx]));
        let submitter = pool.submitter();
        let runner = scope.spawn(move |_| {
            dispatch_in_order(dispatch_rx, submitter, state_ref, op_ref, slots_tx);
        });

        let mut relay = Relay::new(consume_rx, slots_rx, state_ref);
        let value = panic::catch_unwind(AssertUnwindSafe(|| driver(&mut relay)));

        // Closing the relay's queues unblocks a feeder or runner still waiting on them
        state_ref.stop();
        drop(relay);
        let traversal = feeder.join().unwrap_or_else(|payload| Err(Fault::Panic(payload)));
        let _ = runner.join();
        pool.finalize();
        (value, traversal)
    })
    .unwrap_or_else(|payload| panic::resume_unwind(payload));

    let value = value.unwrap_or_else(|payload| panic::resume_unwind(payload));
    finish(state.resolve(traversal.map(|()| value)))
}

fn finish<T, B, E, S>(result: Result<Completion<T, B>, RunError<E, S>>) -> Result<Completion<T, B>, RunError<E, S>> {
    let outcome = match &result {
        Ok(Completion::Finished(_)) => "finished",
        Ok(Completion::Exited(_)) => "exited early",
        Err(RunError::Operation(_)) => "operation failed",
        Err(RunError::Traversal(_)) => "traversal failed",
    };
    debug!(outcome, "Run finished");
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Step;
    use crate::source::{Iter, TryIter};
    use std::convert::Infallible;
    use std::sync::Mutex;

    fn config(workers: usize) -> Config {
        Config::new(workers).unwrap()
    }

    #[test]
    fn ignore_mode_visits_every_element() {
        let seen = Mutex::new(Vec::new());
        let result = run_ignoring(Iter::new(0..50), config(4), |n| {
            seen.lock().unwrap().push(n);
            Ok::<_, Infallible>(())
        });

        assert_eq!(result, Ok(Completion::Finished(())));
        let mut seen = seen.into_inner().unwrap();
        seen.sort();
        assert_eq!(seen, (0..50).collect::<Vec<_>>());
    }

    #[test]
    fn ignore_mode_returns_traversal_output() {
        let items = vec![1, 2, 3];
        let result = run_ignoring(&items, config(2), |_| Ok::<_, Infallible>(()));
        let output = result.unwrap().into_value();
        assert!(std::ptr::eq(output, &items));
    }

    #[test]
    fn ordered_mode_collects_in_input_order() {
        let result = run(Iter::new(0..30u64), config(5), Mode::OrderPreserving, |n| {
            std::thread::sleep(std::time::Duration::from_millis(30 - n));
            Ok::<_, Infallible>(n * n)
        });

        let expected: Vec<u64> = (0..30).map(|n| n * n).collect();
        assert_eq!(result, Ok(Completion::Finished(RunValue::Mapped(expected))));
    }

    #[test]
    fn ignore_mode_through_run() {
        let result = run(Iter::new(0..10), config(3), Mode::IgnoreResult, |_| {
            Ok::<_, Infallible>(())
        });
        assert_eq!(result, Ok(Completion::Finished(RunValue::Traversed(()))));
    }

    #[test]
    fn operation_failure_is_raised() {
        let result = run_ignoring(Iter::new(0..20), config(4), |n| {
            if n == 7 { Err("seven") } else { Ok(()) }
        });
        assert_eq!(result, Err(RunError::Operation("seven")));
    }

    #[test]
    fn traversal_failure_is_raised() {
        let items: Vec<Result<u8, &str>> = vec![Ok(1), Ok(2), Err("no more")];
        let result = run_ordered(
            TryIter::new(items),
            config(2),
            |n| Ok::<_, Infallible>(n),
            |relay| relay.count(),
        );
        assert_eq!(result, Err(RunError::Traversal("no more")));
    }

    #[test]
    fn early_exit_is_returned() {
        let result = run_ordered(
            Iter::new(0..100),
            config(4),
            |n| {
                if n == 10 {
                    Step::<u32, &str, Infallible>::Exit("ten")
                } else {
                    Step::Next(n)
                }
            },
            |relay| relay.count(),
        );
        assert_eq!(result, Ok(Completion::Exited("ten")));
    }

    #[test]
    fn driver_stopping_early_is_not_a_fault() {
        let result = run_ordered(
            Iter::new(0..1000),
            config(4),
            |n| Ok::<_, Infallible>(n % 7 == 3),
            |relay| relay.position(|(_, hit)| hit),
        );
        assert_eq!(result, Ok(Completion::Finished(Some(3))));
    }

    #[test]
    fn results_only_driver_finishes() {
        let (done_tx, done_rx) = std::sync::mpsc::channel();
        std::thread::spawn(move || {
            let result = run_ordered(
                Iter::new(0..50),
                config(2),
                |n| Ok::<_, Infallible>(n * 2),
                |relay| std::iter::from_fn(|| relay.next_result()).collect::<Vec<_>>(),
            );
            let _ = done_tx.send(result);
        });

        let result = done_rx
            .recv_timeout(std::time::Duration::from_secs(5))
            .expect("results-only driver stalled");
        let expected: Vec<i32> = (0..50).map(|n| n * 2).collect();
        assert_eq!(result, Ok(Completion::Finished(expected)));
    }

    #[test]
    fn driver_panic_resumes_after_cleanup() {
        let result = panic::catch_unwind(|| {
            run_ordered(
                Iter::new(0..100),
                config(3),
                |n| Ok::<_, Infallible>(n),
                |relay| -> usize {
                    relay.next();
                    panic!("driver gave up")
                },
            )
        });
        assert!(result.is_err());
    }

    #[test]
    fn operation_panic_resumes_on_caller() {
        let result = panic::catch_unwind(|| {
            run_ignoring(Iter::new(0..10), config(2), |n| {
                if n == 4 {
                    panic!("operation gave up");
                }
                Ok::<_, Infallible>(())
            })
        });
        assert!(result.is_err());
    }
}
