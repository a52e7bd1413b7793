use crossbeam::channel::{self, Receiver, Sender};
use crossbeam::thread::{Scope, ScopedJoinHandle};
use tracing::trace;

use super::state::{Interrupt, PoolState};

type Task<'env> = Box<dyn FnOnce() + Send + 'env>;

enum Message<'env> {
    Run(Task<'env>),
    Stop,
}

/// Cloneable handle for pushing tasks onto a pool's queue
#[derive(Clone)]
pub(crate) struct Submitter<'env> {
    tasks: Sender<Message<'env>>,
}

impl<'env> Submitter<'env> {
    /// Enqueue a task without waiting for it to run.
    ///
    /// Blocks only while a bounded queue is full; returns false once every
    /// worker has gone away.
    pub(crate) fn submit(&self, task: impl FnOnce() + Send + 'env) -> bool {
        self.tasks.send(Message::Run(Box::new(task))).is_ok()
    }
}

/// Fixed set of threads draining one shared task queue
pub(crate) struct WorkerPool<'scope, 'env> {
    submitter: Submitter<'env>,
    handles: Vec<ScopedJoinHandle<'scope, ()>>,
}

impl<'scope, 'env> WorkerPool<'scope, 'env> {
    /// Spawn `state.workers()` threads on `scope`.
    ///
    /// `capacity` bounds the task queue; `None` leaves it unbounded.
    pub(crate) fn start<B, E, S>(
        scope: &'scope Scope<'env>,
        state: &'env PoolState<B, E, S>,
        capacity: Option<usize>,
    ) -> Self
    where
        B: Send,
        E: Send,
        S: Send,
    {
        let (tasks, queue) = match capacity {
            Some(capacity) => channel::bounded(capacity),
            None => channel::unbounded(),
        };

        let handles = (0..state.workers())
            .map(|worker| {
                let queue: Receiver<Message<'env>> = queue.clone();
                scope.spawn(move |_| {
                    while let Ok(Message::Run(task)) = queue.recv() {
                        // Queued but not yet started; dropped once the run stops
                        if state.is_stopped() {
                            continue;
                        }
                        task();
                    }
                    trace!(worker, "Worker finished");
                })
            })
            .collect();

        Self {
            submitter: Submitter { tasks },
            handles,
        }
    }

    pub(crate) fn submitter(&self) -> Submitter<'env> {
        self.submitter.clone()
    }

    pub(crate) fn submit(&self, task: impl FnOnce() + Send + 'env) -> bool {
        self.submitter.submit(task)
    }

    /// Send one stop signal per worker and join them all
    pub(crate) fn finalize(self) {
        for _ in 0..self.handles.len() {
            if self.submitter.tasks.send(Message::Stop).is_err() {
                break;
            }
        }
        for handle in self.handles {
            // Tasks run under `PoolState::catch`, so workers don't unwind
            let _ = handle.join();
        }
    }
}
