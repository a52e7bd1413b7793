use crossbeam::channel::{self, Receiver, Sender};
use tracing::trace;

use crate::engine::IntoStep;
use crate::pool::{Interrupt, PoolState, Submitter};

/// Single-assignment placeholder for one element's result
pub(crate) struct Slot<R> {
    sequence: usize,
    value: Receiver<Option<R>>,
}

/// Runner: turn each queued element into a pool task and forward its slot.
///
/// Slots leave in submission order over a bounded channel, so the runner
/// never gets more than the channel's capacity ahead of the consumer.
pub(crate) fn dispatch_in_order<'env, T, F, O, S>(
    queue: Receiver<T>,
    submitter: Submitter<'env>,
    state: &'env PoolState<O::Exit, O::Error, S>,
    op: &'env F,
    slots: Sender<Slot<O::Value>>,
) where
    T: Send + 'env,
    F: Fn(T) -> O + Sync,
    O: IntoStep,
    O::Value: Send + 'env,
    O::Exit: Send,
    O::Error: Send,
    S: Send,
{
    for (sequence, item) in queue.into_iter().enumerate() {
        if state.is_stopped() {
            break;
        }

        let (result, value) = channel::bounded(1);
        let submitted = submitter.submit(move || {
            let _ = result.send(state.catch(|| op(item).into_step()));
        });
        trace!(sequence, "Submitted element");

        if !submitted || slots.send(Slot { sequence, value }).is_err() || state.is_stopped() {
            break;
        }
    }
}

/// Hands results back to a sequential consumer in input order.
///
/// Elements and results arrive on separate queues: an algorithm may read
/// elements without asking for their results (`drop_while` does once it
/// stops testing), or results without their elements. Both end early once
/// the run has stopped.
pub struct Relay<'a, T, R> {
    items: Receiver<T>,
    slots: Receiver<Slot<R>>,
    interrupt: &'a dyn Interrupt,
    taken: usize,
    consumed: usize,
}

impl<'a, T, R> Relay<'a, T, R> {
    pub(crate) fn new(
        items: Receiver<T>,
        slots: Receiver<Slot<R>>,
        interrupt: &'a dyn Interrupt,
    ) -> Self {
        Self {
            items,
            slots,
            interrupt,
            taken: 0,
            consumed: 0,
        }
    }

    /// Next source element, without waiting for any result
    pub fn next_item(&mut self) -> Option<T> {
        if self.interrupt.is_stopped() {
            return None;
        }
        let item = self.items.recv().ok()?;
        self.taken += 1;
        Some(item)
    }

    /// Result of the oldest element not yet consumed; blocks until it is done.
    ///
    /// When that element was never taken it is read and dropped, so the
    /// feeder is never left blocked on a full element queue.
    pub fn next_result(&mut self) -> Option<R> {
        if self.consumed == self.taken {
            let _ = self.items.recv();
            self.taken += 1;
        }

        let slot = self.slots.recv().ok()?;
        debug_assert_eq!(slot.sequence, self.consumed);
        self.consumed += 1;

        let value = slot.value.recv().ok().flatten();
        if self.interrupt.is_stopped() {
            return None;
        }
        value
    }

    /// Remaining source elements, ignoring their results
    pub fn items(&mut self) -> impl Iterator<Item = T> + '_ {
        std::iter::from_fn(move || self.next_item())
    }
}

impl<T, R> Iterator for Relay<'_, T, R> {
    type Item = (T, R);

    fn next(&mut self) -> Option<Self::Item> {
        let item = self.next_item()?;
        let result = self.next_result()?;
        Some((item, result))
    }
}
