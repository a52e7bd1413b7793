use std::collections::{HashMap, HashSet};
use std::hash::Hash;
use std::iter::Sum;

use super::Threaded;
use crate::engine::{IntoStep, Operation, RunResult};
use crate::source::{Filtered, Source};

/// Operations whose results drive a sequential algorithm.
///
/// Results reach the algorithm in input order whatever order the workers
/// finish in, so short-circuiting ones stop at the same element a plain
/// loop would. Elements past that point may already have been dispatched;
/// their results are dropped.
impl<S> Threaded<S>
where
    S: Source + Send,
    S::Item: Clone + Send,
    S::Error: Send,
{
    pub fn all<F, O>(self, pred: F) -> RunResult<bool, O, S::Error>
    where
        F: Fn(S::Item) -> O + Sync,
        O: IntoStep<Value = bool>,
        O::Exit: Send,
        O::Error: Send,
    {
        self.ordered(Operation::All, pred, |relay| relay.all(|(_, hit)| hit))
    }

    pub fn any<F, O>(self, pred: F) -> RunResult<bool, O, S::Error>
    where
        F: Fn(S::Item) -> O + Sync,
        O: IntoStep<Value = bool>,
        O::Exit: Send,
        O::Error: Send,
    {
        self.ordered(Operation::Any, pred, |relay| relay.any(|(_, hit)| hit))
    }

    pub fn none<F, O>(self, pred: F) -> RunResult<bool, O, S::Error>
    where
        F: Fn(S::Item) -> O + Sync,
        O: IntoStep<Value = bool>,
        O::Exit: Send,
        O::Error: Send,
    {
        self.ordered(Operation::NoneOf, pred, |relay| !relay.any(|(_, hit)| hit))
    }

    /// True when exactly one element matches; stops at the second match
    pub fn one<F, O>(self, pred: F) -> RunResult<bool, O, S::Error>
    where
        F: Fn(S::Item) -> O + Sync,
        O: IntoStep<Value = bool>,
        O::Exit: Send,
        O::Error: Send,
    {
        self.ordered(Operation::One, pred, |relay| {
            let mut hits = relay.filter(|(_, hit)| *hit);
            hits.next().is_some() && hits.next().is_none()
        })
    }

    pub fn find<F, O>(self, pred: F) -> RunResult<Option<S::Item>, O, S::Error>
    where
        F: Fn(S::Item) -> O + Sync,
        O: IntoStep<Value = bool>,
        O::Exit: Send,
        O::Error: Send,
    {
        self.ordered(Operation::Find, pred, |relay| {
            relay.find(|(_, hit)| *hit).map(|(item, _)| item)
        })
    }

    pub fn position<F, O>(self, pred: F) -> RunResult<Option<usize>, O, S::Error>
    where
        F: Fn(S::Item) -> O + Sync,
        O: IntoStep<Value = bool>,
        O::Exit: Send,
        O::Error: Send,
    {
        self.ordered(Operation::Position, pred, |relay| {
            relay.position(|(_, hit)| hit)
        })
    }

    pub fn take_while<F, O>(self, pred: F) -> RunResult<Vec<S::Item>, O, S::Error>
    where
        F: Fn(S::Item) -> O + Sync,
        O: IntoStep<Value = bool>,
        O::Exit: Send,
        O::Error: Send,
    {
        self.ordered(Operation::TakeWhile, pred, |relay| {
            relay.map_while(|(item, keep)| keep.then_some(item)).collect()
        })
    }

    /// Elements from the first one failing `pred` on.
    ///
    /// Results after that point are never waited for.
    pub fn drop_while<F, O>(self, pred: F) -> RunResult<Vec<S::Item>, O, S::Error>
    where
        F: Fn(S::Item) -> O + Sync,
        O: IntoStep<Value = bool>,
        O::Exit: Send,
        O::Error: Send,
    {
        self.ordered(Operation::DropWhile, pred, |relay| {
            let mut kept = Vec::new();
            while let Some((item, dropped)) = relay.next() {
                if !dropped {
                    kept.push(item);
                    kept.extend(relay.items());
                    break;
                }
            }
            kept
        })
    }

    /// Matching elements first, the rest second
    pub fn partition<F, O>(self, pred: F) -> RunResult<(Vec<S::Item>, Vec<S::Item>), O, S::Error>
    where
        F: Fn(S::Item) -> O + Sync,
        O: IntoStep<Value = bool>,
        O::Exit: Send,
        O::Error: Send,
    {
        self.ordered(Operation::Partition, pred, |relay| {
            let (hits, misses): (Vec<_>, Vec<_>) = relay.partition(|(_, hit)| *hit);
            (
                hits.into_iter().map(|(item, _)| item).collect(),
                misses.into_iter().map(|(item, _)| item).collect(),
            )
        })
    }

    pub fn filter<F, O>(self, pred: F) -> RunResult<Vec<S::Item>, O, S::Error>
    where
        F: Fn(S::Item) -> O + Sync,
        O: IntoStep<Value = bool>,
        O::Exit: Send,
        O::Error: Send,
    {
        self.ordered(Operation::Filter, pred, |relay| {
            relay.filter_map(|(item, hit)| hit.then_some(item)).collect()
        })
    }

    pub fn reject<F, O>(self, pred: F) -> RunResult<Vec<S::Item>, O, S::Error>
    where
        F: Fn(S::Item) -> O + Sync,
        O: IntoStep<Value = bool>,
        O::Exit: Send,
        O::Error: Send,
    {
        self.ordered(Operation::Reject, pred, |relay| {
            relay.filter_map(|(item, hit)| (!hit).then_some(item)).collect()
        })
    }

    pub fn count<F, O>(self, pred: F) -> RunResult<usize, O, S::Error>
    where
        F: Fn(S::Item) -> O + Sync,
        O: IntoStep<Value = bool>,
        O::Exit: Send,
        O::Error: Send,
    {
        self.ordered(Operation::Count, pred, |relay| {
            relay.filter(|(_, hit)| *hit).count()
        })
    }

    pub fn map<F, O>(self, f: F) -> RunResult<Vec<O::Value>, O, S::Error>
    where
        F: Fn(S::Item) -> O + Sync,
        O: IntoStep,
        O::Value: Send,
        O::Exit: Send,
        O::Error: Send,
    {
        self.ordered(Operation::Map, f, |relay| {
            relay.map(|(_, value)| value).collect()
        })
    }

    /// Map the elements `pattern` selects; it runs on the feeder thread
    pub fn map_matching<P, F, O>(self, pattern: P, f: F) -> RunResult<Vec<O::Value>, O, S::Error>
    where
        P: FnMut(&S::Item) -> bool + Send,
        F: Fn(S::Item) -> O + Sync,
        O: IntoStep,
        O::Value: Send,
        O::Exit: Send,
        O::Error: Send,
    {
        self.ordered_over(
            Operation::MapMatching,
            |source| Filtered::matching(source, pattern),
            f,
            |relay| std::iter::from_fn(|| relay.next_result()).collect(),
        )
    }

    /// Map the elements `pattern` does not select
    pub fn map_rejecting<P, F, O>(self, pattern: P, f: F) -> RunResult<Vec<O::Value>, O, S::Error>
    where
        P: FnMut(&S::Item) -> bool + Send,
        F: Fn(S::Item) -> O + Sync,
        O: IntoStep,
        O::Value: Send,
        O::Exit: Send,
        O::Error: Send,
    {
        self.ordered_over(
            Operation::MapRejecting,
            |source| Filtered::rejecting(source, pattern),
            f,
            |relay| std::iter::from_fn(|| relay.next_result()).collect(),
        )
    }

    pub fn filter_map<F, O, R>(self, f: F) -> RunResult<Vec<R>, O, S::Error>
    where
        F: Fn(S::Item) -> O + Sync,
        O: IntoStep<Value = Option<R>>,
        R: Send,
        O::Exit: Send,
        O::Error: Send,
    {
        self.ordered(Operation::FilterMap, f, |relay| {
            relay.filter_map(|(_, value)| value).collect()
        })
    }

    pub fn flat_map<F, O, I>(self, f: F) -> RunResult<Vec<I::Item>, O, S::Error>
    where
        F: Fn(S::Item) -> O + Sync,
        O: IntoStep<Value = I>,
        I: IntoIterator + Send,
        O::Exit: Send,
        O::Error: Send,
    {
        self.ordered(Operation::FlatMap, f, |relay| {
            relay.flat_map(|(_, values)| values).collect()
        })
    }

    /// Elements grouped by key, each group in input order
    pub fn group_by<F, O, K>(self, key: F) -> RunResult<HashMap<K, Vec<S::Item>>, O, S::Error>
    where
        F: Fn(S::Item) -> O + Sync,
        O: IntoStep<Value = K>,
        K: Eq + Hash + Send,
        O::Exit: Send,
        O::Error: Send,
    {
        self.ordered(Operation::GroupBy, key, |relay| {
            let mut groups: HashMap<K, Vec<S::Item>> = HashMap::new();
            for (item, key) in relay {
                groups.entry(key).or_default().push(item);
            }
            groups
        })
    }

    /// Last element with the greatest key
    pub fn max_by_key<F, O, K>(self, key: F) -> RunResult<Option<S::Item>, O, S::Error>
    where
        F: Fn(S::Item) -> O + Sync,
        O: IntoStep<Value = K>,
        K: Ord + Send,
        O::Exit: Send,
        O::Error: Send,
    {
        self.ordered(Operation::MaxByKey, key, |relay| {
            relay.max_by(|(_, a), (_, b)| a.cmp(b)).map(|(item, _)| item)
        })
    }

    /// First element with the smallest key
    pub fn min_by_key<F, O, K>(self, key: F) -> RunResult<Option<S::Item>, O, S::Error>
    where
        F: Fn(S::Item) -> O + Sync,
        O: IntoStep<Value = K>,
        K: Ord + Send,
        O::Exit: Send,
        O::Error: Send,
    {
        self.ordered(Operation::MinByKey, key, |relay| {
            relay.min_by(|(_, a), (_, b)| a.cmp(b)).map(|(item, _)| item)
        })
    }

    /// `(min_by_key, max_by_key)` in one pass
    pub fn minmax_by_key<F, O, K>(self, key: F) -> RunResult<Option<(S::Item, S::Item)>, O, S::Error>
    where
        F: Fn(S::Item) -> O + Sync,
        O: IntoStep<Value = K>,
        K: Ord + Clone + Send,
        O::Exit: Send,
        O::Error: Send,
    {
        self.ordered(Operation::MinMaxByKey, key, |relay| {
            let mut bounds: Option<((S::Item, K), (S::Item, K))> = None;
            for (item, key) in relay {
                bounds = Some(match bounds {
                    None => ((item.clone(), key.clone()), (item, key)),
                    Some((min, max)) => {
                        let min = if key < min.1 {
                            (item.clone(), key.clone())
                        } else {
                            min
                        };
                        let max = if key >= max.1 { (item, key) } else { max };
                        (min, max)
                    }
                });
            }
            bounds.map(|((min, _), (max, _))| (min, max))
        })
    }

    /// Stable sort by key
    pub fn sort_by_key<F, O, K>(self, key: F) -> RunResult<Vec<S::Item>, O, S::Error>
    where
        F: Fn(S::Item) -> O + Sync,
        O: IntoStep<Value = K>,
        K: Ord + Send,
        O::Exit: Send,
        O::Error: Send,
    {
        self.ordered(Operation::SortByKey, key, |relay| {
            let mut keyed: Vec<(S::Item, K)> = relay.collect();
            keyed.sort_by(|(_, a), (_, b)| a.cmp(b));
            keyed.into_iter().map(|(item, _)| item).collect()
        })
    }

    pub fn sum<F, O, R>(self, f: F) -> RunResult<R, O, S::Error>
    where
        F: Fn(S::Item) -> O + Sync,
        O: IntoStep<Value = R>,
        R: Sum<R> + Send,
        O::Exit: Send,
        O::Error: Send,
    {
        self.ordered(Operation::Sum, f, |relay| relay.map(|(_, value)| value).sum())
    }

    /// First element of every distinct key, in input order
    pub fn unique_by<F, O, K>(self, key: F) -> RunResult<Vec<S::Item>, O, S::Error>
    where
        F: Fn(S::Item) -> O + Sync,
        O: IntoStep<Value = K>,
        K: Eq + Hash + Send,
        O::Exit: Send,
        O::Error: Send,
    {
        self.ordered(Operation::UniqueBy, key, |relay| {
            let mut seen = HashSet::new();
            relay
                .filter_map(|(item, key)| seen.insert(key).then_some(item))
                .collect()
        })
    }
}
