use std::collections::VecDeque;
use std::num::NonZeroUsize;
use std::ops::ControlFlow;

use super::traits::Source;

/// Pairs every element with its position in the traversal
#[derive(Debug, Clone)]
pub struct Enumerate<S> {
    inner: S,
}

impl<S: Source> Enumerate<S> {
    pub fn new(inner: S) -> Self {
        Self { inner }
    }
}

impl<S: Source> Source for Enumerate<S> {
    type Item = (usize, S::Item);
    type Output = S::Output;
    type Error = S::Error;

    fn traverse<F>(self, mut visit: F) -> Result<Self::Output, Self::Error>
    where
        F: FnMut(Self::Item) -> ControlFlow<()>,
    {
        let mut index = 0;
        self.inner.traverse(|item| {
            let flow = visit((index, item));
            index += 1;
            flow
        })
    }
}

/// Groups consecutive elements into vectors of `size`; the last group may be shorter
#[derive(Debug, Clone)]
pub struct Chunks<S> {
    inner: S,
    size: NonZeroUsize,
}

impl<S: Source> Chunks<S> {
    pub fn new(inner: S, size: NonZeroUsize) -> Self {
        Self { inner, size }
    }
}

impl<S: Source> Source for Chunks<S> {
    type Item = Vec<S::Item>;
    type Output = S::Output;
    type Error = S::Error;

    fn traverse<F>(self, mut visit: F) -> Result<Self::Output, Self::Error>
    where
        F: FnMut(Self::Item) -> ControlFlow<()>,
    {
        let size = self.size.get();
        let mut chunk = Vec::with_capacity(size);
        let mut stopped = false;

        let output = self.inner.traverse(|item| {
            chunk.push(item);
            if chunk.len() < size {
                return ControlFlow::Continue(());
            }
            let flow = visit(std::mem::replace(&mut chunk, Vec::with_capacity(size)));
            stopped = flow.is_break();
            flow
        })?;

        if !stopped && !chunk.is_empty() {
            let _ = visit(chunk);
        }
        Ok(output)
    }
}

/// Sliding windows of `size` consecutive elements
#[derive(Debug, Clone)]
pub struct Windows<S> {
    inner: S,
    size: NonZeroUsize,
}

impl<S: Source> Windows<S> {
    pub fn new(inner: S, size: NonZeroUsize) -> Self {
        Self { inner, size }
    }
}

impl<S> Source for Windows<S>
where
    S: Source,
    S::Item: Clone,
{
    type Item = Vec<S::Item>;
    type Output = S::Output;
    type Error = S::Error;

    fn traverse<F>(self, mut visit: F) -> Result<Self::Output, Self::Error>
    where
        F: FnMut(Self::Item) -> ControlFlow<()>,
    {
        let size = self.size.get();
        let mut window = VecDeque::with_capacity(size);

        self.inner.traverse(|item| {
            window.push_back(item);
            if window.len() < size {
                return ControlFlow::Continue(());
            }
            let flow = visit(window.iter().cloned().collect());
            window.pop_front();
            flow
        })
    }
}

/// Visits elements last to first; the whole pass is buffered before the first visit
#[derive(Debug, Clone)]
pub struct Reversed<S> {
    inner: S,
}

impl<S: Source> Reversed<S> {
    pub fn new(inner: S) -> Self {
        Self { inner }
    }
}

impl<S: Source> Source for Reversed<S> {
    type Item = S::Item;
    type Output = S::Output;
    type Error = S::Error;

    fn traverse<F>(self, mut visit: F) -> Result<Self::Output, Self::Error>
    where
        F: FnMut(Self::Item) -> ControlFlow<()>,
    {
        let mut buffered = Vec::new();
        let output = self.inner.traverse(|item| {
            buffered.push(item);
            ControlFlow::Continue(())
        })?;

        for item in buffered.into_iter().rev() {
            if visit(item).is_break() {
                break;
            }
        }
        Ok(output)
    }
}

/// Repeats the elements of one pass `times` times.
///
/// The underlying source is still walked once: the first pass is buffered and
/// replayed.
#[derive(Debug, Clone)]
pub struct Cycle<S> {
    inner: S,
    times: usize,
}

impl<S: Source> Cycle<S> {
    pub fn new(inner: S, times: usize) -> Self {
        Self { inner, times }
    }
}

impl<S> Source for Cycle<S>
where
    S: Source,
    S::Item: Clone,
{
    type Item = S::Item;
    type Output = S::Output;
    type Error = S::Error;

    fn traverse<F>(self, mut visit: F) -> Result<Self::Output, Self::Error>
    where
        F: FnMut(Self::Item) -> ControlFlow<()>,
    {
        if self.times == 0 {
            return self.inner.traverse(|_| ControlFlow::Break(()));
        }

        let mut buffered = Vec::new();
        let mut stopped = false;
        let output = self.inner.traverse(|item| {
            buffered.push(item.clone());
            let flow = visit(item);
            stopped = flow.is_break();
            flow
        })?;

        if !stopped {
            'replay: for _ in 1..self.times {
                for item in &buffered {
                    if visit(item.clone()).is_break() {
                        break 'replay;
                    }
                }
            }
        }
        Ok(output)
    }
}

/// Pairs each element with the next value of another iterator, `None` once it runs dry
#[derive(Debug, Clone)]
pub struct ZipWith<S, I> {
    inner: S,
    other: I,
}

impl<S: Source, I: Iterator> ZipWith<S, I> {
    pub fn new(inner: S, other: impl IntoIterator<IntoIter = I>) -> Self {
        Self {
            inner,
            other: other.into_iter(),
        }
    }
}

impl<S: Source, I: Iterator> Source for ZipWith<S, I> {
    type Item = (S::Item, Option<I::Item>);
    type Output = S::Output;
    type Error = S::Error;

    fn traverse<F>(self, mut visit: F) -> Result<Self::Output, Self::Error>
    where
        F: FnMut(Self::Item) -> ControlFlow<()>,
    {
        let mut other = self.other;
        self.inner.traverse(|item| visit((item, other.next())))
    }
}

/// Visits only the elements whose `pattern` result equals `keep`
#[derive(Debug, Clone)]
pub struct Filtered<S, P> {
    inner: S,
    pattern: P,
    keep: bool,
}

impl<S, P> Filtered<S, P>
where
    S: Source,
    P: FnMut(&S::Item) -> bool,
{
    /// Elements the pattern selects
    pub fn matching(inner: S, pattern: P) -> Self {
        Self {
            inner,
            pattern,
            keep: true,
        }
    }

    /// Elements the pattern does not select
    pub fn rejecting(inner: S, pattern: P) -> Self {
        Self {
            inner,
            pattern,
            keep: false,
        }
    }
}

impl<S, P> Source for Filtered<S, P>
where
    S: Source,
    P: FnMut(&S::Item) -> bool,
{
    type Item = S::Item;
    type Output = S::Output;
    type Error = S::Error;

    fn traverse<F>(self, mut visit: F) -> Result<Self::Output, Self::Error>
    where
        F: FnMut(Self::Item) -> ControlFlow<()>,
    {
        let Self {
            inner,
            mut pattern,
            keep,
        } = self;
        inner.traverse(|item| {
            if pattern(&item) == keep {
                visit(item)
            } else {
                ControlFlow::Continue(())
            }
        })
    }
}
