use std::convert::Infallible;
use std::ops::ControlFlow;

use super::traits::Source;

/// Source over any `IntoIterator`; never fails.
#[derive(Debug, Clone)]
pub struct Iter<I>(I);

impl<I: IntoIterator> Iter<I> {
    pub fn new(items: I) -> Self {
        Self(items)
    }
}

impl<I: IntoIterator> Source for Iter<I> {
    type Item = I::Item;
    type Output = ();
    type Error = Infallible;

    fn traverse<F>(self, mut visit: F) -> Result<(), Infallible>
    where
        F: FnMut(Self::Item) -> ControlFlow<()>,
    {
        for item in self.0 {
            if visit(item).is_break() {
                break;
            }
        }
        Ok(())
    }
}

/// Source over an iterator of `Result`s.
///
/// The first `Err` ends the traversal and becomes its failure.
#[derive(Debug, Clone)]
pub struct TryIter<I>(I);

impl<I> TryIter<I> {
    pub fn new(items: I) -> Self {
        Self(items)
    }
}

impl<I, T, E> Source for TryIter<I>
where
    I: IntoIterator<Item = Result<T, E>>,
{
    type Item = T;
    type Output = ();
    type Error = E;

    fn traverse<F>(self, mut visit: F) -> Result<(), E>
    where
        F: FnMut(T) -> ControlFlow<()>,
    {
        for item in self.0 {
            if visit(item?).is_break() {
                break;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect<S: Source>(source: S) -> (Vec<S::Item>, Result<S::Output, S::Error>) {
        let mut seen = Vec::new();
        let result = source.traverse(|item| {
            seen.push(item);
            ControlFlow::Continue(())
        });
        (seen, result)
    }

    #[test]
    fn iter_visits_every_item() {
        let (seen, result) = collect(Iter::new(0..5));
        assert_eq!(seen, vec![0, 1, 2, 3, 4]);
        assert!(result.is_ok());
    }

    #[test]
    fn iter_stops_on_break() {
        let mut seen = Vec::new();
        Iter::new(0..100)
            .traverse(|item| {
                seen.push(item);
                if seen.len() == 3 {
                    ControlFlow::Break(())
                } else {
                    ControlFlow::Continue(())
                }
            })
            .unwrap();
        assert_eq!(seen, vec![0, 1, 2]);
    }

    #[test]
    fn try_iter_fails_on_first_error() {
        let items: Vec<Result<u32, &str>> = vec![Ok(1), Ok(2), Err("broken"), Ok(4)];
        let (seen, result) = collect(TryIter::new(items));
        assert_eq!(seen, vec![1, 2]);
        assert_eq!(result, Err("broken"));
    }
}
