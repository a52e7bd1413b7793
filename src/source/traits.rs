use std::ops::ControlFlow;

/// A lazy, single-pass producer of elements.
///
/// `traverse` consumes the source, so a source can be walked at most once.
/// The visitor returns [`ControlFlow::Break`] to ask the source to stop
/// producing; implementations must honor it and return promptly.
pub trait Source {
    type Item;

    /// Value a plain sequential traversal hands back once it is done
    type Output;

    /// Failure raised by the production of elements itself
    type Error;

    fn traverse<F>(self, visit: F) -> Result<Self::Output, Self::Error>
    where
        F: FnMut(Self::Item) -> ControlFlow<()>;
}

impl<'a, T> Source for &'a [T] {
    type Item = &'a T;
    type Output = &'a [T];
    type Error = std::convert::Infallible;

    fn traverse<F>(self, mut visit: F) -> Result<Self::Output, Self::Error>
    where
        F: FnMut(Self::Item) -> ControlFlow<()>,
    {
        for item in self {
            if visit(item).is_break() {
                break;
            }
        }
        Ok(self)
    }
}

impl<'a, T> Source for &'a Vec<T> {
    type Item = &'a T;
    type Output = &'a Vec<T>;
    type Error = std::convert::Infallible;

    fn traverse<F>(self, visit: F) -> Result<Self::Output, Self::Error>
    where
        F: FnMut(Self::Item) -> ControlFlow<()>,
    {
        self.as_slice().traverse(visit)?;
        Ok(self)
    }
}
