use std::convert::Infallible;
use std::ops::ControlFlow;

/// Outcome of a single operation call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step<R, B, E> {
    /// Regular result, handed on to the outer algorithm
    Next(R),
    /// Stop iterating; `B` becomes the value of the whole run
    Exit(B),
    /// The operation failed
    Fail(E),
}

/// Conversion of an operation's return value into a [`Step`].
///
/// Implemented for [`Step`] itself, for `Result<R, E>` (no early exit) and for
/// `ControlFlow<B, R>` (no failure), so operations can return whichever reads best.
pub trait IntoStep {
    type Value;
    type Exit;
    type Error;

    fn into_step(self) -> Step<Self::Value, Self::Exit, Self::Error>;
}

impl<R, B, E> IntoStep for Step<R, B, E> {
    type Value = R;
    type Exit = B;
    type Error = E;

    fn into_step(self) -> Self {
        self
    }
}

impl<R, E> IntoStep for Result<R, E> {
    type Value = R;
    type Exit = Infallible;
    type Error = E;

    fn into_step(self) -> Step<R, Infallible, E> {
        match self {
            Ok(value) => Step::Next(value),
            Err(error) => Step::Fail(error),
        }
    }
}

impl<B, R> IntoStep for ControlFlow<B, R> {
    type Value = R;
    type Exit = B;
    type Error = Infallible;

    fn into_step(self) -> Step<R, B, Infallible> {
        match self {
            ControlFlow::Continue(value) => Step::Next(value),
            ControlFlow::Break(exit) => Step::Exit(exit),
        }
    }
}

/// Successful end of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion<T, B> {
    /// Every element was accounted for
    Finished(T),
    /// An operation asked to stop early and carried this value
    Exited(B),
}

impl<T, B> Completion<T, B> {
    pub fn finished(self) -> Option<T> {
        match self {
            Completion::Finished(value) => Some(value),
            Completion::Exited(_) => None,
        }
    }

    pub fn exited(self) -> Option<B> {
        match self {
            Completion::Finished(_) => None,
            Completion::Exited(value) => Some(value),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Completion<U, B> {
        match self {
            Completion::Finished(value) => Completion::Finished(f(value)),
            Completion::Exited(value) => Completion::Exited(value),
        }
    }
}

impl<T> Completion<T, Infallible> {
    /// Unwrap a run whose operations can't exit early
    pub fn into_value(self) -> T {
        match self {
            Completion::Finished(value) => value,
            Completion::Exited(never) => match never {},
        }
    }
}
