use thiserror::Error;

/// Rejected engine setup, raised before any thread is spawned
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Worker count can't be less than 2, got {0}")]
    TooFewWorkers(usize),

    #[error("Unknown operation: {0}")]
    UnknownOperation(String),

    #[error("Operation can only run sequentially: {0}")]
    SequentialOnly(String),
}

/// The single failure a run surfaces
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RunError<E, S> {
    /// Raised by the per-element operation
    #[error("Operation failed: {0}")]
    Operation(E),

    /// Raised while the source produced elements
    #[error("Traversal failed: {0}")]
    Traversal(S),
}

impl<E> RunError<E, std::convert::Infallible> {
    /// Operation error of a run over a source that can't fail
    pub fn into_operation(self) -> E {
        match self {
            RunError::Operation(error) => error,
            RunError::Traversal(never) => match never {},
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::convert::Infallible;

    #[test]
    fn error_display_formats_correctly() {
        assert_eq!(
            ConfigError::TooFewWorkers(1).to_string(),
            "Worker count can't be less than 2, got 1"
        );
        assert_eq!(
            ConfigError::UnknownOperation("frobnicate".to_string()).to_string(),
            "Unknown operation: frobnicate"
        );
        assert_eq!(
            ConfigError::SequentialOnly("fold".to_string()).to_string(),
            "Operation can only run sequentially: fold"
        );

        let op: RunError<&str, &str> = RunError::Operation("bad element");
        let walk: RunError<&str, &str> = RunError::Traversal("bad source");
        assert_eq!(op.to_string(), "Operation failed: bad element");
        assert_eq!(walk.to_string(), "Traversal failed: bad source");
    }

    #[test]
    fn into_operation_unwraps_infallible_source() {
        let error: RunError<&str, Infallible> = RunError::Operation("boom");
        assert_eq!(error.into_operation(), "boom");
    }
}
