use super::error::ConfigError;

/// Worker count used when none is given
pub const DEFAULT_WORKERS: usize = 10;

/// Fewer workers than this can't overlap production with execution
pub const MIN_WORKERS: usize = 2;

/// Validated engine settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    workers: usize,
}

impl Config {
    /// Create a config, rejecting worker counts below [`MIN_WORKERS`]
    pub fn new(workers: usize) -> Result<Self, ConfigError> {
        if workers < MIN_WORKERS {
            return Err(ConfigError::TooFewWorkers(workers));
        }
        Ok(Self { workers })
    }

    /// Same config with another worker count
    pub fn with_workers(self, workers: usize) -> Result<Self, ConfigError> {
        Self::new(workers)
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Capacity of the bounded queues; keeps at most `workers` elements in flight
    pub(crate) fn backlog(&self) -> usize {
        self.workers - 1
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            workers: DEFAULT_WORKERS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_uses_ten_workers() {
        let config = Config::default();
        assert_eq!(config.workers(), 10);
        assert_eq!(config.backlog(), 9);
    }

    #[test]
    fn rejects_fewer_than_two_workers() {
        assert_eq!(Config::new(0), Err(ConfigError::TooFewWorkers(0)));
        assert_eq!(Config::new(1), Err(ConfigError::TooFewWorkers(1)));
    }

    #[test]
    fn accepts_two_or_more_workers() {
        assert_eq!(Config::new(2).unwrap().workers(), 2);
        assert_eq!(Config::default().with_workers(32).unwrap().workers(), 32);
    }

    #[test]
    fn with_workers_validates() {
        assert!(Config::default().with_workers(1).is_err());
    }
}
