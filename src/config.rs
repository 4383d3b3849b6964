//! Engine configuration.

#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use core::cmp;
use tokio::time::Duration;

//------------ Configuration Constants ----------------------------------------

/// Configuration limits for the number of iterations.
const ITERATIONS: DefMinMax<u32> = DefMinMax::new(3, 1, 10_000);

/// Configuration limits for the maximum number of in-flight jobs.
const CONCURRENCY: DefMinMax<usize> = DefMinMax::new(10, 1, 1000);

/// Configuration limits for the per-query timeout.
const QUERY_TIMEOUT: DefMinMax<Duration> = DefMinMax::new(
    Duration::from_millis(1500),
    Duration::from_millis(1),
    Duration::from_secs(60),
);

/// Configuration limits for the maximum number of retries.
const MAX_RETRIES: DefMinMax<u32> = DefMinMax::new(3, 0, 100);

/// Configuration limits for the backoff base delay.
const BACKOFF_BASE: DefMinMax<Duration> =
    DefMinMax::new(Duration::from_millis(200), Duration::ZERO, Duration::from_secs(30));

/// Configuration limits for the backoff ceiling.
const BACKOFF_MAX: DefMinMax<Duration> =
    DefMinMax::new(Duration::from_millis(2500), Duration::ZERO, Duration::from_secs(300));

/// Configuration limits for the backoff jitter.
const BACKOFF_JITTER: DefMinMax<Duration> =
    DefMinMax::new(Duration::from_millis(100), Duration::ZERO, Duration::from_secs(10));

//------------ Config ---------------------------------------------------------

/// Configuration for a benchmark engine.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    /// Number of passes over the provider/domain cross-product.
    iterations: u32,

    /// Maximum number of jobs past the concurrency gate at any instant.
    concurrency: usize,

    /// Hard deadline for a single query attempt.
    query_timeout: Duration,

    /// Maximum number of retries per job.
    max_retries: u32,

    /// Base delay of the exponential backoff.
    backoff_base: Duration,

    /// Ceiling of the exponential backoff.
    backoff_max: Duration,

    /// Upper bound of the uniform jitter added to each backoff delay.
    backoff_jitter: Duration,
}

impl Config {
    /// Creates a new config with default values.
    pub fn new() -> Self {
        Default::default()
    }

    /// Returns the number of iterations.
    ///
    /// Each iteration runs the full provider/domain cross-product once.
    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    /// Sets the number of iterations.
    ///
    /// If this value is too small or too large, it will be caped.
    pub fn set_iterations(&mut self, value: u32) {
        self.iterations = ITERATIONS.limit(value)
    }

    /// Returns the maximum number of concurrent jobs.
    ///
    /// Once this many jobs are currently in flight, additional jobs will
    /// wait. A job occupies its slot for its entire retry lifetime,
    /// backoff sleeps included.
    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Sets the maximum number of concurrent jobs.
    ///
    /// If this value is too small or too large, it will be caped.
    pub fn set_concurrency(&mut self, value: usize) {
        self.concurrency = CONCURRENCY.limit(value)
    }

    /// Returns the per-query timeout.
    ///
    /// The timeout bounds a single attempt, not the whole retry sequence.
    pub fn query_timeout(&self) -> Duration {
        self.query_timeout
    }

    /// Sets the per-query timeout.
    ///
    /// If this value is too small or too large, it will be caped.
    pub fn set_query_timeout(&mut self, value: Duration) {
        self.query_timeout = QUERY_TIMEOUT.limit(value)
    }

    /// Returns the maximum number of retries per job.
    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Sets the maximum number of retries per job.
    ///
    /// If this value is too large, it will be caped.
    pub fn set_max_retries(&mut self, value: u32) {
        self.max_retries = MAX_RETRIES.limit(value)
    }

    /// Returns the backoff base delay.
    pub fn backoff_base(&self) -> Duration {
        self.backoff_base
    }

    /// Sets the backoff base delay.
    ///
    /// If this value is too large, it will be caped.
    pub fn set_backoff_base(&mut self, value: Duration) {
        self.backoff_base = BACKOFF_BASE.limit(value)
    }

    /// Returns the backoff ceiling.
    ///
    /// The returned value is never less than the backoff base.
    pub fn backoff_max(&self) -> Duration {
        cmp::max(self.backoff_max, self.backoff_base)
    }

    /// Sets the backoff ceiling.
    ///
    /// If this value is too large, it will be caped.
    pub fn set_backoff_max(&mut self, value: Duration) {
        self.backoff_max = BACKOFF_MAX.limit(value)
    }

    /// Returns the backoff jitter bound.
    pub fn backoff_jitter(&self) -> Duration {
        self.backoff_jitter
    }

    /// Sets the backoff jitter bound.
    ///
    /// If this value is too large, it will be caped.
    pub fn set_backoff_jitter(&mut self, value: Duration) {
        self.backoff_jitter = BACKOFF_JITTER.limit(value)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            iterations: ITERATIONS.default(),
            concurrency: CONCURRENCY.default(),
            query_timeout: QUERY_TIMEOUT.default(),
            max_retries: MAX_RETRIES.default(),
            backoff_base: BACKOFF_BASE.default(),
            backoff_max: BACKOFF_MAX.default(),
            backoff_jitter: BACKOFF_JITTER.default(),
        }
    }
}

//------------ DefMinMax -----------------------------------------------------

/// The default, minimum, and maximum values for a config variable.
#[derive(Clone, Copy)]
struct DefMinMax<T> {
    /// The default value,
    def: T,

    /// The minimum value,
    min: T,

    /// The maximum value,
    max: T,
}

impl<T> DefMinMax<T> {
    /// Creates a new value.
    const fn new(def: T, min: T, max: T) -> Self {
        Self { def, min, max }
    }

    /// Returns the default value.
    fn default(self) -> T {
        self.def
    }

    /// Trims the given value to fit into the minimum/maximum range.
    fn limit(self, value: T) -> T
    where
        T: Ord,
    {
        cmp::max(self.min, cmp::min(self.max, value))
    }
}

//============ Testing =======================================================

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn defaults() {
        let config = Config::new();
        assert_eq!(config.iterations(), 3);
        assert_eq!(config.concurrency(), 10);
        assert_eq!(config.query_timeout(), Duration::from_millis(1500));
        assert_eq!(config.max_retries(), 3);
        assert_eq!(config.backoff_base(), Duration::from_millis(200));
        assert_eq!(config.backoff_max(), Duration::from_millis(2500));
        assert_eq!(config.backoff_jitter(), Duration::from_millis(100));
    }

    #[test]
    fn clamping() {
        let mut config = Config::new();
        config.set_iterations(0);
        assert_eq!(config.iterations(), 1);
        config.set_concurrency(0);
        assert_eq!(config.concurrency(), 1);
        config.set_concurrency(1_000_000);
        assert_eq!(config.concurrency(), 1000);
        config.set_query_timeout(Duration::ZERO);
        assert_eq!(config.query_timeout(), Duration::from_millis(1));
        config.set_query_timeout(Duration::from_secs(3600));
        assert_eq!(config.query_timeout(), Duration::from_secs(60));
        config.set_max_retries(0);
        assert_eq!(config.max_retries(), 0);
    }

    #[test]
    fn backoff_max_never_below_base() {
        let mut config = Config::new();
        config.set_backoff_base(Duration::from_secs(5));
        config.set_backoff_max(Duration::from_secs(1));
        assert_eq!(config.backoff_max(), Duration::from_secs(5));
    }
}
