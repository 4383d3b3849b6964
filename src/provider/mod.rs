//! DNS providers queried by the benchmark engine.
//!
//! A provider is anything that can resolve a domain name into a list of
//! address strings. The engine only depends on the [`Provider`] trait; the
//! concrete implementations in this module are the host resolver adapter in
//! [system] and the simulated providers in [sim] that inject configurable
//! latency and failure distributions for deterministic testing.
//!
//! Providers are selected by configuration key through [`build_providers`];
//! the available keys are listed in [`KEYS`].

#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

pub mod sim;
pub mod system;

use std::error;
use std::fmt::{Display, Formatter};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use tokio::time::Duration;

use crate::error::Error;

pub use self::sim::SimulatedProvider;
pub use self::system::SystemProvider;

//------------ Provider -------------------------------------------------------

/// A name resolution service under measurement.
///
/// Implementations must be safe to query concurrently from multiple jobs.
pub trait Provider: Send + Sync {
    /// Returns the identifier recorded in measurements and reports.
    fn name(&self) -> &str;

    /// Resolves *domain* into an ordered list of address strings.
    ///
    /// The engine enforces its own hard deadline around this call; the
    /// timeout is passed along so implementations can bound internal waits
    /// themselves.
    ///
    /// This function is intended to be cancel safe.
    fn query<'a>(
        &'a self,
        domain: &'a str,
        timeout: Duration,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<String>, QueryError>> + Send + 'a>>;
}

//------------ QueryError -----------------------------------------------------

/// A classified failure of a single query attempt.
///
/// The classification drives the engine's retry policy: rate limits and
/// resolution failures are retried with backoff while retry budget remains,
/// unexpected failures terminate the job on first occurrence. Attempt
/// timeouts are not represented here; they are detected by the engine's
/// deadline machinery.
#[derive(Clone, Debug)]
pub enum QueryError {
    /// The provider signalled throttling.
    RateLimited(String),

    /// The provider could not resolve the name.
    Resolution(String),

    /// A failure the provider could not classify.
    Unexpected(String),
}

impl QueryError {
    /// Returns the classification tag recorded as `error_type`.
    pub fn label(&self) -> &'static str {
        match self {
            QueryError::RateLimited(_) => "rate_limit",
            QueryError::Resolution(_) => "resolution",
            QueryError::Unexpected(_) => "unexpected",
        }
    }

    /// Returns whether the retry budget applies to this failure.
    ///
    /// Unclassified failures are treated as non-transient and terminate
    /// the job immediately.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, QueryError::Unexpected(_))
    }

    /// Returns the human-readable detail recorded as `error_message`.
    pub fn message(&self) -> &str {
        match self {
            QueryError::RateLimited(msg)
            | QueryError::Resolution(msg)
            | QueryError::Unexpected(msg) => msg,
        }
    }
}

impl Display for QueryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
        f.write_str(self.message())
    }
}

impl error::Error for QueryError {}

//------------ Registry -------------------------------------------------------

/// The provider keys available to configuration, in listing order.
pub const KEYS: &[&str] = &["system", "sim-stable", "sim-flaky", "sim-slow"];

/// Instantiates the provider registered under the given key.
pub fn build_provider(key: &str) -> Result<Arc<dyn Provider>, Error> {
    match key {
        "system" => Ok(Arc::new(SystemProvider::new())),
        "sim-stable" => Ok(Arc::new(SimulatedProvider::stable())),
        "sim-flaky" => Ok(Arc::new(SimulatedProvider::flaky())),
        "sim-slow" => Ok(Arc::new(SimulatedProvider::slow())),
        _ => Err(Error::UnknownProvider(key.into())),
    }
}

/// Instantiates providers for all the given configuration keys.
pub fn build_providers(
    keys: &[impl AsRef<str>],
) -> Result<Vec<Arc<dyn Provider>>, Error> {
    keys.iter()
        .map(|key| build_provider(key.as_ref()))
        .collect()
}

//============ Testing =======================================================

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn registry_builds_every_key() {
        for key in KEYS {
            let provider = build_provider(key).unwrap();
            assert_eq!(provider.name(), *key);
        }
    }

    #[test]
    fn registry_rejects_unknown_key() {
        match build_provider("sim-nonsense") {
            Err(Error::UnknownProvider(key)) => {
                assert_eq!(key, "sim-nonsense")
            }
            other => panic!("unexpected result: {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn labels() {
        assert_eq!(QueryError::RateLimited(String::new()).label(), "rate_limit");
        assert_eq!(QueryError::Resolution(String::new()).label(), "resolution");
        assert_eq!(QueryError::Unexpected(String::new()).label(), "unexpected");
    }

    #[test]
    fn retryability() {
        assert!(QueryError::RateLimited(String::new()).is_retryable());
        assert!(QueryError::Resolution(String::new()).is_retryable());
        assert!(!QueryError::Unexpected(String::new()).is_retryable());
    }
}
