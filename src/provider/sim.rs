//! Simulated providers with configurable failure distributions.

#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::future::Future;
use std::pin::Pin;
use tokio::time::{sleep, Duration};

use super::{Provider, QueryError};

//------------ SimulatedProvider ----------------------------------------------

/// A provider that simulates latency and failures.
///
/// Each query sleeps for a uniformly drawn latency and then rolls once
/// against the configured rates, in order: rate limit, timeout, resolution
/// failure. A "timeout" outcome sleeps past the caller's deadline so the
/// engine's timeout machinery fires. Anything else succeeds with a single
/// synthetic address from the 198.51.100.0/24 documentation range.
#[derive(Debug)]
pub struct SimulatedProvider {
    /// The identifier recorded in measurements.
    name: String,

    /// Lower bound of the simulated latency.
    min_latency: Duration,

    /// Upper bound of the simulated latency.
    max_latency: Duration,

    /// Probability of a resolution failure.
    failure_rate: f64,

    /// Probability of outsleeping the caller's deadline.
    timeout_rate: f64,

    /// Probability of a rate-limit response.
    rate_limit_rate: f64,

    /// Random source for latency draws and outcome rolls.
    rng: Mutex<StdRng>,
}

impl SimulatedProvider {
    /// Creates a new simulated provider.
    pub fn new(
        name: impl Into<String>,
        min_latency: Duration,
        max_latency: Duration,
        failure_rate: f64,
        timeout_rate: f64,
        rate_limit_rate: f64,
    ) -> Self {
        Self {
            name: name.into(),
            min_latency,
            max_latency: max_latency.max(min_latency),
            failure_rate,
            timeout_rate,
            rate_limit_rate,
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Replaces the random source with a seeded one.
    pub fn seeded(self, seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
            ..self
        }
    }

    /// A provider that almost always answers quickly.
    pub fn stable() -> Self {
        Self::new(
            "sim-stable",
            Duration::from_millis(15),
            Duration::from_millis(50),
            0.01,
            0.01,
            0.01,
        )
    }

    /// A provider with substantial failure, timeout, and throttling rates.
    pub fn flaky() -> Self {
        Self::new(
            "sim-flaky",
            Duration::from_millis(30),
            Duration::from_millis(300),
            0.15,
            0.10,
            0.08,
        )
    }

    /// A provider that answers reliably but slowly.
    pub fn slow() -> Self {
        Self::new(
            "sim-slow",
            Duration::from_millis(100),
            Duration::from_millis(600),
            0.05,
            0.05,
            0.02,
        )
    }

    /// Runs one simulated query.
    async fn simulate(
        &self,
        domain: &str,
        timeout: Duration,
    ) -> Result<Vec<String>, QueryError> {
        // Draw everything up front so the lock is never held across an
        // await point.
        let (latency, mut roll, octet) = {
            let mut rng = self.rng.lock();
            let latency = rng.gen_range(
                self.min_latency.as_secs_f64()..=self.max_latency.as_secs_f64(),
            );
            (latency, rng.gen_range(0.0..1.0), rng.gen_range(1..=254u8))
        };
        sleep(Duration::from_secs_f64(latency)).await;

        if roll < self.rate_limit_rate {
            return Err(QueryError::RateLimited(format!(
                "{} throttled request for {}",
                self.name, domain
            )));
        }
        roll -= self.rate_limit_rate;

        if roll < self.timeout_rate {
            // Outsleep the deadline so the engine classifies a timeout.
            sleep(timeout * 2).await;
            return Ok(Vec::new());
        }
        roll -= self.timeout_rate;

        if roll < self.failure_rate {
            return Err(QueryError::Resolution(format!(
                "{} failed to resolve {}",
                self.name, domain
            )));
        }

        Ok(vec![format!("198.51.100.{}", octet)])
    }
}

impl Provider for SimulatedProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn query<'a>(
        &'a self,
        domain: &'a str,
        timeout: Duration,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<String>, QueryError>> + Send + 'a>>
    {
        Box::pin(self.simulate(domain, timeout))
    }
}

//============ Testing =======================================================

#[cfg(test)]
mod test {
    use super::*;

    /// A provider whose rates force a fixed outcome, regardless of seed.
    fn fixed(failure: f64, timeout: f64, rate_limit: f64) -> SimulatedProvider {
        SimulatedProvider::new(
            "sim-test",
            Duration::from_millis(1),
            Duration::from_millis(2),
            failure,
            timeout,
            rate_limit,
        )
        .seeded(1)
    }

    #[tokio::test(start_paused = true)]
    async fn always_succeeds_with_synthetic_address() {
        let provider = fixed(0.0, 0.0, 0.0);
        let addresses = provider
            .query("example.com", Duration::from_secs(1))
            .await
            .unwrap();
        assert_eq!(addresses.len(), 1);
        assert!(addresses[0].starts_with("198.51.100."));
    }

    #[tokio::test(start_paused = true)]
    async fn always_rate_limits() {
        let provider = fixed(0.0, 0.0, 1.0);
        let err = provider
            .query("example.com", Duration::from_secs(1))
            .await
            .unwrap_err();
        assert!(matches!(err, QueryError::RateLimited(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn always_fails_resolution() {
        let provider = fixed(1.0, 0.0, 0.0);
        let err = provider
            .query("example.com", Duration::from_secs(1))
            .await
            .unwrap_err();
        assert!(matches!(err, QueryError::Resolution(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn seeded_providers_repeat_their_draws() {
        let a = SimulatedProvider::stable().seeded(7);
        let b = SimulatedProvider::stable().seeded(7);
        let first = a.query("example.com", Duration::from_secs(1)).await;
        let second = b.query("example.com", Duration::from_secs(1)).await;
        assert_eq!(first.ok(), second.ok());
    }
}
