//! Retry and backoff handling for a single job.

#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::Rng;
use tokio::time::{sleep, timeout, Duration, Instant};
use tracing::{debug, trace};

use super::Job;
use crate::config::Config;
use crate::measurement::Measurement;

//------------ execute --------------------------------------------------------

/// Drives one job to its terminal outcome.
///
/// The caller holds the job's concurrency permit for the whole call,
/// backoff sleeps included. Each attempt runs under the configured hard
/// deadline; the deadline bounds only that attempt, never the whole retry
/// sequence.
///
/// Outcome policy: success and timeouts are terminal immediately (a
/// provider that did not answer in time is not going to answer a retry any
/// faster), rate limits and classified query failures are retried with
/// backoff while budget remains, and unclassified failures are terminal on
/// first occurrence.
pub(super) async fn execute(
    job: Job,
    config: &Config,
    rng: &Mutex<StdRng>,
) -> Measurement {
    let started_at = Utc::now();
    let mut attempts = 0u32;
    let mut retry_count = 0u32;

    loop {
        attempts += 1;
        let attempt_start = Instant::now();
        let outcome = timeout(
            config.query_timeout(),
            job.provider.query(&job.domain, config.query_timeout()),
        )
        .await;
        let latency_ms = attempt_start.elapsed().as_secs_f64() * 1000.0;

        match outcome {
            Ok(Ok(addresses)) => {
                trace!(
                    provider = job.provider.name(),
                    domain = %job.domain,
                    latency_ms,
                    "query succeeded"
                );
                return Measurement {
                    provider: job.provider.name().into(),
                    domain: job.domain.clone(),
                    iteration: job.iteration,
                    attempts,
                    retry_count,
                    success: true,
                    started_at,
                    finished_at: Utc::now(),
                    latency_ms: Some(latency_ms),
                    error_type: None,
                    error_message: None,
                    addresses,
                };
            }
            Err(_) => {
                debug!(
                    provider = job.provider.name(),
                    domain = %job.domain,
                    "attempt timed out"
                );
                return failed(
                    &job,
                    attempts,
                    retry_count,
                    started_at,
                    latency_ms,
                    "timeout",
                    format!(
                        "timed out querying {} via {}",
                        job.domain,
                        job.provider.name()
                    ),
                );
            }
            Ok(Err(err))
                if err.is_retryable() && retry_count < config.max_retries() =>
            {
                let delay = backoff_delay(config, retry_count, rng);
                debug!(
                    provider = job.provider.name(),
                    domain = %job.domain,
                    retry = retry_count,
                    delay_ms = delay.as_millis() as u64,
                    error = %err,
                    "retrying after backoff"
                );
                sleep(delay).await;
                retry_count += 1;
            }
            Ok(Err(err)) => {
                debug!(
                    provider = job.provider.name(),
                    domain = %job.domain,
                    error = %err,
                    "query failed terminally"
                );
                return failed(
                    &job,
                    attempts,
                    retry_count,
                    started_at,
                    latency_ms,
                    err.label(),
                    err.message().into(),
                );
            }
        }
    }
}

/// Builds the terminal measurement for a failed job.
fn failed(
    job: &Job,
    attempts: u32,
    retry_count: u32,
    started_at: DateTime<Utc>,
    latency_ms: f64,
    error_type: &str,
    error_message: String,
) -> Measurement {
    Measurement {
        provider: job.provider.name().into(),
        domain: job.domain.clone(),
        iteration: job.iteration,
        attempts,
        retry_count,
        success: false,
        started_at,
        finished_at: Utc::now(),
        latency_ms: Some(latency_ms),
        error_type: Some(error_type.into()),
        error_message: Some(error_message),
        addresses: Vec::new(),
    }
}

//------------ backoff_delay --------------------------------------------------

/// Computes the delay before the next retry.
///
/// The delay doubles with every retry already consumed (the first retry
/// waits the base delay), is capped at the configured ceiling, and gets a
/// uniform draw from `[0, jitter)` added on top so concurrently retrying
/// jobs do not synchronize into retry storms.
pub(super) fn backoff_delay(
    config: &Config,
    retry_count: u32,
    rng: &Mutex<StdRng>,
) -> Duration {
    let base = config.backoff_base().as_secs_f64();
    let exponential = base * 2f64.powi(retry_count.min(62) as i32);
    let mut delay = exponential.min(config.backoff_max().as_secs_f64());
    let jitter = config.backoff_jitter().as_secs_f64();
    if jitter > 0.0 {
        delay += rng.lock().gen_range(0.0..jitter);
    }
    Duration::from_secs_f64(delay)
}

//============ Testing =======================================================
