//! The benchmark execution engine.
//!
//! The engine owns three pieces of machinery:
//!
//! 1) a job scheduler that expands the (iteration × provider × domain)
//!    cross-product into a job list, independently reshuffling the provider
//!    and domain lists for every iteration,
//! 2) a concurrency gate, a counting semaphore that caps the number of jobs
//!    in flight at any instant, and
//! 3) a retry controller that drives a single job to its terminal outcome
//!    under the configured timeout and backoff policy.
//!
//! [`BenchmarkEngine::run`] executes one finite batch and returns the
//! complete list of measurements in completion order. Query failures never
//! escape the run; they are recorded in the measurements themselves.
//!
//! The engine owns a single random source used both for the per-iteration
//! shuffles and for backoff jitter, so a fixed seed reproduces a run
//! exactly when the providers behave deterministically as well.

#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

mod retry;

use futures_util::stream::FuturesUnordered;
use futures_util::StreamExt;
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{debug, info};

use crate::config::Config;
use crate::error::Error;
use crate::measurement::Measurement;
use crate::provider::Provider;

//------------ BenchmarkEngine ------------------------------------------------

/// Runs a finite batch of DNS queries and collects the measurements.
pub struct BenchmarkEngine {
    /// The providers under measurement.
    providers: Vec<Arc<dyn Provider>>,

    /// The domains resolved against every provider.
    domains: Vec<String>,

    /// Tuning knobs, immutable for the engine's lifetime.
    config: Config,

    /// Shared random source for shuffling and backoff jitter.
    rng: Mutex<StdRng>,

    /// Caps the number of jobs past the gate at any instant.
    semaphore: Semaphore,
}

impl BenchmarkEngine {
    /// Creates a new engine with a random source seeded from entropy.
    ///
    /// Fails if `providers` or `domains` is empty.
    pub fn new(
        providers: Vec<Arc<dyn Provider>>,
        domains: Vec<String>,
        config: Config,
    ) -> Result<Self, Error> {
        Self::with_rng(providers, domains, config, StdRng::from_entropy())
    }

    /// Creates a new engine with the given random source.
    ///
    /// Supplying a seeded source makes the job order and the jitter draws
    /// fully reproducible.
    ///
    /// Fails if `providers` or `domains` is empty.
    pub fn with_rng(
        providers: Vec<Arc<dyn Provider>>,
        domains: Vec<String>,
        config: Config,
        rng: StdRng,
    ) -> Result<Self, Error> {
        if providers.is_empty() {
            return Err(Error::NoProviders);
        }
        if domains.is_empty() {
            return Err(Error::NoDomains);
        }
        let semaphore = Semaphore::new(config.concurrency());
        Ok(Self {
            providers,
            domains,
            config,
            rng: Mutex::new(rng),
            semaphore,
        })
    }

    /// Runs the full batch.
    ///
    /// Returns one measurement per job in completion order, after every job
    /// has reached a terminal outcome. Each measurement is also emitted as
    /// a structured log event the moment it completes.
    pub async fn run(&self) -> Vec<Measurement> {
        let jobs = self.build_jobs();
        let total = jobs.len();
        debug!(total, "benchmark batch starting");

        let mut in_flight: FuturesUnordered<_> =
            jobs.into_iter().map(|job| self.run_job(job)).collect();

        let mut measurements = Vec::with_capacity(total);
        while let Some(measurement) = in_flight.next().await {
            emit(&measurement);
            measurements.push(measurement);
        }

        debug!(total, "benchmark batch finished");
        measurements
    }

    /// Expands the cross-product into the job list.
    ///
    /// The provider and domain lists are reshuffled independently for every
    /// iteration so no provider is systematically queried first.
    fn build_jobs(&self) -> Vec<Job> {
        let mut rng = self.rng.lock();
        let per_iteration = self.providers.len() * self.domains.len();
        let mut jobs = Vec::with_capacity(
            per_iteration * self.config.iterations() as usize,
        );
        for iteration in 1..=self.config.iterations() {
            let mut providers = self.providers.clone();
            let mut domains = self.domains.clone();
            providers.shuffle(&mut *rng);
            domains.shuffle(&mut *rng);
            for provider in &providers {
                for domain in &domains {
                    jobs.push(Job {
                        iteration,
                        provider: provider.clone(),
                        domain: domain.clone(),
                    });
                }
            }
        }
        jobs
    }

    /// Runs one job behind the concurrency gate.
    ///
    /// The permit is held for the job's entire retry lifetime, backoff
    /// sleeps included, so a stalled provider cannot multiply its presence
    /// past the gate.
    async fn run_job(&self, job: Job) -> Measurement {
        let _permit = self
            .semaphore
            .acquire()
            .await
            .expect("the semaphore has not been closed");
        retry::execute(job, &self.config, &self.rng).await
    }
}

//------------ Job ------------------------------------------------------------

/// One unit of work: a single (iteration, provider, domain) lookup.
struct Job {
    /// The 1-based iteration this job belongs to.
    iteration: u32,

    /// The provider to query.
    provider: Arc<dyn Provider>,

    /// The domain to resolve.
    domain: String,
}

//------------ Utility --------------------------------------------------------

/// Emits a completed measurement to the log.
fn emit(measurement: &Measurement) {
    if let Ok(payload) = serde_json::to_string(measurement) {
        info!(target: "dnsbench::measurement", %payload);
    }
}
