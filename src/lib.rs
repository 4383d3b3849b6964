//! A DNS resolution benchmark for Rust.
//!
//! This crate measures DNS resolution performance across multiple resolver
//! providers and domains. The [`engine`] module contains the core: it expands
//! a cross-product of (iteration × provider × domain) into a
//! bounded-concurrency stream of queries, retries each one with exponential
//! backoff and jitter under a hard per-attempt timeout, and collects one
//! [`Measurement`][measurement::Measurement] per job with full provenance:
//! attempt count, retry count, timing, and error classification.
//!
//! # Modules
//!
//! * [config] holds the engine tuning knobs: iterations, concurrency,
//!   timeout, and the retry/backoff parameters.
//! * [engine] is the benchmark engine itself: job scheduling, the
//!   concurrency gate, and the retry controller.
//! * [provider] defines the [`Provider`][provider::Provider] trait the
//!   engine queries through, the failure taxonomy, the host resolver
//!   adapter, the simulated providers, and the name registry used by
//!   configuration.
//! * [measurement] defines the per-job measurement record.
//! * [report] reduces a measurement batch into per-provider latency and
//!   success-rate metrics.
//! * [export] writes a measurement batch to JSON or CSV files.
//! * [logging] sets up the tracing subscriber for the command line tool.
//!
//! # Example
//!
//! ```no_run
//! use dnsbench::config::Config;
//! use dnsbench::engine::BenchmarkEngine;
//! use dnsbench::provider;
//!
//! # async fn _run() -> Result<(), dnsbench::error::Error> {
//! let providers = provider::build_providers(&["system", "sim-stable"])?;
//! let domains = vec!["example.com".to_string()];
//! let engine = BenchmarkEngine::new(providers, domains, Config::new())?;
//! let measurements = engine.run().await;
//! for metric in dnsbench::report::analyze(&measurements) {
//!     println!("{}: {:.2} ms", metric.provider, metric.avg_latency_ms);
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod export;
pub mod logging;
pub mod measurement;
pub mod provider;
pub mod report;
