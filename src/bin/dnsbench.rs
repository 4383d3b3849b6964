//! Benchmark DNS providers from the command line.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::time::Duration;
use tracing::{error, info};

use dnsbench::config::Config;
use dnsbench::engine::BenchmarkEngine;
use dnsbench::export;
use dnsbench::logging::init_logging;
use dnsbench::provider;
use dnsbench::report::{self, ProviderMetrics};

/// The curated domain list used when none is given.
const DEFAULT_DOMAINS: &[&str] = &[
    "example.com",
    "openai.com",
    "cloudflare.com",
    "python.org",
    "ietf.org",
];

/// The providers benchmarked when none are given.
const DEFAULT_PROVIDERS: &[&str] = &["system", "sim-stable", "sim-flaky"];

#[derive(Debug, Parser)]
#[command(name = "dnsbench", version, about = "DNS resolution benchmark")]
struct Args {
    /// Number of passes over the provider/domain cross-product.
    #[arg(long, default_value_t = 3)]
    iterations: u32,

    /// Maximum number of in-flight queries.
    #[arg(long, default_value_t = 10)]
    concurrency: usize,

    /// Per-query timeout in seconds.
    #[arg(long, default_value_t = 1.5)]
    timeout: f64,

    /// Maximum number of retries per query.
    #[arg(long, default_value_t = 3)]
    max_retries: u32,

    /// Backoff base delay in seconds.
    #[arg(long, default_value_t = 0.2)]
    backoff_base: f64,

    /// Backoff ceiling in seconds.
    #[arg(long, default_value_t = 2.5)]
    backoff_max: f64,

    /// Backoff jitter bound in seconds.
    #[arg(long, default_value_t = 0.1)]
    backoff_jitter: f64,

    /// Subset of providers to benchmark.
    #[arg(long, num_args = 1..)]
    providers: Vec<String>,

    /// Domains to resolve. Defaults to a curated list.
    #[arg(long, num_args = 1..)]
    domains: Vec<String>,

    /// Persist measurements to a JSON file.
    #[arg(long)]
    json_out: Option<PathBuf>,

    /// Persist measurements to a CSV file.
    #[arg(long)]
    csv_out: Option<PathBuf>,

    /// Seed for the engine's random source, for reproducible runs.
    #[arg(long)]
    seed: Option<u64>,

    /// Enable per-attempt debug logging.
    #[arg(long)]
    verbose: bool,

    /// List available providers and exit.
    #[arg(long)]
    list_providers: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    if args.list_providers {
        for key in provider::KEYS {
            println!("{}", key);
        }
        return ExitCode::SUCCESS;
    }

    init_logging(args.verbose);
    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("benchmark failed: {}", err);
            ExitCode::FAILURE
        }
    }
}

/// Runs the benchmark and handles presentation and export.
async fn run(args: Args) -> Result<(), dnsbench::error::Error> {
    let provider_keys: Vec<String> = if args.providers.is_empty() {
        DEFAULT_PROVIDERS.iter().map(|s| s.to_string()).collect()
    } else {
        args.providers.clone()
    };
    let providers = provider::build_providers(&provider_keys)?;
    let domains: Vec<String> = if args.domains.is_empty() {
        DEFAULT_DOMAINS.iter().map(|s| s.to_string()).collect()
    } else {
        args.domains.clone()
    };

    let mut config = Config::new();
    config.set_iterations(args.iterations);
    config.set_concurrency(args.concurrency);
    config.set_query_timeout(secs(args.timeout));
    config.set_max_retries(args.max_retries);
    config.set_backoff_base(secs(args.backoff_base));
    config.set_backoff_max(secs(args.backoff_max));
    config.set_backoff_jitter(secs(args.backoff_jitter));

    let engine = match args.seed {
        Some(seed) => BenchmarkEngine::with_rng(
            providers,
            domains,
            config,
            StdRng::seed_from_u64(seed),
        )?,
        None => BenchmarkEngine::new(providers, domains, config)?,
    };

    let measurements = engine.run().await;
    info!("completed {} measurements", measurements.len());

    let metrics = report::analyze(&measurements);
    render_report(&metrics);

    if let Some(path) = args.json_out.as_deref() {
        export::write_json(&measurements, path)?;
        info!("wrote {}", path.display());
    }
    if let Some(path) = args.csv_out.as_deref() {
        export::write_csv(&measurements, path)?;
        info!("wrote {}", path.display());
    }

    summarize(&metrics);
    Ok(())
}

/// Converts a non-negative seconds argument into a duration.
fn secs(value: f64) -> Duration {
    Duration::from_secs_f64(value.max(0.))
}

/// Prints the per-provider metrics as an aligned table.
fn render_report(metrics: &[ProviderMetrics]) {
    println!(
        "{:<12} {:>12} {:>12} {:>9} {:>8}",
        "provider", "avg (ms)", "median (ms)", "success", "samples"
    );
    for m in metrics {
        println!(
            "{:<12} {:>12.2} {:>12.2} {:>8.1}% {:>8}",
            m.provider,
            m.avg_latency_ms,
            m.median_latency_ms,
            m.success_rate,
            m.sample_count
        );
    }
}

/// Prints the fastest and most reliable provider.
fn summarize(metrics: &[ProviderMetrics]) {
    let Some(fastest) = metrics.first() else {
        return;
    };
    let most_reliable = metrics
        .iter()
        .max_by(|a, b| a.success_rate.total_cmp(&b.success_rate))
        .expect("metrics are not empty");
    println!();
    println!(
        "fastest provider:       {} ({:.2} ms average latency)",
        fastest.provider, fastest.avg_latency_ms
    );
    println!(
        "most reliable provider: {} ({:.1}% success rate)",
        most_reliable.provider, most_reliable.success_rate
    );
}
