//! Aggregated per-provider statistics.
//!
//! This is a plain reduction over a measurement batch; the engine is not
//! involved. Consumers that want different statistics can compute their
//! own from the raw measurements.

#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use serde::Serialize;
use std::collections::BTreeMap;

use crate::measurement::Measurement;

//------------ ProviderMetrics ------------------------------------------------

/// Aggregate metrics for a single provider.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ProviderMetrics {
    /// The provider's identifier.
    pub provider: String,

    /// Mean latency in milliseconds over all measured attempts.
    pub avg_latency_ms: f64,

    /// Median latency in milliseconds over all measured attempts.
    pub median_latency_ms: f64,

    /// Share of successful jobs, in percent.
    pub success_rate: f64,

    /// Number of measurements that went into the metrics.
    pub sample_count: usize,
}

//------------ analyze --------------------------------------------------------

/// Groups measurements by provider and computes summary metrics.
///
/// Latency statistics cover every measurement that carries a latency, so
/// failed jobs contribute the duration of their terminal attempt; the
/// success rate reports quality separately. The result is sorted by mean
/// latency, fastest provider first.
pub fn analyze(measurements: &[Measurement]) -> Vec<ProviderMetrics> {
    let mut groups: BTreeMap<&str, Vec<&Measurement>> = BTreeMap::new();
    for measurement in measurements {
        groups
            .entry(measurement.provider.as_str())
            .or_default()
            .push(measurement);
    }

    let mut metrics: Vec<_> = groups
        .into_iter()
        .map(|(provider, rows)| {
            let mut latencies: Vec<f64> =
                rows.iter().filter_map(|m| m.latency_ms).collect();
            latencies.sort_unstable_by(f64::total_cmp);
            let successes = rows.iter().filter(|m| m.success).count();
            ProviderMetrics {
                provider: provider.into(),
                avg_latency_ms: mean(&latencies),
                median_latency_ms: median(&latencies),
                success_rate: successes as f64 * 100. / rows.len() as f64,
                sample_count: rows.len(),
            }
        })
        .collect();

    metrics.sort_by(|a, b| a.avg_latency_ms.total_cmp(&b.avg_latency_ms));
    metrics
}

/// Returns the mean of the given values, zero if there are none.
fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Returns the median of the given sorted values, zero if there are none.
///
/// An even sample count takes the mean of the two middle values.
fn median(sorted: &[f64]) -> f64 {
    if sorted.is_empty() {
        return 0.;
    }
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.
    } else {
        sorted[mid]
    }
}

//============ Testing =======================================================

#[cfg(test)]
mod test {
    use super::*;
    use chrono::Utc;

    fn measurement(
        provider: &str,
        success: bool,
        latency_ms: f64,
    ) -> Measurement {
        let now = Utc::now();
        Measurement {
            provider: provider.into(),
            domain: "example.com".into(),
            iteration: 1,
            attempts: 1,
            retry_count: 0,
            success,
            started_at: now,
            finished_at: now,
            latency_ms: Some(latency_ms),
            error_type: (!success).then(|| "resolution".into()),
            error_message: (!success).then(|| "failed".into()),
            addresses: Vec::new(),
        }
    }

    #[test]
    fn sorted_fastest_first() {
        let batch = [
            measurement("slow", true, 300.),
            measurement("fast", true, 10.),
            measurement("fast", true, 20.),
            measurement("slow", true, 500.),
        ];
        let metrics = analyze(&batch);
        assert_eq!(metrics.len(), 2);
        assert_eq!(metrics[0].provider, "fast");
        assert_eq!(metrics[0].avg_latency_ms, 15.);
        assert_eq!(metrics[0].median_latency_ms, 15.);
        assert_eq!(metrics[1].provider, "slow");
        assert_eq!(metrics[1].avg_latency_ms, 400.);
    }

    #[test]
    fn success_rate_in_percent() {
        let batch = [
            measurement("p", true, 10.),
            measurement("p", true, 10.),
            measurement("p", false, 10.),
            measurement("p", false, 10.),
        ];
        let metrics = analyze(&batch);
        assert_eq!(metrics[0].success_rate, 50.);
        assert_eq!(metrics[0].sample_count, 4);
    }

    #[test]
    fn odd_sample_median() {
        let batch = [
            measurement("p", true, 10.),
            measurement("p", true, 100.),
            measurement("p", true, 30.),
        ];
        assert_eq!(analyze(&batch)[0].median_latency_ms, 30.);
    }

    #[test]
    fn empty_batch() {
        assert!(analyze(&[]).is_empty());
    }
}
