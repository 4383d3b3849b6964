//! The per-job measurement record.

#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

//------------ Measurement ----------------------------------------------------

/// The terminal outcome of one benchmark job.
///
/// A job is one (iteration, provider, domain) unit of work. The engine
/// produces exactly one measurement per job, after all retries, and never
/// mutates it afterwards. Every field maps 1:1 to a column or key when the
/// record is exported.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Measurement {
    /// Identifier of the provider that was queried.
    pub provider: String,

    /// The domain that was resolved.
    pub domain: String,

    /// The 1-based iteration the job belongs to.
    pub iteration: u32,

    /// Total number of query attempts, including the final one.
    pub attempts: u32,

    /// Number of retries actually consumed.
    ///
    /// This is always `attempts - 1` and never exceeds the configured
    /// maximum.
    pub retry_count: u32,

    /// Whether the terminal attempt succeeded.
    pub success: bool,

    /// When the first attempt started.
    pub started_at: DateTime<Utc>,

    /// When the terminal attempt finished.
    pub finished_at: DateTime<Utc>,

    /// Wall-clock duration of the terminal attempt in milliseconds.
    ///
    /// This covers the terminal attempt only, not the cumulative time
    /// across retries.
    pub latency_ms: Option<f64>,

    /// Classification tag of the terminal failure. `None` on success.
    pub error_type: Option<String>,

    /// Human-readable failure detail. `None` on success.
    pub error_message: Option<String>,

    /// The resolved addresses, in the order the provider returned them.
    ///
    /// Empty on failure, and on success only if the provider legitimately
    /// returned no addresses.
    pub addresses: Vec<String>,
}

//============ Testing =======================================================
