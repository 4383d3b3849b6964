//! Writing measurement batches to disk.

#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use crate::error::Error;
use crate::measurement::Measurement;

/// The CSV column set, in the measurement's field order.
const CSV_FIELDS: &[&str] = &[
    "provider",
    "domain",
    "iteration",
    "attempts",
    "retry_count",
    "success",
    "started_at",
    "finished_at",
    "latency_ms",
    "error_type",
    "error_message",
    "addresses",
];

//------------ write_json -----------------------------------------------------

/// Writes the batch to a pretty-printed JSON file.
///
/// Parent directories are created as needed.
pub fn write_json(
    measurements: &[Measurement],
    path: &Path,
) -> Result<(), Error> {
    prepare_parent(path)?;
    let payload = serde_json::to_string_pretty(measurements)?;
    fs::write(path, payload)?;
    Ok(())
}

//------------ write_csv ------------------------------------------------------

/// Writes the batch to a CSV file.
///
/// Nothing is written for an empty batch. `None` fields become empty
/// cells and the address list is `;`-joined. Parent directories are
/// created as needed.
pub fn write_csv(
    measurements: &[Measurement],
    path: &Path,
) -> Result<(), Error> {
    if measurements.is_empty() {
        return Ok(());
    }
    prepare_parent(path)?;

    let mut out = String::new();
    let _ = writeln!(out, "{}", CSV_FIELDS.join(","));
    for m in measurements {
        let row = [
            csv_cell(&m.provider),
            csv_cell(&m.domain),
            m.iteration.to_string(),
            m.attempts.to_string(),
            m.retry_count.to_string(),
            m.success.to_string(),
            m.started_at.to_rfc3339(),
            m.finished_at.to_rfc3339(),
            m.latency_ms.map(|v| v.to_string()).unwrap_or_default(),
            csv_cell(m.error_type.as_deref().unwrap_or_default()),
            csv_cell(m.error_message.as_deref().unwrap_or_default()),
            csv_cell(&m.addresses.join(";")),
        ];
        let _ = writeln!(out, "{}", row.join(","));
    }
    fs::write(path, out)?;
    Ok(())
}

//------------ Utility --------------------------------------------------------

/// Creates the parent directory of the given path if necessary.
fn prepare_parent(path: &Path) -> Result<(), Error> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

/// Quotes a CSV cell if it contains a delimiter, quote, or newline.
fn csv_cell(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.into()
    }
}

//============ Testing =======================================================

#[cfg(test)]
mod test {
    use super::*;
    use chrono::Utc;
    use std::path::PathBuf;

    fn sample(success: bool) -> Measurement {
        let now = Utc::now();
        Measurement {
            provider: "sim-stable".into(),
            domain: "example.com".into(),
            iteration: 1,
            attempts: 1,
            retry_count: 0,
            success,
            started_at: now,
            finished_at: now,
            latency_ms: Some(12.5),
            error_type: (!success).then(|| "resolution".into()),
            error_message: (!success).then(|| "failed, sadly".into()),
            addresses: if success {
                vec!["198.51.100.1".into(), "198.51.100.2".into()]
            } else {
                Vec::new()
            },
        }
    }

    fn scratch_path(name: &str) -> PathBuf {
        let mut path = std::env::temp_dir();
        path.push(format!("dnsbench-export-{}-{}", std::process::id(), name));
        path
    }

    #[test]
    fn json_roundtrips() {
        let path = scratch_path("batch.json");
        let batch = [sample(true), sample(false)];
        write_json(&batch, &path).unwrap();
        let raw = fs::read_to_string(&path).unwrap();
        let back: Vec<Measurement> = serde_json::from_str(&raw).unwrap();
        assert_eq!(back.as_slice(), batch.as_slice());
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn csv_layout() {
        let path = scratch_path("batch.csv");
        let batch = [sample(true), sample(false)];
        write_csv(&batch, &path).unwrap();
        let raw = fs::read_to_string(&path).unwrap();
        let mut lines = raw.lines();
        assert_eq!(lines.next().unwrap(), CSV_FIELDS.join(","));
        let first = lines.next().unwrap();
        assert!(first.starts_with("sim-stable,example.com,1,1,0,true,"));
        assert!(first.ends_with("198.51.100.1;198.51.100.2"));
        let second = lines.next().unwrap();
        // The message contains a comma and must have been quoted.
        assert!(second.contains("\"failed, sadly\""));
        assert!(lines.next().is_none());
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn empty_batch_writes_nothing() {
        let path = scratch_path("empty.csv");
        write_csv(&[], &path).unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn quoting() {
        assert_eq!(csv_cell("plain"), "plain");
        assert_eq!(csv_cell("a,b"), "\"a,b\"");
        assert_eq!(csv_cell("say \"hi\""), "\"say \"\"hi\"\"\"");
    }
}
