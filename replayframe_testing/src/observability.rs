//! Counter lookups over `metrics_util` debugging snapshots.
//!
//! Taking a snapshot resets the recorder's counters, so a test snapshots
//! once and queries the collected samples.

use metrics_util::debugging::{DebugValue, Snapshot};

/// One counter reading.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CounterSample {
    /// Metric name.
    pub name: String,
    /// Label pairs in registration order.
    pub labels: Vec<(String, String)>,
    /// Count at snapshot time.
    pub value: u64,
}

/// Collect every counter in `snapshot`; other metric kinds are skipped.
#[must_use]
pub fn counters(snapshot: Snapshot) -> Vec<CounterSample> {
    snapshot
        .into_vec()
        .into_iter()
        .filter_map(|(key, _, _, value)| match value {
            DebugValue::Counter(count) => Some(CounterSample {
                name: key.key().name().to_owned(),
                labels: key
                    .key()
                    .labels()
                    .map(|l| (l.key().to_owned(), l.value().to_owned()))
                    .collect(),
                value: count,
            }),
            _ => None,
        })
        .collect()
}

/// Value of counter `name` carrying `label`, or `0` if it was never touched.
#[must_use]
pub fn counter_value(samples: &[CounterSample], name: &str, label: (&str, &str)) -> u64 {
    samples
        .iter()
        .filter(|sample| sample.name == name)
        .filter(|sample| {
            sample
                .labels
                .iter()
                .any(|(key, value)| key == label.0 && value == label.1)
        })
        .map(|sample| sample.value)
        .sum()
}
