//! Test helpers for `replayframe`.
//!
//! Builders for record streams and the canonical replay scenarios, a
//! serialised handle on the global `logtest` logger, and counter lookups over
//! `metrics_util` snapshots.
//!
//! ```rust
//! use replayframe::{DryRunEngine, Harness, RecordType};
//! use replayframe_testing::stream;
//!
//! let input = stream(&[(RecordType::Url, b"http://x")]);
//! let (outcome, _) = Harness::new(DryRunEngine::new()).run(&input);
//! assert!(outcome.is_success());
//! ```

pub mod corpus;
mod logging;
pub mod observability;

pub use corpus::{mime_part, stream, u32_value};
pub use logging::{LoggerHandle, logger};
pub use observability::{CounterSample, counter_value, counters};
