#![doc(html_root_url = "https://docs.rs/replayframe/latest")]
//! Public API for the `replayframe` library.
//!
//! This crate replays a byte buffer as a sequence of type-length-value
//! records against a transfer engine. Records configure a per-run
//! [`session::Session`], a [`transport::MockTransport`] feeds scripted
//! responses back to the engine, and [`driver::Harness`] turns the whole run
//! into one status code.

pub mod byte_order;
pub mod coerce;
pub mod config;
pub mod dispatch;
pub mod driver;
pub mod engine;
pub mod error;
pub mod metrics;
pub mod record;
pub mod session;
pub mod transport;

pub use config::HarnessConfig;
pub use dispatch::{RecordClass, dispatch, dispatch_counted, dispatch_stream};
pub use driver::{Harness, RunOutcome, run_one_input};
pub use engine::{DryRunEngine, EngineCode, EngineOption, OptionValue, TransferEngine, Transport};
pub use error::{AllocationFailure, HarnessError, PolicyViolation, StructuralError};
pub use record::{DecodeError, Record, RecordCursor, RecordType, RecordWriter};
pub use session::Session;
pub use transport::{MockTransport, SocketState, TransportStats};
