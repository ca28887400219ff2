//! Drives one input from raw bytes to a single status.
//!
//! A run creates a fresh [`Session`], applies the harness configuration,
//! decodes and dispatches the record stream, and, if that succeeded, asks the
//! engine to perform one transfer through a [`MockTransport`]. The session is
//! dropped exactly once on every path before the outcome is reported.

use tracing::{info, warn};

use crate::{
    config::HarnessConfig,
    dispatch::dispatch_counted,
    engine::TransferEngine,
    error::{HarnessError, STATUS_OK},
    metrics,
    session::Session,
    transport::{MockTransport, TransportStats},
};

/// Result of a single run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RunOutcome {
    error: Option<HarnessError>,
    records: usize,
    performed: bool,
    transport: TransportStats,
}

impl RunOutcome {
    /// Aggregate status: `0` on success, the error's status code otherwise.
    #[must_use]
    pub fn status(&self) -> u32 { self.error.map_or(STATUS_OK, |err| err.status_code()) }

    /// Returns `true` if the run succeeded.
    #[must_use]
    pub fn is_success(&self) -> bool { self.error.is_none() }

    /// The error that ended the run, if any.
    #[must_use]
    pub fn error(&self) -> Option<&HarnessError> { self.error.as_ref() }

    /// Records applied before the run ended.
    #[must_use]
    pub fn records_applied(&self) -> usize { self.records }

    /// Returns `true` if the engine's transfer was started.
    #[must_use]
    pub fn performed(&self) -> bool { self.performed }

    /// Transport counters from the transfer.
    #[must_use]
    pub fn transport(&self) -> TransportStats { self.transport }
}

#[derive(Default)]
struct Progress {
    records: usize,
    performed: bool,
    transport: TransportStats,
}

/// Owns an engine handle for a single run.
///
/// # Examples
///
/// ```
/// use replayframe::{
///     driver::Harness,
///     engine::DryRunEngine,
///     record::{RecordType, RecordWriter},
/// };
///
/// let mut writer = RecordWriter::new();
/// writer.push(RecordType::Url, b"http://x").expect("small value");
/// let input = writer.finish();
///
/// let (outcome, engine) = Harness::new(DryRunEngine::new()).run(&input);
/// assert!(outcome.is_success());
/// assert!(engine.performed());
/// ```
#[derive(Debug)]
pub struct Harness<E> {
    engine: E,
    config: HarnessConfig,
}

impl<E: TransferEngine> Harness<E> {
    /// Wrap `engine` with default configuration.
    #[must_use]
    pub fn new(engine: E) -> Self {
        Self {
            engine,
            config: HarnessConfig::default(),
        }
    }

    /// Replace the configuration.
    #[must_use]
    pub fn with_config(mut self, config: HarnessConfig) -> Self {
        self.config = config;
        self
    }

    /// Configuration used for the run.
    #[must_use]
    pub fn config(&self) -> &HarnessConfig { &self.config }

    /// Run `input` and hand back the engine for inspection.
    ///
    /// All session resources are released before this returns; dropping the
    /// returned engine releases its handle.
    pub fn run(mut self, input: &[u8]) -> (RunOutcome, E) {
        let mut progress = Progress::default();
        let mut session = Session::new();
        let result = self.execute(input, &mut session, &mut progress);
        drop(session);

        let outcome = RunOutcome {
            error: result.err(),
            records: progress.records,
            performed: progress.performed,
            transport: progress.transport,
        };
        match outcome.error() {
            None => info!(records = outcome.records, "run succeeded"),
            Some(err) => {
                metrics::inc_errors(err.error_type());
                warn!(
                    status = err.status_code(),
                    kind = err.error_type(),
                    error = %err,
                    records = outcome.records,
                    "run failed"
                );
            }
        }
        metrics::inc_runs(outcome.is_success());
        (outcome, self.engine)
    }

    fn execute<'a>(
        &mut self,
        input: &'a [u8],
        session: &mut Session<'a>,
        progress: &mut Progress,
    ) -> Result<(), HarnessError> {
        self.config.apply(&mut self.engine)?;
        dispatch_counted(input, session, &mut self.engine, &mut progress.records)?;

        let mut transport = MockTransport::new(session);
        progress.performed = true;
        let result = self.engine.perform(&mut transport);
        progress.transport = transport.stats();
        result.map_err(HarnessError::from)
    }
}

/// Run `input` against `engine` and release everything afterwards.
#[must_use]
pub fn run_one_input<E: TransferEngine>(engine: E, config: HarnessConfig, input: &[u8]) -> RunOutcome {
    let (outcome, engine) = Harness::new(engine).with_config(config).run(input);
    drop(engine);
    outcome
}
