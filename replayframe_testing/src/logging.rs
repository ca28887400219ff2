use std::{
    ops::{Deref, DerefMut},
    sync::{Mutex, MutexGuard, OnceLock},
};

use log::Level;
use logtest::Logger;
use rstest::fixture;

/// Exclusive handle on the process-wide capture logger.
///
/// `logtest` installs a single global logger, so tests that assert on log
/// output hold this guard for their whole body.
pub struct LoggerHandle {
    guard: MutexGuard<'static, Logger>,
}

impl LoggerHandle {
    /// Lock the global [`Logger`], starting it on first use.
    ///
    /// A test that panicked while holding the lock does not poison later
    /// tests; its captured records are discarded instead.
    pub fn new() -> Self {
        static LOGGER: OnceLock<Mutex<Logger>> = OnceLock::new();

        let logger = LOGGER.get_or_init(|| Mutex::new(Logger::start()));
        let guard = logger.lock().unwrap_or_else(|poisoned| {
            let mut guard = poisoned.into_inner();
            while guard.pop().is_some() {}
            guard
        });

        Self { guard }
    }

    /// Drop every captured record.
    pub fn clear(&mut self) { while self.guard.pop().is_some() {} }

    /// Drain captured records as `(level, message)` pairs, oldest first.
    pub fn drain(&mut self) -> Vec<(Level, String)> {
        let mut out = Vec::new();
        while let Some(record) = self.guard.pop() {
            out.push((record.level(), record.args().to_string()));
        }
        out
    }

    /// Drain captured records and return the first message at `level`
    /// containing `needle`.
    pub fn find(&mut self, level: Level, needle: &str) -> Option<String> {
        self.drain()
            .into_iter()
            .find(|(lvl, message)| *lvl == level && message.contains(needle))
            .map(|(_, message)| message)
    }
}

impl Default for LoggerHandle {
    fn default() -> Self { Self::new() }
}

impl Deref for LoggerHandle {
    type Target = Logger;

    fn deref(&self) -> &Self::Target { &self.guard }
}

impl DerefMut for LoggerHandle {
    fn deref_mut(&mut self) -> &mut Self::Target { &mut self.guard }
}

/// Fixture yielding a cleared [`LoggerHandle`].
#[allow(
    unused_braces,
    reason = "rustc false positive for single line rstest fixtures"
)]
#[fixture]
pub fn logger() -> LoggerHandle {
    let mut handle = LoggerHandle::new();
    handle.clear();
    handle
}
