//! Harness configuration.
//!
//! These settings are applied to every engine handle before any record is
//! dispatched. They are not reachable from records and do not count towards
//! the set-once tracker.

use std::{
    env,
    ffi::{CStr, CString, OsString},
};

use crate::engine::{EngineCode, EngineOption, OptionValue, TransferEngine};

/// Environment variable enabling verbose engine output and logging.
pub const VERBOSE_ENV: &str = "FUZZ_VERBOSE";

const DEFAULT_TIMEOUT_MS: u32 = 200;
const DEFAULT_SERVER_RESPONSE_TIMEOUT_SECS: u32 = 1;
const DEFAULT_COOKIE_JAR: &CStr = c"/dev/null";

/// Defaults applied to each engine handle.
///
/// # Examples
///
/// ```
/// use replayframe::config::HarnessConfig;
///
/// let config = HarnessConfig::default().with_timeout_ms(50).with_verbose(true);
/// assert_eq!(config.timeout_ms(), 50);
/// assert!(config.verbose());
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HarnessConfig {
    timeout_ms: u32,
    server_response_timeout_secs: u32,
    cookie_jar: CString,
    verbose: bool,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_TIMEOUT_MS,
            server_response_timeout_secs: DEFAULT_SERVER_RESPONSE_TIMEOUT_SECS,
            cookie_jar: CString::from(DEFAULT_COOKIE_JAR),
            verbose: false,
        }
    }
}

impl HarnessConfig {
    /// Defaults, with verbosity enabled if [`VERBOSE_ENV`] is set.
    #[must_use]
    pub fn from_env() -> Self { Self::from_lookup(|key| env::var_os(key)) }

    /// Defaults, with overrides read through `lookup` instead of the process
    /// environment.
    #[must_use]
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<OsString>,
    {
        Self::default().with_verbose(lookup(VERBOSE_ENV).is_some())
    }

    /// Overall transfer timeout in milliseconds.
    #[must_use]
    pub fn with_timeout_ms(mut self, timeout_ms: u32) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Timeout waiting for a server response, in seconds.
    #[must_use]
    pub fn with_server_response_timeout_secs(mut self, secs: u32) -> Self {
        self.server_response_timeout_secs = secs;
        self
    }

    /// Path the engine writes cookies to.
    ///
    /// Paths containing a NUL byte are ignored and the previous value kept.
    #[must_use]
    pub fn with_cookie_jar(mut self, path: &str) -> Self {
        if let Ok(path) = CString::new(path) {
            self.cookie_jar = path;
        }
        self
    }

    /// Enable verbose engine output.
    #[must_use]
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Transfer timeout in milliseconds.
    #[must_use]
    pub fn timeout_ms(&self) -> u32 { self.timeout_ms }

    /// Server response timeout in seconds.
    #[must_use]
    pub fn server_response_timeout_secs(&self) -> u32 { self.server_response_timeout_secs }

    /// Cookie jar path.
    #[must_use]
    pub fn cookie_jar(&self) -> &str { self.cookie_jar.to_str().unwrap_or_default() }

    /// Whether verbose output is enabled.
    #[must_use]
    pub fn verbose(&self) -> bool { self.verbose }

    /// Apply these settings to `engine`.
    ///
    /// # Errors
    ///
    /// Returns the engine's status if it rejects any setting.
    pub fn apply<E>(&self, engine: &mut E) -> Result<(), EngineCode>
    where
        E: TransferEngine + ?Sized,
    {
        engine.set_option(EngineOption::CookieJar, OptionValue::Str(&self.cookie_jar))?;
        engine.set_option(
            EngineOption::TimeoutMs,
            OptionValue::Long(i64::from(self.timeout_ms)),
        )?;
        engine.set_option(
            EngineOption::ServerResponseTimeout,
            OptionValue::Long(i64::from(self.server_response_timeout_secs)),
        )?;
        if self.verbose {
            engine.set_option(EngineOption::Verbose, OptionValue::Long(1))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{HarnessConfig, VERBOSE_ENV};
    use crate::engine::{AppliedValue, DryRunEngine, EngineOption};

    #[test]
    fn defaults_are_applied_to_the_engine() {
        let mut engine = DryRunEngine::new();
        HarnessConfig::default().apply(&mut engine).expect("accepted");
        assert_eq!(
            engine.option(EngineOption::TimeoutMs),
            Some(&AppliedValue::Long(200))
        );
        assert_eq!(
            engine.option(EngineOption::ServerResponseTimeout),
            Some(&AppliedValue::Long(1))
        );
        assert_eq!(
            engine.option(EngineOption::CookieJar),
            Some(&AppliedValue::Text(b"/dev/null".to_vec()))
        );
        assert!(engine.option(EngineOption::Verbose).is_none());
    }

    #[test]
    fn verbose_sets_engine_verbosity() {
        let mut engine = DryRunEngine::new();
        HarnessConfig::default()
            .with_verbose(true)
            .apply(&mut engine)
            .expect("accepted");
        assert_eq!(
            engine.option(EngineOption::Verbose),
            Some(&AppliedValue::Long(1))
        );
    }

    #[test]
    fn verbose_env_enables_verbosity() {
        let config = HarnessConfig::from_lookup(|key| (key == VERBOSE_ENV).then(|| "1".into()));
        assert!(config.verbose());
        assert!(!HarnessConfig::from_lookup(|_| None).verbose());
    }

    #[test]
    fn cookie_jar_with_nul_is_ignored() {
        let config = HarnessConfig::default().with_cookie_jar("bad\0path");
        assert_eq!(config.cookie_jar(), "/dev/null");
        let config = config.with_cookie_jar("/tmp/jar");
        assert_eq!(config.cookie_jar(), "/tmp/jar");
    }
}
