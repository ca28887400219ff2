//! Set-once tracking for singleton options.

use std::collections::BTreeSet;

use crate::{engine::EngineOption, error::PolicyViolation};

/// Options that have already been applied in the current run.
///
/// Keyed by the full option identifier, so distinct options never share a
/// slot.
#[derive(Clone, Debug, Default)]
pub struct OptionTracker(BTreeSet<EngineOption>);

impl OptionTracker {
    /// Fail if `option` has already been applied.
    ///
    /// # Errors
    ///
    /// Returns [`PolicyViolation::OptionAlreadySet`] for a repeated option.
    pub fn ensure_unset(&self, option: EngineOption) -> Result<(), PolicyViolation> {
        if self.0.contains(&option) {
            return Err(PolicyViolation::OptionAlreadySet { option });
        }
        Ok(())
    }

    /// Record `option` as applied.
    pub fn mark(&mut self, option: EngineOption) { self.0.insert(option); }

    /// Returns `true` if `option` has been applied.
    #[must_use]
    pub fn is_set(&self, option: EngineOption) -> bool { self.0.contains(&option) }

    /// Number of applied options.
    #[must_use]
    pub fn len(&self) -> usize { self.0.len() }

    /// Returns `true` if nothing has been applied.
    #[must_use]
    pub fn is_empty(&self) -> bool { self.0.is_empty() }
}
