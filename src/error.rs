//! Error taxonomy and run status codes.
//!
//! Every failure that ends a run is one of four kinds:
//!
//! - [`StructuralError`]: the record stream itself is malformed (truncated
//!   record, oversized length, bad sub-document nesting).
//! - [`PolicyViolation`]: a well-formed record breaks a configuration rule
//!   (singleton set twice, integer of the wrong width, bad response index).
//! - [`AllocationFailure`]: a value could not be materialised.
//! - [`EngineCode`]: the transfer engine reported a failure, passed through
//!   unchanged.
//!
//! The first three map to small fixed status codes; engine codes are
//! reported verbatim.

use thiserror::Error;

use crate::{
    engine::{EngineCode, EngineOption},
    record::{DecodeError, RecordType},
};

/// Status reported for a successful run.
pub const STATUS_OK: u32 = 0;
/// Status reported for a structurally invalid record stream.
pub const STATUS_STRUCTURAL: u32 = 2;
/// Status reported for policy violations and allocation failures.
pub const STATUS_REJECTED: u32 = 255;

/// The record stream is malformed.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum StructuralError {
    /// A top-level record could not be decoded.
    #[error("record stream: {0}")]
    Decode(#[from] DecodeError),

    /// A mime part's nested record stream could not be decoded.
    #[error("mime part sub-stream: {0}")]
    MimeSubStream(DecodeError),

    /// A mime part record appeared inside another mime part.
    #[error("mime part nested inside a mime part")]
    NestedMimePart,

    /// A part name or data record arrived with no part in progress.
    #[error("{record_type} record with no mime part in progress")]
    OrphanMimeRecord {
        /// Offending record type.
        record_type: RecordType,
    },
}

/// A well-formed record that breaks a configuration rule.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum PolicyViolation {
    /// A singleton option was already applied in this run.
    #[error("option {option} already set")]
    OptionAlreadySet {
        /// Option that was set twice.
        option: EngineOption,
    },

    /// An integer record was not exactly four bytes long.
    #[error("{record_type} record must be 4 bytes, got {length}")]
    IntegerLength {
        /// Offending record type.
        record_type: RecordType,
        /// Declared value length.
        length: u32,
    },

    /// A response record addressed a slot outside the slot table.
    #[error("response slot {index} out of range (capacity {capacity})")]
    ResponseIndexOutOfRange {
        /// Requested slot.
        index: usize,
        /// Number of slots.
        capacity: usize,
    },
}

/// A value buffer could not be allocated.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
#[error("failed to allocate {requested} bytes")]
pub struct AllocationFailure {
    /// Bytes requested.
    pub requested: usize,
}

/// Terminal error for one run.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum HarnessError {
    /// Malformed record stream.
    #[error("structural error: {0}")]
    Structural(#[from] StructuralError),

    /// Configuration rule violated.
    #[error("policy violation: {0}")]
    Policy(#[from] PolicyViolation),

    /// Value materialisation failed.
    #[error("allocation failure: {0}")]
    Allocation(#[from] AllocationFailure),

    /// The engine rejected an option or failed the transfer.
    #[error("engine error: {0}")]
    Engine(#[from] EngineCode),
}

impl From<DecodeError> for HarnessError {
    fn from(err: DecodeError) -> Self { Self::Structural(StructuralError::Decode(err)) }
}

impl HarnessError {
    /// Status code reported for this error.
    ///
    /// # Examples
    ///
    /// ```
    /// use replayframe::{
    ///     engine::EngineOption,
    ///     error::{HarnessError, PolicyViolation},
    /// };
    ///
    /// let err = HarnessError::from(PolicyViolation::OptionAlreadySet {
    ///     option: EngineOption::HttpAuth,
    /// });
    /// assert_eq!(err.status_code(), 255);
    /// ```
    #[must_use]
    pub fn status_code(&self) -> u32 {
        match self {
            Self::Structural(_) => STATUS_STRUCTURAL,
            Self::Policy(_) | Self::Allocation(_) => STATUS_REJECTED,
            Self::Engine(code) => code.get(),
        }
    }

    /// Error category for logging and metrics.
    ///
    /// One of `"structural"`, `"policy"`, `"allocation"` or `"engine"`.
    #[must_use]
    pub fn error_type(&self) -> &'static str {
        match self {
            Self::Structural(_) => "structural",
            Self::Policy(_) => "policy",
            Self::Allocation(_) => "allocation",
            Self::Engine(_) => "engine",
        }
    }

    /// Returns `true` if the error came from the engine rather than the
    /// record stream.
    #[must_use]
    pub fn is_engine_error(&self) -> bool { matches!(self, Self::Engine(_)) }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(
        HarnessError::from(DecodeError::IncompleteHeader { have: 3, need: 6 }),
        STATUS_STRUCTURAL,
        "structural"
    )]
    #[case(
        HarnessError::from(StructuralError::NestedMimePart),
        STATUS_STRUCTURAL,
        "structural"
    )]
    #[case(
        HarnessError::from(PolicyViolation::IntegerLength {
            record_type: RecordType::NoBody,
            length: 3,
        }),
        STATUS_REJECTED,
        "policy"
    )]
    #[case(
        HarnessError::from(AllocationFailure { requested: 8 }),
        STATUS_REJECTED,
        "allocation"
    )]
    fn harness_errors_map_to_fixed_codes(
        #[case] err: HarnessError,
        #[case] status: u32,
        #[case] kind: &str,
    ) {
        assert_eq!(err.status_code(), status);
        assert_eq!(err.error_type(), kind);
        assert!(!err.is_engine_error());
    }

    #[test]
    fn engine_codes_pass_through() {
        let code = EngineCode::new(28).expect("non-zero");
        let err = HarnessError::from(code);
        assert_eq!(err.status_code(), 28);
        assert!(err.is_engine_error());
    }

    #[test]
    fn display_names_the_option() {
        let err = HarnessError::from(PolicyViolation::OptionAlreadySet {
            option: EngineOption::Url,
        });
        assert_eq!(err.to_string(), "policy violation: option URL already set");
    }
}
