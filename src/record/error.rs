//! Errors raised while reading or writing record streams.

use thiserror::Error;

/// Structural failures detected while decoding a record stream.
///
/// Both variants mean the stream cannot be trusted past the cursor; the
/// decoder never reads beyond the end of its buffer to report them.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum DecodeError {
    /// Fewer bytes remain than a full record header.
    #[error("incomplete record header: have {have}, need {need}")]
    IncompleteHeader {
        /// Bytes remaining at the cursor.
        have: usize,
        /// Header size.
        need: usize,
    },

    /// The declared value length runs past the end of the buffer.
    #[error("record value overruns buffer: declared {declared}, available {available}")]
    ValueOverrun {
        /// Length carried in the header.
        declared: u32,
        /// Bytes remaining after the header.
        available: usize,
    },

    /// `first_record` was called on a cursor that already advanced.
    #[error("cursor already advanced to offset {position}")]
    NotAtStart {
        /// Current cursor offset.
        position: usize,
    },
}

/// Failures while encoding a record stream.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum EncodeError {
    /// The value does not fit the 32-bit length field.
    #[error("record value of {len} bytes exceeds the 32-bit length field")]
    ValueTooLarge {
        /// Attempted value length.
        len: usize,
    },
}
