//! Type-length-value records decoded from an untrusted byte buffer.
//!
//! A record stream is a flat sequence of records, each a six-byte header
//! followed by `length` bytes of value:
//!
//! ```text
//! offset 0..1  type    (big-endian u16)
//! offset 2..5  length  (big-endian u32)
//! offset 6..   value   (length bytes)
//! ```
//!
//! There is no padding and no terminator; the stream ends where the buffer
//! ends. [`RecordCursor`] walks such a buffer without copying it, and
//! [`RecordWriter`] produces one.

pub mod decoder;
pub mod error;
mod kind;
pub mod writer;

pub use decoder::{RecordCursor, Records};
pub use error::{DecodeError, EncodeError};
pub use kind::{RESPONSE_RECORD_TYPES, RecordType};
pub use writer::RecordWriter;

/// Size of the fixed record header in bytes.
pub const HEADER_SIZE: usize = 6;

/// A single record borrowed from the decoder's backing buffer.
///
/// The value is exactly `length` bytes of the source buffer and is never
/// copied.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Record<'a> {
    type_code: u16,
    length: u32,
    value: &'a [u8],
}

impl<'a> Record<'a> {
    pub(crate) fn new(type_code: u16, length: u32, value: &'a [u8]) -> Self {
        debug_assert_eq!(value.len(), length as usize);
        Self {
            type_code,
            length,
            value,
        }
    }

    /// Raw type code as it appeared on the wire.
    #[must_use]
    pub fn type_code(&self) -> u16 { self.type_code }

    /// Classified record type.
    #[must_use]
    pub fn record_type(&self) -> RecordType { RecordType::from(self.type_code) }

    /// Declared value length.
    #[must_use]
    pub fn length(&self) -> u32 { self.length }

    /// Value bytes, borrowed from the source buffer.
    #[must_use]
    pub fn value(&self) -> &'a [u8] { self.value }
}
