//! Record stream encoding, used to build corpus inputs.

use bytes::{BufMut, Bytes, BytesMut};

use super::{EncodeError, HEADER_SIZE, RecordType};
use crate::byte_order::{write_network_u16, write_network_u32};

/// Incremental builder for a record stream.
///
/// # Examples
///
/// ```
/// use replayframe::record::{RecordCursor, RecordType, RecordWriter};
///
/// let mut writer = RecordWriter::new();
/// writer
///     .push(RecordType::Url, b"http://x")
///     .expect("small value");
/// writer.push_u32(RecordType::NoBody, 1);
/// let bytes = writer.finish();
///
/// let types: Vec<_> = RecordCursor::new(&bytes)
///     .records()
///     .map(|r| r.expect("valid").record_type())
///     .collect();
/// assert_eq!(types, [RecordType::Url, RecordType::NoBody]);
/// ```
#[derive(Clone, Debug, Default)]
pub struct RecordWriter {
    buf: BytesMut,
}

impl RecordWriter {
    /// Create an empty writer.
    #[must_use]
    pub fn new() -> Self { Self::default() }

    /// Append a record with an arbitrary value.
    ///
    /// # Errors
    ///
    /// Returns [`EncodeError::ValueTooLarge`] if `value` is longer than
    /// `u32::MAX` bytes.
    pub fn push(&mut self, record_type: RecordType, value: &[u8]) -> Result<&mut Self, EncodeError> {
        self.push_raw(record_type.code(), value)
    }

    /// Append a record using a raw type code, including unknown ones.
    ///
    /// # Errors
    ///
    /// Returns [`EncodeError::ValueTooLarge`] if `value` is longer than
    /// `u32::MAX` bytes.
    pub fn push_raw(&mut self, type_code: u16, value: &[u8]) -> Result<&mut Self, EncodeError> {
        let length =
            u32::try_from(value.len()).map_err(|_| EncodeError::ValueTooLarge { len: value.len() })?;
        self.buf.reserve(HEADER_SIZE + value.len());
        self.buf.put_slice(&write_network_u16(type_code));
        self.buf.put_slice(&write_network_u32(length));
        self.buf.put_slice(value);
        Ok(self)
    }

    /// Append a four-byte big-endian integer record.
    pub fn push_u32(&mut self, record_type: RecordType, value: u32) -> &mut Self {
        self.buf.put_slice(&write_network_u16(record_type.code()));
        self.buf.put_slice(&write_network_u32(4));
        self.buf.put_slice(&write_network_u32(value));
        self
    }

    /// Encoded length so far.
    #[must_use]
    pub fn len(&self) -> usize { self.buf.len() }

    /// Returns `true` if no record has been written.
    #[must_use]
    pub fn is_empty(&self) -> bool { self.buf.is_empty() }

    /// Consume the writer and return the encoded stream.
    #[must_use]
    pub fn finish(self) -> Bytes { self.buf.freeze() }
}
