//! Bounds-checked cursor over a record stream.

use super::{DecodeError, HEADER_SIZE, Record};
use crate::byte_order::{read_network_u16, read_network_u32};

/// Cursor over a borrowed record stream.
///
/// The cursor only moves forward. `position` never exceeds the buffer length
/// and every returned [`Record`] borrows bytes that lie entirely inside the
/// buffer.
///
/// # Examples
///
/// ```
/// use replayframe::record::{RecordCursor, RecordType};
///
/// let bytes = [0, 1, 0, 0, 0, 2, b'h', b'i'];
/// let mut cursor = RecordCursor::new(&bytes);
/// let record = cursor
///     .first_record()
///     .expect("well-formed stream")
///     .expect("one record");
/// assert_eq!(record.record_type(), RecordType::Url);
/// assert_eq!(record.value(), b"hi");
/// assert_eq!(cursor.next_record(), Ok(None));
/// ```
#[derive(Clone, Debug)]
pub struct RecordCursor<'a> {
    buffer: &'a [u8],
    position: usize,
}

impl<'a> RecordCursor<'a> {
    /// Create a cursor positioned at the start of `buffer`.
    #[must_use]
    pub fn new(buffer: &'a [u8]) -> Self {
        Self {
            buffer,
            position: 0,
        }
    }

    /// Offset of the next unread byte.
    #[must_use]
    pub fn position(&self) -> usize { self.position }

    /// Bytes not yet consumed.
    #[must_use]
    pub fn remaining(&self) -> usize { self.buffer.len() - self.position }

    /// Read the first record of the stream.
    ///
    /// Returns `Ok(None)` for an empty buffer.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::NotAtStart`] if the cursor has already
    /// advanced, otherwise the same errors as
    /// [`next_record`](Self::next_record).
    pub fn first_record(&mut self) -> Result<Option<Record<'a>>, DecodeError> {
        if self.position != 0 {
            return Err(DecodeError::NotAtStart {
                position: self.position,
            });
        }
        self.read_record()
    }

    /// Read the record at the cursor and advance past it.
    ///
    /// Returns `Ok(None)` once no bytes remain.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::IncompleteHeader`] when fewer than
    /// [`HEADER_SIZE`] bytes remain, or [`DecodeError::ValueOverrun`] when the
    /// declared length exceeds the bytes after the header. The cursor does not
    /// move on error.
    pub fn next_record(&mut self) -> Result<Option<Record<'a>>, DecodeError> { self.read_record() }

    /// Iterate over the remaining records.
    #[must_use]
    pub fn records(self) -> Records<'a> {
        Records {
            cursor: self,
            failed: false,
        }
    }

    fn read_record(&mut self) -> Result<Option<Record<'a>>, DecodeError> {
        let rest = self.buffer.get(self.position..).unwrap_or_default();
        if rest.is_empty() {
            return Ok(None);
        }

        let (header, body) = rest
            .split_first_chunk::<HEADER_SIZE>()
            .ok_or(DecodeError::IncompleteHeader {
                have: rest.len(),
                need: HEADER_SIZE,
            })?;
        let type_code = read_network_u16([header[0], header[1]]);
        let length = read_network_u32([header[2], header[3], header[4], header[5]]);

        let overrun = DecodeError::ValueOverrun {
            declared: length,
            available: body.len(),
        };
        let value_len = usize::try_from(length).map_err(|_| overrun)?;
        let value = body.get(..value_len).ok_or(overrun)?;

        self.position += HEADER_SIZE + value_len;
        Ok(Some(Record::new(type_code, length, value)))
    }
}

/// Iterator adapter over a [`RecordCursor`].
///
/// Yields each record in order, then stops after the end of the stream or
/// after the first error.
#[derive(Debug)]
pub struct Records<'a> {
    cursor: RecordCursor<'a>,
    failed: bool,
}

impl Records<'_> {
    /// Offset of the next unread byte.
    #[must_use]
    pub fn position(&self) -> usize { self.cursor.position() }
}

impl<'a> Iterator for Records<'a> {
    type Item = Result<Record<'a>, DecodeError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        match self.cursor.next_record() {
            Ok(record) => record.map(Ok),
            Err(err) => {
                self.failed = true;
                Some(Err(err))
            }
        }
    }
}

impl std::iter::FusedIterator for Records<'_> {}
