//! Value coercion for record payloads.
//!
//! Integer records carry exactly four big-endian bytes. String records are
//! materialised into an owned, NUL-terminated copy so they can be handed to
//! an engine that expects C strings; interior NUL bytes are kept and simply
//! end the string early from the engine's point of view.

use std::{ffi::CStr, fmt};

use crate::{byte_order::read_network_u32, error::AllocationFailure};

/// Decode a record value that must be exactly four bytes wide.
///
/// Returns `None` for any other length.
#[must_use]
pub fn fixed_u32(value: &[u8]) -> Option<u32> {
    let bytes: [u8; 4] = value.try_into().ok()?;
    Some(read_network_u32(bytes))
}

/// Owned copy of a record value followed by a single NUL byte.
///
/// The buffer is exactly `value.len() + 1` bytes long.
///
/// # Examples
///
/// ```
/// use replayframe::coerce::NulTerminated;
///
/// let s = NulTerminated::from_value(b"http://x").expect("allocation");
/// assert_eq!(s.as_bytes_with_nul(), b"http://x\0");
/// assert_eq!(s.as_c_str().to_bytes(), b"http://x");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct NulTerminated(Box<[u8]>);

impl NulTerminated {
    /// Copy `value` into a new NUL-terminated buffer.
    ///
    /// # Errors
    ///
    /// Returns [`AllocationFailure`] if the buffer cannot be allocated.
    pub fn from_value(value: &[u8]) -> Result<Self, AllocationFailure> {
        let requested = value
            .len()
            .checked_add(1)
            .ok_or(AllocationFailure { requested: usize::MAX })?;
        let mut buf = Vec::new();
        buf.try_reserve_exact(requested)
            .map_err(|_| AllocationFailure { requested })?;
        buf.extend_from_slice(value);
        buf.push(0);
        Ok(Self(buf.into_boxed_slice()))
    }

    /// View as a C string, ending at the first NUL byte.
    #[must_use]
    pub fn as_c_str(&self) -> &CStr { CStr::from_bytes_until_nul(&self.0).unwrap_or_default() }

    /// The original value bytes, without the trailing NUL.
    #[must_use]
    pub fn value(&self) -> &[u8] { self.0.split_last().map_or(&[][..], |(_, value)| value) }

    /// Full buffer including the trailing NUL.
    #[must_use]
    pub fn as_bytes_with_nul(&self) -> &[u8] { &self.0 }
}

impl fmt::Debug for NulTerminated {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", String::from_utf8_lossy(self.value()))
    }
}

impl fmt::Display for NulTerminated {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from_utf8_lossy(self.value()))
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::{NulTerminated, fixed_u32};

    #[rstest]
    #[case(&[0, 0, 0, 1][..], Some(1))]
    #[case(&[0x80, 0, 0, 0][..], Some(0x8000_0000))]
    #[case(&[0, 0, 1][..], None)]
    #[case(&[0, 0, 0, 0, 1][..], None)]
    #[case(&[][..], None)]
    fn fixed_u32_requires_four_bytes(#[case] value: &[u8], #[case] expected: Option<u32>) {
        assert_eq!(fixed_u32(value), expected);
    }

    #[test]
    fn materialised_string_is_one_byte_longer() {
        let s = NulTerminated::from_value(b"abc").expect("allocation");
        assert_eq!(s.as_bytes_with_nul().len(), 4);
        assert_eq!(s.value(), b"abc");
    }

    #[test]
    fn empty_value_becomes_empty_c_string() {
        let s = NulTerminated::from_value(b"").expect("allocation");
        assert_eq!(s.as_bytes_with_nul(), b"\0");
        assert!(s.as_c_str().to_bytes().is_empty());
    }

    #[test]
    fn interior_nul_truncates_c_view_only() {
        let s = NulTerminated::from_value(b"ab\0cd").expect("allocation");
        assert_eq!(s.as_c_str().to_bytes(), b"ab");
        assert_eq!(s.value(), b"ab\0cd");
    }
}
