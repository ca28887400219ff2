//! Network byte-order conversions for record headers and fixed-width values.
//!
//! Every multi-byte integer in the record format is big-endian. The
//! conversions are kept in one place so the Clippy expectation about
//! big-endian byte handling stays scoped to the conversion points.

/// Serialise a `u16` in network byte order.
///
/// # Examples
///
/// ```
/// use replayframe::byte_order::write_network_u16;
///
/// assert_eq!(write_network_u16(0x001d), [0x00, 0x1d]);
/// ```
#[must_use]
pub fn write_network_u16(value: u16) -> [u8; 2] {
    #[expect(
        clippy::big_endian_bytes,
        reason = "Record headers carry big-endian type codes."
    )]
    value.to_be_bytes()
}

/// Parse a network-order `u16` record type code.
///
/// # Examples
///
/// ```
/// use replayframe::byte_order::read_network_u16;
///
/// assert_eq!(read_network_u16([0x00, 0x1d]), 29);
/// ```
#[must_use]
pub fn read_network_u16(bytes: [u8; 2]) -> u16 {
    #[expect(
        clippy::big_endian_bytes,
        reason = "Record headers carry big-endian type codes."
    )]
    u16::from_be_bytes(bytes)
}

/// Serialise a `u32` in network byte order.
///
/// # Examples
///
/// ```
/// use replayframe::byte_order::write_network_u32;
///
/// assert_eq!(write_network_u32(7), [0, 0, 0, 7]);
/// ```
#[must_use]
pub fn write_network_u32(value: u32) -> [u8; 4] {
    #[expect(
        clippy::big_endian_bytes,
        reason = "Record lengths and integer values are big-endian."
    )]
    value.to_be_bytes()
}

/// Parse a network-order `u32` record length or integer value.
///
/// # Examples
///
/// ```
/// use replayframe::byte_order::read_network_u32;
///
/// assert_eq!(read_network_u32([0, 0, 0x01, 0x00]), 256);
/// ```
#[must_use]
pub fn read_network_u32(bytes: [u8; 4]) -> u32 {
    #[expect(
        clippy::big_endian_bytes,
        reason = "Record lengths and integer values are big-endian."
    )]
    u32::from_be_bytes(bytes)
}
