//! Record stream builders and the canonical replay scenarios.

use replayframe::{RecordType, RecordWriter};

/// Encode `records` in order.
///
/// # Panics
///
/// Panics if a value is longer than `u32::MAX` bytes.
#[must_use]
pub fn stream(records: &[(RecordType, &[u8])]) -> Vec<u8> {
    let mut writer = RecordWriter::new();
    for (record_type, value) in records {
        writer
            .push(*record_type, value)
            .expect("test values fit in a record");
    }
    writer.finish().to_vec()
}

/// Value of an integer record.
#[must_use]
pub fn u32_value(value: u32) -> [u8; 4] { value.to_be_bytes() }

/// Encode one `MimePart` record whose value carries the optional name and
/// data records.
#[must_use]
pub fn mime_part(name: Option<&[u8]>, data: Option<&[u8]>) -> Vec<u8> {
    let mut nested = Vec::new();
    if let Some(name) = name {
        nested.push((RecordType::MimePartName, name));
    }
    if let Some(data) = data {
        nested.push((RecordType::MimePartData, data));
    }
    let inner = stream(&nested);
    stream(&[(RecordType::MimePart, &inner)])
}

/// Response served by the scenario inputs.
pub const OK_RESPONSE: &[u8] = b"HTTP/1.0 200 OK\r\nContent-Length: 2\r\n\r\nhi";

/// URL plus one response: configures the target and transfers successfully.
#[must_use]
pub fn scenario_url_and_response() -> Vec<u8> {
    stream(&[
        (RecordType::Url, b"http://127.0.0.1/"),
        (RecordType::Response(0), OK_RESPONSE),
    ])
}

/// Two `HttpAuth` records: the second is a set-once violation.
#[must_use]
pub fn scenario_duplicate_option() -> Vec<u8> {
    stream(&[
        (RecordType::HttpAuth, &u32_value(1)),
        (RecordType::HttpAuth, &u32_value(2)),
    ])
}

/// A header record whose declared length overruns the buffer.
#[must_use]
pub fn scenario_truncated() -> Vec<u8> {
    let mut input = stream(&[(RecordType::Url, b"http://127.0.0.1/")]);
    input.extend_from_slice(&[0x00, 0x06, 0x00, 0x00, 0x00, 0x20]);
    input.extend_from_slice(b"X-Short: 1");
    input
}
