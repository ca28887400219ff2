//! Nested record streams carried by mime part records.

use tracing::trace;

use crate::{
    coerce::NulTerminated,
    engine::MimePart,
    error::{HarnessError, StructuralError},
    record::{Record, RecordCursor, RecordType},
    session::Session,
};

/// Build a part from the nested record stream in a mime part's value.
///
/// The whole sub-stream is validated before the part is returned.
pub(super) fn parse_part(value: &[u8]) -> Result<MimePart<'_>, HarnessError> {
    let mut part = MimePart::new();
    for record in RecordCursor::new(value).records() {
        let record = record.map_err(StructuralError::MimeSubStream)?;
        apply_to_part(record, &mut part)?;
    }
    Ok(part)
}

/// Apply a top-level part name or data record to the part in progress.
pub(super) fn apply_to_current<'a>(
    record: Record<'a>,
    session: &mut Session<'a>,
) -> Result<(), HarnessError> {
    let part = session
        .mime_mut()
        .part_mut()
        .ok_or(StructuralError::OrphanMimeRecord {
            record_type: record.record_type(),
        })?;
    apply_to_part(record, part)
}

fn apply_to_part<'a>(record: Record<'a>, part: &mut MimePart<'a>) -> Result<(), HarnessError> {
    match record.record_type() {
        RecordType::MimePartName => part.set_name(NulTerminated::from_value(record.value())?),
        RecordType::MimePartData => part.set_data(record.value()),
        RecordType::MimePart => return Err(StructuralError::NestedMimePart.into()),
        other => trace!(record_type = %other, "skipping record inside mime part"),
    }
    Ok(())
}
