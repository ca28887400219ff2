//! Maps decoded records onto session state and engine options.
//!
//! Each record type belongs to one behavioural class:
//!
//! - singleton strings and singleton integers configure an engine option at
//!   most once per run;
//! - response records fill an indexed response slot;
//! - the upload record installs the upload payload;
//! - list records append to an ordered list applied after the stream ends;
//! - mime records assemble a multi-part document;
//! - unknown types are skipped so newer streams still replay.
//!
//! A rejected record leaves both the session and the engine untouched: all
//! checks run before the engine sees the option, and the set-once mark is
//! recorded only after the engine accepts it.

mod mime;

use tracing::{debug, trace, warn};

use crate::{
    coerce::{NulTerminated, fixed_u32},
    engine::{EngineOption, OptionValue, TransferEngine},
    error::{HarnessError, PolicyViolation},
    metrics,
    record::{Record, RecordCursor, RecordType},
    session::{ListKind, Session},
};

/// Behavioural class of a record type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RecordClass {
    /// Set-once string option.
    SingletonString,
    /// Set-once four-byte integer option.
    SingletonInteger,
    /// Indexed scripted response.
    ResponseSlot,
    /// Upload payload.
    Upload,
    /// Repeatable list entry.
    List,
    /// Mime part, part name or part data.
    SubDocument,
    /// Unrecognised type, skipped.
    Unknown,
}

impl RecordClass {
    /// Short label for logs and metrics.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::SingletonString => "singleton_string",
            Self::SingletonInteger => "singleton_integer",
            Self::ResponseSlot => "response",
            Self::Upload => "upload",
            Self::List => "list",
            Self::SubDocument => "sub_document",
            Self::Unknown => "unknown",
        }
    }
}

enum Action {
    Text(EngineOption),
    PostFields,
    Integer(EngineOption),
    Response(usize),
    Upload,
    List(ListKind),
    MimePart,
    MimeField,
    Skip,
}

impl Action {
    fn of(record_type: RecordType) -> Self {
        match record_type {
            RecordType::Url => Self::Text(EngineOption::Url),
            RecordType::Username => Self::Text(EngineOption::Username),
            RecordType::Password => Self::Text(EngineOption::Password),
            RecordType::Cookie => Self::Text(EngineOption::Cookie),
            RecordType::Range => Self::Text(EngineOption::Range),
            RecordType::CustomRequest => Self::Text(EngineOption::CustomRequest),
            RecordType::MailFrom => Self::Text(EngineOption::MailFrom),
            RecordType::AcceptEncoding => Self::Text(EngineOption::AcceptEncoding),
            RecordType::PostFields => Self::PostFields,
            RecordType::HttpAuth => Self::Integer(EngineOption::HttpAuth),
            RecordType::OptHeader => Self::Integer(EngineOption::Header),
            RecordType::NoBody => Self::Integer(EngineOption::NoBody),
            RecordType::FollowLocation => Self::Integer(EngineOption::FollowLocation),
            RecordType::Response(slot) => Self::Response(usize::from(slot)),
            RecordType::Upload => Self::Upload,
            RecordType::Header => Self::List(ListKind::Headers),
            RecordType::MailRecipient => Self::List(ListKind::MailRecipients),
            RecordType::ConnectTo => Self::List(ListKind::ConnectTo),
            RecordType::MimePart => Self::MimePart,
            RecordType::MimePartName | RecordType::MimePartData => Self::MimeField,
            RecordType::Unknown(_) => Self::Skip,
        }
    }

    fn class(&self) -> RecordClass {
        match self {
            Self::Text(_) | Self::PostFields => RecordClass::SingletonString,
            Self::Integer(_) => RecordClass::SingletonInteger,
            Self::Response(_) => RecordClass::ResponseSlot,
            Self::Upload => RecordClass::Upload,
            Self::List(_) => RecordClass::List,
            Self::MimePart | Self::MimeField => RecordClass::SubDocument,
            Self::Skip => RecordClass::Unknown,
        }
    }
}

/// Behavioural class of `record_type`.
#[must_use]
pub fn classify(record_type: RecordType) -> RecordClass { Action::of(record_type).class() }

/// Apply one record to `session` and `engine`.
///
/// Returns the record's class on success.
///
/// # Errors
///
/// Returns a [`HarnessError`] if the record violates a set-once or width
/// rule, addresses a bad response slot or mime part, cannot be
/// materialised, or is rejected by the engine.
pub fn dispatch<'a, E>(
    record: Record<'a>,
    session: &mut Session<'a>,
    engine: &mut E,
) -> Result<RecordClass, HarnessError>
where
    E: TransferEngine + ?Sized,
{
    let action = Action::of(record.record_type());
    let value = record.value();
    match action {
        Action::Text(option) => {
            session.options().ensure_unset(option)?;
            let text = NulTerminated::from_value(value)?;
            engine.set_option(option, OptionValue::Str(text.as_c_str()))?;
            session.options_mut().mark(option);
        }
        Action::PostFields => {
            session.options().ensure_unset(EngineOption::PostFields)?;
            let body = NulTerminated::from_value(value)?;
            engine.set_option(EngineOption::PostFields, OptionValue::Str(body.as_c_str()))?;
            session.set_postfields(body);
            session.options_mut().mark(EngineOption::PostFields);
        }
        Action::Integer(option) => {
            let number = fixed_u32(value).ok_or(PolicyViolation::IntegerLength {
                record_type: record.record_type(),
                length: record.length(),
            })?;
            session.options().ensure_unset(option)?;
            engine.set_option(option, OptionValue::Long(i64::from(number)))?;
            session.options_mut().mark(option);
        }
        Action::Response(index) => {
            if session.responses().get(index).is_some() {
                debug!(slot = index, "replacing scripted response");
            }
            session.responses_mut().store(index, value)?;
        }
        Action::Upload => {
            session.options().ensure_unset(EngineOption::Upload)?;
            session.options().ensure_unset(EngineOption::InFileSizeLarge)?;
            // Size first: a size without the upload toggle is inert.
            engine.set_option(
                EngineOption::InFileSizeLarge,
                OptionValue::Size(u64::from(record.length())),
            )?;
            engine.set_option(EngineOption::Upload, OptionValue::Long(1))?;
            session.set_upload(value);
            session.options_mut().mark(EngineOption::Upload);
            session.options_mut().mark(EngineOption::InFileSizeLarge);
        }
        Action::List(kind) => {
            let entry = NulTerminated::from_value(value)?;
            session.push_list(kind, entry);
        }
        Action::MimePart => {
            let part = mime::parse_part(value)?;
            session.mime_mut().start_part(part);
        }
        Action::MimeField => mime::apply_to_current(record, session)?,
        Action::Skip => trace!(type_code = record.type_code(), "skipping unknown record"),
    }
    Ok(action.class())
}

/// Apply options accumulated over the whole stream.
///
/// Non-empty lists and a started mime document are each applied once.
///
/// # Errors
///
/// Returns a [`HarnessError`] if an accumulated option was already set or
/// the engine rejects it.
pub fn finalize<E>(session: &mut Session<'_>, engine: &mut E) -> Result<(), HarnessError>
where
    E: TransferEngine + ?Sized,
{
    for (kind, option) in [
        (ListKind::Headers, EngineOption::HttpHeader),
        (ListKind::MailRecipients, EngineOption::MailRcpt),
        (ListKind::ConnectTo, EngineOption::ConnectTo),
    ] {
        let entries = session.list(kind);
        if entries.is_empty() {
            continue;
        }
        session.options().ensure_unset(option)?;
        engine.set_option(option, OptionValue::List(entries))?;
        session.options_mut().mark(option);
    }

    if session.mime().is_building() {
        session.options().ensure_unset(EngineOption::MimePost)?;
    }
    if let Some(document) = session.mime_mut().finish() {
        engine.set_option(EngineOption::MimePost, OptionValue::Mime(document))?;
        session.options_mut().mark(EngineOption::MimePost);
    }
    Ok(())
}

/// Decode `input` and dispatch every record, then finalize.
///
/// Stops at the first error. Returns the number of records applied.
///
/// # Errors
///
/// Returns the first structural, policy, allocation or engine error.
pub fn dispatch_stream<'a, E>(
    input: &'a [u8],
    session: &mut Session<'a>,
    engine: &mut E,
) -> Result<usize, HarnessError>
where
    E: TransferEngine + ?Sized,
{
    let mut applied = 0;
    dispatch_counted(input, session, engine, &mut applied)?;
    Ok(applied)
}

/// As [`dispatch_stream`], but `applied` is bumped per record so the count
/// survives an error.
///
/// # Errors
///
/// Returns the first structural, policy, allocation or engine error.
pub fn dispatch_counted<'a, E>(
    input: &'a [u8],
    session: &mut Session<'a>,
    engine: &mut E,
    applied: &mut usize,
) -> Result<(), HarnessError>
where
    E: TransferEngine + ?Sized,
{
    let mut cursor = RecordCursor::new(input);
    let mut next = cursor.first_record();
    while let Some(record) = next? {
        debug!(
            record_type = %record.record_type(),
            length = record.length(),
            offset = cursor.position(),
            "record decoded"
        );
        match dispatch(record, session, engine) {
            Ok(class) => metrics::inc_records(class),
            Err(err) => {
                warn!(record_type = %record.record_type(), error = %err, "record rejected");
                return Err(err);
            }
        }
        *applied += 1;
        next = cursor.next_record();
    }
    finalize(session, engine)
}

#[cfg(test)]
mod tests;
