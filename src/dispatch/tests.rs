//! Tests for record dispatch policy.

use rstest::rstest;

use super::{RecordClass, classify, dispatch, dispatch_stream};
use crate::{
    engine::{AppliedValue, DryRunEngine, EngineCode, EngineOption},
    error::{HarnessError, PolicyViolation, StructuralError},
    record::{Record, RecordCursor, RecordType, RecordWriter},
    session::{ListKind, Session},
};

fn stream(records: &[(RecordType, &[u8])]) -> Vec<u8> {
    let mut writer = RecordWriter::new();
    for (record_type, value) in records {
        writer.push(*record_type, value).expect("small value");
    }
    writer.finish().to_vec()
}

fn single(bytes: &[u8]) -> Record<'_> {
    RecordCursor::new(bytes)
        .first_record()
        .expect("valid")
        .expect("record")
}

#[rstest]
#[case(RecordType::Url, RecordClass::SingletonString)]
#[case(RecordType::PostFields, RecordClass::SingletonString)]
#[case(RecordType::NoBody, RecordClass::SingletonInteger)]
#[case(RecordType::Response(4), RecordClass::ResponseSlot)]
#[case(RecordType::Upload, RecordClass::Upload)]
#[case(RecordType::MailRecipient, RecordClass::List)]
#[case(RecordType::MimePartData, RecordClass::SubDocument)]
#[case(RecordType::Unknown(400), RecordClass::Unknown)]
fn record_types_fall_into_classes(#[case] record_type: RecordType, #[case] class: RecordClass) {
    assert_eq!(classify(record_type), class);
}

#[rstest]
#[case(RecordType::Url, EngineOption::Url)]
#[case(RecordType::Username, EngineOption::Username)]
#[case(RecordType::Password, EngineOption::Password)]
#[case(RecordType::Cookie, EngineOption::Cookie)]
#[case(RecordType::Range, EngineOption::Range)]
#[case(RecordType::CustomRequest, EngineOption::CustomRequest)]
#[case(RecordType::MailFrom, EngineOption::MailFrom)]
#[case(RecordType::AcceptEncoding, EngineOption::AcceptEncoding)]
#[case(RecordType::PostFields, EngineOption::PostFields)]
fn singleton_strings_apply_once(#[case] record_type: RecordType, #[case] option: EngineOption) {
    let bytes = stream(&[(record_type, b"first"), (record_type, b"second")]);
    let mut session = Session::new();
    let mut engine = DryRunEngine::new();

    let err = dispatch_stream(&bytes, &mut session, &mut engine).expect_err("second is rejected");
    assert_eq!(
        err,
        HarnessError::Policy(PolicyViolation::OptionAlreadySet { option })
    );
    assert_eq!(
        engine.option(option).and_then(AppliedValue::as_text),
        Some(&b"first"[..])
    );
    assert_eq!(engine.history(), [option]);
}

#[rstest]
#[case(RecordType::HttpAuth)]
#[case(RecordType::OptHeader)]
#[case(RecordType::NoBody)]
#[case(RecordType::FollowLocation)]
fn integer_records_must_be_four_bytes(
    #[case] record_type: RecordType,
    #[values(0_usize, 1, 3, 5, 8)] length: usize,
) {
    let value = vec![0_u8; length];
    let bytes = stream(&[(record_type, &value)]);
    let mut session = Session::new();
    let mut engine = DryRunEngine::new();

    let err = dispatch(single(&bytes), &mut session, &mut engine).expect_err("wrong width");
    assert_eq!(
        err,
        HarnessError::Policy(PolicyViolation::IntegerLength {
            record_type,
            length: u32::try_from(length).expect("small"),
        })
    );
    assert!(session.options().is_empty());
    assert!(engine.history().is_empty());
}

#[test]
fn integer_record_is_decoded_big_endian() {
    let bytes = stream(&[(RecordType::FollowLocation, &[0, 0, 1, 2])]);
    let mut session = Session::new();
    let mut engine = DryRunEngine::new();
    dispatch(single(&bytes), &mut session, &mut engine).expect("applied");
    assert_eq!(
        engine
            .option(EngineOption::FollowLocation)
            .and_then(AppliedValue::as_long),
        Some(0x0102)
    );
    assert!(session.options().is_set(EngineOption::FollowLocation));
}

#[test]
fn response_records_fill_slots_without_set_once() {
    let bytes = stream(&[
        (RecordType::Response(3), b"a"),
        (RecordType::Response(3), b"b"),
        (RecordType::Response(0), b"c"),
    ]);
    let mut session = Session::new();
    let mut engine = DryRunEngine::new();
    assert_eq!(dispatch_stream(&bytes, &mut session, &mut engine), Ok(3));
    assert_eq!(session.responses().get(3), Some(&b"b"[..]));
    assert_eq!(session.responses().get(0), Some(&b"c"[..]));
    assert!(session.options().is_empty());
}

#[test]
fn upload_sets_flag_and_size_once() {
    let bytes = stream(&[(RecordType::Upload, b"data!"), (RecordType::Upload, b"again")]);
    let mut session = Session::new();
    let mut engine = DryRunEngine::new();

    let err = dispatch_stream(&bytes, &mut session, &mut engine).expect_err("second upload");
    assert_eq!(
        err,
        HarnessError::Policy(PolicyViolation::OptionAlreadySet {
            option: EngineOption::Upload
        })
    );
    assert_eq!(session.upload().data(), b"data!");
    assert_eq!(
        engine.option(EngineOption::InFileSizeLarge),
        Some(&AppliedValue::Size(5))
    );
}

#[test]
fn rejected_upload_size_leaves_no_upload_toggle() {
    let bytes = stream(&[(RecordType::Upload, b"data!")]);
    let code = EngineCode::new(48).expect("non-zero");
    let mut session = Session::new();
    let mut engine = DryRunEngine::new().rejecting(EngineOption::InFileSizeLarge, code);

    let err = dispatch_stream(&bytes, &mut session, &mut engine).expect_err("size rejected");
    assert_eq!(err, HarnessError::Engine(code));
    assert_eq!(engine.option(EngineOption::Upload), None);
    assert!(engine.history().is_empty());
    assert!(!session.options().is_set(EngineOption::Upload));
    assert!(session.upload().data().is_empty());
}

#[test]
fn list_records_accumulate_and_apply_at_end() {
    let bytes = stream(&[
        (RecordType::Header, b"X-One: 1"),
        (RecordType::MailRecipient, b"a@x"),
        (RecordType::Header, b"X-Two: 2"),
        (RecordType::Header, b"X-One: 1"),
        (RecordType::ConnectTo, b"x:80:y:8080"),
    ]);
    let mut session = Session::new();
    let mut engine = DryRunEngine::new();
    dispatch_stream(&bytes, &mut session, &mut engine).expect("applied");

    assert_eq!(session.list(ListKind::Headers).len(), 3);
    assert_eq!(
        engine.option(EngineOption::HttpHeader),
        Some(&AppliedValue::List(vec![
            b"X-One: 1".to_vec(),
            b"X-Two: 2".to_vec(),
            b"X-One: 1".to_vec(),
        ]))
    );
    assert_eq!(
        engine.option(EngineOption::MailRcpt),
        Some(&AppliedValue::List(vec![b"a@x".to_vec()]))
    );
    assert!(engine.option(EngineOption::ConnectTo).is_some());
}

#[test]
fn empty_lists_are_not_applied() {
    let bytes = stream(&[(RecordType::Url, b"http://x")]);
    let mut session = Session::new();
    let mut engine = DryRunEngine::new();
    dispatch_stream(&bytes, &mut session, &mut engine).expect("applied");
    assert_eq!(engine.history(), [EngineOption::Url]);
}

#[test]
fn mime_parts_collect_name_and_data() {
    let first = stream(&[
        (RecordType::MimePartName, b"field"),
        (RecordType::MimePartData, b"value"),
        (RecordType::Unknown(77), b"ignored"),
    ]);
    let second = stream(&[(RecordType::MimePartData, b"raw")]);
    let bytes = stream(&[
        (RecordType::MimePart, &first),
        (RecordType::MimePart, &second),
        (RecordType::MimePartName, b"late-name"),
    ]);
    let mut session = Session::new();
    let mut engine = DryRunEngine::new();
    dispatch_stream(&bytes, &mut session, &mut engine).expect("applied");

    assert_eq!(
        engine.option(EngineOption::MimePost),
        Some(&AppliedValue::Mime(vec![
            (Some(b"field".to_vec()), Some(b"value".to_vec())),
            (Some(b"late-name".to_vec()), Some(b"raw".to_vec())),
        ]))
    );
    assert!(session.options().is_set(EngineOption::MimePost));
}

#[rstest]
#[case(RecordType::MimePartName)]
#[case(RecordType::MimePartData)]
fn mime_field_without_part_is_structural(#[case] record_type: RecordType) {
    let bytes = stream(&[(record_type, b"x")]);
    let mut session = Session::new();
    let mut engine = DryRunEngine::new();
    assert_eq!(
        dispatch(single(&bytes), &mut session, &mut engine),
        Err(HarnessError::Structural(StructuralError::OrphanMimeRecord {
            record_type
        }))
    );
}

#[test]
fn truncated_mime_sub_stream_is_structural_and_keeps_previous_part() {
    let good = stream(&[(RecordType::MimePartData, b"ok")]);
    let bytes = stream(&[(RecordType::MimePart, &good), (RecordType::MimePart, &[0, 15, 0, 0])]);
    let mut session = Session::new();
    let mut engine = DryRunEngine::new();

    let err = dispatch_stream(&bytes, &mut session, &mut engine).expect_err("bad sub-stream");
    assert!(matches!(
        err,
        HarnessError::Structural(StructuralError::MimeSubStream(_))
    ));
    let part = session.mime_mut().part_mut().expect("first part still current");
    assert_eq!(part.data(), Some(&b"ok"[..]));
}

#[test]
fn nested_mime_part_is_structural() {
    let inner = stream(&[(RecordType::MimePart, b"")]);
    let bytes = stream(&[(RecordType::MimePart, &inner)]);
    let mut session = Session::new();
    let mut engine = DryRunEngine::new();
    assert_eq!(
        dispatch(single(&bytes), &mut session, &mut engine),
        Err(HarnessError::Structural(StructuralError::NestedMimePart))
    );
    assert!(!session.mime().is_building());
}

#[test]
fn engine_rejection_is_passed_through_and_not_marked() {
    let code = EngineCode::new(48).expect("non-zero");
    let bytes = stream(&[(RecordType::Url, b"http://x")]);
    let mut session = Session::new();
    let mut engine = DryRunEngine::new().rejecting(EngineOption::Url, code);
    assert_eq!(
        dispatch(single(&bytes), &mut session, &mut engine),
        Err(HarnessError::Engine(code))
    );
    assert!(!session.options().is_set(EngineOption::Url));
}

#[test]
fn unknown_records_are_skipped() {
    let bytes = stream(&[
        (RecordType::Unknown(0), b"zz"),
        (RecordType::Url, b"http://x"),
        (RecordType::Unknown(9_999), b""),
    ]);
    let mut session = Session::new();
    let mut engine = DryRunEngine::new();
    assert_eq!(dispatch_stream(&bytes, &mut session, &mut engine), Ok(3));
    assert_eq!(engine.history(), [EngineOption::Url]);
}

#[test]
fn trailing_garbage_stops_the_stream() {
    let mut bytes = stream(&[(RecordType::Url, b"http://x")]);
    bytes.extend_from_slice(&[0, 1, 0]);
    let mut session = Session::new();
    let mut engine = DryRunEngine::new();
    let err = dispatch_stream(&bytes, &mut session, &mut engine).expect_err("truncated header");
    assert_eq!(err.status_code(), 2);
    assert!(engine.option(EngineOption::Url).is_some());
}
