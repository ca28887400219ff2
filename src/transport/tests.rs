//! Tests for the fabricated transport lifecycle and data delivery.

use rstest::{fixture, rstest};

use super::{FABRICATED_DESCRIPTOR, MockTransport, SocketState};
use crate::{
    engine::{SocketDescriptor, SocketOptionOutcome, Transport, TransportError},
    session::Session,
};

#[fixture]
fn session() -> Session<'static> {
    let mut session = Session::new();
    session.responses_mut().store(0, b"zero").expect("in range");
    session.responses_mut().store(2, b"two").expect("in range");
    session.responses_mut().store(5, b"five").expect("in range");
    session
}

fn read_all(transport: &mut MockTransport<'_, '_>, capacity: usize) -> Vec<u8> {
    let mut buf = vec![0_u8; capacity];
    let mut out = Vec::new();
    loop {
        let n = transport
            .deliver(FABRICATED_DESCRIPTOR, &mut buf)
            .expect("deliver");
        if n == 0 {
            return out;
        }
        out.extend_from_slice(&buf[..n]);
    }
}

#[rstest]
fn open_transitions_closed_to_open(mut session: Session<'static>) {
    let mut transport = MockTransport::new(&mut session);
    assert_eq!(transport.state(), SocketState::Closed);
    assert_eq!(transport.open(), Ok(FABRICATED_DESCRIPTOR));
    assert_eq!(transport.state(), SocketState::Open);
    assert_eq!(
        transport.configure(FABRICATED_DESCRIPTOR),
        Ok(SocketOptionOutcome::AlreadyConnected)
    );
}

#[rstest]
fn second_open_is_rejected(mut session: Session<'static>) {
    let mut transport = MockTransport::new(&mut session);
    transport.open().expect("first open");
    assert_eq!(transport.open(), Err(TransportError::AlreadyOpen));
}

#[rstest]
fn populated_slots_are_served_in_index_order(mut session: Session<'static>) {
    let mut transport = MockTransport::new(&mut session);
    transport.open().expect("open");
    assert_eq!(read_all(&mut transport, 3), b"zerotwofive");
    assert_eq!(transport.state(), SocketState::Shutdown);
    assert_eq!(transport.stats().delivered, 11);
}

#[rstest]
fn misuse_after_shutdown_is_an_error(mut session: Session<'static>) {
    let mut transport = MockTransport::new(&mut session);
    transport.open().expect("open");
    read_all(&mut transport, 64);
    assert_eq!(transport.open(), Err(TransportError::Shutdown));
    assert_eq!(
        transport.configure(FABRICATED_DESCRIPTOR),
        Err(TransportError::Shutdown)
    );
    assert_eq!(
        transport.deliver(FABRICATED_DESCRIPTOR, &mut [0_u8; 4]),
        Ok(0)
    );
}

#[rstest]
fn deliver_before_open_is_not_connected(mut session: Session<'static>) {
    let mut transport = MockTransport::new(&mut session);
    assert_eq!(
        transport.deliver(FABRICATED_DESCRIPTOR, &mut [0_u8; 4]),
        Err(TransportError::NotConnected)
    );
    assert_eq!(
        transport.send(FABRICATED_DESCRIPTOR, b"GET"),
        Err(TransportError::NotConnected)
    );
}

#[rstest]
fn foreign_descriptor_is_rejected(mut session: Session<'static>) {
    let mut transport = MockTransport::new(&mut session);
    transport.open().expect("open");
    let foreign = SocketDescriptor::new(99);
    assert_eq!(
        transport.deliver(foreign, &mut [0_u8; 4]),
        Err(TransportError::BadDescriptor {
            descriptor: foreign
        })
    );
}

#[rstest]
fn zero_capacity_buffers_are_rejected(mut session: Session<'static>) {
    let mut transport = MockTransport::new(&mut session);
    transport.open().expect("open");
    assert_eq!(
        transport.deliver(FABRICATED_DESCRIPTOR, &mut []),
        Err(TransportError::EmptyBuffer)
    );
    assert_eq!(transport.supply_upload(&mut []), Err(TransportError::EmptyBuffer));
}

#[test]
fn no_responses_shuts_down_on_first_read() {
    let mut session = Session::new();
    let mut transport = MockTransport::new(&mut session);
    transport.open().expect("open");
    assert_eq!(transport.deliver(FABRICATED_DESCRIPTOR, &mut [0_u8; 8]), Ok(0));
    assert_eq!(transport.state(), SocketState::Shutdown);
}

#[test]
fn upload_is_supplied_until_exhausted() {
    let mut session = Session::new();
    session.set_upload(b"payload");
    let mut transport = MockTransport::new(&mut session);
    let mut buf = [0_u8; 4];
    assert_eq!(transport.supply_upload(&mut buf), Ok(4));
    assert_eq!(&buf, b"payl");
    assert_eq!(transport.supply_upload(&mut buf), Ok(3));
    assert_eq!(&buf[..3], b"oad");
    assert_eq!(transport.supply_upload(&mut buf), Ok(0));
    assert_eq!(transport.stats().uploaded, 7);
}

#[rstest]
fn sent_and_body_bytes_are_counted(mut session: Session<'static>) {
    let mut transport = MockTransport::new(&mut session);
    transport.open().expect("open");
    assert_eq!(transport.send(FABRICATED_DESCRIPTOR, b"GET / \r\n"), Ok(8));
    assert_eq!(transport.write_body(b"abc"), 3);
    let stats = transport.stats();
    assert_eq!(stats.received_from_engine, 8);
    assert_eq!(stats.body, 3);
}
