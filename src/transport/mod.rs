//! Fabricated transport endpoint served from session state.
//!
//! [`MockTransport`] answers the engine's socket callbacks without touching
//! the network. The connection moves through
//! [`Closed`](SocketState::Closed) → [`Open`](SocketState::Open) →
//! [`Shutdown`](SocketState::Shutdown); it opens once per run and shuts down
//! after the last scripted response has been delivered.

use tracing::{debug, trace};

use crate::{
    engine::{SocketDescriptor, SocketOptionOutcome, Transport, TransportError},
    session::Session,
};

/// Descriptor handed out for the fabricated connection.
pub const FABRICATED_DESCRIPTOR: SocketDescriptor = SocketDescriptor::new(7);

/// Lifecycle of the fabricated connection.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SocketState {
    /// Not yet opened.
    #[default]
    Closed,
    /// Opened and serving responses.
    Open,
    /// All responses delivered; the peer closed its side.
    Shutdown,
}

/// Byte counters for one run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TransportStats {
    /// Upload bytes handed to the engine.
    pub uploaded: usize,
    /// Response bytes handed to the engine.
    pub delivered: usize,
    /// Bytes the engine sent to the peer.
    pub received_from_engine: usize,
    /// Body bytes the engine produced.
    pub body: usize,
}

/// Transport callbacks backed by a [`Session`].
#[derive(Debug)]
pub struct MockTransport<'s, 'a> {
    session: &'s mut Session<'a>,
    stats: TransportStats,
}

impl<'s, 'a> MockTransport<'s, 'a> {
    /// Serve `session`'s responses and upload payload.
    pub fn new(session: &'s mut Session<'a>) -> Self {
        Self {
            session,
            stats: TransportStats::default(),
        }
    }

    /// Current connection state.
    #[must_use]
    pub fn state(&self) -> SocketState { self.session.socket() }

    /// Counters collected so far.
    #[must_use]
    pub fn stats(&self) -> TransportStats { self.stats }

    fn check_descriptor(&self, descriptor: SocketDescriptor) -> Result<(), TransportError> {
        if descriptor == FABRICATED_DESCRIPTOR {
            Ok(())
        } else {
            Err(TransportError::BadDescriptor { descriptor })
        }
    }
}

impl Transport for MockTransport<'_, '_> {
    fn open(&mut self) -> Result<SocketDescriptor, TransportError> {
        match self.session.socket() {
            SocketState::Closed => {}
            SocketState::Open => return Err(TransportError::AlreadyOpen),
            SocketState::Shutdown => return Err(TransportError::Shutdown),
        }
        self.session.set_socket(SocketState::Open);
        let queued = self.session.responses().get(0).is_some();
        debug!(descriptor = %FABRICATED_DESCRIPTOR, first_response_queued = queued, "socket opened");
        Ok(FABRICATED_DESCRIPTOR)
    }

    fn configure(&mut self, descriptor: SocketDescriptor) -> Result<SocketOptionOutcome, TransportError> {
        self.check_descriptor(descriptor)?;
        match self.session.socket() {
            SocketState::Open => Ok(SocketOptionOutcome::AlreadyConnected),
            SocketState::Closed => Err(TransportError::NotConnected),
            SocketState::Shutdown => Err(TransportError::Shutdown),
        }
    }

    fn supply_upload(&mut self, buf: &mut [u8]) -> Result<usize, TransportError> {
        if buf.is_empty() {
            return Err(TransportError::EmptyBuffer);
        }
        let n = self.session.upload_mut().fill(buf);
        self.stats.uploaded += n;
        trace!(bytes = n, remaining = self.session.upload().remaining(), "upload chunk supplied");
        Ok(n)
    }

    fn deliver(&mut self, descriptor: SocketDescriptor, buf: &mut [u8]) -> Result<usize, TransportError> {
        self.check_descriptor(descriptor)?;
        if buf.is_empty() {
            return Err(TransportError::EmptyBuffer);
        }
        match self.session.socket() {
            SocketState::Closed => return Err(TransportError::NotConnected),
            SocketState::Shutdown => return Ok(0),
            SocketState::Open => {}
        }
        let n = self.session.responses_mut().fill(buf);
        if n == 0 {
            self.session.set_socket(SocketState::Shutdown);
            debug!(delivered = self.stats.delivered, "responses exhausted; socket shut down");
        } else {
            self.stats.delivered += n;
            trace!(bytes = n, slot = self.session.responses().current(), "response chunk delivered");
        }
        Ok(n)
    }

    fn send(&mut self, descriptor: SocketDescriptor, data: &[u8]) -> Result<usize, TransportError> {
        self.check_descriptor(descriptor)?;
        if self.session.socket() == SocketState::Closed {
            return Err(TransportError::NotConnected);
        }
        self.stats.received_from_engine += data.len();
        Ok(data.len())
    }

    fn write_body(&mut self, data: &[u8]) -> usize {
        self.stats.body += data.len();
        data.len()
    }
}

#[cfg(test)]
mod tests;
