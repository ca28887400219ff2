//! Boundary to the transfer engine driven by the harness.
//!
//! The engine itself (protocol parsing, TLS, retries) is not part of this
//! crate. It is consumed through two narrow traits:
//!
//! - [`TransferEngine`]: the handle the harness configures and then asks to
//!   perform a single transfer.
//! - [`Transport`]: the callbacks the engine invokes during that transfer to
//!   open its socket, negotiate socket options, pull upload bytes, exchange
//!   bytes with the peer and hand over body output.
//!
//! Dropping an engine value releases its handle.

pub mod dry_run;
pub mod mime;
mod option;

use std::{ffi::CStr, num::NonZeroU32};

use derive_more::{Display, From};
use thiserror::Error;

pub use dry_run::{AppliedValue, DryRunEngine, DryRunTranscript};
pub use mime::{MimeDocument, MimePart};
pub use option::EngineOption;

use crate::coerce::NulTerminated;

/// Non-zero status reported by the engine.
///
/// Codes are engine-defined and passed through to the run outcome
/// untouched.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq, Hash)]
#[error("engine status {0}")]
pub struct EngineCode(NonZeroU32);

impl EngineCode {
    /// Wrap a raw engine status, returning `None` for success (`0`).
    #[must_use]
    pub const fn new(code: u32) -> Option<Self> {
        match NonZeroU32::new(code) {
            Some(code) => Some(Self(code)),
            None => None,
        }
    }

    /// Raw status value.
    #[must_use]
    pub const fn get(self) -> u32 { self.0.get() }
}

/// Value passed alongside an [`EngineOption`].
///
/// Values borrow from the caller; an engine that needs them beyond the
/// `set_option` call must copy them.
#[derive(Clone, Copy, Debug)]
pub enum OptionValue<'a> {
    /// NUL-terminated string.
    Str(&'a CStr),
    /// Integer toggle or enumeration.
    Long(i64),
    /// 64-bit size.
    Size(u64),
    /// Ordered list of strings.
    List(&'a [NulTerminated]),
    /// Multi-part document.
    Mime(&'a MimeDocument<'a>),
}

/// Handle-based transfer engine.
pub trait TransferEngine {
    /// Apply one configuration option.
    ///
    /// # Errors
    ///
    /// Returns the engine's status code if it rejects the option.
    fn set_option(&mut self, option: EngineOption, value: OptionValue<'_>) -> Result<(), EngineCode>;

    /// Run a single transfer, invoking `transport` for all socket activity.
    ///
    /// # Errors
    ///
    /// Returns the engine's status code if the transfer fails.
    fn perform(&mut self, transport: &mut dyn Transport) -> Result<(), EngineCode>;
}

impl<E: TransferEngine + ?Sized> TransferEngine for &mut E {
    fn set_option(&mut self, option: EngineOption, value: OptionValue<'_>) -> Result<(), EngineCode> {
        (**self).set_option(option, value)
    }

    fn perform(&mut self, transport: &mut dyn Transport) -> Result<(), EngineCode> {
        (**self).perform(transport)
    }
}

/// Descriptor handed to the engine for the fabricated connection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, From)]
#[display("fd{_0}")]
pub struct SocketDescriptor(i32);

impl SocketDescriptor {
    /// Wrap a raw descriptor value.
    #[must_use]
    pub const fn new(fd: i32) -> Self { Self(fd) }

    /// Raw descriptor value.
    #[must_use]
    pub const fn get(self) -> i32 { self.0 }
}

/// Reply to the engine's post-open socket-option negotiation.
///
/// A fabricated descriptor has no peer to connect to, so the only reply is
/// that the engine must skip `connect`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SocketOptionOutcome {
    /// The socket is already connected; the engine must skip `connect`.
    AlreadyConnected,
}

/// Failures reported by transport callbacks.
///
/// Engines translate these into their own transport-error signalling so
/// their recovery paths run as they would for a real socket.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum TransportError {
    /// The connection has not been opened.
    #[error("socket not connected")]
    NotConnected,
    /// A connection is already open.
    #[error("socket already open")]
    AlreadyOpen,
    /// The connection was shut down.
    #[error("socket shut down")]
    Shutdown,
    /// The descriptor does not belong to this transport.
    #[error("unknown descriptor {descriptor}")]
    BadDescriptor {
        /// Descriptor passed by the engine.
        descriptor: SocketDescriptor,
    },
    /// The caller supplied a zero-capacity buffer.
    #[error("zero-capacity buffer")]
    EmptyBuffer,
}

/// Callbacks invoked by the engine during [`TransferEngine::perform`].
///
/// All calls are synchronous and never block; "no more data" is a zero-length
/// result.
pub trait Transport {
    /// Open the connection and return its descriptor.
    ///
    /// # Errors
    ///
    /// Fails if a connection was already opened in this run.
    fn open(&mut self) -> Result<SocketDescriptor, TransportError>;

    /// Negotiate socket options for a freshly opened descriptor.
    ///
    /// # Errors
    ///
    /// Fails unless `descriptor` is the open connection.
    fn configure(&mut self, descriptor: SocketDescriptor) -> Result<SocketOptionOutcome, TransportError>;

    /// Copy the next chunk of upload payload into `buf`.
    ///
    /// Returns `0` once the payload is exhausted.
    ///
    /// # Errors
    ///
    /// Fails for a zero-capacity `buf`.
    fn supply_upload(&mut self, buf: &mut [u8]) -> Result<usize, TransportError>;

    /// Copy the next chunk of scripted response bytes into `buf`.
    ///
    /// Returns `0` once every response has been delivered.
    ///
    /// # Errors
    ///
    /// Fails if the connection is not open, the descriptor is foreign or
    /// `buf` has zero capacity.
    fn deliver(&mut self, descriptor: SocketDescriptor, buf: &mut [u8]) -> Result<usize, TransportError>;

    /// Accept bytes the engine writes to the peer.
    ///
    /// # Errors
    ///
    /// Fails if the connection was never opened or the descriptor is foreign.
    fn send(&mut self, descriptor: SocketDescriptor, data: &[u8]) -> Result<usize, TransportError>;

    /// Accept body output produced by the engine. Returns the bytes consumed.
    fn write_body(&mut self, data: &[u8]) -> usize;
}
