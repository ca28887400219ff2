//! In-process engine that records configuration and exercises the transport.
//!
//! `DryRunEngine` stands in for a real transfer engine when inspecting a
//! corpus file or testing the harness. It stores every option it receives
//! and, on `perform`, walks the transport through a minimal request/response
//! exchange: open, negotiate socket options, send a request line (plus any
//! upload or post body) and drain every scripted response.

use std::{collections::BTreeMap, num::NonZeroUsize};

use tracing::{debug, trace};

use super::{
    EngineCode,
    EngineOption,
    MimeDocument,
    OptionValue,
    SocketDescriptor,
    SocketOptionOutcome,
    TransferEngine,
    Transport,
    TransportError,
};

/// Status reported when the transport refuses to open a connection.
pub const COULDNT_CONNECT: EngineCode = EngineCode::new(7).expect("non-zero status");
/// Status reported when upload bytes cannot be read.
pub const READ_ERROR: EngineCode = EngineCode::new(26).expect("non-zero status");
/// Status reported when sending to the peer fails.
pub const SEND_ERROR: EngineCode = EngineCode::new(55).expect("non-zero status");
/// Status reported when receiving from the peer fails.
pub const RECV_ERROR: EngineCode = EngineCode::new(56).expect("non-zero status");

const DEFAULT_CHUNK: usize = 64;

/// Owned copy of an applied option value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AppliedValue {
    /// String value without its trailing NUL.
    Text(Vec<u8>),
    /// Integer value.
    Long(i64),
    /// Size value.
    Size(u64),
    /// List of strings.
    List(Vec<Vec<u8>>),
    /// Mime parts as `(name, data)` pairs.
    Mime(Vec<(Option<Vec<u8>>, Option<Vec<u8>>)>),
}

impl AppliedValue {
    fn copy_of(value: OptionValue<'_>) -> Self {
        match value {
            OptionValue::Str(s) => Self::Text(s.to_bytes().to_vec()),
            OptionValue::Long(v) => Self::Long(v),
            OptionValue::Size(v) => Self::Size(v),
            OptionValue::List(items) => {
                Self::List(items.iter().map(|item| item.value().to_vec()).collect())
            }
            OptionValue::Mime(document) => Self::Mime(copy_parts(document)),
        }
    }

    /// Text value, if this is a string option.
    #[must_use]
    pub fn as_text(&self) -> Option<&[u8]> {
        match self {
            Self::Text(bytes) => Some(bytes),
            _ => None,
        }
    }

    /// Integer value, if this is an integer option.
    #[must_use]
    pub fn as_long(&self) -> Option<i64> {
        match self {
            Self::Long(v) => Some(*v),
            _ => None,
        }
    }
}

fn copy_parts(document: &MimeDocument<'_>) -> Vec<(Option<Vec<u8>>, Option<Vec<u8>>)> {
    document
        .parts()
        .iter()
        .map(|part| {
            (
                part.name().map(|name| name.value().to_vec()),
                part.data().map(<[u8]>::to_vec),
            )
        })
        .collect()
}

/// What the engine observed during `perform`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DryRunTranscript {
    /// Descriptor returned by the transport, if a connection was opened.
    pub descriptor: Option<SocketDescriptor>,
    /// Outcome of socket-option negotiation.
    pub socket_options: Option<SocketOptionOutcome>,
    /// Bytes sent to the peer, including the request line.
    pub sent: Vec<u8>,
    /// Upload payload pulled from the transport.
    pub upload: Vec<u8>,
    /// Response bytes received, in delivery order.
    pub response: Vec<u8>,
    /// Number of non-empty reads from the peer.
    pub reads: usize,
    /// Body bytes accepted by the transport's body sink.
    pub body_accepted: usize,
}

/// Recording engine used by the `replay` command and in tests.
///
/// # Examples
///
/// ```
/// use replayframe::{
///     engine::{DryRunEngine, EngineOption, OptionValue, TransferEngine},
/// };
///
/// let mut engine = DryRunEngine::new();
/// engine
///     .set_option(EngineOption::NoBody, OptionValue::Long(1))
///     .expect("accepted");
/// assert_eq!(
///     engine.option(EngineOption::NoBody).and_then(|v| v.as_long()),
///     Some(1)
/// );
/// ```
#[derive(Clone, Debug)]
pub struct DryRunEngine {
    options: BTreeMap<EngineOption, AppliedValue>,
    history: Vec<EngineOption>,
    read_chunk: NonZeroUsize,
    upload_chunk: NonZeroUsize,
    reject: Option<(EngineOption, EngineCode)>,
    finish_with: Option<EngineCode>,
    performed: bool,
    transcript: DryRunTranscript,
}

impl Default for DryRunEngine {
    fn default() -> Self { Self::new() }
}

impl DryRunEngine {
    /// Create an engine with 64-byte read and upload chunks.
    #[must_use]
    pub fn new() -> Self {
        let chunk = NonZeroUsize::new(DEFAULT_CHUNK).unwrap_or(NonZeroUsize::MIN);
        Self {
            options: BTreeMap::new(),
            history: Vec::new(),
            read_chunk: chunk,
            upload_chunk: chunk,
            reject: None,
            finish_with: None,
            performed: false,
            transcript: DryRunTranscript::default(),
        }
    }

    /// Read responses in chunks of at most `size` bytes.
    #[must_use]
    pub fn with_read_chunk(mut self, size: NonZeroUsize) -> Self {
        self.read_chunk = size;
        self
    }

    /// Pull upload data in chunks of at most `size` bytes.
    #[must_use]
    pub fn with_upload_chunk(mut self, size: NonZeroUsize) -> Self {
        self.upload_chunk = size;
        self
    }

    /// Reject `option` with `code` when it is applied.
    #[must_use]
    pub fn rejecting(mut self, option: EngineOption, code: EngineCode) -> Self {
        self.reject = Some((option, code));
        self
    }

    /// Report `code` from `perform` after the exchange completes.
    #[must_use]
    pub fn finishing_with(mut self, code: EngineCode) -> Self {
        self.finish_with = Some(code);
        self
    }

    /// Value last applied for `option`.
    #[must_use]
    pub fn option(&self, option: EngineOption) -> Option<&AppliedValue> { self.options.get(&option) }

    /// Options in the order they were applied.
    #[must_use]
    pub fn history(&self) -> &[EngineOption] { &self.history }

    /// Returns `true` once `perform` has been called.
    #[must_use]
    pub fn performed(&self) -> bool { self.performed }

    /// Observations from the last `perform`.
    #[must_use]
    pub fn transcript(&self) -> &DryRunTranscript { &self.transcript }

    fn request_line(&self) -> Vec<u8> {
        let verb = self
            .option(EngineOption::CustomRequest)
            .and_then(AppliedValue::as_text)
            .unwrap_or(b"GET");
        let target = self
            .option(EngineOption::Url)
            .and_then(AppliedValue::as_text)
            .unwrap_or_default();
        let mut line = Vec::with_capacity(verb.len() + target.len() + 3);
        line.extend_from_slice(verb);
        line.push(b' ');
        line.extend_from_slice(target);
        line.extend_from_slice(b"\r\n");
        if let Some(AppliedValue::List(headers)) = self.option(EngineOption::HttpHeader) {
            for header in headers {
                line.extend_from_slice(header);
                line.extend_from_slice(b"\r\n");
            }
        }
        line.extend_from_slice(b"\r\n");
        line
    }

    fn exchange(&mut self, transport: &mut dyn Transport) -> Result<(), EngineCode> {
        let descriptor = transport
            .open()
            .map_err(|err| transport_failure(err, COULDNT_CONNECT))?;
        self.transcript.descriptor = Some(descriptor);
        let outcome = transport
            .configure(descriptor)
            .map_err(|err| transport_failure(err, COULDNT_CONNECT))?;
        self.transcript.socket_options = Some(outcome);

        let request = self.request_line();
        self.send_all(transport, descriptor, &request)?;

        if let Some(AppliedValue::Text(body)) = self.options.get(&EngineOption::PostFields).cloned() {
            self.send_all(transport, descriptor, &body)?;
        }

        if self.options.contains_key(&EngineOption::Upload) {
            let mut chunk = vec![0_u8; self.upload_chunk.get()];
            loop {
                let n = transport
                    .supply_upload(&mut chunk)
                    .map_err(|err| transport_failure(err, READ_ERROR))?;
                if n == 0 {
                    break;
                }
                let (filled, _) = chunk.split_at(n);
                self.transcript.upload.extend_from_slice(filled);
                self.send_all(transport, descriptor, filled)?;
            }
        }

        let mut chunk = vec![0_u8; self.read_chunk.get()];
        loop {
            let n = transport
                .deliver(descriptor, &mut chunk)
                .map_err(|err| transport_failure(err, RECV_ERROR))?;
            if n == 0 {
                break;
            }
            let (filled, _) = chunk.split_at(n);
            trace!(bytes = n, "response chunk received");
            self.transcript.reads += 1;
            self.transcript.response.extend_from_slice(filled);
            self.transcript.body_accepted += transport.write_body(filled);
        }
        Ok(())
    }

    fn send_all(
        &mut self,
        transport: &mut dyn Transport,
        descriptor: SocketDescriptor,
        data: &[u8],
    ) -> Result<(), EngineCode> {
        let sent = transport
            .send(descriptor, data)
            .map_err(|err| transport_failure(err, SEND_ERROR))?;
        let (accepted, _) = data.split_at(sent.min(data.len()));
        self.transcript.sent.extend_from_slice(accepted);
        Ok(())
    }
}

fn transport_failure(err: TransportError, status: EngineCode) -> EngineCode {
    debug!(error = %err, status = status.get(), "transport callback failed");
    status
}

impl TransferEngine for DryRunEngine {
    fn set_option(&mut self, option: EngineOption, value: OptionValue<'_>) -> Result<(), EngineCode> {
        if let Some((_, code)) = self.reject.filter(|(rejected, _)| *rejected == option) {
            return Err(code);
        }
        self.options.insert(option, AppliedValue::copy_of(value));
        self.history.push(option);
        Ok(())
    }

    fn perform(&mut self, transport: &mut dyn Transport) -> Result<(), EngineCode> {
        self.performed = true;
        self.transcript = DryRunTranscript::default();
        if self.options.contains_key(&EngineOption::Url) {
            self.exchange(transport)?;
        } else {
            debug!("no target configured; nothing to transfer");
        }
        self.finish_with.map_or(Ok(()), Err)
    }
}
