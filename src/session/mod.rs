//! Per-run session state.
//!
//! A [`Session`] is created for each input, filled in by the dispatcher while
//! records are decoded, consulted by the mock transport while the engine
//! runs, and dropped once at the end of the run. Response and upload views
//! borrow from the input buffer, so a session never outlives its input.

mod mime;
mod slots;
mod tracker;
mod upload;

pub use mime::MimeBuilder;
pub use slots::{RESPONSE_SLOTS, ResponseSlots};
pub use tracker::OptionTracker;
pub use upload::UploadBuffer;

use crate::{coerce::NulTerminated, transport::SocketState};

/// List-valued options accumulated across records.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ListKind {
    /// Custom request headers.
    Headers,
    /// Mail recipients.
    MailRecipients,
    /// Connect-target overrides.
    ConnectTo,
}

/// Mutable state for one run.
#[derive(Debug, Default)]
pub struct Session<'a> {
    options: OptionTracker,
    responses: ResponseSlots<'a>,
    upload: UploadBuffer<'a>,
    postfields: Option<NulTerminated>,
    headers: Vec<NulTerminated>,
    mail_recipients: Vec<NulTerminated>,
    connect_to: Vec<NulTerminated>,
    mime: MimeBuilder<'a>,
    socket: SocketState,
}

impl<'a> Session<'a> {
    /// Create an empty session.
    #[must_use]
    pub fn new() -> Self { Self::default() }

    /// Singleton options applied so far.
    #[must_use]
    pub fn options(&self) -> &OptionTracker { &self.options }

    pub(crate) fn options_mut(&mut self) -> &mut OptionTracker { &mut self.options }

    /// Scripted response slots.
    #[must_use]
    pub fn responses(&self) -> &ResponseSlots<'a> { &self.responses }

    pub(crate) fn responses_mut(&mut self) -> &mut ResponseSlots<'a> { &mut self.responses }

    /// Upload payload cursor.
    #[must_use]
    pub fn upload(&self) -> &UploadBuffer<'a> { &self.upload }

    pub(crate) fn upload_mut(&mut self) -> &mut UploadBuffer<'a> { &mut self.upload }

    pub(crate) fn set_upload(&mut self, data: &'a [u8]) { self.upload = UploadBuffer::new(data); }

    /// Materialised post body, kept alive for the whole run.
    #[must_use]
    pub fn postfields(&self) -> Option<&NulTerminated> { self.postfields.as_ref() }

    pub(crate) fn set_postfields(&mut self, body: NulTerminated) -> &NulTerminated {
        self.postfields.insert(body)
    }

    /// Entries accumulated for `kind`, in arrival order.
    #[must_use]
    pub fn list(&self, kind: ListKind) -> &[NulTerminated] {
        match kind {
            ListKind::Headers => &self.headers,
            ListKind::MailRecipients => &self.mail_recipients,
            ListKind::ConnectTo => &self.connect_to,
        }
    }

    pub(crate) fn push_list(&mut self, kind: ListKind, entry: NulTerminated) {
        match kind {
            ListKind::Headers => self.headers.push(entry),
            ListKind::MailRecipients => self.mail_recipients.push(entry),
            ListKind::ConnectTo => self.connect_to.push(entry),
        }
    }

    /// Mime document builder.
    #[must_use]
    pub fn mime(&self) -> &MimeBuilder<'a> { &self.mime }

    pub(crate) fn mime_mut(&mut self) -> &mut MimeBuilder<'a> { &mut self.mime }

    /// State of the fabricated connection.
    #[must_use]
    pub fn socket(&self) -> SocketState { self.socket }

    pub(crate) fn set_socket(&mut self, state: SocketState) { self.socket = state; }
}
