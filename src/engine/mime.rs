//! Multi-part documents assembled from mime records.

use crate::coerce::NulTerminated;

/// One part of a multi-part document.
///
/// Part data borrows from the input buffer; names are materialised.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MimePart<'a> {
    name: Option<NulTerminated>,
    data: Option<&'a [u8]>,
}

impl<'a> MimePart<'a> {
    /// Create an empty part.
    #[must_use]
    pub fn new() -> Self { Self::default() }

    /// Set or replace the part name.
    pub fn set_name(&mut self, name: NulTerminated) { self.name = Some(name); }

    /// Set or replace the part data.
    pub fn set_data(&mut self, data: &'a [u8]) { self.data = Some(data); }

    /// Part name, if set.
    #[must_use]
    pub fn name(&self) -> Option<&NulTerminated> { self.name.as_ref() }

    /// Part data, if set.
    #[must_use]
    pub fn data(&self) -> Option<&'a [u8]> { self.data }
}

/// Ordered collection of mime parts attached to a transfer.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MimeDocument<'a> {
    parts: Vec<MimePart<'a>>,
}

impl<'a> MimeDocument<'a> {
    /// Create an empty document.
    #[must_use]
    pub fn new() -> Self { Self::default() }

    /// Append a finished part.
    pub fn add_part(&mut self, part: MimePart<'a>) { self.parts.push(part); }

    /// Parts in insertion order.
    #[must_use]
    pub fn parts(&self) -> &[MimePart<'a>] { &self.parts }

    /// Number of parts.
    #[must_use]
    pub fn len(&self) -> usize { self.parts.len() }

    /// Returns `true` if the document has no parts.
    #[must_use]
    pub fn is_empty(&self) -> bool { self.parts.is_empty() }
}
