//! Multi-part document assembly state.

use crate::engine::{MimeDocument, MimePart};

/// Progress of the multi-part document.
///
/// `Idle` until the first part record. The most recent part stays in
/// progress until the next part starts or the document is finished; a
/// finished document stays owned here until the session is dropped.
#[derive(Clone, Debug, Default)]
pub enum MimeBuilder<'a> {
    /// No part has been started.
    #[default]
    Idle,
    /// A part is in progress; earlier parts are already in `document`.
    Building {
        /// Completed parts.
        document: MimeDocument<'a>,
        /// Part receiving name and data records.
        part: MimePart<'a>,
    },
    /// Every part is complete.
    Finished(MimeDocument<'a>),
}

impl<'a> MimeBuilder<'a> {
    /// Finish the in-progress part, if any, and make `part` current.
    pub fn start_part(&mut self, part: MimePart<'a>) {
        *self = match std::mem::take(self) {
            Self::Idle => Self::Building {
                document: MimeDocument::new(),
                part,
            },
            Self::Building {
                mut document,
                part: finished,
            } => {
                document.add_part(finished);
                Self::Building { document, part }
            }
            Self::Finished(document) => Self::Building { document, part },
        };
    }

    /// Part currently in progress.
    pub fn part_mut(&mut self) -> Option<&mut MimePart<'a>> {
        match self {
            Self::Building { part, .. } => Some(part),
            Self::Idle | Self::Finished(_) => None,
        }
    }

    /// Returns `true` while a part is in progress.
    #[must_use]
    pub fn is_building(&self) -> bool { matches!(self, Self::Building { .. }) }

    /// Complete the in-progress part and return the whole document.
    ///
    /// Returns `None` if no part was ever started.
    pub fn finish(&mut self) -> Option<&MimeDocument<'a>> {
        *self = match std::mem::take(self) {
            Self::Building { mut document, part } => {
                document.add_part(part);
                Self::Finished(document)
            }
            other => other,
        };
        self.document()
    }

    /// The finished document.
    #[must_use]
    pub fn document(&self) -> Option<&MimeDocument<'a>> {
        match self {
            Self::Finished(document) => Some(document),
            Self::Idle | Self::Building { .. } => None,
        }
    }
}
