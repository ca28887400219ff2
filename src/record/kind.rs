//! Record type codes understood by the dispatcher.

use std::fmt;

/// Record types, keyed by their on-wire code.
///
/// Codes without a known meaning are preserved as [`RecordType::Unknown`] so
/// newer streams remain readable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RecordType {
    Url,
    /// Scripted response for slot `n` (`0..=10`).
    Response(u8),
    Username,
    Password,
    PostFields,
    Header,
    Cookie,
    Upload,
    Range,
    CustomRequest,
    MailRecipient,
    MailFrom,
    MimePart,
    MimePartName,
    MimePartData,
    HttpAuth,
    OptHeader,
    NoBody,
    FollowLocation,
    AcceptEncoding,
    ConnectTo,
    Unknown(u16),
}

/// Wire codes of the response records, indexed by slot.
pub const RESPONSE_RECORD_TYPES: [u16; 11] = [2, 17, 18, 19, 20, 21, 22, 23, 24, 25, 26];

impl From<u16> for RecordType {
    fn from(code: u16) -> Self {
        match code {
            1 => Self::Url,
            2 => Self::Response(0),
            3 => Self::Username,
            4 => Self::Password,
            5 => Self::PostFields,
            6 => Self::Header,
            7 => Self::Cookie,
            8 => Self::Upload,
            9 => Self::Range,
            10 => Self::CustomRequest,
            11 => Self::MailRecipient,
            12 => Self::MailFrom,
            13 => Self::MimePart,
            14 => Self::MimePartName,
            15 => Self::MimePartData,
            16 => Self::HttpAuth,
            // RESPONSE1..RESPONSE10
            17..=26 => Self::Response(u8::try_from(code - 16).unwrap_or(u8::MAX)),
            27 => Self::OptHeader,
            28 => Self::NoBody,
            29 => Self::FollowLocation,
            30 => Self::AcceptEncoding,
            31 => Self::ConnectTo,
            other => Self::Unknown(other),
        }
    }
}

impl RecordType {
    /// On-wire code for this record type.
    ///
    /// Response slots outside `0..=10` have no code and map to `u16::MAX`.
    #[must_use]
    pub fn code(self) -> u16 {
        match self {
            Self::Url => 1,
            Self::Response(slot) => RESPONSE_RECORD_TYPES
                .get(usize::from(slot))
                .copied()
                .unwrap_or(u16::MAX),
            Self::Username => 3,
            Self::Password => 4,
            Self::PostFields => 5,
            Self::Header => 6,
            Self::Cookie => 7,
            Self::Upload => 8,
            Self::Range => 9,
            Self::CustomRequest => 10,
            Self::MailRecipient => 11,
            Self::MailFrom => 12,
            Self::MimePart => 13,
            Self::MimePartName => 14,
            Self::MimePartData => 15,
            Self::HttpAuth => 16,
            Self::OptHeader => 27,
            Self::NoBody => 28,
            Self::FollowLocation => 29,
            Self::AcceptEncoding => 30,
            Self::ConnectTo => 31,
            Self::Unknown(code) => code,
        }
    }

    /// Short lowercase label used in logs and the `decode` command.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Url => "url",
            Self::Response(_) => "response",
            Self::Username => "username",
            Self::Password => "password",
            Self::PostFields => "postfields",
            Self::Header => "header",
            Self::Cookie => "cookie",
            Self::Upload => "upload",
            Self::Range => "range",
            Self::CustomRequest => "customrequest",
            Self::MailRecipient => "mail_recipient",
            Self::MailFrom => "mail_from",
            Self::MimePart => "mime_part",
            Self::MimePartName => "mime_part_name",
            Self::MimePartData => "mime_part_data",
            Self::HttpAuth => "httpauth",
            Self::OptHeader => "optheader",
            Self::NoBody => "nobody",
            Self::FollowLocation => "followlocation",
            Self::AcceptEncoding => "acceptencoding",
            Self::ConnectTo => "connect_to",
            Self::Unknown(_) => "unknown",
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Response(slot) => write!(f, "response{slot}"),
            Self::Unknown(code) => write!(f, "unknown({code})"),
            other => f.write_str(other.label()),
        }
    }
}
