//! Engine option identifiers.

use std::fmt;

/// Options the harness can apply to an engine handle.
///
/// Discriminants follow the engine's own option-identifier space, so every
/// option has a distinct, stable identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u32)]
pub enum EngineOption {
    Verbose = 41,
    Header = 42,
    NoBody = 44,
    Upload = 46,
    FollowLocation = 52,
    HttpAuth = 107,
    ServerResponseTimeout = 112,
    TimeoutMs = 155,
    Url = 10_002,
    Range = 10_007,
    PostFields = 10_015,
    Cookie = 10_022,
    HttpHeader = 10_023,
    CustomRequest = 10_036,
    CookieJar = 10_082,
    AcceptEncoding = 10_102,
    Username = 10_173,
    Password = 10_174,
    MailFrom = 10_186,
    MailRcpt = 10_187,
    ConnectTo = 10_243,
    MimePost = 10_269,
    InFileSizeLarge = 30_115,
}

impl EngineOption {
    /// Numeric option identifier.
    #[must_use]
    pub const fn id(self) -> u32 { self as u32 }

    /// Upper-case option name as used in engine documentation.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Verbose => "VERBOSE",
            Self::Header => "HEADER",
            Self::NoBody => "NOBODY",
            Self::Upload => "UPLOAD",
            Self::FollowLocation => "FOLLOWLOCATION",
            Self::HttpAuth => "HTTPAUTH",
            Self::ServerResponseTimeout => "SERVER_RESPONSE_TIMEOUT",
            Self::TimeoutMs => "TIMEOUT_MS",
            Self::Url => "URL",
            Self::Range => "RANGE",
            Self::PostFields => "POSTFIELDS",
            Self::Cookie => "COOKIE",
            Self::HttpHeader => "HTTPHEADER",
            Self::CustomRequest => "CUSTOMREQUEST",
            Self::CookieJar => "COOKIEJAR",
            Self::AcceptEncoding => "ACCEPT_ENCODING",
            Self::Username => "USERNAME",
            Self::Password => "PASSWORD",
            Self::MailFrom => "MAIL_FROM",
            Self::MailRcpt => "MAIL_RCPT",
            Self::ConnectTo => "CONNECT_TO",
            Self::MimePost => "MIMEPOST",
            Self::InFileSizeLarge => "INFILESIZE_LARGE",
        }
    }
}

impl fmt::Display for EngineOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.name()) }
}
