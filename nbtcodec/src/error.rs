//! Contains the Error and Result type used by the decoder, encoder and
//! detector.

/// Error produced while reading or writing NBT.
///
/// Every failure is a value: nothing in this crate panics on bad input. Use
/// [`Error::kind`] to tell a format problem apart from a timeout or an I/O
/// failure.
#[derive(Debug, thiserror::Error)]
#[error("{msg}")]
pub struct Error {
    msg: String,
    kind: ErrorKind,
    #[source]
    source: Option<std::io::Error>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorKind {
    /// The bytes are not structurally valid NBT: an unknown type id, a
    /// negative length, a missing root compound, or string data that is not
    /// modified UTF-8.
    MalformedFormat,

    /// The input ended part way through a value.
    UnexpectedEof,

    /// The decode deadline passed before the document was complete. Everything
    /// read up to that point was well formed.
    ParseTimeout,

    /// The underlying reader or writer failed for a reason unrelated to the
    /// format.
    Io,
}

/// Convenience type for Result.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Get the kind of error.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn is_eof(&self) -> bool {
        self.kind == ErrorKind::UnexpectedEof
    }

    pub fn is_timeout(&self) -> bool {
        self.kind == ErrorKind::ParseTimeout
    }

    pub fn is_malformed(&self) -> bool {
        self.kind == ErrorKind::MalformedFormat
    }

    fn new(kind: ErrorKind, msg: impl Into<String>) -> Self {
        Self {
            msg: msg.into(),
            kind,
            source: None,
        }
    }

    pub(crate) fn malformed(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::MalformedFormat, msg)
    }

    pub(crate) fn invalid_tag(tag: u8) -> Self {
        Self::malformed(format!("invalid nbt tag value: {}", tag))
    }

    pub(crate) fn no_root_compound() -> Self {
        Self::malformed("invalid nbt: expected root compound")
    }

    pub(crate) fn negative_len(len: i32) -> Self {
        Self::malformed(format!("invalid nbt: negative length {}", len))
    }

    pub(crate) fn nonunicode_string(data: &[u8]) -> Self {
        Self::malformed(format!(
            "invalid nbt string: nonunicode: {}",
            String::from_utf8_lossy(data)
        ))
    }

    pub(crate) fn unexpected_eof() -> Self {
        Self::new(ErrorKind::UnexpectedEof, "eof: unexpectedly ran out of input")
    }

    pub(crate) fn timeout(elapsed: std::time::Duration) -> Self {
        Self::new(
            ErrorKind::ParseTimeout,
            format!("parse timed out after {}ms", elapsed.as_millis()),
        )
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        let kind = match e.kind() {
            std::io::ErrorKind::UnexpectedEof => ErrorKind::UnexpectedEof,
            _ => ErrorKind::Io,
        };

        Self {
            msg: format!("io error: {}", e),
            kind,
            source: Some(e),
        }
    }
}
