use thiserror::Error;

/// Reasons a byte buffer is not a valid serialized bitmap.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("buffer ends before the bitmap does")]
    Truncated,

    #[error("missing bitmap magic bytes")]
    BadMagic,

    #[error("bitmap width is {found} bits, expected {expected}")]
    WidthMismatch { expected: u8, found: u8 },

    #[error("unsupported bitmap format version {0}")]
    UnsupportedVersion(u8),

    #[error("unknown container kind {0}")]
    InvalidContainerKind(u8),

    #[error("container key {0} is out of range for this width")]
    KeyOutOfRange(u64),

    #[error("container keys are not strictly ascending")]
    UnsortedKeys,

    #[error("container holds no values")]
    EmptyContainer,

    #[error("malformed container: {0}")]
    InvalidContainer(&'static str),

    #[error("{0} unexpected bytes after the last container")]
    TrailingBytes(usize),
}

impl From<std::io::Error> for FormatError {
    // reads only ever fail by running out of input
    fn from(_: std::io::Error) -> Self {
        FormatError::Truncated
    }
}
