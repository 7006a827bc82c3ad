// Error types shared by every decoder

use thiserror::Error;

/// Errors returned while reading tags.
///
/// Every variant is terminal: a decoder that returns an error never hands back
/// a partially built metadata value.
#[derive(Debug, Error)]
pub enum TagError {
    #[error("expected {expected:?}, found {found:?}")]
    MagicMismatch {
        expected: &'static str,
        found: String,
    },

    #[error("fmt chunk is {0} bytes long, only 52 is supported")]
    FmtChunkSize(u64),

    #[error("unsupported fmt version {0}, expected 1")]
    FmtVersion(u32),

    #[error("vorbis comment must contain '=': {0:?}")]
    MissingCommentSeparator(String),

    #[error("invalid picture type: {0}")]
    InvalidPictureType(u32),

    #[error("invalid base64 picture payload: {0}")]
    InvalidPicturePayload(#[from] base64::DecodeError),

    #[error("unsupported ID3v2 version 2.{0}")]
    UnsupportedId3Version(u8),

    #[error("ogg stream is neither vorbis nor opus")]
    UnknownOggStream,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Coarse classification of a [`TagError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Leading signature bytes differ from the expected literal.
    MagicMismatch,
    /// A fixed sub-structure carries an unsupported value.
    Structural,
    /// The underlying read or seek failed.
    Io,
}

impl TagError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            TagError::MagicMismatch { .. } => ErrorKind::MagicMismatch,
            TagError::Io(_) => ErrorKind::Io,
            TagError::FmtChunkSize(_)
            | TagError::FmtVersion(_)
            | TagError::MissingCommentSeparator(_)
            | TagError::InvalidPictureType(_)
            | TagError::InvalidPicturePayload(_)
            | TagError::UnsupportedId3Version(_)
            | TagError::UnknownOggStream => ErrorKind::Structural,
        }
    }

    pub(crate) fn magic(expected: &'static str, found: &[u8]) -> Self {
        TagError::MagicMismatch {
            expected,
            found: String::from_utf8_lossy(found).into_owned(),
        }
    }
}

pub type Result<T> = std::result::Result<T, TagError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_classification() {
        assert_eq!(TagError::magic("fLaC", b"RIFF").kind(), ErrorKind::MagicMismatch);
        assert_eq!(TagError::FmtChunkSize(48).kind(), ErrorKind::Structural);
        assert_eq!(TagError::InvalidPictureType(99).kind(), ErrorKind::Structural);
        let io = std::io::Error::from(std::io::ErrorKind::UnexpectedEof);
        assert_eq!(TagError::from(io).kind(), ErrorKind::Io);
    }

    #[test]
    fn test_magic_message_names_both_literals() {
        let err = TagError::magic("DSD ", b"fLaC");
        assert_eq!(err.to_string(), "expected \"DSD \", found \"fLaC\"");
    }
}
