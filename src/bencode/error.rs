use thiserror::Error;

/// Errors produced while decoding bencode.
///
/// Every variant records the byte offset into the input at which the problem
/// was detected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("unexpected end of input at byte {offset}")]
    UnexpectedEnd { offset: usize },

    #[error("invalid string length prefix at byte {offset}")]
    InvalidLength { offset: usize },

    #[error("invalid integer at byte {offset}: {reason}")]
    InvalidInteger { offset: usize, reason: &'static str },

    #[error("container starting at byte {offset} is not terminated")]
    UnterminatedContainer { offset: usize },

    #[error("trailing data after value at byte {offset}")]
    TrailingData { offset: usize },

    #[error("nesting deeper than {limit} levels at byte {offset}")]
    DepthExceeded { offset: usize, limit: usize },

    #[error("dictionary key at byte {offset} is not a byte string")]
    NonStringKey { offset: usize },

    #[error("unexpected byte {byte:#04x} at byte {offset}")]
    InvalidFormat { offset: usize, byte: u8 },

    #[error("duplicate dictionary key at byte {offset}")]
    DuplicateKey { offset: usize },

    #[error("dictionary key at byte {offset} is out of order")]
    UnsortedKeys { offset: usize },
}

impl DecodeError {
    /// Byte offset into the decoded buffer where the error was detected.
    pub fn offset(&self) -> usize {
        match *self {
            DecodeError::UnexpectedEnd { offset }
            | DecodeError::InvalidLength { offset }
            | DecodeError::InvalidInteger { offset, .. }
            | DecodeError::UnterminatedContainer { offset }
            | DecodeError::TrailingData { offset }
            | DecodeError::DepthExceeded { offset, .. }
            | DecodeError::NonStringKey { offset }
            | DecodeError::InvalidFormat { offset, .. }
            | DecodeError::DuplicateKey { offset }
            | DecodeError::UnsortedKeys { offset } => offset,
        }
    }
}
