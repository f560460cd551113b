use thiserror::Error;

use crate::bencode::DecodeError;

/// Errors that can occur when extracting the info dictionary or parsing a
/// torrent file.
#[derive(Debug, Error)]
pub enum MetainfoError {
    /// The torrent file contains invalid bencode.
    #[error("bencode error: {0}")]
    Decode(#[from] DecodeError),

    /// The top-level value is not a dictionary.
    #[error("torrent root is not a dictionary")]
    RootNotADictionary,

    /// The top-level dictionary has no `info` key. The offset is the
    /// dictionary's closing `e`.
    #[error("missing info dictionary (top-level dictionary ends at byte {offset})")]
    MissingInfoKey { offset: usize },

    /// The `info` key exists but its value is not a dictionary.
    #[error("info value at byte {offset} is not a dictionary")]
    NotADictionary { offset: usize },

    /// A required field is missing. The offset is the start of the
    /// dictionary that should hold it.
    #[error("missing field {field} in dictionary at byte {offset}")]
    MissingField { field: &'static str, offset: usize },

    /// A field has an invalid value or type. The offset is the start of the
    /// offending value.
    #[error("invalid field {field} at byte {offset}")]
    InvalidField { field: &'static str, offset: usize },

    /// An info hash string is not 40 hex characters.
    #[error("invalid info hash: {0:?}")]
    InvalidInfoHash(String),

    /// An I/O error occurred while reading the torrent file.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors from [`extract_info_span`](super::extract_info_span) and friends.
pub type ExtractError = MetainfoError;

impl MetainfoError {
    /// Byte offset into the torrent file, for errors tied to a position.
    ///
    /// Only a malformed expected hash and I/O failures have none.
    pub fn offset(&self) -> Option<usize> {
        match self {
            MetainfoError::Decode(e) => Some(e.offset()),
            MetainfoError::RootNotADictionary => Some(0),
            MetainfoError::MissingInfoKey { offset }
            | MetainfoError::NotADictionary { offset }
            | MetainfoError::MissingField { offset, .. }
            | MetainfoError::InvalidField { offset, .. } => Some(*offset),
            MetainfoError::InvalidInfoHash(_) | MetainfoError::Io(_) => None,
        }
    }
}
