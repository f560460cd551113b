use super::error::MetainfoError;
use super::extract::info_bytes;
use crate::constants::{SHA1_HEX_LEN, SHA1_LEN};
use sha1::{Digest, Sha1};
use std::fmt;
use std::str::FromStr;

/// A BitTorrent v1 info-hash: the SHA-1 of the info dictionary's original bytes.
///
/// # Examples
///
/// ```
/// use torrent_infohash::metainfo::InfoHash;
///
/// let hash = InfoHash::from_hex("C12FE1C06BBA254A9DC9F519B335AA7C1367A88A").unwrap();
/// assert_eq!(hash.to_hex(), "c12fe1c06bba254a9dc9f519b335aa7c1367a88a");
/// assert_eq!(hash.as_bytes().len(), 20);
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InfoHash([u8; SHA1_LEN]);

impl InfoHash {
    pub fn new(bytes: [u8; SHA1_LEN]) -> Self {
        InfoHash(bytes)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, MetainfoError> {
        let arr: [u8; SHA1_LEN] = bytes
            .try_into()
            .map_err(|_| MetainfoError::InvalidInfoHash(hex::encode(bytes)))?;
        Ok(InfoHash(arr))
    }

    /// Parses a 40-character hex string, in either case.
    pub fn from_hex(s: &str) -> Result<Self, MetainfoError> {
        if s.len() != SHA1_HEX_LEN {
            return Err(MetainfoError::InvalidInfoHash(s.to_string()));
        }
        let mut arr = [0u8; SHA1_LEN];
        hex::decode_to_slice(s, &mut arr)
            .map_err(|_| MetainfoError::InvalidInfoHash(s.to_string()))?;
        Ok(InfoHash(arr))
    }

    /// Hashes the given info dictionary bytes.
    pub fn from_info_bytes(info: &[u8]) -> Self {
        InfoHash(Sha1::digest(info).into())
    }

    /// Computes the info-hash of a torrent file.
    pub fn from_torrent(data: &[u8]) -> Result<Self, MetainfoError> {
        Ok(Self::from_info_bytes(info_bytes(data)?))
    }

    /// The 20 raw digest bytes, as used on the wire and by DHT lookups.
    pub fn as_bytes(&self) -> &[u8; SHA1_LEN] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Debug for InfoHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "InfoHash({})", self.to_hex())
    }
}

impl fmt::Display for InfoHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl FromStr for InfoHash {
    type Err = MetainfoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl AsRef<[u8]> for InfoHash {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// SHA-1 of `data` as 40 lowercase hex characters.
///
/// # Examples
///
/// ```
/// use torrent_infohash::metainfo::sha1_hex;
///
/// assert_eq!(sha1_hex(b"abc"), "a9993e364706816aba3e25717850c26c9cd0d89d");
/// ```
pub fn sha1_hex(data: &[u8]) -> String {
    hex::encode(Sha1::digest(data))
}

/// Computes the info-hash of a torrent file as lowercase hex.
///
/// The digest covers the info dictionary's bytes exactly as they appear in
/// `data`; see [`extract_info_span`](super::extract_info_span).
pub fn compute_info_hash(data: &[u8]) -> Result<String, MetainfoError> {
    Ok(sha1_hex(info_bytes(data)?))
}

/// Checks a torrent file against an expected hex info-hash.
///
/// The comparison ignores case. Returns `Ok(false)` on a mismatch and an
/// error if the file cannot be hashed or `expected` is not a valid hash.
pub fn verify_info_hash(data: &[u8], expected: &str) -> Result<bool, MetainfoError> {
    let expected = InfoHash::from_hex(expected.trim())?;
    let actual = InfoHash::from_torrent(data)?;
    if actual != expected {
        tracing::debug!("info hash mismatch: computed {}, expected {}", actual, expected);
    }
    Ok(actual == expected)
}
