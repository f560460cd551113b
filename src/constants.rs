//! Codec limits and well-known keys.

// ============================================================================
// Decoder limits
// ============================================================================

/// Default container nesting limit for the decoder.
///
/// Real torrent files rarely nest deeper than four or five levels; the limit
/// bounds the memory adversarial input can make the decoder allocate.
pub const DEFAULT_MAX_DEPTH: usize = 1000;

// ============================================================================
// Metainfo
// ============================================================================

/// Top-level key whose value is hashed to produce the info-hash (BEP-3).
pub const INFO_KEY: &[u8] = b"info";

/// Length of a SHA-1 digest in bytes.
pub const SHA1_LEN: usize = 20;

/// Length of a SHA-1 digest rendered as hex.
pub const SHA1_HEX_LEN: usize = SHA1_LEN * 2;
