//! torrent-infohash - Bencode codec and BitTorrent info-hash computation
//!
//! # Modules
//!
//! - [`bencode`] - BEP-3 Bencode encoding/decoding with source spans
//! - [`metainfo`] - Info dictionary extraction, info-hash, torrent metadata
//! - [`constants`] - Decoder limits and well-known keys
//!
//! # Example
//!
//! ```
//! use torrent_infohash::compute_info_hash;
//!
//! // The info dictionary's keys are not sorted; the hash still covers the
//! // bytes exactly as written.
//! let data = b"d4:infod6:pieces0:4:name1:x6:lengthi0eee";
//! let hash = compute_info_hash(data).unwrap();
//! assert_eq!(hash.len(), 40);
//! ```

pub mod bencode;
pub mod constants;
pub mod metainfo;

pub use bencode::{
    decode, decode_spanned, encode, DecodeError, DecodeOptions, Decoder, Dict, Node, Span, Value,
};
pub use metainfo::{
    compute_info_hash, extract_info_span, sha1_hex, verify_info_hash, ExtractError, InfoHash,
    Metainfo, MetainfoError,
};
