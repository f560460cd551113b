//! Bencode encoding and decoding ([BEP-3]).
//!
//! Bencode is the serialization format BitTorrent uses for `.torrent`
//! metainfo files.
//!
//! # Data Types
//!
//! | Type | Format | Example |
//! |------|--------|---------|
//! | Integer | `i<number>e` | `i42e` → 42 |
//! | Byte String | `<length>:<data>` | `4:spam` → "spam" |
//! | List | `l<items>e` | `l4:spami42ee` → ["spam", 42] |
//! | Dictionary | `d<key><value>...e` | `d3:foo3:bare` → {"foo": "bar"} |
//!
//! # Spans
//!
//! [`decode_spanned`] returns a [`Node`] tree in which every value carries
//! the [`Span`] of input bytes it was parsed from. Dictionary entries keep
//! their source order. This is what lets the info-hash be computed over
//! the original bytes of the info dictionary instead of a re-encoding.
//!
//! ```
//! use torrent_infohash::bencode::{decode_spanned, encode};
//!
//! // Keys out of order: re-encoding would change the bytes.
//! let data = b"d1:bi2e1:ai1ee";
//! let root = decode_spanned(data).unwrap();
//! assert_eq!(root.span.range(), 0..data.len());
//! assert_eq!(encode(&root.to_value()), b"d1:ai1e1:bi2ee");
//! ```
//!
//! # Error Handling
//!
//! Every [`DecodeError`] carries the byte offset where decoding stopped.
//! The decoder is strict by default (no leading zeros, no `-0`, no
//! duplicate keys) and bounds container nesting; see [`DecodeOptions`].
//!
//! [BEP-3]: http://bittorrent.org/beps/bep_0003.html

mod decode;
mod encode;
mod error;
mod span;
mod value;

pub use decode::{decode, decode_spanned, DecodeOptions, Decoder, DuplicateKeys, IntegerPolicy, KeyOrder};
pub use encode::{encode, encode_into};
pub use error::DecodeError;
pub use span::{Entry, Node, NodeKind, Span};
pub use value::{Dict, Value};
