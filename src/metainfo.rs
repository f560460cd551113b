//! Torrent metainfo and info-hash computation ([BEP-3]).
//!
//! A torrent is identified by its info-hash: the SHA-1 of the `info`
//! dictionary's bytes *as they appear in the file*. Decoding and
//! re-encoding the dictionary is not equivalent: a producer that wrote
//! keys out of order, or any other non-canonical form, would hash
//! differently after a round trip. Everything here therefore works from
//! the original span recorded by [`decode_spanned`](crate::bencode::decode_spanned).
//!
//! # Examples
//!
//! ## Computing an info-hash
//!
//! ```
//! use torrent_infohash::metainfo::{compute_info_hash, sha1_hex, verify_info_hash};
//!
//! let data = b"d8:announce3:url4:infod4:name1:x6:lengthi1eee";
//! let hash = compute_info_hash(data).unwrap();
//! assert_eq!(hash, sha1_hex(b"d4:name1:x6:lengthi1ee"));
//! assert!(verify_info_hash(data, &hash.to_uppercase()).unwrap());
//! ```
//!
//! ## Parsing a torrent file
//!
//! ```no_run
//! use torrent_infohash::metainfo::Metainfo;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let torrent = Metainfo::from_file("example.torrent")?;
//!
//! println!("Name: {}", torrent.info.name);
//! println!("Info hash: {}", torrent.info_hash);
//! println!("Number of pieces: {}", torrent.info.piece_count());
//!
//! for tracker in torrent.trackers() {
//!     println!("Tracker: {}", tracker);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! [BEP-3]: http://bittorrent.org/beps/bep_0003.html

mod error;
mod extract;
mod info_hash;
mod torrent;

pub use error::{ExtractError, MetainfoError};
pub use extract::{extract_info_span, extract_info_span_with, info_bytes};
pub use info_hash::{compute_info_hash, sha1_hex, verify_info_hash, InfoHash};
pub use torrent::{File, Info, Metainfo};

#[cfg(test)]
mod tests;
