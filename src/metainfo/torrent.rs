use super::error::MetainfoError;
use super::extract::info_span;
use super::info_hash::InfoHash;
use crate::bencode::{DecodeOptions, Decoder, Node, Span};
use crate::constants::INFO_KEY;
use bytes::Bytes;
use std::path::{Path, PathBuf};

/// A parsed torrent file.
///
/// The info-hash is computed over the original bytes of the info
/// dictionary, so it matches what other clients report even when the file
/// was produced with unsorted keys.
///
/// # Examples
///
/// ```no_run
/// use torrent_infohash::metainfo::Metainfo;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let metainfo = Metainfo::from_file("example.torrent")?;
///
/// println!("Torrent: {}", metainfo.info.name);
/// println!("Size: {} bytes", metainfo.info.total_length);
/// println!("Info hash: {}", metainfo.info_hash);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Metainfo {
    /// The info dictionary containing file and piece information.
    pub info: Info,
    /// SHA-1 of the info dictionary's original bytes.
    pub info_hash: InfoHash,
    /// Primary tracker URL.
    pub announce: Option<String>,
    /// Multi-tier tracker list ([BEP-12](http://bittorrent.org/beps/bep_0012.html)).
    pub announce_list: Vec<Vec<String>>,
    /// Unix timestamp when the torrent was created.
    pub creation_date: Option<i64>,
    /// Optional comment about the torrent.
    pub comment: Option<String>,
    /// Name/version of the program that created the torrent.
    pub created_by: Option<String>,
    /// Where the info dictionary sits in the source file.
    pub info_span: Span,
    raw_info: Bytes,
}

/// The info dictionary from a torrent file.
#[derive(Debug, Clone)]
pub struct Info {
    /// Suggested name for the file or directory.
    pub name: String,
    /// Number of bytes per piece.
    pub piece_length: u64,
    /// SHA1 hash of each piece (20 bytes each).
    pub pieces: Vec<[u8; 20]>,
    /// List of files in the torrent.
    pub files: Vec<File>,
    /// Total size of all files combined.
    pub total_length: u64,
    /// If true, clients should only use trackers in the metainfo (no DHT/PEX).
    pub private: bool,
}

/// A file within a torrent.
///
/// For single-file torrents, there is one file with the torrent name.
/// For multi-file torrents, paths start with the torrent name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct File {
    pub path: PathBuf,
    pub length: u64,
    /// Byte offset within the torrent's piece data.
    pub offset: u64,
}

impl Metainfo {
    /// Parses a torrent file from raw bytes.
    ///
    /// Decodes with [`DecodeOptions::tolerant`], like
    /// [`extract_info_span`](super::extract_info_span).
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The data is not valid bencode
    /// - Required fields are missing (info, name, pieces, etc.)
    /// - The pieces field length is not a multiple of 20
    /// - A file path component is not a plain UTF-8 file name
    pub fn from_bytes(data: &[u8]) -> Result<Self, MetainfoError> {
        let root = Decoder::new(DecodeOptions::tolerant()).decode_spanned(data)?;
        let info_span = info_span(&root)?;
        let raw_info = Bytes::copy_from_slice(&data[info_span.range()]);
        let info_hash = InfoHash::from_info_bytes(&raw_info);

        let info_node = root
            .get(INFO_KEY)
            .ok_or(MetainfoError::MissingInfoKey {
                offset: root.span.end.saturating_sub(1),
            })?;
        let info = parse_info(info_node)?;

        let announce = get_string(&root, b"announce");

        let announce_list = root
            .get(b"announce-list")
            .and_then(|v| v.as_list())
            .map(|list| {
                list.iter()
                    .filter_map(|tier| {
                        tier.as_list().map(|urls| {
                            urls.iter()
                                .filter_map(|u| u.as_str().map(String::from))
                                .collect()
                        })
                    })
                    .collect()
            })
            .unwrap_or_default();

        let creation_date = root.get(b"creation date").and_then(|v| v.as_integer());

        tracing::debug!("parsed torrent {:?} with info hash {}", info.name, info_hash);

        Ok(Self {
            info,
            info_hash,
            announce,
            announce_list,
            creation_date,
            comment: get_string(&root, b"comment"),
            created_by: get_string(&root, b"created by"),
            info_span,
            raw_info,
        })
    }

    /// Reads and parses a torrent file from disk.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, MetainfoError> {
        let data = std::fs::read(path)?;
        Self::from_bytes(&data)
    }

    /// Returns the info dictionary exactly as it appeared in the file.
    pub fn raw_info(&self) -> &Bytes {
        &self.raw_info
    }

    /// Returns all tracker URLs from both `announce` and `announce-list`.
    ///
    /// The primary tracker (from `announce`) comes first, followed by
    /// trackers from `announce-list`. Duplicates are removed.
    pub fn trackers(&self) -> Vec<String> {
        let mut trackers = Vec::new();

        if let Some(ref announce) = self.announce {
            trackers.push(announce.clone());
        }

        for tier in &self.announce_list {
            for tracker in tier {
                if !trackers.contains(tracker) {
                    trackers.push(tracker.clone());
                }
            }
        }

        trackers
    }
}

impl Info {
    pub fn piece_count(&self) -> usize {
        self.pieces.len()
    }
}

fn get_string(dict: &Node, key: &[u8]) -> Option<String> {
    dict.get(key).and_then(|v| v.as_str()).map(String::from)
}

fn missing(field: &'static str, dict: &Node) -> MetainfoError {
    MetainfoError::MissingField {
        field,
        offset: dict.span.start,
    }
}

fn invalid(field: &'static str, value: &Node) -> MetainfoError {
    MetainfoError::InvalidField {
        field,
        offset: value.span.start,
    }
}

fn get_length(dict: &Node, key: &'static str) -> Result<Option<u64>, MetainfoError> {
    dict.get(key.as_bytes())
        .map(|v| {
            v.as_integer()
                .and_then(|i| u64::try_from(i).ok())
                .ok_or_else(|| invalid(key, v))
        })
        .transpose()
}

/// Checks that a name taken from the torrent is a single, relative path
/// component, so joining it can never leave the download directory.
fn path_component<'a>(field: &'static str, value: &'a Node) -> Result<&'a str, MetainfoError> {
    let component = value.as_str().ok_or_else(|| invalid(field, value))?;
    let is_plain = !component.is_empty()
        && component != "."
        && component != ".."
        && !component.contains(['/', '\\', '\0'])
        && !matches!(component.as_bytes(), [drive, b':', ..] if drive.is_ascii_alphabetic());
    if !is_plain {
        return Err(invalid(field, value));
    }
    Ok(component)
}

fn parse_info(node: &Node) -> Result<Info, MetainfoError> {
    if !node.is_dict() {
        return Err(invalid("info", node));
    }

    let name = path_component("name", node.get(b"name").ok_or_else(|| missing("name", node))?)?
        .to_string();

    let piece_length =
        get_length(node, "piece length")?.ok_or_else(|| missing("piece length", node))?;

    let pieces_node = node.get(b"pieces").ok_or_else(|| missing("pieces", node))?;
    let pieces_bytes = pieces_node
        .as_bytes()
        .ok_or_else(|| invalid("pieces", pieces_node))?;

    if pieces_bytes.len() % 20 != 0 {
        return Err(invalid("pieces", pieces_node));
    }

    let pieces: Vec<[u8; 20]> = pieces_bytes
        .chunks_exact(20)
        .map(|chunk| {
            let mut arr = [0u8; 20];
            arr.copy_from_slice(chunk);
            arr
        })
        .collect();

    let private = node
        .get(b"private")
        .and_then(|v| v.as_integer())
        .map(|v| v == 1)
        .unwrap_or(false);

    let (files, total_length) = if let Some(length) = get_length(node, "length")? {
        let file = File {
            path: PathBuf::from(&name),
            length,
            offset: 0,
        };
        (vec![file], length)
    } else if let Some(files_node) = node.get(b"files") {
        let files_list = files_node
            .as_list()
            .ok_or_else(|| invalid("files", files_node))?;
        let mut files = Vec::with_capacity(files_list.len());
        let mut offset = 0u64;

        for file_node in files_list {
            if !file_node.is_dict() {
                return Err(invalid("files", file_node));
            }

            let length =
                get_length(file_node, "length")?.ok_or_else(|| missing("file length", file_node))?;

            let path_node = file_node
                .get(b"path")
                .ok_or_else(|| missing("file path", file_node))?;
            let components = path_node
                .as_list()
                .filter(|p| !p.is_empty())
                .ok_or_else(|| invalid("file path", path_node))?;

            let mut path = PathBuf::from(&name);
            for component in components {
                path.push(path_component("file path", component)?);
            }

            files.push(File {
                path,
                length,
                offset,
            });

            offset = offset
                .checked_add(length)
                .ok_or_else(|| invalid("file length", file_node))?;
        }

        (files, offset)
    } else {
        return Err(missing("length or files", node));
    };

    Ok(Info {
        name,
        piece_length,
        pieces,
        files,
        total_length,
        private,
    })
}
