use super::error::DecodeError;
use super::span::{Entry, Node, NodeKind, Span};
use super::value::Value;
use crate::constants::DEFAULT_MAX_DEPTH;
use bytes::Bytes;
use std::collections::HashMap;

/// What to do when a dictionary repeats a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DuplicateKeys {
    /// Fail with [`DecodeError::DuplicateKey`].
    #[default]
    Reject,
    /// Keep the first value, ignore later ones.
    FirstWins,
    /// Keep the last value, at the position of the first occurrence.
    LastWins,
}

/// How integers and string length prefixes are validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IntegerPolicy {
    /// BEP-3 rules: no leading zeros, no `-0`.
    #[default]
    Strict,
    /// Accept leading zeros and `-0`, normalizing the value.
    ///
    /// Values decoded this way re-encode to different bytes than the input.
    Lenient,
}

/// Whether dictionary keys must appear in sorted order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeyOrder {
    /// Accept keys in any order.
    #[default]
    Any,
    /// Require strictly ascending byte-lexicographic keys.
    Sorted,
}

/// Decoder configuration.
///
/// The defaults follow BEP-3 and reject input that is ambiguous (duplicate
/// keys) or non-conforming (leading zeros). [`DecodeOptions::tolerant`]
/// relaxes both for reading torrents as found in the wild.
///
/// # Examples
///
/// ```
/// use torrent_infohash::bencode::{DecodeOptions, Decoder, IntegerPolicy};
///
/// let decoder = Decoder::new(DecodeOptions::default().with_integers(IntegerPolicy::Lenient));
/// assert_eq!(decoder.decode(b"i007e").unwrap().as_integer(), Some(7));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Maximum container nesting. A top-level list or dictionary is level 1.
    pub max_depth: usize,
    pub duplicate_keys: DuplicateKeys,
    pub integers: IntegerPolicy,
    pub key_order: KeyOrder,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            duplicate_keys: DuplicateKeys::default(),
            integers: IntegerPolicy::default(),
            key_order: KeyOrder::default(),
        }
    }
}

impl DecodeOptions {
    /// Options that accept only canonical bencode.
    pub fn canonical() -> Self {
        Self {
            key_order: KeyOrder::Sorted,
            ..Self::default()
        }
    }

    /// Options that accept the deviations real torrent producers emit:
    /// leading zeros, `-0`, and repeated keys (the last occurrence wins).
    ///
    /// Info-hash extraction and [`Metainfo`](crate::metainfo::Metainfo)
    /// parsing use these by default, since the hash covers the original
    /// bytes and does not depend on how they normalize.
    ///
    /// # Examples
    ///
    /// ```
    /// use torrent_infohash::bencode::{DecodeOptions, Decoder};
    ///
    /// let decoder = Decoder::new(DecodeOptions::tolerant());
    /// let value = decoder.decode(b"d1:ai1e1:ai02ee").unwrap();
    /// assert_eq!(value.get(b"a").and_then(|v| v.as_integer()), Some(2));
    /// ```
    pub fn tolerant() -> Self {
        Self {
            duplicate_keys: DuplicateKeys::LastWins,
            integers: IntegerPolicy::Lenient,
            ..Self::default()
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_duplicate_keys(mut self, policy: DuplicateKeys) -> Self {
        self.duplicate_keys = policy;
        self
    }

    pub fn with_integers(mut self, policy: IntegerPolicy) -> Self {
        self.integers = policy;
        self
    }

    pub fn with_key_order(mut self, order: KeyOrder) -> Self {
        self.key_order = order;
        self
    }
}

/// A bencode decoder.
///
/// Containers are tracked on an explicit stack rather than the call stack,
/// so nesting up to [`DecodeOptions::max_depth`] never grows the thread's
/// stack. The decoder holds only its options; each call owns its own state,
/// so one decoder can be shared freely between threads.
#[derive(Debug, Clone, Copy, Default)]
pub struct Decoder {
    options: DecodeOptions,
}

/// A container that has been opened but not yet closed.
enum Frame {
    List {
        start: usize,
        items: Vec<Node>,
    },
    Dict {
        start: usize,
        entries: Vec<Entry>,
        index: HashMap<Bytes, usize>,
        last_key: Option<Bytes>,
        pending: Option<PendingKey>,
    },
}

/// A dictionary key whose value has not been decoded yet.
struct PendingKey {
    key: Bytes,
    span: Span,
    // Index of an earlier entry with the same key.
    existing: Option<usize>,
}

impl Frame {
    fn start(&self) -> usize {
        match self {
            Frame::List { start, .. } | Frame::Dict { start, .. } => *start,
        }
    }

    fn awaiting_value(&self) -> bool {
        matches!(self, Frame::Dict { pending: Some(_), .. })
    }

    fn close(self, end: usize) -> Node {
        match self {
            Frame::List { start, items } => Node {
                span: Span::new(start, end),
                kind: NodeKind::List(items),
            },
            Frame::Dict { start, entries, .. } => Node {
                span: Span::new(start, end),
                kind: NodeKind::Dict(entries),
            },
        }
    }
}

impl Decoder {
    pub fn new(options: DecodeOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &DecodeOptions {
        &self.options
    }

    /// Decodes a complete buffer into a [`Value`].
    pub fn decode(&self, data: &[u8]) -> Result<Value, DecodeError> {
        self.decode_spanned(data).map(Node::into_value)
    }

    /// Decodes a complete buffer, keeping the span of every value.
    ///
    /// # Errors
    ///
    /// Fails if the input is malformed or if any bytes follow the top-level value.
    pub fn decode_spanned(&self, data: &[u8]) -> Result<Node, DecodeError> {
        let result = self.decode_at(data, 0).and_then(|(node, next)| {
            if next != data.len() {
                return Err(DecodeError::TrailingData { offset: next });
            }
            Ok(node)
        });

        match &result {
            Ok(node) => tracing::trace!("decoded {} bytes of bencode", node.span.len()),
            Err(e) => tracing::debug!("bencode decode failed: {}", e),
        }
        result
    }

    /// Decodes a single value starting at `offset`.
    ///
    /// Returns the node and the offset of the first byte after it. Bytes
    /// after the value are left alone, which makes this usable for reading
    /// a value embedded in a larger buffer.
    ///
    /// Input that ends inside a list or dictionary, including right after a
    /// dictionary key, fails with [`DecodeError::UnterminatedContainer`] at
    /// the container's first byte. A key followed directly by `e` has no
    /// value and fails with [`DecodeError::InvalidFormat`] at the `e`.
    pub fn decode_at(&self, data: &[u8], offset: usize) -> Result<(Node, usize), DecodeError> {
        let mut pos = offset;
        let mut stack: Vec<Frame> = Vec::new();

        loop {
            if let Some(frame) = stack.last_mut() {
                let Some(&byte) = data.get(pos) else {
                    return Err(DecodeError::UnterminatedContainer {
                        offset: frame.start(),
                    });
                };

                if byte == b'e' && !frame.awaiting_value() {
                    pos += 1;
                    if let Some(closed) = stack.pop() {
                        if let Some(root) = self.attach(&mut stack, closed.close(pos)) {
                            return Ok((root, pos));
                        }
                    }
                    continue;
                }

                if let Frame::Dict {
                    index,
                    last_key,
                    pending,
                    ..
                } = frame
                {
                    if pending.is_none() {
                        *pending = Some(self.decode_key(data, &mut pos, index, last_key)?);
                        continue;
                    }
                }
            }

            let start = pos;
            let lead = *data
                .get(start)
                .ok_or(DecodeError::UnexpectedEnd { offset: start })?;

            let kind = match lead {
                b'i' => NodeKind::Integer(self.decode_integer(data, &mut pos)?),
                b'0'..=b'9' => NodeKind::Bytes(self.decode_bytes(data, &mut pos)?),
                b'l' | b'd' => {
                    self.check_depth(start, stack.len())?;
                    stack.push(if lead == b'l' {
                        Frame::List {
                            start,
                            items: Vec::new(),
                        }
                    } else {
                        Frame::Dict {
                            start,
                            entries: Vec::new(),
                            index: HashMap::new(),
                            last_key: None,
                            pending: None,
                        }
                    });
                    pos += 1;
                    continue;
                }
                byte => return Err(DecodeError::InvalidFormat { offset: start, byte }),
            };

            let node = Node {
                span: Span::new(start, pos),
                kind,
            };
            if let Some(root) = self.attach(&mut stack, node) {
                return Ok((root, pos));
            }
        }
    }

    /// Hands a finished node to the innermost open container.
    ///
    /// Returns the node back when no container is open, i.e. it is the root.
    fn attach(&self, stack: &mut [Frame], node: Node) -> Option<Node> {
        match stack.last_mut() {
            None => Some(node),
            Some(Frame::List { items, .. }) => {
                items.push(node);
                None
            }
            Some(Frame::Dict {
                entries,
                index,
                pending,
                ..
            }) => {
                let Some(PendingKey {
                    key,
                    span: key_span,
                    existing,
                }) = pending.take()
                else {
                    return None;
                };

                match existing {
                    None => {
                        index.insert(key.clone(), entries.len());
                        entries.push(Entry {
                            key,
                            key_span,
                            value: node,
                        });
                    }
                    Some(i) => {
                        if self.options.duplicate_keys == DuplicateKeys::LastWins {
                            tracing::trace!(
                                "duplicate key at byte {} replaces earlier value",
                                key_span.start
                            );
                            entries[i].key_span = key_span;
                            entries[i].value = node;
                        }
                    }
                }
                None
            }
        }
    }

    // `depth` counts the containers enclosing the one starting at `offset`.
    fn check_depth(&self, offset: usize, depth: usize) -> Result<(), DecodeError> {
        if depth >= self.options.max_depth {
            return Err(DecodeError::DepthExceeded {
                offset,
                limit: self.options.max_depth,
            });
        }
        Ok(())
    }

    fn decode_key(
        &self,
        data: &[u8],
        pos: &mut usize,
        index: &HashMap<Bytes, usize>,
        last_key: &mut Option<Bytes>,
    ) -> Result<PendingKey, DecodeError> {
        let key_start = *pos;
        if !data.get(key_start).is_some_and(u8::is_ascii_digit) {
            return Err(DecodeError::NonStringKey { offset: key_start });
        }

        let key = self.decode_bytes(data, pos)?;
        let span = Span::new(key_start, *pos);

        if self.options.key_order == KeyOrder::Sorted
            && last_key.as_ref().is_some_and(|prev| *prev >= key)
        {
            return Err(DecodeError::UnsortedKeys { offset: key_start });
        }

        let existing = index.get(&key).copied();
        if existing.is_some() && self.options.duplicate_keys == DuplicateKeys::Reject {
            return Err(DecodeError::DuplicateKey { offset: key_start });
        }

        *last_key = Some(key.clone());
        Ok(PendingKey {
            key,
            span,
            existing,
        })
    }

    fn decode_integer(&self, data: &[u8], pos: &mut usize) -> Result<i64, DecodeError> {
        let number_start = *pos + 1;
        let negative = data.get(number_start) == Some(&b'-');
        let digits_start = if negative { number_start + 1 } else { number_start };

        let digits_end = scan_digits(data, digits_start);
        match data.get(digits_end) {
            None => return Err(DecodeError::UnexpectedEnd { offset: digits_end }),
            Some(b'e') => {}
            Some(_) => {
                return Err(DecodeError::InvalidInteger {
                    offset: digits_end,
                    reason: "unexpected character",
                })
            }
        }

        let digits = &data[digits_start..digits_end];
        if digits.is_empty() {
            return Err(DecodeError::InvalidInteger {
                offset: digits_start,
                reason: "missing digits",
            });
        }

        if self.options.integers == IntegerPolicy::Strict {
            if negative && digits == b"0" {
                return Err(DecodeError::InvalidInteger {
                    offset: number_start,
                    reason: "negative zero",
                });
            }
            if digits.len() > 1 && digits[0] == b'0' {
                return Err(DecodeError::InvalidInteger {
                    offset: digits_start,
                    reason: "leading zero",
                });
            }
        }

        let value = std::str::from_utf8(&data[number_start..digits_end])
            .ok()
            .and_then(|s| s.parse::<i64>().ok())
            .ok_or(DecodeError::InvalidInteger {
                offset: number_start,
                reason: "out of range",
            })?;

        *pos = digits_end + 1;
        Ok(value)
    }

    fn decode_bytes(&self, data: &[u8], pos: &mut usize) -> Result<Bytes, DecodeError> {
        let start = *pos;
        let colon = scan_digits(data, start);
        match data.get(colon) {
            None => return Err(DecodeError::UnexpectedEnd { offset: colon }),
            Some(b':') => {}
            Some(_) => return Err(DecodeError::InvalidLength { offset: colon }),
        }

        let digits = &data[start..colon];
        if digits.is_empty()
            || (self.options.integers == IntegerPolicy::Strict
                && digits.len() > 1
                && digits[0] == b'0')
        {
            return Err(DecodeError::InvalidLength { offset: start });
        }

        let len: usize = std::str::from_utf8(digits)
            .ok()
            .and_then(|s| s.parse().ok())
            .ok_or(DecodeError::InvalidLength { offset: start })?;

        let body = colon + 1;
        let end = body
            .checked_add(len)
            .filter(|&end| end <= data.len())
            .ok_or(DecodeError::UnexpectedEnd { offset: data.len() })?;

        *pos = end;
        Ok(Bytes::copy_from_slice(&data[body..end]))
    }
}

fn scan_digits(data: &[u8], from: usize) -> usize {
    let mut i = from;
    while data.get(i).is_some_and(u8::is_ascii_digit) {
        i += 1;
    }
    i
}

/// Decodes a complete buffer with the default options.
///
/// # Examples
///
/// ```
/// use torrent_infohash::bencode::{decode, Value};
///
/// assert_eq!(decode(b"i-42e").unwrap(), Value::Integer(-42));
/// assert!(decode(b"i04e").is_err());
/// ```
pub fn decode(data: &[u8]) -> Result<Value, DecodeError> {
    Decoder::default().decode(data)
}

/// Decodes a complete buffer with the default options, keeping spans.
///
/// # Examples
///
/// ```
/// use torrent_infohash::bencode::decode_spanned;
///
/// let data = b"d4:infod4:name1:xee";
/// let root = decode_spanned(data).unwrap();
/// let info = root.get(b"info").unwrap();
/// assert_eq!(info.raw(data), Some(b"d4:name1:xe".as_slice()));
/// ```
pub fn decode_spanned(data: &[u8]) -> Result<Node, DecodeError> {
    Decoder::default().decode_spanned(data)
}
