use super::value::{Dict, Value};
use bytes::Bytes;
use std::fmt;
use std::ops::Range;

/// A half-open byte range `[start, end)` into a decoded buffer.
///
/// Spans only make sense against the buffer they were produced from.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end);
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    /// Returns the bytes this span covers, or `None` if it does not fit in `buf`.
    pub fn slice<'a>(&self, buf: &'a [u8]) -> Option<&'a [u8]> {
        buf.get(self.range())
    }
}

impl fmt::Debug for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

impl From<Span> for Range<usize> {
    fn from(span: Span) -> Self {
        span.range()
    }
}

/// A decoded value together with the span it was parsed from.
///
/// Produced by [`decode_spanned`](super::decode_spanned). Containers carry
/// their children as nodes, so every value in the tree has a span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub span: Span,
    pub kind: NodeKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Integer(i64),
    Bytes(Bytes),
    List(Vec<Node>),
    /// Entries in the order they appear in the source.
    Dict(Vec<Entry>),
}

/// A dictionary entry in a spanned tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub key: Bytes,
    pub key_span: Span,
    pub value: Node,
}

impl Node {
    pub fn is_dict(&self) -> bool {
        matches!(self.kind, NodeKind::Dict(_))
    }

    pub fn entries(&self) -> Option<&[Entry]> {
        match &self.kind {
            NodeKind::Dict(entries) => Some(entries),
            _ => None,
        }
    }

    /// Looks up the value node for `key` if this node is a dictionary.
    pub fn get(&self, key: &[u8]) -> Option<&Node> {
        self.entries()?
            .iter()
            .find(|e| e.key.as_ref() == key)
            .map(|e| &e.value)
    }

    /// The exact source bytes of this node.
    pub fn raw<'a>(&self, source: &'a [u8]) -> Option<&'a [u8]> {
        self.span.slice(source)
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self.kind {
            NodeKind::Integer(i) => Some(i),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&Bytes> {
        match &self.kind {
            NodeKind::Bytes(b) => Some(b),
            _ => None,
        }
    }

    /// Returns the byte string as UTF-8, if it is one and decodes cleanly.
    pub fn as_str(&self) -> Option<&str> {
        self.as_bytes().and_then(|b| std::str::from_utf8(b).ok())
    }

    pub fn as_list(&self) -> Option<&[Node]> {
        match &self.kind {
            NodeKind::List(items) => Some(items.as_slice()),
            _ => None,
        }
    }

    /// Builds the logical value, dropping spans.
    pub fn to_value(&self) -> Value {
        self.clone().into_value()
    }

    /// Converts the tree into a [`Value`], dropping spans.
    ///
    /// Works on an explicit stack, so trees as deep as the decoder allows
    /// convert without recursion.
    pub fn into_value(self) -> Value {
        let mut stack: Vec<Partial> = Vec::new();
        let mut node = self;

        loop {
            let mut finished = match node.kind {
                NodeKind::Integer(i) => Some(Value::Integer(i)),
                NodeKind::Bytes(b) => Some(Value::Bytes(b)),
                NodeKind::List(items) => {
                    stack.push(Partial::List {
                        done: Vec::with_capacity(items.len()),
                        rest: items.into_iter(),
                    });
                    None
                }
                NodeKind::Dict(entries) => {
                    stack.push(Partial::Dict {
                        done: Vec::with_capacity(entries.len()),
                        rest: entries.into_iter(),
                        key: None,
                    });
                    None
                }
            };

            // Climb until some open container still has a child to convert.
            loop {
                if let Some(value) = finished.take() {
                    match stack.last_mut() {
                        Some(parent) => parent.push(value),
                        None => return value,
                    }
                }
                match stack.last_mut().and_then(Partial::next_child) {
                    Some(child) => {
                        node = child;
                        break;
                    }
                    None => finished = stack.pop().map(Partial::finish),
                }
            }
        }
    }
}

/// A container being rebuilt by [`Node::into_value`].
enum Partial {
    List {
        done: Vec<Value>,
        rest: std::vec::IntoIter<Node>,
    },
    Dict {
        done: Vec<(Bytes, Value)>,
        rest: std::vec::IntoIter<Entry>,
        key: Option<Bytes>,
    },
}

impl Partial {
    fn push(&mut self, value: Value) {
        match self {
            Partial::List { done, .. } => done.push(value),
            Partial::Dict { done, key, .. } => {
                if let Some(key) = key.take() {
                    done.push((key, value));
                }
            }
        }
    }

    fn next_child(&mut self) -> Option<Node> {
        match self {
            Partial::List { rest, .. } => rest.next(),
            Partial::Dict { rest, key, .. } => rest.next().map(|entry| {
                *key = Some(entry.key);
                entry.value
            }),
        }
    }

    fn finish(self) -> Value {
        match self {
            Partial::List { done, .. } => Value::List(done),
            Partial::Dict { done, .. } => Value::Dict(Dict::from_unique_entries(done)),
        }
    }
}
