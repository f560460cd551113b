use super::error::{ExtractError, MetainfoError};
use crate::bencode::{DecodeOptions, Decoder, Node, Span};
use crate::constants::INFO_KEY;

/// Locates the info dictionary in a torrent file.
///
/// Returns the span of the `info` value exactly as it appears in `data`.
/// The bytes are never re-encoded, so producers that emit unsorted keys
/// still yield the same hash every other client computes.
///
/// Decodes with [`DecodeOptions::tolerant`]: leading zeros and repeated keys
/// do not affect the info span's bytes, so they do not stop extraction. Use
/// [`extract_info_span_with`] to apply stricter rules.
///
/// # Errors
///
/// - [`MetainfoError::Decode`] if `data` is not valid bencode
/// - [`MetainfoError::RootNotADictionary`] if the top-level value is not a dictionary
/// - [`MetainfoError::MissingInfoKey`] if there is no top-level `info` key
///   (a repeated `info` key resolves to its last occurrence)
/// - [`MetainfoError::NotADictionary`] if `info` is not a dictionary
///
/// # Examples
///
/// ```
/// use torrent_infohash::metainfo::extract_info_span;
///
/// let data = b"d8:announce3:url4:infod4:name1:x6:lengthi1eee";
/// let span = extract_info_span(data).unwrap();
/// assert_eq!(&data[span.range()], b"d4:name1:x6:lengthi1ee");
/// ```
pub fn extract_info_span(data: &[u8]) -> Result<Span, ExtractError> {
    extract_info_span_with(data, &DecodeOptions::tolerant())
}

/// Like [`extract_info_span`], decoding with the given options.
pub fn extract_info_span_with(data: &[u8], options: &DecodeOptions) -> Result<Span, ExtractError> {
    let root = Decoder::new(*options).decode_spanned(data)?;
    info_span(&root)
}

/// Returns the raw bytes of the info dictionary.
pub fn info_bytes(data: &[u8]) -> Result<&[u8], ExtractError> {
    let span = extract_info_span(data)?;
    Ok(&data[span.range()])
}

pub(crate) fn info_span(root: &Node) -> Result<Span, ExtractError> {
    let entries = root.entries().ok_or(MetainfoError::RootNotADictionary)?;

    let info = entries
        .iter()
        .find(|e| e.key.as_ref() == INFO_KEY)
        .ok_or(MetainfoError::MissingInfoKey {
            offset: root.span.end.saturating_sub(1),
        })?;

    if !info.value.is_dict() {
        return Err(MetainfoError::NotADictionary {
            offset: info.value.span.start,
        });
    }

    tracing::debug!("info dictionary at bytes {:?}", info.value.span);
    Ok(info.value.span)
}
