//! Response body decoding
//!
//! Listing pages are decoded from raw bytes. The charset is taken from, in
//! order: a byte order mark, the `Content-Type` header, a `<meta>` charset
//! declaration near the start of the document, and finally UTF-8.

use encoding_rs::{Encoding, UTF_8};

/// How far into the document a `<meta>` charset declaration is looked for
const META_SNIFF_LIMIT: usize = 1024;

/// Decodes a page body into a string
///
/// Malformed sequences are replaced with U+FFFD rather than failing.
pub fn decode_body(bytes: &[u8], content_type: Option<&str>) -> String {
    let encoding = Encoding::for_bom(bytes)
        .map(|(encoding, _)| encoding)
        .or_else(|| content_type.and_then(header_charset))
        .or_else(|| meta_charset(bytes))
        .unwrap_or(UTF_8);

    let (decoded, used, had_errors) = encoding.decode(bytes);
    if had_errors {
        tracing::warn!("Page body is not valid {}; replaced invalid bytes", used.name());
    }
    tracing::trace!("Decoded {} bytes as {}", bytes.len(), used.name());

    decoded.into_owned()
}

/// Reads the `charset` parameter of a `Content-Type` value
fn header_charset(content_type: &str) -> Option<&'static Encoding> {
    content_type
        .split(';')
        .skip(1)
        .filter_map(|param| param.split_once('='))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case("charset"))
        .and_then(|(_, value)| Encoding::for_label(value.trim().trim_matches('"').as_bytes()))
}

/// Looks for `<meta charset=...>` or `<meta http-equiv ... content="...; charset=...">`
fn meta_charset(bytes: &[u8]) -> Option<&'static Encoding> {
    let head = &bytes[..bytes.len().min(META_SNIFF_LIMIT)];
    let head = String::from_utf8_lossy(head).to_ascii_lowercase();

    head.match_indices("<meta").find_map(|(start, _)| {
        let tag = &head[start..];
        let tag = &tag[..tag.find('>').unwrap_or(tag.len())];
        let value = &tag[tag.find("charset")? + "charset".len()..];
        let value = value.trim_start().strip_prefix('=')?.trim_start();
        let label: String = value
            .trim_start_matches(['"', '\''])
            .chars()
            .take_while(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | ':' | '.'))
            .collect();
        Encoding::for_label(label.as_bytes())
    })
}
