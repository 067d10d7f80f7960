//! Source-encoding normalization for piped input.
//!
//! Lines read from stdin are decoded from a legacy source encoding (GBK by
//! default) into UTF-8 before they reach the extractor. Command-line
//! arguments are already UTF-8 and never pass through here.

use std::borrow::Cow;

use encoding_rs::{Encoding, GBK};

use crate::error::{Error, Result};

/// WHATWG label of the default stdin encoding.
pub const DEFAULT_SOURCE_ENCODING: &str = "gbk";

/// Resolve a WHATWG encoding label such as `gbk`, `utf-8` or `latin1`.
pub fn source_encoding(label: &str) -> Result<&'static Encoding> {
    Encoding::for_label(label.trim().as_bytes()).ok_or_else(|| Error::UnknownEncoding {
        label: label.to_string(),
    })
}

/// Decode `raw` from `source` into UTF-8.
///
/// Malformed sequences become U+FFFD; the conversion never fails. A byte
/// order mark is not sniffed, so the declared encoding always wins.
pub fn normalize<'a>(raw: &'a [u8], source: &'static Encoding) -> Cow<'a, str> {
    let (text, had_errors) = source.decode_without_bom_handling(raw);
    if had_errors {
        tracing::debug!(
            encoding = source.name(),
            len = raw.len(),
            "replaced malformed input bytes"
        );
    }
    text
}

/// Decode `raw` from GBK into UTF-8.
#[inline]
pub fn gbk_to_utf8(raw: &[u8]) -> Cow<'_, str> {
    normalize(raw, GBK)
}
