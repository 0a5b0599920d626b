//! Byte decoding.

use std::borrow::Cow;
use std::path::Path;

use encoding_rs::{UTF_8, WINDOWS_1252};

/// Decode source bytes, dropping a UTF-8 BOM.
///
/// Release files from older distributions are often Windows-1252; bytes that
/// are not valid UTF-8 are decoded that way instead of failing the load.
pub(crate) fn decode_source<'a>(bytes: &'a [u8], path: &Path) -> Cow<'a, str> {
    let (text, had_errors) = UTF_8.decode_with_bom_removal(bytes);
    if !had_errors {
        return text;
    }
    tracing::warn!(
        path = %path.display(),
        "source is not valid UTF-8, decoding as Windows-1252"
    );
    let (text, _, _) = WINDOWS_1252.decode(bytes);
    text
}
