//! Turning fetched bytes into UTF-8 text using chardetng and `encoding_rs`.

use std::borrow::Cow;

use chardetng::EncodingDetector;
use encoding_rs::{Encoding, UTF_8, UTF_16BE, UTF_16LE};
use simdutf8::compat::from_utf8;
use tracing::debug;

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// Check if the given bytes are valid UTF-8.
pub fn is_utf8(data: &[u8]) -> bool {
    simdutf8::basic::from_utf8(data).is_ok()
}

/// Skip the UTF-8 BOM if present and return the remaining data.
pub fn skip_bom(data: &[u8]) -> &[u8] {
    data.strip_prefix(UTF8_BOM).unwrap_or(data)
}

/// Decode source bytes to text.
///
/// Valid UTF-8 is borrowed as-is (minus any BOM). UTF-16 with a BOM is decoded
/// directly. Damaged UTF-8 (a cut-off final character, or stray bytes in
/// otherwise UTF-8 text) is decoded with replacement characters. Only input
/// that is clearly not UTF-8 is transcoded from the encoding chardetng guesses.
pub fn decode_text(data: &[u8]) -> Cow<'_, str> {
    if let Some(encoding) = utf16_bom(data) {
        debug!(encoding = encoding.name(), "decoding UTF-16 input");
        let (text, _, _) = encoding.decode(data);
        return text;
    }

    let data = skip_bom(data);
    let err = match from_utf8(data) {
        Ok(text) => return Cow::Borrowed(text),
        Err(err) => err,
    };

    if err.error_len().is_none() || mostly_utf8(data) {
        debug!(
            valid_up_to = err.valid_up_to(),
            "decoding damaged UTF-8 input with replacement characters"
        );
        return String::from_utf8_lossy(data);
    }

    let mut detector = EncodingDetector::new();
    detector.feed(data, true);
    let encoding = detector.guess(None, true);
    if encoding != UTF_8 {
        debug!(encoding = encoding.name(), "transcoding input to UTF-8");
    }

    let (text, _, had_errors) = encoding.decode(data);
    if had_errors {
        debug!(encoding = encoding.name(), "input contained undecodable bytes");
    }
    text
}

/// Returns true if well-formed multi-byte UTF-8 outweighs invalid bytes.
fn mostly_utf8(data: &[u8]) -> bool {
    let mut multibyte = 0usize;
    let mut invalid = 0usize;
    for chunk in data.utf8_chunks() {
        let valid = chunk.valid().as_bytes();
        multibyte += valid.len() - bytecount::num_chars(valid);
        invalid += chunk.invalid().len();
    }
    multibyte > invalid
}

fn utf16_bom(data: &[u8]) -> Option<&'static Encoding> {
    match data {
        [0xFF, 0xFE, ..] => Some(UTF_16LE),
        [0xFE, 0xFF, ..] => Some(UTF_16BE),
        _ => None,
    }
}
