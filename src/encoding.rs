//! Encoding detection and decoding of raw `.vcf` bytes.

use chardetng::EncodingDetector;
use encoding_rs::{Encoding, UTF_8};

/// Text produced by [`decode_text`].
#[derive(Debug, Clone)]
pub struct DecodedText {
    /// The decoded text with every line ending normalised to `\n`.
    pub text: String,

    /// The encoding actually used to decode the bytes. A byte-order mark
    /// overrides the fallback, so malformed UTF-16 with a BOM is still
    /// decoded (lossily) as UTF-16.
    pub encoding: &'static Encoding,

    /// `false` when detection was inconclusive and the fallback was used.
    pub detected: bool,
}

/// Return the most likely encoding of `bytes`, or `None` when there is
/// nothing to go on.
///
/// A byte-order mark wins, then strict UTF-8 validity, then the statistical
/// guess from `chardetng`. No confidence threshold is applied to the guess.
pub fn detect_encoding(bytes: &[u8]) -> Option<&'static Encoding> {
    if bytes.is_empty() {
        return None;
    }

    if let Some((encoding, _bom_len)) = Encoding::for_bom(bytes) {
        return Some(encoding);
    }

    if std::str::from_utf8(bytes).is_ok() {
        return Some(UTF_8);
    }

    let mut detector = EncodingDetector::new();
    detector.feed(bytes, true);
    Some(detector.guess(None, false))
}

/// Decode `bytes` to text, using `fallback` when detection is inconclusive.
///
/// If the detected decoder hits malformed sequences the bytes are decoded
/// again with `fallback` and the result is flagged as not detected.
pub fn decode_text(bytes: &[u8], fallback: &'static Encoding) -> DecodedText {
    let (encoding, detected) = match detect_encoding(bytes) {
        Some(encoding) => {
            let (_, _, had_errors) = encoding.decode(bytes);
            if had_errors {
                tracing::debug!(
                    "malformed {} input, falling back to {}",
                    encoding.name(),
                    fallback.name()
                );
                (fallback, false)
            } else {
                (encoding, true)
            }
        }
        None => (fallback, false),
    };

    let (text, used, _) = encoding.decode(bytes);
    DecodedText {
        text: normalize_newlines(&text),
        encoding: used,
        detected,
    }
}

/// Convert `\r\n` and lone `\r` line endings to `\n`.
fn normalize_newlines(text: &str) -> String {
    if !text.contains('\r') {
        return text.to_owned();
    }
    text.replace("\r\n", "\n").replace('\r', "\n")
}
