use crate::diagnostics::{Diagnostic, DiagnosticKind, DiagnosticSink};
use crate::{Photo, Result};
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine as _;
use regex::Regex;
use std::ops::Range;
use std::sync::LazyLock;

/// `PHOTO;<params>:` followed by the first run of base64 data. The data may
/// start on the declaration line or, vCard 2.1 style, on the next line.
static PHOTO_DECLARATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^PHOTO;(?P<pars>[^:\n]+?):\s*?(?P<base64>[A-Za-z0-9+/=]+?)\n")
        .expect("invalid PHOTO regex")
});

/// One wrapped line of base64 payload, optionally indented by a single space.
static BASE64_CONTINUATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\A[ ]?(?P<base64>[A-Za-z0-9+/=]+)\n").expect("invalid base64 line regex")
});

// vCard producers disagree on trailing padding, so accept it either way.
const PAYLOAD_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

// ── PhotoSpan ─────────────────────────────────────────────────────────────────

/// Location of an inline photo inside one record's text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoSpan {
    /// Byte offset of the `P` of `PHOTO`.
    pub start: usize,

    /// Byte offset just past the newline of the last consumed payload line.
    pub end: usize,

    /// The parameters between `PHOTO;` and `:` (e.g. `ENCODING=BASE64;TYPE=JPEG`).
    pub parameters: String,

    /// Concatenated base64 payload from the declaration and continuation lines.
    pub payload: String,
}

impl PhotoSpan {
    /// Byte range of the declaration and its continuation lines in the record text.
    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    /// Return `text` with this span cut out.
    pub fn remove_from(&self, text: &str) -> String {
        let mut residual = String::with_capacity(text.len() - (self.end - self.start));
        residual.push_str(&text[..self.start]);
        residual.push_str(&text[self.end..]);
        residual
    }
}

/// Find the first inline base64 photo in `text`.
///
/// Every line directly after the declaration that consists only of base64
/// characters is treated as part of the payload; the scan stops at the first
/// line that does not.
pub fn locate_photo(text: &str) -> Option<PhotoSpan> {
    let caps = PHOTO_DECLARATION.captures(text)?;
    let declaration = caps.get(0)?;

    let mut payload = caps["base64"].to_owned();
    let mut end = declaration.end();

    while let Some(line) = BASE64_CONTINUATION.captures(&text[end..]) {
        payload.push_str(&line["base64"]);
        end += line.get(0).map_or(0, |m| m.end());
    }

    Some(PhotoSpan {
        start: declaration.start(),
        end,
        parameters: caps["pars"].to_owned(),
        payload,
    })
}

/// Decode a base64 photo payload to raw bytes.
pub fn decode_payload(payload: &str) -> Result<Vec<u8>> {
    Ok(PAYLOAD_ENGINE.decode(payload)?)
}

// ── Extraction ────────────────────────────────────────────────────────────────

/// Outcome of [`extract_photo`] for one record.
#[derive(Debug)]
pub struct PhotoExtraction {
    /// Record text with the photo property and its payload lines removed.
    pub residual: String,

    /// The decoded photo, when one was found and both decoding steps worked.
    pub photo: Option<Photo>,
}

/// Pull the inline photo out of one record's text.
///
/// The photo span is removed from the text whether or not it decodes, so
/// payload lines never reach the property scan. Decode failures are reported
/// to `sink` and leave the photo unset. With `decode` set to `false` the span
/// is removed without decoding.
pub fn extract_photo(
    text: &str,
    record: usize,
    decode: bool,
    sink: &mut dyn DiagnosticSink,
) -> PhotoExtraction {
    let Some(span) = locate_photo(text) else {
        return PhotoExtraction {
            residual: text.to_owned(),
            photo: None,
        };
    };

    tracing::debug!(
        record,
        parameters = %span.parameters,
        payload_len = span.payload.len(),
        "found inline photo"
    );

    let photo = if decode {
        decode_photo(&span, record, sink)
    } else {
        None
    };

    PhotoExtraction {
        residual: span.remove_from(text),
        photo,
    }
}

fn decode_photo(span: &PhotoSpan, record: usize, sink: &mut dyn DiagnosticSink) -> Option<Photo> {
    let bytes = match decode_payload(&span.payload) {
        Ok(bytes) => bytes,
        Err(e) => {
            sink.report(Diagnostic::for_record(
                record,
                DiagnosticKind::PhotoBase64(e.to_string()),
            ));
            return None;
        }
    };

    match Photo::from_bytes(bytes) {
        Ok(photo) => Some(photo),
        Err(e) => {
            sink.report(Diagnostic::for_record(
                record,
                DiagnosticKind::PhotoImage(e.to_string()),
            ));
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn declaration_only_payload() {
        let text = "\nFN:A\nPHOTO;ENCODING=b;TYPE=PNG:QUJD\nTEL:1\n";
        let span = locate_photo(text).unwrap();
        assert_eq!(span.payload, "QUJD");
        assert_eq!(span.parameters, "ENCODING=b;TYPE=PNG");
        assert_eq!(&text[span.range()], "PHOTO;ENCODING=b;TYPE=PNG:QUJD\n");
        assert_eq!(span.remove_from(text), "\nFN:A\nTEL:1\n");
    }

    #[test]
    fn consumes_only_adjacent_continuation_lines() {
        let text = "PHOTO;ENCODING=BASE64:QUJD\n REVG\nR0hJ\nTEL:1\nSktM\n";
        let span = locate_photo(text).unwrap();
        assert_eq!(span.payload, "QUJDREVGR0hJ");
        assert_eq!(span.remove_from(text), "TEL:1\nSktM\n");
    }

    #[test]
    fn payload_may_start_on_next_line() {
        let text = "PHOTO;ENCODING=BASE64;TYPE=JPEG:\n QUJD\n REVG\n\nTEL:1\n";
        let span = locate_photo(text).unwrap();
        assert_eq!(span.payload, "QUJDREVG");
        assert_eq!(span.remove_from(text), "\nTEL:1\n");
    }

    #[test]
    fn url_photo_is_not_inline() {
        assert!(locate_photo("PHOTO;VALUE=URL:http://example.com/a.jpg\n").is_none());
    }

    #[test]
    fn double_indent_ends_the_payload() {
        let text = "PHOTO;ENCODING=b:QUJD\n  REVG\n";
        let span = locate_photo(text).unwrap();
        assert_eq!(span.payload, "QUJD");
        assert_eq!(span.end, "PHOTO;ENCODING=b:QUJD\n".len());
    }

    #[test]
    fn unpadded_payload_decodes() {
        assert_eq!(decode_payload("QUI").unwrap(), b"AB");
        assert_eq!(decode_payload("QUI=").unwrap(), b"AB");
    }

    #[test]
    fn bad_base64_still_removes_span() {
        let text = "PHOTO;ENCODING=b:QQ=Q\nFN:A\n";
        let mut diagnostics = Vec::new();
        let out = extract_photo(text, 3, true, &mut diagnostics);
        assert!(out.photo.is_none());
        assert_eq!(out.residual, "FN:A\n");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].record, Some(3));
        assert!(matches!(diagnostics[0].kind, DiagnosticKind::PhotoBase64(_)));
    }

    #[test]
    fn non_image_bytes_report_image_error() {
        let text = "PHOTO;ENCODING=b:aGVsbG8gd29ybGQ=\nFN:A\n";
        let mut diagnostics = Vec::new();
        let out = extract_photo(text, 0, true, &mut diagnostics);
        assert!(out.photo.is_none());
        assert_eq!(out.residual, "FN:A\n");
        assert!(matches!(diagnostics[0].kind, DiagnosticKind::PhotoImage(_)));
    }

    #[test]
    fn skipping_decode_reports_nothing() {
        let text = "PHOTO;ENCODING=b:QQ=Q\nFN:A\n";
        let mut diagnostics = Vec::new();
        let out = extract_photo(text, 0, false, &mut diagnostics);
        assert!(out.photo.is_none());
        assert_eq!(out.residual, "FN:A\n");
        assert!(diagnostics.is_empty());
    }
}
