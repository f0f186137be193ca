//! # vcfthumb
//!
//! A Rust library for reading vCard (`.vcf`) files and turning every contact
//! into a small "business card" thumbnail.
//!
//! ## What this crate does
//!
//! 1. **Detect the encoding** of the raw file and decode it to text.
//! 2. **Split records**: every `BEGIN:VCARD … END:VCARD` block is isolated.
//! 3. **Extract the inline photo**: a base64 `PHOTO;…:` property, including its
//!    wrapped continuation lines, is decoded and removed from the record text.
//! 4. **Extract attributes**: the recognised properties (`FN`, `TEL`, `EMAIL`, …)
//!    are collected and the `N`/`FN` name rule is applied.
//! 5. **Render or split**: records go to a [`CardRenderer`], or each block is
//!    written back out as its own `.vcf` file.
//!
//! ## Quick example
//!
//! ```no_run
//! use vcfthumb::{TracingSink, VcardReader};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let reader = VcardReader::from_path("contacts.vcf")?;
//!
//! println!("Encoding : {}", reader.encoding().name());
//! println!("Records  : {}", reader.count_records());
//!
//! for card in reader.read_cards(&mut TracingSink) {
//!     println!("  {} (photo: {})", card.display_name(), card.photo.is_some());
//! }
//! # Ok(())
//! # }
//! ```

use thiserror::Error;

mod contact;
mod diagnostics;
mod encoding;
mod extraction_engine;
mod photo;
mod properties;
mod reader;
mod renderer;
mod split;
mod splitter;
mod validator;

pub use contact::{ContactRecord, Photo};
pub use diagnostics::{Diagnostic, DiagnosticKind, DiagnosticSink, TracingSink};
pub use encoding::{decode_text, detect_encoding, DecodedText};
pub use extraction_engine::ExtractionEngine;
pub use photo::{decode_payload, extract_photo, locate_photo, PhotoExtraction, PhotoSpan};
pub use properties::{extract_properties, ExtractedProperties, RecognizedParameterSet};
pub use reader::VcardReader;
pub use renderer::{
    font_painter, render_all, CardRenderer, TextLine, TextPainter, ThumbSize, ThumbnailRenderer,
};
pub use split::{numbered_file_name, render_single_vcard, split_to_files};
pub use splitter::{split_records, RawVcardBlock, RecordBlocks};
pub use validator::reconcile_names;

/// Property key every surviving record carries its display name under.
pub const CANONICAL_NAME: &str = "FN";

/// Structured-name property key; folded into [`CANONICAL_NAME`] when `FN` is absent.
pub const STRUCTURED_NAME: &str = "N";

// ── Configuration ────────────────────────────────────────────────────────────

/// Runtime configuration for [`VcardReader`].
#[derive(Debug, Clone)]
pub struct ReaderConfig {
    /// Properties the extractor is allowed to capture.
    pub parameters: RecognizedParameterSet,

    /// Encoding used when detection is inconclusive or the detected decoder
    /// reports malformed input.
    pub fallback_encoding: &'static encoding_rs::Encoding,

    /// When `false`, photo payloads are still cut out of the record text but
    /// never base64- or image-decoded.
    pub decode_photos: bool,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            parameters: RecognizedParameterSet::default(),
            fallback_encoding: encoding_rs::UTF_8,
            decode_photos: true,
        }
    }
}

// ── Error type ───────────────────────────────────────────────────────────────

/// Every error that this crate can produce.
#[derive(Error, Debug)]
pub enum VcardError {
    /// A filesystem I/O error occurred (e.g. when loading or saving a file).
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// The accumulated photo payload is not valid base64.
    #[error("invalid base64 photo data: {0}")]
    Base64(#[from] base64::DecodeError),

    /// The decoded photo bytes are not an image format we can read, or a
    /// thumbnail could not be encoded.
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    /// The record carries neither `N` nor `FN`.
    #[error("no name parameters (N or FN) in data")]
    MissingName,

    /// The record produced no recognised attribute and no photo.
    #[error("no valid parameters in data")]
    NoValidParameters,

    /// A thumbnail size string that is not one of the supported sizes.
    #[error("invalid thumbnail size '{0}', valid sizes are 350x200 and 700x400")]
    InvalidSize(String),

    /// A property name that cannot appear as a vCard property key.
    #[error("invalid vCard parameter name '{0}'")]
    InvalidParameterName(String),

    /// Font data that could not be parsed as a TrueType/OpenType font.
    #[error("invalid font: {0}")]
    InvalidFont(String),
}

/// Convenience alias used throughout this crate.
pub type Result<T> = std::result::Result<T, VcardError>;
