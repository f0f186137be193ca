use crate::diagnostics::{Diagnostic, DiagnosticKind, DiagnosticSink};
use crate::encoding::decode_text;
use crate::extraction_engine::ExtractionEngine;
use crate::splitter::{split_records, RecordBlocks};
use crate::{ContactRecord, ReaderConfig, Result};
use encoding_rs::Encoding;
use std::path::Path;

// ── VcardReader ──────────────────────────────────────────────────────────────

/// Entry point for reading a `.vcf` file.
///
/// The file is read and decoded once at construction; every other method works
/// on the decoded text and can be called any number of times.
///
/// # Creating a reader
///
/// ```no_run
/// use vcfthumb::{ReaderConfig, RecognizedParameterSet, VcardReader};
///
/// // From a file path
/// let r = VcardReader::from_path("contacts.vcf").unwrap();
///
/// // From an in-memory buffer
/// let bytes = std::fs::read("contacts.vcf").unwrap();
/// let r = VcardReader::from_bytes(&bytes);
///
/// // With custom configuration
/// let cfg = ReaderConfig {
///     parameters: RecognizedParameterSet::default().with_extra(["NICKNAME"]).unwrap(),
///     ..Default::default()
/// };
/// let r = VcardReader::with_config("contacts.vcf", cfg).unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct VcardReader {
    text: String,
    encoding: &'static Encoding,
    detected: bool,
    config: ReaderConfig,
}

impl VcardReader {
    // ── Constructors ──────────────────────────────────────────────────────────

    /// Load a `.vcf` file from the file system.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::with_config(path, ReaderConfig::default())
    }

    /// Decode an in-memory byte slice.
    pub fn from_bytes(data: &[u8]) -> Self {
        Self::from_bytes_with_config(data, ReaderConfig::default())
    }

    /// Load a `.vcf` file from the file system with a custom [`ReaderConfig`].
    ///
    /// An unreadable file is an error; nothing is parsed in that case.
    pub fn with_config<P: AsRef<Path>>(path: P, config: ReaderConfig) -> Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read(path)?;
        let reader = Self::from_bytes_with_config(&data, config);
        tracing::info!(
            "input vcf file: '{}' encoding: {}",
            path.display(),
            reader.encoding.name()
        );
        Ok(reader)
    }

    /// Decode an in-memory byte slice with a custom [`ReaderConfig`].
    pub fn from_bytes_with_config(data: &[u8], config: ReaderConfig) -> Self {
        let decoded = decode_text(data, config.fallback_encoding);
        Self {
            text: decoded.text,
            encoding: decoded.encoding,
            detected: decoded.detected,
            config,
        }
    }

    // ── Records ───────────────────────────────────────────────────────────────

    /// Lazily iterate over the raw `BEGIN:VCARD … END:VCARD` blocks.
    pub fn blocks(&self) -> RecordBlocks<'_> {
        split_records(&self.text)
    }

    /// Number of complete vCard blocks in the file, valid or not.
    pub fn count_records(&self) -> usize {
        self.blocks().count()
    }

    /// Extract every valid contact, in file order.
    ///
    /// Recoverable problems (inconclusive encoding, bad photo data, records
    /// without a name) go to `sink`; affected records are degraded or skipped
    /// but never abort the run.
    ///
    /// # Example
    ///
    /// ```
    /// use vcfthumb::{Diagnostic, VcardReader};
    ///
    /// let reader = VcardReader::from_bytes(b"BEGIN:VCARD\nFN:Ann Lee\nTEL:555-1234\nEND:VCARD\n");
    /// let mut diagnostics: Vec<Diagnostic> = Vec::new();
    /// let cards = reader.read_cards(&mut diagnostics);
    ///
    /// assert_eq!(cards.len(), 1);
    /// assert_eq!(cards[0].display_name(), "Ann Lee");
    /// assert_eq!(cards[0].attribute("TEL"), Some("555-1234"));
    /// assert!(diagnostics.is_empty());
    /// ```
    pub fn read_cards(&self, sink: &mut dyn DiagnosticSink) -> Vec<ContactRecord> {
        if !self.detected {
            sink.report(Diagnostic::for_file(DiagnosticKind::EncodingInconclusive {
                fallback: self.encoding.name().to_owned(),
            }));
        }

        let cards = ExtractionEngine::new(&self.config).extract_blocks(self.blocks(), sink);
        tracing::info!("loaded {} vcards", cards.len());
        cards
    }

    // ── Accessors ─────────────────────────────────────────────────────────────

    /// The decoded text, with line endings normalised to `\n`.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The encoding the file was decoded with.
    pub fn encoding(&self) -> &'static Encoding {
        self.encoding
    }

    /// `false` when the encoding could not be detected and the fallback was used.
    pub fn encoding_detected(&self) -> bool {
        self.detected
    }

    /// Returns a reference to the active [`ReaderConfig`].
    pub fn config(&self) -> &ReaderConfig {
        &self.config
    }
}
