//! Recoverable conditions reported while reading a file.
//!
//! Nothing in here aborts a run. The assembler hands each condition to the
//! caller's [`DiagnosticSink`] and carries on with the next record.

use std::fmt;
use thiserror::Error;

/// What went wrong.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DiagnosticKind {
    #[error("encoding detection inconclusive, decoding as {fallback}")]
    EncodingInconclusive { fallback: String },

    #[error("error in base64 encoding, image data ignored: {0}")]
    PhotoBase64(String),

    #[error("error in image data, image ignored: {0}")]
    PhotoImage(String),

    #[error("no name parameters (N or FN) in data, vcard ignored")]
    MissingName,

    #[error("no valid parameters in data, vcard ignored")]
    NoValidParameters,
}

/// A [`DiagnosticKind`] tagged with the record it concerns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Index of the source block, `None` for file-level conditions.
    pub record: Option<usize>,
    pub kind: DiagnosticKind,
}

impl Diagnostic {
    /// A diagnostic about the whole input rather than one record.
    pub fn for_file(kind: DiagnosticKind) -> Self {
        Self { record: None, kind }
    }

    /// A diagnostic about the record at `record` (0-based, file order).
    pub fn for_record(record: usize, kind: DiagnosticKind) -> Self {
        Self {
            record: Some(record),
            kind,
        }
    }

    /// `true` when the record this diagnostic concerns was dropped.
    pub fn discards_record(&self) -> bool {
        matches!(
            self.kind,
            DiagnosticKind::MissingName | DiagnosticKind::NoValidParameters
        )
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.record {
            Some(index) => write!(f, "vcard #{}: {}", index + 1, self.kind),
            None => write!(f, "{}", self.kind),
        }
    }
}

/// Receiver for diagnostics.
pub trait DiagnosticSink {
    fn report(&mut self, diagnostic: Diagnostic);
}

/// Collects every diagnostic in order.
impl DiagnosticSink for Vec<Diagnostic> {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.push(diagnostic);
    }
}

/// Emits each diagnostic as a `tracing` warning.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn report(&mut self, diagnostic: Diagnostic) {
        tracing::warn!(record = ?diagnostic.record, "{}", diagnostic.kind);
    }
}
