use crate::diagnostics::{Diagnostic, DiagnosticKind, DiagnosticSink};
use crate::photo::extract_photo;
use crate::properties::extract_properties;
use crate::splitter::{split_records, RawVcardBlock};
use crate::validator::reconcile_names;
use crate::{ContactRecord, ReaderConfig, VcardError};

/// Turns vCard blocks into validated [`ContactRecord`]s.
///
/// Each block is handled on its own: photo first, then properties, then the
/// name rule. A block that fails validation is reported and skipped.
pub struct ExtractionEngine<'a> {
    config: &'a ReaderConfig,
}

impl<'a> ExtractionEngine<'a> {
    pub fn new(config: &'a ReaderConfig) -> Self {
        Self { config }
    }

    /// Extract every valid contact from `text`, in source order.
    pub fn extract_all(&self, text: &str, sink: &mut dyn DiagnosticSink) -> Vec<ContactRecord> {
        self.extract_blocks(split_records(text), sink)
    }

    /// Extract every valid contact from an already split sequence of blocks.
    pub fn extract_blocks<'t, I>(&self, blocks: I, sink: &mut dyn DiagnosticSink) -> Vec<ContactRecord>
    where
        I: IntoIterator<Item = RawVcardBlock<'t>>,
    {
        let mut results = Vec::new();

        for block in blocks {
            match self.process_block(&block, sink) {
                Some(card) => results.push(card),
                None => continue, // Already reported
            }
        }

        results
    }

    /// Run photo and property extraction on one block.
    pub fn process_block(
        &self,
        block: &RawVcardBlock<'_>,
        sink: &mut dyn DiagnosticSink,
    ) -> Option<ContactRecord> {
        let extraction = extract_photo(block.text, block.index, self.config.decode_photos, sink);
        let extracted = extract_properties(&extraction.residual, &self.config.parameters);

        match reconcile_names(extracted, extraction.photo.is_some()) {
            Ok(attributes) => {
                tracing::debug!(
                    record = block.index,
                    attributes = attributes.len(),
                    photo = extraction.photo.is_some(),
                    "extracted vcard"
                );
                Some(ContactRecord {
                    index: block.index,
                    attributes,
                    photo: extraction.photo,
                })
            }
            Err(e) => {
                sink.report(Diagnostic::for_record(block.index, Self::discard_kind(&e)));
                None
            }
        }
    }

    fn discard_kind(error: &VcardError) -> DiagnosticKind {
        match error {
            VcardError::NoValidParameters => DiagnosticKind::NoValidParameters,
            _ => DiagnosticKind::MissingName,
        }
    }
}
