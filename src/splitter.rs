use regex::{CaptureMatches, Regex};
use std::ops::Range;
use std::sync::LazyLock;

// Markers are case-insensitive and anchored at line starts; `.*?` keeps each
// block to the shortest span ending at the first following END line.
static VCARD_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?ims)^BEGIN:VCARD(?P<card>.*?)^END:VCARD").expect("invalid vCard block regex")
});

/// The text between one `BEGIN:VCARD` marker and its matching `END:VCARD`,
/// markers excluded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawVcardBlock<'a> {
    /// Position of this block among the blocks of the source text.
    pub index: usize,

    /// The block body. Starts with the remainder of the `BEGIN:VCARD` line
    /// (normally just `\n`) and ends with the newline before `END:VCARD`.
    pub text: &'a str,

    start: usize,
}

impl<'a> RawVcardBlock<'a> {
    /// Byte range of [`text`](Self::text) within the source text.
    pub fn span(&self) -> Range<usize> {
        self.start..self.start + self.text.len()
    }
}

/// Lazy iterator over the vCard blocks of a text, in source order.
///
/// Created by [`split_records`].
pub struct RecordBlocks<'a> {
    matches: CaptureMatches<'static, 'a>,
    next_index: usize,
}

impl<'a> Iterator for RecordBlocks<'a> {
    type Item = RawVcardBlock<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let caps = self.matches.next()?;
        let card = caps.name("card")?;
        let block = RawVcardBlock {
            index: self.next_index,
            text: card.as_str(),
            start: card.start(),
        };
        self.next_index += 1;
        Some(block)
    }
}

/// Split `text` into its `BEGIN:VCARD … END:VCARD` blocks.
///
/// A trailing `BEGIN:VCARD` that is never closed produces no block, and text
/// without any complete block yields an empty sequence. The function is pure,
/// so it can be called again on the same text to restart the scan.
///
/// ```
/// let text = "BEGIN:VCARD\nFN:Ann\nEND:VCARD\nbegin:vcard\nFN:Bob\nend:vcard\n";
/// let blocks: Vec<_> = vcfthumb::split_records(text).map(|b| b.text).collect();
/// assert_eq!(blocks, ["\nFN:Ann\n", "\nFN:Bob\n"]);
/// ```
pub fn split_records(text: &str) -> RecordBlocks<'_> {
    RecordBlocks {
        matches: VCARD_BLOCK.captures_iter(text),
        next_index: 0,
    }
}
