//! Split mode: write each vCard block of a file to its own `.vcf` file.

use crate::splitter::split_records;
use crate::Result;
use std::path::{Path, PathBuf};

/// Rebuild a standalone vCard from a block body.
///
/// ```
/// assert_eq!(
///     vcfthumb::render_single_vcard("\n  FN:Ann\n"),
///     "BEGIN:VCARD\nFN:Ann\nEND:VCARD\n"
/// );
/// ```
pub fn render_single_vcard(block: &str) -> String {
    format!("BEGIN:VCARD\n{}END:VCARD\n", block.trim_start())
}

/// Output file name for record `index` (0-based) of `total`.
///
/// A single record keeps the bare stem; several are numbered from `0001`.
/// Spaces become underscores.
///
/// ```
/// use vcfthumb::numbered_file_name;
///
/// assert_eq!(numbered_file_name("my contacts", 0, 1, "vcf"), "my_contacts.vcf");
/// assert_eq!(numbered_file_name("my contacts", 11, 20, "png"), "my_contacts_0012.png");
/// ```
pub fn numbered_file_name(stem: &str, index: usize, total: usize, extension: &str) -> String {
    let name = if total == 1 {
        format!("{stem}.{extension}")
    } else {
        format!("{stem}_{:0>4}.{extension}", index + 1)
    };
    name.replace(' ', "_")
}

/// Write every block of `text` to `output_dir` as a UTF-8 `.vcf` file and
/// return the created paths in source order.
///
/// The directory is created when missing. Any write failure aborts the split.
pub fn split_to_files<P: AsRef<Path>>(text: &str, stem: &str, output_dir: P) -> Result<Vec<PathBuf>> {
    let output_dir = output_dir.as_ref();
    let cards: Vec<String> = split_records(text)
        .map(|block| render_single_vcard(block.text))
        .collect();

    std::fs::create_dir_all(output_dir)?;

    let mut written = Vec::with_capacity(cards.len());
    for (i, card) in cards.iter().enumerate() {
        let dest = output_dir.join(numbered_file_name(stem, i, cards.len(), "vcf"));
        std::fs::write(&dest, card)?;
        written.push(dest);
    }

    tracing::info!(
        "original file {stem} was split into {} single vcard file(s)",
        written.len()
    );
    Ok(written)
}
