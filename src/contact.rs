use crate::{Result, CANONICAL_NAME};
use image::{DynamicImage, ImageFormat};
use std::collections::BTreeMap;
use std::path::Path;

// ── ContactRecord ────────────────────────────────────────────────────────────

/// One contact extracted from a vCard block.
///
/// Returned by [`crate::VcardReader::read_cards`]. A record always carries a
/// display name under [`CANONICAL_NAME`].
#[derive(Debug, Clone)]
pub struct ContactRecord {
    /// Position of the source block in the file, counting blocks that were
    /// later discarded.
    pub index: usize,

    /// Recognised property keys (uppercase) mapped to their first value.
    pub attributes: BTreeMap<String, String>,

    /// The inline photo, when the record had one that decoded cleanly.
    pub photo: Option<Photo>,
}

impl ContactRecord {
    /// The canonical display name (`FN`, or the promoted `N` value).
    pub fn display_name(&self) -> &str {
        self.attribute(CANONICAL_NAME).unwrap_or_default()
    }

    /// Value of the attribute `key`, looked up case-insensitively.
    ///
    /// ```
    /// # use vcfthumb::ContactRecord;
    /// # let card = ContactRecord {
    /// #     index: 0,
    /// #     attributes: [("TEL".to_string(), "555-1234".to_string())].into(),
    /// #     photo: None,
    /// # };
    /// assert_eq!(card.attribute("tel"), Some("555-1234"));
    /// ```
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .get(&key.to_ascii_uppercase())
            .map(String::as_str)
    }

    /// Attributes other than the display name, in key order.
    pub fn details(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes
            .iter()
            .filter(|(k, _)| k.as_str() != CANONICAL_NAME)
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

// ── Photo ────────────────────────────────────────────────────────────────────

/// A decoded inline photo.
#[derive(Debug, Clone)]
pub struct Photo {
    /// Raw bytes exactly as they came out of the base64 payload.
    pub data: Vec<u8>,

    /// Image container format sniffed from `data`.
    pub format: ImageFormat,

    /// The decoded pixels.
    pub image: DynamicImage,
}

impl Photo {
    /// Interpret `data` as an image, taking ownership of the buffer.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        let format = image::guess_format(&data)?;
        let image = image::load_from_memory_with_format(&data, format)?;
        Ok(Self {
            data,
            format,
            image,
        })
    }

    /// Width of the decoded image in pixels.
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    /// Height of the decoded image in pixels.
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// File extension matching [`format`](Self::format), e.g. `"jpg"`.
    pub fn extension(&self) -> &'static str {
        self.format.extensions_str().first().copied().unwrap_or("bin")
    }

    /// Write the original photo bytes to `path`, creating parent directories.
    pub fn save_to_disk<P: AsRef<Path>>(&self, path: P) -> std::io::Result<()> {
        let path = path.as_ref();
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        std::fs::write(path, &self.data)
    }
}
