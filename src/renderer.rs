use crate::split::numbered_file_name;
use crate::{ContactRecord, Result, VcardError, CANONICAL_NAME};
use ab_glyph::FontArc;
use image::imageops::{self, FilterType};
use image::{ImageFormat, Rgba, RgbaImage};
use imageproc::drawing::draw_text_mut;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::LazyLock;

const BACKGROUND: Rgba<u8> = Rgba([255, 255, 255, 255]);
const TEXT_COLOR: Rgba<u8> = Rgba([0, 0, 0, 255]);

static DEFAULT_FONT: LazyLock<FontArc> = LazyLock::new(|| {
    FontArc::try_from_slice(include_bytes!("../assets/DejaVuSans.ttf"))
        .expect("bundled font must parse")
});

/// Consumer of extracted contacts, e.g. something that draws a card image.
pub trait CardRenderer {
    /// Render `card` and persist the result at `dest`.
    fn render(&mut self, card: &ContactRecord, dest: &Path) -> Result<()>;
}

/// Render every card into `output_dir`, named after `stem` like split mode
/// names its files, and return the written paths.
pub fn render_all<R: CardRenderer + ?Sized>(
    renderer: &mut R,
    cards: &[ContactRecord],
    stem: &str,
    output_dir: &Path,
) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(output_dir)?;

    let mut written = Vec::with_capacity(cards.len());
    for (i, card) in cards.iter().enumerate() {
        let dest = output_dir.join(numbered_file_name(stem, i, cards.len(), "png"));
        renderer.render(card, &dest)?;
        written.push(dest);
    }

    tracing::info!("created {} thumb files", written.len());
    Ok(written)
}

// ── ThumbSize ─────────────────────────────────────────────────────────────────

/// Supported thumbnail geometries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ThumbSize {
    /// 350x200 card.
    #[default]
    Small,
    /// 700x400 card.
    Big,
}

impl ThumbSize {
    /// Canvas width and height.
    pub fn canvas(self) -> (u32, u32) {
        match self {
            Self::Small => (350, 200),
            Self::Big => (700, 400),
        }
    }

    /// Size the photo is scaled to.
    pub fn picture(self) -> (u32, u32) {
        match self {
            Self::Small => (146, 196),
            Self::Big => (292, 392),
        }
    }

    /// Top-left corner of the photo.
    pub fn picture_offset(self) -> (u32, u32) {
        match self {
            Self::Small => (2, 2),
            Self::Big => (4, 4),
        }
    }

    /// Where the first text line starts, depending on whether a photo is drawn.
    pub fn text_origin(self, with_photo: bool) -> (u32, u32) {
        match (self, with_photo) {
            (Self::Small, true) => (154, 20),
            (Self::Small, false) => (50, 40),
            (Self::Big, true) => (308, 40),
            (Self::Big, false) => (100, 80),
        }
    }

    /// Vertical distance between text lines.
    pub fn line_step(self) -> u32 {
        match self {
            Self::Small => 20,
            Self::Big => 40,
        }
    }

    /// Glyph height in pixels for the card text.
    pub fn font_size(self) -> f32 {
        match self {
            Self::Small => 12.0,
            Self::Big => 24.0,
        }
    }
}

impl FromStr for ThumbSize {
    type Err = VcardError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "350x200" => Ok(Self::Small),
            "700x400" => Ok(Self::Big),
            other => Err(VcardError::InvalidSize(other.to_owned())),
        }
    }
}

// ── ThumbnailRenderer ────────────────────────────────────────────────────────

/// One positioned line of card text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextLine {
    pub x: u32,
    pub y: u32,
    pub text: String,
}

/// Draws a text line onto the canvas.
pub type TextPainter = Box<dyn FnMut(&mut RgbaImage, &TextLine, Rgba<u8>)>;

/// A [`TextPainter`] that rasterises lines with `font` at `px` pixels.
pub fn font_painter(font: FontArc, px: f32) -> TextPainter {
    Box::new(move |canvas: &mut RgbaImage, line: &TextLine, color: Rgba<u8>| {
        let x = i32::try_from(line.x).unwrap_or(i32::MAX);
        let y = i32::try_from(line.y).unwrap_or(i32::MAX);
        draw_text_mut(canvas, color, x, y, px, &font, &line.text);
    })
}

/// PNG business-card renderer.
///
/// The photo, when present, is scaled into the left picture box; attribute
/// lines (`fn: …`, `tel: …`) are laid out to its right and drawn with the
/// bundled DejaVu Sans unless another font or painter is supplied.
pub struct ThumbnailRenderer {
    size: ThumbSize,
    painter: TextPainter,
}

impl ThumbnailRenderer {
    /// Renderer for `size` cards using the bundled font.
    pub fn new(size: ThumbSize) -> Self {
        Self {
            size,
            painter: font_painter(DEFAULT_FONT.clone(), size.font_size()),
        }
    }

    /// Renderer for `size` cards drawing text with the TrueType/OpenType
    /// font in `font_data`.
    pub fn with_font(size: ThumbSize, font_data: Vec<u8>) -> Result<Self> {
        let font = FontArc::try_from_vec(font_data)
            .map_err(|e| VcardError::InvalidFont(e.to_string()))?;
        Ok(Self {
            size,
            painter: font_painter(font, size.font_size()),
        })
    }

    /// Use `painter` to draw the text lines.
    pub fn with_text_painter(mut self, painter: TextPainter) -> Self {
        self.painter = painter;
        self
    }

    /// Geometry this renderer draws.
    pub fn size(&self) -> ThumbSize {
        self.size
    }

    /// Position every attribute line of `card`, display name first.
    pub fn layout(&self, card: &ContactRecord) -> Vec<TextLine> {
        let (x, mut y) = self.size.text_origin(card.photo.is_some());
        let step = self.size.line_step();

        let name = std::iter::once((CANONICAL_NAME, card.display_name()));
        name.chain(card.details())
            .map(|(key, value)| {
                let line = TextLine {
                    x,
                    y,
                    text: format!("{}: {}", key.to_lowercase(), value),
                };
                y += step;
                line
            })
            .collect()
    }

    /// Build the card image in memory.
    pub fn compose(&mut self, card: &ContactRecord) -> RgbaImage {
        let (width, height) = self.size.canvas();
        let mut canvas = RgbaImage::from_pixel(width, height, BACKGROUND);

        if let Some(photo) = &card.photo {
            let (pw, ph) = self.size.picture();
            let (ox, oy) = self.size.picture_offset();
            let scaled = photo.image.resize_exact(pw, ph, FilterType::Triangle).to_rgba8();
            imageops::overlay(&mut canvas, &scaled, i64::from(ox), i64::from(oy));
        }

        for line in &self.layout(card) {
            (self.painter)(&mut canvas, line, TEXT_COLOR);
        }

        canvas
    }
}

impl CardRenderer for ThumbnailRenderer {
    fn render(&mut self, card: &ContactRecord, dest: &Path) -> Result<()> {
        let canvas = self.compose(card);
        canvas.save_with_format(dest, ImageFormat::Png)?;
        tracing::debug!(record = card.index, path = %dest.display(), "wrote thumbnail");
        Ok(())
    }
}
