//! TrueType/OpenType fonts.
//!
//! Glyphs are rasterized by `fontdue`. The default font is looked
//! up among the system fonts with `fontdb`.

use std::{
    fmt,
    path::{Path, PathBuf},
    sync::Arc,
};

use fontdue::{FontSettings, LineMetrics};
use once_cell::sync::Lazy;

use crate::{Color, Error, Image, Result};

/// Pixel height of the default font.
pub const DEFAULT_FONT_SIZE: f32 = 20.;

/// Families tried, in order, when looking for the default font.
const DEFAULT_FAMILIES: &[fontdb::Family<'static>] = &[
    fontdb::Family::Name("Anonymous Pro"),
    fontdb::Family::Name("DejaVu Sans Mono"),
    fontdb::Family::Name("Liberation Mono"),
    fontdb::Family::Name("Noto Sans Mono"),
    fontdb::Family::Monospace,
    fontdb::Family::SansSerif,
];

static DEFAULT_FACE: Lazy<Option<Arc<Face>>> = Lazy::new(|| {
    let face = load_system_face();
    if face.is_none() {
        log::warn!("No usable system font found; text drawing needs an explicit font");
    }
    face.map(Arc::new)
});

/// Gets the default font: a system monospace face at [`DEFAULT_FONT_SIZE`].
///
/// The system fonts are scanned on the first call only.
/// Returns `None` if the system has no usable font.
pub fn default_font() -> Option<Font> {
    DEFAULT_FACE.as_ref().map(|face| Font {
        face: Arc::clone(face),
        size: DEFAULT_FONT_SIZE,
    })
}

fn load_system_face() -> Option<Face> {
    let mut db = fontdb::Database::new();
    db.load_system_fonts();

    let query = fontdb::Query {
        families: DEFAULT_FAMILIES,
        weight: fontdb::Weight::NORMAL,
        stretch: fontdb::Stretch::Normal,
        style: fontdb::Style::Normal,
    };
    let id = db
        .query(&query)
        .or_else(|| db.faces().first().map(|face| face.id))?;

    db.with_face_data(id, |data, index| {
        fontdue::Font::from_bytes(
            data,
            FontSettings {
                collection_index: index,
                ..Default::default()
            },
        )
    })?
    .map(|font| Face { font, path: None })
    .map_err(|e| log::warn!("Failed to parse system font: {}", e))
    .ok()
}

struct Face {
    font: fontdue::Font,
    path: Option<PathBuf>,
}

impl Drop for Face {
    fn drop(&mut self) {
        match &self.path {
            Some(path) => log::debug!("destroy font {}", path.display()),
            None => log::debug!("destroy font <memory>"),
        }
    }
}

/// A font face at a fixed pixel size.
///
/// Cloning a `Font` is cheap; clones share the parsed face.
#[derive(Clone)]
pub struct Font {
    face: Arc<Face>,
    size: f32,
}

impl Font {
    /// Loads a font file at the given pixel height.
    pub fn open(path: impl AsRef<Path>, size: f32) -> Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read(path)?;
        Self::parse(&data, size, Some(path.to_owned()))
    }

    /// Parses TTF/OTF font data at the given pixel height.
    pub fn from_bytes(data: &[u8], size: f32) -> Result<Self> {
        Self::parse(data, size, None)
    }

    fn parse(data: &[u8], size: f32, path: Option<PathBuf>) -> Result<Self> {
        let font = fontdue::Font::from_bytes(data, FontSettings::default()).map_err(|reason| {
            Error::Font {
                path: path.clone(),
                reason,
            }
        })?;
        Ok(Self {
            face: Arc::new(Face { font, path }),
            size,
        })
    }

    /// Returns the same face at a different size.
    pub fn with_size(&self, size: f32) -> Self {
        Self {
            face: Arc::clone(&self.face),
            size,
        }
    }

    pub fn size(&self) -> f32 {
        self.size
    }

    /// The maximum height of a line of text: ascent plus descent.
    pub fn height(&self) -> u32 {
        let metrics = self.line_metrics();
        (metrics.ascent - metrics.descent).ceil().max(1.) as u32
    }

    /// The recommended distance between two baselines.
    pub fn line_pitch(&self) -> u32 {
        self.line_metrics().new_line_size.ceil().max(1.) as u32
    }

    /// Computes the size of the image [`render`](Self::render) would produce.
    pub fn measure(&self, text: &str) -> (u32, u32) {
        let (_, advance) = self.layout(text);
        (advance.ceil().max(1.) as u32, self.height())
    }

    /// Renders a single line of text.
    ///
    /// The result is as tall as [`height`](Self::height); the baseline
    /// lies at the font's ascent.
    pub fn render(&self, text: &str, color: Color) -> Result<Image> {
        let (glyphs, advance) = self.layout(text);
        let width = advance.ceil().max(1.) as u32;
        let height = self.height();
        let baseline = self.line_metrics().ascent.round() as i32;

        let mut coverage = vec![0u8; width as usize * height as usize];
        for (pen, c) in glyphs {
            let (metrics, bitmap) = self.face.font.rasterize(c, self.size);
            let left = pen.round() as i32 + metrics.xmin;
            let top = baseline - metrics.ymin - metrics.height as i32;
            for gy in 0..metrics.height {
                let y = top + gy as i32;
                if y < 0 || y >= height as i32 {
                    continue;
                }
                for gx in 0..metrics.width {
                    let x = left + gx as i32;
                    if x < 0 || x >= width as i32 {
                        continue;
                    }
                    let dst = &mut coverage[y as usize * width as usize + x as usize];
                    *dst = (*dst).max(bitmap[gy * metrics.width + gx]);
                }
            }
        }

        let data = coverage
            .into_iter()
            .flat_map(|c| {
                let alpha = (c as u32 * color.alpha() as u32 + 127) / 255;
                [color.red(), color.green(), color.blue(), alpha as u8]
            })
            .collect();
        Image::from_rgba(width, height, data)
    }

    /// Lays out `text` on a single line. Returns the pen position
    /// of each glyph and the total advance.
    fn layout(&self, text: &str) -> (Vec<(f32, char)>, f32) {
        let font = &self.face.font;
        let mut glyphs = Vec::with_capacity(text.len());
        let mut pen = 0.;
        let mut previous = None;
        for c in text.chars() {
            if let Some(previous) = previous {
                pen += font.horizontal_kern(previous, c, self.size).unwrap_or(0.);
            }
            glyphs.push((pen, c));
            pen += font.metrics(c, self.size).advance_width;
            previous = Some(c);
        }
        (glyphs, pen)
    }

    fn line_metrics(&self) -> LineMetrics {
        self.face
            .font
            .horizontal_line_metrics(self.size)
            .unwrap_or(LineMetrics {
                ascent: self.size,
                descent: 0.,
                line_gap: 0.,
                new_line_size: self.size,
            })
    }
}

impl fmt::Debug for Font {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Font")
            .field("path", &self.face.path)
            .field("size", &self.size)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_malformed_data() {
        let err = Font::from_bytes(b"definitely not a font", 12.).unwrap_err();
        assert!(matches!(err, Error::Font { path: None, .. }));
    }

    #[test]
    fn missing_file() {
        assert!(matches!(
            Font::open("no/such/font.ttf", 12.),
            Err(Error::Io(_))
        ));
    }

    // The remaining tests need at least one font installed on the system.

    #[test]
    fn default_font_metrics() {
        let Some(font) = default_font() else { return };
        assert_eq!(font.size(), DEFAULT_FONT_SIZE);
        assert!(font.height() >= 10);
        assert!(font.line_pitch() >= font.height() - 1);

        let bigger = font.with_size(80.);
        assert!(bigger.height() > font.height());
    }

    #[test]
    fn render_matches_measure() {
        let Some(font) = default_font() else { return };
        let image = font.render("hello world", Color::GREEN).unwrap();
        assert_eq!((image.width(), image.height()), font.measure("hello world"));
        assert!(font.measure("hello world").0 > font.measure("hello").0);

        let pixels = image.to_rgba();
        let inked = pixels.chunks_exact(4).filter(|p| p[3] > 0).count();
        assert!(inked > 0);
        // every inked pixel carries the text color
        assert!(pixels
            .chunks_exact(4)
            .filter(|p| p[3] > 128)
            .all(|p| p[0] == 0 && p[1] == 0xff && p[2] == 0));
    }

    #[test]
    fn empty_text_renders_transparent() {
        let Some(font) = default_font() else { return };
        let image = font.render("", Color::BLACK).unwrap();
        assert_eq!(image.width(), 1);
        assert_eq!(image.height(), font.height());
        assert!(image.to_rgba().chunks_exact(4).all(|p| p[3] == 0));
    }
}
