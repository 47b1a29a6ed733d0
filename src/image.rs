use std::{path::Path, sync::Arc};

use tiny_skia::Pixmap;

use crate::{Color, Error, Result};

/// A decoded RGBA image.
///
/// Cloning an `Image` creates a new handle to the same pixels.
/// The pixels are freed when the last handle is dropped.
#[derive(Clone)]
pub struct Image(Arc<Inner>);

struct Inner {
    // premultiplied, as tiny-skia expects
    pixmap: Pixmap,
}

impl Drop for Inner {
    fn drop(&mut self) {
        log::debug!(
            "destroy image {}x{}",
            self.pixmap.width(),
            self.pixmap.height()
        );
    }
}

impl Image {
    /// Loads an image from a PNG, JPEG or TIFF file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let decoded = ::image::open(path)
            .map_err(|source| Error::Image {
                path: path.to_owned(),
                source,
            })?
            .to_rgba8();
        let (width, height) = decoded.dimensions();
        Self::from_rgba(width, height, decoded.into_raw())
    }

    /// Creates an image from unpremultiplied RGBA pixels in row-major order.
    pub fn from_rgba(width: u32, height: u32, mut data: Vec<u8>) -> Result<Self> {
        let invalid = || Error::InvalidSize { width, height };
        let len = (width as usize)
            .checked_mul(height as usize)
            .and_then(|n| n.checked_mul(4));
        if len != Some(data.len()) {
            return Err(invalid());
        }
        let mut pixmap = Pixmap::new(width, height).ok_or_else(invalid)?;

        for pixel in data.chunks_exact_mut(4) {
            let premultiplied = tiny_skia::ColorU8::from_rgba(pixel[0], pixel[1], pixel[2], pixel[3])
                .premultiply();
            pixel.copy_from_slice(&[
                premultiplied.red(),
                premultiplied.green(),
                premultiplied.blue(),
                premultiplied.alpha(),
            ]);
        }

        pixmap.data_mut().copy_from_slice(&data);
        Ok(Self::from_pixmap(pixmap))
    }

    pub(crate) fn from_pixmap(pixmap: Pixmap) -> Self {
        Self(Arc::new(Inner { pixmap }))
    }

    pub fn width(&self) -> u32 {
        self.0.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.0.pixmap.height()
    }

    /// Gets the color of a pixel, or `None` if the position is out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        if x >= self.width() || y >= self.height() {
            return None;
        }
        self.0.pixmap.pixel(x, y).map(|p| {
            let c = p.demultiply();
            Color::rgba(c.red(), c.green(), c.blue(), c.alpha())
        })
    }

    /// Returns the pixels as unpremultiplied RGBA.
    pub fn to_rgba(&self) -> Vec<u8> {
        self.0
            .pixmap
            .pixels()
            .iter()
            .flat_map(|p| {
                let c = p.demultiply();
                [c.red(), c.green(), c.blue(), c.alpha()]
            })
            .collect()
    }

    /// Saves the image. The format is chosen from the file extension.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        ::image::save_buffer(
            path,
            &self.to_rgba(),
            self.width(),
            self.height(),
            ::image::ColorType::Rgba8,
        )
        .map_err(|source| Error::Image {
            path: path.to_owned(),
            source,
        })
    }

    pub(crate) fn pixmap(&self) -> &Pixmap {
        &self.0.pixmap
    }
}

impl std::fmt::Debug for Image {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Image")
            .field("width", &self.width())
            .field("height", &self.height())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rgba_round_trips_through_premultiplication() {
        let data = vec![
            255, 0, 0, 255, //
            0, 255, 0, 128, //
            0, 0, 0, 0, //
            10, 20, 30, 255,
        ];
        let image = Image::from_rgba(2, 2, data).unwrap();
        assert_eq!(image.width(), 2);
        assert_eq!(image.height(), 2);
        assert_eq!(image.pixel(0, 0), Some(Color::RED));
        assert_eq!(image.pixel(1, 1), Some(Color::rgb(10, 20, 30)));
        assert_eq!(image.pixel(0, 1), Some(Color::NONE));
        assert_eq!(image.pixel(1, 0).unwrap().alpha(), 128);
        assert_eq!(image.pixel(2, 0), None);
        assert_eq!(image.pixel(3, 0), None);
        assert_eq!(image.pixel(0, 2), None);
    }

    #[test]
    fn rejects_mismatched_data() {
        assert!(matches!(
            Image::from_rgba(2, 2, vec![0; 12]),
            Err(Error::InvalidSize { width: 2, height: 2 })
        ));
        assert!(Image::from_rgba(0, 4, Vec::new()).is_err());
        assert!(matches!(
            Image::from_rgba(u32::MAX, u32::MAX, vec![0; 16]),
            Err(Error::InvalidSize { .. })
        ));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = Image::open("does/not/exist.png").unwrap_err();
        assert!(err.to_string().contains("does/not/exist.png"));
    }

    #[test]
    fn save_and_reopen_png() {
        let image = Image::from_rgba(1, 1, vec![0xa5, 0x2a, 0x2a, 0xff]).unwrap();
        let path = std::env::temp_dir().join(format!("ezdraw-save-{}.png", std::process::id()));
        image.save(&path).unwrap();

        let reopened = Image::open(&path).unwrap();
        assert_eq!(reopened.pixel(0, 0), Some(Color::BROWN));
        std::fs::remove_file(path).unwrap();
    }
}
