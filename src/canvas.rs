use tiny_skia::{
    FillRule, FilterQuality, Paint, PathBuilder, Pattern, Pixmap, Rect, SpreadMode, Stroke,
    Transform,
};

use crate::{Color, Error, Image, Result};

/// A rectangular region of an image or canvas, in pixels.
///
/// If `size` is `None`, the size of the image being drawn is used.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Region {
    pub x: i32,
    pub y: i32,
    pub size: Option<(u32, u32)>,
}

impl Region {
    /// A region positioned at `(x, y)` with an implied size.
    pub fn at(x: i32, y: i32) -> Self {
        Self { x, y, size: None }
    }

    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            size: Some((width, height)),
        }
    }
}

impl From<(i32, i32)> for Region {
    fn from((x, y): (i32, i32)) -> Self {
        Self::at(x, y)
    }
}

impl From<(i32, i32, u32, u32)> for Region {
    fn from((x, y, width, height): (i32, i32, u32, u32)) -> Self {
        Self::new(x, y, width, height)
    }
}

/// A pixel buffer with the drawing primitives a window exposes.
///
/// Shapes are drawn without anti-aliasing and cover whole pixels.
/// All corner coordinates are inclusive.
#[derive(Clone)]
pub(crate) struct Canvas {
    pixmap: Pixmap,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> Result<Self> {
        let pixmap = Pixmap::new(width, height).ok_or(Error::InvalidSize { width, height })?;
        Ok(Self { pixmap })
    }

    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    /// Sets every pixel to `color`, replacing the previous contents.
    pub fn clear(&mut self, color: Color) {
        self.pixmap.fill(color.to_skia());
    }

    pub fn line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: Color) {
        if color.is_transparent() {
            return;
        }

        if x0 == x1 || y0 == y1 {
            self.fill_span(x0, y0, x1, y1, color);
            return;
        }

        let mut builder = PathBuilder::new();
        builder.move_to(x0 as f32 + 0.5, y0 as f32 + 0.5);
        builder.line_to(x1 as f32 + 0.5, y1 as f32 + 0.5);
        if let Some(path) = builder.finish() {
            self.pixmap.stroke_path(
                &path,
                &solid_paint(color),
                &Stroke::default(),
                Transform::identity(),
                None,
            );
        }
        // hairlines may leave out their end points
        self.fill_span(x0, y0, x0, y0, color);
        self.fill_span(x1, y1, x1, y1, color);
    }

    /// Draws a filled box with a one-pixel outline.
    pub fn rect(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, fill: Color, stroke: Color) {
        let (left, right) = (x0.min(x1), x0.max(x1));
        let (top, bottom) = (y0.min(y1), y0.max(y1));

        self.fill_span(left, top, right, bottom, fill);

        self.fill_span(left, top, right, top, stroke);
        self.fill_span(left, bottom, right, bottom, stroke);
        self.fill_span(left, top, left, bottom, stroke);
        self.fill_span(right, top, right, bottom, stroke);
    }

    /// Draws a filled disk with a one-pixel outline.
    pub fn circle(&mut self, x: i32, y: i32, radius: i32, fill: Color, stroke: Color) {
        if radius <= 0 {
            return;
        }
        let path = match PathBuilder::from_circle(x as f32 + 0.5, y as f32 + 0.5, radius as f32) {
            Some(path) => path,
            None => return,
        };

        if !fill.is_transparent() {
            self.pixmap.fill_path(
                &path,
                &solid_paint(fill),
                FillRule::Winding,
                Transform::identity(),
                None,
            );
        }
        if !stroke.is_transparent() {
            self.pixmap.stroke_path(
                &path,
                &solid_paint(stroke),
                &Stroke::default(),
                Transform::identity(),
                None,
            );
        }
    }

    /// Copies the `src` region of `image` to the `dst` region of the canvas,
    /// scaling as needed.
    ///
    /// `src = None` selects the whole image and `dst = None` the whole canvas.
    /// The source region is clipped to the image bounds.
    pub fn blit(&mut self, image: &Image, src: Option<Region>, dst: Option<Region>) {
        let image_size = (image.width(), image.height());
        let src = src.unwrap_or(Region::new(0, 0, image_size.0, image_size.1));
        let dst = dst.unwrap_or(Region::new(0, 0, self.width(), self.height()));
        let (src_width, src_height) = src.size.unwrap_or(image_size);
        let (dst_width, dst_height) = dst.size.unwrap_or(image_size);
        if src_width == 0 || src_height == 0 || dst_width == 0 || dst_height == 0 {
            return;
        }

        let scale_x = dst_width as f32 / src_width as f32;
        let scale_y = dst_height as f32 / src_height as f32;

        // i64 so far-out regions cannot overflow
        let (src_x, src_y) = (src.x as i64, src.y as i64);
        let clip_left = src_x.max(0);
        let clip_top = src_y.max(0);
        let clip_right = (src_x + src_width as i64).min(image_size.0 as i64);
        let clip_bottom = (src_y + src_height as i64).min(image_size.1 as i64);
        if clip_right <= clip_left || clip_bottom <= clip_top {
            return;
        }

        let target = Rect::from_xywh(
            dst.x as f32 + (clip_left - src_x) as f32 * scale_x,
            dst.y as f32 + (clip_top - src_y) as f32 * scale_y,
            (clip_right - clip_left) as f32 * scale_x,
            (clip_bottom - clip_top) as f32 * scale_y,
        );
        let target = match target {
            Some(target) => target,
            None => return,
        };

        // maps image pixels onto the destination region
        let transform = Transform::from_row(
            scale_x,
            0.,
            0.,
            scale_y,
            dst.x as f32 - src.x as f32 * scale_x,
            dst.y as f32 - src.y as f32 * scale_y,
        );
        let paint = Paint {
            shader: Pattern::new(
                image.pixmap().as_ref(),
                SpreadMode::Pad,
                FilterQuality::Nearest,
                1.,
                transform,
            ),
            anti_alias: false,
            ..Default::default()
        };
        self.pixmap
            .fill_rect(target, &paint, Transform::identity(), None);
    }

    /// Gets the color of a pixel, or `None` if the position is out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        if x >= self.width() || y >= self.height() {
            return None;
        }
        self.pixmap.pixel(x, y).map(|p| {
            let c = p.demultiply();
            Color::rgba(c.red(), c.green(), c.blue(), c.alpha())
        })
    }

    /// Returns the pixels as `0x00RRGGBB` words, composited over black.
    pub fn to_argb(&self) -> Vec<u32> {
        self.pixmap
            .pixels()
            .iter()
            .map(|p| (p.red() as u32) << 16 | (p.green() as u32) << 8 | p.blue() as u32)
            .collect()
    }

    /// Overwrites this canvas with the contents of another of the same size.
    pub fn copy_from(&mut self, other: &Canvas) {
        if self.pixmap.width() == other.pixmap.width()
            && self.pixmap.height() == other.pixmap.height()
        {
            self.pixmap.data_mut().copy_from_slice(other.pixmap.data());
        } else {
            self.pixmap = other.pixmap.clone();
        }
    }

    pub fn to_image(&self) -> Image {
        Image::from_pixmap(self.pixmap.clone())
    }

    /// Fills the pixels from `(x0, y0)` to `(x1, y1)` inclusive.
    fn fill_span(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: Color) {
        if color.is_transparent() {
            return;
        }
        let (left, right) = (x0.min(x1), x0.max(x1));
        let (top, bottom) = (y0.min(y1), y0.max(y1));
        if let Some(rect) = Rect::from_ltrb(
            left as f32,
            top as f32,
            right as f32 + 1.,
            bottom as f32 + 1.,
        ) {
            self.pixmap
                .fill_rect(rect, &solid_paint(color), Transform::identity(), None);
        }
    }
}

fn solid_paint(color: Color) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color(color.to_skia());
    paint.anti_alias = false;
    paint
}

#[cfg(test)]
mod tests {
    use super::*;

    fn canvas() -> Canvas {
        let mut canvas = Canvas::new(100, 100).unwrap();
        canvas.clear(Color::WHITE);
        canvas
    }

    fn checker() -> Image {
        // 2x2: red, green / blue, yellow
        Image::from_rgba(
            2,
            2,
            vec![
                255, 0, 0, 255, 0, 255, 0, 255, //
                0, 0, 255, 255, 255, 255, 0, 255,
            ],
        )
        .unwrap()
    }

    #[test]
    fn zero_size_is_an_error() {
        assert!(matches!(
            Canvas::new(0, 10),
            Err(Error::InvalidSize {
                width: 0,
                height: 10
            })
        ));
    }

    #[test]
    fn clear_replaces_contents() {
        let mut canvas = canvas();
        canvas.clear(Color::NONE);
        assert_eq!(canvas.pixel(50, 50), Some(Color::NONE));
        canvas.clear(Color::GRAY);
        assert_eq!(canvas.pixel(0, 99), Some(Color::GRAY));
    }

    #[test]
    fn horizontal_line_includes_end_points() {
        let mut canvas = canvas();
        canvas.line(10, 20, 30, 20, Color::BLUE);
        assert_eq!(canvas.pixel(10, 20), Some(Color::BLUE));
        assert_eq!(canvas.pixel(20, 20), Some(Color::BLUE));
        assert_eq!(canvas.pixel(30, 20), Some(Color::BLUE));
        assert_eq!(canvas.pixel(31, 20), Some(Color::WHITE));
        assert_eq!(canvas.pixel(20, 21), Some(Color::WHITE));
        assert_eq!(canvas.pixel(20, 19), Some(Color::WHITE));
    }

    #[test]
    fn diagonal_line() {
        let mut canvas = canvas();
        canvas.line(0, 0, 99, 99, Color::RED);
        assert_eq!(canvas.pixel(0, 0), Some(Color::RED));
        assert_eq!(canvas.pixel(99, 99), Some(Color::RED));
        assert_eq!(canvas.pixel(50, 50), Some(Color::RED));
        assert_eq!(canvas.pixel(90, 10), Some(Color::WHITE));
    }

    #[test]
    fn rect_fill_and_outline() {
        let mut canvas = canvas();
        // corners given in reverse order
        canvas.rect(50, 50, 10, 10, Color::GRAY, Color::BLACK);
        assert_eq!(canvas.pixel(30, 30), Some(Color::GRAY));
        assert_eq!(canvas.pixel(10, 10), Some(Color::BLACK));
        assert_eq!(canvas.pixel(50, 30), Some(Color::BLACK));
        assert_eq!(canvas.pixel(30, 50), Some(Color::BLACK));
        assert_eq!(canvas.pixel(11, 11), Some(Color::GRAY));
        assert_eq!(canvas.pixel(51, 30), Some(Color::WHITE));
        assert_eq!(canvas.pixel(9, 30), Some(Color::WHITE));
    }

    #[test]
    fn transparent_fill_keeps_background() {
        let mut canvas = canvas();
        canvas.rect(10, 10, 50, 50, Color::NONE, Color::RED);
        assert_eq!(canvas.pixel(30, 30), Some(Color::WHITE));
        assert_eq!(canvas.pixel(10, 30), Some(Color::RED));
    }

    #[test]
    fn circle() {
        let mut canvas = canvas();
        canvas.circle(50, 50, 20, Color::YELLOW, Color::BROWN);
        assert_eq!(canvas.pixel(50, 50), Some(Color::YELLOW));
        assert_eq!(canvas.pixel(60, 50), Some(Color::YELLOW));
        assert_eq!(canvas.pixel(5, 5), Some(Color::WHITE));
        assert_eq!(canvas.pixel(50, 80), Some(Color::WHITE));

        let before = canvas.to_argb();
        canvas.circle(50, 50, 0, Color::RED, Color::RED);
        assert_eq!(canvas.to_argb(), before);
    }

    #[test]
    fn blit_at_natural_size() {
        let mut canvas = canvas();
        let image = checker();
        canvas.blit(&image, None, Some(Region::at(10, 20)));
        assert_eq!(canvas.pixel(10, 20), Some(Color::RED));
        assert_eq!(canvas.pixel(11, 20), Some(Color::GREEN));
        assert_eq!(canvas.pixel(10, 21), Some(Color::BLUE));
        assert_eq!(canvas.pixel(11, 21), Some(Color::YELLOW));
        assert_eq!(canvas.pixel(12, 20), Some(Color::WHITE));
        assert_eq!(canvas.pixel(10, 22), Some(Color::WHITE));
    }

    #[test]
    fn blit_scaled_source_region() {
        let mut canvas = canvas();
        let image = checker();
        // bottom-right pixel stretched to 10x10
        canvas.blit(
            &image,
            Some(Region::new(1, 1, 1, 1)),
            Some(Region::new(0, 0, 10, 10)),
        );
        assert_eq!(canvas.pixel(0, 0), Some(Color::YELLOW));
        assert_eq!(canvas.pixel(9, 9), Some(Color::YELLOW));
        assert_eq!(canvas.pixel(10, 10), Some(Color::WHITE));
    }

    #[test]
    fn blit_fills_whole_canvas_without_destination() {
        let mut canvas = canvas();
        canvas.blit(&checker(), None, None);
        assert_eq!(canvas.pixel(10, 10), Some(Color::RED));
        assert_eq!(canvas.pixel(90, 10), Some(Color::GREEN));
        assert_eq!(canvas.pixel(10, 90), Some(Color::BLUE));
        assert_eq!(canvas.pixel(90, 90), Some(Color::YELLOW));
    }

    #[test]
    fn blit_outside_source_draws_nothing() {
        let mut canvas = canvas();
        canvas.blit(
            &checker(),
            Some(Region::new(5, 5, 2, 2)),
            Some(Region::at(0, 0)),
        );
        assert!(canvas.to_argb().iter().all(|&p| p == 0x00ff_ffff));
    }

    #[test]
    fn blit_far_out_source_draws_nothing() {
        let mut canvas = canvas();
        canvas.blit(&checker(), Some(Region::new(i32::MAX, 0, 2, 2)), None);
        canvas.blit(&checker(), Some(Region::new(2, 0, u32::MAX, 1)), None);
        assert!(canvas.to_argb().iter().all(|&p| p == 0x00ff_ffff));

        // must not overflow while clipping
        canvas.blit(
            &checker(),
            Some(Region::new(1, 0, i32::MAX as u32, 1)),
            Some(Region::at(0, 0)),
        );
        canvas.blit(
            &checker(),
            Some(Region::new(i32::MIN, i32::MIN, u32::MAX, u32::MAX)),
            None,
        );
    }

    #[test]
    fn pixel_out_of_bounds() {
        let canvas = Canvas::new(4, 2).unwrap();
        assert!(canvas.pixel(3, 1).is_some());
        assert_eq!(canvas.pixel(4, 0), None);
        assert_eq!(canvas.pixel(0, 2), None);
    }

    #[test]
    fn argb_composites_over_black() {
        let mut canvas = Canvas::new(2, 1).unwrap();
        canvas.clear(Color::rgb(0x12, 0x34, 0x56));
        assert_eq!(canvas.to_argb(), vec![0x0012_3456; 2]);

        canvas.clear(Color::NONE);
        assert_eq!(canvas.to_argb(), vec![0; 2]);
    }

    #[test]
    fn copy_from_other_canvas() {
        let mut back = canvas();
        back.line(0, 5, 99, 5, Color::GREEN);
        let mut front = Canvas::new(100, 100).unwrap();
        front.copy_from(&back);
        assert_eq!(front.pixel(42, 5), Some(Color::GREEN));
        assert_eq!(front.to_image().pixel(42, 5), Some(Color::GREEN));
    }
}
