use std::path::Path;

use crate::{
    canvas::{Canvas, Region},
    context::{ContextStack, DrawContext},
    presenter::Presenter,
    Color, Error, Font, Image, Result, WindowOptions,
};

/// A window to draw to.
///
/// Drawing happens on a back buffer. [`update`](Window::update) copies the
/// back buffer to the screen. With _auto-update_ enabled (the default),
/// every drawing operation updates the screen right away. Disable it, or
/// use [`draw`](Window::draw), to show many operations at once.
///
/// The window keeps a current [`DrawContext`] (stroke, fill, font and
/// auto-update setting) which can be saved and restored with
/// [`push_context`](Window::push_context) and
/// [`pop_context`](Window::pop_context).
///
/// Dropping a `Window` closes it. Windows belong to the thread that
/// created them:
///
/// ```compile_fail
/// fn assert_send<T: Send>() {}
/// assert_send::<ezdraw::Window>();
/// ```
pub struct Window {
    presenter: Presenter,
    back: Canvas,
    front: Canvas,

    context: DrawContext,
    saved_contexts: ContextStack,

    needs_update: bool,
    presents: u64,
}

impl Window {
    /// Opens a 500x500 window titled with the program name.
    ///
    /// Requires [`ezdraw::init`](crate::init).
    pub fn new() -> Result<Self> {
        Self::builder().build()
    }

    pub fn builder() -> WindowBuilder {
        WindowBuilder::default()
    }

    /// Creates a window with no native counterpart.
    ///
    /// Updates only change the front buffer, which can be read back with
    /// [`screenshot`](Window::screenshot). Does not require `init()`.
    pub fn offscreen(width: u32, height: u32) -> Result<Self> {
        Self::builder().size(width, height).build_offscreen()
    }

    fn with_presenter(presenter: Presenter, (width, height): (u32, u32)) -> Result<Self> {
        let context = DrawContext {
            auto_update: false,
            ..Default::default()
        };
        let mut back = Canvas::new(width, height)?;
        back.clear(context.fill);

        let mut window = Self {
            presenter,
            front: back.clone(),
            back,
            context,
            saved_contexts: ContextStack::default(),
            needs_update: true,
            presents: 0,
        };
        window.set_auto_update(true)?;
        Ok(window)
    }

    pub fn stroke(&self) -> Color {
        self.context.stroke
    }

    pub fn fill(&self) -> Color {
        self.context.fill
    }

    pub fn font(&self) -> Option<&Font> {
        self.context.font.as_ref()
    }

    pub fn set_stroke(&mut self, color: impl Into<Color>) {
        self.context.stroke = color.into();
    }

    pub fn set_fill(&mut self, color: impl Into<Color>) {
        self.context.fill = color.into();
    }

    pub fn set_font(&mut self, font: Font) {
        self.context.font = Some(font);
    }

    /// Gets the current drawing context.
    pub fn context(&self) -> &DrawContext {
        &self.context
    }

    /// Saves the current drawing context.
    pub fn push_context(&mut self) {
        self.saved_contexts.push(self.context.clone());
    }

    /// Restores the most recently saved drawing context.
    ///
    /// Restoring auto-update goes through [`set_auto_update`](Window::set_auto_update),
    /// so turning it back on shows pending drawing.
    pub fn pop_context(&mut self) -> Result<()> {
        let saved = self.saved_contexts.pop()?;
        self.context.stroke = saved.stroke;
        self.context.fill = saved.fill;
        self.context.font = saved.font;
        self.set_auto_update(saved.auto_update)
    }

    /// Number of saved drawing contexts.
    pub fn context_depth(&self) -> usize {
        self.saved_contexts.depth()
    }

    pub fn width(&self) -> u32 {
        self.back.width()
    }

    pub fn height(&self) -> u32 {
        self.back.height()
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width(), self.height())
    }

    /// Fills the window with the fill color.
    pub fn clear(&mut self) -> Result<()> {
        self.back.clear(self.context.fill);
        self.need_update()
    }

    /// Draws a line in the stroke color. Both end points are drawn.
    pub fn line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32) -> Result<()> {
        self.back.line(x0, y0, x1, y1, self.context.stroke);
        self.need_update()
    }

    /// Draws a rectangle between two opposite corners, filled with the fill
    /// color and outlined with the stroke color.
    pub fn rect(&mut self, x0: i32, y0: i32, x1: i32, y1: i32) -> Result<()> {
        self.back
            .rect(x0, y0, x1, y1, self.context.fill, self.context.stroke);
        self.need_update()
    }

    /// Draws a circle filled with the fill color and outlined with the
    /// stroke color.
    pub fn circle(&mut self, x: i32, y: i32, radius: i32) -> Result<()> {
        self.back
            .circle(x, y, radius, self.context.fill, self.context.stroke);
        self.need_update()
    }

    /// Draws a line of text in the stroke color with its top-left corner at `(x, y)`.
    pub fn text(&mut self, x: i32, y: i32, text: &str) -> Result<()> {
        let font = self.context.font.as_ref().ok_or(Error::NoFont)?;
        let rendered = font.render(text, self.context.stroke)?;
        self.back.blit(&rendered, None, Some(Region::at(x, y)));
        self.need_update()
    }

    /// Draws an image at its natural size with its top-left corner at `(x, y)`.
    pub fn image(&mut self, x: i32, y: i32, image: &Image) -> Result<()> {
        self.image_region(None, Some(Region::at(x, y)), image)
    }

    /// Draws the `src` region of an image scaled into the `dst` region of the window.
    ///
    /// `None` selects the whole image or the whole window respectively.
    /// A region without a size takes the size of the image.
    pub fn image_region(
        &mut self,
        src: Option<Region>,
        dst: Option<Region>,
        image: &Image,
    ) -> Result<()> {
        self.back.blit(image, src, dst);
        self.need_update()
    }

    /// Loads an image file and draws it like [`image`](Window::image).
    pub fn image_file(&mut self, x: i32, y: i32, path: impl AsRef<Path>) -> Result<()> {
        let image = Image::open(path)?;
        self.image(x, y, &image)
    }

    pub fn auto_update(&self) -> bool {
        self.context.auto_update
    }

    /// Enables or disables auto-update. Enabling it shows any pending drawing.
    pub fn set_auto_update(&mut self, enable: bool) -> Result<()> {
        if enable && !self.context.auto_update {
            self.update()?;
        }
        self.context.auto_update = enable;
        Ok(())
    }

    /// Runs `f` with auto-update disabled, then restores the previous
    /// setting, showing everything `f` drew at once.
    ///
    /// Calls may be nested; only the outermost one updates the screen.
    /// The previous setting is restored even if `f` fails.
    pub fn draw<R>(&mut self, f: impl FnOnce(&mut Self) -> Result<R>) -> Result<R> {
        let previous = self.context.auto_update;
        self.set_auto_update(false)?;
        let result = f(self);
        self.set_auto_update(previous)?;
        result
    }

    /// Marks the back buffer as changed, updating the screen
    /// if auto-update is enabled.
    pub fn need_update(&mut self) -> Result<()> {
        self.needs_update = true;
        if self.context.auto_update {
            self.update()?;
        }
        Ok(())
    }

    /// Copies the back buffer to the screen if anything changed since the last update.
    pub fn update(&mut self) -> Result<()> {
        if !self.needs_update {
            return Ok(());
        }
        if !self.presenter.is_open() {
            return Err(Error::WindowClosed);
        }
        self.front.copy_from(&self.back);
        self.presenter.present(&self.front)?;
        self.needs_update = false;
        self.presents += 1;
        Ok(())
    }

    /// Closes the window. Closing an already closed window does nothing.
    ///
    /// Drawing still works afterwards, but updating fails with
    /// [`Error::WindowClosed`].
    pub fn close(&mut self) {
        self.presenter.close();
    }

    pub fn is_open(&self) -> bool {
        self.presenter.is_open()
    }

    /// Reads a pixel of the back buffer.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        self.back.pixel(x, y)
    }

    /// Gets the frame currently on screen.
    pub fn screenshot(&self) -> Image {
        self.front.to_image()
    }

    /// Number of frames shown since the window was created.
    pub fn presents(&self) -> u64 {
        self.presents
    }
}

/// Builder for a [`Window`].
#[derive(Debug, Clone, Default)]
pub struct WindowBuilder {
    options: WindowOptions,
}

impl WindowBuilder {
    pub fn size(mut self, width: u32, height: u32) -> Self {
        self.options.width = width;
        self.options.height = height;
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.options.title = Some(title.into());
        self
    }

    pub fn fullscreen(mut self, fullscreen: bool) -> Self {
        self.options.fullscreen = fullscreen;
        self
    }

    /// Replaces all options at once.
    pub fn options(mut self, options: WindowOptions) -> Self {
        self.options = options;
        self
    }

    /// Opens a native window. Requires [`ezdraw::init`](crate::init).
    pub fn build(self) -> Result<Window> {
        let (presenter, size) = Presenter::native(&self.options)?;
        Window::with_presenter(presenter, size)
    }

    /// Creates an offscreen window; see [`Window::offscreen`].
    pub fn build_offscreen(self) -> Result<Window> {
        Window::with_presenter(
            Presenter::Offscreen,
            (self.options.width, self.options.height),
        )
    }
}
