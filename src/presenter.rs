use std::{marker::PhantomData, num::NonZeroU32, rc::Rc};

use winit::{
    dpi::PhysicalSize,
    event_loop::EventLoopWindowTarget,
    window::{Fullscreen, WindowBuilder, WindowId},
};

use crate::{
    canvas::Canvas,
    runtime::{self, WindowKey},
    Error, Result, WindowOptions,
};

type NativeWindow = Rc<winit::window::Window>;

/// A native window plus the `softbuffer` surface used
/// to copy frames to it.
pub(crate) struct NativeSurface {
    window: NativeWindow,
    surface: softbuffer::Surface<NativeWindow, NativeWindow>,
    // kept so the window can be redrawn when the OS asks for it
    frame: Vec<u32>,
    frame_width: u32,
    frame_height: u32,
}

impl NativeSurface {
    /// Opens a window. Returns the surface and the size of its drawable area.
    pub fn open(
        target: &EventLoopWindowTarget<()>,
        options: &WindowOptions,
    ) -> Result<(Self, (u32, u32))> {
        let mut builder = WindowBuilder::new()
            .with_title(options.title_or_program_name())
            .with_resizable(false);
        builder = if options.fullscreen {
            builder.with_fullscreen(Some(Fullscreen::Borderless(None)))
        } else {
            builder.with_inner_size(PhysicalSize::new(options.width, options.height))
        };
        let window = Rc::new(builder.build(target)?);

        let size = if options.fullscreen {
            window
                .current_monitor()
                .map(|monitor| monitor.size())
                .unwrap_or_else(|| window.inner_size())
        } else {
            PhysicalSize::new(options.width, options.height)
        };

        let context = softbuffer::Context::new(Rc::clone(&window))?;
        let surface = softbuffer::Surface::new(&context, Rc::clone(&window))?;

        Ok((
            Self {
                window,
                surface,
                frame: Vec::new(),
                frame_width: 0,
                frame_height: 0,
            },
            (size.width, size.height),
        ))
    }

    pub fn id(&self) -> WindowId {
        self.window.id()
    }

    pub fn present(&mut self, frame: &Canvas) -> Result<()> {
        self.frame = frame.to_argb();
        self.frame_width = frame.width();
        self.frame_height = frame.height();
        self.redraw()
    }

    /// Presents the last frame again.
    pub fn redraw(&mut self) -> Result<()> {
        let (width, height) = match (
            NonZeroU32::new(self.frame_width),
            NonZeroU32::new(self.frame_height),
        ) {
            (Some(width), Some(height)) => (width, height),
            _ => return Ok(()),
        };

        self.surface.resize(width, height)?;
        let mut buffer = self.surface.buffer_mut()?;
        buffer.copy_from_slice(&self.frame);
        buffer.present()?;
        Ok(())
    }
}

impl Drop for NativeSurface {
    fn drop(&mut self) {
        log::debug!("destroy window {:?}", self.window.id());
    }
}

/// Owns a native window registered with the runtime and closes it on drop.
///
/// The window lives in a thread-local registry, so the handle must not
/// leave the thread that opened it.
pub(crate) struct NativeHandle {
    key: WindowKey,
    _not_send: PhantomData<Rc<()>>,
}

impl Drop for NativeHandle {
    fn drop(&mut self) {
        runtime::close_window(self.key);
    }
}

/// Where a window's frames go when it is updated.
pub(crate) enum Presenter {
    /// A native window registered with the runtime.
    Native(NativeHandle),
    /// No native window. Frames are only kept in the window's front buffer.
    Offscreen,
    Closed,
}

impl Presenter {
    /// Opens a native window. Requires `ezdraw::init()`.
    pub fn native(options: &WindowOptions) -> Result<(Self, (u32, u32))> {
        if !options.fullscreen && (options.width == 0 || options.height == 0) {
            return Err(Error::InvalidSize {
                width: options.width,
                height: options.height,
            });
        }
        let (key, size) = runtime::open_window(options)?;
        let handle = NativeHandle {
            key,
            _not_send: PhantomData,
        };
        Ok((Presenter::Native(handle), size))
    }

    pub fn is_open(&self) -> bool {
        match self {
            Presenter::Native(handle) => runtime::is_window_open(handle.key),
            Presenter::Offscreen => true,
            Presenter::Closed => false,
        }
    }

    pub fn present(&mut self, frame: &Canvas) -> Result<()> {
        match self {
            Presenter::Native(handle) => {
                runtime::with_window(handle.key, |surface| surface.present(frame))?;
                runtime::poll_events();
                Ok(())
            }
            Presenter::Offscreen => Ok(()),
            Presenter::Closed => Err(Error::WindowClosed),
        }
    }

    /// Closes the window. Closing twice is a no-op.
    pub fn close(&mut self) {
        // dropping a native handle unregisters its window
        *self = Presenter::Closed;
    }
}
