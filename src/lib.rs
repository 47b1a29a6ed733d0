//! Easy 2D drawing: open a window, draw lines, rectangles, circles,
//! images and text on it, and wait for a key.
//!
//! ```no_run
//! use ezdraw::{Color, Window};
//!
//! fn main() -> ezdraw::Result<()> {
//!     ezdraw::init()?;
//!     let mut window = Window::builder().title("hello").build()?;
//!     window.set_stroke(Color::BLUE);
//!     window.line(0, 0, window.width() as i32, window.height() as i32)?;
//!     window.text(10, 10, "hello world")?;
//!     ezdraw::waitkey()?;
//!     ezdraw::cleanup()
//! }
//! ```
//!
//! Shapes are rasterized in software with `tiny-skia` and shown through
//! `winit` and `softbuffer`.

mod canvas;
mod color;
mod context;
mod error;
mod font;
mod image;
mod options;
mod presenter;
mod runtime;
mod window;

pub use canvas::Region;
pub use color::{Color, InvalidColor};
pub use context::DrawContext;
pub use error::{Error, Result};
pub use font::{default_font, Font, DEFAULT_FONT_SIZE};
pub use options::WindowOptions;
pub use runtime::{cleanup, delay, init, is_initialized, waitkey};
pub use window::{Window, WindowBuilder};

pub use self::image::Image;
