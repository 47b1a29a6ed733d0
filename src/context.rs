use crate::{Color, Error, Font, Result};

/// The drawing state of a window.
///
/// Shapes are filled with `fill` and outlined with `stroke`.
/// Lines and text use `stroke`.
#[derive(Debug, Clone)]
pub struct DrawContext {
    pub stroke: Color,
    pub fill: Color,
    pub font: Option<Font>,
    pub auto_update: bool,
}

impl Default for DrawContext {
    fn default() -> Self {
        Self {
            stroke: Color::BLACK,
            fill: Color::WHITE,
            font: crate::default_font(),
            auto_update: true,
        }
    }
}

/// A stack of saved [`DrawContext`]s.
#[derive(Debug, Default)]
pub(crate) struct ContextStack {
    saved: Vec<DrawContext>,
}

impl ContextStack {
    pub fn push(&mut self, context: DrawContext) {
        self.saved.push(context);
    }

    pub fn pop(&mut self) -> Result<DrawContext> {
        self.saved.pop().ok_or(Error::ContextStackEmpty)
    }

    pub fn depth(&self) -> usize {
        self.saved.len()
    }
}
