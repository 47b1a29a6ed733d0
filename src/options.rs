use std::path::Path;

use serde::{Deserialize, Serialize};

/// Options for creating a [`Window`](crate::Window).
///
/// Missing fields take their default values when deserializing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowOptions {
    pub width: u32,
    pub height: u32,
    /// Defaults to the program name.
    pub title: Option<String>,
    /// Covers the current monitor. `width` and `height` are ignored.
    pub fullscreen: bool,
}

impl Default for WindowOptions {
    fn default() -> Self {
        Self {
            width: 500,
            height: 500,
            title: None,
            fullscreen: false,
        }
    }
}

impl WindowOptions {
    pub(crate) fn title_or_program_name(&self) -> String {
        self.title.clone().unwrap_or_else(program_name)
    }
}

fn program_name() -> String {
    std::env::args_os()
        .next()
        .as_deref()
        .and_then(|arg0| Path::new(arg0).file_stem())
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| String::from("ezdraw"))
}
