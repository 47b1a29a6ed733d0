use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

/// An sRGB color with an alpha channel.
///
/// Unpremultiplied by convention.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color([u8; 4]);

impl Color {
    pub const WHITE: Color = Color::rgb(0xff, 0xff, 0xff);
    pub const BLACK: Color = Color::rgb(0x00, 0x00, 0x00);
    pub const GRAY: Color = Color::rgb(0x88, 0x88, 0x88);

    pub const RED: Color = Color::rgb(0xff, 0x00, 0x00);
    pub const GREEN: Color = Color::rgb(0x00, 0xff, 0x00);
    pub const BLUE: Color = Color::rgb(0x00, 0x00, 0xff);

    pub const YELLOW: Color = Color::rgb(0xff, 0xff, 0x00);
    pub const MAGENTA: Color = Color::rgb(0xff, 0x00, 0xff);
    pub const CYAN: Color = Color::rgb(0x00, 0xff, 0xff);

    pub const BROWN: Color = Color::rgb(0xa5, 0x2a, 0x2a);

    /// Fully transparent. Filling or stroking with it draws nothing.
    pub const NONE: Color = Color::rgba(0x00, 0x00, 0x00, 0x00);

    /// Creates a color from its RGBA components.
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self([r, g, b, a])
    }

    /// Creates a color from RGB components with 100% alpha.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::rgba(r, g, b, u8::MAX)
    }

    /// Gets the red component.
    pub fn red(&self) -> u8 {
        self.0[0]
    }

    /// Gets the green component.
    pub fn green(&self) -> u8 {
        self.0[1]
    }

    /// Gets the blue component.
    pub fn blue(&self) -> u8 {
        self.0[2]
    }

    /// Gets the alpha component.
    pub fn alpha(&self) -> u8 {
        self.0[3]
    }

    pub fn is_transparent(&self) -> bool {
        self.alpha() == 0
    }

    /// Gets the color as an array of values in RGBA order.
    pub fn to_array(&self) -> [u8; 4] {
        self.0
    }

    /// Creates a color from an array of values in RGBA order.
    pub fn from_array(array: [u8; 4]) -> Self {
        Self(array)
    }

    pub(crate) fn to_skia(self) -> tiny_skia::Color {
        tiny_skia::Color::from_rgba8(self.red(), self.green(), self.blue(), self.alpha())
    }
}

impl From<[u8; 4]> for Color {
    fn from(array: [u8; 4]) -> Self {
        Self::from_array(array)
    }
}

impl From<(u8, u8, u8)> for Color {
    fn from((r, g, b): (u8, u8, u8)) -> Self {
        Self::rgb(r, g, b)
    }
}

impl Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let rgba = self.to_array();
        write!(f, "#{:02x}{:02x}{:02x}", rgba[0], rgba[1], rgba[2])?;
        if rgba[3] != u8::MAX {
            write!(f, "{:02x}", rgba[3])?;
        }
        Ok(())
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("invalid color string '{0}'; expected #rrggbb or #rrggbbaa")]
pub struct InvalidColor(String);

impl FromStr for Color {
    type Err = InvalidColor;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s.strip_prefix('#').unwrap_or(s);
        if !(hex.len() == 6 || hex.len() == 8) || !hex.is_ascii() {
            return Err(InvalidColor(s.to_owned()));
        }

        let mut rgba = [u8::MAX; 4];
        for (i, component) in rgba.iter_mut().enumerate().take(hex.len() / 2) {
            *component = u8::from_str_radix(&hex[i * 2..i * 2 + 2], 16)
                .map_err(|_| InvalidColor(s.to_owned()))?;
        }
        Ok(Self(rgba))
    }
}

#[cfg(test)]
mod tests {
    use super::Color;

    #[test]
    fn hex_strings() {
        let color = Color::rgba(255, 254, 1, 255);
        assert_eq!(color.to_string(), "#fffe01");

        let color = Color::rgba(0, 0, 0, 128);
        assert_eq!(color.to_string(), "#00000080");
    }

    #[test]
    fn parse_hex_strings() {
        assert_eq!("#a52a2a".parse::<Color>(), Ok(Color::BROWN));
        assert_eq!("00000000".parse::<Color>(), Ok(Color::NONE));
        assert_eq!("#88888880".parse::<Color>().unwrap().alpha(), 0x80);

        assert!("#fff".parse::<Color>().is_err());
        assert!("#gg0000".parse::<Color>().is_err());
    }

    #[test]
    fn named_colors() {
        assert_eq!(Color::GRAY.to_array(), [0x88, 0x88, 0x88, 0xff]);
        assert_eq!(Color::MAGENTA.to_array(), [0xff, 0x00, 0xff, 0xff]);
        assert!(Color::NONE.is_transparent());
        assert!(!Color::BLACK.is_transparent());
        assert_eq!(Color::from((0, 0xff, 0xff)), Color::CYAN);
    }
}
