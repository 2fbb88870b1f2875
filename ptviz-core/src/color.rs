//! RGB colors and the one-letter color table

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// An RGB color with components in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const RED: Rgb = Rgb::new(1.0, 0.0, 0.0);
    pub const GREEN: Rgb = Rgb::new(0.0, 1.0, 0.0);
    pub const BLUE: Rgb = Rgb::new(0.0, 0.0, 1.0);
    pub const CYAN: Rgb = Rgb::new(0.0, 1.0, 1.0);
    pub const MAGENTA: Rgb = Rgb::new(1.0, 0.0, 1.0);
    pub const YELLOW: Rgb = Rgb::new(1.0, 1.0, 0.0);
    pub const BLACK: Rgb = Rgb::new(0.0, 0.0, 0.0);
    pub const WHITE: Rgb = Rgb::new(1.0, 1.0, 1.0);

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Convert an 8-bit color
    pub fn from_u8(color: [u8; 3]) -> Self {
        Self::new(
            color[0] as f32 / 255.0,
            color[1] as f32 / 255.0,
            color[2] as f32 / 255.0,
        )
    }

    pub fn to_array(self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }
}

impl From<[f32; 3]> for Rgb {
    fn from(c: [f32; 3]) -> Self {
        Self::new(c[0], c[1], c[2])
    }
}

impl From<(f32, f32, f32)> for Rgb {
    fn from((r, g, b): (f32, f32, f32)) -> Self {
        Self::new(r, g, b)
    }
}

/// Look up a one-letter color code (`r g b c m y k w`)
pub fn color_from_char(c: char) -> Result<Rgb> {
    match c {
        'r' => Ok(Rgb::RED),
        'g' => Ok(Rgb::GREEN),
        'b' => Ok(Rgb::BLUE),
        'c' => Ok(Rgb::CYAN),
        'm' => Ok(Rgb::MAGENTA),
        'y' => Ok(Rgb::YELLOW),
        'k' => Ok(Rgb::BLACK),
        'w' => Ok(Rgb::WHITE),
        other => Err(Error::UnknownColor(other)),
    }
}

impl TryFrom<char> for Rgb {
    type Error = Error;

    fn try_from(c: char) -> Result<Self> {
        color_from_char(c)
    }
}

impl FromStr for Rgb {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => color_from_char(c),
            _ => Err(Error::InvalidData(format!(
                "color code must be a single character, got {:?}",
                s
            ))),
        }
    }
}
