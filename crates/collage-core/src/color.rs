use crate::error::CollageError;
use image::Rgb;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Opaque RGB color used for the canvas background and label text.
///
/// Parses `#rgb`, `#rrggbb` or one of a few CSS names; serializes as `#rrggbb`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color(pub [u8; 3]);

impl Color {
    pub const WHITE: Color = Color([255, 255, 255]);
    pub const BLACK: Color = Color([0, 0, 0]);

    pub fn to_rgb(self) -> Rgb<u8> {
        Rgb(self.0)
    }
}

impl FromStr for Color {
    type Err = CollageError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let invalid = || CollageError::InvalidConfig(format!("invalid color: {:?}", s));
        if let Some(hex) = s.strip_prefix('#') {
            if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
                return Err(invalid());
            }
            let nibble = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).map_err(|_| invalid());
            let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid());
            return match hex.len() {
                // #abc expands each digit: a -> aa
                3 => Ok(Color([nibble(0)? * 17, nibble(1)? * 17, nibble(2)? * 17])),
                6 => Ok(Color([byte(0)?, byte(2)?, byte(4)?])),
                _ => Err(invalid()),
            };
        }
        match s.to_ascii_lowercase().as_str() {
            "white" => Ok(Self::WHITE),
            "black" => Ok(Self::BLACK),
            "red" => Ok(Color([255, 0, 0])),
            "green" => Ok(Color([0, 128, 0])),
            "blue" => Ok(Color([0, 0, 255])),
            "yellow" => Ok(Color([255, 255, 0])),
            "gray" | "grey" => Ok(Color([128, 128, 128])),
            _ => Err(invalid()),
        }
    }
}

impl TryFrom<String> for Color {
    type Error = CollageError;
    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Color> for String {
    fn from(c: Color) -> Self {
        c.to_string()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [r, g, b] = self.0;
        write!(f, "#{:02x}{:02x}{:02x}", r, g, b)
    }
}
