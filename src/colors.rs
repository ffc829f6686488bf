//! Color constants.

use serde::{Deserialize, Serialize};
use std::fmt;

/// 24-bit sRGB color.
#[derive(Serialize, Deserialize, Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Rgb {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}
impl Rgb {
    /// Constructs a color from a `0xRRGGBB` literal.
    pub const fn from_hex(hex: u32) -> Self {
        Self {
            r: ((hex >> 16) & 0xff) as u8,
            g: ((hex >> 8) & 0xff) as u8,
            b: (hex & 0xff) as u8,
        }
    }

    /// Returns the color as floats in the range 0.0 to 1.0.
    pub fn to_floats(self) -> [f32; 3] {
        [
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
        ]
    }
}
impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Cube and cuboid face colors.
#[allow(missing_docs)]
pub mod cube {
    use super::Rgb;

    pub const RIGHT: Rgb = Rgb::from_hex(0xff0000); // red
    pub const LEFT: Rgb = Rgb::from_hex(0xffa500); // orange
    pub const UP: Rgb = Rgb::from_hex(0xffff00); // yellow
    pub const DOWN: Rgb = Rgb::from_hex(0x0000ff); // blue
    pub const FRONT: Rgb = Rgb::from_hex(0xffffff); // white
    pub const BACK: Rgb = Rgb::from_hex(0x00ff00); // green
}

/// Pyraminx face colors.
#[allow(missing_docs)]
pub mod pyraminx {
    use super::Rgb;

    pub const FRONT: Rgb = Rgb::from_hex(0xe94560); // red
    pub const RIGHT: Rgb = Rgb::from_hex(0x4ecca3); // green
    pub const LEFT: Rgb = Rgb::from_hex(0x3498db); // blue
    pub const BOTTOM: Rgb = Rgb::from_hex(0xf1c40f); // yellow
}

/// Square-1 cap and quadrant colors.
#[allow(missing_docs)]
pub mod sq1 {
    use super::Rgb;

    pub const TOP: Rgb = Rgb::from_hex(0xffffff); // white
    pub const BOTTOM: Rgb = Rgb::from_hex(0xffff00); // yellow
    pub const RIGHT: Rgb = Rgb::from_hex(0x0000ff); // blue   (0°, +X)
    pub const FRONT: Rgb = Rgb::from_hex(0xff0000); // red    (90°)
    pub const LEFT: Rgb = Rgb::from_hex(0x00ff00); // green  (180°)
    pub const BACK: Rgb = Rgb::from_hex(0xffa500); // orange (270°)
}

/// Tree-figure accent colors; the six face colors come from [`cube`].
#[allow(missing_docs)]
pub mod tree {
    use super::Rgb;

    pub const TRUNK: Rgb = Rgb::from_hex(0x8b4513); // brown
    pub const INNER: Rgb = Rgb::from_hex(0x111111);
}

#[allow(missing_docs)]
pub const DARK: Rgb = Rgb::from_hex(0x111111);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgb_hex_round_trip() {
        let c = Rgb::from_hex(0xe94560);
        assert_eq!((c.r, c.g, c.b), (0xe9, 0x45, 0x60));
        assert_eq!(c.to_string(), "#e94560");
    }
}
