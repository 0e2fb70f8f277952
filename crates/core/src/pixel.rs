//! RGBA pixel type

/// An 8-bit RGBA pixel.
///
/// The classifier emits only [`Rgba::BLACK`] and [`Rgba::WHITE`]; arbitrary
/// values appear in decoded imagery.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    /// Opaque black (0, 0, 0, 255)
    pub const BLACK: Rgba = Rgba::new(0, 0, 0, 255);

    /// Opaque white (255, 255, 255, 255)
    pub const WHITE: Rgba = Rgba::new(255, 255, 255, 255);

    /// Create a pixel from channel values
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Create an opaque pixel (alpha = 255)
    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Whether this pixel is opaque black or opaque white
    pub fn is_binary(&self) -> bool {
        *self == Self::BLACK || *self == Self::WHITE
    }
}

impl From<[u8; 4]> for Rgba {
    fn from(c: [u8; 4]) -> Self {
        Self::new(c[0], c[1], c[2], c[3])
    }
}

impl From<Rgba> for [u8; 4] {
    fn from(p: Rgba) -> Self {
        [p.r, p.g, p.b, p.a]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_binary_pixels() {
        assert!(Rgba::BLACK.is_binary());
        assert!(Rgba::WHITE.is_binary());
        assert!(!Rgba::opaque(0, 200, 0).is_binary());
        // Translucent black is not a valid mask value
        assert!(!Rgba::new(0, 0, 0, 128).is_binary());
    }

    #[test]
    fn test_array_roundtrip() {
        let p = Rgba::new(12, 34, 56, 78);
        let arr: [u8; 4] = p.into();
        assert_eq!(Rgba::from(arr), p);
    }
}
