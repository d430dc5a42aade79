//! Packed RGBA colors for cell rendering.

use serde::{Deserialize, Serialize};

/// A color packed as `0xRRGGBBAA`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct Rgba(pub u32);

impl Rgba {
    /// Seal gray.
    pub const WALL: Rgba = Rgba(0x4D5D53FF);
    /// White.
    pub const FLOOR: Rgba = Rgba(0xFFFFFFFF);
    /// Blue.
    pub const ESCAPE: Rgba = Rgba(0x0000FFFF);
    /// Red.
    pub const EMITTER: Rgba = Rgba(0xFF0000FF);

    /// Opaque color from channel values.
    #[inline]
    pub const fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Rgba(((r as u32) << 24) | ((g as u32) << 16) | ((b as u32) << 8) | 0xFF)
    }

    /// Opaque gray of the given lightness.
    #[inline]
    pub const fn gray(l: u8) -> Self {
        Self::from_rgb(l, l, l)
    }

    /// `[r, g, b, a]` bytes, the layout texture uploads expect.
    #[inline]
    pub const fn to_bytes(self) -> [u8; 4] {
        self.0.to_be_bytes()
    }

    #[inline]
    pub const fn r(self) -> u8 {
        self.to_bytes()[0]
    }

    #[inline]
    pub const fn g(self) -> u8 {
        self.to_bytes()[1]
    }

    #[inline]
    pub const fn b(self) -> u8 {
        self.to_bytes()[2]
    }

    #[inline]
    pub const fn a(self) -> u8 {
        self.to_bytes()[3]
    }
}

impl From<u32> for Rgba {
    fn from(v: u32) -> Self {
        Rgba(v)
    }
}

/// Floor-height palette, indexed by `cost + 1` (wall, heights 0-9, escape).
///
/// Used by [`Grid::height_pixels`](super::Grid::height_pixels) for a static
/// terrain view; the simulation itself never paints with it.
pub const HEIGHT_PALETTE: [Rgba; 12] = [
    Rgba(0x5D432CFF),
    Rgba(0xEFEF80FF),
    Rgba(0xDFDF80FF),
    Rgba(0xCFCF80FF),
    Rgba(0xBFBF80FF),
    Rgba(0xAFAF80FF),
    Rgba(0x9F9F80FF),
    Rgba(0x8F8F80FF),
    Rgba(0x7F7F80FF),
    Rgba(0x6F6F80FF),
    Rgba(0x5F5F80FF),
    Rgba(0x0000FFFF),
];

/// Palette color for a cost in `[-1, 10]`; out-of-range costs clamp.
pub fn palette(cost: i8) -> Rgba {
    let idx = (cost.clamp(-1, 10) + 1) as usize;
    HEIGHT_PALETTE[idx]
}

/// Lightness for a density: 255 when empty, 0 when saturated.
#[inline]
pub fn density_lightness(density: f32) -> u8 {
    255 - (255.0 * density) as u8
}

/// Emitter tint: red scales with the emission rate.
#[inline]
pub fn emitter_tint(rate: f32) -> Rgba {
    let l = (255.0 * rate) as u8;
    Rgba::from_rgb(l, 255 - l, 255 - l)
}

/// Escape tint: blue scales with the escape rate.
#[inline]
pub fn escape_tint(rate: f32) -> Rgba {
    let l = (255.0 * rate) as u8;
    Rgba::from_rgb(255 - l, 255 - l, l)
}
