//! Frame differencing primitives.
//!
//! Binary masks use the 0 / 255 convention: any non-zero pixel is foreground.

use image::{GrayImage, Luma, RgbImage};

pub const FOREGROUND: u8 = 255;

/// BT.601 luma in 14-bit fixed point, rounded.
#[inline]
fn luma(r: u8, g: u8, b: u8) -> u8 {
    let y = u32::from(r) * 4899 + u32::from(g) * 9617 + u32::from(b) * 1868 + (1 << 13);
    (y >> 14) as u8
}

/// Per-pixel absolute difference reduced to a single change-intensity channel.
///
/// Both images must have the same dimensions; callers check this.
pub fn luma_diff(before: &RgbImage, after: &RgbImage) -> GrayImage {
    debug_assert_eq!(before.dimensions(), after.dimensions());
    let (width, height) = before.dimensions();
    let mut out = GrayImage::new(width, height);
    for ((dst, a), b) in out.pixels_mut().zip(before.pixels()).zip(after.pixels()) {
        let [r, g, bl] = [
            a[0].abs_diff(b[0]),
            a[1].abs_diff(b[1]),
            a[2].abs_diff(b[2]),
        ];
        *dst = Luma([luma(r, g, bl)]);
    }
    out
}

/// Binary mask of pixels strictly brighter than `level`.
pub fn threshold(diff: &GrayImage, level: u8) -> GrayImage {
    let mut mask = GrayImage::new(diff.width(), diff.height());
    for (dst, src) in mask.pixels_mut().zip(diff.pixels()) {
        if src[0] > level {
            *dst = Luma([FOREGROUND]);
        }
    }
    mask
}

/// Number of pixels strictly brighter than `level`.
pub fn count_above(diff: &GrayImage, level: u8) -> u64 {
    diff.pixels().filter(|p| p[0] > level).count() as u64
}
