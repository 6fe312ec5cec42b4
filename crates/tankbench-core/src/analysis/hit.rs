//! Hit classification around the estimated opponent position.

use image::imageops;
use serde::{Deserialize, Serialize};

use super::diff;
use crate::domain::{Frame, PixelPoint};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HitConfig {
    /// Half the side of the square window inspected around the opponent.
    pub margin: u32,
    /// Per-pixel luma change that counts as "changed" (strictly greater).
    pub diff_threshold: u8,
    /// A hit needs strictly more changed pixels than this.
    pub min_changed_pixels: u64,
}

impl Default for HitConfig {
    fn default() -> Self {
        Self {
            margin: 80,
            diff_threshold: 30,
            min_changed_pixels: 300,
        }
    }
}

/// Pixel window `[x0, x1) x [y0, y1)`, already clamped to the frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub x0: u32,
    pub y0: u32,
    pub x1: u32,
    pub y1: u32,
}

impl Window {
    /// Square of side `2 * margin` centred on `center`, clamped to `width x height`.
    /// `None` when nothing of it lies inside the frame.
    pub fn around(center: PixelPoint, margin: u32, width: u32, height: u32) -> Option<Self> {
        let margin = i64::from(margin);
        let x0 = (center.x - margin).max(0);
        let y0 = (center.y - margin).max(0);
        let x1 = (center.x + margin).min(i64::from(width));
        let y1 = (center.y + margin).min(i64::from(height));

        if x1 <= x0 || y1 <= y0 {
            return None;
        }
        Some(Self {
            x0: x0 as u32,
            y0: y0 as u32,
            x1: x1 as u32,
            y1: y1 as u32,
        })
    }

    pub fn width(&self) -> u32 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> u32 {
        self.y1 - self.y0
    }
}

#[derive(Debug, Clone, Default)]
pub struct HitClassifier {
    config: HitConfig,
}

impl HitClassifier {
    pub fn new(config: HitConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &HitConfig {
        &self.config
    }

    /// Changed pixels inside the window around `center`, or `None` if the
    /// clamped window is empty.
    ///
    /// Frames of different sizes are compared over their common area.
    pub fn changed_pixels(&self, before: &Frame, after: &Frame, center: PixelPoint) -> Option<u64> {
        let width = before.width().min(after.width());
        let height = before.height().min(after.height());
        let w = Window::around(center, self.config.margin, width, height)?;

        let before_crop = imageops::crop_imm(before.image(), w.x0, w.y0, w.width(), w.height()).to_image();
        let after_crop = imageops::crop_imm(after.image(), w.x0, w.y0, w.width(), w.height()).to_image();

        let diff = diff::luma_diff(&before_crop, &after_crop);
        Some(diff::count_above(&diff, self.config.diff_threshold))
    }

    pub fn is_hit(&self, before: &Frame, after: &Frame, center: PixelPoint) -> bool {
        match self.changed_pixels(before, after, center) {
            Some(changed) => {
                tracing::debug!(
                    changed,
                    cutoff = self.config.min_changed_pixels,
                    x = center.x,
                    y = center.y,
                    "opponent window change"
                );
                changed > self.config.min_changed_pixels
            }
            None => false,
        }
    }
}
