//! Impact localization: the largest changed region of a binary mask.

use image::GrayImage;
use serde::{Deserialize, Serialize};

use crate::domain::PixelPoint;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocalizerConfig {
    /// A region qualifies only when its pixel area is strictly greater than this.
    pub min_area: u64,
}

impl Default for LocalizerConfig {
    fn default() -> Self {
        Self { min_area: 100 }
    }
}

/// Largest changed region: its centroid and pixel area.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Impact {
    pub center: PixelPoint,
    pub area: u64,
}

/// Raw moments of one connected region.
#[derive(Debug, Clone, Copy, Default)]
struct Region {
    m00: u64,
    m10: u64,
    m01: u64,
}

impl Region {
    fn centroid(&self) -> Option<PixelPoint> {
        if self.m00 == 0 {
            return None;
        }
        Some(PixelPoint::new(
            (self.m10 / self.m00) as i64,
            (self.m01 / self.m00) as i64,
        ))
    }
}

#[derive(Debug, Clone, Default)]
pub struct ImpactLocalizer {
    config: LocalizerConfig,
}

impl ImpactLocalizer {
    pub fn new(config: LocalizerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &LocalizerConfig {
        &self.config
    }

    /// Centroid and area of the largest 8-connected foreground region.
    ///
    /// Returns `None` when the mask is empty or the largest region is not
    /// larger than `min_area`. Ties keep the region found first in
    /// row-major order.
    pub fn locate(&self, mask: &GrayImage) -> Option<Impact> {
        let largest = regions(mask).into_iter().fold(None, |best: Option<Region>, r| {
            match best {
                Some(b) if b.m00 >= r.m00 => Some(b),
                _ => Some(r),
            }
        })?;

        if largest.m00 <= self.config.min_area {
            tracing::debug!(
                area = largest.m00,
                min_area = self.config.min_area,
                "largest changed region too small"
            );
            return None;
        }

        Some(Impact {
            center: largest.centroid()?,
            area: largest.m00,
        })
    }
}

/// Flood-fill every 8-connected foreground component.
fn regions(mask: &GrayImage) -> Vec<Region> {
    let (width, height) = mask.dimensions();
    let mut visited = vec![false; (width as usize) * (height as usize)];
    let index = |x: u32, y: u32| (y as usize) * (width as usize) + (x as usize);

    let mut found = Vec::new();
    let mut stack = Vec::new();

    for (sx, sy, p) in mask.enumerate_pixels() {
        if p[0] == 0 || visited[index(sx, sy)] {
            continue;
        }

        let mut region = Region::default();
        visited[index(sx, sy)] = true;
        stack.push((sx, sy));

        while let Some((x, y)) = stack.pop() {
            region.m00 += 1;
            region.m10 += u64::from(x);
            region.m01 += u64::from(y);

            for ny in y.saturating_sub(1)..=(y + 1).min(height - 1) {
                for nx in x.saturating_sub(1)..=(x + 1).min(width - 1) {
                    let i = index(nx, ny);
                    if !visited[i] && mask.get_pixel(nx, ny)[0] != 0 {
                        visited[i] = true;
                        stack.push((nx, ny));
                    }
                }
            }
        }

        found.push(region);
    }

    found
}
