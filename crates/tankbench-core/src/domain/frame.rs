//! Frame: one captured raster snapshot of the game window.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use image::RgbImage;

/// An immutable RGB snapshot plus its position in capture order.
///
/// The pixel buffer is shared, so cloning a frame is cheap and never copies
/// pixels. Nothing hands out a mutable reference to the buffer.
#[derive(Debug, Clone)]
pub struct Frame {
    seq: u64,
    captured_at: DateTime<Utc>,
    image: Arc<RgbImage>,
}

impl Frame {
    pub fn new(seq: u64, captured_at: DateTime<Utc>, image: RgbImage) -> Self {
        Self {
            seq,
            captured_at,
            image: Arc::new(image),
        }
    }

    /// Build a frame with no meaningful capture metadata (tests, one-off analysis).
    pub fn from_image(image: RgbImage) -> Self {
        Self::new(0, DateTime::<Utc>::UNIX_EPOCH, image)
    }

    /// Same pixels and timestamp under a new capture position.
    pub fn resequenced(&self, seq: u64) -> Self {
        Self {
            seq,
            captured_at: self.captured_at,
            image: Arc::clone(&self.image),
        }
    }

    pub fn seq(&self) -> u64 {
        self.seq
    }

    pub fn captured_at(&self) -> DateTime<Utc> {
        self.captured_at
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    pub fn image(&self) -> &RgbImage {
        &self.image
    }
}
