//! Motion-polling turn gate (legacy strategy).
//!
//! Samples frames at a fixed rate and declares the turn over once the screen
//! has been still for `stable_frames` consecutive samples.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::time::Instant;

use super::{GateError, TurnCompletion};
use crate::analysis::diff;
use crate::domain::Frame;
use crate::ports::FrameSource;

/// Preset tunings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MotionSensitivity {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionConfig {
    /// Changed-pixel count between successive samples below which the
    /// screen counts as still.
    pub motion_threshold: u64,
    /// Consecutive still samples needed to end the turn.
    pub stable_frames: u32,
    /// Samples per second.
    pub fps: u32,
    /// Per-pixel luma change ignored as capture noise.
    pub pixel_noise: u8,
    /// Give up if the screen never settles.
    pub max_wait_ms: u64,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self::preset(MotionSensitivity::Medium)
    }
}

impl MotionConfig {
    pub fn preset(sensitivity: MotionSensitivity) -> Self {
        let (motion_threshold, stable_frames, fps) = match sensitivity {
            MotionSensitivity::Low => (2000, 30, 3),
            MotionSensitivity::Medium => (1000, 20, 5),
            MotionSensitivity::High => (500, 15, 8),
        };
        Self {
            motion_threshold,
            stable_frames,
            fps,
            pixel_noise: 25,
            max_wait_ms: 60_000,
        }
    }

    pub fn sample_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / f64::from(self.fps.max(1)))
    }
}

/// ACTIVE -> SETTLING -> STABLE, back to ACTIVE whenever motion resumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionState {
    Active,
    Settling { calm: u32 },
    Stable,
}

#[derive(Debug, Clone)]
pub struct MotionGate {
    config: MotionConfig,
    previous: Option<Frame>,
    state: MotionState,
}

impl MotionGate {
    pub fn new(config: MotionConfig) -> Self {
        Self {
            config,
            previous: None,
            state: MotionState::Active,
        }
    }

    pub fn state(&self) -> MotionState {
        self.state
    }

    pub fn config(&self) -> &MotionConfig {
        &self.config
    }

    /// Changed pixels between two samples; frames of different size count
    /// as full motion.
    fn motion_magnitude(&self, previous: &Frame, current: &Frame) -> u64 {
        if previous.dimensions() != current.dimensions() {
            return u64::MAX;
        }
        let change = diff::luma_diff(previous.image(), current.image());
        diff::count_above(&change, self.config.pixel_noise)
    }

    fn step(&self, magnitude: u64) -> MotionState {
        if magnitude >= self.config.motion_threshold {
            return MotionState::Active;
        }
        let calm = match self.state {
            MotionState::Stable => return MotionState::Stable,
            MotionState::Active => 1,
            MotionState::Settling { calm } => calm + 1,
        };
        if calm >= self.config.stable_frames {
            MotionState::Stable
        } else {
            MotionState::Settling { calm }
        }
    }
}

#[async_trait]
impl TurnCompletion for MotionGate {
    fn is_turn_active(&mut self, frame: &Frame) -> bool {
        if let Some(previous) = self.previous.replace(frame.clone()) {
            let magnitude = self.motion_magnitude(&previous, frame);
            self.state = self.step(magnitude);
            tracing::trace!(magnitude, state = ?self.state, "motion sample");
        }
        self.state != MotionState::Stable
    }

    async fn await_turn_boundary(&mut self, frames: &mut dyn FrameSource) -> Result<(), GateError> {
        let max_wait = Duration::from_millis(self.config.max_wait_ms);
        let deadline = Instant::now() + max_wait;
        let interval = self.config.sample_interval();

        loop {
            let frame = frames.capture().await?;
            if !self.is_turn_active(&frame) {
                return Ok(());
            }
            if Instant::now() >= deadline {
                return Err(GateError::NeverSettled { waited: max_wait });
            }
            tokio::time::sleep(interval).await;
        }
    }

    fn reset(&mut self) {
        self.previous = None;
        self.state = MotionState::Active;
    }
}
