//! Turn gate: deciding when the shot is over and the "after" frame can be taken.
//!
//! Two strategies implement the same `TurnCompletion` capability. Which one
//! runs is picked from configuration when the gate is built; the turn loop
//! only ever sees a `TurnGate`.

pub mod motion;
pub mod timeout;

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::Frame;
use crate::ports::{CaptureError, FrameSource};

pub use self::motion::{MotionConfig, MotionGate, MotionSensitivity, MotionState};
pub use self::timeout::{TimeoutGate, TimeoutState};

#[derive(Debug, Error)]
pub enum GateError {
    #[error("screen did not settle within {waited:?}")]
    NeverSettled { waited: Duration },

    #[error("sampling frame failed: {0}")]
    Capture(#[from] CaptureError),
}

/// Turn-completion capability.
///
/// `reset()` is called at the start of every turn; `is_turn_active` may be
/// fed frames directly, `await_turn_boundary` blocks until the turn is over.
#[async_trait]
pub trait TurnCompletion: Send {
    fn is_turn_active(&mut self, frame: &Frame) -> bool;

    async fn await_turn_boundary(&mut self, frames: &mut dyn FrameSource) -> Result<(), GateError>;

    fn reset(&mut self);
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub enum TurnGateConfig {
    Timeout {
        #[serde(default = "default_wait_ms")]
        wait_ms: u64,
    },
    Motion(MotionConfig),
}

fn default_wait_ms() -> u64 {
    12_000
}

impl Default for TurnGateConfig {
    fn default() -> Self {
        TurnGateConfig::Timeout {
            wait_ms: default_wait_ms(),
        }
    }
}

#[derive(Debug, Clone)]
pub enum TurnGate {
    Timeout(TimeoutGate),
    Motion(MotionGate),
}

impl TurnGate {
    pub fn from_config(config: &TurnGateConfig) -> Self {
        match config {
            TurnGateConfig::Timeout { wait_ms } => {
                TurnGate::Timeout(TimeoutGate::new(Duration::from_millis(*wait_ms)))
            }
            TurnGateConfig::Motion(motion) => TurnGate::Motion(MotionGate::new(*motion)),
        }
    }

    pub fn strategy(&self) -> &'static str {
        match self {
            TurnGate::Timeout(_) => "timeout",
            TurnGate::Motion(_) => "motion",
        }
    }

    fn inner(&mut self) -> &mut dyn TurnCompletion {
        match self {
            TurnGate::Timeout(gate) => gate,
            TurnGate::Motion(gate) => gate,
        }
    }
}

impl Default for TurnGate {
    fn default() -> Self {
        Self::from_config(&TurnGateConfig::default())
    }
}

#[async_trait]
impl TurnCompletion for TurnGate {
    fn is_turn_active(&mut self, frame: &Frame) -> bool {
        self.inner().is_turn_active(frame)
    }

    async fn await_turn_boundary(&mut self, frames: &mut dyn FrameSource) -> Result<(), GateError> {
        self.inner().await_turn_boundary(frames).await
    }

    fn reset(&mut self) {
        self.inner().reset()
    }
}
