//! Turn report: the result of one pass through the turn loop.
//!
//! A failed turn is not an error for the episode. It is reported as
//! `Skipped` with the stage that failed, and nothing is added to the
//! context history for it.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{BenchError, ErrorKind, MoveCommand, MoveOutcome};

/// Pipeline stage a turn was in when it failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnStage {
    CaptureBefore,
    Decide,
    Actuate,
    AwaitBoundary,
    CaptureAfter,
    Analyze,
}

impl fmt::Display for TurnStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TurnStage::CaptureBefore => "capture_before",
            TurnStage::Decide => "decide",
            TurnStage::Actuate => "actuate",
            TurnStage::AwaitBoundary => "await_boundary",
            TurnStage::CaptureAfter => "capture_after",
            TurnStage::Analyze => "analyze",
        };
        f.write_str(s)
    }
}

/// Why a turn was skipped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkipReason {
    pub stage: TurnStage,
    pub message: String,
    /// True when the failure was a caller bug rather than a flaky collaborator.
    pub precondition: bool,
}

impl SkipReason {
    pub fn from_error(stage: TurnStage, err: &BenchError) -> Self {
        Self {
            stage,
            message: err.to_string(),
            precondition: err.kind() == ErrorKind::Precondition,
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} failed: {}", self.stage, self.message)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TurnReport {
    Completed {
        turn: u32,
        command: MoveCommand,
        outcome: MoveOutcome,
    },
    Skipped {
        turn: u32,
        reason: SkipReason,
    },
}

impl TurnReport {
    pub fn turn(&self) -> u32 {
        match self {
            TurnReport::Completed { turn, .. } | TurnReport::Skipped { turn, .. } => *turn,
        }
    }

    pub fn outcome(&self) -> Option<&MoveOutcome> {
        match self {
            TurnReport::Completed { outcome, .. } => Some(outcome),
            TurnReport::Skipped { .. } => None,
        }
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, TurnReport::Skipped { .. })
    }
}
