//! Move command model: what the decision agent asked the tank to do.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Horizontal tank movement direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Left,
    Right,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Left => f.write_str("left"),
            Direction::Right => f.write_str("right"),
        }
    }
}

/// Move the tank `count` steps before firing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveAction {
    pub direction: Direction,
    pub count: u32,
}

impl MoveAction {
    pub fn new(direction: Direction, count: u32) -> Self {
        Self { direction, count }
    }
}

/// A single turn's instruction.
///
/// `absolute_angle` / `absolute_power` are running totals filled in by the
/// turn loop after the deltas are applied; the agent only ever supplies deltas.
/// `reasoning` and `confidence` are carried along for logging only.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MoveCommand {
    pub angle_delta: i32,
    pub power_delta: i32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub move_action: Option<MoveAction>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub absolute_angle: Option<i32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub absolute_power: Option<i32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f32>,
}

impl MoveCommand {
    pub fn new(angle_delta: i32, power_delta: i32) -> Self {
        Self {
            angle_delta,
            power_delta,
            ..Self::default()
        }
    }

    pub fn with_move(mut self, direction: Direction, count: u32) -> Self {
        self.move_action = Some(MoveAction::new(direction, count));
        self
    }

    pub fn with_absolute(mut self, angle: i32, power: i32) -> Self {
        self.absolute_angle = Some(angle);
        self.absolute_power = Some(power);
        self
    }

    pub fn with_reasoning(mut self, reasoning: impl Into<String>) -> Self {
        self.reasoning = Some(reasoning.into());
        self
    }

    /// Both running totals, if the caller has filled them in.
    pub fn absolute(&self) -> Option<(i32, i32)> {
        self.absolute_angle.zip(self.absolute_power)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absolute_requires_both_totals() {
        let mut cmd = MoveCommand::new(5, -3);
        assert_eq!(cmd.absolute(), None);

        cmd.absolute_angle = Some(50);
        assert_eq!(cmd.absolute(), None);

        let cmd = cmd.with_absolute(50, 70);
        assert_eq!(cmd.absolute(), Some((50, 70)));
    }

    #[test]
    fn optional_fields_are_omitted_from_json() {
        let cmd = MoveCommand::new(1, 2).with_move(Direction::Left, 2);
        let v = serde_json::to_value(&cmd).unwrap();

        assert_eq!(v["move_action"]["direction"], "left");
        assert!(v.get("absolute_angle").is_none());
        assert!(v.get("reasoning").is_none());
    }
}
