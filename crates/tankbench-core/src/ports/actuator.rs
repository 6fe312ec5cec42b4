//! Actuator port - 角度/パワー/移動/発射の操作

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::MoveCommand;

#[derive(Debug, Error)]
pub enum ActuationError {
    #[error("game window not reachable: {0}")]
    Unreachable(String),

    #[error("{0}")]
    Other(String),
}

/// Actuator は解決済みの MoveCommand をゲームに適用し、発射まで行う
#[async_trait]
pub trait Actuator: Send {
    async fn apply(&mut self, command: &MoveCommand) -> Result<(), ActuationError>;
}
