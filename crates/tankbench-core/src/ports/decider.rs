//! MoveDecider port - 次の一手を決めるエージェント
//!
//! エージェント本体（vision-language model への通信）はこのクレートの外です。
//! ここではフレームとプロンプト文字列を渡し、MoveCommand を受け取るだけです。

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{Frame, MoveCommand};

#[derive(Debug, Error)]
pub enum DecisionError {
    #[error("agent unavailable: {0}")]
    Unavailable(String),

    #[error("unusable agent reply: {0}")]
    InvalidReply(String),
}

/// MoveDecider は現在のフレームと文脈プロンプトから一手を決める
///
/// `prompt` には ContextFormatter の出力を含むプロンプト全体が入る。
#[async_trait]
pub trait MoveDecider: Send {
    async fn decide(&mut self, frame: &Frame, prompt: &str) -> Result<MoveCommand, DecisionError>;
}
