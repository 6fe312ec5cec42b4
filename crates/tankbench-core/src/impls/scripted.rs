//! Scripted collaborators - テスト・オフライン実行用
//!
//! 実機の代わりに、あらかじめ用意したフレーム・返答を順に返します。

use std::collections::VecDeque;

use async_trait::async_trait;

use super::reply::ReplyParser;
use crate::domain::{Frame, MoveCommand};
use crate::ports::{
    ActuationError, Actuator, CaptureError, DecisionError, FrameSource, MoveDecider,
};

/// ScriptedFrameSource はキューに積んだフレームを順に返す
///
/// 空になったら `CaptureError::Exhausted`、ただし `repeat_last` を
/// 設定した場合はそのフレームを返し続ける。seq は取り出し順に振り直す。
#[derive(Debug, Default)]
pub struct ScriptedFrameSource {
    frames: VecDeque<Frame>,
    fallback: Option<Frame>,
    next_seq: u64,
}

impl ScriptedFrameSource {
    pub fn new(frames: Vec<Frame>) -> Self {
        Self {
            frames: frames.into(),
            fallback: None,
            next_seq: 0,
        }
    }

    pub fn repeat_last(mut self, frame: Frame) -> Self {
        self.fallback = Some(frame);
        self
    }

    pub fn push(&mut self, frame: Frame) {
        self.frames.push_back(frame);
    }

    pub fn remaining(&self) -> usize {
        self.frames.len()
    }
}

#[async_trait]
impl FrameSource for ScriptedFrameSource {
    async fn capture(&mut self) -> Result<Frame, CaptureError> {
        let frame = self
            .frames
            .pop_front()
            .or_else(|| self.fallback.clone())
            .ok_or(CaptureError::Exhausted)?;
        let seq = self.next_seq;
        self.next_seq += 1;
        Ok(frame.resequenced(seq))
    }
}

/// ScriptedDecider は生の返答テキストを順に返答パーサーに通す
///
/// 受け取ったプロンプトは `prompts()` で検証できる。
#[derive(Debug, Default)]
pub struct ScriptedDecider {
    replies: VecDeque<String>,
    parser: ReplyParser,
    prompts: Vec<String>,
}

impl ScriptedDecider {
    pub fn new<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            replies: replies.into_iter().map(Into::into).collect(),
            parser: ReplyParser::default(),
            prompts: Vec::new(),
        }
    }

    pub fn with_parser(mut self, parser: ReplyParser) -> Self {
        self.parser = parser;
        self
    }

    pub fn prompts(&self) -> &[String] {
        &self.prompts
    }
}

#[async_trait]
impl MoveDecider for ScriptedDecider {
    async fn decide(&mut self, _frame: &Frame, prompt: &str) -> Result<MoveCommand, DecisionError> {
        self.prompts.push(prompt.to_string());
        let reply = self
            .replies
            .pop_front()
            .ok_or_else(|| DecisionError::Unavailable("no scripted replies left".to_string()))?;
        self.parser
            .parse(&reply)
            .map_err(|e| DecisionError::InvalidReply(e.to_string()))
    }
}

/// RecordingActuator は適用されたコマンドを記録するだけ（ゲームは操作しない）
#[derive(Debug, Default)]
pub struct RecordingActuator {
    applied: Vec<MoveCommand>,
}

impl RecordingActuator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn applied(&self) -> &[MoveCommand] {
        &self.applied
    }
}

#[async_trait]
impl Actuator for RecordingActuator {
    async fn apply(&mut self, command: &MoveCommand) -> Result<(), ActuationError> {
        tracing::info!(
            angle_delta = command.angle_delta,
            power_delta = command.power_delta,
            move_action = ?command.move_action,
            "applying move"
        );
        self.applied.push(command.clone());
        Ok(())
    }
}
