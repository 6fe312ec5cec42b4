//! Impls - ports の実装（開発用・テスト用・オフライン再生用）
//!
//! # 含まれる実装
//! - **ScriptedFrameSource / ScriptedDecider / RecordingActuator**: テスト用
//! - **ReplayFrameSource**: 保存済みスクリーンショットの再生
//! - **ReplyParser**: エージェントの返答テキスト → MoveCommand
//!
//! 実機のキャプチャ・操作・モデル呼び出しはこのクレートの外に置きます。

pub mod replay;
pub mod reply;
pub mod scripted;

pub use self::replay::{ReplayFrameSource, load_image};
pub use self::reply::{ReplyError, ReplyParser, parse_agent_reply};
pub use self::scripted::{RecordingActuator, ScriptedDecider, ScriptedFrameSource};
