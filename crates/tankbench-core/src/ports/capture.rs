//! FrameSource port - 画面キャプチャの抽象化
//!
//! 実機ではスクリーンショット、開発中はディレクトリのリプレイや
//! メモリ上のスクリプトで差し替えます。

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::Frame;

#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("no more frames available")]
    Exhausted,

    #[error("failed to read frame {path}: {message}")]
    Read { path: String, message: String },

    #[error("{0}")]
    Other(String),
}

/// FrameSource は設定された画面領域のフレームを要求時に返す
///
/// 返すフレームの seq は単調増加であること。
#[async_trait]
pub trait FrameSource: Send {
    async fn capture(&mut self) -> Result<Frame, CaptureError>;
}
