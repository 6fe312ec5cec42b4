//! Errors - エラー型と分類
//!
//! 解析そのものが失敗するのは前提条件違反（フレームサイズ不一致）だけです。
//! 「何も変化がない」「領域が小さすぎる」などは正常系としてデフォルトの
//! Outcome に落とし、エラーにはしません。

use thiserror::Error;

use crate::ports::{ActuationError, CaptureError, DecisionError};
use crate::turn::GateError;

/// ErrorKind は実行エラーの分類
///
/// - Precondition: 呼び出し側のバグ（リトライ無意味）
/// - Collaborator: 外部協調者（キャプチャ、エージェント、操作）の失敗。そのターンだけ捨てる
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Precondition,
    Collaborator,
}

/// Failure of the outcome analysis itself.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalysisError {
    #[error("frame dimensions differ: before={}x{}, after={}x{}", .before.0, .before.1, .after.0, .after.1)]
    DimensionMismatch {
        before: (u32, u32),
        after: (u32, u32),
    },
}

/// BenchError はターン処理中に起こりうる全エラー
#[derive(Debug, Error)]
pub enum BenchError {
    #[error("analysis failed: {0}")]
    Analysis(#[from] AnalysisError),

    #[error("capture failed: {0}")]
    Capture(#[from] CaptureError),

    #[error("decision failed: {0}")]
    Decision(#[from] DecisionError),

    #[error("actuation failed: {0}")]
    Actuation(#[from] ActuationError),

    #[error("turn gate failed: {0}")]
    Gate(#[from] GateError),
}

impl BenchError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            BenchError::Analysis(_) => ErrorKind::Precondition,
            BenchError::Capture(_)
            | BenchError::Decision(_)
            | BenchError::Actuation(_)
            | BenchError::Gate(_) => ErrorKind::Collaborator,
        }
    }
}
