//! App - アプリケーション層
//!
//! ports と解析パイプラインを組み合わせてターンループを実装します。
//!
//! # 主要コンポーネント
//! - **EpisodeBuilder**: 協調者と設定のワイヤリング（Fail-fast）
//! - **EpisodeRunner**: ターン / エピソード / セッションの実行
//! - **AimTracker**: 角度・パワーの絶対値の追跡
//! - **status**: 集計ビュー（JSON 出力用）

pub mod aim;
pub mod builder;
pub mod episode;
pub mod status;

pub use self::aim::AimTracker;
pub use self::builder::{BuildError, EpisodeBuilder};
pub use self::episode::EpisodeRunner;
pub use self::status::{DistanceCounts, EpisodeStats, EpisodeSummary, SessionSummary};
