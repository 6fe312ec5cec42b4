//! Ports - 抽象化レイヤー
//!
//! このモジュールは Hexagonal Architecture の「ポート」を定義します。
//! 解析コア（analysis / context / turn）は外部の協調者に直接依存せず、
//! ここの trait 越しにだけ触ります。
//!
//! - FrameSource: 画面キャプチャ
//! - MoveDecider: 一手を決めるエージェント
//! - Actuator: ゲームへの操作
//! - Clock / IdGenerator: 時刻と ID

pub mod actuator;
pub mod capture;
pub mod clock;
pub mod decider;
pub mod id_generator;

pub use self::actuator::{ActuationError, Actuator};
pub use self::capture::{CaptureError, FrameSource};
pub use self::clock::{Clock, FixedClock, SystemClock};
pub use self::decider::{DecisionError, MoveDecider};
pub use self::id_generator::{IdGenerator, UlidGenerator};
