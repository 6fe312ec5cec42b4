//! tankbench-core
//!
//! Outcome analysis and move-history tracking for an artillery-game agent
//! benchmark.
//!
//! # モジュール構成
//! - **domain**: ドメインモデル（frame, command, outcome, turn report, ids, errors）
//! - **ports**: 抽象化レイヤー（FrameSource, MoveDecider, Actuator, Clock, IdGenerator）
//! - **analysis**: before/after フレームの差分から着弾点と HIT/MISS を判定
//! - **context**: 直近の手の履歴とエージェント向けテキスト
//! - **turn**: ターン終了の判定（タイムアウト / 画面の静止）
//! - **app**: ターンループ（builder, episode runner, status）
//! - **impls**: 実装（スクリーンショット再生、返答パーサー、テスト用協調者）
//! - **config**: TOML 設定

pub mod analysis;
pub mod app;
pub mod config;
pub mod context;
pub mod domain;
pub mod impls;
pub mod ports;
pub mod turn;
