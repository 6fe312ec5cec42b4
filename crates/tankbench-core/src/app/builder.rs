//! EpisodeBuilder - ターンループの構築とワイヤリング
//!
//! # Fail-fast 設計
//! - 協調者（FrameSource / MoveDecider / Actuator）が欠けていたら build() が失敗する
//! - 設定は build() 時に validate() する。ターンの途中で設定ミスに気づくことはない

use crate::analysis::OutcomeAnalyzer;
use crate::config::{BenchConfig, ConfigError};
use crate::context::{ContextFormatter, ContextStore, PromptBuilder};
use crate::ports::{Actuator, Clock, FrameSource, IdGenerator, MoveDecider, SystemClock, UlidGenerator};
use crate::turn::TurnGate;

use super::aim::AimTracker;
use super::episode::EpisodeRunner;

/// BuildError は構築時のエラー
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("missing collaborator: {0}. Provide it before calling build().")]
    MissingCollaborator(&'static str),

    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
}

/// EpisodeBuilder は EpisodeRunner を構築
///
/// # 使用例
/// ```ignore
/// let runner = EpisodeBuilder::new()
///     .config(config)
///     .frames(source)
///     .decider(decider)
///     .actuator(actuator)
///     .build()?;
/// ```
pub struct EpisodeBuilder<F, D, A> {
    config: BenchConfig,
    frames: Option<F>,
    decider: Option<D>,
    actuator: Option<A>,
    clock: Option<Box<dyn Clock>>,
    ids: Option<Box<dyn IdGenerator>>,
}

impl<F, D, A> EpisodeBuilder<F, D, A>
where
    F: FrameSource,
    D: MoveDecider,
    A: Actuator,
{
    pub fn new() -> Self {
        Self {
            config: BenchConfig::default(),
            frames: None,
            decider: None,
            actuator: None,
            clock: None,
            ids: None,
        }
    }

    pub fn config(mut self, config: BenchConfig) -> Self {
        self.config = config;
        self
    }

    pub fn frames(mut self, frames: F) -> Self {
        self.frames = Some(frames);
        self
    }

    pub fn decider(mut self, decider: D) -> Self {
        self.decider = Some(decider);
        self
    }

    pub fn actuator(mut self, actuator: A) -> Self {
        self.actuator = Some(actuator);
        self
    }

    /// episode の開始/終了時刻に使う時計（省略時は SystemClock）
    pub fn clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Some(Box::new(clock));
        self
    }

    /// 省略時は SystemClock ベースの UlidGenerator
    pub fn id_generator(mut self, ids: impl IdGenerator + 'static) -> Self {
        self.ids = Some(Box::new(ids));
        self
    }

    /// # 検証
    /// - 協調者 3 つが全て渡されているか
    /// - 設定値が範囲内か（BenchConfig::validate）
    pub fn build(self) -> Result<EpisodeRunner<F, D, A>, BuildError> {
        let frames = self.frames.ok_or(BuildError::MissingCollaborator("frame source"))?;
        let decider = self.decider.ok_or(BuildError::MissingCollaborator("move decider"))?;
        let actuator = self.actuator.ok_or(BuildError::MissingCollaborator("actuator"))?;

        let config = self.config;
        config.validate()?;

        let gate = TurnGate::from_config(&config.turn_gate);
        tracing::debug!(
            gate = gate.strategy(),
            max_history = config.context.max_history,
            turns_per_game = config.episode.turns_per_game,
            "episode runner built"
        );

        Ok(EpisodeRunner {
            frames,
            decider,
            actuator,
            gate,
            analyzer: OutcomeAnalyzer::new(config.analyzer),
            store: ContextStore::from(&config.context),
            formatter: ContextFormatter::new(config.context.render_recent),
            prompt: PromptBuilder::new(config.episode.max_move_steps),
            aim: AimTracker::new(config.aim),
            clock: self.clock.unwrap_or_else(|| Box::new(SystemClock)),
            ids: self
                .ids
                .unwrap_or_else(|| Box::new(UlidGenerator::new(SystemClock))),
            turns_per_game: config.episode.turns_per_game,
        })
    }
}

impl<F, D, A> Default for EpisodeBuilder<F, D, A>
where
    F: FrameSource,
    D: MoveDecider,
    A: Actuator,
{
    fn default() -> Self {
        Self::new()
    }
}
