//! EpisodeRunner - ターンループ
//!
//! 1 ターン = before キャプチャ → プロンプト生成 → エージェント判断 →
//! 操作 → ターン終了待ち → after キャプチャ → 結果解析 → 履歴追加。
//!
//! どの段階で失敗してもそのターンはスキップ（ログを出して次へ）。
//! スキップしたターンは履歴に載りません。ターンは必ず逐次実行で、
//! 前のターンの結果が履歴に入ってから次のプロンプトを作ります。

use crate::analysis::OutcomeAnalyzer;
use crate::context::{ContextFormatter, ContextStore, PromptBuilder};
use crate::domain::{BenchError, MoveCommand, MoveOutcome, SkipReason, TurnReport, TurnStage};
use crate::ports::{Actuator, Clock, FrameSource, IdGenerator, MoveDecider};
use crate::turn::{TurnCompletion, TurnGate};

use super::aim::AimTracker;
use super::status::{EpisodeStats, EpisodeSummary, SessionSummary};

type StageError = (TurnStage, BenchError);

fn at<E: Into<BenchError>>(stage: TurnStage) -> impl FnOnce(E) -> StageError {
    move |err| (stage, err.into())
}

/// EpisodeRunner は協調者と解析パイプラインを 1 つにまとめる
///
/// 構築は `EpisodeBuilder` から。
pub struct EpisodeRunner<F, D, A> {
    pub(super) frames: F,
    pub(super) decider: D,
    pub(super) actuator: A,
    pub(super) gate: TurnGate,
    pub(super) analyzer: OutcomeAnalyzer,
    pub(super) store: ContextStore,
    pub(super) formatter: ContextFormatter,
    pub(super) prompt: PromptBuilder,
    pub(super) aim: AimTracker,
    pub(super) clock: Box<dyn Clock>,
    pub(super) ids: Box<dyn IdGenerator>,
    pub(super) turns_per_game: u32,
}

impl<F, D, A> EpisodeRunner<F, D, A>
where
    F: FrameSource,
    D: MoveDecider,
    A: Actuator,
{
    pub fn frames(&self) -> &F {
        &self.frames
    }

    pub fn decider(&self) -> &D {
        &self.decider
    }

    pub fn actuator(&self) -> &A {
        &self.actuator
    }

    pub fn store(&self) -> &ContextStore {
        &self.store
    }

    pub fn aim(&self) -> &AimTracker {
        &self.aim
    }

    pub fn turns_per_game(&self) -> u32 {
        self.turns_per_game
    }

    /// 現在の履歴をエージェント向けテキストにしたもの
    pub fn context_block(&self) -> String {
        self.formatter.render(&self.store)
    }

    /// 1 ターン実行する。失敗は Skipped として返し、エラーにはしない
    pub async fn run_turn(&mut self, turn: u32) -> TurnReport {
        match self.play_turn().await {
            Ok((command, outcome)) => {
                tracing::info!(
                    turn,
                    angle = ?command.absolute_angle,
                    power = ?command.absolute_power,
                    outcome = %outcome.label(),
                    "turn completed"
                );
                self.store.add(command.clone(), outcome);
                TurnReport::Completed {
                    turn,
                    command,
                    outcome,
                }
            }
            Err((stage, err)) => {
                let reason = SkipReason::from_error(stage, &err);
                if reason.precondition {
                    tracing::error!(turn, %stage, error = %err, "turn skipped");
                } else {
                    tracing::warn!(turn, %stage, error = %err, "turn skipped");
                }
                TurnReport::Skipped { turn, reason }
            }
        }
    }

    async fn play_turn(&mut self) -> Result<(MoveCommand, MoveOutcome), StageError> {
        let before = self
            .frames
            .capture()
            .await
            .map_err(at(TurnStage::CaptureBefore))?;

        let prompt = self.prompt.build(&self.context_block());
        let proposed = self
            .decider
            .decide(&before, &prompt)
            .await
            .map_err(at(TurnStage::Decide))?;

        let command = self.aim.resolve(proposed);
        self.actuator
            .apply(&command)
            .await
            .map_err(at(TurnStage::Actuate))?;
        self.aim.commit(&command);

        self.gate.reset();
        self.gate
            .await_turn_boundary(&mut self.frames)
            .await
            .map_err(at(TurnStage::AwaitBoundary))?;

        let after = self
            .frames
            .capture()
            .await
            .map_err(at(TurnStage::CaptureAfter))?;

        let outcome = self
            .analyzer
            .analyze(&before, &after)
            .map_err(at(TurnStage::Analyze))?;
        Ok((command, outcome))
    }

    /// 1 ゲーム分のターンを実行する
    ///
    /// 開始時に履歴と照準をリセットするので、前のゲームの結果は持ち越さない。
    pub async fn run_episode(&mut self, turns: u32) -> EpisodeSummary {
        let episode_id = self.ids.generate_episode_id();
        let started_at = self.clock.now();
        self.store.clear();
        self.aim.reset();

        tracing::info!(episode = %episode_id, turns, gate = self.gate.strategy(), "episode started");

        let mut stats = EpisodeStats::default();
        let mut reports = Vec::new();
        for turn in 1..=turns {
            let report = self.run_turn(turn).await;
            stats.record(&report);
            reports.push(report);
        }

        tracing::info!(
            episode = %episode_id,
            completed = stats.completed,
            skipped = stats.skipped,
            hits = stats.hits_detected,
            "episode finished"
        );

        EpisodeSummary {
            episode_id,
            started_at,
            finished_at: self.clock.now(),
            stats,
            reports,
            final_context: self.context_block(),
        }
    }

    /// `games` 回のゲームを続けて実行する（各ゲームは turns_per_game ターン）
    pub async fn run_session(&mut self, games: u32) -> SessionSummary {
        let session_id = self.ids.generate_session_id();
        tracing::info!(session = %session_id, games, "session started");

        let mut episodes = Vec::new();
        for _ in 0..games {
            episodes.push(self.run_episode(self.turns_per_game).await);
        }
        SessionSummary {
            session_id,
            episodes,
        }
    }
}
