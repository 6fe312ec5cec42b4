//! Status views - episode / session の集計結果
//!
//! どれも serde で JSON に出せる読み取り専用のビューです。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{DistanceResult, EpisodeId, SessionId, TurnReport};

/// Counts per distance classification over completed turns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistanceCounts {
    pub hit: usize,
    pub near_miss: usize,
    pub overshoot: usize,
    pub undershoot: usize,
    pub unknown: usize,
}

impl DistanceCounts {
    pub fn record(&mut self, result: DistanceResult) {
        let slot = match result {
            DistanceResult::Hit => &mut self.hit,
            DistanceResult::NearMiss => &mut self.near_miss,
            DistanceResult::Overshoot => &mut self.overshoot,
            DistanceResult::Undershoot => &mut self.undershoot,
            DistanceResult::Unknown => &mut self.unknown,
        };
        *slot += 1;
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpisodeStats {
    pub completed: usize,
    pub skipped: usize,
    /// Turns where the hit check fired, independent of the distance label.
    pub hits_detected: usize,
    pub distance: DistanceCounts,
}

impl EpisodeStats {
    pub fn record(&mut self, report: &TurnReport) {
        match report.outcome() {
            Some(outcome) => {
                self.completed += 1;
                if outcome.hit_detected {
                    self.hits_detected += 1;
                }
                self.distance.record(outcome.distance_result);
            }
            None => self.skipped += 1,
        }
    }

    pub fn turns(&self) -> usize {
        self.completed + self.skipped
    }

    /// Hits over completed turns; 0.0 when nothing completed.
    pub fn hit_rate(&self) -> f64 {
        if self.completed == 0 {
            0.0
        } else {
            self.hits_detected as f64 / self.completed as f64
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EpisodeSummary {
    pub episode_id: EpisodeId,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub stats: EpisodeStats,
    pub reports: Vec<TurnReport>,
    /// Context block as the agent would have seen it after the last turn.
    pub final_context: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSummary {
    pub session_id: SessionId,
    pub episodes: Vec<EpisodeSummary>,
}

impl SessionSummary {
    pub fn totals(&self) -> EpisodeStats {
        let mut total = EpisodeStats::default();
        for episode in &self.episodes {
            let stats = &episode.stats;
            total.completed += stats.completed;
            total.skipped += stats.skipped;
            total.hits_detected += stats.hits_detected;
            total.distance.hit += stats.distance.hit;
            total.distance.near_miss += stats.distance.near_miss;
            total.distance.overshoot += stats.distance.overshoot;
            total.distance.undershoot += stats.distance.undershoot;
            total.distance.unknown += stats.distance.unknown;
        }
        total
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{MoveCommand, MoveOutcome, PixelPoint, SkipReason, TurnStage};

    fn completed(turn: u32, result: DistanceResult) -> TurnReport {
        TurnReport::Completed {
            turn,
            command: MoveCommand::new(0, 0),
            outcome: MoveOutcome::landed(PixelPoint::new(10, 10), result),
        }
    }

    fn skipped(turn: u32) -> TurnReport {
        TurnReport::Skipped {
            turn,
            reason: SkipReason {
                stage: TurnStage::Decide,
                message: "no reply".to_string(),
                precondition: false,
            },
        }
    }

    #[test]
    fn stats_count_completed_and_skipped_turns() {
        let mut stats = EpisodeStats::default();
        for report in [
            completed(1, DistanceResult::Undershoot),
            skipped(2),
            completed(3, DistanceResult::Hit),
            completed(4, DistanceResult::NearMiss),
        ] {
            stats.record(&report);
        }

        assert_eq!(stats.completed, 3);
        assert_eq!(stats.skipped, 1);
        assert_eq!(stats.turns(), 4);
        assert_eq!(stats.hits_detected, 1);
        assert_eq!(stats.distance.undershoot, 1);
        assert_eq!(stats.distance.near_miss, 1);
        assert!((stats.hit_rate() - 1.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn unknown_outcome_counts_as_completed() {
        let mut stats = EpisodeStats::default();
        stats.record(&TurnReport::Completed {
            turn: 1,
            command: MoveCommand::new(0, 0),
            outcome: MoveOutcome::unknown(),
        });

        assert_eq!(stats.completed, 1);
        assert_eq!(stats.distance.unknown, 1);
        assert_eq!(stats.hit_rate(), 0.0);
    }

    #[test]
    fn empty_stats_have_zero_hit_rate() {
        assert_eq!(EpisodeStats::default().hit_rate(), 0.0);
    }
}
