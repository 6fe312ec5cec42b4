//! Outcome model: what a shot did, judged from a before/after frame pair.
//!
//! This module only defines the "shape" of a judgement. How it is computed
//! lives in `analysis`; how it is remembered lives in `context`.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Coarse accuracy of a shot relative to the estimated opponent position.
///
/// Serialized (and displayed) as lowercase snake_case tokens, which is also
/// the form used in the context block shown to the agent:
/// overshoot / undershoot / hit / near_miss / unknown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistanceResult {
    Overshoot,
    Undershoot,
    Hit,
    NearMiss,
    #[default]
    Unknown,
}

impl DistanceResult {
    pub fn as_str(self) -> &'static str {
        match self {
            DistanceResult::Overshoot => "overshoot",
            DistanceResult::Undershoot => "undershoot",
            DistanceResult::Hit => "hit",
            DistanceResult::NearMiss => "near_miss",
            DistanceResult::Unknown => "unknown",
        }
    }
}

impl fmt::Display for DistanceResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pixel coordinate in frame space (origin top-left).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PixelPoint {
    pub x: i64,
    pub y: i64,
}

impl PixelPoint {
    pub fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }
}

/// The judgement for one analyzed turn.
///
/// `Default` is the "nothing visibly changed" outcome.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveOutcome {
    #[serde(default)]
    pub hit_detected: bool,

    #[serde(default)]
    pub distance_result: DistanceResult,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub impact_location: Option<PixelPoint>,
}

impl MoveOutcome {
    pub fn unknown() -> Self {
        Self::default()
    }

    pub fn landed(impact: PixelPoint, distance_result: DistanceResult) -> Self {
        Self {
            hit_detected: distance_result == DistanceResult::Hit,
            distance_result,
            impact_location: Some(impact),
        }
    }

    /// Label used in the context block: `HIT` or `MISS (<token>)`.
    pub fn label(&self) -> String {
        if self.hit_detected {
            "HIT".to_string()
        } else {
            format!("MISS ({})", self.distance_result)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_result_serializes_as_lowercase_tokens() {
        let s = serde_json::to_string(&DistanceResult::NearMiss).unwrap();
        assert_eq!(s, "\"near_miss\"");

        let s = serde_json::to_string(&DistanceResult::Overshoot).unwrap();
        assert_eq!(s, "\"overshoot\"");

        assert_eq!(DistanceResult::Undershoot.to_string(), "undershoot");
    }

    #[test]
    fn default_outcome_is_unknown_without_impact() {
        let o = MoveOutcome::default();
        assert!(!o.hit_detected);
        assert_eq!(o.distance_result, DistanceResult::Unknown);
        assert_eq!(o.impact_location, None);
        assert_eq!(o.label(), "MISS (unknown)");
    }

    #[test]
    fn landed_hit_sets_flag() {
        let o = MoveOutcome::landed(PixelPoint::new(10, 20), DistanceResult::Hit);
        assert!(o.hit_detected);
        assert_eq!(o.label(), "HIT");

        let o = MoveOutcome::landed(PixelPoint::new(10, 20), DistanceResult::NearMiss);
        assert!(!o.hit_detected);
        assert_eq!(o.label(), "MISS (near_miss)");
    }

    #[test]
    fn missing_fields_deserialize_to_defaults() {
        let o: MoveOutcome = serde_json::from_str("{}").unwrap();
        assert_eq!(o, MoveOutcome::unknown());
    }
}
