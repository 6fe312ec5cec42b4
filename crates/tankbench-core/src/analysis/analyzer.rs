//! Outcome analysis: before/after frames in, a `MoveOutcome` out.

use serde::{Deserialize, Serialize};

use super::diff;
use super::hit::{HitClassifier, HitConfig};
use super::localizer::{ImpactLocalizer, LocalizerConfig};
use crate::domain::{AnalysisError, DistanceResult, Frame, MoveOutcome, PixelPoint};

/// Where the opponent is assumed to stand, as fractions of the frame size.
///
/// This is a fixed placeholder; nothing refines it from the frames.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OpponentEstimate {
    pub x_fraction: f64,
    pub y_fraction: f64,
}

impl Default for OpponentEstimate {
    fn default() -> Self {
        Self {
            x_fraction: 0.85,
            y_fraction: 0.80,
        }
    }
}

impl OpponentEstimate {
    pub fn locate(&self, width: u32, height: u32) -> PixelPoint {
        PixelPoint::new(
            (f64::from(width) * self.x_fraction) as i64,
            (f64::from(height) * self.y_fraction) as i64,
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// Luma change that marks a pixel as part of the impact mask (strictly greater).
    pub diff_threshold: u8,
    /// Horizontal band around the opponent inside which a shot counts as close.
    pub tolerance_px: i64,
    pub opponent: OpponentEstimate,
    pub localizer: LocalizerConfig,
    pub hit: HitConfig,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            diff_threshold: 40,
            tolerance_px: 50,
            opponent: OpponentEstimate::default(),
            localizer: LocalizerConfig::default(),
            hit: HitConfig::default(),
        }
    }
}

/// Judges a shot from the frame before firing and the frame after it settled.
///
/// Stateless apart from its tuning; two analyzers with different configs can
/// be used side by side.
#[derive(Debug, Clone)]
pub struct OutcomeAnalyzer {
    diff_threshold: u8,
    tolerance_px: i64,
    opponent: OpponentEstimate,
    localizer: ImpactLocalizer,
    classifier: HitClassifier,
}

impl OutcomeAnalyzer {
    pub fn new(config: AnalyzerConfig) -> Self {
        Self {
            diff_threshold: config.diff_threshold,
            tolerance_px: config.tolerance_px,
            opponent: config.opponent,
            localizer: ImpactLocalizer::new(config.localizer),
            classifier: HitClassifier::new(config.hit),
        }
    }

    pub fn localizer(&self) -> &ImpactLocalizer {
        &self.localizer
    }

    pub fn classifier(&self) -> &HitClassifier {
        &self.classifier
    }

    pub fn analyze(&self, before: &Frame, after: &Frame) -> Result<MoveOutcome, AnalysisError> {
        if before.dimensions() != after.dimensions() {
            return Err(AnalysisError::DimensionMismatch {
                before: before.dimensions(),
                after: after.dimensions(),
            });
        }

        let change = diff::luma_diff(before.image(), after.image());
        let mask = diff::threshold(&change, self.diff_threshold);

        let Some(impact) = self.localizer.locate(&mask) else {
            tracing::debug!(before = before.seq(), after = after.seq(), "no significant change");
            return Ok(MoveOutcome::unknown());
        };

        let opponent = self.opponent.locate(before.width(), before.height());
        let distance_result = if impact.center.x > opponent.x + self.tolerance_px {
            DistanceResult::Overshoot
        } else if impact.center.x < opponent.x - self.tolerance_px {
            DistanceResult::Undershoot
        } else if self.classifier.is_hit(before, after, opponent) {
            DistanceResult::Hit
        } else {
            DistanceResult::NearMiss
        };

        tracing::debug!(
            impact_x = impact.center.x,
            impact_y = impact.center.y,
            area = impact.area,
            opponent_x = opponent.x,
            result = %distance_result,
            "shot analyzed"
        );

        Ok(MoveOutcome::landed(impact.center, distance_result))
    }
}

impl Default for OutcomeAnalyzer {
    fn default() -> Self {
        Self::new(AnalyzerConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};
    use rstest::rstest;

    const W: u32 = 640;
    const H: u32 = 480;

    fn blank() -> RgbImage {
        RgbImage::from_pixel(W, H, Rgb([20, 40, 60]))
    }

    /// Paint a filled disk; returns the number of pixels painted.
    fn disk(img: &mut RgbImage, cx: i64, cy: i64, radius: f64) -> u64 {
        let r = radius.ceil() as i64;
        let mut painted = 0;
        for y in cy - r..=cy + r {
            for x in cx - r..=cx + r {
                let (dx, dy) = ((x - cx) as f64, (y - cy) as f64);
                if dx * dx + dy * dy <= radius * radius
                    && (0..i64::from(img.width())).contains(&x)
                    && (0..i64::from(img.height())).contains(&y)
                {
                    img.put_pixel(x as u32, y as u32, Rgb([250, 250, 250]));
                    painted += 1;
                }
            }
        }
        painted
    }

    fn pair_with_disk(cx: i64, cy: i64, radius: f64) -> (Frame, Frame, u64) {
        let before = blank();
        let mut after = before.clone();
        let painted = disk(&mut after, cx, cy, radius);
        (Frame::from_image(before), Frame::from_image(after), painted)
    }

    #[test]
    fn identical_frames_are_unknown() {
        let frame = Frame::from_image(blank());
        let outcome = OutcomeAnalyzer::default().analyze(&frame, &frame.clone()).unwrap();

        assert_eq!(outcome, MoveOutcome::unknown());
    }

    #[test]
    fn mismatched_dimensions_fail() {
        let before = Frame::from_image(blank());
        let after = Frame::from_image(RgbImage::new(W / 2, H));

        let err = OutcomeAnalyzer::default().analyze(&before, &after).unwrap_err();
        assert_eq!(
            err,
            AnalysisError::DimensionMismatch {
                before: (W, H),
                after: (W / 2, H),
            }
        );
    }

    #[test]
    fn centred_disk_is_undershoot() {
        let (cx, cy) = (i64::from(W) / 2, i64::from(H) / 2);
        // radius sqrt(500 / pi)
        let (before, after, painted) = pair_with_disk(cx, cy, 12.62);
        assert!((480..=520).contains(&painted));

        let outcome = OutcomeAnalyzer::default().analyze(&before, &after).unwrap();
        assert_eq!(outcome.distance_result, DistanceResult::Undershoot);
        assert!(!outcome.hit_detected);

        let impact = outcome.impact_location.unwrap();
        assert!((impact.x - cx).abs() <= 2);
        assert!((impact.y - cy).abs() <= 2);
    }

    #[test]
    fn change_on_opponent_is_hit() {
        let opponent = OpponentEstimate::default().locate(W, H);
        let (before, after, painted) = pair_with_disk(opponent.x, opponent.y, 15.0);
        assert!(painted > 300);

        let outcome = OutcomeAnalyzer::default().analyze(&before, &after).unwrap();
        assert!(outcome.hit_detected);
        assert_eq!(outcome.distance_result, DistanceResult::Hit);
    }

    #[test]
    fn small_change_near_opponent_is_near_miss() {
        let opponent = OpponentEstimate::default().locate(W, H);
        // ~200 px: qualifies as an impact but not as a hit
        let (before, after, painted) = pair_with_disk(opponent.x + 20, opponent.y, 8.0);
        assert!(painted > 100 && painted <= 300);

        let outcome = OutcomeAnalyzer::default().analyze(&before, &after).unwrap();
        assert!(!outcome.hit_detected);
        assert_eq!(outcome.distance_result, DistanceResult::NearMiss);
    }

    #[rstest]
    #[case::far_right(75, DistanceResult::Overshoot)]
    #[case::just_past_band(51, DistanceResult::Overshoot)]
    #[case::edge_of_band(50, DistanceResult::NearMiss)]
    #[case::left_edge_of_band(-50, DistanceResult::NearMiss)]
    #[case::just_short(-51, DistanceResult::Undershoot)]
    fn tolerance_band_classification(#[case] offset: i64, #[case] expected: DistanceResult) {
        let opponent = OpponentEstimate::default().locate(W, H);
        // impact well above the opponent window so the hit check sees nothing
        let (before, after, _) = pair_with_disk(opponent.x + offset, 40, 8.0);

        let outcome = OutcomeAnalyzer::default().analyze(&before, &after).unwrap();
        assert_eq!(outcome.distance_result, expected);
        assert_eq!(outcome.impact_location.map(|p| p.x), Some(opponent.x + offset));
    }

    #[test]
    fn tiny_change_is_unknown() {
        let (before, after, painted) = pair_with_disk(100, 100, 5.0);
        assert!(painted <= 100);

        let outcome = OutcomeAnalyzer::default().analyze(&before, &after).unwrap();
        assert_eq!(outcome, MoveOutcome::unknown());
    }

    #[test]
    fn differently_tuned_analyzers_coexist() {
        let (before, after, _) = pair_with_disk(320, 240, 12.62);

        let default = OutcomeAnalyzer::default();
        let left_opponent = OutcomeAnalyzer::new(AnalyzerConfig {
            opponent: OpponentEstimate {
                x_fraction: 0.1,
                y_fraction: 0.8,
            },
            ..AnalyzerConfig::default()
        });

        assert_eq!(
            default.analyze(&before, &after).unwrap().distance_result,
            DistanceResult::Undershoot
        );
        assert_eq!(
            left_opponent.analyze(&before, &after).unwrap().distance_result,
            DistanceResult::Overshoot
        );
    }
}
