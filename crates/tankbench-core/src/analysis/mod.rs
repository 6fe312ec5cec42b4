//! Shot outcome analysis from before/after frames.
//!
//! - `diff`: luma differencing and thresholding
//! - `localizer`: largest changed region and its centroid
//! - `hit`: change count in a window around the opponent
//! - `analyzer`: ties them together into a `MoveOutcome`

pub mod analyzer;
pub mod diff;
pub mod hit;
pub mod localizer;

pub use self::analyzer::{AnalyzerConfig, OpponentEstimate, OutcomeAnalyzer};
pub use self::hit::{HitClassifier, HitConfig, Window};
pub use self::localizer::{Impact, ImpactLocalizer, LocalizerConfig};
