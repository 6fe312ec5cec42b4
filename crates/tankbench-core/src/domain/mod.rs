//! Domain model (frames, commands, outcomes, turn reports, ids, errors).

pub mod command;
pub mod errors;
pub mod frame;
pub mod ids;
pub mod outcome;
pub mod turn;

pub use self::command::{Direction, MoveAction, MoveCommand};
pub use self::errors::{AnalysisError, BenchError, ErrorKind};
pub use self::frame::Frame;
pub use self::ids::{EpisodeId, SessionId};
pub use self::outcome::{DistanceResult, MoveOutcome, PixelPoint};
pub use self::turn::{SkipReason, TurnReport, TurnStage};
