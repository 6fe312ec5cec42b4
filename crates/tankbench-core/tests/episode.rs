use chrono::{TimeZone, Utc};
use image::{Rgb, RgbImage};

use tankbench_core::app::{EpisodeBuilder, EpisodeRunner};
use tankbench_core::config::BenchConfig;
use tankbench_core::context::EMPTY_HISTORY;
use tankbench_core::domain::{DistanceResult, Frame, PixelPoint, TurnReport, TurnStage};
use tankbench_core::impls::{RecordingActuator, ScriptedDecider, ScriptedFrameSource};
use tankbench_core::ports::{FixedClock, UlidGenerator};
use tankbench_core::turn::{MotionConfig, TurnGateConfig};

type Runner = EpisodeRunner<ScriptedFrameSource, ScriptedDecider, RecordingActuator>;

// 400x200 puts the opponent estimate at (340, 160).
const WIDTH: u32 = 400;
const HEIGHT: u32 = 200;

fn blank() -> Frame {
    Frame::from_image(RgbImage::new(WIDTH, HEIGHT))
}

/// Blank frame with a white `side`x`side` square at (x0, y0).
fn with_square(x0: u32, y0: u32, side: u32) -> Frame {
    let mut img = RgbImage::new(WIDTH, HEIGHT);
    for y in y0..y0 + side {
        for x in x0..x0 + side {
            img.put_pixel(x, y, Rgb([255, 255, 255]));
        }
    }
    Frame::from_image(img)
}

fn undershot() -> Frame {
    with_square(20, 20, 20)
}

fn direct_hit() -> Frame {
    with_square(330, 150, 20)
}

fn near_miss() -> Frame {
    with_square(300, 150, 15)
}

fn reply(angle_delta: i32, power_delta: i32) -> String {
    format!(r#"{{"angle_delta": {angle_delta}, "power_delta": {power_delta}, "move_actions": null}}"#)
}

fn fast_config() -> BenchConfig {
    BenchConfig {
        turn_gate: TurnGateConfig::Timeout { wait_ms: 0 },
        ..BenchConfig::default()
    }
}

fn runner(config: BenchConfig, frames: ScriptedFrameSource, replies: Vec<String>) -> Runner {
    let clock = FixedClock::new(Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap());
    EpisodeBuilder::new()
        .config(config)
        .frames(frames)
        .decider(ScriptedDecider::new(replies))
        .actuator(RecordingActuator::new())
        .clock(clock)
        .id_generator(UlidGenerator::new(clock))
        .build()
        .unwrap()
}

#[tokio::test]
async fn outcomes_feed_the_next_prompt() {
    let frames = ScriptedFrameSource::new(vec![
        blank(),
        undershot(),
        blank(),
        near_miss(),
        blank(),
        direct_hit(),
    ]);
    let mut runner = runner(
        fast_config(),
        frames,
        vec![reply(5, 10), reply(0, 15), reply(-3, 2)],
    );

    let summary = runner.run_episode(3).await;

    let results: Vec<_> = summary
        .reports
        .iter()
        .map(|r| r.outcome().map(|o| o.distance_result))
        .collect();
    assert_eq!(
        results,
        vec![
            Some(DistanceResult::Undershoot),
            Some(DistanceResult::NearMiss),
            Some(DistanceResult::Hit),
        ]
    );
    assert_eq!(
        summary.reports[0].outcome().and_then(|o| o.impact_location),
        Some(PixelPoint::new(29, 29))
    );
    assert_eq!(summary.stats.completed, 3);
    assert_eq!(summary.stats.hits_detected, 1);

    let prompts = runner.decider().prompts();
    assert!(prompts[0].contains(EMPTY_HISTORY));
    assert!(prompts[1].contains("Move 1: angle=50 (Δ+5), power=60 (Δ+10) → MISS (undershoot)"));
    assert!(prompts[2].contains("Move 2: angle=50 (Δ+0), power=75 (Δ+15) → MISS (near_miss)"));

    assert!(summary.final_context.starts_with("Recent moves:\nMove 3: angle=47 (Δ-3), power=77 (Δ+2) → HIT"));

    let applied = runner.actuator().applied();
    assert_eq!(applied.len(), 3);
    assert_eq!(applied[2].absolute(), Some((47, 77)));
}

#[tokio::test]
async fn failed_turns_are_skipped_and_left_out_of_history() {
    let frames = ScriptedFrameSource::new(vec![
        blank(),
        undershot(),
        // turn 2 only gets as far as the decision
        blank(),
        blank(),
        direct_hit(),
    ]);
    let mut runner = runner(
        fast_config(),
        frames,
        vec![reply(1, 1), "I will shoot now.".to_string(), reply(1, 1)],
    );

    let summary = runner.run_episode(4).await;

    assert_eq!(summary.stats.completed, 2);
    assert_eq!(summary.stats.skipped, 2);
    match &summary.reports[1] {
        TurnReport::Skipped { turn, reason } => {
            assert_eq!(*turn, 2);
            assert_eq!(reason.stage, TurnStage::Decide);
            assert!(!reason.precondition);
        }
        other => panic!("expected skipped turn, got {other:?}"),
    }
    // frames ran out before turn 4
    assert!(matches!(
        &summary.reports[3],
        TurnReport::Skipped { reason, .. } if reason.stage == TurnStage::CaptureBefore
    ));

    assert_eq!(runner.store().len(), 2);
    // skipped turn never reached the game, so aim only moved twice
    assert_eq!(runner.actuator().applied().len(), 2);
    assert_eq!((runner.aim().angle(), runner.aim().power()), (47, 52));
}

#[tokio::test]
async fn size_change_is_a_precondition_skip() {
    let small = Frame::from_image(RgbImage::new(WIDTH / 2, HEIGHT / 2));
    let frames = ScriptedFrameSource::new(vec![blank(), small]);
    let mut runner = runner(fast_config(), frames, vec![reply(0, 0)]);

    let report = runner.run_turn(1).await;

    match report {
        TurnReport::Skipped { reason, .. } => {
            assert_eq!(reason.stage, TurnStage::Analyze);
            assert!(reason.precondition);
        }
        other => panic!("expected skipped turn, got {other:?}"),
    }
    assert!(runner.store().is_empty());
}

#[tokio::test]
async fn each_episode_starts_with_empty_history() {
    let mut config = fast_config();
    config.episode.turns_per_game = 2;
    let frames = ScriptedFrameSource::new(vec![]).repeat_last(blank());
    let replies = (0..4).map(|_| reply(10, 0)).collect();
    let mut runner = runner(config, frames, replies);

    let session = runner.run_session(2).await;

    assert_eq!(session.episodes.len(), 2);
    assert_ne!(session.episodes[0].episode_id, session.episodes[1].episode_id);
    for episode in &session.episodes {
        assert_eq!(episode.stats.completed, 2);
        assert_eq!(episode.stats.distance.unknown, 2);
        assert!(episode.final_context.contains("Move 2: angle=65"));
        assert!(!episode.final_context.contains("Move 3"));
    }
    assert_eq!(session.totals().completed, 4);

    // the first prompt of the second game sees no history
    assert!(runner.decider().prompts()[2].contains(EMPTY_HISTORY));
}

#[tokio::test]
async fn motion_gate_waits_for_the_screen_to_settle() {
    let config = BenchConfig {
        turn_gate: TurnGateConfig::Motion(MotionConfig {
            stable_frames: 2,
            fps: 1000,
            ..MotionConfig::default()
        }),
        ..BenchConfig::default()
    };
    let frames = ScriptedFrameSource::new(vec![
        blank(),
        // samples taken while the shell is in flight
        with_square(100, 50, 40),
        with_square(200, 80, 40),
        direct_hit(),
        direct_hit(),
        direct_hit(),
        // after frame
        direct_hit(),
    ]);
    let mut runner = runner(config, frames, vec![reply(0, 0)]);

    let report = runner.run_turn(1).await;

    assert_eq!(
        report.outcome().map(|o| o.distance_result),
        Some(DistanceResult::Hit)
    );
    assert_eq!(runner.frames().remaining(), 0);
}

#[tokio::test]
async fn long_episode_without_frames_skips_every_turn() {
    let mut runner = runner(fast_config(), ScriptedFrameSource::default(), vec![]);

    let summary = runner.run_episode(5_000).await;

    assert_eq!(summary.reports.len(), 5_000);
    assert_eq!(summary.stats.skipped, 5_000);
    assert_eq!(summary.final_context, EMPTY_HISTORY);

    let empty = runner.run_episode(0).await;
    assert!(empty.reports.is_empty());
    assert_eq!(empty.stats.turns(), 0);
}
