//! Fixed-delay turn gate (default strategy).

use std::time::Duration;

use async_trait::async_trait;
use tokio::time::Instant;

use super::{GateError, TurnCompletion};
use crate::domain::Frame;
use crate::ports::FrameSource;

/// WAITING -> READY, once, when the configured delay has passed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeoutState {
    Waiting,
    Ready,
}

/// Waits a fixed time after the shot; never looks at frames.
#[derive(Debug, Clone)]
pub struct TimeoutGate {
    wait: Duration,
    started: Option<Instant>,
    state: TimeoutState,
}

impl TimeoutGate {
    pub fn new(wait: Duration) -> Self {
        Self {
            wait,
            started: None,
            state: TimeoutState::Waiting,
        }
    }

    pub fn state(&self) -> TimeoutState {
        self.state
    }

    pub fn wait(&self) -> Duration {
        self.wait
    }

    /// The clock starts at the first query after a reset.
    fn deadline(&mut self) -> Instant {
        *self.started.get_or_insert_with(Instant::now) + self.wait
    }
}

#[async_trait]
impl TurnCompletion for TimeoutGate {
    fn is_turn_active(&mut self, _frame: &Frame) -> bool {
        if self.state == TimeoutState::Waiting && Instant::now() >= self.deadline() {
            self.state = TimeoutState::Ready;
        }
        self.state == TimeoutState::Waiting
    }

    async fn await_turn_boundary(&mut self, _frames: &mut dyn FrameSource) -> Result<(), GateError> {
        if self.state == TimeoutState::Waiting {
            tokio::time::sleep_until(self.deadline()).await;
            self.state = TimeoutState::Ready;
        }
        Ok(())
    }

    fn reset(&mut self) {
        self.started = None;
        self.state = TimeoutState::Waiting;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::impls::ScriptedFrameSource;
    use image::RgbImage;

    fn frame() -> Frame {
        Frame::from_image(RgbImage::new(4, 4))
    }

    #[tokio::test]
    async fn waits_the_configured_duration() {
        let mut gate = TimeoutGate::new(Duration::from_millis(30));
        let mut frames = ScriptedFrameSource::new(vec![]);

        let start = Instant::now();
        gate.await_turn_boundary(&mut frames).await.unwrap();

        assert!(start.elapsed() >= Duration::from_millis(30));
        assert_eq!(gate.state(), TimeoutState::Ready);
        // no frames were consumed
        assert_eq!(frames.remaining(), 0);
    }

    #[tokio::test]
    async fn is_active_until_the_delay_passes() {
        let mut gate = TimeoutGate::new(Duration::from_millis(20));

        assert!(gate.is_turn_active(&frame()));
        tokio::time::sleep(Duration::from_millis(25)).await;
        assert!(!gate.is_turn_active(&frame()));
        assert_eq!(gate.state(), TimeoutState::Ready);

        gate.reset();
        assert_eq!(gate.state(), TimeoutState::Waiting);
        assert!(gate.is_turn_active(&frame()));
    }

    #[tokio::test]
    async fn ready_gate_returns_immediately() {
        let mut gate = TimeoutGate::new(Duration::from_secs(3600));
        gate.state = TimeoutState::Ready;
        let mut frames = ScriptedFrameSource::new(vec![]);

        gate.await_turn_boundary(&mut frames).await.unwrap();
    }
}
