//! AimTracker - 現在の角度・パワーの追跡
//!
//! エージェントは差分（angle_delta / power_delta）しか返さないので、
//! 絶対値はこちらで積み上げてゲームの範囲に収めます。
//! 履歴に載るのは収めた後の絶対値です。

use crate::config::AimConfig;
use crate::domain::MoveCommand;

#[derive(Debug, Clone)]
pub struct AimTracker {
    config: AimConfig,
    angle: i32,
    power: i32,
}

impl AimTracker {
    pub fn new(config: AimConfig) -> Self {
        Self {
            config,
            angle: config.start_angle,
            power: config.start_power,
        }
    }

    pub fn angle(&self) -> i32 {
        self.angle
    }

    pub fn power(&self) -> i32 {
        self.power
    }

    /// 差分を適用した絶対値を埋めたコマンドを返す（状態は変えない）
    pub fn resolve(&self, command: MoveCommand) -> MoveCommand {
        let angle = self
            .angle
            .saturating_add(command.angle_delta)
            .clamp(0, self.config.max_angle);
        let power = self
            .power
            .saturating_add(command.power_delta)
            .clamp(0, self.config.max_power);
        command.with_absolute(angle, power)
    }

    /// 実際に適用されたコマンドの絶対値を現在値にする
    pub fn commit(&mut self, command: &MoveCommand) {
        if let Some((angle, power)) = command.absolute() {
            self.angle = angle;
            self.power = power;
        }
    }

    /// 新しいゲームの開始位置に戻す
    pub fn reset(&mut self) {
        self.angle = self.config.start_angle;
        self.power = self.config.start_power;
    }
}

impl Default for AimTracker {
    fn default() -> Self {
        Self::new(AimConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::plain(10, -5, (55, 45))]
    #[case::angle_floor(-100, 0, (0, 50))]
    #[case::angle_ceiling(400, 0, (360, 50))]
    #[case::power_ceiling(0, 80, (45, 100))]
    #[case::power_floor(0, -80, (45, 0))]
    fn resolve_clamps_to_game_ranges(
        #[case] angle_delta: i32,
        #[case] power_delta: i32,
        #[case] expected: (i32, i32),
    ) {
        let tracker = AimTracker::default();
        let cmd = tracker.resolve(MoveCommand::new(angle_delta, power_delta));

        assert_eq!(cmd.absolute(), Some(expected));
        // deltas are kept as the agent sent them
        assert_eq!((cmd.angle_delta, cmd.power_delta), (angle_delta, power_delta));
    }

    #[test]
    fn resolve_does_not_move_until_commit() {
        let mut tracker = AimTracker::default();
        let cmd = tracker.resolve(MoveCommand::new(5, 5));
        assert_eq!((tracker.angle(), tracker.power()), (45, 50));

        tracker.commit(&cmd);
        assert_eq!((tracker.angle(), tracker.power()), (50, 55));

        let next = tracker.resolve(MoveCommand::new(5, 5));
        assert_eq!(next.absolute(), Some((55, 60)));
    }

    #[test]
    fn reset_returns_to_start() {
        let mut tracker = AimTracker::new(AimConfig {
            start_angle: 30,
            start_power: 70,
            ..AimConfig::default()
        });
        let cmd = tracker.resolve(MoveCommand::new(20, -20));
        tracker.commit(&cmd);

        tracker.reset();
        assert_eq!((tracker.angle(), tracker.power()), (30, 70));
    }
}
