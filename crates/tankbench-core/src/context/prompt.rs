//! Prompt handed to the decision agent together with the current frame.

const INSTRUCTIONS: &str = "\
You are playing Pocket Tanks, a turn-based artillery game. Analyze the screenshot and decide your next move.

# Game Rules:
- You control a tank and need to hit the opponent's tank using 2-D projectile motion.
- You can adjust the angle and power for your shot.
- The maximum power is 100, and the angle is 0-360 degrees with 0 being straight right and 90 being straight up.
- You can move left/right before shooting, but you must still fire after moving.
- Consider terrain and distance to target. Most weapons cannot go through hills.

# Steps:
1. Read the current angle and power from the screenshot.
2. Use the feedback from previous moves to correct your aim.
3. Decide the move action to take.";

const REPLY_FORMAT: &str = r#"Return your response as JSON with this exact structure:
{
    "angle_delta": <integer>,
    "power_delta": <integer>,
    "move_actions": <null or {"direction": "L"|"R", "count": <steps>}>,
    "reasoning": "<explanation of your strategy>",
    "confidence": <float from 0.0 to 1.0>
}"#;

#[derive(Debug, Clone)]
pub struct PromptBuilder {
    max_move_steps: u32,
}

impl PromptBuilder {
    pub fn new(max_move_steps: u32) -> Self {
        Self { max_move_steps }
    }

    /// Instructions, the feedback block, and the reply schema.
    pub fn build(&self, context_block: &str) -> String {
        format!(
            "{INSTRUCTIONS}\n\n# Feedback from previous moves:\n{context_block}\n\n\
             Move at most {} steps per turn.\n\n{REPLY_FORMAT}",
            self.max_move_steps
        )
    }
}

impl Default for PromptBuilder {
    fn default() -> Self {
        Self::new(4)
    }
}
