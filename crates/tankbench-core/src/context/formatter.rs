//! Renders recent history into the text block handed to the agent.
//!
//! The wording is read by a language model, not parsed; tests pin it so that
//! prompt changes are deliberate.

use std::fmt::Write as _;

use super::store::{ContextEntry, ContextStore};
use crate::domain::MoveCommand;

pub const EMPTY_HISTORY: &str = "No previous moves to reference.";
pub const HEADER: &str = "Recent moves:";

#[derive(Debug, Clone)]
pub struct ContextFormatter {
    recent: usize,
}

impl ContextFormatter {
    pub fn new(recent: usize) -> Self {
        Self { recent }
    }

    /// ```text
    /// Recent moves:
    /// Move 3: angle=48 (Δ+3), power=61 (Δ-4) → MISS (overshoot)
    /// Move 2: angle=45 (Δ+0), power=65 (Δ+5), move=left x2 → MISS (undershoot)
    /// Move 1: angle_delta=5, power_delta=0 → HIT
    /// ```
    ///
    /// Lines are most recent first; the move number counts up from the
    /// oldest rendered entry.
    pub fn render(&self, store: &ContextStore) -> String {
        if store.is_empty() {
            return EMPTY_HISTORY.to_string();
        }

        let shown = store.len().min(self.recent);
        let mut out = String::from(HEADER);
        for (i, entry) in store.recent(shown).enumerate() {
            out.push('\n');
            let _ = write!(out, "Move {}: {}", shown - i, line(entry));
        }

        tracing::debug!(lines = shown, context = %out, "rendered move context");
        out
    }
}

impl Default for ContextFormatter {
    fn default() -> Self {
        Self::new(3)
    }
}

fn line(entry: &ContextEntry) -> String {
    format!("{} → {}", describe(entry.command()), entry.outcome().label())
}

fn describe(cmd: &MoveCommand) -> String {
    let mut desc = match cmd.absolute() {
        Some((angle, power)) => format!(
            "angle={angle} (Δ{:+}), power={power} (Δ{:+})",
            cmd.angle_delta, cmd.power_delta
        ),
        None => format!(
            "angle_delta={}, power_delta={}",
            cmd.angle_delta, cmd.power_delta
        ),
    };
    if let Some(action) = cmd.move_action {
        let _ = write!(desc, ", move={} x{}", action.direction, action.count);
    }
    desc
}
