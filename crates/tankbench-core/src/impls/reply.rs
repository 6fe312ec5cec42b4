//! Agent reply parsing: free-form model output into a `MoveCommand`.
//!
//! Models wrap JSON in markdown fences, spell directions in several ways and
//! sometimes ask for more movement than allowed. This normalizes all of that.
//! Anything that still does not yield a command is an error; the turn is
//! skipped rather than played with a made-up move.

use serde_json::{Map, Value};
use thiserror::Error;

use crate::domain::{Direction, MoveCommand};

#[derive(Debug, Error)]
pub enum ReplyError {
    #[error("empty reply")]
    Empty,

    #[error("reply contains no JSON object")]
    NoJsonObject,

    #[error("reply JSON is malformed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("field `{field}`: {message}")]
    InvalidField {
        field: &'static str,
        message: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplyParser {
    /// Move steps above this are capped.
    pub max_move_steps: u32,
}

impl Default for ReplyParser {
    fn default() -> Self {
        Self { max_move_steps: 4 }
    }
}

/// Parse with the default limits.
pub fn parse_agent_reply(text: &str) -> Result<MoveCommand, ReplyError> {
    ReplyParser::default().parse(text)
}

impl ReplyParser {
    pub fn new(max_move_steps: u32) -> Self {
        Self { max_move_steps }
    }

    pub fn parse(&self, text: &str) -> Result<MoveCommand, ReplyError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ReplyError::Empty);
        }

        let object = match serde_json::from_str::<Value>(extract_object(text)?)? {
            Value::Object(map) => map,
            _ => return Err(ReplyError::NoJsonObject),
        };

        let mut command = MoveCommand::new(
            int_field(&object, "angle_delta")?,
            int_field(&object, "power_delta")?,
        );

        let raw_move = object.get("move_actions").or_else(|| object.get("move_action"));
        if let Some((direction, count)) = raw_move.and_then(move_action) {
            let count = count.min(self.max_move_steps);
            if count > 0 {
                command = command.with_move(direction, count);
            }
        }

        if let Some(reasoning) = object.get("reasoning").and_then(Value::as_str) {
            command.reasoning = Some(reasoning.to_string());
        }
        command.confidence = object
            .get("confidence")
            .and_then(Value::as_f64)
            .map(|c| c.clamp(0.0, 1.0) as f32);

        Ok(command)
    }
}

/// The outermost `{ ... }` span, which also skips markdown fences.
fn extract_object(text: &str) -> Result<&str, ReplyError> {
    match (text.find('{'), text.rfind('}')) {
        (Some(start), Some(end)) if end > start => Ok(&text[start..=end]),
        _ => Err(ReplyError::NoJsonObject),
    }
}

/// Integers, integral floats and numeric strings are accepted; missing is zero.
fn int_field(object: &Map<String, Value>, field: &'static str) -> Result<i32, ReplyError> {
    let invalid = |message: String| ReplyError::InvalidField { field, message };
    let value = match object.get(field) {
        None | Some(Value::Null) => return Ok(0),
        Some(v) => v,
    };

    let number = match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.round() as i64)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
    .ok_or_else(|| invalid(format!("expected an integer, got {value}")))?;

    i32::try_from(number).map_err(|_| invalid(format!("{number} out of range")))
}

/// `{"direction": "R", "count": 2}` or `["R", 2]`. Unknown directions drop the move.
fn move_action(value: &Value) -> Option<(Direction, u32)> {
    let (direction, count) = match value {
        Value::Object(map) => (map.get("direction")?, map.get("count")?),
        Value::Array(items) if items.len() == 2 => (&items[0], &items[1]),
        _ => return None,
    };
    let direction = normalize_direction(direction.as_str()?)?;
    let count = count.as_u64().or_else(|| count.as_f64().filter(|c| *c >= 0.0).map(|c| c as u64))?;
    Some((direction, u32::try_from(count).unwrap_or(u32::MAX)))
}

fn normalize_direction(raw: &str) -> Option<Direction> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "r" | "right" | "rightwards" | "to the right" => Some(Direction::Right),
        "l" | "left" | "leftwards" | "to the left" => Some(Direction::Left),
        _ => None,
    }
}
