// src/models/payload.rs

//! The submission payload and its decoding step.
//!
//! Decoding turns an untyped JSON body into a fully typed [`AttemptPayload`]
//! or a [`PayloadError`]. The four required top-level fields are enforced;
//! everything else is coerced to a safe default when absent or unparseable.
//!
//! | field                        | policy                                        |
//! |------------------------------|-----------------------------------------------|
//! | `overall`                    | required, number or numeric string            |
//! | `band`                       | required, non-empty after sanitizing          |
//! | `breakdown`                  | required, non-empty array                     |
//! | `answers`                    | required, non-empty array                     |
//! | `version`                    | optional, text, null when absent              |
//! | `duration_ms`                | optional, integer (0 if unparseable, >= 0)    |
//! | breakdown/answer item fields | defaulted: 0 for numbers, "" for text         |

use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;
use validator::Validate;

use crate::utils::sanitize::{key, rich_text, text_field, truncate_chars};

pub const BAND_MAX: usize = 80;
pub const VERSION_MAX: usize = 20;
pub const KEY_MAX: usize = 40;
pub const NAME_MAX: usize = 120;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum PayloadError {
    #[error("request body is not a JSON object")]
    NotAnObject,
    #[error("required field `{0}` is missing")]
    Missing(&'static str),
    #[error("field `{0}` is not numeric")]
    NotNumeric(&'static str),
    #[error("field `{0}` is empty")]
    Empty(&'static str),
}

/// One finished attempt as sent by the assessment client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
pub struct AttemptPayload {
    /// Weighted overall score, 0..100.
    pub overall: f64,
    #[validate(length(min = 1))]
    pub band: String,
    pub version: Option<String>,
    pub duration_ms: Option<i64>,
    #[validate(length(min = 1))]
    pub breakdown: Vec<BreakdownEntry>,
    #[validate(length(min = 1))]
    pub answers: Vec<AnswerEntry>,
}

/// Per-category score line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct BreakdownEntry {
    pub key: String,
    pub name: String,
    pub raw: i64,
    /// Percentage of the category maximum, 0..100.
    pub pct: f64,
    pub weighted: f64,
    pub weight: i64,
}

/// One answered question, in the order the user saw it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AnswerEntry {
    /// 1-based presentation position across the whole attempt.
    pub item_index: i64,
    pub category_key: String,
    /// 1-based position of the question within its category.
    pub question_index: i64,
    /// Presentation label, `A`..`D`.
    pub letter: String,
    pub points: i64,
    pub option_text: String,
}

/// Successful submission response.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SubmitResponse {
    pub attempt_id: i64,
}

impl AttemptPayload {
    /// Decodes a raw request body. Anything that is not a JSON object is rejected.
    pub fn from_body(body: &[u8]) -> Result<Self, PayloadError> {
        let value: Value = serde_json::from_slice(body).map_err(|_| PayloadError::NotAnObject)?;
        Self::decode(&value)
    }

    pub fn decode(value: &Value) -> Result<Self, PayloadError> {
        let obj = value.as_object().ok_or(PayloadError::NotAnObject)?;

        let overall = match present(obj.get("overall")) {
            None => return Err(PayloadError::Missing("overall")),
            Some(v) => number(v).ok_or(PayloadError::NotNumeric("overall"))?,
        };

        let band = present(obj.get("band"))
            .map(|v| truncate_chars(&text_field(&text(v)), BAND_MAX))
            .ok_or(PayloadError::Missing("band"))?;

        let version = present(obj.get("version"))
            .map(|v| truncate_chars(&text_field(&text(v)), VERSION_MAX));

        let duration_ms = present(obj.get("duration_ms")).map(|v| integer(v).max(0));

        let breakdown = present(obj.get("breakdown"))
            .ok_or(PayloadError::Missing("breakdown"))?
            .as_array()
            .map(|rows| rows.iter().map(BreakdownEntry::decode).collect())
            .unwrap_or_default();

        let answers = present(obj.get("answers"))
            .ok_or(PayloadError::Missing("answers"))?
            .as_array()
            .map(|rows| rows.iter().map(AnswerEntry::decode).collect())
            .unwrap_or_default();

        let payload = AttemptPayload {
            overall,
            band,
            version,
            duration_ms,
            breakdown,
            answers,
        };

        if let Err(errors) = payload.validate() {
            let field = ["band", "breakdown", "answers"]
                .into_iter()
                .find(|f| errors.field_errors().contains_key(*f))
                .unwrap_or("payload");
            return Err(PayloadError::Empty(field));
        }

        Ok(payload)
    }
}

impl BreakdownEntry {
    fn decode(row: &Value) -> Self {
        BreakdownEntry {
            key: truncate_chars(&key(&field_text(row, "key")), KEY_MAX),
            name: truncate_chars(&text_field(&field_text(row, "name")), NAME_MAX),
            raw: field_integer(row, "raw"),
            pct: field_number(row, "pct"),
            weighted: field_number(row, "weighted"),
            weight: field_integer(row, "weight"),
        }
    }
}

impl AnswerEntry {
    fn decode(row: &Value) -> Self {
        AnswerEntry {
            item_index: field_integer(row, "item_index"),
            category_key: truncate_chars(&key(&field_text(row, "category_key")), KEY_MAX),
            question_index: field_integer(row, "question_index"),
            letter: truncate_chars(&text_field(&field_text(row, "letter")), 1),
            points: field_integer(row, "points"),
            option_text: rich_text(&field_text(row, "option_text")),
        }
    }
}

/// Treats JSON `null` like an absent field.
fn present(value: Option<&Value>) -> Option<&Value> {
    value.filter(|v| !v.is_null())
}

fn number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()),
        _ => None,
    }
}

/// Lenient integer coercion; anything unparseable becomes 0.
fn integer(value: &Value) -> i64 {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f.trunc() as i64))
            .unwrap_or(0),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().map(|f| f.trunc() as i64))
                .unwrap_or(0)
        }
        Value::Bool(b) => i64::from(*b),
        _ => 0,
    }
}

fn text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => String::new(),
    }
}

fn field_text(row: &Value, name: &str) -> String {
    row.get(name).map(text).unwrap_or_default()
}

fn field_integer(row: &Value, name: &str) -> i64 {
    row.get(name).map(integer).unwrap_or(0)
}

fn field_number(row: &Value, name: &str) -> f64 {
    row.get(name).and_then(number).unwrap_or(0.0)
}
