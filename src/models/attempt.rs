// src/models/attempt.rs

use serde::Serialize;
use sqlx::FromRow;

/// Represents the 'assessment_attempts' table (audit columns omitted).
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AttemptRow {
    pub id: i64,
    pub user_id: i64,
    pub overall_score: f64,
    pub band: String,
    pub version: Option<String>,
    pub duration_ms: Option<i64>,
}

/// Represents the 'assessment_categories' table: one row per category of an attempt.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CategoryResultRow {
    pub attempt_id: i64,
    pub category_key: String,
    pub category_name: String,
    pub raw: i64,
    pub pct: f64,
    pub weighted: f64,
    pub weight: i64,
}

/// Represents the 'assessment_answers' table: one row per question, in presentation order.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AnswerRecordRow {
    pub attempt_id: i64,
    pub item_index: i64,
    pub category_key: String,
    pub question_index: i64,
    pub letter: String,
    pub points: i64,
    pub option_text: String,
}
