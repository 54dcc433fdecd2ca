// src/engine/export.rs

//! Client-side exports of a scored attempt. Neither depends on the attempt
//! having been saved.

use chrono::{DateTime, SecondsFormat, Utc};

use crate::bank::CATEGORIES;
use crate::engine::scoring::ScoreCard;
use crate::engine::sheet::AnswerSheet;
use crate::models::caller::DisplayIdentity;

pub const CSV_FILE_NAME: &str = "ai_readiness_assessment.csv";

/// A download ready to hand to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvExport {
    pub file_name: &'static str,
    pub contents: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error("could not finish csv output: {0}")]
    Output(String),
}

fn headers() -> Vec<String> {
    let mut headers: Vec<String> = [
        "timestamp",
        "candidate_name",
        "candidate_email",
        "overall_score",
        "overall_band",
    ]
    .iter()
    .map(|h| h.to_string())
    .collect();

    for cat in &CATEGORIES {
        headers.push(format!("{}_raw", cat.key));
        headers.push(format!("{}_weighted", cat.key));
    }
    for suffix in ["letter", "points"] {
        for cat in &CATEGORIES {
            for n in 1..=cat.questions.len() {
                headers.push(format!("{}_q{}_{}", cat.key, n, suffix));
            }
        }
    }
    headers
}

/// One header row and one data row. Per-question columns are in bank order;
/// unanswered questions leave their cells empty.
pub fn export_csv(
    scores: &ScoreCard,
    sheet: &AnswerSheet,
    user: &DisplayIdentity,
    timestamp: DateTime<Utc>,
) -> Result<String, ExportError> {
    let mut row = vec![
        timestamp.to_rfc3339_opts(SecondsFormat::Millis, true),
        user.name.replace(',', " "),
        user.email.clone(),
        scores.overall.to_string(),
        scores.band.label().to_string(),
    ];

    for line in &scores.breakdown {
        row.push(line.raw.to_string());
        row.push(line.weighted.to_string());
    }
    for (idx, _) in CATEGORIES.iter().enumerate() {
        row.extend(sheet.category(idx).map(|a| a.map(|a| a.letter.to_string()).unwrap_or_default()));
    }
    for (idx, _) in CATEGORIES.iter().enumerate() {
        row.extend(sheet.category(idx).map(|a| a.map(|a| a.points.to_string()).unwrap_or_default()));
    }

    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(headers())?;
    writer.write_record(&row)?;
    let bytes = writer
        .into_inner()
        .map_err(|e| ExportError::Output(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| ExportError::Output(e.to_string()))
}

/// Plain-text listing of every answer, grouped by category in bank order.
pub fn raw_answer_summary(sheet: &AnswerSheet, user: &DisplayIdentity) -> String {
    let name = match user.name.trim() {
        "" => "User",
        name => name,
    };
    let mut lines = vec![match user.email.trim() {
        "" => format!("Candidate: {}", name),
        email => format!("Candidate: {} | {}", name, email),
    }];

    for (idx, cat) in CATEGORIES.iter().enumerate() {
        lines.push(String::new());
        lines.push(format!("{}:", cat.name));
        for (q, answer) in sheet.category(idx).enumerate() {
            lines.push(match answer {
                Some(a) => format!("  Q{}: {} ({} pts) — {}", q + 1, a.letter, a.points, a.option_text),
                None => format!("  Q{}: — (0 pts) — ", q + 1),
            });
        }
    }
    lines.join("\n").trim().to_string()
}
