// src/store.rs

//! Persistence for attempts.
//!
//! Three relations: one attempt row, its category results and its answer
//! records. They are only ever written together inside one transaction.

use sqlx::{Any, AnyPool, Transaction};

use crate::{
    error::{AppError, WriteStage},
    models::{
        attempt::{AnswerRecordRow, AttemptRow, CategoryResultRow},
        payload::AttemptPayload,
    },
};

pub const ATTEMPTS_TABLE: &str = "assessment_attempts";
pub const CATEGORIES_TABLE: &str = "assessment_categories";
pub const ANSWERS_TABLE: &str = "assessment_answers";

/// Tables that must exist before an attempt can be written, in write order.
pub const TABLES: [&str; 3] = [ATTEMPTS_TABLE, CATEGORIES_TABLE, ANSWERS_TABLE];

/// SQL backend behind the `Any` pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    Postgres,
    Sqlite,
}

impl Dialect {
    pub fn from_url(database_url: &str) -> Option<Self> {
        if database_url.starts_with("postgres:") || database_url.starts_with("postgresql:") {
            Some(Dialect::Postgres)
        } else if database_url.starts_with("sqlite:") {
            Some(Dialect::Sqlite)
        } else {
            None
        }
    }

    fn table_exists_sql(self) -> &'static str {
        match self {
            Dialect::Postgres => {
                "SELECT COUNT(*) FROM information_schema.tables WHERE table_schema = current_schema() AND table_name = $1"
            }
            Dialect::Sqlite => "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = $1",
        }
    }
}

/// Applies the embedded migrations for the given backend.
pub async fn migrate(pool: &AnyPool, dialect: Dialect) -> Result<(), sqlx::migrate::MigrateError> {
    match dialect {
        Dialect::Postgres => sqlx::migrate!("./migrations/postgres").run(pool).await,
        Dialect::Sqlite => sqlx::migrate!("./migrations/sqlite").run(pool).await,
    }
}

/// Returns the first required table that does not exist.
pub async fn missing_table(pool: &AnyPool, dialect: Dialect) -> Result<Option<&'static str>, sqlx::Error> {
    for table in TABLES {
        let count: i64 = sqlx::query_scalar(dialect.table_exists_sql())
            .bind(table)
            .fetch_one(pool)
            .await?;
        if count == 0 {
            return Ok(Some(table));
        }
    }
    Ok(None)
}

/// Everything needed to persist one attempt.
#[derive(Debug)]
pub struct NewAttempt<'a> {
    pub user_id: i64,
    pub payload: &'a AttemptPayload,
    pub ip: Option<Vec<u8>>,
    pub user_agent: Option<String>,
}

/// Writes the attempt, its category rows and its answer rows atomically.
///
/// Any failing insert rolls the whole transaction back and reports the stage
/// that failed. Returns the generated attempt id.
pub async fn record_attempt(pool: &AnyPool, attempt: NewAttempt<'_>) -> Result<i64, AppError> {
    let payload = attempt.payload;

    let mut tx = pool
        .begin()
        .await
        .map_err(|e| AppError::storage(WriteStage::Attempt, e))?;

    let inserted = sqlx::query_scalar::<_, i64>(
        r#"
        INSERT INTO assessment_attempts
            (user_id, overall_score, band, version, duration_ms, ip, user_agent)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING id
        "#,
    )
    .bind(attempt.user_id)
    .bind(payload.overall)
    .bind(&payload.band)
    .bind(payload.version.as_deref())
    .bind(payload.duration_ms)
    .bind(attempt.ip)
    .bind(attempt.user_agent)
    .fetch_one(&mut *tx)
    .await;

    let attempt_id = match inserted {
        Ok(id) => id,
        Err(e) => return Err(abort(tx, WriteStage::Attempt, e).await),
    };

    for row in &payload.breakdown {
        let result = sqlx::query(
            r#"
            INSERT INTO assessment_categories
                (attempt_id, category_key, category_name, raw, pct, weighted, weight)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(attempt_id)
        .bind(&row.key)
        .bind(&row.name)
        .bind(row.raw)
        .bind(row.pct)
        .bind(row.weighted)
        .bind(row.weight)
        .execute(&mut *tx)
        .await;

        if let Err(e) = result {
            return Err(abort(tx, WriteStage::Category, e).await);
        }
    }

    for row in &payload.answers {
        let result = sqlx::query(
            r#"
            INSERT INTO assessment_answers
                (attempt_id, item_index, category_key, question_index, letter, points, option_text)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(attempt_id)
        .bind(row.item_index)
        .bind(&row.category_key)
        .bind(row.question_index)
        .bind(&row.letter)
        .bind(row.points)
        .bind(&row.option_text)
        .execute(&mut *tx)
        .await;

        if let Err(e) = result {
            return Err(abort(tx, WriteStage::Answer, e).await);
        }
    }

    // commit failure is reported against the last write stage
    tx.commit()
        .await
        .map_err(|e| AppError::storage(WriteStage::Answer, e))?;

    Ok(attempt_id)
}

async fn abort(tx: Transaction<'_, Any>, stage: WriteStage, err: sqlx::Error) -> AppError {
    if let Err(rollback_err) = tx.rollback().await {
        tracing::error!("Rollback after {:?} failure did not complete: {:?}", stage, rollback_err);
    }
    AppError::storage(stage, err)
}

pub async fn fetch_attempt(pool: &AnyPool, attempt_id: i64) -> Result<Option<AttemptRow>, sqlx::Error> {
    sqlx::query_as::<_, AttemptRow>(
        r#"
        SELECT
            id,
            user_id,
            CAST(overall_score AS DOUBLE PRECISION) AS overall_score,
            band,
            version,
            duration_ms
        FROM assessment_attempts
        WHERE id = $1
        "#,
    )
    .bind(attempt_id)
    .fetch_optional(pool)
    .await
}

/// Category rows of one attempt, in insertion order.
pub async fn fetch_breakdown(pool: &AnyPool, attempt_id: i64) -> Result<Vec<CategoryResultRow>, sqlx::Error> {
    sqlx::query_as::<_, CategoryResultRow>(
        r#"
        SELECT
            attempt_id,
            category_key,
            category_name,
            raw,
            CAST(pct AS DOUBLE PRECISION) AS pct,
            CAST(weighted AS DOUBLE PRECISION) AS weighted,
            weight
        FROM assessment_categories
        WHERE attempt_id = $1
        ORDER BY id
        "#,
    )
    .bind(attempt_id)
    .fetch_all(pool)
    .await
}

/// Answer rows of one attempt, in presentation order.
pub async fn fetch_answers(pool: &AnyPool, attempt_id: i64) -> Result<Vec<AnswerRecordRow>, sqlx::Error> {
    sqlx::query_as::<_, AnswerRecordRow>(
        r#"
        SELECT
            attempt_id,
            item_index,
            category_key,
            question_index,
            letter,
            points,
            option_text
        FROM assessment_answers
        WHERE attempt_id = $1
        ORDER BY item_index, id
        "#,
    )
    .bind(attempt_id)
    .fetch_all(pool)
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dialect_from_url() {
        assert_eq!(Dialect::from_url("postgres://u:p@db/app"), Some(Dialect::Postgres));
        assert_eq!(Dialect::from_url("postgresql://db/app"), Some(Dialect::Postgres));
        assert_eq!(Dialect::from_url("sqlite::memory:"), Some(Dialect::Sqlite));
        assert_eq!(Dialect::from_url("mysql://db/app"), None);
    }
}
