//! Survey catalog query functions (admin-authored questions).

use rusqlite::types::Type;
use rusqlite::Connection;

use quizzy_types::catalog::Survey;

use crate::{DbError, Result};

/// Insert a question and return its id.
pub fn insert(
    conn: &Connection,
    question: &str,
    options: &[String],
    position: u32,
    now: u64,
) -> Result<i64> {
    let encoded = serde_json::to_string(options)
        .map_err(|e| DbError::Serialization(e.to_string()))?;
    conn.execute(
        "INSERT INTO surveys (question, options, position, created_at)
         VALUES (?1, ?2, ?3, ?4)",
        rusqlite::params![question, encoded, position as i64, now as i64],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Fetch a question by id.
pub fn get(conn: &Connection, survey_id: i64) -> Result<Survey> {
    let result = conn.query_row(
        "SELECT survey_id, question, options, position, is_active, created_at
         FROM surveys WHERE survey_id = ?1",
        [survey_id],
        row_to_survey,
    );
    match result {
        Ok(survey) => Ok(survey),
        Err(rusqlite::Error::QueryReturnedNoRows) => {
            Err(DbError::NotFound(format!("survey {survey_id}")))
        }
        Err(e) => Err(DbError::Sqlite(e)),
    }
}

/// Active questions in questionnaire order.
pub fn list_active(conn: &Connection) -> Result<Vec<Survey>> {
    let mut stmt = conn.prepare(
        "SELECT survey_id, question, options, position, is_active, created_at
         FROM surveys WHERE is_active = 1
         ORDER BY position ASC, survey_id ASC",
    )?;

    let rows = stmt
        .query_map([], row_to_survey)?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(rows)
}

/// Activate or retire a question. Returns `false` if it does not exist.
pub fn set_active(conn: &Connection, survey_id: i64, active: bool) -> Result<bool> {
    let updated = conn.execute(
        "UPDATE surveys SET is_active = ?2 WHERE survey_id = ?1",
        rusqlite::params![survey_id, active as i64],
    )?;
    Ok(updated == 1)
}

fn row_to_survey(row: &rusqlite::Row<'_>) -> rusqlite::Result<Survey> {
    let options: String = row.get(2)?;
    let options = serde_json::from_str(&options)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(2, Type::Text, Box::new(e)))?;

    Ok(Survey {
        survey_id: row.get(0)?,
        question: row.get(1)?,
        options,
        position: row.get::<_, i64>(3)? as u32,
        is_active: row.get::<_, i64>(4)? != 0,
        created_at: row.get::<_, i64>(5)? as u64,
    })
}
