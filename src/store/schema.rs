//! Table definition for the reading log.

use rusqlite::Connection;

use crate::store::error::StoreResult;

/// Create the reading table and its ordering index if they do not exist.
pub(crate) fn ensure_schema(conn: &Connection) -> StoreResult<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS blood_sugar_log (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            date_time TEXT NOT NULL,
            blood_sugar REAL NOT NULL,
            meal_type TEXT
        );

        CREATE INDEX IF NOT EXISTS idx_blood_sugar_log_date_time
            ON blood_sugar_log (date_time);",
    )?;
    Ok(())
}
